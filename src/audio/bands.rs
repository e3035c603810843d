//! Log-band compression: folds a linear magnitude array into a short sequence of
//! bands whose widths double every two bands (1, 1, 2, 2, 4, 4, ...).
//!
//! Each band starts half a previous-band-width after the previous start, so
//! neighbouring bands overlap. That overlap is part of the output format and is
//! reproduced exactly.

pub const DEFAULT_BAND_COUNT: usize = 16;

/// Bin range averaged into one compressed band.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BandRange {
    pub start: usize,
    pub len: usize,
}

/// Iterator over the bin ranges of bands `1..=count`.
#[derive(Clone, Debug)]
pub struct BandLayout {
    next: usize,
    count: usize,
    prev_start: usize,
    prev_len: usize,
}

/// Bin ranges for `count` compressed bands, in output order.
pub fn band_layout(count: usize) -> BandLayout {
    BandLayout {
        next: 1,
        count,
        prev_start: 0,
        prev_len: 0,
    }
}

impl Iterator for BandLayout {
    type Item = BandRange;

    fn next(&mut self) -> Option<BandRange> {
        if self.next > self.count {
            return None;
        }
        let j = self.next;
        // odd band and the following even band share a width
        let pow = (j - 1) / 2;
        let len = 1usize.checked_shl(pow as u32).unwrap_or(usize::MAX);

        let start = if self.prev_len == 1 {
            0
        } else {
            self.prev_start.saturating_add(self.prev_len / 2)
        };

        self.prev_start = start;
        self.prev_len = len;
        self.next += 1;
        Some(BandRange { start, len })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.count + 1).saturating_sub(self.next);
        (left, Some(left))
    }
}

impl ExactSizeIterator for BandLayout {}

/// Recomputes `out` as the compressed bands of `magnitudes`.
///
/// Bins past the end of `magnitudes` count as 0 but still take part in the
/// band's divisor. `out` is cleared first; with enough capacity reserved this
/// does not allocate.
pub fn compress_into(magnitudes: &[u8], count: usize, out: &mut Vec<f32>) {
    out.clear();
    for range in band_layout(count) {
        let end = range.start.saturating_add(range.len).min(magnitudes.len());
        let total: f32 = magnitudes
            .get(range.start..end)
            .map(|bins| bins.iter().map(|&b| b as f32).sum())
            .unwrap_or(0.0);
        out.push(total / range.len as f32);
    }
}
