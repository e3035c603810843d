/// Root-mean-square of a sample sequence, averaged over its nonzero samples only.
///
/// Upstream magnitude arrays are often only partly populated at startup or at
/// low signal energy; dividing by the nonzero count keeps those trailing zeros
/// from dragging the estimate down. Returns 0 for empty or all-zero input.
pub fn rms<I, T>(samples: I) -> f32
where
    I: IntoIterator<Item = T>,
    T: Into<f32>,
{
    let mut sum_sq = 0.0f32;
    let mut non_zero = 0usize;
    for s in samples {
        let s: f32 = s.into();
        if s != 0.0 {
            non_zero += 1;
        }
        sum_sq += s * s;
    }

    if non_zero == 0 {
        return 0.0;
    }
    (sum_sq / non_zero as f32).sqrt()
}

/// Linear re-projection of `value` from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// Not clamped. A degenerate input range yields `out_min` instead of NaN.
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let span = in_max - in_min;
    if span == 0.0 {
        return out_min;
    }
    out_min + (value - in_min) / span * (out_max - out_min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rms_ignores_zero_samples_in_denominator() {
        let v = rms([0u8, 10, 20, 30]);
        assert_relative_eq!(v, ((100.0 + 400.0 + 900.0) / 3.0f32).sqrt(), epsilon = 1e-4);
        assert_relative_eq!(v, 21.602, epsilon = 1e-3);
    }

    #[test]
    fn rms_of_empty_or_silent_input_is_zero() {
        assert_eq!(rms(Vec::<f32>::new()), 0.0);
        assert_eq!(rms([0u8; 64]), 0.0);
    }

    #[test]
    fn rms_is_positive_when_any_sample_is_nonzero() {
        assert!(rms([0.0f32, 0.0, 0.5]) > 0.0);
        assert_relative_eq!(rms([4.0f32]), 4.0);
    }

    #[test]
    fn map_range_hits_both_ends_exactly() {
        assert_eq!(map_range(3.0, 3.0, 11.0, 0.0, 100.0), 0.0);
        assert_eq!(map_range(11.0, 3.0, 11.0, 0.0, 100.0), 100.0);
        assert_eq!(map_range(21.6, 0.0, 21.6, 0.0, 100.0), 100.0);
    }

    #[test]
    fn map_range_degenerate_input_returns_out_min() {
        assert_eq!(map_range(5.0, 0.0, 0.0, 10.0, 20.0), 10.0);
        assert!(!map_range(0.0, 0.0, 0.0, 0.0, 100.0).is_nan());
    }

    #[test]
    fn map_range_is_unclamped() {
        assert_relative_eq!(map_range(20.0, 0.0, 10.0, 0.0, 100.0), 200.0);
    }
}
