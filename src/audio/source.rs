use super::decode::AudioData;

/// One `fft_size` window of input, as an audio callback would deliver it.
#[derive(Clone, Copy, Debug)]
pub struct SampleWindow<'a> {
    pub index: usize,
    /// Start of the window in seconds.
    pub time: f32,
    pub samples: &'a [f32],
}

/// Walks decoded audio in `fft_size` windows every `hop` samples.
///
/// The last window may be shorter than `fft_size`; the transform zero-pads it.
pub struct FrameSource<'a> {
    audio: &'a AudioData,
    fft_size: usize,
    hop: usize,
    next: usize,
}

impl<'a> FrameSource<'a> {
    pub fn new(audio: &'a AudioData, fft_size: usize, hop: usize) -> Self {
        Self {
            audio,
            fft_size,
            hop: hop.max(1),
            next: 0,
        }
    }

    /// Total number of windows this source yields.
    pub fn frame_count(&self) -> usize {
        let len = self.audio.samples.len();
        if len == 0 {
            return 0;
        }
        (len - 1) / self.hop + 1
    }
}

impl<'a> Iterator for FrameSource<'a> {
    type Item = SampleWindow<'a>;

    fn next(&mut self) -> Option<SampleWindow<'a>> {
        let audio: &'a AudioData = self.audio;
        let samples = &audio.samples;
        let start = self.next.checked_mul(self.hop)?;
        if start >= samples.len() {
            return None;
        }
        let end = (start + self.fft_size).min(samples.len());
        let window = SampleWindow {
            index: self.next,
            time: start as f32 / audio.sample_rate.max(1) as f32,
            samples: &samples[start..end],
        };
        self.next += 1;
        Some(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audio(len: usize) -> AudioData {
        AudioData {
            samples: (0..len).map(|i| i as f32).collect(),
            sample_rate: 10,
        }
    }

    #[test]
    fn hops_through_the_input() {
        let data = audio(10);
        let source = FrameSource::new(&data, 4, 3);
        assert_eq!(source.frame_count(), 4);

        let windows: Vec<_> = source.collect();
        assert_eq!(windows.len(), 4);
        assert_eq!(windows[1].samples, &[3.0, 4.0, 5.0, 6.0]);
        assert_eq!(windows[1].time, 0.3);
        assert_eq!(windows[3].samples, &[9.0]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        let data = audio(0);
        let mut source = FrameSource::new(&data, 4, 4);
        assert_eq!(source.frame_count(), 0);
        assert!(source.next().is_none());
    }
}
