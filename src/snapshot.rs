//! Hands completed analysis frames from the audio thread to a reader thread.
//!
//! [`SpectrumAnalyzer::update`](crate::audio::analysis::SpectrumAnalyzer::update)
//! rewrites its arrays in place, so a reader sharing the analyzer could see
//! half of one frame and half of the next. The publisher copies each finished
//! frame into a triple buffer's back slot and swaps it in atomically; the reader
//! only ever sees whole frames.

use triple_buffer::{Input, Output, TripleBuffer};

use crate::audio::features::AnalysisFrame;

pub struct FramePublisher {
    input: Input<AnalysisFrame>,
}

pub struct FrameReader {
    output: Output<AnalysisFrame>,
}

/// Creates a connected publisher/reader pair seeded with `initial`.
pub fn channel(initial: &AnalysisFrame) -> (FramePublisher, FrameReader) {
    let (input, output) = TripleBuffer::new(initial).split();
    (FramePublisher { input }, FrameReader { output })
}

impl FramePublisher {
    /// Copies `frame` into the back buffer, reusing its allocations, and publishes it.
    pub fn publish(&mut self, frame: &AnalysisFrame) {
        self.input.input_buffer().clone_from(frame);
        self.input.publish();
    }
}

impl FrameReader {
    /// Whether a frame was published since the last call to [`latest`](Self::latest).
    pub fn has_update(&self) -> bool {
        self.output.updated()
    }

    /// The most recently published complete frame.
    pub fn latest(&mut self) -> &AnalysisFrame {
        self.output.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::analysis::SpectrumAnalyzer;
    use std::thread;

    #[test]
    fn reader_sees_published_frames() {
        let mut analyzer = SpectrumAnalyzer::new(8, 0.9).unwrap();
        let (mut publisher, mut reader) = channel(analyzer.frame());
        assert!(!reader.has_update());
        assert_eq!(reader.latest().peak_volume(), 0.0);

        analyzer.update(&[0, 10, 20, 30], &[0.0; 4]).unwrap();
        publisher.publish(analyzer.frame());
        assert!(reader.has_update());
        assert_eq!(reader.latest(), analyzer.frame());
        assert!(!reader.has_update());
    }

    #[test]
    fn frames_from_another_thread_are_never_torn() {
        let mut analyzer = SpectrumAnalyzer::new(64, 0.5).unwrap();
        let (mut publisher, mut reader) = channel(analyzer.frame());

        let writer = thread::spawn(move || {
            for level in 1..=200u8 {
                analyzer.update(&[level; 32], &[0.0; 32]).unwrap();
                publisher.publish(analyzer.frame());
            }
        });

        while !writer.is_finished() {
            let frame = reader.latest();
            let first = frame.raw_spectrum()[0];
            assert!(frame.raw_spectrum().iter().all(|&m| m == first));
        }
        writer.join().unwrap();
        assert_eq!(reader.latest().raw_spectrum()[0], 200);
    }
}
