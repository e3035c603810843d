/// Upper edge of the bass band, inclusive.
pub const BASS_MAX_HZ: f32 = 200.0;
/// Upper edge of the mids band, inclusive.
pub const MIDS_MAX_HZ: f32 = 6000.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Band {
    Bass,
    Mids,
    Highs,
}

impl Band {
    pub fn classify(freq_hz: f32) -> Band {
        if freq_hz <= BASS_MAX_HZ {
            Band::Bass
        } else if freq_hz <= MIDS_MAX_HZ {
            Band::Mids
        } else {
            Band::Highs
        }
    }
}

/// Centre frequency of FFT bin `index`.
pub fn bin_frequency(index: usize, sample_rate: u32, fft_size: usize) -> f32 {
    index as f32 * sample_rate as f32 / fft_size as f32
}

/// Bin values split by frequency band, each already mapped to 0-100 against
/// the running peak.
///
/// `snares` is reserved and never populated.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BandMix {
    pub bass: Vec<f32>,
    pub mids: Vec<f32>,
    pub highs: Vec<f32>,
    pub snares: Vec<f32>,
}

impl BandMix {
    pub fn push(&mut self, band: Band, value: f32) {
        match band {
            Band::Bass => self.bass.push(value),
            Band::Mids => self.mids.push(value),
            Band::Highs => self.highs.push(value),
        }
    }
}
