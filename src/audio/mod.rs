pub mod analysis;
pub mod bands;
pub mod decode;
pub mod features;
pub mod loudness;
pub mod mix;
pub mod source;
pub mod transform;
