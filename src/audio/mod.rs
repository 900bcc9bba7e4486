//! Audio loading.

mod decode;

pub use decode::{Waveform, load_waveform};
