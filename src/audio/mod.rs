//! Audio loading for corpus WAV files.
//!
//! These helpers keep audio handling separate from the dataset itself,
//! focusing on reading waveforms and converting them to the mono feature
//! rate the loader works at.

pub mod io;
pub mod resample;

use anyhow::Result;
use std::path::Path;

/// Load a WAV file as a mono waveform at `sample_rate`, mixing down
/// multi-channel audio and resampling as needed.
pub fn load_mono(path: impl AsRef<Path>, sample_rate: u32) -> Result<Vec<f32>> {
    let (channels, source_rate) = io::WavIo::read_wav(path)?;
    resample::AudioResampler::to_mono(channels, source_rate, sample_rate)
}
