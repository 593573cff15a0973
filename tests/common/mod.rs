//! Shared helpers for synthesizing corpus fixtures.
//!
//! Fixture content is frame-coded so tests can see which excerpt window a
//! loaded example came from: for frame `t`, `pitch[t] = t`,
//! `energy[t] = 1000 + t`, `hubert[t][j] = t * 10 + j`, and every waveform
//! sample in frame `t` holds `t / 100` (within 16-bit quantization).

use audiofeats::audio::io::WavIo;
use audiofeats::excerpt::SAMPLES_PER_FRAME;
use safetensors::tensor::TensorView;
use safetensors::Dtype;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub type TestBackend = burn_ndarray::NdArray<f32>;

/// Write a mono 16-bit WAV where every sample in frame `t` has value `t / 100`.
pub fn write_frame_coded_wav(path: &Path, frames: usize, sample_rate: u32) {
    let mut samples = Vec::with_capacity(frames * SAMPLES_PER_FRAME);
    for frame in 0..frames {
        let value = frame as f32 / 100.0;
        for _ in 0..SAMPLES_PER_FRAME {
            samples.push(value);
        }
    }
    WavIo::write_wav(path, &[samples], sample_rate).expect("write wav");
}

/// Write a single-tensor SafeTensors sidecar.
pub fn write_feature_file(path: &Path, name: &str, shape: Vec<usize>, values: &[f32]) {
    let bytes: Vec<u8> = values.iter().copied().flat_map(f32::to_le_bytes).collect();
    let view = TensorView::new(Dtype::F32, shape, &bytes).expect("tensor view");
    let mut tensors = HashMap::new();
    tensors.insert(name.to_string(), view);
    let serialized = safetensors::serialize(&tensors, &None).expect("serialize safetensors");
    fs::write(path, serialized).expect("write safetensors");
}

/// Synthesize one corpus entry: `<rel>.wav` plus frame-coded pitch, energy
/// and hubert sidecars with `frames` frames and hubert dimension `dim`.
pub fn synth_entry(root: &Path, rel: &str, frames: usize, dim: usize) {
    let wav_path = root.join(format!("{rel}.wav"));
    if let Some(parent) = wav_path.parent() {
        fs::create_dir_all(parent).expect("create corpus subdir");
    }
    write_frame_coded_wav(&wav_path, frames, 16_000);

    let pitch: Vec<f32> = (0..frames).map(|t| t as f32).collect();
    let energy: Vec<f32> = (0..frames).map(|t| 1000.0 + t as f32).collect();
    let mut hubert = Vec::with_capacity(frames * dim);
    for t in 0..frames {
        for j in 0..dim {
            hubert.push((t * 10 + j) as f32);
        }
    }

    // Pitch is stored [1, T] and energy [T] to cover both curve layouts.
    write_feature_file(
        &root.join(format!("{rel}.pitch.safetensors")),
        "pitch",
        vec![1, frames],
        &pitch,
    );
    write_feature_file(
        &root.join(format!("{rel}.energy.safetensors")),
        "energy",
        vec![frames],
        &energy,
    );
    write_feature_file(
        &root.join(format!("{rel}.hubert.safetensors")),
        "hubert",
        vec![frames, dim],
        &hubert,
    );
}
