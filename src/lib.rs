//! # audiofeats - Aligned speech-feature dataset loading
//!
//! Loads a corpus of utterance WAVs with pre-extracted feature sidecars and
//! yields fixed-length training examples in which every artifact covers the
//! same stretch of time. Each example carries four aligned pieces:
//!
//! 1. **Waveform**: mono audio at 16 kHz, [`SAMPLES_PER_FRAME`] samples per
//!    feature frame.
//! 2. **Pitch**: one fundamental-frequency value per frame.
//! 3. **Energy**: one energy value per frame.
//! 4. **Hubert**: one embedding vector per frame.
//!
//! Utterances longer than the [`EXCERPT_FRAMES`] window are cropped at a
//! random frame offset; shorter ones are zero-padded. The crop offset is
//! shared across all four artifacts, so they stay frame-synchronous.
//!
//! ## Corpus layout
//!
//! Sidecars sit next to each audio file, named by swapping the audio
//! extension:
//!
//! ```text
//! corpus/
//!   spk1/
//!     utt1.wav
//!     utt1.pitch.safetensors    # tensor "pitch",  [T] or [1, T]
//!     utt1.energy.safetensors   # tensor "energy", [T] or [1, T]
//!     utt1.hubert.safetensors   # tensor "hubert", [T, D] or [T]
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use audiofeats::{AudioFeatsBatcher, AudioFeatsDataset};
//! use burn::data::dataloader::{DataLoader, DataLoaderBuilder};
//! use burn_ndarray::NdArray;
//!
//! let dataset = AudioFeatsDataset::scan("corpus/").unwrap().with_seed(42);
//! let loader = DataLoaderBuilder::<NdArray<f32>, _, _>::new(AudioFeatsBatcher)
//!     .batch_size(16)
//!     .shuffle(42)
//!     .num_workers(4)
//!     .build(dataset);
//!
//! for batch in loader.iter() {
//!     // waveform [batch, 1, 24000], pitch/energy [batch, 1, 75],
//!     // hubert [batch, 75, dim]
//!     println!("waveform {:?}", batch.waveform.dims());
//! }
//! ```
//!
//! ## Configuration
//!
//! Corpora can also be described by a YAML file and opened with
//! [`load_config`] plus [`AudioFeatsDataset::from_config`]. See
//! [`DatasetConfig`] for the schema.

pub mod audio;
pub mod batch;
pub mod config;
pub mod dataset;
pub mod excerpt;
pub mod features;

pub use batch::{AudioFeatsBatch, AudioFeatsBatcher};
pub use config::{load_config, DatasetConfig, DEFAULT_AUDIO_EXT};
pub use dataset::{AudioFeatsDataset, AudioFeatsItem};
pub use excerpt::{EXCERPT_FRAMES, SAMPLES_PER_FRAME, TARGET_SAMPLE_RATE};
