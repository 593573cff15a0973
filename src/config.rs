//! Dataset configuration loaded from YAML files using [`load_config`].

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::excerpt::{EXCERPT_FRAMES, TARGET_SAMPLE_RATE};

/// Audio extension used when none is configured.
pub const DEFAULT_AUDIO_EXT: &str = ".wav";

/// On-disk corpus layout and excerpt parameters.
///
/// # Example YAML
///
/// ```yaml
/// root_dir: /data/speech/train
/// ext: ".wav"
/// filelist: train_files.txt   # optional; recursive scan when absent
/// sample_rate: 16000
/// excerpt_frames: 75
/// seed: 42                    # optional; unseeded when absent
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetConfig {
    /// Corpus root directory.
    pub root_dir: PathBuf,
    /// Audio file extension, including the leading dot.
    #[serde(default = "default_ext")]
    pub ext: String,
    /// Optional file list with one audio path per line, relative to `root_dir`.
    #[serde(default)]
    pub filelist: Option<PathBuf>,
    /// Sample rate audio is converted to, in Hz.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Excerpt length in feature frames.
    #[serde(default = "default_excerpt_frames")]
    pub excerpt_frames: usize,
    /// Seed for deterministic excerpt offsets.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_ext() -> String {
    DEFAULT_AUDIO_EXT.to_string()
}

fn default_sample_rate() -> u32 {
    TARGET_SAMPLE_RATE
}

fn default_excerpt_frames() -> usize {
    EXCERPT_FRAMES
}

/// Load a dataset configuration from a YAML file.
///
/// Relative `root_dir` and `filelist` entries are resolved against the
/// config file's directory.
///
/// # Errors
///
/// Returns an error if the file doesn't exist or contains invalid YAML.
pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<DatasetConfig> {
    let path = path.as_ref();
    if !path.exists() {
        anyhow::bail!("Config file not found: {}", path.display());
    }

    let data = fs::read_to_string(path)?;
    let mut config: DatasetConfig = serde_yaml::from_str(&data)?;
    config.root_dir = resolve_relative_path(path, &config.root_dir);
    if let Some(filelist) = config.filelist.take() {
        config.filelist = Some(resolve_relative_path(path, &filelist));
    }
    Ok(config)
}

/// Resolve a possibly relative path against a config file location.
fn resolve_relative_path(config_path: &Path, maybe_relative: &Path) -> PathBuf {
    if maybe_relative.is_absolute() {
        return maybe_relative.to_path_buf();
    }
    config_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(maybe_relative)
}
