//! Corpus enumeration and per-utterance example loading.

use anyhow::Result;
use burn::data::dataset::Dataset;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::fs;
use std::path::{Path, PathBuf};

use crate::audio;
use crate::config::{DatasetConfig, DEFAULT_AUDIO_EXT};
use crate::excerpt::{self, Window, EXCERPT_FRAMES, SAMPLES_PER_FRAME, TARGET_SAMPLE_RATE};
use crate::features::{self, FeatureKind};

/// One training example: a waveform plus frame-aligned features, all cut to
/// the same excerpt window.
#[derive(Debug, Clone)]
pub struct AudioFeatsItem {
    /// Mono waveform, `excerpt_frames * SAMPLES_PER_FRAME` samples.
    pub waveform: Vec<f32>,
    /// Pitch curve, one value per frame.
    pub pitch: Vec<f32>,
    /// Energy curve, one value per frame.
    pub energy: Vec<f32>,
    /// Hubert embeddings, one row per frame.
    pub hubert: Vec<Vec<f32>>,
}

/// A corpus of utterance WAVs with feature sidecars.
///
/// Entries come either from a recursive directory scan or from a file list.
/// Loading an entry reads the audio and the three sidecars, then cuts all
/// four to one excerpt window: a random offset for utterances longer than
/// the window, zero-padding for shorter ones. The hubert time axis defines
/// the utterance's frame count.
#[derive(Debug, Clone)]
pub struct AudioFeatsDataset {
    entries: Vec<PathBuf>,
    ext: String,
    sample_rate: u32,
    excerpt_frames: usize,
    seed: Option<u64>,
}

impl AudioFeatsDataset {
    /// Scan `root_dir` recursively for `.wav` files, in sorted order.
    pub fn scan(root_dir: impl AsRef<Path>) -> Result<Self> {
        Self::scan_ext(root_dir, DEFAULT_AUDIO_EXT)
    }

    /// Scan `root_dir` recursively for audio files ending in `ext`.
    pub fn scan_ext(root_dir: impl AsRef<Path>, ext: &str) -> Result<Self> {
        let root_dir = root_dir.as_ref();
        let mut entries = Vec::new();
        collect_audio_files(root_dir, ext, &mut entries)
            .map_err(|e| anyhow::anyhow!("Failed to scan {}: {e}", root_dir.display()))?;
        entries.sort();
        log::debug!(
            "found {} {ext} files under {}",
            entries.len(),
            root_dir.display()
        );
        Ok(Self::from_entries(entries, ext))
    }

    /// Build the corpus from a file list with one `.wav` path per line,
    /// relative to `root_dir`. Order is preserved; blank lines are skipped.
    pub fn from_filelist(
        root_dir: impl AsRef<Path>,
        filelist: impl AsRef<Path>,
    ) -> Result<Self> {
        Self::from_filelist_ext(root_dir, filelist, DEFAULT_AUDIO_EXT)
    }

    /// Build the corpus from a file list of audio paths ending in `ext`.
    pub fn from_filelist_ext(
        root_dir: impl AsRef<Path>,
        filelist: impl AsRef<Path>,
        ext: &str,
    ) -> Result<Self> {
        let filelist = filelist.as_ref();
        let data = fs::read_to_string(filelist)
            .map_err(|e| anyhow::anyhow!("Failed to read file list {}: {e}", filelist.display()))?;
        let root_dir = root_dir.as_ref();
        let entries: Vec<PathBuf> = data
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| root_dir.join(line))
            .collect();
        log::debug!(
            "file list {} names {} entries",
            filelist.display(),
            entries.len()
        );
        Ok(Self::from_entries(entries, ext))
    }

    /// Build the corpus described by `config`.
    pub fn from_config(config: &DatasetConfig) -> Result<Self> {
        let mut dataset = match config.filelist.as_ref() {
            Some(filelist) => Self::from_filelist_ext(&config.root_dir, filelist, &config.ext)?,
            None => Self::scan_ext(&config.root_dir, &config.ext)?,
        };
        dataset.sample_rate = config.sample_rate;
        dataset.excerpt_frames = config.excerpt_frames;
        dataset.seed = config.seed;
        Ok(dataset)
    }

    fn from_entries(entries: Vec<PathBuf>, ext: &str) -> Self {
        if entries.is_empty() {
            log::warn!("corpus is empty");
        }
        Self {
            entries,
            ext: ext.to_string(),
            sample_rate: TARGET_SAMPLE_RATE,
            excerpt_frames: EXCERPT_FRAMES,
            seed: None,
        }
    }

    /// Fix excerpt offsets to a deterministic per-index stream.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Paths of all corpus entries, in iteration order.
    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    /// Number of corpus entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the corpus has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load the example at `index`.
    ///
    /// Reads the waveform and the pitch/energy/hubert sidecars, then cuts
    /// all four to the excerpt window. The waveform is windowed at
    /// [`SAMPLES_PER_FRAME`] samples per frame and always comes back exactly
    /// `excerpt_frames * SAMPLES_PER_FRAME` samples long.
    pub fn load(&self, index: usize) -> Result<AudioFeatsItem> {
        let audio_path = self.entries.get(index).ok_or_else(|| {
            anyhow::anyhow!(
                "Corpus index {index} out of range ({} entries)",
                self.entries.len()
            )
        })?;

        let waveform = audio::load_mono(audio_path, self.sample_rate)
            .map_err(|e| anyhow::anyhow!("Failed to load {}: {e}", audio_path.display()))?;
        let pitch = self.load_curve(audio_path, FeatureKind::Pitch)?;
        let energy = self.load_curve(audio_path, FeatureKind::Energy)?;
        let hubert_path = features::sidecar_path(audio_path, &self.ext, FeatureKind::Hubert)?;
        let hubert = features::read_feature(&hubert_path, FeatureKind::Hubert)?
            .into_rows()
            .map_err(|e| anyhow::anyhow!("{}: {e}", hubert_path.display()))?;

        let feature_len = hubert.len();
        let dim = hubert.first().map(|row| row.len()).unwrap_or(1);
        let window = self.choose_window(index, feature_len);

        Ok(AudioFeatsItem {
            waveform: excerpt::cut(&waveform, window.scaled(SAMPLES_PER_FRAME)),
            pitch: excerpt::cut(&pitch, window),
            energy: excerpt::cut(&energy, window),
            hubert: excerpt::cut_rows(&hubert, dim, window),
        })
    }

    fn load_curve(&self, audio_path: &Path, kind: FeatureKind) -> Result<Vec<f32>> {
        let path = features::sidecar_path(audio_path, &self.ext, kind)?;
        features::read_feature(&path, kind)?
            .into_curve()
            .map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))
    }

    fn choose_window(&self, index: usize, feature_len: usize) -> Window {
        match self.seed {
            Some(seed) => {
                let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(index as u64));
                excerpt::choose_window(feature_len, self.excerpt_frames, &mut rng)
            }
            None => excerpt::choose_window(
                feature_len,
                self.excerpt_frames,
                &mut rand::thread_rng(),
            ),
        }
    }
}

impl Dataset<AudioFeatsItem> for AudioFeatsDataset {
    /// Load the example at `index`, or `None` past the end of the corpus.
    ///
    /// # Panics
    ///
    /// Panics if the entry exists but cannot be loaded (missing or malformed
    /// audio or sidecar files). The dataloader has no error channel, and a
    /// broken corpus entry should stop training rather than be skipped
    /// silently. Use [`AudioFeatsDataset::load`] for fallible access.
    fn get(&self, index: usize) -> Option<AudioFeatsItem> {
        if index >= self.entries.len() {
            return None;
        }
        match self.load(index) {
            Ok(item) => Some(item),
            Err(e) => panic!("failed to load corpus example {index}: {e:#}"),
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Recursively collect files under `dir` whose names end in `ext`.
fn collect_audio_files(dir: &Path, ext: &str, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_audio_files(&path, ext, out)?;
        } else if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(ext))
        {
            out.push(path);
        }
    }
    Ok(())
}
