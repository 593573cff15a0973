//! Command-line interface for inspecting audio-feature corpora.
//!
//! Wraps the dataset loader to list corpus entries, inspect individual
//! examples, and verify that every entry loads cleanly.

use anyhow::Result;
use audiofeats::batch::{AudioFeatsBatch, AudioFeatsBatcher};
use audiofeats::config::{load_config, DEFAULT_AUDIO_EXT};
use audiofeats::dataset::AudioFeatsDataset;
use burn::data::dataloader::batcher::Batcher;
use burn_ndarray::{NdArray, NdArrayDevice};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "audiofeats")]
#[command(about = "Inspect aligned speech-feature corpora", long_about = None)]
struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// How to locate and read the corpus.
#[derive(Args, Debug, Clone)]
struct CorpusArgs {
    /// Dataset configuration YAML; replaces the flags below.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Corpus root directory.
    #[arg(long)]
    root: Option<PathBuf>,
    /// Audio file extension, including the leading dot.
    #[arg(long, default_value = DEFAULT_AUDIO_EXT)]
    ext: String,
    /// File list with one audio path per line, relative to the root.
    #[arg(long)]
    filelist: Option<PathBuf>,
    /// Seed for deterministic excerpt offsets.
    #[arg(long)]
    seed: Option<u64>,
}

/// CLI subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List corpus entries.
    List {
        /// Corpus location.
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Print only the entry count.
        #[arg(long)]
        count: bool,
    },
    /// Load one example and print its shapes and value ranges.
    Inspect {
        /// Corpus location.
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Corpus index to load.
        index: usize,
        /// Also collate a single-item batch and print tensor shapes.
        #[arg(long)]
        batch: bool,
    },
    /// Load every example once and report entries that fail.
    Verify {
        /// Corpus location.
        #[command(flatten)]
        corpus: CorpusArgs,
    },
}

/// Entry point for the CLI.
fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .try_init();
    let cli = Cli::parse();

    match cli.command {
        Commands::List { corpus, count } => run_list(&corpus, count),
        Commands::Inspect {
            corpus,
            index,
            batch,
        } => run_inspect(&corpus, index, batch),
        Commands::Verify { corpus } => run_verify(&corpus),
    }
}

/// Build the dataset from either a config file or the corpus flags.
fn open_dataset(args: &CorpusArgs) -> Result<AudioFeatsDataset> {
    if let Some(config_path) = args.config.as_ref() {
        let mut config = load_config(config_path)?;
        if let Some(seed) = args.seed {
            config.seed = Some(seed);
        }
        return AudioFeatsDataset::from_config(&config);
    }
    let root = args
        .root
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("Either --config or --root is required"))?;
    let mut dataset = match args.filelist.as_ref() {
        Some(filelist) => AudioFeatsDataset::from_filelist_ext(root, filelist, &args.ext)?,
        None => AudioFeatsDataset::scan_ext(root, &args.ext)?,
    };
    if let Some(seed) = args.seed {
        dataset = dataset.with_seed(seed);
    }
    Ok(dataset)
}

fn run_list(args: &CorpusArgs, count: bool) -> Result<()> {
    let dataset = open_dataset(args)?;
    if count {
        println!("{}", dataset.len());
        return Ok(());
    }
    for path in dataset.entries() {
        println!("{}", path.display());
    }
    Ok(())
}

fn run_inspect(args: &CorpusArgs, index: usize, batch: bool) -> Result<()> {
    let dataset = open_dataset(args)?;
    let item = dataset.load(index)?;
    let path = &dataset.entries()[index];

    println!("entry {index}: {}", path.display());
    println!(
        "  waveform: {} samples, rms {:.4}",
        item.waveform.len(),
        rms(&item.waveform)
    );
    print_curve("pitch", &item.pitch);
    print_curve("energy", &item.energy);
    let dim = item.hubert.first().map(|row| row.len()).unwrap_or(0);
    println!("  hubert: {} frames x {dim}", item.hubert.len());

    if batch {
        let device = NdArrayDevice::default();
        let collated: AudioFeatsBatch<NdArray<f32>> =
            AudioFeatsBatcher.batch(vec![item], &device);
        println!(
            "  batch shapes: waveform {:?}, pitch {:?}, energy {:?}, hubert {:?}",
            collated.waveform.dims(),
            collated.pitch.dims(),
            collated.energy.dims(),
            collated.hubert.dims()
        );
    }
    Ok(())
}

fn run_verify(args: &CorpusArgs) -> Result<()> {
    let dataset = open_dataset(args)?;
    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupt_flag = Arc::clone(&interrupted);
    ctrlc::set_handler(move || {
        interrupt_flag.store(true, Ordering::SeqCst);
    })?;

    let mut failures = 0_usize;
    let mut hubert_dim: Option<usize> = None;
    for index in 0..dataset.len() {
        if interrupted.load(Ordering::SeqCst) {
            anyhow::bail!("Interrupted");
        }
        match dataset.load(index) {
            Ok(item) => {
                let dim = item.hubert.first().map(|row| row.len()).unwrap_or(0);
                match hubert_dim {
                    None => hubert_dim = Some(dim),
                    Some(expected) if expected != dim => {
                        eprintln!(
                            "{}: hubert dim {dim} differs from {expected}",
                            dataset.entries()[index].display()
                        );
                        failures += 1;
                    }
                    Some(_) => {}
                }
            }
            Err(e) => {
                eprintln!("{}: {e:#}", dataset.entries()[index].display());
                failures += 1;
            }
        }
    }

    println!("{} entries, {failures} failed", dataset.len());
    if failures > 0 {
        anyhow::bail!("{failures} corpus entries failed verification");
    }
    Ok(())
}

/// Root mean square of a sample buffer.
fn rms(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: f64 = values.iter().map(|&v| (v as f64) * (v as f64)).sum();
    (sum / values.len() as f64).sqrt() as f32
}

fn print_curve(name: &str, values: &[f32]) {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    let mut sum = 0.0_f64;
    for &value in values {
        min = min.min(value);
        max = max.max(value);
        sum += value as f64;
    }
    let mean = if values.is_empty() {
        0.0
    } else {
        sum / values.len() as f64
    };
    println!(
        "  {name}: {} frames, min {min:.4}, max {max:.4}, mean {mean:.4}",
        values.len()
    );
}
