//! Fixed-length excerpt alignment for frame-synchronous features.
//!
//! Training examples are cut to a fixed number of feature frames. Utterances
//! longer than the window are cropped at a random frame offset; shorter ones
//! are zero-padded at the tail. The waveform stays in sync at
//! [`SAMPLES_PER_FRAME`] samples per feature frame.

use rand::Rng;

/// Number of feature frames in a training excerpt.
pub const EXCERPT_FRAMES: usize = 75;

/// Waveform samples per feature frame (20 ms at 16 kHz).
pub const SAMPLES_PER_FRAME: usize = 320;

/// Sample rate corpus audio is converted to before windowing.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// A frame-aligned window into an utterance's feature timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// First feature frame included in the excerpt.
    pub start: usize,
    /// Excerpt length in feature frames.
    pub frames: usize,
}

impl Window {
    /// Scale the window from frame units into another unit (e.g. samples).
    pub fn scaled(self, factor: usize) -> Window {
        Window {
            start: self.start * factor,
            frames: self.frames * factor,
        }
    }
}

/// Choose the excerpt window for an utterance of `feature_len` frames.
///
/// Utterances longer than `frames` get a uniformly random start offset in
/// `[0, feature_len - frames)`; everything else starts at zero and relies on
/// zero-padding during the cut.
pub fn choose_window(feature_len: usize, frames: usize, rng: &mut impl Rng) -> Window {
    let start = if feature_len > frames {
        rng.gen_range(0..feature_len - frames)
    } else {
        0
    };
    Window { start, frames }
}

/// Cut `window` out of `values`, zero-filling past the end of the input.
pub fn cut(values: &[f32], window: Window) -> Vec<f32> {
    let mut out = vec![0.0_f32; window.frames];
    let end = usize::min(window.start + window.frames, values.len());
    if window.start < end {
        let copied = end - window.start;
        out[..copied].copy_from_slice(&values[window.start..end]);
    }
    out
}

/// Cut `window` out of a `[time][dim]` embedding sequence, emitting zero rows
/// of width `dim` past the end of the input.
pub fn cut_rows(rows: &[Vec<f32>], dim: usize, window: Window) -> Vec<Vec<f32>> {
    let mut out = Vec::with_capacity(window.frames);
    for idx in window.start..window.start + window.frames {
        match rows.get(idx) {
            Some(row) => out.push(row.clone()),
            None => out.push(vec![0.0_f32; dim]),
        }
    }
    out
}
