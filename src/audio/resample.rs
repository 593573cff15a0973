use anyhow::Result;
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

/// Sample-rate and channel conversion for corpus audio.
#[derive(Debug, Default)]
pub struct AudioResampler;

impl AudioResampler {
    /// Mix `samples` down to mono and resample from `from_rate` to `to_rate`.
    ///
    /// Empty input stays empty; matching rates skip the resampler entirely.
    pub fn to_mono(samples: Vec<Vec<f32>>, from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
        let mixed = downmix(samples)?;
        if from_rate == to_rate || mixed.is_empty() {
            return Ok(mixed);
        }

        let input_len = mixed.len();
        let ratio = to_rate as f64 / from_rate as f64;
        let params = SincInterpolationParameters {
            sinc_len: 256,
            f_cutoff: 0.95,
            interpolation: SincInterpolationType::Linear,
            oversampling_factor: 256,
            window: WindowFunction::BlackmanHarris2,
        };
        let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, input_len, 1)?;
        let mut output = resampler.process(&[mixed], None)?;
        output
            .pop()
            .ok_or_else(|| anyhow::anyhow!("Resampler produced no output"))
    }
}

/// Average all channels into one.
fn downmix(samples: Vec<Vec<f32>>) -> Result<Vec<f32>> {
    if samples.len() <= 1 {
        return Ok(samples.into_iter().next().unwrap_or_default());
    }
    let channels = samples.len();
    let len = samples[0].len();
    let mut mixed = vec![0.0_f32; len];
    for channel in &samples {
        if channel.len() != len {
            anyhow::bail!("Channel length mismatch in audio downmix");
        }
        for (idx, value) in channel.iter().enumerate() {
            mixed[idx] += *value;
        }
    }
    let scale = 1.0 / channels as f32;
    for value in &mut mixed {
        *value *= scale;
    }
    Ok(mixed)
}
