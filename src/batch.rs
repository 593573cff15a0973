//! Collation of [`AudioFeatsItem`]s into batched tensors.

use burn::data::dataloader::batcher::Batcher;
use burn::tensor::backend::Backend;
use burn::tensor::{Tensor, TensorData};

use crate::dataset::AudioFeatsItem;

/// Collates loaded items into `[batch, ...]` tensors on the dataloader's
/// device. Stateless; all examples already share one excerpt length.
#[derive(Clone, Debug, Default)]
pub struct AudioFeatsBatcher;

/// One batch of aligned training examples.
#[derive(Clone, Debug)]
pub struct AudioFeatsBatch<B: Backend> {
    /// Waveforms, `[batch, 1, frames * SAMPLES_PER_FRAME]`.
    pub waveform: Tensor<B, 3>,
    /// Pitch curves, `[batch, 1, frames]`.
    pub pitch: Tensor<B, 3>,
    /// Energy curves, `[batch, 1, frames]`.
    pub energy: Tensor<B, 3>,
    /// Hubert embeddings, `[batch, frames, dim]`.
    pub hubert: Tensor<B, 3>,
}

impl<B: Backend> Batcher<B, AudioFeatsItem, AudioFeatsBatch<B>> for AudioFeatsBatcher {
    fn batch(&self, items: Vec<AudioFeatsItem>, device: &B::Device) -> AudioFeatsBatch<B> {
        assert!(!items.is_empty(), "cannot collate an empty batch");
        let samples = items[0].waveform.len();
        let frames = items[0].pitch.len();
        let dim = items[0].hubert.first().map(|row| row.len()).unwrap_or(0);

        let batch = items.len();
        let mut waveform = Vec::with_capacity(batch * samples);
        let mut pitch = Vec::with_capacity(batch * frames);
        let mut energy = Vec::with_capacity(batch * frames);
        let mut hubert = Vec::with_capacity(batch * frames * dim);
        for item in &items {
            assert_eq!(
                item.waveform.len(),
                samples,
                "ragged waveform lengths in batch"
            );
            assert_eq!(item.pitch.len(), frames, "ragged pitch lengths in batch");
            assert_eq!(item.energy.len(), frames, "ragged energy lengths in batch");
            assert_eq!(item.hubert.len(), frames, "ragged hubert lengths in batch");
            waveform.extend_from_slice(&item.waveform);
            pitch.extend_from_slice(&item.pitch);
            energy.extend_from_slice(&item.energy);
            for row in &item.hubert {
                assert_eq!(row.len(), dim, "ragged hubert dims in batch");
                hubert.extend_from_slice(row);
            }
        }

        AudioFeatsBatch {
            waveform: Tensor::from_data(TensorData::new(waveform, [batch, 1, samples]), device),
            pitch: Tensor::from_data(TensorData::new(pitch, [batch, 1, frames]), device),
            energy: Tensor::from_data(TensorData::new(energy, [batch, 1, frames]), device),
            hubert: Tensor::from_data(TensorData::new(hubert, [batch, frames, dim]), device),
        }
    }
}
