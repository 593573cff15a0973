//! Feature sidecar files.
//!
//! Every corpus utterance `X.wav` has three sidecars next to it, one tensor
//! per file in SafeTensors format:
//!
//! * `X.pitch.safetensors` holds tensor `pitch`, shape `[T]` or `[1, T]`
//! * `X.energy.safetensors` holds tensor `energy`, shape `[T]` or `[1, T]`
//! * `X.hubert.safetensors` holds tensor `hubert`, shape `[T, D]` or `[T]`
//!
//! All tensors are stored as `F32`; other dtypes are rejected.

use anyhow::Result;
use safetensors::SafeTensors;
use std::path::{Path, PathBuf};

/// The three per-utterance feature kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// Fundamental-frequency curve, one value per frame.
    Pitch,
    /// Frame energy curve.
    Energy,
    /// Hubert embedding sequence, one vector per frame.
    Hubert,
}

impl FeatureKind {
    /// Name of the tensor stored in the sidecar file.
    pub fn tensor_name(self) -> &'static str {
        match self {
            FeatureKind::Pitch => "pitch",
            FeatureKind::Energy => "energy",
            FeatureKind::Hubert => "hubert",
        }
    }

    /// Filename suffix that replaces the audio extension.
    pub fn suffix(self) -> &'static str {
        match self {
            FeatureKind::Pitch => ".pitch.safetensors",
            FeatureKind::Energy => ".energy.safetensors",
            FeatureKind::Hubert => ".hubert.safetensors",
        }
    }
}

/// Derive the sidecar path for `audio_path` by swapping the trailing audio
/// extension for the feature suffix.
pub fn sidecar_path(audio_path: &Path, ext: &str, kind: FeatureKind) -> Result<PathBuf> {
    let name = audio_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid audio path: {}", audio_path.display()))?;
    let stem = name.strip_suffix(ext).ok_or_else(|| {
        anyhow::anyhow!(
            "Audio file {} does not end with {ext}",
            audio_path.display()
        )
    })?;
    Ok(audio_path.with_file_name(format!("{stem}{}", kind.suffix())))
}

/// A raw feature tensor decoded from a sidecar file.
#[derive(Debug, Clone)]
pub struct FeatureTensor {
    /// Tensor shape as stored on disk.
    pub shape: Vec<usize>,
    /// Row-major tensor values.
    pub values: Vec<f32>,
}

impl FeatureTensor {
    /// Interpret as a per-frame scalar curve (`[T]` or `[1, T]`).
    pub fn into_curve(self) -> Result<Vec<f32>> {
        match self.shape.as_slice() {
            [_] | [1, _] => Ok(self.values),
            other => anyhow::bail!("Expected a [T] or [1, T] curve, got shape {other:?}"),
        }
    }

    /// Interpret as a `[T, D]` embedding sequence. A flat `[T]` tensor is
    /// treated as `D = 1`.
    pub fn into_rows(self) -> Result<Vec<Vec<f32>>> {
        match self.shape.as_slice() {
            [_] => Ok(self.values.into_iter().map(|v| vec![v]).collect()),
            [t, d] => {
                let (t, d) = (*t, *d);
                if d == 0 {
                    anyhow::bail!("Embedding tensor has zero width (shape [{t}, 0])");
                }
                let mut rows = Vec::with_capacity(t);
                for chunk in self.values.chunks_exact(d) {
                    rows.push(chunk.to_vec());
                }
                Ok(rows)
            }
            other => anyhow::bail!("Expected [T, D] or [T] embeddings, got shape {other:?}"),
        }
    }
}

/// Read the single named tensor out of a sidecar file.
pub fn read_feature(path: &Path, kind: FeatureKind) -> Result<FeatureTensor> {
    let bytes = std::fs::read(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    let tensors = SafeTensors::deserialize(&bytes)
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {e}", path.display()))?;
    let view = tensors.tensor(kind.tensor_name()).map_err(|e| {
        anyhow::anyhow!(
            "No `{}` tensor in {}: {e}",
            kind.tensor_name(),
            path.display()
        )
    })?;
    match view.dtype() {
        safetensors::Dtype::F32 => {}
        other => anyhow::bail!(
            "Unsupported {} dtype {other:?} in {} (expected F32)",
            kind.tensor_name(),
            path.display()
        ),
    }
    let mut values = Vec::with_capacity(view.data().len() / 4);
    for chunk in view.data().chunks_exact(4) {
        values.push(f32::from_le_bytes(chunk.try_into().unwrap()));
    }
    Ok(FeatureTensor {
        shape: view.shape().to_vec(),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::{read_feature, sidecar_path, FeatureKind, FeatureTensor};
    use safetensors::tensor::TensorView;
    use safetensors::Dtype;
    use std::collections::HashMap;
    use std::path::Path;

    /// Write a single-tensor SafeTensors file.
    fn write_feature_file(path: &Path, name: &str, dtype: Dtype, shape: Vec<usize>, data: &[u8]) {
        let view = TensorView::new(dtype, shape, data).expect("tensor view");
        let mut tensors = HashMap::new();
        tensors.insert(name.to_string(), view);
        let bytes = safetensors::serialize(&tensors, &None).expect("serialize safetensors");
        std::fs::write(path, bytes).expect("write safetensors");
    }

    fn f32_bytes(values: &[f32]) -> Vec<u8> {
        values.iter().copied().flat_map(f32::to_le_bytes).collect()
    }

    #[test]
    fn sidecar_path_swaps_trailing_extension() {
        let path = sidecar_path(Path::new("corpus/spk1/utt.wav"), ".wav", FeatureKind::Pitch)
            .expect("sidecar path");
        assert_eq!(path, Path::new("corpus/spk1/utt.pitch.safetensors"));
    }

    #[test]
    fn sidecar_path_only_touches_the_suffix() {
        let path = sidecar_path(Path::new("take.wav.2.wav"), ".wav", FeatureKind::Hubert)
            .expect("sidecar path");
        assert_eq!(path, Path::new("take.wav.2.hubert.safetensors"));
    }

    #[test]
    fn sidecar_path_rejects_mismatched_extension() {
        let err = sidecar_path(Path::new("utt.flac"), ".wav", FeatureKind::Energy).unwrap_err();
        assert!(err.to_string().contains("does not end with .wav"));
    }

    #[test]
    fn read_feature_roundtrips_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("utt.pitch.safetensors");
        let values = [110.0_f32, 112.5, 0.0, 99.75];
        write_feature_file(&path, "pitch", Dtype::F32, vec![1, 4], &f32_bytes(&values));

        let tensor = read_feature(&path, FeatureKind::Pitch).expect("read feature");
        assert_eq!(tensor.shape, [1, 4]);
        assert_eq!(tensor.values, values);
    }

    #[test]
    fn read_feature_requires_the_expected_tensor_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("utt.energy.safetensors");
        write_feature_file(&path, "loudness", Dtype::F32, vec![2], &f32_bytes(&[1.0, 2.0]));

        let err = read_feature(&path, FeatureKind::Energy).unwrap_err();
        assert!(err.to_string().contains("No `energy` tensor"));
    }

    #[test]
    fn read_feature_rejects_non_f32() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("utt.energy.safetensors");
        let data: Vec<u8> = 1.0_f64
            .to_le_bytes()
            .into_iter()
            .chain(2.0_f64.to_le_bytes())
            .collect();
        write_feature_file(&path, "energy", Dtype::F64, vec![2], &data);

        let err = read_feature(&path, FeatureKind::Energy).unwrap_err();
        assert!(err.to_string().contains("Unsupported energy dtype"));
    }

    #[test]
    fn read_feature_reports_missing_file() {
        let err = read_feature(Path::new("/nonexistent/utt.pitch.safetensors"), FeatureKind::Pitch)
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn read_feature_names_a_corrupt_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("utt.pitch.safetensors");
        std::fs::write(&path, b"not a safetensors header").expect("write corrupt file");

        let err = read_feature(&path, FeatureKind::Pitch).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
        assert!(err.to_string().contains("utt.pitch.safetensors"));
    }

    #[test]
    fn curve_accepts_flat_and_row_layouts() {
        let flat = FeatureTensor {
            shape: vec![3],
            values: vec![1.0, 2.0, 3.0],
        };
        assert_eq!(flat.into_curve().expect("flat curve"), [1.0, 2.0, 3.0]);

        let row = FeatureTensor {
            shape: vec![1, 3],
            values: vec![1.0, 2.0, 3.0],
        };
        assert_eq!(row.into_curve().expect("row curve"), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn curve_rejects_multi_channel_layouts() {
        let tensor = FeatureTensor {
            shape: vec![2, 3],
            values: vec![0.0; 6],
        };
        assert!(tensor.into_curve().is_err());
    }

    #[test]
    fn rows_split_by_embedding_dim() {
        let tensor = FeatureTensor {
            shape: vec![2, 3],
            values: vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0],
        };
        let rows = tensor.into_rows().expect("rows");
        assert_eq!(rows, vec![vec![0.0, 1.0, 2.0], vec![10.0, 11.0, 12.0]]);
    }

    #[test]
    fn flat_rows_become_single_dim() {
        let tensor = FeatureTensor {
            shape: vec![3],
            values: vec![7.0, 8.0, 9.0],
        };
        let rows = tensor.into_rows().expect("rows");
        assert_eq!(rows, vec![vec![7.0], vec![8.0], vec![9.0]]);
    }

    #[test]
    fn rows_reject_higher_rank_tensors() {
        let tensor = FeatureTensor {
            shape: vec![2, 2, 2],
            values: vec![0.0; 8],
        };
        assert!(tensor.into_rows().is_err());
    }
}
