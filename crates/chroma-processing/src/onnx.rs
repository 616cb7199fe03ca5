//! ONNX Runtime backed chrominance model.

use crate::error::ColorizeError;
use crate::network::{load_cluster_centers, ChrominanceModel, ColorizationHead, NUM_BINS};
use ndarray::{Array3, Array4, ArrayView2, ArrayView3, Axis};
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

/// Colorization network loaded once and reused for every prediction.
///
/// The session is guarded by a mutex; concurrent callers queue on it.
pub struct OnnxChrominanceModel {
    session: Mutex<Session>,
    head: ColorizationHead,
}

impl OnnxChrominanceModel {
    /// Load the network from `model_path` and the head from `cluster_centers_path`.
    #[tracing::instrument(skip_all, fields(model = %model_path.display()))]
    pub fn load(model_path: &Path, cluster_centers_path: &Path) -> Result<Self, ColorizeError> {
        let start = Instant::now();
        let load_error = |reason: String| ColorizeError::ModelLoad {
            path: model_path.to_path_buf(),
            reason,
        };

        let head = ColorizationHead::new(load_cluster_centers(cluster_centers_path)?)?;
        let session = Session::builder()
            .map_err(|e| load_error(e.to_string()))?
            .commit_from_file(model_path)
            .map_err(|e| load_error(e.to_string()))?;

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            "Colorization model loaded"
        );

        Ok(Self {
            session: Mutex::new(session),
            head,
        })
    }

    fn forward(&self, input: Array4<f32>) -> Result<(Vec<usize>, Vec<f32>), ColorizeError> {
        let input = Tensor::from_array(input).map_err(|e| ColorizeError::Inference(e.to_string()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| ColorizeError::Inference("model session lock poisoned".to_string()))?;

        let outputs = session
            .run(ort::inputs![input])
            .map_err(|e| ColorizeError::Inference(e.to_string()))?;

        let output = outputs
            .values()
            .next()
            .ok_or_else(|| ColorizeError::ShapeMismatch {
                expected: "one output tensor".to_string(),
                actual: "no output".to_string(),
            })?;

        let (shape, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| ColorizeError::Inference(e.to_string()))?;

        let dims: Vec<usize> = shape.iter().map(|&x| x.max(0) as usize).collect();
        Ok((dims, data.to_vec()))
    }
}

impl ChrominanceModel for OnnxChrominanceModel {
    fn predict(&self, lightness: ArrayView2<f32>) -> Result<Array3<f32>, ColorizeError> {
        let (height, width) = lightness.dim();
        let input = lightness
            .to_owned()
            .into_shape_with_order((1, 1, height, width))
            .map_err(|e| ColorizeError::ShapeMismatch {
                expected: "1 x 1 x H x W input".to_string(),
                actual: e.to_string(),
            })?;

        let (dims, data) = self.forward(input)?;
        if dims.len() != 4 || dims[0] != 1 {
            return Err(ColorizeError::ShapeMismatch {
                expected: "1 x C x H x W output".to_string(),
                actual: format!("{:?}", dims),
            });
        }

        let chw = Array3::from_shape_vec((dims[1], dims[2], dims[3]), data).map_err(|e| {
            ColorizeError::ShapeMismatch {
                expected: format!("{:?}", dims),
                actual: e.to_string(),
            }
        })?;

        chrominance_from_output(&self.head, chw.view())
    }
}

/// Turn a C x H x W network output into H x W x 2 chrominance.
fn chrominance_from_output(
    head: &ColorizationHead,
    output: ArrayView3<f32>,
) -> Result<Array3<f32>, ColorizeError> {
    let ab = match output.dim().0 {
        NUM_BINS => head.apply(output)?,
        2 => output.permuted_axes([1, 2, 0]).to_owned(),
        channels => {
            return Err(ColorizeError::ShapeMismatch {
                expected: format!("2 or {} output channels", NUM_BINS),
                actual: format!("{} channels", channels),
            })
        }
    };

    tracing::debug!(
        height = ab.len_of(Axis(0)),
        width = ab.len_of(Axis(1)),
        "Chrominance predicted"
    );
    Ok(ab)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn head() -> ColorizationHead {
        ColorizationHead::new(Array2::from_shape_fn((NUM_BINS, 2), |(k, c)| {
            (k as f32) - if c == 0 { 150.0 } else { 100.0 }
        }))
        .unwrap()
    }

    #[test]
    fn test_two_channel_output_passes_through() {
        let output = Array3::from_shape_fn((2, 3, 4), |(c, y, x)| (c * 100 + y * 10 + x) as f32);
        let ab = chrominance_from_output(&head(), output.view()).unwrap();
        assert_eq!(ab.dim(), (3, 4, 2));
        assert_eq!(ab[[2, 3, 0]], 23.0);
        assert_eq!(ab[[2, 3, 1]], 123.0);
    }

    #[test]
    fn test_class_logits_go_through_head() {
        let output = Array3::<f32>::zeros((NUM_BINS, 56, 56));
        let ab = chrominance_from_output(&head(), output.view()).unwrap();
        assert_eq!(ab.dim(), (56, 56, 2));
    }

    #[test]
    fn test_unexpected_channel_count() {
        let output = Array3::<f32>::zeros((5, 2, 2));
        let err = chrominance_from_output(&head(), output.view()).unwrap_err();
        assert!(matches!(err, ColorizeError::ShapeMismatch { .. }));
    }
}
