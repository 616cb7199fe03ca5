//! Chrominance network abstraction and the quantized-color output head.

use crate::error::ColorizeError;
use ndarray::{Array2, Array3, Array4, ArrayView2, ArrayView3, Axis};
use ndarray_npy::{read_npy, ReadNpyError};
use std::path::Path;

/// Number of quantized (a, b) bins the network classifies into.
pub const NUM_BINS: usize = 313;

/// Temperature applied to the class logits before the softmax.
pub const REBALANCE_SCALE: f32 = 2.606;

/// Predicts chrominance from centered lightness.
///
/// Input is an H x W plane of `L - 50`. Output is H' x W' x 2 (a, b) at the
/// network's native resolution, which need not match the input size.
pub trait ChrominanceModel: Send + Sync {
    fn predict(&self, lightness: ArrayView2<f32>) -> Result<Array3<f32>, ColorizeError>;
}

/// Final layers of the network: rebalance, softmax over bins, projection onto
/// the (a, b) cluster centers.
#[derive(Debug, Clone)]
pub struct ColorizationHead {
    /// `class8_ab` weights, 2 x 313 x 1 x 1
    class8_ab: Array4<f32>,
    /// `conv8_313_rh` weights, 1 x 313
    conv8_313_rh: Array2<f32>,
}

impl ColorizationHead {
    /// Build the head from 313 x 2 cluster centers.
    pub fn new(cluster_centers: Array2<f32>) -> Result<Self, ColorizeError> {
        if cluster_centers.dim() != (NUM_BINS, 2) {
            return Err(ColorizeError::ShapeMismatch {
                expected: format!("cluster centers of shape ({}, 2)", NUM_BINS),
                actual: format!("{:?}", cluster_centers.shape()),
            });
        }

        let class8_ab = cluster_centers
            .t()
            .to_owned()
            .into_shape_with_order((2, NUM_BINS, 1, 1))
            .map_err(|e| ColorizeError::ShapeMismatch {
                expected: "2 x 313 x 1 x 1".to_string(),
                actual: e.to_string(),
            })?;

        Ok(Self {
            class8_ab,
            conv8_313_rh: Array2::from_elem((1, NUM_BINS), REBALANCE_SCALE),
        })
    }

    pub fn class8_ab(&self) -> &Array4<f32> {
        &self.class8_ab
    }

    pub fn conv8_313_rh(&self) -> &Array2<f32> {
        &self.conv8_313_rh
    }

    /// Map 313 x H x W class logits to H x W x 2 chrominance.
    pub fn apply(&self, logits: ArrayView3<f32>) -> Result<Array3<f32>, ColorizeError> {
        let (bins, height, width) = logits.dim();
        if bins != NUM_BINS {
            return Err(ColorizeError::ShapeMismatch {
                expected: format!("{} class logits", NUM_BINS),
                actual: format!("{} channels", bins),
            });
        }

        let scale = self.conv8_313_rh.row(0);
        let centers_a = self.class8_ab.index_axis(Axis(0), 0);
        let centers_b = self.class8_ab.index_axis(Axis(0), 1);

        let mut out = Array3::<f32>::zeros((height, width, 2));
        let mut scaled = vec![0.0f32; bins];
        for y in 0..height {
            for x in 0..width {
                let mut max = f32::NEG_INFINITY;
                for k in 0..bins {
                    let v = logits[[k, y, x]] * scale[k];
                    scaled[k] = v;
                    max = max.max(v);
                }

                let mut total = 0.0f32;
                let (mut a, mut b) = (0.0f32, 0.0f32);
                for k in 0..bins {
                    let p = (scaled[k] - max).exp();
                    total += p;
                    a += p * centers_a[[k, 0, 0]];
                    b += p * centers_b[[k, 0, 0]];
                }

                out[[y, x, 0]] = a / total;
                out[[y, x, 1]] = b / total;
            }
        }

        Ok(out)
    }
}

/// Load the 313 x 2 cluster centers from a `.npy` file.
///
/// The released file stores integers; float32 and float64 files are accepted too.
pub fn load_cluster_centers(path: &Path) -> Result<Array2<f32>, ColorizeError> {
    let load_error = |reason: String| ColorizeError::ModelLoad {
        path: path.to_path_buf(),
        reason,
    };

    match read_npy::<_, Array2<f32>>(path) {
        Ok(centers) => return Ok(centers),
        Err(ReadNpyError::WrongDescriptor(_)) => {}
        Err(e) => return Err(load_error(e.to_string())),
    }

    match read_npy::<_, Array2<f64>>(path) {
        Ok(centers) => return Ok(centers.mapv(|v| v as f32)),
        Err(ReadNpyError::WrongDescriptor(_)) => {}
        Err(e) => return Err(load_error(e.to_string())),
    }

    read_npy::<_, Array2<i64>>(path)
        .map(|centers| centers.mapv(|v| v as f32))
        .map_err(|e| load_error(e.to_string()))
}
