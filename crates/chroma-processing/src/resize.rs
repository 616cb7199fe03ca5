//! Bilinear resampling of multi-channel float images.
//!
//! Matches the classic `INTER_LINEAR` behaviour: pixel centers at half-integer
//! offsets, edge pixels clamped, and no antialiasing when shrinking. Values are
//! not clamped, so Lab and chrominance planes survive unchanged in range.

use ndarray::{Array3, ArrayView3};

/// Source index pair and blend weight for one destination coordinate.
#[derive(Debug, Clone, Copy)]
struct Tap {
    lo: usize,
    hi: usize,
    frac: f32,
}

fn taps(src_len: usize, dst_len: usize) -> Vec<Tap> {
    let scale = src_len as f64 / dst_len as f64;
    let last = src_len.saturating_sub(1);
    (0..dst_len)
        .map(|d| {
            let pos = (d as f64 + 0.5) * scale - 0.5;
            let floor = pos.floor();
            let mut frac = (pos - floor) as f32;
            let mut lo = floor as isize;
            if lo < 0 {
                lo = 0;
                frac = 0.0;
            }
            let mut lo = lo as usize;
            if lo >= last {
                lo = last;
                frac = 0.0;
            }
            Tap {
                lo,
                hi: (lo + 1).min(last),
                frac,
            }
        })
        .collect()
}

/// Resize an H x W x C array to `height` x `width`, keeping C.
pub fn bilinear(input: &ArrayView3<f32>, height: usize, width: usize) -> Array3<f32> {
    let (src_h, src_w, channels) = input.dim();
    if src_h == height && src_w == width {
        return input.to_owned();
    }
    if src_h == 0 || src_w == 0 {
        return Array3::zeros((height, width, channels));
    }

    let rows = taps(src_h, height);
    let cols = taps(src_w, width);

    Array3::from_shape_fn((height, width, channels), |(y, x, c)| {
        let r = rows[y];
        let q = cols[x];
        let top = input[[r.lo, q.lo, c]] * (1.0 - q.frac) + input[[r.lo, q.hi, c]] * q.frac;
        let bottom = input[[r.hi, q.lo, c]] * (1.0 - q.frac) + input[[r.hi, q.hi, c]] * q.frac;
        top * (1.0 - r.frac) + bottom * r.frac
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_identity_when_same_size() {
        let input = Array3::from_shape_fn((4, 5, 2), |(y, x, c)| (y * 10 + x + c) as f32);
        let out = bilinear(&input.view(), 4, 5);
        assert_eq!(out, input);
    }

    #[test]
    fn test_upscale_two_pixels() {
        // [0, 10] -> 4 samples: centers at -0.25, 0.25, 0.75, 1.25 in source space
        let input = Array3::from_shape_vec((1, 2, 1), vec![0.0, 10.0]).unwrap();
        let out = bilinear(&input.view(), 1, 4);
        let values: Vec<f32> = out.iter().copied().collect();
        assert_eq!(values, vec![0.0, 2.5, 7.5, 10.0]);
    }

    #[test]
    fn test_downscale_by_two_averages_pairs() {
        let input = Array3::from_shape_vec((1, 4, 1), vec![0.0, 2.0, 4.0, 6.0]).unwrap();
        let out = bilinear(&input.view(), 1, 2);
        let values: Vec<f32> = out.iter().copied().collect();
        assert_eq!(values, vec![1.0, 5.0]);
    }

    #[test]
    fn test_values_are_not_clamped() {
        let input = Array3::from_shape_vec((2, 1, 2), vec![-80.0, 90.0, -60.0, 110.0]).unwrap();
        let out = bilinear(&input.view(), 3, 2);
        assert_eq!(out.dim(), (3, 2, 2));
        assert!(out.iter().any(|v| *v < -60.0));
        assert!(out.iter().any(|v| *v > 100.0));
    }

    #[test]
    fn test_arbitrary_shapes() {
        let input = Array3::from_elem((13, 7, 2), 3.5f32);
        let out = bilinear(&input.view(), 224, 301);
        assert_eq!(out.dim(), (224, 301, 2));
        assert!(out.iter().all(|v| (*v - 3.5).abs() < 1e-5));
    }
}
