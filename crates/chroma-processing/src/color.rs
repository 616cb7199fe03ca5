//! Color-space conversion between 8-bit sRGB and CIE L*a*b*.
//!
//! Images are `Array3<f32>` in height x width x channel layout. RGB values are
//! in [0, 1]; Lab uses L in [0, 100] and unscaled a/b, with a D65 white point.

use image::RgbImage;
use ndarray::{Array3, ArrayView3, Zip};

// sRGB -> XYZ (D65)
const RGB_TO_XYZ: [[f32; 3]; 3] = [
    [0.412453, 0.357580, 0.180423],
    [0.212671, 0.715160, 0.072169],
    [0.019334, 0.119193, 0.950227],
];

// XYZ -> sRGB (D65)
const XYZ_TO_RGB: [[f32; 3]; 3] = [
    [3.240479, -1.53715, -0.498535],
    [-0.969256, 1.875991, 0.041556],
    [0.055648, -0.204043, 1.057311],
];

const WHITE_X: f32 = 0.950456;
const WHITE_Z: f32 = 1.088754;

const EPSILON: f32 = 0.008856;
const KAPPA: f32 = 903.3;
const F_SLOPE: f32 = 7.787;
const F_OFFSET: f32 = 16.0 / 116.0;

/// `u8 / 255` into an H x W x 3 float array.
pub fn normalize(image: &RgbImage) -> Array3<f32> {
    let (width, height) = image.dimensions();
    Array3::from_shape_fn((height as usize, width as usize, 3), |(y, x, c)| {
        f32::from(image.get_pixel(x as u32, y as u32)[c]) / 255.0
    })
}

/// `x255`, round and clamp back to an 8-bit image.
pub fn denormalize(rgb: &ArrayView3<f32>) -> RgbImage {
    let (height, width, _) = rgb.dim();
    RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let (x, y) = (x as usize, y as usize);
        image::Rgb([
            to_u8(rgb[[y, x, 0]]),
            to_u8(rgb[[y, x, 1]]),
            to_u8(rgb[[y, x, 2]]),
        ])
    })
}

fn to_u8(value: f32) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

fn lab_f(t: f32) -> f32 {
    if t > EPSILON {
        t.cbrt()
    } else {
        F_SLOPE * t + F_OFFSET
    }
}

fn lab_f_inv(f: f32) -> f32 {
    let cube = f * f * f;
    if cube > EPSILON {
        cube
    } else {
        (f - F_OFFSET) / F_SLOPE
    }
}

fn apply(matrix: &[[f32; 3]; 3], v: [f32; 3]) -> [f32; 3] {
    [
        matrix[0][0] * v[0] + matrix[0][1] * v[1] + matrix[0][2] * v[2],
        matrix[1][0] * v[0] + matrix[1][1] * v[1] + matrix[1][2] * v[2],
        matrix[2][0] * v[0] + matrix[2][1] * v[1] + matrix[2][2] * v[2],
    ]
}

/// Convert one RGB pixel (each channel in [0, 1]) to Lab.
pub fn rgb_pixel_to_lab(rgb: [f32; 3]) -> [f32; 3] {
    let linear = rgb.map(srgb_to_linear);
    let [x, y, z] = apply(&RGB_TO_XYZ, linear);
    let (x, z) = (x / WHITE_X, z / WHITE_Z);

    let fy = lab_f(y);
    let l = if y > EPSILON {
        116.0 * fy - 16.0
    } else {
        KAPPA * y
    };
    let a = 500.0 * (lab_f(x) - fy);
    let b = 200.0 * (fy - lab_f(z));
    [l, a, b]
}

/// Convert one Lab pixel back to RGB, clipped to [0, 1].
pub fn lab_pixel_to_rgb(lab: [f32; 3]) -> [f32; 3] {
    let [l, a, b] = lab;
    let (y, fy) = if l <= EPSILON * KAPPA {
        let y = l / KAPPA;
        (y, F_SLOPE * y + F_OFFSET)
    } else {
        let fy = (l + 16.0) / 116.0;
        (fy * fy * fy, fy)
    };
    let x = lab_f_inv(fy + a / 500.0) * WHITE_X;
    let z = lab_f_inv(fy - b / 200.0) * WHITE_Z;

    apply(&XYZ_TO_RGB, [x, y, z]).map(|c| linear_to_srgb(c.clamp(0.0, 1.0)))
}

fn map_pixels(input: &ArrayView3<f32>, f: fn([f32; 3]) -> [f32; 3]) -> Array3<f32> {
    let mut out = Array3::<f32>::zeros(input.raw_dim());
    Zip::from(out.lanes_mut(ndarray::Axis(2)))
        .and(input.lanes(ndarray::Axis(2)))
        .for_each(|mut dst, src| {
            let converted = f([src[0], src[1], src[2]]);
            dst[0] = converted[0];
            dst[1] = converted[1];
            dst[2] = converted[2];
        });
    out
}

/// RGB image in [0, 1] to Lab.
pub fn rgb_to_lab(rgb: &ArrayView3<f32>) -> Array3<f32> {
    map_pixels(rgb, rgb_pixel_to_lab)
}

/// Lab image to RGB in [0, 1].
pub fn lab_to_rgb(lab: &ArrayView3<f32>) -> Array3<f32> {
    map_pixels(lab, lab_pixel_to_rgb)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32, tol: f32) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn test_white_and_black() {
        let white = rgb_pixel_to_lab([1.0, 1.0, 1.0]);
        assert!(approx(white[0], 100.0, 0.01));
        assert!(approx(white[1], 0.0, 0.01));
        assert!(approx(white[2], 0.0, 0.01));

        let black = rgb_pixel_to_lab([0.0, 0.0, 0.0]);
        assert!(approx(black[0], 0.0, 1e-4));
    }

    #[test]
    fn test_gray_has_no_chroma() {
        let gray = rgb_pixel_to_lab([0.5, 0.5, 0.5]);
        assert!(approx(gray[0], 53.39, 0.1));
        assert!(gray[1].abs() < 0.01);
        assert!(gray[2].abs() < 0.01);
    }

    #[test]
    fn test_red_hue_signs() {
        let red = rgb_pixel_to_lab([1.0, 0.0, 0.0]);
        assert!(approx(red[0], 53.24, 0.2));
        assert!(red[1] > 70.0);
        assert!(red[2] > 60.0);
    }

    #[test]
    fn test_out_of_gamut_is_clipped() {
        let rgb = lab_pixel_to_rgb([50.0, 120.0, -120.0]);
        assert!(rgb.iter().all(|c| (0.0..=1.0).contains(c)));
    }

    #[test]
    fn test_round_trip_within_one_level() {
        let image = RgbImage::from_fn(16, 9, |x, y| {
            image::Rgb([(x * 16) as u8, (y * 28) as u8, ((x * y) % 256) as u8])
        });
        let rgb = normalize(&image);
        let lab = rgb_to_lab(&rgb.view());
        let back = denormalize(&lab_to_rgb(&lab.view()).view());

        for (orig, restored) in image.pixels().zip(back.pixels()) {
            for c in 0..3 {
                let diff = (i16::from(orig[c]) - i16::from(restored[c])).abs();
                assert!(diff <= 1, "{:?} vs {:?}", orig, restored);
            }
        }
    }

    #[test]
    fn test_normalize_layout() {
        let mut image = RgbImage::new(3, 2);
        image.put_pixel(2, 1, image::Rgb([255, 0, 51]));
        let arr = normalize(&image);
        assert_eq!(arr.dim(), (2, 3, 3));
        assert_eq!(arr[[1, 2, 0]], 1.0);
        assert!(approx(arr[[1, 2, 2]], 0.2, 1e-6));
    }
}
