//! Colorization service: the color-space pipeline around a chrominance model.

use crate::color;
use crate::error::ColorizeError;
use crate::network::ChrominanceModel;
use crate::resize;
use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage};
use ndarray::{s, Array3, Axis};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Side length of the square lightness plane fed to the network.
pub const NETWORK_INPUT_SIZE: usize = 224;

/// Lightness offset subtracted before inference.
const LIGHTNESS_CENTER: f32 = 50.0;

/// Encoding target for colorized output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputFormat {
    pub format: ImageFormat,
    pub jpeg_quality: u8,
}

impl OutputFormat {
    pub const DEFAULT_JPEG_QUALITY: u8 = 95;

    pub fn jpeg(quality: u8) -> Self {
        Self {
            format: ImageFormat::Jpeg,
            jpeg_quality: quality,
        }
    }

    /// Pick the format matching the filename's extension, falling back to JPEG
    /// when the extension is unknown or has no RGB encoder.
    pub fn for_filename(filename: &str, jpeg_quality: u8) -> Self {
        let format = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ImageFormat::from_extension)
            .filter(|f| {
                matches!(
                    f,
                    ImageFormat::Jpeg
                        | ImageFormat::Png
                        | ImageFormat::Bmp
                        | ImageFormat::Tiff
                        | ImageFormat::WebP
                )
            })
            .unwrap_or(ImageFormat::Jpeg);

        Self {
            format,
            jpeg_quality,
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::jpeg(Self::DEFAULT_JPEG_QUALITY)
    }
}

/// Adds color to grayscale images using a shared chrominance model.
#[derive(Clone)]
pub struct Colorizer {
    model: Arc<dyn ChrominanceModel>,
}

impl Colorizer {
    pub fn new(model: Arc<dyn ChrominanceModel>) -> Self {
        Self { model }
    }

    /// Colorize a decoded image. Output has the same dimensions as the input.
    pub fn colorize(&self, image: &RgbImage) -> Result<RgbImage, ColorizeError> {
        let start = Instant::now();
        let (width, height) = image.dimensions();
        let (width, height) = (width as usize, height as usize);

        let lab = color::rgb_to_lab(&color::normalize(image).view());

        let resized = resize::bilinear(&lab.view(), NETWORK_INPUT_SIZE, NETWORK_INPUT_SIZE);
        let lightness = resized
            .index_axis(Axis(2), 0)
            .mapv(|l| l - LIGHTNESS_CENTER);

        let ab = self.model.predict(lightness.view())?;
        let (out_h, out_w, channels) = ab.dim();
        if channels != 2 || out_h == 0 || out_w == 0 {
            return Err(ColorizeError::ShapeMismatch {
                expected: "H x W x 2 chrominance".to_string(),
                actual: format!("{:?}", ab.shape()),
            });
        }
        let ab = resize::bilinear(&ab.view(), height, width);

        let mut combined = Array3::<f32>::zeros((height, width, 3));
        combined
            .slice_mut(s![.., .., 0])
            .assign(&lab.slice(s![.., .., 0]));
        combined.slice_mut(s![.., .., 1..]).assign(&ab);

        let rgb = color::lab_to_rgb(&combined.view());

        tracing::debug!(
            width,
            height,
            model_output_height = out_h,
            model_output_width = out_w,
            duration_ms = start.elapsed().as_millis(),
            "Image colorized"
        );

        Ok(color::denormalize(&rgb.view()))
    }

    /// Decode, colorize and encode.
    pub fn colorize_bytes(
        &self,
        data: &[u8],
        output: OutputFormat,
    ) -> Result<Vec<u8>, ColorizeError> {
        let decoded = image::load_from_memory(data).map_err(ColorizeError::Decode)?;
        let colorized = self.colorize(&decoded.to_rgb8())?;
        encode(&colorized, output)
    }
}

/// Encode an RGB image to the given output format.
pub fn encode(image: &RgbImage, output: OutputFormat) -> Result<Vec<u8>, ColorizeError> {
    let (width, height) = image.dimensions();
    let mut buffer = Vec::with_capacity((width * height * 3) as usize);

    if output.format == ImageFormat::Jpeg {
        let encoder = JpegEncoder::new_with_quality(&mut buffer, output.jpeg_quality);
        image.write_with_encoder(encoder).map_err(ColorizeError::Encode)?;
    } else {
        image
            .write_to(&mut Cursor::new(&mut buffer), output.format)
            .map_err(ColorizeError::Encode)?;
    }

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array3, ArrayView2};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns constant chrominance at a fixed native resolution.
    struct StubModel {
        height: usize,
        width: usize,
        a: f32,
        b: f32,
        calls: AtomicUsize,
    }

    impl StubModel {
        fn new(height: usize, width: usize, a: f32, b: f32) -> Self {
            Self {
                height,
                width,
                a,
                b,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl ChrominanceModel for StubModel {
        fn predict(&self, lightness: ArrayView2<f32>) -> Result<Array3<f32>, ColorizeError> {
            assert_eq!(lightness.dim(), (NETWORK_INPUT_SIZE, NETWORK_INPUT_SIZE));
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Array3::from_shape_fn(
                (self.height, self.width, 2),
                |(_, _, c)| if c == 0 { self.a } else { self.b },
            ))
        }
    }

    /// Echoes the centered lightness so tests can inspect it.
    struct CaptureModel;

    impl ChrominanceModel for CaptureModel {
        fn predict(&self, lightness: ArrayView2<f32>) -> Result<Array3<f32>, ColorizeError> {
            let mean = lightness.mean().unwrap_or(0.0);
            Err(ColorizeError::Inference(format!("mean={:.1}", mean)))
        }
    }

    struct BadShapeModel;

    impl ChrominanceModel for BadShapeModel {
        fn predict(&self, _: ArrayView2<f32>) -> Result<Array3<f32>, ColorizeError> {
            Ok(Array3::zeros((10, 10, 3)))
        }
    }

    fn gray_image(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            let v = ((x + y) * 7 % 256) as u8;
            image::Rgb([v, v, v])
        })
    }

    #[test]
    fn test_output_dimensions_match_input() {
        let colorizer = Colorizer::new(Arc::new(StubModel::new(56, 56, 0.0, 0.0)));
        for (w, h) in [(1, 1), (37, 91), (300, 120)] {
            let out = colorizer.colorize(&gray_image(w, h)).unwrap();
            assert_eq!(out.dimensions(), (w, h));
        }
    }

    #[test]
    fn test_uses_actual_model_output_shape() {
        for (oh, ow) in [(56, 56), (13, 7)] {
            let model = Arc::new(StubModel::new(oh, ow, 40.0, 30.0));
            let colorizer = Colorizer::new(model.clone());
            let out = colorizer.colorize(&gray_image(64, 48)).unwrap();
            assert_eq!(out.dimensions(), (64, 48));
            assert_eq!(model.calls.load(Ordering::SeqCst), 1);

            // Positive a and b push mid-gray toward red/yellow
            let p = out.get_pixel(32, 24);
            assert!(p[0] > p[2], "{:?}", p);
        }
    }

    #[test]
    fn test_zero_chrominance_preserves_gray() {
        let colorizer = Colorizer::new(Arc::new(StubModel::new(56, 56, 0.0, 0.0)));
        let input = gray_image(40, 30);
        let out = colorizer.colorize(&input).unwrap();
        for (a, b) in input.pixels().zip(out.pixels()) {
            for c in 0..3 {
                assert!((i16::from(a[c]) - i16::from(b[c])).abs() <= 1);
            }
        }
    }

    #[test]
    fn test_lightness_is_centered() {
        // White input has L = 100 everywhere, so the centered plane averages 50
        let colorizer = Colorizer::new(Arc::new(CaptureModel));
        let white = RgbImage::from_pixel(8, 8, image::Rgb([255, 255, 255]));
        match colorizer.colorize(&white) {
            Err(ColorizeError::Inference(msg)) => assert_eq!(msg, "mean=50.0"),
            other => panic!("unexpected result: {:?}", other.map(|i| i.dimensions())),
        }
    }

    #[test]
    fn test_rejects_wrong_channel_count() {
        let colorizer = Colorizer::new(Arc::new(BadShapeModel));
        let err = colorizer.colorize(&gray_image(4, 4)).unwrap_err();
        assert!(matches!(err, ColorizeError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_colorize_bytes_rejects_garbage() {
        let colorizer = Colorizer::new(Arc::new(StubModel::new(56, 56, 0.0, 0.0)));
        let err = colorizer
            .colorize_bytes(b"definitely not an image", OutputFormat::default())
            .unwrap_err();
        assert!(matches!(err, ColorizeError::Decode(_)));
    }

    #[test]
    fn test_colorize_bytes_round_trips_png() {
        let colorizer = Colorizer::new(Arc::new(StubModel::new(56, 56, 10.0, -10.0)));
        let png = encode(&gray_image(20, 10), OutputFormat::for_filename("x.png", 95)).unwrap();

        let out = colorizer
            .colorize_bytes(&png, OutputFormat::for_filename("x.png", 95))
            .unwrap();
        assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::Png);

        let jpeg = colorizer
            .colorize_bytes(&png, OutputFormat::default())
            .unwrap();
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!(image::guess_format(&jpeg).unwrap(), ImageFormat::Jpeg);
        assert_eq!((decoded.width(), decoded.height()), (20, 10));
    }

    #[test]
    fn test_output_format_selection() {
        assert_eq!(
            OutputFormat::for_filename("photo.PNG", 95).format,
            ImageFormat::Png
        );
        assert_eq!(
            OutputFormat::for_filename("scan.tif", 95).format,
            ImageFormat::Tiff
        );
        assert_eq!(
            OutputFormat::for_filename("anim.gif", 95).format,
            ImageFormat::Jpeg
        );
        assert_eq!(
            OutputFormat::for_filename("noext", 80),
            OutputFormat::jpeg(80)
        );
    }
}
