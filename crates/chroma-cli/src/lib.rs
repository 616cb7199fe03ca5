//! Shared pieces of the `chroma` command-line tool.

use anyhow::Context;
use chroma_processing::{colorizer::encode, Colorizer, OutputFormat};
use std::path::Path;
use std::time::Instant;

/// Where `chroma colorize` writes when no output is given
pub const DEFAULT_OUTPUT: &str = "colorized_image.jpg";

/// Colorize the image at `input` and write it to `output`.
///
/// The output encoding follows the output extension (JPEG when unknown).
/// Returns the image dimensions.
pub fn colorize_file(
    colorizer: &Colorizer,
    input: &Path,
    output: &Path,
    jpeg_quality: u8,
) -> anyhow::Result<(u32, u32)> {
    let start = Instant::now();
    let image = image::open(input)
        .with_context(|| format!("Failed to read image {}", input.display()))?
        .to_rgb8();

    let colorized = colorizer
        .colorize(&image)
        .with_context(|| format!("Failed to colorize {}", input.display()))?;

    let format = OutputFormat::for_filename(&output.to_string_lossy(), jpeg_quality);
    let bytes = encode(&colorized, format)?;
    std::fs::write(output, bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        width = colorized.width(),
        height = colorized.height(),
        duration_ms = start.elapsed().as_millis(),
        "Colorized image written"
    );

    Ok(colorized.dimensions())
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use chroma_processing::{ChrominanceModel, ColorizeError};
    use image::{GrayImage, ImageFormat, Luma};
    use ndarray::{Array3, ArrayView2};
    use std::sync::Arc;
    use tempfile::tempdir;

    struct TintModel;

    impl ChrominanceModel for TintModel {
        fn predict(&self, _lightness: ArrayView2<f32>) -> Result<Array3<f32>, ColorizeError> {
            Ok(Array3::from_elem((28, 28, 2), 25.0))
        }
    }

    fn colorizer() -> Colorizer {
        Colorizer::new(Arc::new(TintModel))
    }

    #[test]
    fn colorize_file_writes_same_size_jpeg() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("gray.png");
        GrayImage::from_pixel(40, 30, Luma([128]))
            .save(&input)
            .unwrap();
        let output = dir.path().join(DEFAULT_OUTPUT);

        let dims = colorize_file(&colorizer(), &input, &output, 90).unwrap();
        assert_eq!(dims, (40, 30));

        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);

        // A positive a/b tint on mid gray pushes red above blue
        let written = image::load_from_memory(&bytes).unwrap().to_rgb8();
        let px = written.get_pixel(20, 15);
        assert!(px[0] > px[2], "{:?}", px);
    }

    #[test]
    fn colorize_file_follows_output_extension() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("gray.png");
        GrayImage::from_pixel(8, 8, Luma([90])).save(&input).unwrap();
        let output = dir.path().join("out.png");

        colorize_file(&colorizer(), &input, &output, 90).unwrap();
        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn colorize_file_missing_input() {
        let dir = tempdir().unwrap();
        let err = colorize_file(
            &colorizer(),
            &dir.path().join("missing.png"),
            &dir.path().join("out.jpg"),
            90,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Failed to read image"));
    }
}
