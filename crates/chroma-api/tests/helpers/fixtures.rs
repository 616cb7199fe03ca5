//! Test fixtures: small grayscale images and multipart forms.

use axum_test::multipart::{MultipartForm, Part};
use image::{GrayImage, ImageFormat, Luma};
use std::io::Cursor;

/// Horizontal gray gradient encoded in `format`.
pub fn gradient_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = GrayImage::from_fn(width, height, |x, _| {
        Luma([(x * 255 / width.max(1)) as u8])
    });
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format)
        .expect("Failed to encode fixture");
    buf
}

pub fn gradient_png() -> Vec<u8> {
    gradient_image(32, 24, ImageFormat::Png)
}

/// Multipart form with a single `file` field.
pub fn file_form(filename: &str, mime: &str, data: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(data).file_name(filename).mime_type(mime),
    )
}
