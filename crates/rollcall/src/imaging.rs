//! Image loading, JPEG output and temporary grayscale copies.

use crate::error::Result;
use image::{DynamicImage, ImageFormat};
use std::path::Path;
use tempfile::NamedTempFile;

pub fn load_image(path: &Path) -> Result<DynamicImage> {
    Ok(image::open(path)?)
}

/// Write an image as JPEG. Alpha is dropped; grayscale stays single-channel.
pub fn save_jpeg(path: &Path, image: &DynamicImage) -> Result<()> {
    match image {
        DynamicImage::ImageLuma8(gray) => gray.save_with_format(path, ImageFormat::Jpeg)?,
        other => other.to_rgb8().save_with_format(path, ImageFormat::Jpeg)?,
    }
    Ok(())
}

pub fn grayscale(image: &DynamicImage) -> DynamicImage {
    DynamicImage::ImageLuma8(image.to_luma8())
}

/// Grayscale copy of `path` in the system temp dir, deleted when the handle drops.
pub fn gray_temp_file(path: &Path, prefix: &str) -> Result<NamedTempFile> {
    let gray = grayscale(&load_image(path)?);

    let mut file = tempfile::Builder::new()
        .prefix(&sanitize_prefix(prefix))
        .suffix(".jpeg")
        .tempfile()?;
    gray.write_to(file.as_file_mut(), ImageFormat::Jpeg)?;

    tracing::debug!(source = %path.display(), temp = %file.path().display(), "grayscale copy written");
    Ok(file)
}

/// Keep a label usable as a file-name prefix.
fn sanitize_prefix(prefix: &str) -> String {
    prefix
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
