//! Image file I/O and format conversion for the preview driver.

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};
use stipple_core::{FilterError, PixelBuffer};

/// Load an image from disk as a packed-ARGB buffer.
///
/// Supports the formats enabled in the `image` crate. Everything is converted
/// to 8-bit RGBA first.
pub fn load_image(path: &Path) -> Result<PixelBuffer, ImageLoadError> {
    let img = image::open(path).map_err(ImageLoadError::Decode)?;
    let rgba = img.to_rgba8();
    tracing::debug!(
        path = %path.display(),
        width = rgba.width(),
        height = rgba.height(),
        color = ?img.color(),
        "loaded image"
    );
    Ok(PixelBuffer::from_rgba_image(&rgba)?)
}

/// Write `buffer` to `path`, picking the format from the extension.
///
/// Formats without an alpha channel (JPEG) get the color channels only.
pub fn save_image(buffer: &PixelBuffer, path: &Path) -> Result<(), ImageLoadError> {
    let format = ImageFormat::from_path(path).map_err(ImageLoadError::Encode)?;
    let img = DynamicImage::ImageRgba8(buffer.to_rgba_image());
    let result = match format {
        ImageFormat::Jpeg => img.to_rgb8().save_with_format(path, format),
        _ => img.save_with_format(path, format),
    };
    result.map_err(ImageLoadError::Encode)?;
    tracing::debug!(path = %path.display(), ?format, "saved image");
    Ok(())
}

/// Preview file next to `source`: `<stem><suffix>.<ext>`.
///
/// Sources without an extension are previewed as PNG.
pub fn preview_path(source: &Path, suffix: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = source
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "png".to_owned());
    source.with_file_name(format!("{stem}{suffix}.{ext}"))
}

/// Errors that can occur while reading or writing images.
#[derive(Debug, thiserror::Error)]
pub enum ImageLoadError {
    #[error("failed to decode image: {0}")]
    Decode(image::ImageError),
    #[error("failed to encode image: {0}")]
    Encode(image::ImageError),
    #[error("image is not a valid pixel buffer: {0}")]
    Buffer(#[from] FilterError),
}
