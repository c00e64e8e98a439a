//! Raster output for decoded texture images

use anyhow::{Context, Result};
use image::{ExtendedColorType, ImageFormat};
use mdltex_formats::{ChannelLayout, DecodedImage};
use std::path::Path;

/// Writes a decoded image to disk in some raster format
pub trait ImageEncoder: Send + Sync {
    /// File extension written by this encoder, without the dot
    fn extension(&self) -> &'static str;

    fn encode(&self, image: &DecodedImage, path: &Path) -> Result<()>;
}

/// PNG output through the `image` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct PngEncoder;

fn color_type(layout: ChannelLayout) -> ExtendedColorType {
    match layout {
        ChannelLayout::Rgba8 => ExtendedColorType::Rgba8,
        ChannelLayout::LumaAlpha8 => ExtendedColorType::La8,
        ChannelLayout::Luma8 => ExtendedColorType::L8,
    }
}

impl ImageEncoder for PngEncoder {
    fn extension(&self) -> &'static str {
        "png"
    }

    fn encode(&self, image: &DecodedImage, path: &Path) -> Result<()> {
        image::save_buffer_with_format(
            path,
            &image.pixels,
            image.width,
            image.height,
            color_type(image.layout),
            ImageFormat::Png,
        )
        .with_context(|| format!("Failed to write image: {:?}", path))
    }
}

/// Dump a payload that could not be turned into pixels
///
/// Returns `false` without touching the filesystem when there is nothing
/// to write.
pub fn write_raw_payload(payload: &[u8], path: &Path) -> Result<bool> {
    if payload.is_empty() {
        return Ok(false);
    }
    std::fs::write(path, payload)
        .with_context(|| format!("Failed to write raw payload: {:?}", path))?;
    Ok(true)
}
