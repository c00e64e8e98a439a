//! Level-0 payload to pixels

use super::{ChannelLayout, DecodedImage, PixelFormat};
use crate::diagnostics::{DiagnosticLog, Section};
use crate::error::FormatError;
use crate::limits::MAX_TEXTURE_DIMENSION;

/// Turn a level-0 payload into a cropped pixel buffer
///
/// `logical` is the header's image size; cropping applies only when both
/// values are positive. Returns `None` when no decoder applies.
pub(super) fn materialize(
    format: PixelFormat,
    payload: &[u8],
    size: (i32, i32),
    logical: (i32, i32),
    log: &mut DiagnosticLog,
) -> Option<DecodedImage> {
    let (width, height) = size;
    let plausible = |v: i32| v > 0 && v < MAX_TEXTURE_DIMENSION;
    if !plausible(width) || !plausible(height) {
        log.warn(
            Section::Pixels,
            None,
            format!("mipmap 0 size {}x{} cannot be decoded", width, height),
        );
        return None;
    }
    let (width, height) = (width as u32, height as u32);
    let pixel_count = width as usize * height as usize;

    let image = match format {
        PixelFormat::Rgba8888 => {
            passthrough(payload, pixel_count, ChannelLayout::Rgba8, width, height, log)
        }
        PixelFormat::Rg88 => passthrough(
            payload,
            pixel_count,
            ChannelLayout::LumaAlpha8,
            width,
            height,
            log,
        ),
        PixelFormat::R8 => {
            passthrough(payload, pixel_count, ChannelLayout::Luma8, width, height, log)
        }
        PixelFormat::Dxt1 | PixelFormat::Dxt3 | PixelFormat::Dxt5 => {
            let block = format.block_format()?;
            let expected = block.encoded_size(width, height);
            if payload.len() < expected {
                log.warn(
                    Section::Pixels,
                    None,
                    format!(
                        "{} stream holds {} of {} bytes; missing blocks left transparent",
                        format,
                        payload.len(),
                        expected
                    ),
                );
            }
            match mdltex_dxt::decode_image(block, payload, width, height) {
                Ok(pixels) => DecodedImage {
                    pixels,
                    width,
                    height,
                    layout: ChannelLayout::Rgba8,
                },
                Err(e) => {
                    log.warn(Section::Pixels, None, FormatError::from(e).to_string());
                    return None;
                }
            }
        }
        PixelFormat::Unknown(code) => {
            log.warn(
                Section::Pixels,
                None,
                format!("no pixel decoder for format code {}", code),
            );
            return None;
        }
    };

    Some(crop(image, logical, log))
}

fn passthrough(
    payload: &[u8],
    pixel_count: usize,
    layout: ChannelLayout,
    width: u32,
    height: u32,
    log: &mut DiagnosticLog,
) -> DecodedImage {
    let expected = pixel_count * layout.channels();
    let mut pixels = payload[..payload.len().min(expected)].to_vec();
    if pixels.len() < expected {
        log.warn(
            Section::Pixels,
            None,
            format!(
                "payload holds {} of {} bytes; zero-padded",
                pixels.len(),
                expected
            ),
        );
        pixels.resize(expected, 0);
    }

    DecodedImage {
        pixels,
        width,
        height,
        layout,
    }
}

/// Crop to the logical size, clamped to what was decoded
fn crop(image: DecodedImage, logical: (i32, i32), log: &mut DiagnosticLog) -> DecodedImage {
    let (lw, lh) = logical;
    if lw <= 0 || lh <= 0 {
        return image;
    }

    let (mut cw, mut ch) = (lw as u32, lh as u32);
    if cw > image.width || ch > image.height {
        log.warn(
            Section::Pixels,
            None,
            format!(
                "image size {}x{} exceeds decoded {}x{}; clamped",
                cw, ch, image.width, image.height
            ),
        );
        cw = cw.min(image.width);
        ch = ch.min(image.height);
    }
    if cw == image.width && ch == image.height {
        return image;
    }

    let channels = image.layout.channels();
    let src_stride = image.width as usize * channels;
    let dst_stride = cw as usize * channels;
    let mut pixels = Vec::with_capacity(dst_stride * ch as usize);
    for row in image.pixels.chunks_exact(src_stride).take(ch as usize) {
        pixels.extend_from_slice(&row[..dst_stride]);
    }

    DecodedImage {
        pixels,
        width: cw,
        height: ch,
        layout: image.layout,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;

    fn run(
        format: PixelFormat,
        payload: &[u8],
        size: (i32, i32),
        logical: (i32, i32),
    ) -> (Option<DecodedImage>, Vec<crate::Diagnostic>) {
        let mut log = DiagnosticLog::new();
        let image = materialize(format, payload, size, logical, &mut log);
        (image, log.finish(()).diagnostics)
    }

    #[test]
    fn test_rgba_passthrough() {
        let payload: Vec<u8> = (0..16).collect();
        let (image, diagnostics) = run(PixelFormat::Rgba8888, &payload, (2, 2), (0, 0));
        let image = image.unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(image.pixels, payload);
        assert_eq!(image.layout, ChannelLayout::Rgba8);
    }

    #[test]
    fn test_short_rgba_is_padded_with_warning() {
        let (image, diagnostics) = run(PixelFormat::Rgba8888, &[255; 6], (2, 2), (0, 0));
        let image = image.unwrap();
        assert_eq!(image.pixels.len(), 16);
        assert_eq!(&image.pixels[4..8], &[255, 255, 0, 0]);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
    }

    #[test]
    fn test_r8_and_rg88_layouts() {
        let (image, _) = run(PixelFormat::R8, &[1, 2, 3, 4], (2, 2), (0, 0));
        assert_eq!(image.unwrap().layout, ChannelLayout::Luma8);

        let (image, diagnostics) = run(PixelFormat::Rg88, &[1, 2, 3], (2, 1), (0, 0));
        let image = image.unwrap();
        assert_eq!(image.layout, ChannelLayout::LumaAlpha8);
        assert_eq!(image.pixels, vec![1, 2, 3, 0]);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_dxt_crop_to_logical_size() {
        // 8×4 texture holding a 6×3 image
        let red = [0x00, 0xF8, 0x00, 0xF8, 0, 0, 0, 0];
        let data = [red, red].concat();
        let (image, diagnostics) = run(PixelFormat::Dxt1, &data, (8, 4), (6, 3));
        let image = image.unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!((image.width, image.height), (6, 3));
        assert_eq!(image.pixels.len(), 6 * 3 * 4);
        assert!(image.pixels.chunks(4).all(|p| p == [255, 0, 0, 255]));
    }

    #[test]
    fn test_short_dxt_stream_warns() {
        let red = [0x00, 0xF8, 0x00, 0xF8, 0, 0, 0, 0];
        let (image, diagnostics) = run(PixelFormat::Dxt1, &red, (8, 4), (0, 0));
        assert_eq!(image.unwrap().pixels.len(), 8 * 4 * 4);
        assert!(diagnostics[0].message.contains("8 of 16 bytes"));
    }

    #[test]
    fn test_crop_larger_than_decoded_is_clamped() {
        let (image, diagnostics) = run(PixelFormat::R8, &[7; 4], (2, 2), (3, 1));
        let image = image.unwrap();
        assert_eq!((image.width, image.height), (2, 1));
        assert_eq!(image.pixels, vec![7, 7]);
        assert!(diagnostics[0].message.contains("clamped"));
    }

    #[test]
    fn test_unknown_format_and_bad_size() {
        let (image, diagnostics) = run(PixelFormat::Unknown(3), &[0; 16], (2, 2), (0, 0));
        assert!(image.is_none());
        assert_eq!(diagnostics.len(), 1);

        let (image, _) = run(PixelFormat::Rgba8888, &[0; 16], (0, 2), (0, 0));
        assert!(image.is_none());

        let (image, _) = run(PixelFormat::R8, &[0; 16], (16384, 1), (0, 0));
        assert!(image.is_none());
    }
}
