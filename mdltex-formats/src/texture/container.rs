//! Header probing, container tag, image and mipmap records

use super::decompress::Decompressor;
use super::pixels::materialize;
use super::{
    Mipmap, MipmapLayout, PayloadState, PixelFormat, TextureContainer, TextureHeader,
    TextureImage,
};
use crate::CONTAINER_MARKER;
use crate::cursor::ByteCursor;
use crate::diagnostics::{Decoded, DiagnosticLog, Section};
use crate::error::FormatError;
use crate::limits::{
    CONTAINER_MARKER_WINDOW, CONTAINER_TAG_LEN, HEADER_SCAN_WINDOW, MAX_PAYLOAD_SIZE,
};
use crate::scan::{find_marker, scan_plausible_header};

/// Decode a texture buffer
///
/// Returns `None` with a fatal diagnostic when no header can be located,
/// when the header stage runs out of bytes, or when any mipmap declares a
/// payload size outside `(0, 200 MiB]`. Otherwise every image read in full
/// is returned; a short read inside the image list drops the partial image
/// and stops.
pub fn decode_texture(
    data: &[u8],
    decompressor: &dyn Decompressor,
) -> Decoded<Option<TextureContainer>> {
    let mut log = DiagnosticLog::new();
    let container = decode_container(data, decompressor, &mut log);
    log.finish(container)
}

fn decode_container(
    data: &[u8],
    decompressor: &dyn Decompressor,
    log: &mut DiagnosticLog,
) -> Option<TextureContainer> {
    let Some(candidate) = scan_plausible_header(data) else {
        log.fatal(
            Section::Header,
            None,
            FormatError::HeaderNotFound {
                window: HEADER_SCAN_WINDOW,
            }
            .to_string(),
        );
        return None;
    };

    let mut cursor = ByteCursor::new(data);
    cursor.seek(candidate.offset);

    let mut container = match read_preamble(&mut cursor) {
        Ok(container) => container,
        Err(e) => {
            log.fatal(Section::Header, Some(cursor.position()), e.to_string());
            return None;
        }
    };

    let header = container.header;
    if header.offset > 0 {
        log.info(
            Section::Header,
            Some(header.offset),
            format!("header found after {} bytes of filler", header.offset),
        );
    }
    tracing::debug!(
        offset = header.offset,
        format = %header.format,
        version = container.container_version,
        images = container.image_count,
        "texture container"
    );

    if container.image_count < 0 {
        log.warn(
            Section::Container,
            Some(cursor.position()),
            format!("image count {} is negative; no images read", container.image_count),
        );
    }

    let layout = container.layout().mipmap_layout();
    for index in 0..container.image_count.max(0) {
        let start = cursor.position();
        match read_image(&mut cursor, layout, &header, decompressor, log) {
            Ok(image) => container.images.push(image),
            Err(e @ FormatError::InvalidPayloadSize { .. }) => {
                log.fatal(
                    Section::Container,
                    Some(cursor.position()),
                    format!("image {}: {}", index, e),
                );
                return None;
            }
            Err(e) => {
                log.error(
                    Section::Image,
                    Some(start),
                    format!("image {} of {}: {}", index, container.image_count, e),
                );
                break;
            }
        }
    }

    Some(container)
}

/// Header, container tag and image count
fn read_preamble(cursor: &mut ByteCursor) -> Result<TextureContainer, FormatError> {
    let offset = cursor.position();
    let format = PixelFormat::from_code(cursor.read_i32()?);
    let flags = cursor.read_i32()?;
    let texture_width = cursor.read_i32()?;
    let texture_height = cursor.read_i32()?;
    let image_width = cursor.read_i32()?;
    let image_height = cursor.read_i32()?;
    cursor.read_i32()?;

    let header = TextureHeader {
        offset,
        format,
        flags,
        texture_width,
        texture_height,
        image_width,
        image_height,
    };

    let (container_tag, container_version) =
        match find_marker(cursor.peek(CONTAINER_MARKER_WINDOW), CONTAINER_MARKER, 0) {
            Some(skip) => {
                cursor.skip(skip);
                let raw = cursor.read_bytes(CONTAINER_TAG_LEN)?;
                let tag = String::from_utf8_lossy(raw).into_owned();
                let version = tag
                    .chars()
                    .last()
                    .and_then(|c| c.to_digit(10))
                    .unwrap_or(0);
                (Some(tag), version)
            }
            None => (None, 0),
        };

    let image_count = cursor.read_i32()?;
    if container_version == 3 {
        cursor.read_i32()?;
    }

    Ok(TextureContainer {
        header,
        container_version,
        container_tag,
        image_count,
        images: Vec::new(),
    })
}

fn read_mipmap(cursor: &mut ByteCursor, layout: MipmapLayout) -> Result<Mipmap, FormatError> {
    for _ in 0..layout.leading_reserved {
        cursor.read_i32()?;
    }
    let metadata = if layout.metadata_string {
        Some(cursor.read_adaptive_string()?.text)
    } else {
        None
    };
    for _ in 0..layout.trailing_reserved {
        cursor.read_i32()?;
    }

    let width = cursor.read_i32()?;
    let height = cursor.read_i32()?;
    let (compressed, decompressed_size) = if layout.compression_fields {
        (cursor.read_i32()? == 1, cursor.read_i32()?)
    } else {
        (false, 0)
    };

    let payload_size = cursor.read_i32()?;
    if payload_size <= 0 || payload_size > MAX_PAYLOAD_SIZE {
        return Err(FormatError::InvalidPayloadSize {
            size: payload_size,
            max: MAX_PAYLOAD_SIZE,
        });
    }

    Ok(Mipmap {
        width,
        height,
        compressed,
        decompressed_size,
        payload_size,
        metadata,
    })
}

fn read_image(
    cursor: &mut ByteCursor,
    layout: MipmapLayout,
    header: &TextureHeader,
    decompressor: &dyn Decompressor,
    log: &mut DiagnosticLog,
) -> Result<TextureImage, FormatError> {
    let mipmap_count = cursor.read_i32()?;
    if mipmap_count <= 0 {
        log.warn(
            Section::Image,
            Some(cursor.position()),
            format!("image declares {} mipmaps", mipmap_count),
        );
    }

    let mut mipmaps = Vec::new();
    let mut level0: &[u8] = &[];
    for level in 0..mipmap_count.max(0) {
        let mip = read_mipmap(cursor, layout)?;

        let size = mip.payload_size as usize;
        let payload = if size > cursor.remaining() {
            log.warn(
                Section::Image,
                Some(cursor.position()),
                format!(
                    "mipmap {} payload truncated to {} of {} bytes",
                    level,
                    cursor.remaining(),
                    size
                ),
            );
            let rest = cursor.rest();
            cursor.seek_to_end();
            rest
        } else {
            cursor.read_bytes(size)?
        };

        if level == 0 {
            level0 = payload;
        }
        mipmaps.push(mip);
    }

    if mipmaps.is_empty() {
        return Ok(TextureImage {
            mipmaps,
            payload: Vec::new(),
            payload_state: PayloadState::Raw,
            decoded: None,
        });
    }
    let base = &mipmaps[0];

    let (payload, payload_state) = unpack(level0, base, decompressor, log);
    let decoded = match payload_state {
        PayloadState::CompressedFallback => None,
        PayloadState::Raw | PayloadState::Decompressed => materialize(
            header.format,
            &payload,
            (base.width, base.height),
            (header.image_width, header.image_height),
            log,
        ),
    };

    Ok(TextureImage {
        mipmaps,
        payload,
        payload_state,
        decoded,
    })
}

/// Decompress a level-0 payload if its record says so
fn unpack(
    stored: &[u8],
    mip: &Mipmap,
    decompressor: &dyn Decompressor,
    log: &mut DiagnosticLog,
) -> (Vec<u8>, PayloadState) {
    if !mip.compressed {
        return (stored.to_vec(), PayloadState::Raw);
    }

    let target = if mip.decompressed_size > 0 {
        mip.decompressed_size as usize
    } else {
        (mip.width.max(0) as usize)
            .saturating_mul(mip.height.max(0) as usize)
            .saturating_mul(4)
    };

    match decompressor.decompress(stored, target) {
        Ok(out) => {
            tracing::debug!(from = stored.len(), to = out.len(), "payload decompressed");
            (out, PayloadState::Decompressed)
        }
        Err(e) => {
            log.warn(
                Section::Pixels,
                None,
                format!("{}; keeping {} compressed bytes", e, stored.len()),
            );
            (stored.to_vec(), PayloadState::CompressedFallback)
        }
    }
}
