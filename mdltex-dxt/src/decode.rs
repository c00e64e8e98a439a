//! DXT block and image decoding
//!
//! Block decoders return a row-major 4×4 block; [`decode_image`] tiles
//! blocks into a `width × height` RGBA8 buffer.

use crate::palette::{alpha_palette, color_palette};
use crate::{
    BLOCK_DIM, BlockFormat, DXT_ALPHA_BLOCK_SIZE, DXT1_BLOCK_SIZE, DecodedBlock, DxtError,
    PIXELS_PER_BLOCK,
};

/// Decode the color half of a block into `out`, leaving alpha from the palette
fn decode_color(format: BlockFormat, block: &[u8], out: &mut DecodedBlock) {
    let color = &block[format.color_offset()..format.color_offset() + DXT1_BLOCK_SIZE];
    let color0 = u16::from_le_bytes([color[0], color[1]]);
    let color1 = u16::from_le_bytes([color[2], color[3]]);
    let indices = u32::from_le_bytes([color[4], color[5], color[6], color[7]]);

    let palette = color_palette(color0, color1, format.allows_punch_through());

    for (i, pixel) in out.iter_mut().enumerate() {
        let idx = ((indices >> (2 * i)) & 0b11) as usize;
        *pixel = palette[idx];
    }
}

/// Alpha half of a DXT3/DXT5 block, which precedes the color half
fn alpha_half(format: BlockFormat, block: &[u8]) -> [u8; 8] {
    let mut alpha = [0u8; 8];
    alpha.copy_from_slice(&block[..format.color_offset()]);
    alpha
}

/// Decode a single DXT1 block
pub fn decode_dxt1_block(block: &[u8; 8]) -> DecodedBlock {
    let mut out = [[0u8; 4]; PIXELS_PER_BLOCK];
    decode_color(BlockFormat::Dxt1, block, &mut out);
    out
}

/// Decode a single DXT3 block (explicit 4-bit alpha, scaled ×17)
pub fn decode_dxt3_block(block: &[u8; 16]) -> DecodedBlock {
    let mut out = [[0u8; 4]; PIXELS_PER_BLOCK];
    decode_color(BlockFormat::Dxt3, block, &mut out);

    let alpha_bits = u64::from_le_bytes(alpha_half(BlockFormat::Dxt3, block));
    for (i, pixel) in out.iter_mut().enumerate() {
        let a4 = ((alpha_bits >> (4 * i)) & 0xF) as u8;
        pixel[3] = a4 * 17;
    }

    out
}

/// Decode a single DXT5 block (interpolated alpha)
pub fn decode_dxt5_block(block: &[u8; 16]) -> DecodedBlock {
    let mut out = [[0u8; 4]; PIXELS_PER_BLOCK];
    decode_color(BlockFormat::Dxt5, block, &mut out);

    let alpha = alpha_half(BlockFormat::Dxt5, block);
    let ramp = alpha_palette(alpha[0], alpha[1]);

    // 48 bits, little-endian
    let mut alpha_indices: u64 = 0;
    for (i, b) in alpha[2..8].iter().enumerate() {
        alpha_indices |= (*b as u64) << (8 * i);
    }

    for (i, pixel) in out.iter_mut().enumerate() {
        let idx = ((alpha_indices >> (3 * i)) & 0b111) as usize;
        pixel[3] = ramp[idx];
    }

    out
}

/// Decode one encoded block of any supported format
///
/// `block` must hold at least `format.block_size()` bytes.
fn decode_block(format: BlockFormat, block: &[u8]) -> DecodedBlock {
    match format {
        BlockFormat::Dxt1 => {
            let mut raw = [0u8; DXT1_BLOCK_SIZE];
            raw.copy_from_slice(&block[..DXT1_BLOCK_SIZE]);
            decode_dxt1_block(&raw)
        }
        BlockFormat::Dxt3 | BlockFormat::Dxt5 => {
            let mut raw = [0u8; DXT_ALPHA_BLOCK_SIZE];
            raw.copy_from_slice(&block[..DXT_ALPHA_BLOCK_SIZE]);
            if format == BlockFormat::Dxt3 {
                decode_dxt3_block(&raw)
            } else {
                decode_dxt5_block(&raw)
            }
        }
    }
}

/// Decode a block-compressed stream into a `width × height` RGBA8 buffer
///
/// # Arguments
/// * `format` - DXT variant of the stream
/// * `data` - Encoded blocks, row-major by block
/// * `width`, `height` - Image size in pixels (need not be multiples of 4)
///
/// # Returns
/// `width * height * 4` bytes. If `data` holds fewer blocks than the image
/// needs, decoding stops at the first incomplete block and the remaining
/// pixels stay zero (transparent black); compare against
/// [`BlockFormat::encoded_size`] to detect that case.
pub fn decode_image(
    format: BlockFormat,
    data: &[u8],
    width: u32,
    height: u32,
) -> Result<Vec<u8>, DxtError> {
    if width == 0 || height == 0 {
        return Err(DxtError::ZeroDimensions);
    }

    let out_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or(DxtError::DimensionsTooLarge { width, height })?;
    let mut out = vec![0u8; out_len];

    let block_size = format.block_size();
    let blocks_wide = width.div_ceil(BLOCK_DIM);
    let blocks_high = height.div_ceil(BLOCK_DIM);

    for by in 0..blocks_high {
        for bx in 0..blocks_wide {
            let offset = (by as usize * blocks_wide as usize + bx as usize) * block_size;
            let Some(block) = data.get(offset..offset + block_size) else {
                return Ok(out);
            };

            let decoded = decode_block(format, block);
            for (i, rgba) in decoded.iter().enumerate() {
                let px = bx * BLOCK_DIM + (i as u32 % BLOCK_DIM);
                let py = by * BLOCK_DIM + (i as u32 / BLOCK_DIM);
                if px < width && py < height {
                    let idx = (py as usize * width as usize + px as usize) * 4;
                    out[idx..idx + 4].copy_from_slice(rgba);
                }
            }
        }
    }

    Ok(out)
}
