//! Palette construction for DXT color and alpha blocks

/// Expand a packed 5:6:5 color to 8-bit channels
///
/// Each channel's high bits are replicated into the vacated low bits, so
/// `0x1F` expands to `0xFF` and `0x00` stays `0x00`.
#[inline]
pub fn expand_565(packed: u16) -> [u8; 3] {
    let r5 = ((packed >> 11) & 0x1F) as u8;
    let g6 = ((packed >> 5) & 0x3F) as u8;
    let b5 = (packed & 0x1F) as u8;

    [
        (r5 << 3) | (r5 >> 2),
        (g6 << 2) | (g6 >> 4),
        (b5 << 3) | (b5 >> 2),
    ]
}

/// Weighted average of two channels: `(a * wa + b * wb) / (wa + wb)`
#[inline]
fn mix(a: u8, b: u8, wa: u32, wb: u32) -> u8 {
    ((a as u32 * wa + b as u32 * wb) / (wa + wb)) as u8
}

/// Build the 4-entry RGBA palette for a color block
///
/// # Arguments
/// * `color0`, `color1` - Packed 5:6:5 reference colors
/// * `punch_through` - Whether DXT1's one-bit-alpha mode applies
///
/// When `punch_through` is set and `color0 <= color1` (packed comparison),
/// entry 2 is the midpoint and entry 3 is transparent black. Otherwise
/// entries 2 and 3 sit at 1/3 and 2/3 between the references.
pub fn color_palette(color0: u16, color1: u16, punch_through: bool) -> [[u8; 4]; 4] {
    let c0 = expand_565(color0);
    let c1 = expand_565(color1);

    let mut palette = [[0u8; 4]; 4];
    palette[0] = [c0[0], c0[1], c0[2], 255];
    palette[1] = [c1[0], c1[1], c1[2], 255];

    if punch_through && color0 <= color1 {
        palette[2] = [
            mix(c0[0], c1[0], 1, 1),
            mix(c0[1], c1[1], 1, 1),
            mix(c0[2], c1[2], 1, 1),
            255,
        ];
        palette[3] = [0, 0, 0, 0];
    } else {
        palette[2] = [
            mix(c0[0], c1[0], 2, 1),
            mix(c0[1], c1[1], 2, 1),
            mix(c0[2], c1[2], 2, 1),
            255,
        ];
        palette[3] = [
            mix(c0[0], c1[0], 1, 2),
            mix(c0[1], c1[1], 1, 2),
            mix(c0[2], c1[2], 1, 2),
            255,
        ];
    }

    palette
}

/// Build the 8-entry alpha ramp for a DXT5 alpha block
///
/// `alpha0 > alpha1` selects the 7-step ramp; otherwise a 5-step ramp with
/// fixed 0 and 255 in the last two slots.
pub fn alpha_palette(alpha0: u8, alpha1: u8) -> [u8; 8] {
    let mut ramp = [0u8; 8];
    ramp[0] = alpha0;
    ramp[1] = alpha1;

    if alpha0 > alpha1 {
        for i in 1..=6u32 {
            ramp[i as usize + 1] = mix(alpha0, alpha1, 7 - i, i);
        }
    } else {
        for i in 1..=4u32 {
            ramp[i as usize + 1] = mix(alpha0, alpha1, 5 - i, i);
        }
        ramp[6] = 0;
        ramp[7] = 255;
    }

    ramp
}
