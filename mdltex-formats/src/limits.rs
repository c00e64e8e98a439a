//! Absolute guards and fixed sizes
//!
//! Every threshold that bounds work on corrupt input lives here.

/// Header probe: offsets `[0, HEADER_SCAN_WINDOW)` are tried
pub const HEADER_SCAN_WINDOW: usize = 512;

/// Header probe: the last `HEADER_PROBE_LEN` bytes are never a probe start
pub const HEADER_PROBE_LEN: usize = 32;

/// Largest plausible pixel format code
pub const MAX_FORMAT_CODE: i32 = 20;

/// Exclusive upper bound for texture and mipmap dimensions
pub const MAX_TEXTURE_DIMENSION: i32 = 16384;

/// Bytes after the texture header searched for the container marker
pub const CONTAINER_MARKER_WINDOW: usize = 32;

/// Length of the container version tag ("TEXB0004")
pub const CONTAINER_TAG_LEN: usize = 8;

/// Length candidates at or above this are treated as inline text
pub const MAX_INLINE_STRING_LEN: i32 = 100_000;

/// Largest accepted mipmap payload (200 MiB)
pub const MAX_PAYLOAD_SIZE: i32 = 200 * 1024 * 1024;

/// Exclusive upper bound for a skeleton's bone count
pub const MAX_BONE_COUNT: u16 = 10_000;

/// Animation counts above this are treated as corrupt
pub const MAX_ANIMATION_COUNT: u32 = 10_000;

/// Length of a model version tag ("MDLV0013\0")
pub const VERSION_TAG_LEN: usize = 9;

/// Bone payload size that carries a 4×4 float matrix
pub const MATRIX_PAYLOAD_SIZE: u32 = 64;

/// Bytes per animation frame (position, rotation, scale as 3 floats each)
pub const FRAME_SIZE: usize = 36;

/// Bytes per triangle in the index block (3 × u16)
pub const TRIANGLE_SIZE: usize = 6;
