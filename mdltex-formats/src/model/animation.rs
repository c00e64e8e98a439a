//! Animation section ("MDLA")
//!
//! ```text
//! "MDLA0005\0"  total size (u32)  count (u32)
//! per animation:
//!   zero padding words (skipped)
//!   id (i32, non-zero)  reserved  name\0  [name\0]  mode\0
//!   fps (f32)  length (i32)  reserved  track count (u32)
//!   per track: id (i32)  byte size (u32)  frames (36 bytes each)  padding
//! ```

use super::{Animation, AnimationList, AnimationTrack, Frame};
use crate::cursor::ByteCursor;
use crate::diagnostics::{DiagnosticLog, Section};
use crate::error::FormatError;
use crate::limits::{FRAME_SIZE, MAX_ANIMATION_COUNT};
use crate::scan::find_marker;
use crate::{ANIMATION_MARKER, MODEL_TAG_PREFIX};

/// Outcome of reading one animation record
enum Record {
    Animation(Animation),
    EndOfList,
}

pub(super) fn decode_animations(data: &[u8], log: &mut DiagnosticLog) -> Option<AnimationList> {
    let Some(offset) = find_marker(data, ANIMATION_MARKER, 0) else {
        log.info(
            Section::Animation,
            None,
            FormatError::MarkerNotFound { marker: "MDLA" }.to_string(),
        );
        return None;
    };

    let mut cursor = ByteCursor::new(data);
    cursor.seek(offset);

    let tag = match cursor.read_versioned_tag(MODEL_TAG_PREFIX) {
        Ok(tag) => tag,
        Err(e) => {
            log.error(Section::Animation, Some(offset), e.to_string());
            return None;
        }
    };
    if tag.version == 0 {
        log.warn(
            Section::Animation,
            Some(offset),
            format!("animation tag {:?} carries no version", tag.text),
        );
        return None;
    }

    let (total_size, declared_count) = match read_counts(&mut cursor) {
        Ok(counts) => counts,
        Err(e) => {
            log.error(Section::Animation, Some(cursor.position()), e.to_string());
            return None;
        }
    };

    let mut list = AnimationList {
        version: tag.version,
        total_size,
        declared_count,
        animations: Vec::new(),
    };

    if declared_count > MAX_ANIMATION_COUNT {
        log.error(
            Section::Animation,
            Some(offset),
            FormatError::CountOutOfRange {
                what: "animation",
                count: declared_count as u64,
                max: MAX_ANIMATION_COUNT as u64,
            }
            .to_string(),
        );
        return Some(list);
    }
    tracing::debug!(offset, version = tag.version, declared_count, "animation section");

    for index in 0..declared_count {
        let start = cursor.position();
        match read_animation(&mut cursor, log) {
            Ok(Record::Animation(animation)) => list.animations.push(animation),
            Ok(Record::EndOfList) => break,
            Err(e) => {
                // Records carry no length, so a short read ends the list
                log.error(
                    Section::Animation,
                    Some(start),
                    format!("animation {} of {}: {}", index, declared_count, e),
                );
                break;
            }
        }
    }

    if list.animations.len() < declared_count as usize {
        log.info(
            Section::Animation,
            None,
            format!(
                "{} of {} declared animations present",
                list.animations.len(),
                declared_count
            ),
        );
    }

    Some(list)
}

fn read_counts(cursor: &mut ByteCursor) -> Result<(u32, u32), FormatError> {
    let total_size = cursor.read_u32()?;
    let count = cursor.read_u32()?;
    Ok((total_size, count))
}

fn read_animation(cursor: &mut ByteCursor, log: &mut DiagnosticLog) -> Result<Record, FormatError> {
    let mut id = 0;
    while id == 0 {
        if cursor.position() + 4 >= cursor.len() {
            break;
        }
        id = cursor.read_i32()?;
    }
    if id == 0 {
        return Ok(Record::EndOfList);
    }

    cursor.read_i32()?;
    let mut name = cursor.read_cstring();
    if name.is_empty() {
        name = cursor.read_cstring();
    }
    let mode = cursor.read_cstring();
    let fps = cursor.read_f32()?;
    let length = cursor.read_i32()?;
    cursor.read_i32()?;
    let track_count = cursor.read_u32()?;

    let mut animation = Animation {
        id,
        name,
        mode,
        fps,
        length,
        track_count,
        tracks: Vec::new(),
    };

    for index in 0..track_count {
        let start = cursor.position();
        match read_track(cursor) {
            Ok(Some(track)) => animation.tracks.push(track),
            Ok(None) => {
                log.error(
                    Section::Animation,
                    Some(start),
                    format!(
                        "animation {} track {} exceeds buffer; remaining tracks dropped",
                        id, index
                    ),
                );
                cursor.seek_to_end();
                break;
            }
            Err(e) => {
                log.error(
                    Section::Animation,
                    Some(start),
                    format!("animation {} track {}: {}", id, index, e),
                );
                break;
            }
        }
    }

    Ok(Record::Animation(animation))
}

/// Read one track; `None` when its declared size runs past the buffer
fn read_track(cursor: &mut ByteCursor) -> Result<Option<AnimationTrack>, FormatError> {
    let id = cursor.read_i32()?;
    let byte_size = cursor.read_u32()? as usize;
    if byte_size > cursor.remaining() {
        return Ok(None);
    }

    let frame_count = byte_size / FRAME_SIZE;
    let mut frames = Vec::with_capacity(frame_count);
    for _ in 0..frame_count {
        frames.push(Frame {
            position: cursor.read_f32_array()?,
            rotation: cursor.read_f32_array()?,
            scale: cursor.read_f32_array()?,
        });
    }
    cursor.read_bytes(byte_size - frame_count * FRAME_SIZE)?;

    Ok(Some(AnimationTrack { id, frames }))
}
