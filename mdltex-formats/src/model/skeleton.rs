//! Skeleton section ("MDLS")

use super::{Bone, Skeleton};
use crate::cursor::ByteCursor;
use crate::diagnostics::{DiagnosticLog, Section};
use crate::error::FormatError;
use crate::limits::{MATRIX_PAYLOAD_SIZE, MAX_BONE_COUNT};
use crate::scan::find_marker;
use crate::{MODEL_TAG_PREFIX, SKELETON_MARKER};

struct SkeletonHeader {
    version: u32,
    section_size: u32,
    bone_count: u16,
}

pub(super) fn decode_skeleton(data: &[u8], log: &mut DiagnosticLog) -> Option<Skeleton> {
    let Some(offset) = find_marker(data, SKELETON_MARKER, 0) else {
        log.info(
            Section::Skeleton,
            None,
            FormatError::MarkerNotFound { marker: "MDLS" }.to_string(),
        );
        return None;
    };

    let mut cursor = ByteCursor::new(data);
    cursor.seek(offset);

    let header = match read_header(&mut cursor) {
        Ok(header) => header,
        Err(e) => {
            log.error(Section::Skeleton, Some(cursor.position()), e.to_string());
            return None;
        }
    };

    if header.bone_count == 0 || header.bone_count >= MAX_BONE_COUNT {
        log.error(
            Section::Skeleton,
            Some(offset),
            FormatError::CountOutOfRange {
                what: "bone",
                count: header.bone_count as u64,
                max: MAX_BONE_COUNT as u64 - 1,
            }
            .to_string(),
        );
        return None;
    }
    tracing::debug!(
        offset,
        version = header.version,
        bones = header.bone_count,
        "skeleton section"
    );

    let mut bones = Vec::with_capacity(header.bone_count as usize);
    for id in 0..header.bone_count as u32 {
        let start = cursor.position();
        match read_bone(&mut cursor, id) {
            Ok(bone) => bones.push(bone),
            Err(e) => {
                // Bone records have no length prefix, so nothing after a short read can be located
                log.error(
                    Section::Skeleton,
                    Some(start),
                    format!("bone {} of {}: {}", id, header.bone_count, e),
                );
                break;
            }
        }
    }

    Some(Skeleton {
        version: header.version,
        section_size: header.section_size,
        bones,
    })
}

fn read_header(cursor: &mut ByteCursor) -> Result<SkeletonHeader, FormatError> {
    let tag = cursor.read_versioned_tag(MODEL_TAG_PREFIX)?;
    let section_size = cursor.read_u32()?;
    let bone_count = cursor.read_u16()?;
    cursor.read_u16()?;

    Ok(SkeletonHeader {
        version: tag.version,
        section_size,
        bone_count,
    })
}

fn read_bone(cursor: &mut ByteCursor, id: u32) -> Result<Bone, FormatError> {
    let name = cursor.read_cstring();
    cursor.read_i32()?;
    let parent = cursor.read_u32()?;
    let payload_size = cursor.read_u32()?;

    let matrix = if payload_size == MATRIX_PAYLOAD_SIZE {
        Some(cursor.read_f32_array::<16>()?)
    } else {
        cursor.read_bytes(payload_size as usize)?;
        None
    };

    let sim_config = cursor.read_cstring();

    Ok(Bone {
        id,
        name,
        parent,
        matrix,
        sim_config,
    })
}
