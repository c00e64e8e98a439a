//! Header, revision dispatch, vertex and index blocks

use super::{ModelDocument, ModelHeader, ModelRevision, SkinEntry, Vertex};
use crate::cursor::ByteCursor;
use crate::diagnostics::{DiagnosticLog, Section};
use crate::error::FormatError;
use crate::limits::TRIANGLE_SIZE;
use crate::{ALTERNATE_HERALD, MODEL_TAG_PREFIX, STANDARD_HERALD};

pub(super) fn decode_mesh(cursor: &mut ByteCursor, doc: &mut ModelDocument, log: &mut DiagnosticLog) {
    let header = match read_header(cursor) {
        Ok(header) => header,
        Err(e) => {
            log.error(Section::Header, Some(cursor.position()), e.to_string());
            return;
        }
    };

    if header.version == 0 {
        log.warn(
            Section::Header,
            Some(0),
            format!("unrecognized model tag {:?}", header.raw_tag),
        );
    }
    tracing::debug!(
        version = header.version,
        material = %header.material_file,
        "model header"
    );
    doc.header = Some(header);

    if let Err(e) = read_geometry(cursor, doc, log) {
        log.error(Section::Mesh, Some(cursor.position()), e.to_string());
    }
}

fn read_header(cursor: &mut ByteCursor) -> Result<ModelHeader, FormatError> {
    let tag = cursor.read_versioned_tag(MODEL_TAG_PREFIX)?;
    let flag = cursor.read_i32()?;
    cursor.read_i32()?;
    cursor.read_i32()?;
    let material_file = cursor.read_cstring();
    cursor.read_i32()?;

    Ok(ModelHeader {
        version: tag.version,
        raw_tag: tag.text,
        flag,
        material_file,
    })
}

/// Decide the revision and return it with the vertex block byte size
fn read_revision(cursor: &mut ByteCursor) -> Result<(ModelRevision, u32), FormatError> {
    match cursor.read_u32()? {
        0 => {
            while cursor.read_u32()? != ALTERNATE_HERALD {}
            Ok((ModelRevision::Alternate, cursor.read_u32()?))
        }
        STANDARD_HERALD => Ok((ModelRevision::Standard, cursor.read_u32()?)),
        size => Ok((ModelRevision::Standard, size)),
    }
}

fn read_geometry(
    cursor: &mut ByteCursor,
    doc: &mut ModelDocument,
    log: &mut DiagnosticLog,
) -> Result<(), FormatError> {
    let (revision, block_size) = read_revision(cursor)?;
    doc.revision = Some(revision);

    let layout = revision.vertex_layout();
    let block_size = block_size as usize;
    let count = block_size / layout.stride;
    if block_size % layout.stride != 0 {
        log.warn(
            Section::Mesh,
            Some(cursor.position()),
            format!(
                "vertex block size {} is not a multiple of stride {}",
                block_size, layout.stride
            ),
        );
    }
    tracing::debug!(?revision, count, "vertex block");

    let plausible = count.min(cursor.remaining() / layout.stride);
    doc.vertices.reserve(plausible);
    doc.skin.reserve(plausible);

    for i in 0..count {
        let position = cursor.read_f32_array::<3>()?;
        let opaque = match layout.opaque_len {
            0 => None,
            _ => Some(cursor.read_array::<28>()?),
        };
        let bone_indices = cursor.read_u32_array::<4>()?;
        let weights = cursor.read_f32_array::<4>()?;
        let uv = cursor.read_f32_array::<2>()?;

        doc.vertices.push(Vertex {
            position,
            uv,
            opaque,
        });
        doc.skin.push(SkinEntry {
            vertex_id: i as u32,
            bone_indices,
            weights,
        });
    }

    let index_bytes = cursor.read_u32()? as usize;
    let tri_count = index_bytes / TRIANGLE_SIZE;
    doc.triangles
        .reserve(tri_count.min(cursor.remaining() / TRIANGLE_SIZE));

    for _ in 0..tri_count {
        let a = cursor.read_u16()?;
        let b = cursor.read_u16()?;
        let c = cursor.read_u16()?;
        doc.triangles.push([a, b, c]);
    }

    Ok(())
}
