//! MDL model container
//!
//! A model buffer holds up to three independently located sections:
//!
//! ```text
//! offset 0   header       "MDLV0013\0", flag, material reference
//!            mesh         revision herald, vertex block, index block
//! "MDLS"     skeleton     bones with optional bind matrices
//! "MDLA"     animation    named clips of per-bone frame tracks
//! ```
//!
//! The skeleton and animation sections are found by marker search from the
//! start of the buffer, so a damaged mesh never hides them.

mod animation;
mod mesh;
mod pose;
mod skeleton;

pub use pose::{BindPose, bind_pose};

use crate::cursor::ByteCursor;
use crate::diagnostics::{Decoded, DiagnosticLog};

/// Header fields preceding the mesh
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelHeader {
    /// Numeric version from the tag, 0 when unreadable
    pub version: u32,
    /// Tag text as stored ("MDLV0013")
    pub raw_tag: String,
    pub flag: i32,
    /// Material reference, usually a relative `.json` path
    pub material_file: String,
}

/// Mesh layout revision, decided once from the word after the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelRevision {
    /// 52-byte vertices, optional herald before the block size
    Standard,
    /// 80-byte vertices with 28 opaque bytes, padding run before the herald
    Alternate,
}

/// Per-revision vertex record shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout {
    pub stride: usize,
    /// Opaque bytes between position and skin data
    pub opaque_len: usize,
}

const VERTEX_LAYOUTS: [VertexLayout; 2] = [
    VertexLayout {
        stride: 52,
        opaque_len: 0,
    },
    VertexLayout {
        stride: 80,
        opaque_len: 28,
    },
];

impl ModelRevision {
    pub fn vertex_layout(self) -> VertexLayout {
        match self {
            ModelRevision::Standard => VERTEX_LAYOUTS[0],
            ModelRevision::Alternate => VERTEX_LAYOUTS[1],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    /// Alternate-revision bytes, passed through unmodified
    pub opaque: Option<[u8; 28]>,
}

/// Skin weights for one vertex (parallel to the vertex list)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SkinEntry {
    pub vertex_id: u32,
    pub bone_indices: [u32; 4],
    pub weights: [f32; 4],
}

/// Three zero-based vertex indices
pub type Triangle = [u16; 3];

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bone {
    /// Position in the bone list
    pub id: u32,
    pub name: String,
    /// Raw parent index; list order may not match tree order
    pub parent: u32,
    /// Column-major 4×4 bind transform, when the record carries one
    pub matrix: Option<[f32; 16]>,
    pub sim_config: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frame {
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnimationTrack {
    pub id: i32,
    pub frames: Vec<Frame>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Animation {
    pub id: i32,
    pub name: String,
    /// Play-mode string ("loop", "single", ...)
    pub mode: String,
    pub fps: f32,
    pub length: i32,
    /// Track count as declared; `tracks` may be shorter after truncation
    pub track_count: u32,
    pub tracks: Vec<AnimationTrack>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Skeleton {
    pub version: u32,
    pub section_size: u32,
    pub bones: Vec<Bone>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnimationList {
    pub version: u32,
    pub total_size: u32,
    pub declared_count: u32,
    pub animations: Vec<Animation>,
}

/// Everything recovered from one model buffer
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelDocument {
    pub header: Option<ModelHeader>,
    pub revision: Option<ModelRevision>,
    pub vertices: Vec<Vertex>,
    pub skin: Vec<SkinEntry>,
    pub triangles: Vec<Triangle>,
    pub skeleton: Option<Skeleton>,
    pub animations: Option<AnimationList>,
}

impl ModelDocument {
    pub fn bones(&self) -> &[Bone] {
        self.skeleton.as_ref().map_or(&[], |s| s.bones.as_slice())
    }

    pub fn animation_list(&self) -> &[Animation] {
        self.animations
            .as_ref()
            .map_or(&[], |a| a.animations.as_slice())
    }

    pub fn material_file(&self) -> Option<&str> {
        self.header.as_ref().map(|h| h.material_file.as_str())
    }
}

/// Decode a model buffer
///
/// Mesh, skeleton and animation are attempted independently; a failure in
/// one never prevents the others. The result is never `Failed`: at worst
/// every section is empty and the diagnostics say why.
pub fn decode_model(data: &[u8]) -> Decoded<ModelDocument> {
    let mut log = DiagnosticLog::new();
    let mut doc = ModelDocument::default();

    let mut cursor = ByteCursor::new(data);
    mesh::decode_mesh(&mut cursor, &mut doc, &mut log);

    doc.skeleton = skeleton::decode_skeleton(data, &mut log);
    doc.animations = animation::decode_animations(data, &mut log);

    tracing::debug!(
        vertices = doc.vertices.len(),
        triangles = doc.triangles.len(),
        bones = doc.bones().len(),
        animations = doc.animation_list().len(),
        "model decoded"
    );

    log.finish(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use crate::{DecodeStatus, Section, Severity};

    #[test]
    fn test_full_model_all_sections() {
        let mut w = standard_mesh(3, &[[0, 1, 2]]);
        skeleton_header(&mut w, 1);
        bone(&mut w, "root", 0, Some(identity_matrix()), "");
        animation_header(&mut w, 1);
        animation_record(&mut w, 7, "idle", "loop", &[(0, 2)]);

        let decoded = decode_model(&w.finish());
        assert_eq!(decoded.status(), DecodeStatus::Complete, "{:?}", decoded.diagnostics);

        let doc = decoded.value;
        assert_eq!(doc.vertices.len(), 3);
        assert_eq!(doc.triangles, vec![[0, 1, 2]]);
        assert_eq!(doc.bones().len(), 1);
        assert_eq!(doc.animation_list().len(), 1);
        assert_eq!(doc.material_file(), Some("materials/puppet.json"));
    }

    #[test]
    fn test_sections_independent_of_broken_mesh() {
        // Header only, then the vertex block size claims far more than exists
        let mut w = ByteWriter::new();
        model_header(&mut w, "m.json");
        w.u32(crate::STANDARD_HERALD).u32(52 * 1000);
        vertex(&mut w, false, 0);
        skeleton_header(&mut w, 1);
        bone(&mut w, "root", 0, None, "{}");

        let decoded = decode_model(&w.finish());
        assert_eq!(decoded.status(), DecodeStatus::Partial);
        assert!(
            decoded
                .diagnostics
                .iter()
                .any(|d| d.section == Section::Mesh && d.severity == Severity::Error)
        );
        // The first vertex survived; the skeleton was found regardless
        assert_eq!(decoded.value.vertices.len(), 1);
        assert_eq!(decoded.value.bones()[0].name, "root");
    }

    #[test]
    fn test_bone_ceiling_keeps_mesh() {
        let mut w = standard_mesh(2, &[[0, 1, 1]]);
        skeleton_header(&mut w, 10_000);
        bone(&mut w, "root", 0, None, "");

        let decoded = decode_model(&w.finish());
        assert!(decoded.value.skeleton.is_none());
        assert!(decoded.value.bones().is_empty());
        assert_eq!(decoded.value.vertices.len(), 2);
        assert_eq!(decoded.value.triangles.len(), 1);
    }

    #[test]
    fn test_animation_ceiling_keeps_mesh() {
        let mut w = standard_mesh(2, &[[0, 1, 1]]);
        skeleton_header(&mut w, 1);
        bone(&mut w, "root", 0, None, "");
        animation_header(&mut w, 10_001);
        animation_record(&mut w, 7, "idle", "loop", &[(0, 1)]);

        let decoded = decode_model(&w.finish());
        assert_eq!(decoded.status(), DecodeStatus::Partial);
        assert!(decoded.value.animation_list().is_empty());
        assert_eq!(decoded.value.vertices.len(), 2);
        assert_eq!(decoded.value.triangles.len(), 1);
        assert_eq!(decoded.value.bones().len(), 1);
    }

    #[test]
    fn test_empty_buffer() {
        let decoded = decode_model(&[]);
        assert_ne!(decoded.status(), DecodeStatus::Failed);
        assert!(decoded.value.header.is_none());
        assert!(decoded.value.vertices.is_empty());
    }

    #[test]
    fn test_vertex_layout_table() {
        assert_eq!(ModelRevision::Standard.vertex_layout().stride, 52);
        assert_eq!(ModelRevision::Alternate.vertex_layout().stride, 80);
        assert_eq!(ModelRevision::Alternate.vertex_layout().opaque_len, 28);
    }
}
