//! Structured JSON document for skinning, skeleton and animation data
//!
//! The view structs borrow from a decoded [`ModelDocument`] and only exist to
//! fix the field names and nesting of the written file.

use anyhow::Result;
use mdltex_formats::{Animation, Bone, ModelDocument, ModelHeader, SkinEntry, bind_pose};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
pub struct ModelData<'a> {
    pub info: Info<'a>,
    pub skinning: Vec<SkinningView>,
    pub skeleton: Vec<BoneView<'a>>,
    pub animations: Vec<AnimationView<'a>>,
}

/// Header fields; serialized as `{}` when the header could not be read
#[derive(Debug, Default, Serialize)]
pub struct Info<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flag: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_file: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct SkinningView {
    pub vertex_id: u32,
    pub bone_indices: [u32; 4],
    pub weights: [f32; 4],
}

#[derive(Debug, Serialize)]
pub struct BoneView<'a> {
    pub id: u32,
    pub name: &'a str,
    pub parent: u32,
    /// Column-major; empty when the bone carries no bind matrix
    pub matrix: Vec<f32>,
    /// Inverse of the accumulated world bind transform
    pub inverse_bind: Vec<f32>,
    pub sim_config: &'a str,
}

#[derive(Debug, Serialize)]
pub struct AnimationView<'a> {
    pub id: i32,
    pub name: &'a str,
    pub mode: &'a str,
    pub fps: f32,
    pub length: i32,
    pub track_count: u32,
    pub tracks: Vec<TrackView>,
}

#[derive(Debug, Serialize)]
pub struct TrackView {
    pub track_id: i32,
    pub frames: Vec<FrameView>,
}

#[derive(Debug, Serialize)]
pub struct FrameView {
    pub p: [f32; 3],
    pub r: [f32; 3],
    pub s: [f32; 3],
}

impl<'a> From<&'a ModelHeader> for Info<'a> {
    fn from(header: &'a ModelHeader) -> Self {
        Info {
            version: Some(header.version),
            flag: Some(header.flag),
            material_file: Some(&header.material_file),
        }
    }
}

impl From<&SkinEntry> for SkinningView {
    fn from(entry: &SkinEntry) -> Self {
        SkinningView {
            vertex_id: entry.vertex_id,
            bone_indices: entry.bone_indices,
            weights: entry.weights,
        }
    }
}

impl<'a> From<&'a Animation> for AnimationView<'a> {
    fn from(anim: &'a Animation) -> Self {
        AnimationView {
            id: anim.id,
            name: &anim.name,
            mode: &anim.mode,
            fps: anim.fps,
            length: anim.length,
            track_count: anim.track_count,
            tracks: anim
                .tracks
                .iter()
                .map(|t| TrackView {
                    track_id: t.id,
                    frames: t
                        .frames
                        .iter()
                        .map(|f| FrameView {
                            p: f.position,
                            r: f.rotation,
                            s: f.scale,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

fn bone_views(bones: &[Bone]) -> Vec<BoneView<'_>> {
    let pose = bind_pose(bones);

    bones
        .iter()
        .zip(&pose.inverse_bind)
        .map(|(bone, inverse)| {
            let inverse_bind = match (bone.matrix, inverse) {
                (Some(_), Some(m)) => m.to_cols_array().to_vec(),
                _ => Vec::new(),
            };
            BoneView {
                id: bone.id,
                name: &bone.name,
                parent: bone.parent,
                matrix: bone.matrix.map(|m| m.to_vec()).unwrap_or_default(),
                inverse_bind,
                sim_config: &bone.sim_config,
            }
        })
        .collect()
}

impl<'a> ModelData<'a> {
    pub fn from_document(doc: &'a ModelDocument) -> Self {
        ModelData {
            info: doc.header.as_ref().map(Info::from).unwrap_or_default(),
            skinning: doc.skin.iter().map(SkinningView::from).collect(),
            skeleton: bone_views(doc.bones()),
            animations: doc.animation_list().iter().map(AnimationView::from).collect(),
        }
    }
}

/// Write the document as indented JSON
pub fn write_model_data<W: Write>(w: &mut W, doc: &ModelDocument) -> Result<()> {
    serde_json::to_writer_pretty(&mut *w, &ModelData::from_document(doc))?;
    writeln!(w)?;
    Ok(())
}
