//! World-space bind pose and inverse bind matrices

use glam::Mat4;

use super::Bone;

/// Bind transforms for every bone, in bone-list order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BindPose {
    pub world: Vec<Mat4>,
    /// `None` where the world transform is singular
    pub inverse_bind: Vec<Option<Mat4>>,
}

/// Accumulate bind transforms down the hierarchy
///
/// Bones are visited in list order. A parent contributes only when its
/// index is smaller than the child's, so forward references and cycles
/// fall back to treating the bone as a root. Bones without a matrix use
/// the identity.
pub fn bind_pose(bones: &[Bone]) -> BindPose {
    let mut world: Vec<Mat4> = Vec::with_capacity(bones.len());

    for (i, bone) in bones.iter().enumerate() {
        let local = bone
            .matrix
            .map(|m| Mat4::from_cols_array(&m))
            .unwrap_or(Mat4::IDENTITY);
        let parent = bone.parent as usize;
        let transform = if parent < i {
            world[parent] * local
        } else {
            local
        };
        world.push(transform);
    }

    let inverse_bind = world
        .iter()
        .map(|m| {
            let det = m.determinant();
            (det != 0.0 && det.is_finite()).then(|| m.inverse())
        })
        .collect();

    BindPose {
        world,
        inverse_bind,
    }
}
