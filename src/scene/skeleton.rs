use glam::Mat4;

use crate::errors::{HayloftError, Result};
use crate::scene::hierarchy;

/// A node of the skeleton. Bones live in an arena and refer to their
/// parent by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bone {
    pub name: String,
    /// `None` for a root bone.
    pub parent: Option<usize>,
}

/// Skeleton data as delivered by the scene importer.
///
/// Parent indices use `-1` (or any negative value) for roots.
#[derive(Debug, Clone, Default)]
pub struct SkeletonAsset {
    pub name: String,
    pub bone_names: Vec<String>,
    pub parent_indices: Vec<i32>,
    /// Bind-time local transforms, used as the initial local pose.
    pub local_poses: Vec<Mat4>,
    pub inverse_bind_matrices: Vec<Mat4>,
}

#[derive(Debug, Clone)]
pub struct Skeleton {
    pub name: String,

    // === Core Data ===
    // bones[i] corresponds to joint i in the skinning data
    bones: Vec<Bone>,

    // Static after import: maps mesh space into each bone's local space
    inverse_bind_matrices: Vec<Mat4>,

    // === Runtime Data ===
    // Written by playback / blending every tick
    local_poses: Vec<Mat4>,
    // Composed by `compute_global_poses`
    global_poses: Vec<Mat4>,
    // global * inverse_bind, ready for upload
    skinning_matrices: Vec<Mat4>,

    // Evaluation scratch
    computed: Vec<bool>,
    eval_stack: Vec<usize>,
}

impl Skeleton {
    /// Builds a skeleton, validating parent links and array lengths.
    pub fn new(
        name: &str,
        bones: Vec<Bone>,
        local_poses: Vec<Mat4>,
        inverse_bind_matrices: Vec<Mat4>,
    ) -> Result<Self> {
        let count = bones.len();
        check_len("local poses", count, local_poses.len())?;
        check_len("inverse bind matrices", count, inverse_bind_matrices.len())?;
        hierarchy::validate_parents(&bones)?;

        Ok(Self {
            name: name.to_string(),
            bones,
            inverse_bind_matrices,
            local_poses,
            global_poses: vec![Mat4::IDENTITY; count],
            skinning_matrices: vec![Mat4::IDENTITY; count],
            computed: vec![false; count],
            eval_stack: Vec::with_capacity(count),
        })
    }

    /// Converts importer output into a validated skeleton.
    pub fn from_asset(asset: &SkeletonAsset) -> Result<Self> {
        let count = asset.bone_names.len();
        check_len("parent indices", count, asset.parent_indices.len())?;

        let bones = asset
            .bone_names
            .iter()
            .zip(&asset.parent_indices)
            .enumerate()
            .map(|(bone, (name, &parent))| {
                let parent = match usize::try_from(parent) {
                    Err(_) => None,
                    Ok(p) if p < count => Some(p),
                    Ok(_) => {
                        return Err(HayloftError::InvalidParent {
                            bone,
                            parent: i64::from(parent),
                            count,
                        });
                    }
                };
                Ok(Bone {
                    name: name.clone(),
                    parent,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(
            &asset.name,
            bones,
            asset.local_poses.clone(),
            asset.inverse_bind_matrices.clone(),
        )
    }

    #[inline]
    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    #[must_use]
    pub fn find_bone(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|b| b.name == name)
    }

    #[inline]
    #[must_use]
    pub fn parent(&self, bone: usize) -> Option<usize> {
        self.bones.get(bone).and_then(|b| b.parent)
    }

    #[inline]
    #[must_use]
    pub fn local_poses(&self) -> &[Mat4] {
        &self.local_poses
    }

    /// Mutable access for pose writers (playback, blending).
    #[inline]
    pub fn local_poses_mut(&mut self) -> &mut [Mat4] {
        &mut self.local_poses
    }

    #[inline]
    #[must_use]
    pub fn global_poses(&self) -> &[Mat4] {
        &self.global_poses
    }

    #[inline]
    #[must_use]
    pub fn global_pose(&self, bone: usize) -> Option<Mat4> {
        self.global_poses.get(bone).copied()
    }

    #[inline]
    #[must_use]
    pub fn inverse_bind_matrices(&self) -> &[Mat4] {
        &self.inverse_bind_matrices
    }

    /// Composes every bone's global pose under `world`.
    pub fn compute_global_poses(&mut self, world: Mat4) {
        hierarchy::evaluate(
            &self.bones,
            &self.local_poses,
            world,
            &mut self.global_poses,
            &mut self.computed,
            &mut self.eval_stack,
        );
    }

    /// Updates the skinning matrices from the current global poses.
    ///
    /// A vertex is skinned by `global[i] * inverse_bind[i] * position`.
    pub fn compute_skinning_matrices(&mut self) {
        for ((out, global), ibm) in self
            .skinning_matrices
            .iter_mut()
            .zip(&self.global_poses)
            .zip(&self.inverse_bind_matrices)
        {
            *out = *global * *ibm;
        }
    }

    #[inline]
    #[must_use]
    pub fn skinning_matrices(&self) -> &[Mat4] {
        &self.skinning_matrices
    }

    /// Skinning matrices as raw floats for a `4 x bone_count` RGBA32F texture:
    /// one bone per row, one matrix column per pixel.
    #[inline]
    #[must_use]
    pub fn joint_texture_data(&self) -> &[f32] {
        bytemuck::cast_slice(&self.skinning_matrices)
    }
}

fn check_len(context: &str, expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(HayloftError::BoneCountMismatch {
            context: context.to_string(),
            expected,
            found,
        })
    }
}
