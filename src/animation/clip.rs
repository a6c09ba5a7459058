use glam::{Quat, Vec3};

use crate::animation::tracks::KeyframeTrack;
use crate::errors::{HayloftError, Result};
use crate::scene::Skeleton;

/// The three keyframe tracks that drive one bone.
#[derive(Debug, Clone)]
pub struct BoneTracks {
    pub position: KeyframeTrack<Vec3>,
    pub scale: KeyframeTrack<Vec3>,
    pub rotation: KeyframeTrack<Quat>,
}

impl Default for BoneTracks {
    /// Rest pose: no translation, unit scale, no rotation.
    fn default() -> Self {
        Self {
            position: KeyframeTrack::constant(Vec3::ZERO),
            scale: KeyframeTrack::constant(Vec3::ONE),
            rotation: KeyframeTrack::constant(Quat::IDENTITY),
        }
    }
}

impl BoneTracks {
    /// Time of the latest key across the three tracks.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.position
            .end_time()
            .max(self.scale.end_time())
            .max(self.rotation.end_time())
    }
}

/// A skeletal animation: one [`BoneTracks`] per bone, in skeleton order.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    bones: Vec<BoneTracks>,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, bones: Vec<BoneTracks>) -> Self {
        let duration = bones
            .iter()
            .map(BoneTracks::end_time)
            .fold(0.0_f32, f32::max);

        Self {
            name: name.into(),
            duration,
            bones,
        }
    }

    /// A clip that holds every bone at its rest pose.
    #[must_use]
    pub fn rest(name: impl Into<String>, bone_count: usize) -> Self {
        Self::new(name, vec![BoneTracks::default(); bone_count])
    }

    #[inline]
    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &[BoneTracks] {
        &self.bones
    }

    #[inline]
    #[must_use]
    pub fn bone(&self, index: usize) -> Option<&BoneTracks> {
        self.bones.get(index)
    }

    /// Checks that the clip was authored for `skeleton`'s bone layout.
    pub fn check_skeleton(&self, skeleton: &Skeleton) -> Result<()> {
        if self.bones.len() == skeleton.bone_count() {
            Ok(())
        } else {
            Err(HayloftError::BoneCountMismatch {
                context: format!("clip '{}'", self.name),
                expected: skeleton.bone_count(),
                found: self.bones.len(),
            })
        }
    }
}
