use std::sync::Arc;

use glam::{Mat4, Quat, Vec3};

use crate::animation::clip::{AnimationClip, BoneTracks};
use crate::animation::values::unit_quat;
use crate::scene::Skeleton;

/// Time window that a looping playback wraps into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopRegion {
    pub start: f32,
    pub length: f32,
}

impl LoopRegion {
    #[must_use]
    pub fn new(start: f32, length: f32) -> Self {
        Self { start, length }
    }

    /// Loops over the whole clip.
    #[must_use]
    pub fn whole(clip: &AnimationClip) -> Self {
        Self::new(0.0, clip.duration)
    }

    /// Maps `time` into `[start, start + length)`. A non-positive length
    /// leaves the time untouched.
    #[must_use]
    pub fn wrap(&self, time: f32) -> f32 {
        if self.length <= 0.0 {
            return time;
        }
        let end = self.start + self.length;
        if time >= self.start && time < end {
            return time;
        }
        self.start + (time - self.start).rem_euclid(self.length)
    }
}

/// Sampled state of one bone.
///
/// The interpolated transform is kept both as values (for blending) and as
/// separate translate / rotate / scale matrices, composed as `T * R * S`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BonePlayback {
    pub position_index: usize,
    pub scale_index: usize,
    pub rotation_index: usize,

    pub position: Vec3,
    pub scale: Vec3,
    pub rotation: Quat,

    pub translation_matrix: Mat4,
    pub rotation_matrix: Mat4,
    pub scale_matrix: Mat4,
}

impl Default for BonePlayback {
    fn default() -> Self {
        Self {
            position_index: 0,
            scale_index: 0,
            rotation_index: 0,
            position: Vec3::ZERO,
            scale: Vec3::ONE,
            rotation: Quat::IDENTITY,
            translation_matrix: Mat4::IDENTITY,
            rotation_matrix: Mat4::IDENTITY,
            scale_matrix: Mat4::IDENTITY,
        }
    }
}

impl BonePlayback {
    /// Resolves the key indices of all three tracks and interpolates.
    ///
    /// Stepped, single-key and clamped rotation samples are raw keys, so the
    /// sampled rotation is normalized here. A key that cannot be normalized
    /// becomes identity.
    fn seek(&mut self, bone: usize, tracks: &BoneTracks, time: f32) {
        self.position_index = tracks.position.seek_index(time);
        self.scale_index = tracks.scale.seek_index(time);
        self.rotation_index = tracks.rotation.seek_index(time);

        self.position = tracks.position.sample_at(self.position_index, time);
        self.scale = tracks.scale.sample_at(self.scale_index, time);
        let rotation = tracks.rotation.sample_at(self.rotation_index, time);
        self.rotation = unit_quat(rotation).unwrap_or_else(|| {
            log::warn!("Bone {bone}: degenerate rotation {rotation} at {time}s, using identity");
            Quat::IDENTITY
        });

        self.translation_matrix = Mat4::from_translation(self.position);
        self.rotation_matrix = Mat4::from_quat(self.rotation);
        self.scale_matrix = Mat4::from_scale(self.scale);
    }

    /// Local pose: scale first, then rotate, then translate.
    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> Mat4 {
        self.translation_matrix * self.rotation_matrix * self.scale_matrix
    }
}

/// A time cursor over one clip plus the cached per-bone samples.
#[derive(Debug, Clone)]
pub struct Playback {
    clip: Arc<AnimationClip>,
    time: f32,
    bones: Vec<BonePlayback>,
}

impl Playback {
    /// Starts a playback at time zero.
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let bone_count = clip.bone_count();
        let mut playback = Self {
            clip,
            time: 0.0,
            bones: vec![BonePlayback::default(); bone_count],
        };
        playback.seek(0.0);
        playback
    }

    #[inline]
    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    #[inline]
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &[BonePlayback] {
        &self.bones
    }

    #[inline]
    #[must_use]
    pub fn bone(&self, index: usize) -> Option<&BonePlayback> {
        self.bones.get(index)
    }

    /// Jumps to `time`, re-resolving every key index from the start of each
    /// track.
    pub fn seek(&mut self, time: f32) {
        for (bone, (state, tracks)) in self.bones.iter_mut().zip(self.clip.bones()).enumerate() {
            state.seek(bone, tracks, time);
        }
        self.time = time;
    }

    /// Advances by `dt`. Equivalent to `seek(time + dt)`; no wrapping.
    pub fn step(&mut self, dt: f32) {
        self.seek(self.time + dt);
    }

    /// Advances by `dt` and wraps the result into `region`.
    pub fn step_looped(&mut self, dt: f32, region: LoopRegion) {
        self.seek(region.wrap(self.time + dt));
    }

    /// Writes `T * R * S` for every bone into the skeleton's local poses.
    pub fn apply(&self, skeleton: &mut Skeleton) {
        debug_assert_eq!(self.bones.len(), skeleton.bone_count());
        for (pose, state) in skeleton.local_poses_mut().iter_mut().zip(&self.bones) {
            *pose = state.local_matrix();
        }
    }
}
