//! Pose Blending
//!
//! Cross-fades two playbacks (previous clip, current clip) into one set of
//! local poses. Per bone, position and scale are lerped and the rotations
//! are nlerped after normalization, then composed as `T * R * S`.
//!
//! The blend factor rises toward 1 every frame. On a transition, a fade that
//! is not yet nearly complete keeps its previous playback as the source and
//! only the current playback is replaced; a finished fade promotes current
//! to previous and restarts from 0. Fades therefore chain without ever
//! mixing three clips.

use std::sync::Arc;

use glam::{Mat3, Mat4, Quat};

use crate::animation::clip::AnimationClip;
use crate::animation::playback::{BonePlayback, Playback};
use crate::animation::values::nlerp;
use crate::scene::Skeleton;
use crate::settings::BlendSettings;

/// Rotation matrices whose determinant magnitude falls below this are
/// replaced by identity.
pub const MIN_ROTATION_DETERMINANT: f32 = 0.8;

/// Accepts `q` only if its rotation matrix keeps a determinant magnitude of
/// at least [`MIN_ROTATION_DETERMINANT`]. Non-finite rotations are rejected.
///
/// In [`blend_bone`] near-zero or non-finite inputs are already turned away
/// by [`nlerp`], which only returns unit quaternions. This check is the last
/// gate before a rotation reaches the pose and catches anything that is not
/// a proper rotation.
#[must_use]
pub fn checked_rotation(q: Quat) -> Option<Quat> {
    let det = Mat3::from_quat(q).determinant().abs();
    (det >= MIN_ROTATION_DETERMINANT).then_some(q)
}

/// Blends one bone. Returns the local matrix and whether the rotation had
/// to be replaced by identity.
#[must_use]
pub fn blend_bone(previous: &BonePlayback, current: &BonePlayback, factor: f32) -> (Mat4, bool) {
    let position = previous.position.lerp(current.position, factor);
    let scale = previous.scale.lerp(current.scale, factor);

    let (rotation, degenerate) =
        match nlerp(previous.rotation, current.rotation, factor).and_then(checked_rotation) {
            Some(q) => (q, false),
            None => (Quat::IDENTITY, true),
        };

    let local = Mat4::from_translation(position) * Mat4::from_quat(rotation) * Mat4::from_scale(scale);
    (local, degenerate)
}

/// Blends two playbacks into `out`. Returns how many bones fell back to an
/// identity rotation.
pub fn blend_poses(previous: &Playback, current: &Playback, factor: f32, out: &mut [Mat4]) -> usize {
    let factor = factor.clamp(0.0, 1.0);
    let mut degenerate = 0;

    for (bone, ((pose, a), b)) in out
        .iter_mut()
        .zip(previous.bones())
        .zip(current.bones())
        .enumerate()
    {
        let (local, bad) = blend_bone(a, b, factor);
        if bad {
            log::warn!(
                "Degenerate rotation blending bone {bone} ('{}' -> '{}'); using identity",
                previous.clip().name,
                current.clip().name
            );
            degenerate += 1;
        }
        *pose = local;
    }

    degenerate
}

#[derive(Debug, Clone)]
pub struct PoseBlender {
    previous: Playback,
    current: Playback,
    factor: f32,
    settings: BlendSettings,
}

impl PoseBlender {
    /// Starts fully settled on `clip`.
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>, settings: BlendSettings) -> Self {
        let current = Playback::new(clip);
        Self {
            previous: current.clone(),
            current,
            factor: 1.0,
            settings,
        }
    }

    #[inline]
    #[must_use]
    pub fn factor(&self) -> f32 {
        self.factor
    }

    pub fn set_factor(&mut self, factor: f32) {
        self.factor = factor.clamp(0.0, 1.0);
    }

    #[inline]
    #[must_use]
    pub fn previous(&self) -> &Playback {
        &self.previous
    }

    #[inline]
    #[must_use]
    pub fn current(&self) -> &Playback {
        &self.current
    }

    #[inline]
    pub fn previous_mut(&mut self) -> &mut Playback {
        &mut self.previous
    }

    #[inline]
    pub fn current_mut(&mut self) -> &mut Playback {
        &mut self.current
    }

    #[inline]
    #[must_use]
    pub fn is_nearly_complete(&self) -> bool {
        self.factor >= self.settings.nearly_complete
    }

    /// Switches the current playback to `clip`.
    pub fn transition(&mut self, clip: Arc<AnimationClip>) {
        if self.is_nearly_complete() {
            let next = Playback::new(clip);
            self.previous = std::mem::replace(&mut self.current, next);
            self.factor = 0.0;
        } else {
            log::debug!(
                "Transition to '{}' at factor {:.2}; keeping '{}' as blend source",
                clip.name,
                self.factor,
                self.previous.clip().name
            );
            self.current = Playback::new(clip);
        }
    }

    /// Moves the factor toward 1.
    pub fn advance(&mut self, dt: f32) {
        self.factor = (self.factor + dt * self.settings.rate).min(1.0);
    }

    /// Writes the blended local poses into the skeleton.
    pub fn apply(&self, skeleton: &mut Skeleton) -> usize {
        blend_poses(
            &self.previous,
            &self.current,
            self.factor,
            skeleton.local_poses_mut(),
        )
    }
}
