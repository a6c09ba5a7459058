use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;

use crate::animation::clip::{AnimationClip, BoneTracks};
use crate::animation::tracks::{InterpolationMode, KeyframeTrack};
use crate::errors::Result;
use crate::scene::Skeleton;

/// A timed key as delivered by the importer, in animation ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportKey<T> {
    pub tick: f64,
    pub value: T,
}

/// Keys for one named node, as extracted from a scene file.
#[derive(Debug, Clone, Default)]
pub struct NodeChannel {
    pub node_name: String,
    pub position_keys: Vec<ImportKey<Vec3>>,
    pub scale_keys: Vec<ImportKey<Vec3>>,
    pub rotation_keys: Vec<ImportKey<Quat>>,
}

/// An animation as extracted from a scene file, before bone resolution.
#[derive(Debug, Clone, Default)]
pub struct ImportedAnimation {
    pub name: String,
    pub ticks_per_second: f64,
    pub channels: Vec<NodeChannel>,
}

pub struct Binder;

impl Binder {
    /// Resolves named channels against the skeleton's bones and builds a clip.
    ///
    /// Channels naming unknown nodes are skipped. Bones without a channel,
    /// and channels with an empty key list, get a single rest key.
    pub fn bind(skeleton: &Skeleton, animation: &ImportedAnimation) -> Result<AnimationClip> {
        let by_name: FxHashMap<&str, usize> = skeleton
            .bones()
            .iter()
            .enumerate()
            .map(|(index, bone)| (bone.name.as_str(), index))
            .collect();

        let ticks_per_second = if animation.ticks_per_second > 0.0 {
            animation.ticks_per_second
        } else {
            1.0
        };

        let mut bones = vec![BoneTracks::default(); skeleton.bone_count()];
        let mut bound = 0_usize;

        for channel in &animation.channels {
            let Some(&bone_index) = by_name.get(channel.node_name.as_str()) else {
                log::debug!(
                    "Animation '{}': no bone named '{}', channel skipped",
                    animation.name,
                    channel.node_name
                );
                continue;
            };

            bones[bone_index] = BoneTracks {
                position: to_track(&channel.position_keys, ticks_per_second, Vec3::ZERO)?,
                scale: to_track(&channel.scale_keys, ticks_per_second, Vec3::ONE)?,
                rotation: to_track(&channel.rotation_keys, ticks_per_second, Quat::IDENTITY)?,
            };
            bound += 1;
        }

        log::debug!(
            "Animation '{}': bound {bound}/{} channels onto skeleton '{}'",
            animation.name,
            animation.channels.len(),
            skeleton.name
        );

        Ok(AnimationClip::new(animation.name.clone(), bones))
    }
}

fn to_track<T>(keys: &[ImportKey<T>], ticks_per_second: f64, fallback: T) -> Result<KeyframeTrack<T>>
where
    T: crate::animation::values::Interpolatable,
{
    let times = keys
        .iter()
        .map(|k| (k.tick / ticks_per_second) as f32)
        .collect();
    let values = keys.iter().map(|k| k.value).collect();
    KeyframeTrack::new_or(times, values, InterpolationMode::Linear, fallback)
}
