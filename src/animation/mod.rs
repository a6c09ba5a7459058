pub mod values;
pub mod tracks;
pub mod clip;
pub mod binder;
pub mod playback;
pub mod blend;
pub mod animator;

pub use clip::{AnimationClip, BoneTracks};
pub use binder::{Binder, ImportKey, ImportedAnimation, NodeChannel};
pub use playback::{BonePlayback, LoopRegion, Playback};
pub use blend::{PoseBlender, blend_poses};
pub use animator::{AnimationLibrary, AnimationState, Animator, ClipKey};
pub use tracks::{InterpolationMode, KeyframeTrack};
