#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::float_cmp)]

pub mod animation;
pub mod errors;
pub mod input;
pub mod physics;
pub mod scene;
pub mod settings;
pub mod simulation;
pub mod utils;

pub use animation::{
    AnimationClip, AnimationLibrary, AnimationState, Animator, Binder, LoopRegion, Playback,
    PoseBlender,
};
pub use errors::{HayloftError, Result};
pub use input::{Action, ActionKind, ActionState};
pub use physics::{Cell, CollisionMap, PhysicsBody, SlideSolver};
pub use scene::{Bone, Skeleton, SkeletonAsset};
pub use settings::EngineSettings;
pub use simulation::{Character, PlayerController, Simulation};
pub use utils::FixedTimestep;
