use std::sync::Arc;

use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};

use crate::animation::blend::PoseBlender;
use crate::animation::clip::AnimationClip;
use crate::animation::playback::LoopRegion;
use crate::errors::{HayloftError, Result};
use crate::scene::Skeleton;
use crate::settings::BlendSettings;

new_key_type! {
    pub struct ClipKey;
}

/// Character animation states chosen by game logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationState {
    Idle,
    Walk,
    Jump,
    Fall,
}

/// Clip storage with lookup by name.
#[derive(Debug, Default, Clone)]
pub struct AnimationLibrary {
    clips: SlotMap<ClipKey, Arc<AnimationClip>>,
    by_name: FxHashMap<String, ClipKey>,
}

impl AnimationLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a clip. A clip with the same name replaces the lookup entry.
    pub fn insert(&mut self, clip: AnimationClip) -> ClipKey {
        let name = clip.name.clone();
        let key = self.clips.insert(Arc::new(clip));
        self.by_name.insert(name, key);
        key
    }

    #[must_use]
    pub fn get(&self, key: ClipKey) -> Option<&Arc<AnimationClip>> {
        self.clips.get(key)
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<ClipKey> {
        self.by_name.get(name).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClipKey, &Arc<AnimationClip>)> {
        self.clips.iter()
    }
}

/// Drives a [`PoseBlender`] from discrete animation states.
#[derive(Debug, Clone)]
pub struct Animator {
    library: AnimationLibrary,
    states: FxHashMap<AnimationState, ClipKey>,
    state: AnimationState,
    blender: PoseBlender,
}

impl Animator {
    /// Creates an animator resting in `initial` on a neutral pose.
    ///
    /// Every clip in `library` must match the skeleton's bone layout.
    pub fn new(
        skeleton: &Skeleton,
        library: AnimationLibrary,
        initial: AnimationState,
        settings: BlendSettings,
    ) -> Result<Self> {
        for (_, clip) in library.iter() {
            clip.check_skeleton(skeleton)?;
        }

        let rest = Arc::new(AnimationClip::rest("rest", skeleton.bone_count()));
        Ok(Self {
            library,
            states: FxHashMap::default(),
            state: initial,
            blender: PoseBlender::new(rest, settings),
        })
    }

    /// Associates a state with a registered clip. If `state` is the active
    /// state the clip starts playing immediately.
    pub fn bind_state(&mut self, state: AnimationState, clip_name: &str) -> Result<()> {
        let key = self
            .library
            .find(clip_name)
            .ok_or_else(|| HayloftError::UnknownClip(clip_name.to_string()))?;
        self.states.insert(state, key);

        if state == self.state {
            if let Some(clip) = self.library.get(key) {
                self.blender.transition(Arc::clone(clip));
            }
        }
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> AnimationState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn blender(&self) -> &PoseBlender {
        &self.blender
    }

    #[inline]
    #[must_use]
    pub fn library(&self) -> &AnimationLibrary {
        &self.library
    }

    /// Switches state. Returns `true` if the state changed.
    ///
    /// States without a bound clip keep the current clip playing.
    pub fn set_state(&mut self, state: AnimationState) -> bool {
        if state == self.state {
            return false;
        }
        log::debug!("Animation state {:?} -> {state:?}", self.state);
        self.state = state;

        if let Some(clip) = self
            .states
            .get(&state)
            .and_then(|&key| self.library.get(key))
        {
            self.blender.transition(Arc::clone(clip));
        }
        true
    }

    /// Advances both playbacks (each looping over its own clip) and the fade.
    pub fn update(&mut self, dt: f32) {
        let previous = LoopRegion::whole(self.blender.previous().clip());
        self.blender.previous_mut().step_looped(dt, previous);

        let current = LoopRegion::whole(self.blender.current().clip());
        self.blender.current_mut().step_looped(dt, current);

        self.blender.advance(dt);
    }

    /// Writes the blended local pose into the skeleton.
    pub fn apply(&self, skeleton: &mut Skeleton) -> usize {
        self.blender.apply(skeleton)
    }
}
