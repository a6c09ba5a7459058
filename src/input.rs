//! Per-tick action state.
//!
//! The host feeds raw key state in through [`ActionState::set`]; the
//! simulation reads it and calls [`ActionState::end_tick`] once per tick so
//! that edge queries like [`Action::just_pressed`] see exactly one rising
//! edge per press.

/// One bindable action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Left,
    Right,
    Jump,
}

/// Current and previous-tick state of one action.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    pub pressed: bool,
    pub was_pressed: bool,
}

impl Action {
    /// Pressed this tick but not the previous one.
    #[inline]
    #[must_use]
    pub fn just_pressed(&self) -> bool {
        self.pressed && !self.was_pressed
    }

    #[inline]
    #[must_use]
    pub fn just_released(&self) -> bool {
        !self.pressed && self.was_pressed
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ActionState {
    pub left: Action,
    pub right: Action,
    pub jump: Action,
}

impl ActionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, kind: ActionKind) -> Action {
        match kind {
            ActionKind::Left => self.left,
            ActionKind::Right => self.right,
            ActionKind::Jump => self.jump,
        }
    }

    fn get_mut(&mut self, kind: ActionKind) -> &mut Action {
        match kind {
            ActionKind::Left => &mut self.left,
            ActionKind::Right => &mut self.right,
            ActionKind::Jump => &mut self.jump,
        }
    }

    /// Records the raw key state for `kind`.
    pub fn set(&mut self, kind: ActionKind, pressed: bool) {
        self.get_mut(kind).pressed = pressed;
    }

    /// Horizontal intent in `[-1, 1]`; opposite keys cancel.
    #[must_use]
    pub fn horizontal(&self) -> f32 {
        f32::from(u8::from(self.right.pressed)) - f32::from(u8::from(self.left.pressed))
    }

    /// Tick end: the current state becomes the previous one.
    pub fn end_tick(&mut self) {
        for action in [&mut self.left, &mut self.right, &mut self.jump] {
            action.was_pressed = action.pressed;
        }
    }
}
