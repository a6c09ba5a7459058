//! Runtime Settings
//!
//! This module defines the tunable constants of the simulation.
//!
//! The top-level [`EngineSettings`] groups four sections:
//!
//! | Section    | Controls                                              |
//! |------------|-------------------------------------------------------|
//! | `timestep` | Fixed tick rate and the catch-up backlog cap          |
//! | `solver`   | Slide count, iteration cap, margin, map cell size     |
//! | `blend`    | Cross-fade speed and the "nearly complete" threshold  |
//! | `player`   | Walk speed, gravity, jump impulse, body box           |
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use hayloft::settings::EngineSettings;
//!
//! // Defaults: 60 Hz, 8-step backlog, 2 slides x 80 iterations
//! let settings = EngineSettings::default();
//!
//! // Partial JSON: omitted fields keep their defaults
//! let settings = EngineSettings::from_json(r#"{ "timestep": { "hz": 120 } }"#)?;
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::errors::{HayloftError, Result};

// ---------------------------------------------------------------------------
// TimestepSettings
// ---------------------------------------------------------------------------

/// Fixed-timestep driver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimestepSettings {
    /// Simulation ticks per second.
    pub hz: f32,
    /// Upper bound on ticks executed for a single rendered frame.
    pub max_steps_per_frame: u32,
}

impl Default for TimestepSettings {
    fn default() -> Self {
        Self {
            hz: 60.0,
            max_steps_per_frame: 8,
        }
    }
}

impl TimestepSettings {
    /// Duration of one tick in seconds.
    #[inline]
    #[must_use]
    pub fn step_seconds(&self) -> f32 {
        1.0 / self.hz
    }
}

// ---------------------------------------------------------------------------
// SolverSettings
// ---------------------------------------------------------------------------

/// Slide solver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Number of slide bounces resolved per step.
    pub max_slide_count: usize,
    /// Step-halving iterations allowed inside one slide.
    pub max_iterations: usize,
    /// Squared displacement below which motion counts as resolved.
    pub margin: f32,
    /// World-space edge length of one collision map cell.
    pub cell_size: f32,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            max_slide_count: 2,
            max_iterations: 80,
            margin: 1e-6,
            cell_size: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// BlendSettings
// ---------------------------------------------------------------------------

/// Animation cross-fade configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendSettings {
    /// Blend factor gained per second.
    pub rate: f32,
    /// Factor at or above which a fade counts as finished for transitions.
    pub nearly_complete: f32,
}

impl Default for BlendSettings {
    fn default() -> Self {
        Self {
            rate: 6.0,
            nearly_complete: 0.9,
        }
    }
}

// ---------------------------------------------------------------------------
// PlayerSettings
// ---------------------------------------------------------------------------

/// Movement policy for the player character.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Horizontal speed while a direction is held.
    pub walk_speed: f32,
    /// Downward acceleration.
    pub gravity: f32,
    /// Upward speed applied on jump.
    pub jump_speed: f32,
    /// Box corner offsets relative to the body center (y up).
    pub top_left: Vec2,
    pub bottom_right: Vec2,
    /// Horizontal speed under which the character counts as standing.
    pub idle_threshold: f32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            walk_speed: 3.0,
            gravity: 20.0,
            jump_speed: 8.0,
            top_left: Vec2::new(-0.4, 0.45),
            bottom_right: Vec2::new(0.4, -0.45),
            idle_threshold: 0.05,
        }
    }
}

// ---------------------------------------------------------------------------
// EngineSettings
// ---------------------------------------------------------------------------

/// All runtime tunables.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub timestep: TimestepSettings,
    pub solver: SolverSettings,
    pub blend: BlendSettings,
    pub player: PlayerSettings,
}

impl EngineSettings {
    /// Parses settings from JSON and validates them.
    pub fn from_json(source: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects values the runtime cannot work with.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(HayloftError::InvalidSettings(msg.to_string()));

        if !(self.timestep.hz.is_finite() && self.timestep.hz > 0.0) {
            return invalid("timestep.hz must be positive");
        }
        if self.timestep.max_steps_per_frame == 0 {
            return invalid("timestep.max_steps_per_frame must be at least 1");
        }
        if self.solver.max_iterations == 0 {
            return invalid("solver.max_iterations must be at least 1");
        }
        if !(self.solver.margin > 0.0) {
            return invalid("solver.margin must be positive");
        }
        if !(self.solver.cell_size > 0.0) {
            return invalid("solver.cell_size must be positive");
        }
        if !(self.blend.rate >= 0.0) || !(0.0..=1.0).contains(&self.blend.nearly_complete) {
            return invalid("blend.rate must be >= 0 and blend.nearly_complete in [0, 1]");
        }
        let size = self.player.bottom_right - self.player.top_left;
        if !(size.x > 0.0 && size.y < 0.0) {
            return invalid("player box must have top_left above and left of bottom_right");
        }
        Ok(())
    }
}
