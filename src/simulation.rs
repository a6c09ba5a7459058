//! Simulation Context
//!
//! [`Simulation`] owns every piece of mutable runtime state: settings, the
//! collision map, the player character and the action state. A host calls
//! [`Simulation::frame`] once per rendered frame; it runs as many fixed
//! ticks as the elapsed time pays for.
//!
//! One tick runs, in order:
//!
//! | Stage      | Work                                                   |
//! |------------|--------------------------------------------------------|
//! | controller | walk / gravity / jump into the body velocity           |
//! | solver     | slide the body through the map                         |
//! | animation  | pick a state, step both playbacks, advance the fade    |
//! | blend      | write blended local poses into the skeleton            |
//! | hierarchy  | local → global poses under the character transform     |
//! | skinning   | global × inverse bind                                  |

use glam::{Mat4, Quat, Vec2, Vec3};

use crate::animation::{AnimationState, Animator};
use crate::errors::Result;
use crate::input::ActionState;
use crate::physics::{CollisionMap, PhysicsBody, SlideSolver};
use crate::scene::Skeleton;
use crate::settings::{EngineSettings, PlayerSettings};
use crate::utils::FixedTimestep;

// ============================================================================
// PlayerController
// ============================================================================

/// Platformer movement policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerController {
    settings: PlayerSettings,
    facing: f32,
}

impl PlayerController {
    #[must_use]
    pub fn new(settings: PlayerSettings) -> Self {
        Self {
            settings,
            facing: 1.0,
        }
    }

    /// `1.0` facing right, `-1.0` facing left.
    #[inline]
    #[must_use]
    pub fn facing(&self) -> f32 {
        self.facing
    }

    /// Writes this tick's intended velocity into `body`.
    ///
    /// Uses the floor flag from the previous solve, so a jump is only
    /// accepted while standing.
    pub fn update(&mut self, body: &mut PhysicsBody, actions: &ActionState, dt: f32) {
        let direction = actions.horizontal();
        if direction != 0.0 {
            self.facing = direction.signum();
        }

        body.velocity.x = direction * self.settings.walk_speed;
        body.velocity.y -= self.settings.gravity * dt;

        if body.on_floor() && actions.jump.just_pressed() {
            log::trace!("Jump from {}", body.position);
            body.velocity.y = self.settings.jump_speed;
        }
    }

    /// Animation state matching the body's motion.
    #[must_use]
    pub fn choose_state(&self, body: &PhysicsBody) -> AnimationState {
        if !body.on_floor() {
            if body.velocity.y > 0.0 {
                AnimationState::Jump
            } else {
                AnimationState::Fall
            }
        } else if body.velocity.x.abs() > self.settings.idle_threshold {
            AnimationState::Walk
        } else {
            AnimationState::Idle
        }
    }
}

// ============================================================================
// Character
// ============================================================================

/// A skinned character moved by physics.
#[derive(Debug, Clone)]
pub struct Character {
    pub body: PhysicsBody,
    pub skeleton: Skeleton,
    pub animator: Animator,
}

impl Character {
    /// Model transform: body position, mirrored on X when facing left.
    #[must_use]
    pub fn world_matrix(&self, facing: f32) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::new(facing, 1.0, 1.0),
            Quat::IDENTITY,
            self.body.position.extend(0.0),
        )
    }
}

// ============================================================================
// Simulation
// ============================================================================

#[derive(Debug, Clone)]
pub struct Simulation {
    settings: EngineSettings,
    map: CollisionMap,
    solver: SlideSolver,
    controller: PlayerController,
    player: Character,
    actions: ActionState,
    timestep: FixedTimestep,
}

impl Simulation {
    /// Builds a simulation and places the player on the map's spawn marker.
    ///
    /// Without a spawn marker the player starts at the world origin.
    pub fn new(
        settings: EngineSettings,
        mut map: CollisionMap,
        skeleton: Skeleton,
        animator: Animator,
    ) -> Result<Self> {
        settings.validate()?;

        let position = if let Some(cell) = map.take_spawn() {
            map.cell_center(cell, settings.solver.cell_size)
        } else {
            log::warn!("Collision map has no player spawn, starting at the origin");
            Vec2::ZERO
        };

        let body = PhysicsBody::new(
            position,
            settings.player.top_left,
            settings.player.bottom_right,
        );

        let mut sim = Self {
            settings,
            map,
            solver: SlideSolver::new(settings.solver),
            controller: PlayerController::new(settings.player),
            player: Character {
                body,
                skeleton,
                animator,
            },
            actions: ActionState::new(),
            timestep: FixedTimestep::new(
                settings.timestep.step_seconds(),
                settings.timestep.max_steps_per_frame,
            ),
        };
        sim.update_pose();
        Ok(sim)
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    #[inline]
    #[must_use]
    pub fn map(&self) -> &CollisionMap {
        &self.map
    }

    #[inline]
    pub fn map_mut(&mut self) -> &mut CollisionMap {
        &mut self.map
    }

    #[inline]
    #[must_use]
    pub fn player(&self) -> &Character {
        &self.player
    }

    #[inline]
    pub fn player_mut(&mut self) -> &mut Character {
        &mut self.player
    }

    #[inline]
    #[must_use]
    pub fn controller(&self) -> &PlayerController {
        &self.controller
    }

    #[inline]
    #[must_use]
    pub fn actions(&self) -> &ActionState {
        &self.actions
    }

    /// Raw key state; read on the next tick.
    #[inline]
    pub fn actions_mut(&mut self) -> &mut ActionState {
        &mut self.actions
    }

    #[inline]
    #[must_use]
    pub fn timestep(&self) -> &FixedTimestep {
        &self.timestep
    }

    /// Runs the ticks owed for `wall_dt` seconds of real time.
    pub fn frame(&mut self, wall_dt: f32) -> u32 {
        let steps = self.timestep.advance(wall_dt);
        for _ in 0..steps {
            self.tick();
        }
        steps
    }

    /// Runs exactly one fixed tick.
    pub fn tick(&mut self) {
        let dt = self.timestep.step();
        let player = &mut self.player;

        self.controller.update(&mut player.body, &self.actions, dt);
        self.solver.step_body(&self.map, &mut player.body, dt);

        let state = self.controller.choose_state(&player.body);
        player.animator.set_state(state);
        player.animator.update(dt);

        self.update_pose();
        self.actions.end_tick();

        log::trace!(
            "tick: pos={} vel={} floor={} state={:?}",
            self.player.body.position,
            self.player.body.velocity,
            self.player.body.on_floor(),
            state
        );
    }

    fn update_pose(&mut self) {
        let player = &mut self.player;
        player.animator.apply(&mut player.skeleton);

        let world = player.world_matrix(self.controller.facing());
        player.skeleton.compute_global_poses(world);
        player.skeleton.compute_skinning_matrices();
    }
}
