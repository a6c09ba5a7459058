//! Slide Solver
//!
//! Moves an axis-aligned body through a [`CollisionMap`] and slides it along
//! whatever it hits.
//!
//! # Algorithm
//!
//! One call to [`SlideSolver::solve`] resolves a single tick:
//!
//! 1. The intended displacement is `velocity * dt`.
//! 2. The motion pass tries the full remaining displacement. A trial that
//!    lands inside a solid cell is discarded and the step is halved; a free
//!    trial is committed. This repeats until the remainder or the step falls
//!    under the margin, or the iteration cap is reached.
//! 3. If the pass ended against a cell, the blocked step is retried one axis
//!    at a time from the final position to find the face actually hit, and
//!    the separating axis between the body and that cell gives the contact
//!    normal. The velocity and the remaining
//!    displacement lose their component into the surface, and the next slide
//!    continues with what is left.
//!
//! The number of slides per tick is capped, so resolution is best effort: a
//! body ends every step either where it started or somewhere free.

use glam::{IVec2, Vec2};

use crate::physics::body::{Aabb, PhysicsBody};
use crate::physics::map::CollisionMap;
use crate::settings::SolverSettings;

/// A solid cell that blocked a motion pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blocker {
    /// Grid coordinates of the cell.
    pub cell: IVec2,
    /// World-space box of the cell.
    pub bounds: Aabb,
}

/// Outcome of one motion pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    /// Displacement actually committed.
    pub moved: Vec2,
    /// Cell that stopped the pass, resolved against the final position.
    pub blocker: Option<Blocker>,
    /// Trials performed.
    pub iterations: usize,
}

/// Contact normal for two boxes that do not overlap.
///
/// Returns the axis that separates `body` from `obstacle`, pointing from the
/// obstacle toward the body. Vertical separation wins when both axes
/// separate. Overlapping boxes have no separating axis and yield `None`.
#[must_use]
pub fn separating_normal(body: &Aabb, obstacle: &Aabb) -> Option<Vec2> {
    if body.min.y >= obstacle.max.y {
        Some(Vec2::Y)
    } else if body.max.y <= obstacle.min.y {
        Some(Vec2::NEG_Y)
    } else if body.min.x >= obstacle.max.x {
        Some(Vec2::X)
    } else if body.max.x <= obstacle.min.x {
        Some(Vec2::NEG_X)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SlideSolver {
    settings: SolverSettings,
}

impl SlideSolver {
    #[must_use]
    pub fn new(settings: SolverSettings) -> Self {
        Self { settings }
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    /// Runs one motion pass along `displacement`, committing free trials to
    /// `body.position`.
    pub fn solve_motion(
        &self,
        map: &CollisionMap,
        body: &mut PhysicsBody,
        displacement: Vec2,
    ) -> Motion {
        let margin = self.settings.margin;
        let cell_size = self.settings.cell_size;

        let mut remaining = displacement;
        let mut step = displacement;
        let mut moved = Vec2::ZERO;
        let mut rejected = None;
        let mut iterations = 0;

        while iterations < self.settings.max_iterations {
            if step.length_squared() < margin || remaining.length_squared() < margin {
                break;
            }
            iterations += 1;

            let trial = body.position + step;
            if let Some(cell) = map.first_solid_in(&body.aabb_at(trial), cell_size) {
                rejected = Some((step, cell));
                step *= 0.5;
                continue;
            }

            body.position = trial;
            moved += step;
            remaining -= step;
            if step.length_squared() > remaining.length_squared() {
                step = remaining;
            }
        }

        if iterations == self.settings.max_iterations {
            log::debug!(
                "Motion pass hit the iteration cap ({iterations}) with {remaining} left"
            );
        }

        let blocker = rejected.map(|(step, cell)| {
            let cell = self.face_blocker(map, body, step).unwrap_or(cell);
            Blocker {
                cell,
                bounds: map.cell_bounds(cell, cell_size),
            }
        });

        Motion {
            moved,
            blocker,
            iterations,
        }
    }

    /// Cell the body runs into when `step` is applied one axis at a time
    /// from its current position, vertical axis first.
    ///
    /// A rejected diagonal trial can clip a cell that only touches the body
    /// at a corner, such as the wall cell just below a body sliding down that
    /// wall. Such a cell is reported only when neither axis alone is blocked.
    fn face_blocker(&self, map: &CollisionMap, body: &PhysicsBody, step: Vec2) -> Option<IVec2> {
        let cell_size = self.settings.cell_size;
        [Vec2::new(0.0, step.y), Vec2::new(step.x, 0.0)]
            .into_iter()
            .filter(|axis_step| *axis_step != Vec2::ZERO)
            .find_map(|axis_step| {
                let trial = body.aabb_at(body.position + axis_step);
                map.first_solid_in(&trial, cell_size)
            })
    }

    /// Moves `body` by `velocity * dt`, sliding along contacts, and returns
    /// the velocity with every blocked component removed.
    ///
    /// Clears and refills the body's contact normals and floor flag.
    pub fn solve(
        &self,
        map: &CollisionMap,
        body: &mut PhysicsBody,
        velocity: Vec2,
        dt: f32,
    ) -> Vec2 {
        body.reset_contacts();

        let mut total = velocity * dt;
        let mut velocity_out = velocity;

        for _ in 0..self.settings.max_slide_count {
            let motion = self.solve_motion(map, body, total);
            let Some(blocker) = motion.blocker else {
                break;
            };

            let Some(normal) = separating_normal(&body.aabb(), &blocker.bounds) else {
                log::debug!(
                    "Body at {} overlaps cell {}, no separating axis",
                    body.position,
                    blocker.cell
                );
                break;
            };

            if let Err(e) = body.push_contact(normal) {
                log::warn!("Dropping contact {normal}: {e}");
                break;
            }

            let into = velocity.dot(normal);
            if into < 0.0 {
                velocity_out -= normal * into;
            }

            total -= motion.moved;
            let left_into = total.dot(normal);
            if left_into < 0.0 {
                total -= normal * left_into;
            }

            if normal.dot(Vec2::Y) > 0.5 {
                body.on_floor = true;
            }
        }

        velocity_out
    }

    /// Solves with the body's own velocity and stores the result back.
    pub fn step_body(&self, map: &CollisionMap, body: &mut PhysicsBody, dt: f32) {
        let velocity = body.velocity;
        body.velocity = self.solve(map, body, velocity, dt);
    }
}
