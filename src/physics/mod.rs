//! Tile collision and platformer movement.
//!
//! - [`CollisionMap`]: grid of cell tags with world/cell conversion
//! - [`PhysicsBody`]: box, velocity, and per-step contact state
//! - [`SlideSolver`]: moves bodies through the map and slides along walls

pub mod body;
pub mod map;
pub mod solver;

pub use body::{Aabb, CONTACT_CAPACITY, PhysicsBody};
pub use map::{Cell, CollisionMap};
pub use solver::{Blocker, Motion, SlideSolver, separating_normal};
