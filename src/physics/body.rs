use glam::Vec2;
use smallvec::SmallVec;

use crate::errors::{HayloftError, Result};

/// Most contact normals a body records in one step.
pub const CONTACT_CAPACITY: usize = 4;

/// Axis-aligned box in world space (y up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    #[inline]
    #[must_use]
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    #[inline]
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Interior overlap; touching edges do not count.
    #[inline]
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// A platformer body: a box around `position` with per-step contact state.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsBody {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Corner offsets from `position`; `top_left.y > bottom_right.y`.
    pub top_left: Vec2,
    pub bottom_right: Vec2,

    pub(crate) on_floor: bool,
    pub(crate) contacts: SmallVec<[Vec2; CONTACT_CAPACITY]>,
}

impl PhysicsBody {
    #[must_use]
    pub fn new(position: Vec2, top_left: Vec2, bottom_right: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            top_left,
            bottom_right,
            on_floor: false,
            contacts: SmallVec::new(),
        }
    }

    /// Box of the given size centered on `position`.
    #[must_use]
    pub fn with_size(position: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self::new(position, Vec2::new(-half.x, half.y), Vec2::new(half.x, -half.y))
    }

    /// Box the body would occupy at `position`.
    #[inline]
    #[must_use]
    pub fn aabb_at(&self, position: Vec2) -> Aabb {
        Aabb::new(
            position + Vec2::new(self.top_left.x, self.bottom_right.y),
            position + Vec2::new(self.bottom_right.x, self.top_left.y),
        )
    }

    #[inline]
    #[must_use]
    pub fn aabb(&self) -> Aabb {
        self.aabb_at(self.position)
    }

    #[inline]
    #[must_use]
    pub fn on_floor(&self) -> bool {
        self.on_floor
    }

    /// Normals of the surfaces hit during the last solve.
    #[inline]
    #[must_use]
    pub fn contact_normals(&self) -> &[Vec2] {
        &self.contacts
    }

    pub(crate) fn reset_contacts(&mut self) {
        self.on_floor = false;
        self.contacts.clear();
    }

    /// Records a contact normal, failing once the list is full.
    pub fn push_contact(&mut self, normal: Vec2) -> Result<()> {
        if self.contacts.len() >= CONTACT_CAPACITY {
            return Err(HayloftError::ContactOverflow {
                capacity: CONTACT_CAPACITY,
            });
        }
        self.contacts.push(normal);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_follows_offsets() {
        let body = PhysicsBody::with_size(Vec2::new(2.0, 3.0), Vec2::new(1.0, 2.0));
        let aabb = body.aabb();
        assert_eq!(aabb.min, Vec2::new(1.5, 2.0));
        assert_eq!(aabb.max, Vec2::new(2.5, 4.0));
    }

    #[test]
    fn contact_list_is_bounded() {
        let mut body = PhysicsBody::with_size(Vec2::ZERO, Vec2::ONE);
        for _ in 0..CONTACT_CAPACITY {
            body.push_contact(Vec2::Y).unwrap();
        }
        assert!(matches!(
            body.push_contact(Vec2::X),
            Err(HayloftError::ContactOverflow { capacity: CONTACT_CAPACITY })
        ));
        assert_eq!(body.contact_normals().len(), CONTACT_CAPACITY);
    }
}
