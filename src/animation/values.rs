use glam::{Quat, Vec3, Vec4};

/// Values that can be stored in a keyframe track and blended linearly.
pub trait Interpolatable: Copy + Clone + Sized {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self;
}

impl Interpolatable for f32 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start + (end - start) * t
    }
}

impl Interpolatable for Vec3 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }
}

impl Interpolatable for Quat {
    /// Normalized lerp along the shortest arc. Degenerate keys fall back to
    /// identity.
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        nlerp(start, end, t).unwrap_or_else(|| {
            log::warn!("Degenerate rotation keys {start} -> {end}, using identity");
            Quat::IDENTITY
        })
    }
}

/// Normalizes a quaternion, returning `None` when its norm is too small or
/// not finite to give a meaningful rotation.
#[inline]
#[must_use]
pub fn unit_quat(q: Quat) -> Option<Quat> {
    Vec4::from(q).try_normalize().map(Quat::from_vec4)
}

/// Shortest-arc normalized lerp.
///
/// Both inputs are normalized first. Returns `None` if either input or the
/// interpolated result is degenerate.
#[must_use]
pub fn nlerp(start: Quat, end: Quat, t: f32) -> Option<Quat> {
    let a = Vec4::from(unit_quat(start)?);
    let mut b = Vec4::from(unit_quat(end)?);
    if a.dot(b) < 0.0 {
        b = -b;
    }
    (a + (b - a) * t).try_normalize().map(Quat::from_vec4)
}
