//! Numeric helpers shared by the rig, animation and IK crates.
//!
//! Every inverse trigonometric call in Sinew goes through [`safe_acos`] or
//! [`safe_asin`], and every "rotate this direction onto that one" goes
//! through [`rotation_between_vectors`]. Both are total: they never return
//! NaN, whatever the input geometry.

use glam::{Quat, Vec3};

/// Threshold under which a length is treated as zero.
pub const LENGTH_EPSILON: f32 = 1e-6;

/// Threshold on `1 - |dot|` under which two unit directions are treated as
/// parallel (or anti-parallel).
pub const PARALLEL_EPSILON: f32 = 1e-6;

/// `acos` with its argument clamped to `[-1, 1]`.
#[inline]
#[must_use]
pub fn safe_acos(x: f32) -> f32 {
    x.clamp(-1.0, 1.0).acos()
}

/// `asin` with its argument clamped to `[-1, 1]`.
#[inline]
#[must_use]
pub fn safe_asin(x: f32) -> f32 {
    x.clamp(-1.0, 1.0).asin()
}

/// Returns a unit vector perpendicular to `v`.
///
/// Picks the world axis least aligned with `v` and crosses against it, so
/// the result is stable for any non-zero input.
#[must_use]
pub fn any_perpendicular(v: Vec3) -> Vec3 {
    let abs = v.abs();
    let axis = if abs.x <= abs.y && abs.x <= abs.z {
        Vec3::X
    } else if abs.y <= abs.z {
        Vec3::Y
    } else {
        Vec3::Z
    };
    v.cross(axis).try_normalize().unwrap_or(Vec3::X)
}

/// Removes the component of `v` along the unit normal `n`.
#[inline]
#[must_use]
pub fn project_on_plane(v: Vec3, n: Vec3) -> Vec3 {
    v - n * v.dot(n)
}

/// Shortest-arc rotation taking direction `from` onto direction `to`.
///
/// Inputs need not be normalized. Degenerate cases:
/// - either vector has (near) zero length: identity
/// - directions nearly coincide: identity
/// - directions nearly opposite: a half turn about an arbitrary axis
///   perpendicular to `from`
#[must_use]
pub fn rotation_between_vectors(from: Vec3, to: Vec3) -> Quat {
    let (Some(a), Some(b)) = (from.try_normalize(), to.try_normalize()) else {
        return Quat::IDENTITY;
    };

    let d = a.dot(b);
    if d >= 1.0 - PARALLEL_EPSILON {
        return Quat::IDENTITY;
    }
    if d <= -1.0 + PARALLEL_EPSILON {
        return Quat::from_axis_angle(any_perpendicular(a), std::f32::consts::PI);
    }

    let axis = a.cross(b).normalize();
    Quat::from_axis_angle(axis, safe_acos(d))
}

/// Linear interpolation of scalars.
#[inline]
#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_acos_clamps_out_of_range() {
        assert_eq!(safe_acos(1.5), 0.0);
        assert!((safe_acos(-1.000_01) - std::f32::consts::PI).abs() < 1e-6);
        assert!(!safe_acos(f32::MAX).is_nan());
    }

    #[test]
    fn rotation_between_opposite_vectors_is_half_turn() {
        let q = rotation_between_vectors(Vec3::X, -Vec3::X);
        let rotated = q * Vec3::X;
        assert!((rotated + Vec3::X).length() < 1e-5, "got {rotated}");
        assert!(q.is_normalized());
    }

    #[test]
    fn rotation_between_coincident_vectors_is_identity() {
        assert_eq!(rotation_between_vectors(Vec3::Y, Vec3::Y * 3.0), Quat::IDENTITY);
        assert_eq!(rotation_between_vectors(Vec3::ZERO, Vec3::Y), Quat::IDENTITY);
    }

    #[test]
    fn rotation_between_maps_from_onto_to() {
        let from = Vec3::new(1.0, 2.0, 0.5);
        let to = Vec3::new(-0.3, 0.1, 2.0);
        let q = rotation_between_vectors(from, to);
        let mapped = (q * from).normalize();
        assert!((mapped - to.normalize()).length() < 1e-5);
    }

    #[test]
    fn any_perpendicular_is_orthogonal_unit() {
        for v in [Vec3::X, Vec3::Y, Vec3::Z, Vec3::new(1.0, 1.0, 1.0), Vec3::new(0.0, -3.0, 0.1)] {
            let p = any_perpendicular(v);
            assert!(p.dot(v).abs() < 1e-5);
            assert!((p.length() - 1.0).abs() < 1e-5);
        }
    }
}
