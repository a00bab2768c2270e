use glam::{Quat, Vec3, Vec4};

/// A value type a keyframe track can carry.
///
/// Scalars and vectors blend component-wise; rotations blend with slerp so
/// the result stays a unit quaternion with even angular velocity.
pub trait Interpolatable: Copy + Default {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self;

    /// Cubic Hermite: `h00·v0 + h10·dt·out0 + h01·v1 + h11·dt·in1`.
    fn interpolate_cubic(v0: Self, out_tangent0: Self, in_tangent1: Self, v1: Self, t: f32, dt: f32) -> Self;

    /// `(to - from) * scale`, the building block of automatic tangents.
    fn scaled_difference(from: Self, to: Self, scale: f32) -> Self;
}

/// Hermite basis `(h00, h10, h01, h11)` at `t`.
#[inline]
fn hermite_basis(t: f32) -> (f32, f32, f32, f32) {
    let t2 = t * t;
    let t3 = t2 * t;

    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;
    let h00 = 1.0 - h01;
    let h10 = h11 - t2 + t;
    (h00, h10, h01, h11)
}

impl Interpolatable for f32 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start + (end - start) * t
    }

    fn interpolate_cubic(v0: Self, out_tangent0: Self, in_tangent1: Self, v1: Self, t: f32, dt: f32) -> Self {
        let (h00, h10, h01, h11) = hermite_basis(t);
        h00 * v0 + h10 * dt * out_tangent0 + h01 * v1 + h11 * dt * in_tangent1
    }

    fn scaled_difference(from: Self, to: Self, scale: f32) -> Self {
        (to - from) * scale
    }
}

impl Interpolatable for Vec3 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }

    fn interpolate_cubic(v0: Self, out_tangent0: Self, in_tangent1: Self, v1: Self, t: f32, dt: f32) -> Self {
        let (h00, h10, h01, h11) = hermite_basis(t);
        v0 * h00 + out_tangent0 * (h10 * dt) + v1 * h01 + in_tangent1 * (h11 * dt)
    }

    fn scaled_difference(from: Self, to: Self, scale: f32) -> Self {
        (to - from) * scale
    }
}

impl Interpolatable for Quat {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.slerp(end, t)
    }

    fn interpolate_cubic(v0: Self, out_tangent0: Self, in_tangent1: Self, v1: Self, t: f32, dt: f32) -> Self {
        let (h00, h10, h01, h11) = hermite_basis(t);

        let v0_v = Vec4::from(v0);
        // Keep both endpoints on the same hemisphere.
        let v1_v = if v0_v.dot(Vec4::from(v1)) < 0.0 {
            -Vec4::from(v1)
        } else {
            Vec4::from(v1)
        };
        let m0_v = Vec4::from(out_tangent0) * dt;
        let m1_v = Vec4::from(in_tangent1) * dt;

        let result = v0_v * h00 + m0_v * h10 + v1_v * h01 + m1_v * h11;

        match result.try_normalize() {
            Some(q) => Quat::from_vec4(q),
            None => v0.slerp(v1, t),
        }
    }

    fn scaled_difference(from: Self, to: Self, scale: f32) -> Self {
        let from_v = Vec4::from(from);
        let to_v = Vec4::from(to);
        let to_v = if from_v.dot(to_v) < 0.0 { -to_v } else { to_v };
        Quat::from_vec4((to_v - from_v) * scale)
    }
}
