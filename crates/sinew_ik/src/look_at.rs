use glam::{Quat, Vec3};
use sinew_core::math::{any_perpendicular, project_on_plane};
use sinew_core::{rotation_between_vectors, safe_asin};
use sinew_rig::{BlendShapeWeights, Skeleton};

/// Default horizontal limit: 60°.
pub const DEFAULT_MAX_YAW: f32 = std::f32::consts::FRAC_PI_3;
/// Default vertical limit: 45°.
pub const DEFAULT_MAX_PITCH: f32 = std::f32::consts::FRAC_PI_4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EyeSide {
    Left,
    Right,
}

impl EyeSide {
    /// ARKit blend-shape names in `[up, down, in, out]` order.
    #[must_use]
    pub const fn blend_shape_names(self) -> [&'static str; 4] {
        match self {
            Self::Left => [
                "eyeLookUpLeft",
                "eyeLookDownLeft",
                "eyeLookInLeft",
                "eyeLookOutLeft",
            ],
            Self::Right => [
                "eyeLookUpRight",
                "eyeLookDownRight",
                "eyeLookInRight",
                "eyeLookOutRight",
            ],
        }
    }
}

/// Clamped gaze angles, in radians, relative to the bone's current frame.
///
/// Positive yaw turns toward `up × forward` (the character's left for a
/// +Z forward, +Y up rig). Positive pitch looks up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LookAngles {
    pub yaw: f32,
    pub pitch: f32,
}

/// Eye blend-shape weights in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EyeLookWeights {
    pub up: f32,
    pub down: f32,
    pub look_in: f32,
    pub look_out: f32,
}

impl EyeLookWeights {
    /// Writes the four ARKit shapes for `side` into `weights`.
    pub fn write_to(&self, side: EyeSide, weights: &mut BlendShapeWeights) {
        let [up, down, look_in, look_out] = side.blend_shape_names();
        weights.insert(up.to_owned(), self.up);
        weights.insert(down.to_owned(), self.down);
        weights.insert(look_in.to_owned(), self.look_in);
        weights.insert(look_out.to_owned(), self.look_out);
    }
}

/// Aims a head, neck or eye bone at a model-space point, within yaw and
/// pitch limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookAtIk {
    pub bone: usize,
    pub target: Vec3,
    /// Bone-local axis that should point at the target.
    pub forward_axis: Vec3,
    /// Bone-local axis treated as up when splitting yaw from pitch.
    pub up_axis: Vec3,
    pub max_yaw: f32,
    pub max_pitch: f32,
    pub weight: f32,
    /// Set for eye bones that also drive eye blend shapes.
    pub eye: Option<EyeSide>,
}

impl LookAtIk {
    #[must_use]
    pub fn new(bone: usize, target: Vec3) -> Self {
        Self {
            bone,
            target,
            forward_axis: Vec3::Z,
            up_axis: Vec3::Y,
            max_yaw: DEFAULT_MAX_YAW,
            max_pitch: DEFAULT_MAX_PITCH,
            weight: 1.0,
            eye: None,
        }
    }

    #[must_use]
    pub fn with_limits(mut self, max_yaw: f32, max_pitch: f32) -> Self {
        self.max_yaw = max_yaw;
        self.max_pitch = max_pitch;
        self
    }

    #[must_use]
    pub fn for_eye(mut self, side: EyeSide) -> Self {
        self.eye = Some(side);
        self
    }

    pub fn solve(&self, skeleton: &mut Skeleton) {
        if self.weight <= 0.0 {
            return;
        }
        skeleton.update_matrices();

        let Some((frame, angles)) = self.frame_and_angles(skeleton) else {
            return;
        };

        let clamped_dir = frame.direction(angles);
        let delta = rotation_between_vectors(frame.forward, clamped_dir);
        skeleton.rotate_bone_in_model_space(self.bone, Quat::IDENTITY.slerp(delta, self.weight));
        skeleton.update_matrices();
    }

    /// Clamped yaw and pitch toward the target from the bone's current
    /// orientation. `None` if the bone is missing or sits on the target.
    pub fn look_angles(&self, skeleton: &mut Skeleton) -> Option<LookAngles> {
        skeleton.update_matrices();
        self.frame_and_angles(skeleton).map(|(_, angles)| angles)
    }

    /// Eye blend-shape weights for the current gaze, scaled by `weight`.
    ///
    /// Yaw maps to in/out depending on [`LookAtIk::eye`]; a non-eye solver
    /// reports yaw toward its left as "out".
    pub fn eye_look_weights(&self, skeleton: &mut Skeleton) -> EyeLookWeights {
        let Some(angles) = self.look_angles(skeleton) else {
            return EyeLookWeights::default();
        };

        let horizontal = normalized(angles.yaw, self.max_yaw);
        let vertical = normalized(angles.pitch, self.max_pitch);

        let (toward_left, toward_right) = (horizontal.max(0.0), (-horizontal).max(0.0));
        let (look_in, look_out) = match self.eye.unwrap_or(EyeSide::Left) {
            EyeSide::Left => (toward_right, toward_left),
            EyeSide::Right => (toward_left, toward_right),
        };

        let w = self.weight.clamp(0.0, 1.0);
        EyeLookWeights {
            up: vertical.max(0.0) * w,
            down: (-vertical).max(0.0) * w,
            look_in: look_in * w,
            look_out: look_out * w,
        }
    }

    /// Computes [`LookAtIk::eye_look_weights`] and writes them under this
    /// solver's eye names. No-op for solvers without an eye side.
    pub fn write_blend_shapes(&self, skeleton: &mut Skeleton, weights: &mut BlendShapeWeights) {
        let Some(side) = self.eye else {
            return;
        };
        self.eye_look_weights(skeleton).write_to(side, weights);
    }

    fn frame_and_angles(&self, skeleton: &Skeleton) -> Option<(LookFrame, LookAngles)> {
        let (Some(origin), Some(rotation)) = (
            skeleton.model_position(self.bone),
            skeleton.model_rotation(self.bone),
        ) else {
            log::debug!(
                "LookAtIk: bone {} not present in skeleton '{}'",
                self.bone,
                skeleton.name
            );
            return None;
        };

        let dir = (self.target - origin).try_normalize()?;
        let frame = LookFrame::new(rotation * self.forward_axis, rotation * self.up_axis)?;

        let flat = project_on_plane(dir, frame.up);
        let yaw = if flat.length_squared() > f32::EPSILON {
            flat.dot(frame.side).atan2(flat.dot(frame.forward))
        } else {
            0.0
        };
        let pitch = safe_asin(dir.dot(frame.up));

        let angles = LookAngles {
            yaw: yaw.clamp(-self.max_yaw.abs(), self.max_yaw.abs()),
            pitch: pitch.clamp(-self.max_pitch.abs(), self.max_pitch.abs()),
        };
        Some((frame, angles))
    }
}

#[inline]
fn normalized(angle: f32, limit: f32) -> f32 {
    if limit.abs() <= f32::EPSILON {
        return 0.0;
    }
    (angle / limit.abs()).clamp(-1.0, 1.0)
}

/// Orthonormal model-space basis of the looking bone.
#[derive(Debug, Clone, Copy)]
struct LookFrame {
    forward: Vec3,
    up: Vec3,
    side: Vec3,
}

impl LookFrame {
    fn new(forward: Vec3, up: Vec3) -> Option<Self> {
        let forward = forward.try_normalize()?;
        let up = project_on_plane(up, forward)
            .try_normalize()
            .unwrap_or_else(|| any_perpendicular(forward));
        Some(Self {
            forward,
            up,
            side: up.cross(forward),
        })
    }

    fn direction(&self, angles: LookAngles) -> Vec3 {
        let (sin_yaw, cos_yaw) = angles.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = angles.pitch.sin_cos();
        (self.forward * cos_yaw + self.side * sin_yaw) * cos_pitch + self.up * sin_pitch
    }
}
