use glam::{Quat, Vec3};
use sinew_core::rotation_between_vectors;
use sinew_rig::Skeleton;

use crate::two_bone::TwoBoneIk;

pub const DEFAULT_POLE_DISTANCE: f32 = 0.5;

/// Foot placement: pelvis drop, leg reach, then foot-to-ground alignment.
///
/// Runs in three fixed steps, each scaled by `weight`:
///
/// 1. Move the pelvis along `up_axis` by `pelvis_offset` (usually negative,
///    so the lower foot can still reach uneven ground).
/// 2. Solve hip → knee → foot with [`TwoBoneIk`], bending the knee toward a
///    pole placed `pole_distance` in front of it along `forward_axis`.
/// 3. Rotate the foot so its `foot_up_axis` matches `ground_normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FootIk {
    pub pelvis: Option<usize>,
    pub hip: usize,
    pub knee: usize,
    pub foot: usize,
    /// Model-space point where the foot should land.
    pub target: Vec3,
    /// Model-space ground normal at the target.
    pub ground_normal: Vec3,
    pub pelvis_offset: f32,
    /// Model-space up, used for the pelvis offset.
    pub up_axis: Vec3,
    /// Model-space facing direction; the knee bends toward it.
    pub forward_axis: Vec3,
    /// Foot-bone-local axis aligned to the ground normal.
    pub foot_up_axis: Vec3,
    pub pole_distance: f32,
    pub weight: f32,
}

impl FootIk {
    #[must_use]
    pub fn new(hip: usize, knee: usize, foot: usize, target: Vec3) -> Self {
        Self {
            pelvis: None,
            hip,
            knee,
            foot,
            target,
            ground_normal: Vec3::Y,
            pelvis_offset: 0.0,
            up_axis: Vec3::Y,
            forward_axis: Vec3::Z,
            foot_up_axis: Vec3::Y,
            pole_distance: DEFAULT_POLE_DISTANCE,
            weight: 1.0,
        }
    }

    #[must_use]
    pub fn with_pelvis(mut self, pelvis: usize, offset: f32) -> Self {
        self.pelvis = Some(pelvis);
        self.pelvis_offset = offset;
        self
    }

    pub fn solve(&self, skeleton: &mut Skeleton) {
        if self.weight <= 0.0 {
            return;
        }
        skeleton.update_matrices();

        if let Some(pelvis) = self.pelvis
            && self.pelvis_offset != 0.0
        {
            let offset = self.up_axis.normalize_or_zero() * self.pelvis_offset * self.weight;
            skeleton.translate_bone_in_model_space(pelvis, offset);
            skeleton.update_matrices();
        }

        let Some(knee) = skeleton.model_position(self.knee) else {
            log::debug!(
                "FootIk: knee bone {} not present in skeleton '{}'",
                self.knee,
                skeleton.name
            );
            return;
        };
        let pole = knee + self.forward_axis.normalize_or_zero() * self.pole_distance;

        TwoBoneIk {
            root: self.hip,
            mid: self.knee,
            end: self.foot,
            target: self.target,
            pole_target: Some(pole),
            weight: self.weight,
        }
        .solve(skeleton);

        self.align_to_ground(skeleton);
    }

    fn align_to_ground(&self, skeleton: &mut Skeleton) {
        let Some(rotation) = skeleton.model_rotation(self.foot) else {
            return;
        };
        let foot_up = rotation * self.foot_up_axis;
        let delta = rotation_between_vectors(foot_up, self.ground_normal);
        skeleton.rotate_bone_in_model_space(self.foot, Quat::IDENTITY.slerp(delta, self.weight));
        skeleton.update_matrices();
    }
}
