use glam::{Quat, Vec3};
use sinew_core::math::{LENGTH_EPSILON, any_perpendicular, project_on_plane};
use sinew_core::{rotation_between_vectors, safe_acos};
use sinew_rig::Skeleton;

/// Keeps the solved reach strictly inside `[|L1 - L2|, L1 + L2]` so the
/// law of cosines never sees a fully folded or fully straight triangle.
pub const REACH_EPSILON: f32 = 1e-4;

/// Analytic IK for a root → mid → end chain (shoulder/elbow/wrist,
/// hip/knee/ankle).
///
/// The bend plane comes from `pole_target` when set; otherwise the chain
/// keeps bending the way it currently bends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoBoneIk {
    pub root: usize,
    pub mid: usize,
    pub end: usize,
    /// Model-space target for the end bone.
    pub target: Vec3,
    /// Model-space point the mid joint should bend toward.
    pub pole_target: Option<Vec3>,
    pub weight: f32,
}

impl TwoBoneIk {
    #[must_use]
    pub fn new(root: usize, mid: usize, end: usize, target: Vec3) -> Self {
        Self {
            root,
            mid,
            end,
            target,
            pole_target: None,
            weight: 1.0,
        }
    }

    #[must_use]
    pub fn with_pole(mut self, pole_target: Vec3) -> Self {
        self.pole_target = Some(pole_target);
        self
    }

    pub fn solve(&self, skeleton: &mut Skeleton) {
        if self.weight <= 0.0 {
            return;
        }
        skeleton.update_matrices();

        let (Some(a), Some(b), Some(c)) = (
            skeleton.model_position(self.root),
            skeleton.model_position(self.mid),
            skeleton.model_position(self.end),
        ) else {
            log::debug!(
                "TwoBoneIk: chain ({}, {}, {}) not present in skeleton '{}'",
                self.root,
                self.mid,
                self.end,
                skeleton.name
            );
            return;
        };

        let upper = b - a;
        let upper_len = upper.length();
        let lower_len = (c - b).length();
        if upper_len < LENGTH_EPSILON || lower_len < LENGTH_EPSILON {
            return;
        }

        let to_target = self.target - a;
        let distance = to_target.length();
        if distance < LENGTH_EPSILON {
            return;
        }
        let target_dir = to_target / distance;

        let min_reach = (upper_len - lower_len).abs() + REACH_EPSILON;
        let max_reach = upper_len + lower_len - REACH_EPSILON;
        let reach = distance.max(min_reach).min(max_reach);

        // Angle between the root→target line and the upper segment.
        let cos_root = (upper_len * upper_len + reach * reach - lower_len * lower_len)
            / (2.0 * upper_len * reach);
        let root_angle = safe_acos(cos_root);

        let bend_dir = self.bend_direction(a, b, c, target_dir);
        let desired_mid =
            a + (target_dir * root_angle.cos() + bend_dir * root_angle.sin()) * upper_len;

        // Pass 1: swing the upper segment onto the bend-plane direction.
        let root_delta = rotation_between_vectors(upper, desired_mid - a);
        let root_delta = Quat::IDENTITY.slerp(root_delta, self.weight);
        skeleton.rotate_bone_in_model_space(self.root, root_delta);
        skeleton.update_matrices();

        // Pass 2: aim the lower segment at the exact target.
        let (Some(b), Some(c)) = (
            skeleton.model_position(self.mid),
            skeleton.model_position(self.end),
        ) else {
            return;
        };
        let mid_delta = rotation_between_vectors(c - b, self.target - b);
        let mid_delta = Quat::IDENTITY.slerp(mid_delta, self.weight);
        skeleton.rotate_bone_in_model_space(self.mid, mid_delta);
        skeleton.update_matrices();
    }

    /// Unit direction, perpendicular to `target_dir`, toward which the mid
    /// joint should sit.
    fn bend_direction(&self, a: Vec3, b: Vec3, c: Vec3, target_dir: Vec3) -> Vec3 {
        let hint = match self.pole_target {
            Some(pole) => pole - a,
            None => b - a,
        };

        project_on_plane(hint, target_dir)
            .try_normalize()
            .or_else(|| project_on_plane(b - a, target_dir).try_normalize())
            // Straight chain along the target line: bend away from the lower segment's
            // sideways drift, if any, else anywhere.
            .or_else(|| project_on_plane(b - c, target_dir).try_normalize())
            .unwrap_or_else(|| any_perpendicular(target_dir))
    }
}
