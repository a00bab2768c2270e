use glam::{Quat, Vec3};
use sinew_core::math::LENGTH_EPSILON;
use sinew_core::rotation_between_vectors;
use sinew_rig::Skeleton;
use smallvec::SmallVec;

pub const DEFAULT_MAX_ITERATIONS: u32 = 10;
pub const DEFAULT_TOLERANCE: f32 = 1e-3;

/// Inline storage for typical chains (spine, tail, tentacle segments).
pub type ChainPositions = SmallVec<[Vec3; 8]>;

/// Iterative forward/backward reaching IK over an arbitrary-length chain.
///
/// `bones` runs root first. Joint positions are solved in model space, then
/// turned back into per-bone rotations from the root down.
#[derive(Debug, Clone, PartialEq)]
pub struct FabrikIk {
    pub bones: SmallVec<[usize; 8]>,
    pub target: Vec3,
    pub max_iterations: u32,
    pub tolerance: f32,
    pub weight: f32,
}

impl FabrikIk {
    #[must_use]
    pub fn new(bones: impl IntoIterator<Item = usize>, target: Vec3) -> Self {
        Self {
            bones: bones.into_iter().collect(),
            target,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            weight: 1.0,
        }
    }

    pub fn solve(&self, skeleton: &mut Skeleton) {
        if self.weight <= 0.0 || self.bones.len() < 2 {
            return;
        }
        skeleton.update_matrices();

        let mut positions = ChainPositions::with_capacity(self.bones.len());
        for &bone in &self.bones {
            let Some(position) = skeleton.model_position(bone) else {
                log::debug!(
                    "FabrikIk: bone {bone} not present in skeleton '{}'",
                    skeleton.name
                );
                return;
            };
            positions.push(position);
        }

        let lengths: SmallVec<[f32; 8]> = positions
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .collect();

        let iterations = solve_chain(
            &mut positions,
            &lengths,
            self.target,
            self.max_iterations,
            self.tolerance,
        );
        log::trace!(
            "FabrikIk: {} joints solved in {iterations} iteration(s)",
            positions.len()
        );

        // Rotate each bone so its child lands on the solved position. The
        // chain is re-read after every bone since parents move children.
        for (i, pair) in self.bones.windows(2).enumerate() {
            let (bone, child) = (pair[0], pair[1]);
            let (Some(joint), Some(current_child)) =
                (skeleton.model_position(bone), skeleton.model_position(child))
            else {
                return;
            };

            let delta = rotation_between_vectors(current_child - joint, positions[i + 1] - joint);
            skeleton.rotate_bone_in_model_space(bone, Quat::IDENTITY.slerp(delta, self.weight));
            skeleton.update_matrices();
        }
    }
}

/// Runs FABRIK over model-space joint `positions` in place.
///
/// `lengths[i]` is the fixed distance between joints `i` and `i + 1`. The
/// root joint never moves. A target beyond the chain's total reach lays the
/// chain out straight toward it. Returns the iterations spent (0 when the
/// chain was already within tolerance or was straightened).
pub fn solve_chain(
    positions: &mut [Vec3],
    lengths: &[f32],
    target: Vec3,
    max_iterations: u32,
    tolerance: f32,
) -> u32 {
    let n = positions.len();
    if n < 2 || lengths.len() + 1 != n {
        return 0;
    }

    let root = positions[0];
    let total_length: f32 = lengths.iter().sum();

    if root.distance(target) >= total_length {
        let dir = (target - root).try_normalize().unwrap_or(Vec3::ZERO);
        let mut reach = root;
        for (position, length) in positions[1..].iter_mut().zip(lengths) {
            reach += dir * *length;
            *position = reach;
        }
        return 0;
    }

    let mut iterations = 0;
    while iterations < max_iterations {
        if positions[n - 1].distance(target) <= tolerance {
            break;
        }
        iterations += 1;

        // Forward: pin the end effector to the target and pull toward the root.
        positions[n - 1] = target;
        for i in (0..n - 1).rev() {
            positions[i] = place_at_length(positions[i + 1], positions[i], lengths[i]);
        }

        // Backward: re-pin the root and push toward the end.
        positions[0] = root;
        for i in 0..n - 1 {
            positions[i + 1] = place_at_length(positions[i], positions[i + 1], lengths[i]);
        }
    }

    iterations
}

/// Point at distance `length` from `anchor`, in the direction of `toward`.
#[inline]
fn place_at_length(anchor: Vec3, toward: Vec3, length: f32) -> Vec3 {
    let offset = toward - anchor;
    let distance = offset.length();
    if distance < LENGTH_EPSILON {
        return anchor;
    }
    anchor + offset * (length / distance)
}
