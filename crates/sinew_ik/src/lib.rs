//! Sinew IK
//!
//! Inverse kinematics solvers that post-process an animated [`sinew_rig::Skeleton`].
//!
//! - [`TwoBoneIk`]: analytic law-of-cosines solver for limbs
//! - [`FabrikIk`]: iterative reaching for chains of any length
//! - [`LookAtIk`]: yaw/pitch-limited aiming, with ARKit eye blend shapes
//! - [`FootIk`]: pelvis offset + leg reach + ground alignment
//! - [`IkManager`]: runs all of the above in a fixed order
//!
//! Every solver reads fresh model-space positions, writes local rotations,
//! and leaves the skeleton's matrices up to date. A solver with weight ≤ 0
//! does nothing; one naming a missing bone logs and skips.

pub mod fabrik;
pub mod foot;
pub mod look_at;
pub mod manager;
pub mod solver;
pub mod two_bone;

pub use fabrik::{FabrikIk, solve_chain};
pub use foot::FootIk;
pub use look_at::{EyeLookWeights, EyeSide, LookAngles, LookAtIk};
pub use manager::IkManager;
pub use solver::{IkSolver, IkSolverKind};
pub use two_bone::TwoBoneIk;
