//! Sinew
//!
//! Skeletal animation core for character rigs: a bone hierarchy with cached
//! model-space matrices, keyframed tracks and clips, layered blending, and
//! inverse kinematics.
//!
//! A typical frame:
//!
//! ```text
//! AnimationBlender::sample ──▶ Skeleton (locals + matrices)
//!                                   │
//!                       IkManager::solve (foot → two-bone → FABRIK → look-at)
//!                                   │
//!                      Skeleton::compute_skinning_matrices ──▶ GPU
//! ```

pub use sinew_animation as animation;
pub use sinew_core::math;
pub use sinew_ik as ik;
pub use sinew_rig as rig;

pub use sinew_animation::{
    AdditiveReference, AnimationBlender, AnimationClip, AnimationEvent, AnimationLayer,
    AnimationPlayer, AnimationTrack, BlendMode, InterpolationMode, Keyframe, LoopMode, TargetPath,
};
pub use sinew_core::{Result, SinewError};
pub use sinew_ik::{
    EyeLookWeights, EyeSide, FabrikIk, FootIk, IkManager, IkSolver, IkSolverKind, LookAngles,
    LookAtIk, TwoBoneIk,
};
pub use sinew_rig::{BlendShapeWeights, Bone, MAX_BONES, Pose, Skeleton, Transform};

pub use glam;
