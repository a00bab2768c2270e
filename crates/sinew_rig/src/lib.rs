//! Sinew Rig
//!
//! The bone hierarchy every other Sinew crate reads and mutates.
//!
//! - [`Skeleton`]: arena of [`Bone`]s addressed by index, with a dirty-flag
//!   cache of model-space matrices
//! - [`Transform`]: a bone's parent-relative TRS
//! - [`Pose`]: a detached copy of all local transforms, used for blending
//!
//! Bones reference their parents by index only. Copying a skeleton (for
//! retargeting, say) copies the whole arena and leaves no dangling links.

pub mod pose;
pub mod skeleton;
pub mod transform;

pub use pose::Pose;
pub use skeleton::{Bone, MAX_BONES, Skeleton};
pub use transform::Transform;

/// Blend-shape (morph target) weights keyed by shape name.
///
/// Filled by clip sampling and by look-at solvers that drive ARKit-style
/// eye shapes; consumed by the facial system.
pub type BlendShapeWeights = rustc_hash::FxHashMap<String, f32>;
