//! Sinew Animation
//!
//! Keyframed animation for [`sinew_rig::Skeleton`]s.
//!
//! - [`AnimationTrack`]: sorted keyframes of `f32`, `Vec3` or `Quat`,
//!   evaluated with one of the [`InterpolationMode`]s
//! - [`AnimationClip`]: per-bone channel tracks, blend-shape tracks and events
//! - [`AnimationBlender`]: ordered override/additive layers composed into one pose
//! - [`AnimationPlayer`]: play/pause/seek/frame-step transport over a clip
//!
//! # Data flow
//!
//! ```text
//! AnimationClip / AnimationBlender
//!        │  write local transforms
//!        ▼
//!    Skeleton ── recompute (once per sample) ──▶ model-space matrices
//! ```

pub mod blender;
pub mod clip;
pub mod easing;
pub mod keyframe;
pub mod player;
pub mod tracks;
pub mod values;

pub use blender::{AdditiveReference, AnimationBlender, AnimationLayer, BlendMode};
pub use clip::{AnimationClip, AnimationEvent, BoneTracks, TargetPath};
pub use easing::InterpolationMode;
pub use keyframe::Keyframe;
pub use player::{AnimationPlayer, LoopMode};
pub use tracks::{AnimationTrack, KEYFRAME_TIME_TOLERANCE};
pub use values::Interpolatable;
