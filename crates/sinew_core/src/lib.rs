//! Sinew Core
//!
//! Foundational pieces shared by every Sinew crate:
//!
//! - [`errors`]: the [`SinewError`] type and [`Result`] alias
//! - [`math`]: NaN-free trigonometry and rotation helpers

pub mod errors;
pub mod math;

pub use errors::{Result, SinewError};
pub use math::{any_perpendicular, rotation_between_vectors, safe_acos, safe_asin};
