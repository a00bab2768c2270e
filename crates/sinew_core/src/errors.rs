//! Error Types
//!
//! This module defines the error types used throughout the animation stack.
//!
//! # Overview
//!
//! Very little in Sinew can fail. Missing bones, degenerate IK geometry and
//! unreachable targets are all handled locally (no-op or clamp). The only
//! hard failures are structural, and they surface while a rig is being built:
//! - The skeleton is already at its bone capacity
//! - A bone names a parent that does not precede it
//!
//! # Usage
//!
//! ```rust,ignore
//! use sinew_core::errors::{SinewError, Result};
//!
//! fn build_rig(skeleton: &mut Skeleton) -> Result<()> {
//!     let root = skeleton.add_bone("Hips", None)?;
//!     skeleton.add_bone("Spine", Some(root))?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for Sinew.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinewError {
    // ========================================================================
    // Rig Construction Errors
    // ========================================================================
    /// The skeleton already holds its maximum number of bones.
    #[error("Skeleton is full: capacity of {capacity} bones reached")]
    SkeletonFull {
        /// The bone limit of the skeleton
        capacity: usize,
    },

    /// A bone referenced a parent that is not stored before it.
    ///
    /// Bones are kept in topological order, so a parent index must be
    /// strictly smaller than the index the new bone would receive.
    #[error("Invalid parent index {parent} for bone {index}")]
    InvalidParent {
        /// The requested parent index
        parent: usize,
        /// The index the new bone would have received
        index: usize,
    },

    // ========================================================================
    // Lookup Errors
    // ========================================================================
    /// A name-based API referenced a bone the skeleton does not contain.
    #[error("Bone not found: {0}")]
    BoneNotFound(String),
}

/// Alias for `Result<T, SinewError>`.
pub type Result<T> = std::result::Result<T, SinewError>;
