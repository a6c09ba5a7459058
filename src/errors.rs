//! Error Types
//!
//! This module defines the error types used throughout the runtime.
//!
//! # Overview
//!
//! The main error type [`HayloftError`] covers the structural failures that
//! can be detected when data enters the runtime:
//! - Skeleton and clip validation (parent links, bone counts, track data)
//! - Collision map construction
//! - Settings parsing and validation
//!
//! Nothing on the per-tick path returns an error. Degenerate numeric states
//! and solver exhaustion are absorbed locally and reported through `log`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use hayloft::errors::{HayloftError, Result};
//!
//! fn load_skeleton(asset: &SkeletonAsset) -> Result<Skeleton> {
//!     Skeleton::from_asset(asset)
//! }
//! ```

use thiserror::Error;

/// The main error type for the Hayloft runtime.
#[derive(Error, Debug)]
pub enum HayloftError {
    // ========================================================================
    // Skeleton Errors
    // ========================================================================
    /// A bone refers to a parent index outside the skeleton.
    #[error("Bone {bone} has invalid parent index {parent} (bone count: {count})")]
    InvalidParent {
        /// Index of the offending bone
        bone: usize,
        /// The parent index found in the data
        parent: i64,
        /// Number of bones in the skeleton
        count: usize,
    },

    /// The parent links contain a cycle.
    #[error("Bone hierarchy contains a cycle through bone {bone}")]
    CyclicHierarchy {
        /// A bone that is part of the cycle
        bone: usize,
    },

    /// Two per-bone arrays disagree on the bone count.
    #[error("Bone count mismatch for {context}: expected {expected}, found {found}")]
    BoneCountMismatch {
        /// Description of the data being checked
        context: String,
        /// Expected bone count
        expected: usize,
        /// Actual length found
        found: usize,
    },

    // ========================================================================
    // Animation Errors
    // ========================================================================
    /// A keyframe track was built without any keys.
    #[error("Keyframe track has no keys")]
    EmptyTrack,

    /// Keyframe times and values have different lengths.
    #[error("Track length mismatch: {times} times vs {values} values")]
    TrackLengthMismatch {
        /// Number of key times
        times: usize,
        /// Number of key values
        values: usize,
    },

    /// Keyframe times decrease somewhere in the track.
    #[error("Track key times are not sorted (key {index} at {time})")]
    UnsortedKeys {
        /// Index of the first out-of-order key
        index: usize,
        /// Its time value
        time: f32,
    },

    /// No clip with this name is registered.
    #[error("Animation clip not found: {0}")]
    UnknownClip(String),

    // ========================================================================
    // Physics Errors
    // ========================================================================
    /// Cell data does not match the declared map dimensions.
    #[error("Collision map of {width}x{height} needs {expected} cells, got {found}")]
    MapSizeMismatch {
        /// Map width in cells
        width: usize,
        /// Map height in cells
        height: usize,
        /// Expected cell count
        expected: usize,
        /// Actual cell count
        found: usize,
    },

    /// A text map row whose length differs from the first row.
    #[error("Collision map row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// Row index, top row first
        row: usize,
        /// Width of the first row
        expected: usize,
        /// Width of this row
        found: usize,
    },

    /// Unknown cell tag in level data.
    #[error("Unknown collision cell tag {0}")]
    UnknownCell(u8),

    /// More contact normals than a body can hold in one step.
    #[error("Contact normal list is full (capacity {capacity})")]
    ContactOverflow {
        /// Capacity of the contact list
        capacity: usize,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// A settings value is out of its valid range.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Alias for `Result<T, HayloftError>`.
pub type Result<T> = std::result::Result<T, HayloftError>;
