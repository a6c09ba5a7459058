//! Skeleton Module
//!
//! Bone arena and pose composition:
//! - Skeleton: bones, local / global poses, inverse bind and skinning matrices
//! - SkeletonAsset: importer-side skeleton description
//! - hierarchy: memoized parent-chain evaluation

pub mod hierarchy;
pub mod skeleton;

pub use skeleton::{Bone, Skeleton, SkeletonAsset};
