//! Quarry Core Types
//!
//! This crate provides the foundational types used throughout the Quarry
//! system:
//! - Identity types (PackageId, VersionId)
//! - The Matchable locator, the unit of pool membership during evaluation

mod id;
mod matchable;

pub use id::*;
pub use matchable::*;
