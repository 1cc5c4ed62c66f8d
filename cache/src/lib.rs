//! Quarry Cache
//!
//! The read-only package database consumed by the evaluator, backed by an
//! in-memory store.
//!
//! Responsibilities:
//! - Store packages, versions, and dependency groups
//! - Record pending action state and package flags
//! - Answer version-constraint checks with Debian-style version ordering
//!
//! The evaluator only reads from the cache; all mutation happens up front
//! through the builder-style methods on [`Cache`].

mod cache;
mod dep;
mod version;

pub use cache::{ActionState, Cache, Package, Version};
pub use dep::{CompareOp, DepClause, DepGroup, DepKind, Dependency, VersionConstraint};
pub use version::{check_dep, compare_versions};
