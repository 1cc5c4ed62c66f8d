//! Shared fixtures for end-to-end matcher tests.
//!
//! The integration tests build small caches through the [`fixture::Fixture`]
//! builder and evaluate patterns against them. Import everything through the
//! prelude.


pub mod prelude {
    pub use crate::fixture::Fixture;
    pub use quarry_cache::{ActionState, CompareOp, DepKind};
    pub use quarry_core::{Matchable, PackageId, VersionId};
    pub use quarry_matcher::{Match, MatchKind, Matcher, StructuralMatch};
    pub use quarry_pattern::{ActionKind, Atomic, CaptureSpan, Pattern};
    pub use std::sync::Arc;
}
