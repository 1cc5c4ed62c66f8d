//! Quarry Pattern
//!
//! The compiled query pattern AST read by the evaluator.
//!
//! Responsibilities:
//! - Represent structural combinators and atomic predicates as a closed,
//!   immutable tree shared through `Arc`
//! - Compile and hold the regular expressions of the text predicates
//! - Render patterns compactly for trace diagnostics
//!
//! Patterns are produced once by the query compiler and are read-only for
//! the lifetime of an evaluation; they are safe to share across threads.

mod error;
mod pattern;
mod regex;

pub use error::{PatternError, PatternResult};
pub use pattern::{ActionKind, Atomic, Pattern, Structural};
pub use regex::{CaptureSpan, RegexInfo, MAX_CAPTURE_GROUPS};
