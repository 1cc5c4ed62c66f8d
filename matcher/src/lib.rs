//! Quarry Matcher
//!
//! Evaluate compiled patterns against the package cache.
//!
//! Responsibilities:
//! - Walk the pattern tree against a pool of matchables under ALL/ANY
//!   quantifier modes
//! - Maintain the stack of pools bound by enclosing combinators
//! - Run atomic predicates against single matchables
//! - Produce witness trees describing which nodes matched, and against what
//!
//! Evaluation is synchronous, purely recursive, and read-only over the
//! cache; independent evaluations may run concurrently on shared data.

mod matcher;
mod result;
mod stack;

pub use matcher::{EvalMode, Matcher};
pub use result::{Match, MatchKind, StructuralMatch};
pub use stack::Stack;
