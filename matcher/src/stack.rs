//! The evaluation stack of bound pools.

use quarry_core::Matchable;
use std::fmt;

/// An ordered sequence of borrowed pools, outermost frame first.
///
/// Each `for` combinator binds the pool it was evaluated against as a new
/// frame; `bind` and `equal` address frames by index. Frames are plain
/// borrows whose lifetime is tied to the recursive call that pushed them:
/// [`Stack::push`] builds a new stack instead of mutating in place, so a
/// frame reference can never outlive the pool it points at.
#[derive(Debug, Clone, Default)]
pub struct Stack<'a> {
    frames: Vec<&'a [Matchable]>,
}

impl<'a> Stack<'a> {
    /// An empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// A stack holding a single frame.
    pub fn with_frame(pool: &'a [Matchable]) -> Self {
        Self { frames: vec![pool] }
    }

    /// A copy of this stack with `pool` pushed as the innermost frame.
    pub fn push(&self, pool: &'a [Matchable]) -> Stack<'a> {
        let mut frames = self.frames.clone();
        frames.push(pool);
        Stack { frames }
    }

    /// Look up a bound variable (0 = outermost frame).
    ///
    /// Panics on an out-of-range index: the index was produced by the query
    /// compiler, so a bad one is an internal invariant violation, not a
    /// user-facing failure.
    pub fn frame(&self, index: usize) -> &'a [Matchable] {
        assert!(
            index < self.frames.len(),
            "internal error: bound variable index {} out of range (stack depth {})",
            index,
            self.frames.len()
        );
        self.frames[index]
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

/// Render a pool as `{p1:v2, p3}` for trace output.
pub(crate) struct PoolDisplay<'a>(pub &'a [Matchable]);

impl fmt::Display for PoolDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, m) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", m)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for Stack<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, frame) in self.frames.iter().rev().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{}", PoolDisplay(frame))?;
        }
        write!(f, "]")
    }
}
