//! Match witness trees returned to callers.
//!
//! A successful evaluation does not just say "matched": it returns a tree
//! mirroring the shape of the pattern, recording which nodes matched and
//! against which matchables, so callers can render or further filter the
//! result.

use quarry_cache::Dependency;
use quarry_core::Matchable;
use quarry_pattern::{CaptureSpan, Pattern};
use std::sync::Arc;

/// An atomic-level witness: one pattern node satisfied by one matchable.
#[derive(Debug, Clone)]
pub struct Match {
    pattern: Arc<Pattern>,
    kind: MatchKind,
}

/// The payload explaining an atomic match.
#[derive(Debug, Clone)]
pub enum MatchKind {
    /// A plain predicate with nothing further to record.
    Atomic,
    /// A regex test; the participating capture-group spans.
    Regexp(Vec<CaptureSpan>),
    /// A `bind` sub-evaluation and its witness.
    Sub(Box<StructuralMatch>),
    /// A dependency test: the nested witness, plus the head of the
    /// OR-group that was satisfied.
    Dependency {
        sub_match: Box<StructuralMatch>,
        dep: Dependency,
    },
}

impl Match {
    pub fn atomic(pattern: Arc<Pattern>) -> Self {
        Self {
            pattern,
            kind: MatchKind::Atomic,
        }
    }

    pub fn regexp(pattern: Arc<Pattern>, spans: Vec<CaptureSpan>) -> Self {
        Self {
            pattern,
            kind: MatchKind::Regexp(spans),
        }
    }

    pub fn with_sub_match(pattern: Arc<Pattern>, sub_match: StructuralMatch) -> Self {
        Self {
            pattern,
            kind: MatchKind::Sub(Box::new(sub_match)),
        }
    }

    pub fn dependency(pattern: Arc<Pattern>, sub_match: StructuralMatch, dep: Dependency) -> Self {
        Self {
            pattern,
            kind: MatchKind::Dependency {
                sub_match: Box::new(sub_match),
                dep,
            },
        }
    }

    /// The pattern node this witness satisfies.
    pub fn pattern(&self) -> &Arc<Pattern> {
        &self.pattern
    }

    pub fn kind(&self) -> &MatchKind {
        &self.kind
    }

    /// The capture spans, for a regex match.
    pub fn capture_spans(&self) -> Option<&[CaptureSpan]> {
        match &self.kind {
            MatchKind::Regexp(spans) => Some(spans),
            _ => None,
        }
    }

    /// The nested witness, for a `bind` or dependency match.
    pub fn sub_match(&self) -> Option<&StructuralMatch> {
        match &self.kind {
            MatchKind::Sub(sub) => Some(sub),
            MatchKind::Dependency { sub_match, .. } => Some(sub_match),
            _ => None,
        }
    }

    /// The satisfied OR-group's head, for a dependency match.
    pub fn dep(&self) -> Option<&Dependency> {
        match &self.kind {
            MatchKind::Dependency { dep, .. } => Some(dep),
            _ => None,
        }
    }
}

/// A tree-level witness mirroring the structural shape of the pattern.
#[derive(Debug, Clone)]
pub enum StructuralMatch {
    /// A structural node and the witnesses of its matched children.
    Branch {
        pattern: Arc<Pattern>,
        children: Vec<StructuralMatch>,
    },
    /// An atomic node and the (matchable, witness) pairs that satisfied it
    /// under the active quantifier mode.
    Leaf {
        pattern: Arc<Pattern>,
        matches: Vec<(Matchable, Match)>,
    },
}

impl StructuralMatch {
    pub fn branch(pattern: Arc<Pattern>, children: Vec<StructuralMatch>) -> Self {
        Self::Branch { pattern, children }
    }

    pub fn leaf(pattern: Arc<Pattern>, matches: Vec<(Matchable, Match)>) -> Self {
        Self::Leaf { pattern, matches }
    }

    /// The pattern node this witness satisfies.
    pub fn pattern(&self) -> &Arc<Pattern> {
        match self {
            Self::Branch { pattern, .. } => pattern,
            Self::Leaf { pattern, .. } => pattern,
        }
    }

    /// Child witnesses; empty for a leaf.
    pub fn children(&self) -> &[StructuralMatch] {
        match self {
            Self::Branch { children, .. } => children,
            Self::Leaf { .. } => &[],
        }
    }

    /// Satisfied (matchable, match) pairs; empty for a branch.
    pub fn matches(&self) -> &[(Matchable, Match)] {
        match self {
            Self::Branch { .. } => &[],
            Self::Leaf { matches, .. } => matches,
        }
    }

    pub fn is_branch(&self) -> bool {
        matches!(self, Self::Branch { .. })
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }
}
