//! Dependency data for package versions.
//!
//! A version's dependency list is stored as a sequence of OR-groups: each
//! group names one relation (its kind) that is discharged when any single
//! clause in the group is satisfied.

use crate::version::check_dep;
use quarry_core::PackageId;
use std::fmt;

/// The kind of a dependency relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepKind {
    Depends,
    PreDepends,
    Recommends,
    Suggests,
    Conflicts,
    Breaks,
    Replaces,
    Enhances,
}

impl fmt::Display for DepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DepKind::Depends => "depends",
            DepKind::PreDepends => "pre-depends",
            DepKind::Recommends => "recommends",
            DepKind::Suggests => "suggests",
            DepKind::Conflicts => "conflicts",
            DepKind::Breaks => "breaks",
            DepKind::Replaces => "replaces",
            DepKind::Enhances => "enhances",
        };
        write!(f, "{}", name)
    }
}

/// Relational operator in a version constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Strictly earlier (`<<`).
    Less,
    /// Earlier or equal (`<=`).
    LessEq,
    /// Exactly equal (`=`).
    Equal,
    /// Later or equal (`>=`).
    GreaterEq,
    /// Strictly later (`>>`).
    Greater,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sym = match self {
            CompareOp::Less => "<<",
            CompareOp::LessEq => "<=",
            CompareOp::Equal => "=",
            CompareOp::GreaterEq => ">=",
            CompareOp::Greater => ">>",
        };
        write!(f, "{}", sym)
    }
}

/// A version bound attached to a dependency clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConstraint {
    pub op: CompareOp,
    pub version: String,
}

impl VersionConstraint {
    pub fn new(op: CompareOp, version: impl Into<String>) -> Self {
        Self {
            op,
            version: version.into(),
        }
    }

    /// Whether `candidate` satisfies this bound.
    pub fn accepts(&self, candidate: &str) -> bool {
        check_dep(candidate, self)
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op, self.version)
    }
}

/// One alternative inside an OR-group: a target package, optionally bounded
/// by a version constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepClause {
    target: PackageId,
    constraint: Option<VersionConstraint>,
}

impl DepClause {
    pub fn new(target: PackageId) -> Self {
        Self {
            target,
            constraint: None,
        }
    }

    pub fn versioned(target: PackageId, op: CompareOp, version: impl Into<String>) -> Self {
        Self {
            target,
            constraint: Some(VersionConstraint::new(op, version)),
        }
    }

    pub fn target(&self) -> PackageId {
        self.target
    }

    pub fn constraint(&self) -> Option<&VersionConstraint> {
        self.constraint.as_ref()
    }
}

/// An OR-group: alternative clauses discharging a single dependency relation.
///
/// The `satisfied` flag carries the cache's dependency-resolution bookkeeping:
/// whether the relation is already discharged in the planned state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepGroup {
    kind: DepKind,
    clauses: Vec<DepClause>,
    satisfied: bool,
}

impl DepGroup {
    /// Create a group. `clauses` must be non-empty; the first clause is the
    /// head recorded in dependency match witnesses.
    pub fn new(kind: DepKind, clauses: Vec<DepClause>) -> Self {
        assert!(
            !clauses.is_empty(),
            "internal error: dependency OR-group with no clauses"
        );
        Self {
            kind,
            clauses,
            satisfied: false,
        }
    }

    /// Mark the group as already satisfied in the planned state.
    pub fn satisfied(mut self) -> Self {
        self.satisfied = true;
        self
    }

    pub fn kind(&self) -> DepKind {
        self.kind
    }

    pub fn clauses(&self) -> &[DepClause] {
        &self.clauses
    }

    pub fn is_satisfied(&self) -> bool {
        self.satisfied
    }

    /// The head of the group, as recorded in match witnesses.
    pub fn head_dependency(&self) -> Dependency {
        Dependency {
            kind: self.kind,
            clause: self.clauses[0].clone(),
        }
    }
}

/// The head clause of a satisfied OR-group, kept in a dependency match
/// witness for later display or resolution use. Self-describing: it stays
/// meaningful after the evaluation pools are discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub kind: DepKind,
    pub clause: DepClause,
}
