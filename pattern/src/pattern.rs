//! The compiled pattern AST.

use crate::regex::RegexInfo;
use crate::PatternResult;
use quarry_cache::DepKind;
use std::fmt;
use std::sync::Arc;

/// Which pending action an action predicate tests for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Install,
    Upgrade,
    Downgrade,
    Remove,
    Purge,
    Hold,
    Keep,
    Reinstall,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::Install => "install",
            ActionKind::Upgrade => "upgrade",
            ActionKind::Downgrade => "downgrade",
            ActionKind::Remove => "remove",
            ActionKind::Purge => "purge",
            ActionKind::Hold => "hold",
            ActionKind::Keep => "keep",
            ActionKind::Reinstall => "reinstall",
        };
        write!(f, "{}", name)
    }
}

/// A node in the compiled query AST.
///
/// The two families are separated in the type system: structural nodes
/// combine sub-patterns, atomic nodes test a single matchable. The atomic
/// evaluator only ever receives an [`Atomic`], so a structural node reaching
/// it is impossible by construction rather than guarded at runtime.
#[derive(Debug, Clone)]
pub enum Pattern {
    Structural(Structural),
    Atomic(Atomic),
}

/// Combinators over sub-patterns.
#[derive(Debug, Clone)]
pub enum Structural {
    /// Every sub-pattern must match.
    And(Vec<Arc<Pattern>>),
    /// At least one sub-pattern must match.
    Or(Vec<Arc<Pattern>>),
    /// The sub-pattern must not match.
    Not(Arc<Pattern>),
    /// Bind the current pool as a new variable, then match the body.
    For(Arc<Pattern>),
    /// Restrict the pool to elements passing the filter, then match the body.
    Narrow {
        filter: Arc<Pattern>,
        body: Arc<Pattern>,
    },
    /// Expand each pool element to all versions of its package.
    Widen(Arc<Pattern>),
    /// Match the body with the quantifier forced to "all".
    AllVersions(Arc<Pattern>),
    /// Match the body against each pool element individually.
    AnyVersion(Arc<Pattern>),
}

/// Leaf predicates over a single matchable.
///
/// The block of variants after `ConfigFiles` is not yet wired to a cache
/// fact; the compiler still produces them, and they always fail to match.
#[derive(Debug, Clone)]
pub enum Atomic {
    /// Regex over the package name.
    Name(RegexInfo),
    /// Regex over the version string.
    Version(RegexInfo),
    /// Regex over the long description.
    Description(RegexInfo),
    /// Regex over the archive names of the version's files.
    Archive(RegexInfo),
    /// A dependency of the given kind whose targets satisfy the nested
    /// pattern. With `broken`, only relations not already satisfied count.
    Depends {
        kind: DepKind,
        broken: bool,
        pattern: Arc<Pattern>,
    },
    /// A dependency relation of the given kind is unsatisfied.
    BrokenKind(DepKind),
    /// The package's pending action.
    Action(ActionKind),
    /// Match the pool bound at `index` against the nested pattern.
    Bind {
        index: usize,
        pattern: Arc<Pattern>,
    },
    /// Membership in the pool bound at `index`.
    Equal(usize),
    Essential,
    Automatic,
    Broken,
    Garbage,
    CandidateVersion,
    CurrentVersion,
    ConfigFiles,
    Maintainer,
    Tag,
    Provides,
    Origin,
    Section,
    Priority,
    Task,
    SourcePackage,
    SourceVersion,
    ReverseDepends,
    ReverseProvides,
    New,
    Obsolete,
    Upgradable,
    Installed,
    InstallVersion,
    Virtual,
    True,
    False,
}

impl Pattern {
    // Structural constructors.

    pub fn and(sub_patterns: Vec<Arc<Pattern>>) -> Arc<Pattern> {
        Arc::new(Pattern::Structural(Structural::And(sub_patterns)))
    }

    pub fn or(sub_patterns: Vec<Arc<Pattern>>) -> Arc<Pattern> {
        Arc::new(Pattern::Structural(Structural::Or(sub_patterns)))
    }

    pub fn not(sub_pattern: Arc<Pattern>) -> Arc<Pattern> {
        Arc::new(Pattern::Structural(Structural::Not(sub_pattern)))
    }

    pub fn for_binding(body: Arc<Pattern>) -> Arc<Pattern> {
        Arc::new(Pattern::Structural(Structural::For(body)))
    }

    pub fn narrow(filter: Arc<Pattern>, body: Arc<Pattern>) -> Arc<Pattern> {
        Arc::new(Pattern::Structural(Structural::Narrow { filter, body }))
    }

    pub fn widen(body: Arc<Pattern>) -> Arc<Pattern> {
        Arc::new(Pattern::Structural(Structural::Widen(body)))
    }

    pub fn all_versions(body: Arc<Pattern>) -> Arc<Pattern> {
        Arc::new(Pattern::Structural(Structural::AllVersions(body)))
    }

    pub fn any_version(body: Arc<Pattern>) -> Arc<Pattern> {
        Arc::new(Pattern::Structural(Structural::AnyVersion(body)))
    }

    // Atomic constructors.

    pub fn name(expr: &str) -> PatternResult<Arc<Pattern>> {
        Ok(Arc::new(Pattern::Atomic(Atomic::Name(RegexInfo::new(
            expr,
        )?))))
    }

    pub fn name_inverted(expr: &str) -> PatternResult<Arc<Pattern>> {
        Ok(Arc::new(Pattern::Atomic(Atomic::Name(
            RegexInfo::new_inverted(expr)?,
        ))))
    }

    pub fn version(expr: &str) -> PatternResult<Arc<Pattern>> {
        Ok(Arc::new(Pattern::Atomic(Atomic::Version(RegexInfo::new(
            expr,
        )?))))
    }

    pub fn description(expr: &str) -> PatternResult<Arc<Pattern>> {
        Ok(Arc::new(Pattern::Atomic(Atomic::Description(
            RegexInfo::new(expr)?,
        ))))
    }

    pub fn archive(expr: &str) -> PatternResult<Arc<Pattern>> {
        Ok(Arc::new(Pattern::Atomic(Atomic::Archive(RegexInfo::new(
            expr,
        )?))))
    }

    pub fn depends(kind: DepKind, broken: bool, pattern: Arc<Pattern>) -> Arc<Pattern> {
        Arc::new(Pattern::Atomic(Atomic::Depends {
            kind,
            broken,
            pattern,
        }))
    }

    pub fn broken_kind(kind: DepKind) -> Arc<Pattern> {
        Arc::new(Pattern::Atomic(Atomic::BrokenKind(kind)))
    }

    pub fn action(kind: ActionKind) -> Arc<Pattern> {
        Arc::new(Pattern::Atomic(Atomic::Action(kind)))
    }

    pub fn bind(index: usize, pattern: Arc<Pattern>) -> Arc<Pattern> {
        Arc::new(Pattern::Atomic(Atomic::Bind { index, pattern }))
    }

    pub fn equal(index: usize) -> Arc<Pattern> {
        Arc::new(Pattern::Atomic(Atomic::Equal(index)))
    }

    pub fn atomic(atomic: Atomic) -> Arc<Pattern> {
        Arc::new(Pattern::Atomic(atomic))
    }

    /// Whether this node is a structural combinator.
    pub fn is_structural(&self) -> bool {
        matches!(self, Pattern::Structural(_))
    }
}

// Compact operator rendering for trace diagnostics. This is not a parseable
// query syntax; the real serializer lives with the query compiler.
impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Structural(s) => fmt::Display::fmt(s, f),
            Pattern::Atomic(a) => fmt::Display::fmt(a, f),
        }
    }
}

fn fmt_list(f: &mut fmt::Formatter<'_>, name: &str, subs: &[Arc<Pattern>]) -> fmt::Result {
    write!(f, "?{}(", name)?;
    for (i, sub) in subs.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", sub)?;
    }
    write!(f, ")")
}

impl fmt::Display for Structural {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Structural::And(subs) => fmt_list(f, "and", subs),
            Structural::Or(subs) => fmt_list(f, "or", subs),
            Structural::Not(sub) => write!(f, "?not({})", sub),
            Structural::For(sub) => write!(f, "?for({})", sub),
            Structural::Narrow { filter, body } => write!(f, "?narrow({}, {})", filter, body),
            Structural::Widen(sub) => write!(f, "?widen({})", sub),
            Structural::AllVersions(sub) => write!(f, "?all-versions({})", sub),
            Structural::AnyVersion(sub) => write!(f, "?any-version({})", sub),
        }
    }
}

impl fmt::Display for Atomic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atomic::Name(inf) => write!(f, "?name({})", inf),
            Atomic::Version(inf) => write!(f, "?version({})", inf),
            Atomic::Description(inf) => write!(f, "?description({})", inf),
            Atomic::Archive(inf) => write!(f, "?archive({})", inf),
            Atomic::Depends {
                kind,
                broken,
                pattern,
            } => {
                if *broken {
                    write!(f, "?broken-{}({})", kind, pattern)
                } else {
                    write!(f, "?{}({})", kind, pattern)
                }
            }
            Atomic::BrokenKind(kind) => write!(f, "?broken-{}", kind),
            Atomic::Action(kind) => write!(f, "?action({})", kind),
            Atomic::Bind { index, pattern } => write!(f, "?bind({}, {})", index, pattern),
            Atomic::Equal(index) => write!(f, "?=({})", index),
            Atomic::Essential => write!(f, "?essential"),
            Atomic::Automatic => write!(f, "?automatic"),
            Atomic::Broken => write!(f, "?broken"),
            Atomic::Garbage => write!(f, "?garbage"),
            Atomic::CandidateVersion => write!(f, "?candidate-version"),
            Atomic::CurrentVersion => write!(f, "?current-version"),
            Atomic::ConfigFiles => write!(f, "?config-files"),
            Atomic::Maintainer => write!(f, "?maintainer"),
            Atomic::Tag => write!(f, "?tag"),
            Atomic::Provides => write!(f, "?provides"),
            Atomic::Origin => write!(f, "?origin"),
            Atomic::Section => write!(f, "?section"),
            Atomic::Priority => write!(f, "?priority"),
            Atomic::Task => write!(f, "?task"),
            Atomic::SourcePackage => write!(f, "?source-package"),
            Atomic::SourceVersion => write!(f, "?source-version"),
            Atomic::ReverseDepends => write!(f, "?reverse-depends"),
            Atomic::ReverseProvides => write!(f, "?reverse-provides"),
            Atomic::New => write!(f, "?new"),
            Atomic::Obsolete => write!(f, "?obsolete"),
            Atomic::Upgradable => write!(f, "?upgradable"),
            Atomic::Installed => write!(f, "?installed"),
            Atomic::InstallVersion => write!(f, "?install-version"),
            Atomic::Virtual => write!(f, "?virtual"),
            Atomic::True => write!(f, "?true"),
            Atomic::False => write!(f, "?false"),
        }
    }
}
