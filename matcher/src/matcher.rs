//! Pattern evaluation against the package cache.

use crate::result::{Match, StructuralMatch};
use crate::stack::{PoolDisplay, Stack};
use quarry_cache::{ActionState, Cache, DepKind};
use quarry_core::{Matchable, PackageId, VersionId};
use quarry_pattern::{ActionKind, Atomic, Pattern, RegexInfo, Structural};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// The quantifier applied when an atomic predicate is finally run against a
/// pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalMode {
    /// Every matchable in the pool must satisfy the predicate.
    All,
    /// At least one matchable in the pool must satisfy the predicate.
    Any,
}

impl fmt::Display for EvalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalMode::All => write!(f, "all"),
            EvalMode::Any => write!(f, "any"),
        }
    }
}

/// Pattern matcher over a borrowed, read-only cache.
pub struct Matcher<'c> {
    cache: &'c Cache,
}

impl<'c> Matcher<'c> {
    /// Create a new matcher.
    pub fn new(cache: &'c Cache) -> Self {
        Self { cache }
    }

    /// Evaluate `pattern` against a package, optionally narrowed to one of
    /// its versions.
    ///
    /// The initial pool is the given version alone; or every version of the
    /// package; or, for a package with no versions (a virtual package), the
    /// bare package itself. The root is evaluated in `Any` mode with the
    /// initial pool as the only bound variable.
    pub fn get_match(
        &self,
        pattern: &Arc<Pattern>,
        package: PackageId,
        version: Option<VersionId>,
    ) -> Option<StructuralMatch> {
        let mut initial_pool: Vec<Matchable> = match version {
            Some(ver) => {
                assert_eq!(
                    self.cache.version(ver).package_id(),
                    package,
                    "internal error: version does not belong to the given package"
                );
                vec![Matchable::version(package, ver)]
            }
            None => {
                let versions = self.cache.versions_of(package);
                if versions.is_empty() {
                    vec![Matchable::package(package)]
                } else {
                    versions
                        .iter()
                        .map(|&ver| Matchable::version(package, ver))
                        .collect()
                }
            }
        };
        initial_pool.sort();

        let stack = Stack::with_frame(&initial_pool);
        self.evaluate_structural(EvalMode::Any, pattern, &stack, &initial_pool)
    }

    fn evaluate_structural<'a>(
        &self,
        mode: EvalMode,
        pattern: &Arc<Pattern>,
        stack: &Stack<'a>,
        pool: &'a [Matchable],
    ) -> Option<StructuralMatch> {
        trace!(
            pattern = %pattern,
            pool = %PoolDisplay(pool),
            stack = %stack,
            mode = %mode,
            "evaluating structural node"
        );

        match pattern.as_ref() {
            Pattern::Structural(node) => match node {
                Structural::And(sub_patterns) => {
                    let mut children = Vec::with_capacity(sub_patterns.len());
                    for sub in sub_patterns {
                        children.push(self.evaluate_structural(mode, sub, stack, pool)?);
                    }
                    Some(StructuralMatch::branch(pattern.clone(), children))
                }

                Structural::Or(sub_patterns) => {
                    // No short-circuit: collect every matching alternative so
                    // the caller sees as much of the match as possible.
                    let children: Vec<StructuralMatch> = sub_patterns
                        .iter()
                        .filter_map(|sub| self.evaluate_structural(mode, sub, stack, pool))
                        .collect();

                    if children.is_empty() {
                        None
                    } else {
                        Some(StructuralMatch::branch(pattern.clone(), children))
                    }
                }

                Structural::Not(sub) => {
                    match self.evaluate_structural(mode, sub, stack, pool) {
                        // A branch with no sub-parts: double negation loses
                        // the inner match detail.
                        None => Some(StructuralMatch::branch(pattern.clone(), Vec::new())),
                        Some(_) => None,
                    }
                }

                Structural::For(sub) => {
                    let extended = stack.push(pool);
                    let m = self.evaluate_structural(mode, sub, &extended, pool)?;
                    Some(StructuralMatch::branch(pattern.clone(), vec![m]))
                }

                Structural::Narrow { filter, body } => {
                    // Match each pool entry against the filter separately,
                    // then match the body against the survivors.
                    let mut filtered = Vec::new();
                    for &matchable in pool {
                        let singleton = [matchable];
                        if self
                            .evaluate_structural(mode, filter, stack, &singleton)
                            .is_some()
                        {
                            filtered.push(matchable);
                        }
                    }

                    if filtered.is_empty() {
                        return None;
                    }
                    let m = self.evaluate_structural(mode, body, stack, &filtered)?;
                    Some(StructuralMatch::branch(pattern.clone(), vec![m]))
                }

                Structural::Widen(sub) => {
                    // Relies on the pool's sort order: a package already
                    // expanded sits at the back of the new pool.
                    let mut widened: Vec<Matchable> = Vec::new();
                    for &matchable in pool {
                        if widened.last().map(Matchable::package_id)
                            == Some(matchable.package_id())
                        {
                            continue;
                        }

                        // Virtual packages pass through untouched.
                        if !matchable.has_version() {
                            widened.push(matchable);
                            continue;
                        }

                        let versions = self.cache.versions_of(matchable.package_id());
                        if versions.is_empty() {
                            widened.push(matchable);
                        } else {
                            widened.extend(
                                versions
                                    .iter()
                                    .map(|&ver| Matchable::version(matchable.package_id(), ver)),
                            );
                        }
                    }
                    widened.sort();

                    let m = self.evaluate_structural(mode, sub, stack, &widened)?;
                    Some(StructuralMatch::branch(pattern.clone(), vec![m]))
                }

                Structural::AllVersions(sub) => {
                    let m = self.evaluate_structural(EvalMode::All, sub, stack, pool)?;
                    Some(StructuralMatch::branch(pattern.clone(), vec![m]))
                }

                Structural::AnyVersion(sub) => {
                    // Despite the name, the ambient mode is kept: each entry
                    // is evaluated against a singleton pool on its own.
                    let mut children = Vec::new();
                    for &matchable in pool {
                        let singleton = [matchable];
                        if let Some(m) =
                            self.evaluate_structural(mode, sub, stack, &singleton)
                        {
                            children.push(m);
                        }
                    }

                    if children.is_empty() {
                        None
                    } else {
                        Some(StructuralMatch::branch(pattern.clone(), children))
                    }
                }
            },

            Pattern::Atomic(atomic) => self.evaluate_pool(mode, pattern, atomic, stack, pool),
        }
    }

    /// Run an atomic predicate over a pool under the active quantifier.
    fn evaluate_pool<'a>(
        &self,
        mode: EvalMode,
        pattern: &Arc<Pattern>,
        atomic: &Atomic,
        stack: &Stack<'a>,
        pool: &'a [Matchable],
    ) -> Option<StructuralMatch> {
        let mut matches = Vec::new();

        match mode {
            EvalMode::All => {
                for &matchable in pool {
                    match self.evaluate_atomic(pattern, atomic, matchable, stack) {
                        Some(m) => matches.push((matchable, m)),
                        None => {
                            trace!(candidate = %matchable, "failed to match");
                            return None;
                        }
                    }
                }
            }
            EvalMode::Any => {
                // No short-circuit: the witness lists every matching entry.
                for &matchable in pool {
                    if let Some(m) = self.evaluate_atomic(pattern, atomic, matchable, stack) {
                        trace!(candidate = %matchable, "matched");
                        matches.push((matchable, m));
                    }
                }
            }
        }

        if matches.is_empty() {
            None
        } else {
            Some(StructuralMatch::leaf(pattern.clone(), matches))
        }
    }

    /// Run an atomic predicate against one matchable.
    fn evaluate_atomic<'a>(
        &self,
        pattern: &Arc<Pattern>,
        atomic: &Atomic,
        target: Matchable,
        stack: &Stack<'a>,
    ) -> Option<Match> {
        trace!(
            pattern = %pattern,
            candidate = %target,
            stack = %stack,
            "evaluating atomic node"
        );

        match atomic {
            Atomic::Name(inf) => self.evaluate_regexp(
                pattern,
                inf,
                self.cache.package(target.package_id()).name(),
            ),

            Atomic::Version(inf) => {
                let ver = target.version_id()?;
                self.evaluate_regexp(pattern, inf, self.cache.version(ver).version_str())
            }

            Atomic::Description(inf) => {
                let ver = target.version_id()?;
                self.evaluate_regexp(pattern, inf, self.cache.version(ver).description())
            }

            Atomic::Archive(inf) => {
                let ver = target.version_id()?;
                // Files are tried in enumeration order; first hit wins.
                for archive in self.cache.version(ver).archives() {
                    if let Some(m) = self.evaluate_regexp(pattern, inf, archive) {
                        return Some(m);
                    }
                }
                None
            }

            Atomic::Depends {
                kind,
                broken,
                pattern: sub,
            } => self.evaluate_depends(pattern, *kind, *broken, sub, target, stack),

            Atomic::BrokenKind(kind) => {
                let ver = target.version_id()?;
                self.cache
                    .version(ver)
                    .depends()
                    .iter()
                    .any(|group| group.kind() == *kind && !group.is_satisfied())
                    .then(|| Match::atomic(pattern.clone()))
            }

            Atomic::Action(kind) => {
                let pkg = self.cache.package(target.package_id());
                let state = pkg.action();
                let matched = match kind {
                    ActionKind::Install => {
                        matches!(state, ActionState::Install | ActionState::AutoInstall)
                    }
                    ActionKind::Remove => matches!(
                        state,
                        ActionState::Remove
                            | ActionState::AutoRemove
                            | ActionState::UnusedRemove
                    ),
                    ActionKind::Purge => {
                        pkg.is_purge()
                            && matches!(
                                state,
                                ActionState::Remove
                                    | ActionState::AutoRemove
                                    | ActionState::UnusedRemove
                            )
                    }
                    ActionKind::Hold => pkg.current().is_some() && pkg.is_hold(),
                    ActionKind::Reinstall => state == ActionState::Reinstall,
                    ActionKind::Upgrade => state == ActionState::Upgrade,
                    ActionKind::Downgrade => state == ActionState::Downgrade,
                    ActionKind::Keep => pkg.is_keep(),
                };
                matched.then(|| Match::atomic(pattern.clone()))
            }

            Atomic::Bind {
                index,
                pattern: sub,
            } => {
                // The bound pool is evaluated in Any mode regardless of the
                // ambient quantifier.
                let bound = stack.frame(*index);
                let m = self.evaluate_structural(EvalMode::Any, sub, stack, bound)?;
                Some(Match::with_sub_match(pattern.clone(), m))
            }

            Atomic::Equal(index) => {
                let pool = stack.frame(*index);
                pool.binary_search(&target)
                    .is_ok()
                    .then(|| Match::atomic(pattern.clone()))
            }

            Atomic::Essential => self
                .cache
                .package(target.package_id())
                .is_essential()
                .then(|| Match::atomic(pattern.clone())),

            Atomic::Automatic => {
                let pkg = self.cache.package(target.package_id());
                ((pkg.current().is_some() || pkg.action().installs()) && pkg.is_automatic())
                    .then(|| Match::atomic(pattern.clone()))
            }

            Atomic::Broken => {
                target.version_id()?;
                self.cache
                    .package(target.package_id())
                    .is_broken()
                    .then(|| Match::atomic(pattern.clone()))
            }

            Atomic::Garbage => {
                target.version_id()?;
                self.cache
                    .package(target.package_id())
                    .is_garbage()
                    .then(|| Match::atomic(pattern.clone()))
            }

            Atomic::CandidateVersion => {
                let ver = target.version_id()?;
                (self.cache.package(target.package_id()).candidate() == Some(ver))
                    .then(|| Match::atomic(pattern.clone()))
            }

            Atomic::CurrentVersion => {
                let ver = target.version_id()?;
                (self.cache.package(target.package_id()).current() == Some(ver))
                    .then(|| Match::atomic(pattern.clone()))
            }

            Atomic::ConfigFiles => self
                .cache
                .package(target.package_id())
                .is_config_files()
                .then(|| Match::atomic(pattern.clone())),

            // Predicates not yet wired to a cache fact never match.
            Atomic::Maintainer
            | Atomic::Tag
            | Atomic::Provides
            | Atomic::Origin
            | Atomic::Section
            | Atomic::Priority
            | Atomic::Task
            | Atomic::SourcePackage
            | Atomic::SourceVersion
            | Atomic::ReverseDepends
            | Atomic::ReverseProvides
            | Atomic::New
            | Atomic::Obsolete
            | Atomic::Upgradable
            | Atomic::Installed
            | Atomic::InstallVersion
            | Atomic::Virtual
            | Atomic::True
            | Atomic::False => None,
        }
    }

    /// Scan a version's dependency OR-groups for one of the requested kind
    /// whose target set satisfies the nested pattern.
    fn evaluate_depends<'a>(
        &self,
        pattern: &Arc<Pattern>,
        kind: DepKind,
        broken: bool,
        sub: &Arc<Pattern>,
        target: Matchable,
        stack: &Stack<'a>,
    ) -> Option<Match> {
        let ver = target.version_id()?;

        for group in self.cache.version(ver).depends() {
            let kind_matches = group.kind() == kind
                || (kind == DepKind::Depends && group.kind() == DepKind::PreDepends);
            if !kind_matches {
                continue;
            }
            if broken && group.is_satisfied() {
                continue;
            }

            // Collect the target set of the whole OR-group: every version of
            // the target passing the clause's constraint, or the bare package
            // when it has no versions.
            let mut new_pool = Vec::new();
            for clause in group.clauses() {
                let versions = self.cache.versions_of(clause.target());
                if versions.is_empty() {
                    new_pool.push(Matchable::package(clause.target()));
                } else {
                    for &v in versions {
                        let accepted = match clause.constraint() {
                            Some(constraint) => self
                                .cache
                                .check_dep(self.cache.version(v).version_str(), constraint),
                            None => true,
                        };
                        if accepted {
                            new_pool.push(Matchable::version(clause.target(), v));
                        }
                    }
                }
            }

            if new_pool.is_empty() {
                continue;
            }
            new_pool.sort();

            if let Some(m) = self.evaluate_structural(EvalMode::Any, sub, stack, &new_pool) {
                // The witness records the head of the OR-group, even though
                // any alternative may be the one that matched.
                return Some(Match::dependency(
                    pattern.clone(),
                    m,
                    group.head_dependency(),
                ));
            }
        }

        None
    }

    fn evaluate_regexp(
        &self,
        pattern: &Arc<Pattern>,
        inf: &RegexInfo,
        input: &str,
    ) -> Option<Match> {
        let spans = inf.find(input)?;
        Some(Match::regexp(pattern.clone(), spans))
    }
}
