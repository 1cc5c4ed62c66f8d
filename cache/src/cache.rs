//! In-memory package cache storage.

use crate::dep::{DepGroup, VersionConstraint};
use crate::version::check_dep;
use quarry_core::{PackageId, VersionId};
use std::collections::HashMap;

/// The pending action computed for a package by the cache's state
/// bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionState {
    /// No change scheduled.
    #[default]
    Unchanged,
    /// New installation requested by the user.
    Install,
    /// New installation pulled in to satisfy a dependency.
    AutoInstall,
    /// Removal requested by the user.
    Remove,
    /// Removal pulled in to resolve a conflict.
    AutoRemove,
    /// Removal of a package nothing depends on anymore.
    UnusedRemove,
    /// Reinstallation of the current version.
    Reinstall,
    /// Replacement by a later version.
    Upgrade,
    /// Replacement by an earlier version.
    Downgrade,
}

impl ActionState {
    /// Whether this state installs a version (new install, upgrade,
    /// downgrade, or reinstall).
    pub fn installs(&self) -> bool {
        matches!(
            self,
            ActionState::Install
                | ActionState::AutoInstall
                | ActionState::Upgrade
                | ActionState::Downgrade
                | ActionState::Reinstall
        )
    }
}

/// A package record.
#[derive(Debug)]
pub struct Package {
    name: String,
    versions: Vec<VersionId>,
    current: Option<VersionId>,
    candidate: Option<VersionId>,
    action: ActionState,
    essential: bool,
    automatic: bool,
    garbage: bool,
    broken: bool,
    config_files: bool,
    purge: bool,
    keep: bool,
    hold: bool,
}

impl Package {
    fn new(name: String) -> Self {
        Self {
            name,
            versions: Vec::new(),
            current: None,
            candidate: None,
            action: ActionState::Unchanged,
            essential: false,
            automatic: false,
            garbage: false,
            broken: false,
            config_files: false,
            purge: false,
            keep: false,
            hold: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All versions of this package, in insertion (enumeration) order.
    pub fn versions(&self) -> &[VersionId] {
        &self.versions
    }

    /// The installed version, if any.
    pub fn current(&self) -> Option<VersionId> {
        self.current
    }

    /// The version that would be installed, if any.
    pub fn candidate(&self) -> Option<VersionId> {
        self.candidate
    }

    pub fn action(&self) -> ActionState {
        self.action
    }

    pub fn is_essential(&self) -> bool {
        self.essential
    }

    /// The raw automatically-installed flag.
    pub fn is_automatic(&self) -> bool {
        self.automatic
    }

    /// Installed automatically and no longer depended on.
    pub fn is_garbage(&self) -> bool {
        self.garbage
    }

    /// Broken now, or broken in the planned state.
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// Removed, but configuration files remain.
    pub fn is_config_files(&self) -> bool {
        self.config_files
    }

    /// A scheduled removal also purges configuration.
    pub fn is_purge(&self) -> bool {
        self.purge
    }

    /// Explicitly kept at its current version for this run.
    pub fn is_keep(&self) -> bool {
        self.keep
    }

    /// Selection state is hold.
    pub fn is_hold(&self) -> bool {
        self.hold
    }
}

/// A version record.
#[derive(Debug)]
pub struct Version {
    package: PackageId,
    version: String,
    description: String,
    archives: Vec<String>,
    depends: Vec<DepGroup>,
}

impl Version {
    fn new(package: PackageId, version: String) -> Self {
        Self {
            package,
            version,
            description: String::new(),
            archives: Vec::new(),
            depends: Vec::new(),
        }
    }

    /// The package this version belongs to.
    pub fn package_id(&self) -> PackageId {
        self.package
    }

    pub fn version_str(&self) -> &str {
        &self.version
    }

    /// The long description text.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Archive names of the files this version belongs to, in enumeration
    /// order.
    pub fn archives(&self) -> &[String] {
        &self.archives
    }

    /// Dependency OR-groups, in declaration order.
    pub fn depends(&self) -> &[DepGroup] {
        &self.depends
    }
}

/// The in-memory package cache.
///
/// Built up front through the `add_*`/`set_*` methods; read-only while an
/// evaluation runs. Lookups by id are total over well-formed ids; a stale
/// or foreign id is a programming error and panics.
#[derive(Debug, Default)]
pub struct Cache {
    packages: Vec<Package>,
    versions: Vec<Version>,
    by_name: HashMap<String, PackageId>,
}

impl Cache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Construction ====================

    /// Register a package. Names are unique; registering a name twice
    /// returns the existing id.
    pub fn add_package(&mut self, name: &str) -> PackageId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = PackageId::new(self.packages.len() as u32);
        self.packages.push(Package::new(name.to_string()));
        self.by_name.insert(name.to_string(), id);
        id
    }

    /// Register a version of a package.
    pub fn add_version(&mut self, package: PackageId, version: &str) -> VersionId {
        let id = VersionId::new(self.versions.len() as u32);
        self.versions.push(Version::new(package, version.to_string()));
        self.package_mut(package).versions.push(id);
        id
    }

    /// Mark a version as the installed one.
    pub fn set_current(&mut self, version: VersionId) {
        let package = self.version(version).package_id();
        self.package_mut(package).current = Some(version);
    }

    /// Mark a version as the install candidate.
    pub fn set_candidate(&mut self, version: VersionId) {
        let package = self.version(version).package_id();
        self.package_mut(package).candidate = Some(version);
    }

    pub fn set_action(&mut self, package: PackageId, action: ActionState) {
        self.package_mut(package).action = action;
    }

    pub fn set_essential(&mut self, package: PackageId, essential: bool) {
        self.package_mut(package).essential = essential;
    }

    pub fn set_automatic(&mut self, package: PackageId, automatic: bool) {
        self.package_mut(package).automatic = automatic;
    }

    pub fn set_garbage(&mut self, package: PackageId, garbage: bool) {
        self.package_mut(package).garbage = garbage;
    }

    pub fn set_broken(&mut self, package: PackageId, broken: bool) {
        self.package_mut(package).broken = broken;
    }

    pub fn set_config_files(&mut self, package: PackageId, config_files: bool) {
        self.package_mut(package).config_files = config_files;
    }

    pub fn set_purge(&mut self, package: PackageId, purge: bool) {
        self.package_mut(package).purge = purge;
    }

    pub fn set_keep(&mut self, package: PackageId, keep: bool) {
        self.package_mut(package).keep = keep;
    }

    pub fn set_hold(&mut self, package: PackageId, hold: bool) {
        self.package_mut(package).hold = hold;
    }

    pub fn set_description(&mut self, version: VersionId, description: &str) {
        self.version_mut(version).description = description.to_string();
    }

    /// Add an archive name for one of the files this version belongs to.
    pub fn add_archive(&mut self, version: VersionId, archive: &str) {
        self.version_mut(version).archives.push(archive.to_string());
    }

    /// Append a dependency OR-group to a version.
    pub fn add_depends(&mut self, version: VersionId, group: DepGroup) {
        self.version_mut(version).depends.push(group);
    }

    // ==================== Read interface ====================

    /// Get a package record.
    pub fn package(&self, id: PackageId) -> &Package {
        &self.packages[id.raw() as usize]
    }

    /// Get a version record.
    pub fn version(&self, id: VersionId) -> &Version {
        &self.versions[id.raw() as usize]
    }

    /// Look up a package by name.
    pub fn find_package(&self, name: &str) -> Option<PackageId> {
        self.by_name.get(name).copied()
    }

    /// All versions of a package, in enumeration order.
    pub fn versions_of(&self, package: PackageId) -> &[VersionId] {
        self.package(package).versions()
    }

    /// Iterate over all package ids.
    pub fn packages(&self) -> impl Iterator<Item = PackageId> + '_ {
        (0..self.packages.len() as u32).map(PackageId::new)
    }

    /// Whether `candidate` satisfies `constraint` under Debian version
    /// ordering.
    pub fn check_dep(&self, candidate: &str, constraint: &VersionConstraint) -> bool {
        check_dep(candidate, constraint)
    }

    fn package_mut(&mut self, id: PackageId) -> &mut Package {
        &mut self.packages[id.raw() as usize]
    }

    fn version_mut(&mut self, id: VersionId) -> &mut Version {
        &mut self.versions[id.raw() as usize]
    }
}
