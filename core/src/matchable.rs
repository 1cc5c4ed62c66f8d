//! The `Matchable` locator.
//!
//! A matchable names a package, optionally paired with one of its versions.
//! It is the unit of membership in an evaluation pool. Matchables carry no
//! ownership of the cache; they are lightweight locators into it.

use crate::{PackageId, VersionId};
use std::fmt;

/// A (package, optional version) locator.
///
/// The derived total order sorts primarily by package, secondarily by
/// version, with an unversioned matchable ordered before every versioned
/// matchable of the same package. Pools rely on this order for binary
/// search (`equal`) and consecutive-duplicate elimination (`widen`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Matchable {
    package: PackageId,
    version: Option<VersionId>,
}

impl Matchable {
    /// Create a matchable for a package with no version (a virtual package,
    /// or a package considered as a whole).
    pub fn package(package: PackageId) -> Self {
        Self {
            package,
            version: None,
        }
    }

    /// Create a matchable for one version of a package.
    pub fn version(package: PackageId, version: VersionId) -> Self {
        Self {
            package,
            version: Some(version),
        }
    }

    /// The package this matchable names.
    pub fn package_id(&self) -> PackageId {
        self.package
    }

    /// The version this matchable names, if any.
    pub fn version_id(&self) -> Option<VersionId> {
        self.version
    }

    /// Whether this matchable carries a version.
    pub fn has_version(&self) -> bool {
        self.version.is_some()
    }
}

impl fmt::Display for Matchable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.version {
            Some(ver) => write!(f, "{}:{}", self.package, ver),
            None => write!(f, "{}", self.package),
        }
    }
}
