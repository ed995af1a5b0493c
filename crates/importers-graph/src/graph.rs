//! Import graph and target set containers.
//!
//! Both are built once at the start of a query and stay immutable while the
//! engine traverses them.

use std::collections::{HashMap, HashSet};

use crate::package::{ImportSet, PackageId};

/// Mapping from package to its declared imports.
///
/// Covers at least every package reachable from the source scope. A package
/// with no entry is a dead end: it has no known imports.
#[derive(Debug, Clone, Default)]
pub struct ImportGraph {
    packages: HashMap<PackageId, ImportSet>,
}

impl ImportGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the imports of `id`, replacing any previous entry.
    ///
    /// Self-imports are stripped on the way in.
    pub fn insert(&mut self, id: PackageId, imports: ImportSet) -> Option<ImportSet> {
        let imports = imports.without_self(&id);
        self.packages.insert(id, imports)
    }

    /// Imports of `id`, if the package is known.
    #[must_use]
    pub fn get(&self, id: &PackageId) -> Option<&ImportSet> {
        self.packages.get(id)
    }

    /// Returns `true` if `id` has an entry.
    #[must_use]
    pub fn contains(&self, id: &PackageId) -> bool {
        self.packages.contains_key(id)
    }

    /// Number of packages with an entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Returns `true` if the graph has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Iterate over every package and its imports, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&PackageId, &ImportSet)> {
        self.packages.iter()
    }
}

impl FromIterator<(PackageId, ImportSet)> for ImportGraph {
    fn from_iter<I: IntoIterator<Item = (PackageId, ImportSet)>>(iter: I) -> Self {
        let mut graph = Self::new();
        graph.extend(iter);
        graph
    }
}

impl Extend<(PackageId, ImportSet)> for ImportGraph {
    fn extend<I: IntoIterator<Item = (PackageId, ImportSet)>>(&mut self, iter: I) {
        for (id, imports) in iter {
            self.insert(id, imports);
        }
    }
}

/// Packages whose importers are being searched for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSet {
    targets: HashSet<PackageId>,
}

impl TargetSet {
    /// Create an empty target set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `id` is a target.
    #[must_use]
    pub fn contains(&self, id: &PackageId) -> bool {
        self.targets.contains(id)
    }

    /// Number of distinct targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns `true` if there are no targets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Iterate over the targets, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &PackageId> {
        self.targets.iter()
    }
}

impl FromIterator<PackageId> for TargetSet {
    fn from_iter<I: IntoIterator<Item = PackageId>>(iter: I) -> Self {
        Self {
            targets: iter.into_iter().collect(),
        }
    }
}

impl Extend<PackageId> for TargetSet {
    fn extend<I: IntoIterator<Item = PackageId>>(&mut self, iter: I) {
        self.targets.extend(iter);
    }
}
