//! In-memory package resolver.

use std::collections::BTreeMap;

use tracing::warn;

use importers_graph::{ImportSet, PackageId};

use super::PackageResolver;
use crate::error::ResolutionError;

/// Resolver over a fixed table of packages.
///
/// Path specs use Go's pattern syntax in import-path space: `...` matches any
/// string, and a trailing `/...` also matches the bare prefix (`net/...`
/// matches `net` and `net/http`). Expansion is in sorted order.
///
/// # Example
///
/// ```
/// use importers::resolver::{MemoryResolver, PackageResolver};
/// use importers_graph::ImportSet;
///
/// let resolver = MemoryResolver::new()
///     .with_package("app", ImportSet::new(["app/db".into()]))
///     .with_package("app/db", ImportSet::default());
///
/// let packages = resolver.resolve_packages("app/...")?;
/// assert_eq!(packages.len(), 2);
/// # Ok::<(), importers::ResolutionError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    packages: BTreeMap<PackageId, ImportSet>,
}

impl MemoryResolver {
    /// Create an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a package, builder style.
    #[must_use]
    pub fn with_package(mut self, id: impl Into<PackageId>, imports: ImportSet) -> Self {
        self.insert(id.into(), imports);
        self
    }

    /// Add or replace a package.
    pub fn insert(&mut self, id: PackageId, imports: ImportSet) {
        self.packages.insert(id, imports);
    }

    /// Number of known packages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Returns `true` if no packages are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl FromIterator<(PackageId, ImportSet)> for MemoryResolver {
    fn from_iter<I: IntoIterator<Item = (PackageId, ImportSet)>>(iter: I) -> Self {
        Self {
            packages: iter.into_iter().collect(),
        }
    }
}

impl PackageResolver for MemoryResolver {
    fn resolve_packages(&self, spec: &str) -> Result<Vec<PackageId>, ResolutionError> {
        if !spec.contains("...") {
            let id = PackageId::from(spec);
            return if self.packages.contains_key(&id) {
                Ok(vec![id])
            } else {
                Err(ResolutionError::PackageNotFound(spec.to_string()))
            };
        }

        let matched: Vec<PackageId> = self
            .packages
            .keys()
            .filter(|id| matches_pattern(spec, id.as_str()))
            .cloned()
            .collect();
        if matched.is_empty() {
            warn!(spec = spec, "Pattern matched no packages");
        }
        Ok(matched)
    }

    fn fetch_import_set(&self, id: &PackageId) -> Result<ImportSet, ResolutionError> {
        self.packages
            .get(id)
            .cloned()
            .ok_or_else(|| ResolutionError::load_failed(id.clone(), "package not found"))
    }
}

/// Go-style import path pattern match.
fn matches_pattern(pattern: &str, path: &str) -> bool {
    if let Some(prefix) = pattern.strip_suffix("/...") {
        if path == prefix {
            return true;
        }
    }

    let mut parts = pattern.split("...");
    let Some(first) = parts.next() else {
        return pattern == path;
    };
    let Some(mut rest) = path.strip_prefix(first) else {
        return false;
    };

    let remaining: Vec<&str> = parts.collect();
    let Some((last, middle)) = remaining.split_last() else {
        // No wildcard at all.
        return rest.is_empty();
    };
    for part in middle {
        match rest.find(part) {
            Some(pos) => rest = &rest[pos + part.len()..],
            None => return false,
        }
    }
    rest.ends_with(last)
}
