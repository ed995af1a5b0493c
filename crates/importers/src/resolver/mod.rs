//! Package resolution: turning path specs into packages and packages into
//! import metadata.
//!
//! The [`PackageResolver`] trait is the boundary between the query pipeline
//! and whatever build system knows about packages. Two implementations ship
//! with the crate:
//!
//! | Resolver | Source of truth |
//! |----------|-----------------|
//! | [`GoResolver`] | `go list` run against a Go module |
//! | [`MemoryResolver`] | A fixed in-memory package table |

mod go;
mod go_list;
mod memory;

pub use go::{GoResolver, GoToolchain};
pub use go_list::GoPackage;
pub use memory::MemoryResolver;

use rayon::prelude::*;

use importers_graph::{ImportSet, PackageId};

use crate::error::ResolutionError;

/// Per-package outcome of a batch fetch.
pub type FetchResult = (PackageId, Result<ImportSet, ResolutionError>);

/// Read-only access to a build environment's package metadata.
///
/// Implementations must be side-effect free; the loader may call them from
/// several threads at once.
pub trait PackageResolver: Sync {
    /// Expand a possibly wildcarded path spec into package IDs.
    ///
    /// The result is deduplicated and keeps first-seen order.
    ///
    /// # Errors
    ///
    /// Returns an error if the spec cannot be expanded.
    fn resolve_packages(&self, spec: &str) -> Result<Vec<PackageId>, ResolutionError>;

    /// Load the imports declared by one package.
    ///
    /// # Errors
    ///
    /// Returns an error if the package cannot be loaded.
    fn fetch_import_set(&self, id: &PackageId) -> Result<ImportSet, ResolutionError>;

    /// Load the imports of many packages.
    ///
    /// Returns one entry per requested ID, in request order. The outer error
    /// means the whole batch failed; inner errors are per package.
    ///
    /// The default implementation runs [`fetch_import_set`] in parallel.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch as a whole could not be run.
    ///
    /// [`fetch_import_set`]: PackageResolver::fetch_import_set
    fn fetch_import_sets(&self, ids: &[PackageId]) -> Result<Vec<FetchResult>, ResolutionError> {
        Ok(ids
            .par_iter()
            .map(|id| (id.clone(), self.fetch_import_set(id)))
            .collect())
    }
}

impl<R: PackageResolver + ?Sized> PackageResolver for &R {
    fn resolve_packages(&self, spec: &str) -> Result<Vec<PackageId>, ResolutionError> {
        (**self).resolve_packages(spec)
    }

    fn fetch_import_set(&self, id: &PackageId) -> Result<ImportSet, ResolutionError> {
        (**self).fetch_import_set(id)
    }

    fn fetch_import_sets(&self, ids: &[PackageId]) -> Result<Vec<FetchResult>, ResolutionError> {
        (**self).fetch_import_sets(ids)
    }
}

/// Remove repeated IDs, keeping the first occurrence.
pub(crate) fn dedup_in_order(ids: impl IntoIterator<Item = PackageId>) -> Vec<PackageId> {
    let mut seen = std::collections::HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Resolver that only implements the single-package calls.
    struct CountingResolver {
        fetches: AtomicUsize,
    }

    impl PackageResolver for CountingResolver {
        fn resolve_packages(&self, spec: &str) -> Result<Vec<PackageId>, ResolutionError> {
            Ok(vec![spec.into()])
        }

        fn fetch_import_set(&self, id: &PackageId) -> Result<ImportSet, ResolutionError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if id.as_str() == "broken" {
                return Err(ResolutionError::load_failed(id.clone(), "cannot load"));
            }
            Ok(ImportSet::new([PackageId::from(format!("{id}/dep"))]))
        }
    }

    #[test]
    fn default_batch_fetch_keeps_request_order() {
        let resolver = CountingResolver {
            fetches: AtomicUsize::new(0),
        };
        let ids: Vec<PackageId> = ["a", "broken", "c"].into_iter().map(PackageId::from).collect();

        let results = resolver.fetch_import_sets(&ids).expect("batch runs");

        assert_eq!(resolver.fetches.load(Ordering::SeqCst), 3);
        let order: Vec<&PackageId> = results.iter().map(|(id, _)| id).collect();
        assert_eq!(order, ids.iter().collect::<Vec<_>>());
        assert!(results[0].1.is_ok());
        assert!(results[1].1.is_err());
        assert_eq!(
            results[2].1.as_ref().expect("c loads").imports,
            vec![PackageId::from("c/dep")]
        );
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let ids = dedup_in_order(["b", "a", "b", "c", "a"].into_iter().map(PackageId::from));
        let names: Vec<&str> = ids.iter().map(PackageId::as_str).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }
}
