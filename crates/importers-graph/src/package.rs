//! Package identifiers and their declared imports.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a package within the host ecosystem's namespace.
///
/// Identifiers are opaque: equality is exact string equality and no
/// normalization is applied. Ordering is plain string ordering, which is
/// what result sets are sorted by.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageId(String);

impl PackageId {
    /// Create a new package ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PackageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PackageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for PackageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The imports a single package declares, split by where they are used.
///
/// Duplicates within a sequence are tolerated and carry no meaning; the
/// engine treats every sequence as a set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSet {
    /// Ordinary compile-time imports.
    pub imports: Vec<PackageId>,

    /// Imports used only by the package's own test files.
    pub test_imports: Vec<PackageId>,

    /// Imports used only by external test packages.
    pub external_test_imports: Vec<PackageId>,
}

impl ImportSet {
    /// Create an import set with ordinary imports only.
    pub fn new(imports: impl IntoIterator<Item = PackageId>) -> Self {
        Self {
            imports: imports.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Set the imports used by the package's own test files.
    #[must_use]
    pub fn with_test_imports(mut self, test_imports: impl IntoIterator<Item = PackageId>) -> Self {
        self.test_imports = test_imports.into_iter().collect();
        self
    }

    /// Set the imports used by external test packages.
    #[must_use]
    pub fn with_external_test_imports(
        mut self,
        external_test_imports: impl IntoIterator<Item = PackageId>,
    ) -> Self {
        self.external_test_imports = external_test_imports.into_iter().collect();
        self
    }

    /// Drop every entry naming `owner`.
    ///
    /// External test packages import the package under test, so toolchain
    /// metadata routinely lists a package among its own external-test
    /// imports. A package never depends on itself through an edge.
    #[must_use]
    pub fn without_self(mut self, owner: &PackageId) -> Self {
        self.imports.retain(|id| id != owner);
        self.test_imports.retain(|id| id != owner);
        self.external_test_imports.retain(|id| id != owner);
        self
    }

    /// Ordinary imports, the only edges followed past the first hop.
    pub fn imports(&self) -> impl Iterator<Item = &PackageId> {
        self.imports.iter()
    }

    /// Edges usable as the first hop of an import chain.
    ///
    /// Test and external-test imports are included only when
    /// `include_tests` is set.
    pub fn first_hop(&self, include_tests: bool) -> impl Iterator<Item = &PackageId> {
        let (tests, external_tests): (&[PackageId], &[PackageId]) = if include_tests {
            (&self.test_imports, &self.external_test_imports)
        } else {
            (&[], &[])
        };
        self.imports.iter().chain(tests).chain(external_tests)
    }

    /// Returns `true` if the package declares no imports of any kind.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
            && self.test_imports.is_empty()
            && self.external_test_imports.is_empty()
    }
}
