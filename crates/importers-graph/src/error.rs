//! Error types for import graph queries.

use std::fmt;

use thiserror::Error;

use crate::package::PackageId;

/// Result type for import graph queries.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors raised while traversing an import graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The traversal re-entered a package that was still being resolved.
    #[error("import cycle not allowed: {}", CyclePath(cycle))]
    ImportCycle {
        /// Packages on the cycle, starting and ending with the same package.
        cycle: Vec<PackageId>,
    },
}

struct CyclePath<'a>(&'a [PackageId]);

impl fmt::Display for CyclePath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{id}")?;
        }
        Ok(())
    }
}
