//! Error types for importer queries.
//!
//! - **`ResolutionError`**: the package resolver could not expand a path
//!   spec or load a package's import metadata.
//! - **`Error`**: anything that stops a query, wrapping resolver failures and
//!   engine failures.
//!
//! There is no partial-result mode: the first failure ends the query.

use thiserror::Error;

use importers_graph::{GraphError, PackageId};

/// Result type for importer queries.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for importer queries.
#[derive(Debug, Error)]
pub enum Error {
    /// A path spec or package could not be resolved
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// The import graph could not be traversed
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Errors reported by a package resolver.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// The toolchain executable is not installed.
    #[error("{command} not found\n\n{install_hint}")]
    ToolNotFound {
        /// The command that was not found.
        command: String,
        /// Installation instructions for the missing command.
        install_hint: String,
    },

    /// Failed to spawn the toolchain process.
    #[error("failed to run '{command}'")]
    SpawnFailed {
        /// The command that failed to spawn.
        command: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The listing tool rejected the path spec or the package list.
    #[error("{}", stderr_or_status(.stderr, .status))]
    ListFailed {
        /// Arguments passed to the listing tool.
        args: Vec<String>,
        /// Exit status, as printed by the OS.
        status: String,
        /// Everything the tool wrote to stderr.
        stderr: String,
    },

    /// A path spec without wildcards named no known package.
    #[error("cannot find package \"{0}\"")]
    PackageNotFound(String),

    /// The listing tool produced output that could not be decoded.
    #[error("malformed package listing")]
    MalformedListing(#[source] serde_json::Error),

    /// A single package's import metadata could not be loaded.
    #[error("{package}: {message}")]
    LoadFailed {
        /// The package that failed to load.
        package: PackageId,
        /// Reason reported by the toolchain.
        message: String,
    },
}

impl ResolutionError {
    /// Create a load failure for one package.
    #[must_use]
    pub fn load_failed(package: PackageId, message: impl Into<String>) -> Self {
        Self::LoadFailed {
            package,
            message: message.into(),
        }
    }
}

/// The tool's own message when it printed one, otherwise its exit status.
fn stderr_or_status(stderr: &str, status: &str) -> String {
    let trimmed = stderr.trim_end();
    if trimmed.is_empty() {
        format!("package listing failed ({status})")
    } else {
        trimmed.to_string()
    }
}
