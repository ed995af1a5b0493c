//! Package resolution backed by the Go toolchain.
//!
//! Path specs are expanded with `go list <spec>`, and import metadata is
//! loaded in batches with `go list -e -json <packages...>`. The toolchain is
//! only ever asked to read; nothing is built or downloaded beyond what
//! `go list` itself does.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Command;

use tracing::{debug, trace, warn};

use importers_graph::{ImportSet, PackageId};

use super::go_list::parse_package_stream;
use super::{FetchResult, PackageResolver, dedup_in_order};
use crate::error::ResolutionError;

/// Maximum number of packages passed to a single `go list` invocation.
///
/// Keeps the command line well under OS argument length limits.
const MAX_PACKAGES_PER_LIST: usize = 256;

/// The cgo pseudo-package. It has no metadata and is never listed.
const CGO_PSEUDO_PACKAGE: &str = "C";

const INSTALL_HINT: &str =
    "Install Go from https://go.dev/dl/ or pass --go with the path to the go binary.";

/// How to invoke the Go toolchain.
#[derive(Debug, Clone)]
pub struct GoToolchain {
    /// The `go` executable to run.
    pub program: PathBuf,
    /// Directory to run in; `None` inherits the current directory.
    pub dir: Option<PathBuf>,
    /// Build tags passed as `-tags`.
    pub tags: Vec<String>,
}

impl Default for GoToolchain {
    fn default() -> Self {
        Self {
            program: PathBuf::from("go"),
            dir: None,
            tags: Vec::new(),
        }
    }
}

impl GoToolchain {
    /// Arguments for a `go list` run, with build flags before the operands.
    fn list_args<'a>(
        &self,
        flags: &[&str],
        operands: impl IntoIterator<Item = &'a str>,
    ) -> Vec<String> {
        let mut args = vec!["list".to_string()];
        args.extend(flags.iter().map(|f| (*f).to_string()));
        if !self.tags.is_empty() {
            args.push(format!("-tags={}", self.tags.join(",")));
        }
        args.extend(operands.into_iter().map(str::to_string));
        args
    }
}

/// Resolver that shells out to `go list`.
#[derive(Debug, Clone, Default)]
pub struct GoResolver {
    toolchain: GoToolchain,
}

impl GoResolver {
    /// Create a resolver for the given toolchain.
    #[must_use]
    pub fn new(toolchain: GoToolchain) -> Self {
        Self { toolchain }
    }

    /// The toolchain this resolver runs.
    #[must_use]
    pub fn toolchain(&self) -> &GoToolchain {
        &self.toolchain
    }

    /// Run the toolchain and return its stdout.
    fn run(&self, args: &[String]) -> Result<Vec<u8>, ResolutionError> {
        let program = &self.toolchain.program;
        let command_name = program.display().to_string();

        debug!(command = %command_name, args = ?args, "Running go toolchain");

        let mut command = Command::new(program);
        command.args(args);
        if let Some(dir) = &self.toolchain.dir {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ResolutionError::ToolNotFound {
                    command: command_name.clone(),
                    install_hint: INSTALL_HINT.to_string(),
                }
            } else {
                ResolutionError::SpawnFailed {
                    command: command_name.clone(),
                    source: e,
                }
            }
        })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(ResolutionError::ListFailed {
                args: args.to_vec(),
                status: output.status.to_string(),
                stderr: stderr.into_owned(),
            });
        }
        if !stderr.trim().is_empty() {
            // e.g. "matched no packages"
            warn!(
                command = %command_name,
                stderr = %stderr.trim_end(),
                "go list reported warnings"
            );
        }

        Ok(output.stdout)
    }

    /// Load one chunk of packages with a single `go list -e -json` run.
    fn fetch_chunk(&self, ids: &[&PackageId]) -> Result<Vec<FetchResult>, ResolutionError> {
        let args = self
            .toolchain
            .list_args(&["-e", "-json"], ids.iter().map(|id| id.as_str()));
        let stdout = self.run(&args)?;

        let mut by_path: HashMap<PackageId, Result<ImportSet, ResolutionError>> = HashMap::new();
        for package in parse_package_stream(&stdout)? {
            let path = package.import_path.clone();
            let loaded = package.into_import_set().map(|(_, imports)| imports);
            by_path.insert(path, loaded);
        }

        Ok(ids
            .iter()
            .map(|id| {
                let loaded = by_path.remove(*id).unwrap_or_else(|| {
                    Err(ResolutionError::load_failed(
                        (*id).clone(),
                        "go list returned no metadata for this package",
                    ))
                });
                ((*id).clone(), loaded)
            })
            .collect())
    }
}

impl PackageResolver for GoResolver {
    fn resolve_packages(&self, spec: &str) -> Result<Vec<PackageId>, ResolutionError> {
        let args = self.toolchain.list_args(&[], [spec]);
        let stdout = self.run(&args)?;
        let packages = dedup_in_order(
            String::from_utf8_lossy(&stdout)
                .split_whitespace()
                .map(PackageId::from),
        );

        debug!(spec = spec, count = packages.len(), "Resolved path spec");
        Ok(packages)
    }

    fn fetch_import_set(&self, id: &PackageId) -> Result<ImportSet, ResolutionError> {
        let mut results = self.fetch_import_sets(std::slice::from_ref(id))?;
        match results.pop() {
            Some((_, loaded)) => loaded,
            None => Err(ResolutionError::load_failed(
                id.clone(),
                "go list returned no metadata for this package",
            )),
        }
    }

    fn fetch_import_sets(&self, ids: &[PackageId]) -> Result<Vec<FetchResult>, ResolutionError> {
        let (cgo, listable): (Vec<&PackageId>, Vec<&PackageId>) =
            ids.iter().partition(|id| id.as_str() == CGO_PSEUDO_PACKAGE);

        let mut loaded: HashMap<&PackageId, Result<ImportSet, ResolutionError>> = HashMap::new();
        for id in cgo {
            trace!("Skipping cgo pseudo-package");
            loaded.insert(id, Ok(ImportSet::default()));
        }
        for chunk in listable.chunks(MAX_PACKAGES_PER_LIST) {
            for (id, (_, result)) in chunk.iter().copied().zip(self.fetch_chunk(chunk)?) {
                loaded.insert(id, result);
            }
        }

        Ok(ids
            .iter()
            .map(|id| {
                let result = loaded.remove(id).unwrap_or_else(|| {
                    Err(ResolutionError::load_failed(
                        id.clone(),
                        "go list returned no metadata for this package",
                    ))
                });
                (id.clone(), result)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_args_put_tags_before_operands() {
        let toolchain = GoToolchain {
            tags: vec!["integration".into(), "linux".into()],
            ..GoToolchain::default()
        };

        let args = toolchain.list_args(&["-e", "-json"], ["a", "b"]);
        assert_eq!(args, ["list", "-e", "-json", "-tags=integration,linux", "a", "b"]);
    }

    #[test]
    fn list_args_without_tags() {
        let args = GoToolchain::default().list_args(&[], ["./..."]);
        assert_eq!(args, ["list", "./..."]);
    }

    #[test]
    fn missing_binary_is_reported_with_hint() {
        let resolver = GoResolver::new(GoToolchain {
            program: PathBuf::from("/definitely/not/a/real/go"),
            ..GoToolchain::default()
        });

        let err = resolver
            .resolve_packages("./...")
            .expect_err("binary does not exist");
        assert!(matches!(err, ResolutionError::ToolNotFound { .. }));
        assert!(err.to_string().contains("https://go.dev/dl/"));
    }

    #[test]
    fn cgo_pseudo_package_is_never_listed() {
        // The binary does not exist, so any real `go list` call would fail.
        let resolver = GoResolver::new(GoToolchain {
            program: PathBuf::from("/definitely/not/a/real/go"),
            ..GoToolchain::default()
        });

        let imports = resolver
            .fetch_import_set(&PackageId::from("C"))
            .expect("C needs no toolchain call");
        assert!(imports.is_empty());
    }
}
