//! Transitive reverse-dependency queries over package import graphs.
//!
//! Given a source scope of packages, an import graph and a set of target
//! packages, this crate answers "which source packages depend, directly or
//! transitively, on a target?".
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`package`] | `PackageId` and per-package `ImportSet` |
//! | [`graph`] | `ImportGraph` and `TargetSet` containers |
//! | [`reachability`] | Memoized depth-first importer computation |
//! | [`explain`] | Shortest import chains for qualifying packages |
//!
//! ## Example
//!
//! ```
//! use importers_graph::{ImportGraph, ImportSet, PackageId, TargetSet, compute_importers};
//!
//! let mut graph = ImportGraph::new();
//! graph.insert("app".into(), ImportSet::new(["lib".into()]));
//! graph.insert("lib".into(), ImportSet::new(["core".into()]));
//!
//! let targets: TargetSet = [PackageId::from("core")].into_iter().collect();
//! let scope: Vec<PackageId> = vec!["app".into(), "lib".into()];
//!
//! let importers = compute_importers(&scope, &graph, &targets, false)?;
//! assert_eq!(importers, vec![PackageId::from("app"), PackageId::from("lib")]);
//! # Ok::<(), importers_graph::GraphError>(())
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod explain;
pub mod graph;
pub mod package;
pub mod reachability;

pub use error::{GraphError, Result};
pub use explain::{EdgeKind, ImportChain, ImportDigraph};
pub use graph::{ImportGraph, TargetSet};
pub use package::{ImportSet, PackageId};
pub use reachability::{Reachability, compute_importers};
