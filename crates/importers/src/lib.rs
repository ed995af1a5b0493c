//! Importers - find the packages in a scope that transitively import a target.
//!
//! This crate connects the reachability engine in [`importers_graph`] to a
//! build environment. A [`PackageResolver`] expands path specs and loads
//! import metadata, the [`loader`] pulls in the import graph a query needs,
//! and a [`Query`] ties the steps together.
//!
//! # Example
//!
//! ```
//! use importers::Query;
//! use importers::resolver::MemoryResolver;
//! use importers_graph::{ImportSet, PackageId};
//!
//! let resolver = MemoryResolver::new()
//!     .with_package("app/api", ImportSet::new(["app/db".into()]))
//!     .with_package("app/db", ImportSet::new(["vendor/sql".into()]))
//!     .with_package("vendor/sql", ImportSet::default());
//!
//! let analysis = Query::new("app/...", ["vendor/sql"]).run(&resolver)?;
//! assert_eq!(
//!     analysis.importers(),
//!     [PackageId::from("app/api"), PackageId::from("app/db")]
//! );
//! # Ok::<(), importers::Error>(())
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod loader;
pub mod query;
pub mod resolver;

pub use error::{Error, ResolutionError, Result};
pub use loader::load_import_graph;
pub use query::{Analysis, Query};
pub use resolver::{GoResolver, GoToolchain, MemoryResolver, PackageResolver};
