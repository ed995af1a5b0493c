//! End-to-end importer queries.
//!
//! A [`Query`] names its packages by path spec; running it against a
//! [`PackageResolver`] expands the specs, loads the import graph and computes
//! the importers. The result is an [`Analysis`], which can also explain why
//! each importer qualifies.

use tracing::{info, warn};

use importers_graph::{
    ImportChain, ImportDigraph, ImportGraph, PackageId, TargetSet, compute_importers,
};

use crate::error::Result;
use crate::loader::load_import_graph;
use crate::resolver::PackageResolver;

/// Which packages to analyze and what to look for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Path spec of the packages to analyze.
    pub source: String,
    /// Path specs of the target packages; their expansions are unioned.
    pub targets: Vec<String>,
    /// Follow source packages' test and external-test imports on the first hop.
    pub include_test_edges: bool,
}

impl Query {
    /// Create a query without test edges.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        targets: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            source: source.into(),
            targets: targets.into_iter().map(Into::into).collect(),
            include_test_edges: false,
        }
    }

    /// Set whether test edges count on the first hop.
    #[must_use]
    pub fn with_test_edges(mut self, include_test_edges: bool) -> Self {
        self.include_test_edges = include_test_edges;
        self
    }

    /// Run the query.
    ///
    /// The source spec is expanded first, then each target spec. The first
    /// failure ends the query.
    ///
    /// # Errors
    ///
    /// Returns an error if a spec cannot be expanded, a source package cannot
    /// be loaded, or the import graph contains a cycle.
    pub fn run<R: PackageResolver + ?Sized>(&self, resolver: &R) -> Result<Analysis> {
        let scope = resolver.resolve_packages(&self.source)?;

        let mut targets = TargetSet::new();
        for spec in &self.targets {
            targets.extend(resolver.resolve_packages(spec)?);
        }
        if targets.is_empty() {
            warn!(specs = ?self.targets, "Target specs matched no packages");
        }

        let graph = load_import_graph(resolver, &scope, &targets, self.include_test_edges)?;
        let importers = compute_importers(&scope, &graph, &targets, self.include_test_edges)?;

        info!(
            source = %self.source,
            scope = scope.len(),
            targets = targets.len(),
            importers = importers.len(),
            "Query complete"
        );

        Ok(Analysis {
            importers,
            graph,
            targets,
            include_test_edges: self.include_test_edges,
        })
    }
}

/// The outcome of a [`Query`].
#[derive(Debug, Clone)]
pub struct Analysis {
    importers: Vec<PackageId>,
    graph: ImportGraph,
    targets: TargetSet,
    include_test_edges: bool,
}

impl Analysis {
    /// Source packages that transitively import a target, sorted.
    #[must_use]
    pub fn importers(&self) -> &[PackageId] {
        &self.importers
    }

    /// The import graph the answer was computed from.
    #[must_use]
    pub fn graph(&self) -> &ImportGraph {
        &self.graph
    }

    /// The expanded target set.
    #[must_use]
    pub fn targets(&self) -> &TargetSet {
        &self.targets
    }

    /// The shortest import chain behind each importer, in importer order.
    #[must_use]
    pub fn explain(&self) -> Vec<ImportChain> {
        let digraph = ImportDigraph::new(&self.graph);
        self.importers
            .iter()
            .filter_map(|id| digraph.shortest_chain(id, &self.targets, self.include_test_edges))
            .collect()
    }

    /// Consume the analysis, keeping only the importers.
    #[must_use]
    pub fn into_importers(self) -> Vec<PackageId> {
        self.importers
    }
}
