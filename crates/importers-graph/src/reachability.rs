//! Transitive importer computation.
//!
//! A package qualifies when it is a target, or when a chain of import edges
//! leads from it to a target. Every edge of the chain is an ordinary import,
//! except that the first hop may also be a test or external-test import when
//! test edges are enabled.
//!
//! ## Algorithm
//!
//! Depth-first search along ordinary imports, short-circuiting on the first
//! target found. Each package's answer is memoized, so shared low-level
//! packages are resolved once per engine no matter how many importers reach
//! them. Test edges are consulted only at the query root and never enter the
//! memoized recursion.
//!
//! Each memo entry moves from unvisited to in-progress to resolved. Hitting
//! an in-progress entry means the graph has an import cycle, which is
//! reported instead of recursing forever.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::error::{GraphError, Result};
use crate::graph::{ImportGraph, TargetSet};
use crate::package::PackageId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Resolved(bool),
}

/// Memoized importer queries over one import graph and target set.
///
/// The memo lives as long as the engine, so repeated queries against the
/// same graph reuse earlier answers. Not meant to be shared across threads;
/// build the graph completely before creating the engine.
#[derive(Debug)]
pub struct Reachability<'a> {
    graph: &'a ImportGraph,
    targets: &'a TargetSet,
    memo: HashMap<&'a PackageId, Visit>,
    /// Packages currently being resolved, outermost first.
    stack: Vec<&'a PackageId>,
}

impl<'a> Reachability<'a> {
    /// Create an engine with an empty memo.
    #[must_use]
    pub fn new(graph: &'a ImportGraph, targets: &'a TargetSet) -> Self {
        Self {
            graph,
            targets,
            memo: HashMap::new(),
            stack: Vec::new(),
        }
    }

    /// Returns `true` if `id` is a target or reaches one through ordinary
    /// imports only.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ImportCycle`] if the traversal runs into an
    /// import cycle.
    pub fn reaches_target(&mut self, id: &'a PackageId) -> Result<bool> {
        match self.memo.get(id) {
            Some(Visit::Resolved(found)) => return Ok(*found),
            Some(Visit::InProgress) => return Err(self.cycle_through(id)),
            None => {}
        }

        if self.targets.contains(id) {
            self.memo.insert(id, Visit::Resolved(true));
            return Ok(true);
        }

        let graph = self.graph;
        let Some(imports) = graph.get(id) else {
            trace!(package = %id, "No import metadata, treating as dead end");
            self.memo.insert(id, Visit::Resolved(false));
            return Ok(false);
        };

        self.memo.insert(id, Visit::InProgress);
        self.stack.push(id);

        let mut outcome = Ok(false);
        for dep in imports.imports() {
            match self.reaches_target(dep) {
                Ok(false) => {}
                other => {
                    outcome = other;
                    break;
                }
            }
        }

        self.stack.pop();
        match outcome {
            Ok(found) => {
                self.memo.insert(id, Visit::Resolved(found));
                Ok(found)
            }
            Err(e) => {
                self.memo.remove(id);
                Err(e)
            }
        }
    }

    /// Returns `true` if `id` qualifies as an importer of a target.
    ///
    /// With `include_test_edges`, the package's own test and external-test
    /// imports also count as the first hop of a chain. Edges past the first
    /// hop are always ordinary imports.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ImportCycle`] if the traversal runs into an
    /// import cycle.
    pub fn qualifies(&mut self, id: &'a PackageId, include_test_edges: bool) -> Result<bool> {
        if self.reaches_target(id)? {
            return Ok(true);
        }
        if !include_test_edges {
            return Ok(false);
        }

        let graph = self.graph;
        let Some(imports) = graph.get(id) else {
            return Ok(false);
        };
        for dep in imports
            .test_imports
            .iter()
            .chain(&imports.external_test_imports)
        {
            if self.reaches_target(dep)? {
                trace!(package = %id, via = %dep, "Qualifies through test import");
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Number of packages whose answer is memoized.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.memo
            .values()
            .filter(|v| matches!(v, Visit::Resolved(_)))
            .count()
    }

    fn cycle_through(&self, id: &PackageId) -> GraphError {
        let start = self.stack.iter().position(|p| *p == id).unwrap_or(0);
        let mut cycle: Vec<PackageId> = self.stack[start..].iter().map(|p| (*p).clone()).collect();
        cycle.push(id.clone());
        GraphError::ImportCycle { cycle }
    }
}

/// Compute the packages in `source_scope` that transitively import a target.
///
/// The result is deduplicated and sorted by package ID. A package with no
/// entry in `graph` is a dead end, not an error.
///
/// # Errors
///
/// Returns [`GraphError::ImportCycle`] if the traversal runs into an import
/// cycle.
pub fn compute_importers(
    source_scope: &[PackageId],
    graph: &ImportGraph,
    targets: &TargetSet,
    include_test_edges: bool,
) -> Result<Vec<PackageId>> {
    let mut engine = Reachability::new(graph, targets);
    let mut seen = HashSet::new();
    let mut importers = Vec::new();

    for id in source_scope {
        if !seen.insert(id) {
            continue;
        }
        if engine.qualifies(id, include_test_edges)? {
            importers.push(id.clone());
        }
    }
    importers.sort();

    debug!(
        scope = seen.len(),
        targets = targets.len(),
        importers = importers.len(),
        resolved = engine.resolved_count(),
        include_test_edges,
        "Computed importers"
    );

    Ok(importers)
}
