//! Import graph loading.
//!
//! The loader walks outward from the source scope, one resolver batch per
//! breadth-first level, until every package the engine could traverse has
//! an entry. The graph is complete before the engine sees it; the engine
//! never calls back into the resolver.
//!
//! ## Strictness
//!
//! | Package | Load failure |
//! |---------|--------------|
//! | In the source scope | Aborts the query |
//! | Reached transitively | Logged, left out of the graph (dead end) |
//!
//! A batch that fails as a whole aborts the query either way.

use std::collections::HashSet;

use tracing::{debug, warn};

use importers_graph::{ImportGraph, ImportSet, PackageId, TargetSet};

use crate::error::Result;
use crate::resolver::PackageResolver;

/// Load the import graph needed to answer a query over `source_scope`.
///
/// Targets are never expanded: a target qualifies on sight, so its own
/// imports are irrelevant. With `include_test_edges`, the source packages'
/// test and external-test imports are loaded too; beyond the source scope
/// only ordinary imports are followed.
///
/// # Errors
///
/// Returns an error if a source package cannot be loaded or a resolver
/// batch fails.
pub fn load_import_graph<R: PackageResolver + ?Sized>(
    resolver: &R,
    source_scope: &[PackageId],
    targets: &TargetSet,
    include_test_edges: bool,
) -> Result<ImportGraph> {
    let mut graph = ImportGraph::new();
    let mut requested: HashSet<PackageId> = HashSet::new();
    let scope: Vec<PackageId> = source_scope
        .iter()
        .filter(|id| requested.insert((*id).clone()))
        .cloned()
        .collect();

    let mut frontier = Vec::new();
    let mut enqueue =
        |imports: &ImportSet, include_tests: bool, frontier: &mut Vec<PackageId>| {
            for dep in imports.first_hop(include_tests) {
                if !targets.contains(dep) && requested.insert(dep.clone()) {
                    frontier.push(dep.clone());
                }
            }
        };

    for (id, loaded) in resolver.fetch_import_sets(&scope)? {
        let imports = loaded?;
        enqueue(&imports, include_test_edges, &mut frontier);
        graph.insert(id, imports);
    }

    let mut depth = 1usize;
    while !frontier.is_empty() {
        debug!(depth, batch = frontier.len(), "Loading transitive imports");

        let mut next = Vec::new();
        for (id, loaded) in resolver.fetch_import_sets(&frontier)? {
            match loaded {
                Ok(imports) => {
                    enqueue(&imports, false, &mut next);
                    graph.insert(id, imports);
                }
                Err(e) => {
                    warn!(
                        package = %id,
                        error = %e,
                        "Could not load transitive import, treating as dead end"
                    );
                }
            }
        }

        frontier = next;
        depth += 1;
    }

    debug!(
        scope = scope.len(),
        packages = graph.len(),
        depth,
        "Import graph loaded"
    );

    Ok(graph)
}
