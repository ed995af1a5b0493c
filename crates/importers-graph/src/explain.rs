//! Import chains explaining why a package qualifies.
//!
//! [`ImportDigraph`] loads an [`ImportGraph`] into a petgraph `DiGraph` once,
//! with every edge labelled by the kind of import it came from. Chains obey
//! the same first-hop rule as the reachability engine: test edges may only
//! leave the queried package itself.
//!
//! ## Edge Direction
//!
//! Edges point from **importer -> imported**, so a chain reads in the order
//! a build would pull packages in.

use std::collections::HashMap;
use std::fmt;

use petgraph::algo;
use petgraph::graph::{DiGraph, EdgeReference, NodeIndex};
use petgraph::visit::{EdgeFiltered, EdgeRef};

use crate::graph::{ImportGraph, TargetSet};
use crate::package::PackageId;

/// Which import list an edge was declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Ordinary compile-time import
    Import,

    /// Import from the package's own test files
    TestImport,

    /// Import from an external test package
    ExternalTestImport,
}

impl EdgeKind {
    fn arrow(self) -> &'static str {
        match self {
            Self::Import => " -> ",
            Self::TestImport => " -[test]-> ",
            Self::ExternalTestImport => " -[xtest]-> ",
        }
    }
}

/// A path of imports from a qualifying package to a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportChain {
    packages: Vec<PackageId>,
    first_hop: Option<EdgeKind>,
}

impl ImportChain {
    /// Packages from the importer to the target, both included.
    #[must_use]
    pub fn packages(&self) -> &[PackageId] {
        &self.packages
    }

    /// Kind of the first edge, or `None` when the importer is itself a target.
    #[must_use]
    pub fn first_hop(&self) -> Option<EdgeKind> {
        self.first_hop
    }

    /// Number of edges in the chain.
    #[must_use]
    pub fn hops(&self) -> usize {
        self.packages.len().saturating_sub(1)
    }
}

impl fmt::Display for ImportChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.packages.iter().enumerate() {
            if i == 1 {
                f.write_str(self.first_hop.unwrap_or(EdgeKind::Import).arrow())?;
            } else if i > 1 {
                f.write_str(EdgeKind::Import.arrow())?;
            }
            write!(f, "{id}")?;
        }
        Ok(())
    }
}

/// An import graph loaded into petgraph for path queries.
#[derive(Debug, Clone)]
pub struct ImportDigraph {
    graph: DiGraph<PackageId, EdgeKind>,
    node_map: HashMap<PackageId, NodeIndex>,
}

impl ImportDigraph {
    /// Build the digraph. Every package named anywhere in `imports` gets a node.
    #[must_use]
    pub fn new(imports: &ImportGraph) -> Self {
        let mut digraph = Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        };

        // Sorted so that node and edge order, and therefore tie-breaking
        // between equally short chains, does not depend on hash order.
        let mut entries: Vec<_> = imports.iter().collect();
        entries.sort_by_key(|(id, _)| *id);

        for (id, set) in entries {
            let from = digraph.node(id);
            let edges = set
                .imports
                .iter()
                .map(|dep| (dep, EdgeKind::Import))
                .chain(set.test_imports.iter().map(|dep| (dep, EdgeKind::TestImport)))
                .chain(
                    set.external_test_imports
                        .iter()
                        .map(|dep| (dep, EdgeKind::ExternalTestImport)),
                );
            // First kind wins, so an ordinary import is never downgraded
            // by the same package also appearing in a test list.
            for (dep, kind) in edges {
                let to = digraph.node(dep);
                if digraph.graph.find_edge(from, to).is_none() {
                    digraph.graph.add_edge(from, to, kind);
                }
            }
        }

        digraph
    }

    fn node(&mut self, id: &PackageId) -> NodeIndex {
        if let Some(&index) = self.node_map.get(id) {
            return index;
        }
        let index = self.graph.add_node(id.clone());
        self.node_map.insert(id.clone(), index);
        index
    }

    /// Number of packages in the digraph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Shortest import chain from `from` to any target.
    ///
    /// Returns `None` when `from` does not qualify. A target yields a chain
    /// of just itself.
    #[must_use]
    pub fn shortest_chain(
        &self,
        from: &PackageId,
        targets: &TargetSet,
        include_test_edges: bool,
    ) -> Option<ImportChain> {
        if targets.contains(from) {
            return Some(ImportChain {
                packages: vec![from.clone()],
                first_hop: None,
            });
        }

        let start = *self.node_map.get(from)?;
        let ordinary = EdgeFiltered::from_fn(&self.graph, |edge: EdgeReference<'_, EdgeKind>| {
            *edge.weight() == EdgeKind::Import
        });

        let mut best: Option<(usize, EdgeKind, Vec<NodeIndex>)> = None;
        for edge in self.graph.edges(start) {
            let kind = *edge.weight();
            if kind != EdgeKind::Import && !include_test_edges {
                continue;
            }
            let Some((cost, path)) = algo::astar(
                &ordinary,
                edge.target(),
                |node| targets.contains(&self.graph[node]),
                |_| 1usize,
                |_| 0,
            ) else {
                continue;
            };
            // Prefer production edges over test edges on a tie.
            let is_better = best.as_ref().is_none_or(|(best_cost, best_kind, _)| {
                cost < *best_cost
                    || (cost == *best_cost
                        && kind == EdgeKind::Import
                        && *best_kind != EdgeKind::Import)
            });
            if is_better {
                best = Some((cost, kind, path));
            }
        }

        let (_, first_hop, path) = best?;
        let packages = std::iter::once(from.clone())
            .chain(path.into_iter().map(|node| self.graph[node].clone()))
            .collect();
        Some(ImportChain {
            packages,
            first_hop: Some(first_hop),
        })
    }
}
