//! Whole-catalog dependency graph using petgraph.
//!
//! The resolver only ever sees the part of the catalog reachable from the
//! requested roots and stops at the first problem. This graph covers every
//! registered task so that all missing dependencies and cycles can be
//! reported in one pass.

use crate::TaskCatalog;
use petgraph::algo::{is_cyclic_directed, tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use tracing::debug;

/// A node in the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    /// Name of the task.
    pub name: String,
    /// Position of the task in catalog registration order.
    pub position: usize,
}

/// Directed graph over a catalog, with edges from dependency to dependent.
///
/// Assume-provided names are not nodes. Dependencies that are neither
/// registered nor assumed provided are kept aside as missing edges.
pub struct DependencyGraph {
    graph: DiGraph<GraphNode, ()>,
    name_to_node: HashMap<String, NodeIndex>,
    missing: Vec<(String, String)>,
}

impl DependencyGraph {
    /// Build the graph for every task in `catalog`.
    #[must_use]
    pub fn from_catalog(catalog: &TaskCatalog) -> Self {
        let mut graph = DiGraph::with_capacity(catalog.len(), catalog.len());
        let mut name_to_node = HashMap::with_capacity(catalog.len());

        for (position, task) in catalog.iter().enumerate() {
            if catalog.is_assumed_provided(task.name()) {
                continue;
            }
            let index = graph.add_node(GraphNode {
                name: task.name().to_string(),
                position,
            });
            name_to_node.insert(task.name().to_string(), index);
        }

        let mut missing = Vec::new();
        for task in catalog {
            let Some(&to) = name_to_node.get(task.name()) else {
                continue;
            };
            for dep in task.dependencies() {
                if catalog.is_assumed_provided(dep) {
                    continue;
                }
                if let Some(&from) = name_to_node.get(dep) {
                    graph.add_edge(from, to, ());
                } else {
                    missing.push((task.name().to_string(), dep.clone()));
                }
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            missing = missing.len(),
            "Built dependency graph"
        );

        Self {
            graph,
            name_to_node,
            missing,
        }
    }

    /// Number of tasks in the graph.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of dependency edges between known tasks.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Check if a task is a node of the graph.
    #[must_use]
    pub fn contains_task(&self, name: &str) -> bool {
        self.name_to_node.contains_key(name)
    }

    /// Dependencies that point at nothing, as (task, dependency) pairs.
    #[must_use]
    pub fn missing_dependencies(&self) -> &[(String, String)] {
        &self.missing
    }

    /// Check if the graph has cycles.
    #[must_use]
    pub fn has_cycles(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Every cycle in the graph, one entry per strongly connected component.
    ///
    /// Members of each cycle are listed in catalog registration order, and
    /// cycles are ordered by their first member.
    #[must_use]
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut cycles: Vec<Vec<&GraphNode>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| match component.as_slice() {
                [single] => self.graph.contains_edge(*single, *single),
                _ => true,
            })
            .map(|component| component.into_iter().map(|idx| &self.graph[idx]).collect())
            .collect();

        for cycle in &mut cycles {
            cycle.sort_by_key(|node| node.position);
        }
        cycles.sort_by_key(|cycle| cycle.first().map_or(usize::MAX, |node| node.position));

        cycles
            .into_iter()
            .map(|cycle| cycle.into_iter().map(|node| node.name.clone()).collect())
            .collect()
    }

    /// Names of the direct dependents of a task.
    #[must_use]
    pub fn dependents(&self, name: &str) -> Vec<&str> {
        let Some(&index) = self.name_to_node.get(name) else {
            return Vec::new();
        };
        let mut dependents: Vec<&GraphNode> = self
            .graph
            .neighbors_directed(index, petgraph::Direction::Outgoing)
            .map(|idx| &self.graph[idx])
            .collect();
        dependents.sort_by_key(|node| node.position);
        dependents.dedup_by_key(|node| node.position);
        dependents.into_iter().map(|node| node.name.as_str()).collect()
    }

    /// Any topological order of the graph, or `None` if it has a cycle.
    ///
    /// Unlike [`resolve`](crate::resolve) the order is whatever petgraph
    /// produces; it is used to cross-check resolver output.
    #[must_use]
    pub fn topological_order(&self) -> Option<Vec<&str>> {
        toposort(&self.graph, None).ok().map(|sorted| {
            sorted
                .into_iter()
                .map(|idx| self.graph[idx].name.as_str())
                .collect()
        })
    }
}
