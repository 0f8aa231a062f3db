// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Builds a validated DAG from task declarations and partitions it into
//! Kahn-style execution layers.

use std::collections::{HashMap, VecDeque};

use crate::errors::DependencyError;
use crate::model::{ExecutionLayer, GraphNode, TaskDeclaration};

/// Summary statistics over a planned graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverStats {
    pub total_tasks: usize,
    pub total_edges: usize,
    pub layers: usize,
    pub max_parallelism: usize,
}

/// Stateful planner: `build_graph` validates and indexes the declarations,
/// `execution_layers` computes (and caches) the layered plan.
///
/// Nodes live in a single `HashMap<String, GraphNode>` keyed by task id —
/// edges are id-references into that map, never pointers, so the structure
/// stays a plain value even while intermediate states can describe cycles.
#[derive(Debug, Default)]
pub struct DependencyResolver {
    nodes: HashMap<String, GraphNode>,
    declaration_order: Vec<String>,
    layers: Option<Vec<ExecutionLayer>>,
}

impl DependencyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates uniqueness and referential integrity, builds forward and
    /// reverse adjacency and initial in-degrees, and detects cycles.
    pub fn build_graph(&mut self, tasks: Vec<TaskDeclaration>) -> Result<(), DependencyError> {
        self.clear();

        let mut order = Vec::with_capacity(tasks.len());
        for task in tasks {
            let id = task.id.clone();
            if self.nodes.contains_key(&id) {
                return Err(DependencyError::duplicate(id));
            }
            order.push(id.clone());
            self.nodes.insert(id, GraphNode::new(task));
        }

        for id in &order {
            let deps: Vec<String> = self.nodes[id].dependencies.iter().cloned().collect();
            for dep in deps {
                if !self.nodes.contains_key(&dep) {
                    return Err(DependencyError::missing_dependency(id.clone(), dep));
                }
            }
        }

        // reverse adjacency: for every a -> b edge, b gets a in its dependents.
        let reverse_edges: Vec<(String, String)> = order
            .iter()
            .flat_map(|id| {
                self.nodes[id]
                    .dependencies
                    .iter()
                    .cloned()
                    .map(move |dep| (dep, id.clone()))
            })
            .collect();
        for (dep, dependent) in reverse_edges {
            self.nodes.get_mut(&dep).unwrap().dependents.insert(dependent);
        }

        self.declaration_order = order;

        if let Some(cycle_task) = self.detect_cycle() {
            return Err(DependencyError::circular(cycle_task));
        }

        Ok(())
    }

    /// Returns the first node (by declaration order) still unresolved after a
    /// simulated Kahn pass — a witness that the graph contains a cycle.
    fn detect_cycle(&self) -> Option<String> {
        let mut in_degree: HashMap<&str, usize> = self
            .nodes
            .iter()
            .map(|(id, n)| (id.as_str(), n.in_degree))
            .collect();

        let mut frontier: VecDeque<&str> = self
            .declaration_order
            .iter()
            .map(String::as_str)
            .filter(|id| in_degree[id] == 0)
            .collect();

        let mut resolved = 0usize;
        while let Some(id) = frontier.pop_front() {
            resolved += 1;
            let mut newly_zero: Vec<&str> = Vec::new();
            for dependent in &self.nodes[id].dependents {
                let entry = in_degree.get_mut(dependent.as_str()).unwrap();
                *entry -= 1;
                if *entry == 0 {
                    newly_zero.push(dependent.as_str());
                }
            }
            // preserve declaration order among newly-freed nodes
            newly_zero.sort_by_key(|id| {
                self.declaration_order.iter().position(|d| d == id).unwrap()
            });
            frontier.extend(newly_zero);
        }

        if resolved == self.nodes.len() {
            None
        } else {
            self.declaration_order
                .iter()
                .find(|id| in_degree[id.as_str()] > 0)
                .cloned()
        }
    }

    /// Computes (and caches) the layered plan. Must be called after a
    /// successful `build_graph`; idempotent thereafter.
    pub fn execution_layers(&mut self) -> Result<&[ExecutionLayer], DependencyError> {
        if self.layers.is_none() {
            self.layers = Some(self.compute_layers()?);
        }
        Ok(self.layers.as_deref().unwrap())
    }

    fn compute_layers(&mut self) -> Result<Vec<ExecutionLayer>, DependencyError> {
        let mut in_degree: HashMap<&str, usize> = self
            .nodes
            .iter()
            .map(|(id, n)| (id.as_str(), n.in_degree))
            .collect();

        let mut frontier: Vec<&str> = self
            .declaration_order
            .iter()
            .map(String::as_str)
            .filter(|id| in_degree[id] == 0)
            .collect();

        let mut layers = Vec::new();
        let mut index = 0usize;
        let mut resolved = 0usize;

        while !frontier.is_empty() {
            let mut nodes = Vec::with_capacity(frontier.len());
            let mut next_frontier: Vec<&str> = Vec::new();

            for id in &frontier {
                self.nodes.get_mut(*id).unwrap().layer = Some(index);
                nodes.push(self.nodes[*id].clone());
                resolved += 1;

                for dependent in &self.nodes[*id].dependents {
                    let entry = in_degree.get_mut(dependent.as_str()).unwrap();
                    *entry -= 1;
                    if *entry == 0 {
                        next_frontier.push(dependent.as_str());
                    }
                }
            }

            next_frontier.sort_by_key(|id| {
                self.declaration_order.iter().position(|d| d == id).unwrap()
            });

            layers.push(ExecutionLayer::new(index, nodes));
            frontier = next_frontier;
            index += 1;
        }

        if resolved != self.nodes.len() {
            let cycle_task = self
                .declaration_order
                .iter()
                .find(|id| in_degree[id.as_str()] > 0)
                .cloned()
                .unwrap();
            return Err(DependencyError::circular(cycle_task));
        }

        Ok(layers)
    }

    /// Flattened topological order: layer-major, declaration order within a
    /// layer.
    pub fn task_order(&mut self) -> Result<Vec<String>, DependencyError> {
        Ok(self
            .execution_layers()?
            .iter()
            .flat_map(|layer| layer.tasks.iter().map(|n| n.id().to_string()))
            .collect())
    }

    pub fn dependencies_of(&self, id: &str) -> Option<&std::collections::HashSet<String>> {
        self.nodes.get(id).map(|n| &n.dependencies)
    }

    pub fn dependents_of(&self, id: &str) -> Option<&std::collections::HashSet<String>> {
        self.nodes.get(id).map(|n| &n.dependents)
    }

    pub fn tasks_in_layer(&mut self, i: usize) -> Result<&ExecutionLayer, DependencyError> {
        let layers = self.execution_layers()?;
        let total = layers.len();
        layers.get(i).ok_or_else(|| DependencyError::layer_out_of_range(i, total))
    }

    pub fn stats(&mut self) -> Result<ResolverStats, DependencyError> {
        let total_edges = self.nodes.values().map(|n| n.dependencies.len()).sum();
        let total_tasks = self.nodes.len();
        let layers = self.execution_layers()?;
        let max_parallelism = layers.iter().map(ExecutionLayer::len).max().unwrap_or(0);
        Ok(ResolverStats {
            total_tasks,
            total_edges,
            layers: layers.len(),
            max_parallelism,
        })
    }

    /// Re-checks post-planning invariants: every node has a layer assigned
    /// and no dangling edges remain.
    pub fn validate(&mut self) -> Result<(), DependencyError> {
        self.execution_layers()?;
        for node in self.nodes.values() {
            if node.layer.is_none() {
                return Err(DependencyError::circular(node.id().to_string()));
            }
            for dep in &node.dependencies {
                if !self.nodes.contains_key(dep) {
                    return Err(DependencyError::missing_dependency(node.id().to_string(), dep.clone()));
                }
            }
        }
        Ok(())
    }

    /// Discards all state. `clear()` then `build_graph(same_tasks)` must
    /// yield an equal plan.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.declaration_order.clear();
        self.layers = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(id: &str, deps: &[&str]) -> TaskDeclaration {
        TaskDeclaration {
            id: id.to_string(),
            name: id.to_string(),
            task_type: "noop".to_string(),
            depends_on: deps.iter().map(|s| s.to_string()).collect(),
            when: String::new(),
            required: true,
            config: Default::default(),
        }
    }

    fn layer_ids(layer: &ExecutionLayer) -> Vec<String> {
        layer.tasks.iter().map(|n| n.id().to_string()).collect()
    }

    #[test]
    fn linear_chain() {
        let mut r = DependencyResolver::new();
        r.build_graph(vec![decl("A", &[]), decl("B", &["A"]), decl("C", &["B"])])
            .unwrap();
        let layers = r.execution_layers().unwrap().to_vec();
        assert_eq!(layers.len(), 3);
        assert_eq!(layer_ids(&layers[0]), vec!["A"]);
        assert_eq!(layer_ids(&layers[1]), vec!["B"]);
        assert_eq!(layer_ids(&layers[2]), vec!["C"]);
        assert_eq!(r.task_order().unwrap(), vec!["A", "B", "C"]);
    }

    #[test]
    fn fan_out_fan_in() {
        let mut r = DependencyResolver::new();
        r.build_graph(vec![
            decl("init", &[]),
            decl("build1", &["init"]),
            decl("build2", &["init"]),
            decl("test1", &["build1"]),
            decl("test2", &["build2"]),
            decl("integrate", &["test1", "test2"]),
            decl("deploy", &["integrate"]),
        ])
        .unwrap();

        let stats = r.stats().unwrap();
        assert_eq!(stats.layers, 5);
        assert_eq!(stats.max_parallelism, 2);
        assert_eq!(stats.total_edges, 7);
        assert_eq!(stats.total_tasks, 7);

        let layers = r.execution_layers().unwrap().to_vec();
        assert_eq!(layer_ids(&layers[0]), vec!["init"]);
        assert_eq!(layer_ids(&layers[1]), vec!["build1", "build2"]);
        assert_eq!(layer_ids(&layers[2]), vec!["test1", "test2"]);
        assert_eq!(layer_ids(&layers[3]), vec!["integrate"]);
        assert_eq!(layer_ids(&layers[4]), vec!["deploy"]);
    }

    #[test]
    fn cycle_is_detected() {
        let mut r = DependencyResolver::new();
        let err = r.build_graph(vec![decl("A", &["B"]), decl("B", &["A"])]).unwrap_err();
        assert_eq!(err.kind, crate::errors::DependencyErrorKind::CircularDependency);
        assert!(err.task_id == "A" || err.task_id == "B");
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let mut r = DependencyResolver::new();
        let err = r.build_graph(vec![decl("A", &["A"])]).unwrap_err();
        assert_eq!(err.kind, crate::errors::DependencyErrorKind::CircularDependency);
        assert_eq!(err.task_id, "A");
    }

    #[test]
    fn missing_dependency_is_reported() {
        let mut r = DependencyResolver::new();
        let err = r.build_graph(vec![decl("A", &["ghost"])]).unwrap_err();
        assert_eq!(err.kind, crate::errors::DependencyErrorKind::MissingDependency);
        assert_eq!(err.task_id, "A");
    }

    #[test]
    fn duplicate_id_is_reported() {
        let mut r = DependencyResolver::new();
        let err = r.build_graph(vec![decl("A", &[]), decl("A", &[])]).unwrap_err();
        assert_eq!(err.kind, crate::errors::DependencyErrorKind::DuplicateTaskId);
    }

    #[test]
    fn empty_task_list_yields_zero_layers() {
        let mut r = DependencyResolver::new();
        r.build_graph(vec![]).unwrap();
        assert!(r.execution_layers().unwrap().is_empty());
    }

    #[test]
    fn single_task_yields_one_layer_of_one() {
        let mut r = DependencyResolver::new();
        r.build_graph(vec![decl("A", &[])]).unwrap();
        let layers = r.execution_layers().unwrap();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].len(), 1);
    }

    #[test]
    fn tasks_in_layer_out_of_range_is_an_error() {
        let mut r = DependencyResolver::new();
        r.build_graph(vec![decl("A", &[])]).unwrap();
        let err = r.tasks_in_layer(5).unwrap_err();
        assert_eq!(err.kind, crate::errors::DependencyErrorKind::LayerOutOfRange);
    }

    #[test]
    fn validate_succeeds_on_a_valid_graph_with_every_layer_assigned() {
        let mut r = DependencyResolver::new();
        r.build_graph(vec![decl("A", &[]), decl("B", &["A"])]).unwrap();
        r.validate().unwrap();
    }

    #[test]
    fn validate_succeeds_on_a_single_independent_task() {
        let mut r = DependencyResolver::new();
        r.build_graph(vec![decl("A", &[])]).unwrap();
        r.validate().unwrap();
        assert_eq!(r.nodes["A"].layer, Some(0));
    }

    #[test]
    fn execution_layers_is_idempotent() {
        let mut r = DependencyResolver::new();
        r.build_graph(vec![decl("A", &[]), decl("B", &["A"])]).unwrap();
        let first = r.execution_layers().unwrap().to_vec();
        let second = r.execution_layers().unwrap().to_vec();
        assert_eq!(layer_ids(&first[0]), layer_ids(&second[0]));
        assert_eq!(layer_ids(&first[1]), layer_ids(&second[1]));
    }

    #[test]
    fn clear_then_rebuild_round_trips() {
        let tasks = vec![decl("A", &[]), decl("B", &["A"])];
        let mut r = DependencyResolver::new();
        r.build_graph(tasks.clone()).unwrap();
        let before = r.execution_layers().unwrap().to_vec();

        r.clear();
        r.build_graph(tasks).unwrap();
        let after = r.execution_layers().unwrap().to_vec();

        assert_eq!(layer_ids(&before[0]), layer_ids(&after[0]));
        assert_eq!(layer_ids(&before[1]), layer_ids(&after[1]));
    }

    #[test]
    fn declaration_order_tie_break() {
        let mut r = DependencyResolver::new();
        r.build_graph(vec![decl("z", &[]), decl("a", &[]), decl("m", &[])])
            .unwrap();
        let layers = r.execution_layers().unwrap();
        assert_eq!(layer_ids(&layers[0]), vec!["z", "a", "m"]);
    }
}
