use std::collections::HashSet;

use crate::model::TaskDeclaration;

/// Resolver-owned planning node: the declaration plus the bookkeeping needed
/// to compute execution layers.
///
/// Edges are stored as id-references into the resolver's node map rather than
/// pointers, so the structure stays a plain value even while it temporarily
/// describes cycles during validation.
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub declaration: TaskDeclaration,

    /// Ids this node waits on. Copy of `declaration.depends_on`.
    pub dependencies: HashSet<String>,

    /// Ids that wait on this node. Computed as the reverse of `dependencies`
    /// across the whole graph.
    pub dependents: HashSet<String>,

    /// Count of unsatisfied dependencies remaining during layering. Mutated
    /// only by the resolver's own planning pass, never after.
    pub in_degree: usize,

    /// Non-negative layer index assigned once planning completes.
    pub layer: Option<usize>,
}

impl GraphNode {
    pub fn new(declaration: TaskDeclaration) -> Self {
        let dependencies = declaration.depends_on.clone();
        let in_degree = dependencies.len();
        GraphNode {
            declaration,
            dependencies,
            dependents: HashSet::new(),
            in_degree,
            layer: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.declaration.id
    }
}
