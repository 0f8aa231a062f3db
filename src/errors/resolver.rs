use thiserror::Error;

/// Structural error taxonomy surfaced by [`crate::resolver::DependencyResolver`].
///
/// Each variant carries the offending task id and a detail string, per the
/// error taxonomy's uniform shape.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {detail} (task '{task_id}')")]
pub struct DependencyError {
    pub task_id: String,
    pub kind: DependencyErrorKind,
    pub detail: String,
}

impl DependencyError {
    pub fn duplicate(task_id: impl Into<String>) -> Self {
        let task_id = task_id.into();
        DependencyError {
            detail: format!("duplicate task id '{task_id}'"),
            task_id,
            kind: DependencyErrorKind::DuplicateTaskId,
        }
    }

    pub fn missing_dependency(task_id: impl Into<String>, missing: impl Into<String>) -> Self {
        let task_id = task_id.into();
        let missing = missing.into();
        DependencyError {
            detail: format!("depends on undeclared task '{missing}'"),
            task_id,
            kind: DependencyErrorKind::MissingDependency,
        }
    }

    pub fn circular(task_id: impl Into<String>) -> Self {
        let task_id = task_id.into();
        DependencyError {
            detail: "participates in a circular dependency".to_string(),
            task_id,
            kind: DependencyErrorKind::CircularDependency,
        }
    }

    /// `tasks_in_layer` was asked for an index beyond the planned layer count.
    /// Not a structural defect in the graph itself, so it gets its own kind
    /// rather than overloading `MissingDependency`.
    pub fn layer_out_of_range(index: usize, total_layers: usize) -> Self {
        DependencyError {
            task_id: String::new(),
            detail: format!("layer index {index} out of range ({total_layers} layers)"),
            kind: DependencyErrorKind::LayerOutOfRange,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DependencyErrorKind {
    #[error("duplicate task id")]
    DuplicateTaskId,
    #[error("missing dependency")]
    MissingDependency,
    #[error("circular dependency")]
    CircularDependency,
    #[error("layer index out of range")]
    LayerOutOfRange,
}
