use thiserror::Error;

use crate::errors::DependencyError;

/// Operational error taxonomy surfaced by [`crate::executor::Executor`].
///
/// Unlike [`DependencyError`], these are raised only for pre-dispatch
/// failures and cancellation — a task handler's own failure becomes a
/// terminal `TaskResult`, never one of these variants.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// No handler registered for a task's declared type.
    #[error("no executor registered for task type '{task_type}' (task '{task_id}')")]
    NoExecutorForType { task_id: String, task_type: String },

    /// A required task finished with status `failed`.
    #[error("required task '{task_id}' failed: {message}")]
    RequiredTaskFailed { task_id: String, message: String },

    /// The cancellation signal fired before or during execution.
    #[error("workflow cancelled")]
    Cancelled,

    /// The resolver could not produce a valid layered plan.
    #[error(transparent)]
    Dependency(#[from] DependencyError),
}
