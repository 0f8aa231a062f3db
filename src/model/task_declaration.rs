use std::collections::{HashMap, HashSet};

use serde::Deserialize;

/// A single user-declared unit of work and its prerequisites.
///
/// Produced by the (external) configuration loader; consumed by the
/// [`crate::resolver::DependencyResolver`] and, per task, by the
/// [`crate::executor::Executor`]. Never mutated after planning begins.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskDeclaration {
    /// Unique within a workflow, non-empty.
    pub id: String,

    /// Human-readable label. May duplicate `id`.
    #[serde(default)]
    pub name: String,

    /// Key into the task-type registry.
    #[serde(rename = "type")]
    pub task_type: String,

    /// Ids this task requires to have completed before it may start.
    #[serde(default)]
    pub depends_on: HashSet<String>,

    /// Predicate expression evaluated by the context manager. Empty means
    /// "always run".
    #[serde(default)]
    pub when: String,

    /// Whether failure of this task aborts the workflow.
    #[serde(default = "default_required")]
    pub required: bool,

    /// Opaque configuration handed to the task executor untouched.
    #[serde(default)]
    pub config: HashMap<String, serde_yaml::Value>,
}

fn default_required() -> bool {
    true
}

impl TaskDeclaration {
    /// Display name: falls back to `id` when `name` was left blank.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}
