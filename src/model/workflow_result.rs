use std::collections::HashMap;
use std::time::{Duration, SystemTime};

use serde::Serialize;

use crate::model::{TaskResult, TaskStatus};

/// Closed set of states a workflow run can occupy.
///
/// Computed once at the end of execution, in priority order `failed` >
/// `partial_success` > `success`; there is no intermediate publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Running,
    Success,
    PartialSuccess,
    Failed,
}

/// Final (or in-flight) outcome of a workflow run: per-task results plus
/// aggregate timing and status.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowResult {
    pub name: String,
    pub start_time: SystemTime,
    pub end_time: SystemTime,
    pub duration: Duration,
    pub status: WorkflowStatus,
    pub tasks: HashMap<String, TaskResult>,
}

impl WorkflowResult {
    pub fn started(name: impl Into<String>) -> Self {
        let now = SystemTime::now();
        WorkflowResult {
            name: name.into(),
            start_time: now,
            end_time: now,
            duration: Duration::ZERO,
            status: WorkflowStatus::Running,
            tasks: HashMap::new(),
        }
    }

    /// Applies the §3 invariant: `failed` if any task failed, else
    /// `partial_success` if any was skipped, else `success`. This exact
    /// priority order is deliberate (see the resolved Open Question in
    /// DESIGN.md) and must not be reordered.
    pub fn finalize(&mut self) {
        self.end_time = SystemTime::now();
        self.duration = self
            .end_time
            .duration_since(self.start_time)
            .unwrap_or(Duration::ZERO);

        let any_failed = self.tasks.values().any(|t| t.status == TaskStatus::Failed);
        let any_skipped = self.tasks.values().any(|t| t.status == TaskStatus::Skipped);

        self.status = if any_failed {
            WorkflowStatus::Failed
        } else if any_skipped {
            WorkflowStatus::PartialSuccess
        } else {
            WorkflowStatus::Success
        };
    }
}
