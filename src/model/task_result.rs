use std::time::{Duration, SystemTime};

use serde::Serialize;

/// Closed set of terminal (and pre-terminal) states a task can occupy.
///
/// `pending -> running -> (success | failed | skipped)`. `skipped` may be
/// entered directly from `running`, without the handler ever being called,
/// via condition evaluation, dry-run, or an evaluation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Running,
    Success,
    Failed,
    Skipped,
}

/// Outcome of a single dispatched (or skipped) task.
///
/// Created by the executor when a task is dispatched, mutated only by the
/// task's owning future until a terminal status is assigned, then published
/// to the shared result map under the workflow lock and never mutated again.
#[derive(Debug, Clone, Serialize)]
pub struct TaskResult {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub task_type: String,
    pub status: TaskStatus,
    pub message: String,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub return_code: i32,
    pub start_time: SystemTime,
    pub end_time: SystemTime,
    pub duration: Duration,
}

impl TaskResult {
    pub fn running(id: impl Into<String>, name: impl Into<String>, task_type: impl Into<String>) -> Self {
        let now = SystemTime::now();
        TaskResult {
            id: id.into(),
            name: name.into(),
            task_type: task_type.into(),
            status: TaskStatus::Running,
            message: String::new(),
            stdout: None,
            stderr: None,
            return_code: 0,
            start_time: now,
            end_time: now,
            duration: Duration::ZERO,
        }
    }

    /// Finalizes timing fields; never panics on clock skew.
    pub fn finish(&mut self) {
        self.end_time = SystemTime::now();
        self.duration = self
            .end_time
            .duration_since(self.start_time)
            .unwrap_or(Duration::ZERO);
    }

    pub fn mark_skipped(&mut self, message: impl Into<String>) {
        self.status = TaskStatus::Skipped;
        self.message = message.into();
        self.finish();
    }
}
