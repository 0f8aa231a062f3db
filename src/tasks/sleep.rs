use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::collaborators::{ContextManager, TaskExecutor};
use crate::model::{TaskDeclaration, TaskResult, TaskStatus};

/// Sleeps for `task.config["millis"]` (default 0), honoring cancellation.
/// Used to exercise the semaphore's blocking behavior and cancellation while
/// a handler is in flight.
pub struct SleepTask;

#[async_trait]
impl TaskExecutor for SleepTask {
    async fn execute(
        &self,
        cancel: &CancellationToken,
        task: &TaskDeclaration,
        _context: &dyn ContextManager,
    ) -> TaskResult {
        let millis = task
            .config
            .get("millis")
            .and_then(|v| v.as_u64())
            .unwrap_or(0);

        let mut result = TaskResult::running(&task.id, task.display_name(), &task.task_type);

        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(millis)) => {
                result.status = TaskStatus::Success;
                result.message = "ok".to_string();
                result.return_code = 0;
            }
            _ = cancel.cancelled() => {
                result.status = TaskStatus::Failed;
                result.message = "cancelled while sleeping".to_string();
                result.return_code = 1;
            }
        }

        result.finish();
        result
    }
}
