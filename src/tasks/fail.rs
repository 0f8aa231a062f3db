use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::collaborators::{ContextManager, TaskExecutor};
use crate::model::{TaskDeclaration, TaskResult, TaskStatus};

/// Always fails with a simulated error. Used to validate required/optional
/// failure propagation and the executor's abort-on-required-failure policy.
pub struct FailTask;

#[async_trait]
impl TaskExecutor for FailTask {
    async fn execute(
        &self,
        _cancel: &CancellationToken,
        task: &TaskDeclaration,
        _context: &dyn ContextManager,
    ) -> TaskResult {
        let mut result = TaskResult::running(&task.id, task.display_name(), &task.task_type);
        result.status = TaskStatus::Failed;
        result.message = "simulated task failure".to_string();
        result.return_code = 1;
        result.finish();
        result
    }
}
