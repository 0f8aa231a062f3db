use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::collaborators::{ContextManager, TaskExecutor};
use crate::model::{TaskDeclaration, TaskResult, TaskStatus};

/// Always succeeds immediately, echoing `task.config["message"]` (or the task
/// name) to `stdout`. Used for exercising DAG structure and concurrency
/// without the overhead of a real handler.
pub struct EchoTask;

#[async_trait]
impl TaskExecutor for EchoTask {
    async fn execute(
        &self,
        _cancel: &CancellationToken,
        task: &TaskDeclaration,
        _context: &dyn ContextManager,
    ) -> TaskResult {
        let message = task
            .config
            .get("message")
            .and_then(|v| v.as_str())
            .unwrap_or_else(|| task.display_name())
            .to_string();

        let mut result = TaskResult::running(&task.id, task.display_name(), &task.task_type);
        result.status = TaskStatus::Success;
        result.message = "ok".to_string();
        result.stdout = Some(message);
        result.return_code = 0;
        result.finish();
        result
    }
}
