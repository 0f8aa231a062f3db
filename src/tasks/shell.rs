use async_trait::async_trait;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use crate::collaborators::{ContextManager, TaskExecutor};
use crate::model::{TaskDeclaration, TaskResult, TaskStatus};

/// Runs `task.config["command"]` via the shell and captures its output. The
/// one place this crate touches the OS directly; every other reference task
/// is pure in-process simulation.
pub struct ShellTask;

#[async_trait]
impl TaskExecutor for ShellTask {
    async fn execute(
        &self,
        _cancel: &CancellationToken,
        task: &TaskDeclaration,
        _context: &dyn ContextManager,
    ) -> TaskResult {
        let mut result = TaskResult::running(&task.id, task.display_name(), &task.task_type);

        let command = match task.config.get("command").and_then(|v| v.as_str()) {
            Some(cmd) => cmd.to_string(),
            None => {
                result.status = TaskStatus::Failed;
                result.message = "shell task requires a 'command' entry in config".to_string();
                result.return_code = -1;
                result.finish();
                return result;
            }
        };

        match Command::new("sh").arg("-c").arg(&command).output().await {
            Ok(output) => {
                result.stdout = Some(String::from_utf8_lossy(&output.stdout).into_owned());
                result.stderr = Some(String::from_utf8_lossy(&output.stderr).into_owned());
                result.return_code = output.status.code().unwrap_or(-1);
                if output.status.success() {
                    result.status = TaskStatus::Success;
                    result.message = "ok".to_string();
                } else {
                    result.status = TaskStatus::Failed;
                    result.message = format!("command exited with status {}", result.return_code);
                }
            }
            Err(err) => {
                result.status = TaskStatus::Failed;
                result.message = format!("failed to spawn command: {err}");
                result.return_code = -1;
            }
        }

        result.finish();
        result
    }

    fn validate(&self, task: &TaskDeclaration) -> Result<(), String> {
        if task.config.get("command").and_then(|v| v.as_str()).is_none() {
            return Err("shell task requires a 'command' entry in config".to_string());
        }
        Ok(())
    }
}
