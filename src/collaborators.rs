// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Trait boundaries for the engine's external collaborators: concrete task
//! executors and the context manager. Both are out of scope for the engine
//! itself — it only ever calls through these traits.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::model::{TaskDeclaration, TaskResult};

/// A registered handler for one task `type`. Installed via
/// `Executor::register_task`; looked up by type string on dispatch.
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    /// Runs the task to completion and returns a `TaskResult` with terminal
    /// status already set. Must honor `cancel` on a best-effort basis.
    async fn execute(
        &self,
        cancel: &CancellationToken,
        task: &TaskDeclaration,
        context: &dyn ContextManager,
    ) -> TaskResult;

    /// Pre-flight validation of a task's declared config, independent of
    /// execution.
    fn validate(&self, task: &TaskDeclaration) -> Result<(), String> {
        let _ = task;
        Ok(())
    }

    fn supports_dry_run(&self) -> bool {
        true
    }
}

/// Stores per-workflow variables, environment, and prior task results, and
/// evaluates template/predicate strings. Only `register_task_result` and
/// `evaluate_string` are on the executor's hot path; the rest of the surface
/// exists so this trait is a faithful boundary for a real implementation.
#[async_trait]
pub trait ContextManager: Send + Sync {
    async fn initialize(&self);

    async fn get_variable(&self, key: &str) -> Option<String>;
    async fn set_variable(&self, key: &str, value: String);

    async fn get_env(&self, key: &str) -> Option<String>;
    async fn set_env(&self, key: &str, value: String);

    /// Best-effort publication of a completed task's result. Failures are
    /// logged by the caller and never alter the task's own status.
    async fn register_task_result(&self, result: &TaskResult) -> Result<(), String>;
    async fn get_task_result(&self, id: &str) -> Option<TaskResult>;

    /// Resolves a `when` predicate (or any template string) to its string
    /// value. The executor applies the truthiness rule to the result itself;
    /// this method knows nothing about truthiness.
    async fn evaluate_string(&self, expr: &str) -> Result<String, String>;
    async fn evaluate_map(&self, values: &HashMap<String, String>) -> Result<HashMap<String, String>, String>;

    fn get_template_engine(&self) -> &str;
    async fn get_context(&self) -> HashMap<String, String>;
}
