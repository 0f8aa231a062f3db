// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Drives a validated layered plan to completion: lifecycle, bounded
//! concurrency, conditional skipping, dry-run simulation, and
//! required-vs-optional failure semantics.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, Semaphore};
use tokio_util::sync::CancellationToken;

use crate::collaborators::{ContextManager, TaskExecutor};
use crate::context::is_truthy;
use crate::errors::ExecutorError;
use crate::model::{TaskDeclaration, TaskResult, TaskStatus, WorkflowResult};
use crate::observability::messages::{
    ContextRegistrationFailed, LayerStarted, TaskCompleted, TaskDispatched, TaskDryRunCompleted,
    TaskFailed, TaskSkipped,
};
use crate::observability::StructuredLog;
use crate::resolver::DependencyResolver;

/// How execution layers are traversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// One task at a time, in declaration order, on the calling future.
    Sequential,
    /// All tasks in a layer dispatched concurrently, bounded by
    /// `max_concurrency`. The default.
    Parallel,
}

impl Default for ExecutionMode {
    fn default() -> Self {
        ExecutionMode::Parallel
    }
}

/// The executor's fixed small configuration record.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    pub dry_run: bool,
    pub max_concurrency: usize,
    pub mode: ExecutionMode,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        ExecutorConfig {
            dry_run: false,
            max_concurrency: 10,
            mode: ExecutionMode::Parallel,
        }
    }
}

impl ExecutorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// `max_concurrency` is clamped to at least 1 by the executor
    /// constructor, not here, so an out-of-range value built by hand is
    /// still caught.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Consumes a layered plan and drives tasks through their lifecycle.
///
/// `register_task` is the only mutator; once `execute_workflow` begins the
/// registry is read-only, shared across concurrently-dispatched tasks via
/// `Arc<Self>`.
pub struct Executor {
    config: ExecutorConfig,
    registry: HashMap<String, Arc<dyn TaskExecutor>>,
    context: Arc<dyn ContextManager>,
}

impl Executor {
    pub fn new(config: ExecutorConfig, context: Arc<dyn ContextManager>) -> Self {
        let mut config = config;
        config.max_concurrency = config.max_concurrency.max(1);
        Executor {
            config,
            registry: HashMap::new(),
            context,
        }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Installs a handler keyed by task `type`. Last registration wins.
    pub fn register_task(&mut self, task_type: impl Into<String>, handler: Arc<dyn TaskExecutor>) {
        self.registry.insert(task_type.into(), handler);
    }

    /// Runs a single task through skip evaluation, dry-run, and dispatch.
    ///
    /// Returns `NoExecutorForType` with no `TaskResult` when the task's type
    /// has no registered handler; otherwise always returns a `TaskResult`
    /// with a terminal status.
    pub async fn execute_task(
        &self,
        cancel: &CancellationToken,
        task: &TaskDeclaration,
    ) -> Result<TaskResult, ExecutorError> {
        let handler = self.registry.get(&task.task_type).cloned().ok_or_else(|| {
            ExecutorError::NoExecutorForType {
                task_id: task.id.clone(),
                task_type: task.task_type.clone(),
            }
        })?;

        let name = task.display_name().to_string();
        let mut result = TaskResult::running(&task.id, &name, &task.task_type);
        let mut dry_run_skip = false;

        // Skip evaluation happens before dry-run is ever considered — this
        // ordering is observable and deliberate.
        if !task.when.is_empty() {
            match self.context.evaluate_string(&task.when).await {
                Err(err) => result.mark_skipped(format!("failed to evaluate condition: {err}")),
                Ok(value) if !is_truthy(&value) => {
                    result.mark_skipped(format!("condition '{}' evaluated to false", task.when))
                }
                Ok(_) => {}
            }
        }

        if result.status != TaskStatus::Skipped && self.config.dry_run {
            result.mark_skipped("Dry run mode - task would be executed");
            dry_run_skip = true;
        }

        if result.status == TaskStatus::Skipped {
            if dry_run_skip {
                TaskDryRunCompleted { name: &name }.log();
            } else {
                TaskSkipped {
                    name: &name,
                    reason: &result.message,
                }
                .log();
            }
        } else {
            TaskDispatched {
                name: &name,
                task_type: &task.task_type,
            }
            .log();

            let outcome = handler.execute(cancel, task, self.context.as_ref()).await;
            result.status = outcome.status;
            result.message = outcome.message;
            result.stdout = outcome.stdout;
            result.stderr = outcome.stderr;
            result.return_code = outcome.return_code;
            result.finish();

            match result.status {
                TaskStatus::Success => TaskCompleted { name: &name }.log(),
                TaskStatus::Failed => TaskFailed {
                    name: &name,
                    message: &result.message,
                }
                .log(),
                _ => {}
            }
        }

        if let Err(err) = self.context.register_task_result(&result).await {
            ContextRegistrationFailed {
                name: &name,
                error: &err,
            }
            .log();
        }

        Ok(result)
    }

    /// Plans `tasks` via `resolver`, then drives every layer to completion.
    ///
    /// Returns the (possibly partial) `WorkflowResult` together with an
    /// operational error when planning failed, a required task failed, or
    /// cancellation fired. Optional-task failures never produce an error —
    /// they only shape the final `WorkflowResult.status`.
    pub async fn execute_workflow(
        self: &Arc<Self>,
        cancel: &CancellationToken,
        workflow_name: &str,
        tasks: Vec<TaskDeclaration>,
        resolver: &mut DependencyResolver,
    ) -> (WorkflowResult, Option<ExecutorError>) {
        let mut result = WorkflowResult::started(workflow_name);

        resolver.clear();
        if let Err(err) = resolver.build_graph(tasks) {
            result.finalize();
            return (result, Some(ExecutorError::Dependency(err)));
        }

        let layers = match resolver.execution_layers() {
            Ok(layers) => layers.to_vec(),
            Err(err) => {
                result.finalize();
                return (result, Some(ExecutorError::Dependency(err)));
            }
        };

        for layer in &layers {
            LayerStarted {
                index: layer.index,
                task_count: layer.len(),
            }
            .log();

            match self.config.mode {
                ExecutionMode::Sequential => {
                    for node in &layer.tasks {
                        if cancel.is_cancelled() {
                            result.finalize();
                            return (result, Some(ExecutorError::Cancelled));
                        }

                        let task_result = match self.execute_task(cancel, &node.declaration).await {
                            Ok(r) => r,
                            Err(err) => {
                                result.finalize();
                                return (result, Some(err));
                            }
                        };

                        let required = node.declaration.required;
                        let failed = task_result.status == TaskStatus::Failed;
                        let task_id = task_result.id.clone();
                        let message = task_result.message.clone();
                        result.tasks.insert(task_id.clone(), task_result);

                        if failed && required {
                            result.finalize();
                            return (
                                result,
                                Some(ExecutorError::RequiredTaskFailed { task_id, message }),
                            );
                        }
                    }
                }
                ExecutionMode::Parallel => {
                    let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency));
                    let layer_results = Arc::new(Mutex::new(HashMap::new()));
                    let first_error: Arc<Mutex<Option<ExecutorError>>> = Arc::new(Mutex::new(None));
                    let mut handles = Vec::with_capacity(layer.len());

                    for node in &layer.tasks {
                        let task = node.declaration.clone();
                        let required = task.required;
                        let semaphore = Arc::clone(&semaphore);
                        let cancel = cancel.clone();
                        let this = Arc::clone(self);
                        let layer_results = Arc::clone(&layer_results);
                        let first_error = Arc::clone(&first_error);

                        handles.push(tokio::spawn(async move {
                            let permit = tokio::select! {
                                permit = semaphore.acquire_owned() => permit.ok(),
                                _ = cancel.cancelled() => None,
                            };

                            let Some(permit) = permit else {
                                let mut guard = first_error.lock().await;
                                if guard.is_none() {
                                    *guard = Some(ExecutorError::Cancelled);
                                }
                                return;
                            };

                            let outcome = this.execute_task(&cancel, &task).await;
                            drop(permit);

                            match outcome {
                                Ok(task_result) => {
                                    let failed = task_result.status == TaskStatus::Failed;
                                    let task_id = task_result.id.clone();
                                    let message = task_result.message.clone();
                                    layer_results.lock().await.insert(task_id.clone(), task_result);

                                    if failed && required {
                                        let mut guard = first_error.lock().await;
                                        if guard.is_none() {
                                            *guard = Some(ExecutorError::RequiredTaskFailed {
                                                task_id,
                                                message,
                                            });
                                        }
                                    }
                                }
                                Err(err) => {
                                    let mut guard = first_error.lock().await;
                                    if guard.is_none() {
                                        *guard = Some(err);
                                    }
                                }
                            }
                        }));
                    }

                    for handle in handles {
                        let _ = handle.await;
                    }

                    result.tasks.extend(Arc::try_unwrap(layer_results).unwrap().into_inner());

                    if let Some(err) = Arc::try_unwrap(first_error).unwrap().into_inner() {
                        result.finalize();
                        return (result, Some(err));
                    }
                }
            }
        }

        result.finalize();
        (result, None)
    }
}
