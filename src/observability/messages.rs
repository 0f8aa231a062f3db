// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt::{Display, Formatter};

use tracing::Span;

use crate::observability::StructuredLog;

/// A new execution layer is about to be dispatched.
pub struct LayerStarted {
    pub index: usize,
    pub task_count: usize,
}

impl Display for LayerStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Executing layer {} with {} tasks", self.index, self.task_count)
    }
}

impl StructuredLog for LayerStarted {
    fn log(&self) {
        tracing::info!(layer = self.index, task_count = self.task_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("layer", span_name = name, layer = self.index, task_count = self.task_count)
    }
}

/// A task handler is about to be invoked.
pub struct TaskDispatched<'a> {
    pub name: &'a str,
    pub task_type: &'a str,
}

impl Display for TaskDispatched<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Executing task '{}' ({})", self.name, self.task_type)
    }
}

impl StructuredLog for TaskDispatched<'_> {
    fn log(&self) {
        tracing::info!(name = self.name, task_type = self.task_type, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("task", span_name = name, task_name = self.name, task_type = self.task_type)
    }
}

/// A task's handler returned success.
pub struct TaskCompleted<'a> {
    pub name: &'a str,
}

impl Display for TaskCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Task '{}' completed successfully", self.name)
    }
}

impl StructuredLog for TaskCompleted<'_> {
    fn log(&self) {
        tracing::info!(name = self.name, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("task_completed", span_name = name, task_name = self.name)
    }
}

/// A task's handler returned failure (required or optional).
pub struct TaskFailed<'a> {
    pub name: &'a str,
    pub message: &'a str,
}

impl Display for TaskFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Task '{}' failed: {}", self.name, self.message)
    }
}

impl StructuredLog for TaskFailed<'_> {
    fn log(&self) {
        tracing::error!(name = self.name, message = self.message, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("task_failed", span_name = name, task_name = self.name, message = self.message)
    }
}

/// A task was skipped via the `when` condition or a condition-evaluation
/// error (never via dry-run — that case is [`TaskDryRunCompleted`]).
pub struct TaskSkipped<'a> {
    pub name: &'a str,
    pub reason: &'a str,
}

impl Display for TaskSkipped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Task '{}' skipped: {}", self.name, self.reason)
    }
}

impl StructuredLog for TaskSkipped<'_> {
    fn log(&self) {
        tracing::info!(name = self.name, reason = self.reason, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("task_skipped", span_name = name, task_name = self.name, reason = self.reason)
    }
}

/// A task was skipped because the executor is running in dry-run mode.
pub struct TaskDryRunCompleted<'a> {
    pub name: &'a str,
}

impl Display for TaskDryRunCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Task '{}' dry run completed", self.name)
    }
}

impl StructuredLog for TaskDryRunCompleted<'_> {
    fn log(&self) {
        tracing::info!(name = self.name, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("task_dry_run", span_name = name, task_name = self.name)
    }
}

/// Best-effort registration of a completed result with the context manager
/// failed. Logged and swallowed; never alters the task's own status.
pub struct ContextRegistrationFailed<'a> {
    pub name: &'a str,
    pub error: &'a str,
}

impl Display for ContextRegistrationFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "failed to register result for task '{}' with context manager: {}",
            self.name, self.error
        )
    }
}

impl StructuredLog for ContextRegistrationFailed<'_> {
    fn log(&self) {
        tracing::warn!(name = self.name, error = self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("context_registration_failed", span_name = name, task_name = self.name, error = self.error)
    }
}
