// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! A workflow execution engine: a [`resolver`] that turns user-declared task
//! graphs into layered execution plans, and an [`executor`] that drives
//! those plans to completion.

pub mod collaborators; // external collaborator trait boundaries
pub mod config; // workflow file loading
pub mod context; // reference ContextManager for tests/demo
pub mod errors; // structural + operational error taxonomy
pub mod executor; // lifecycle, concurrency, skip/dry-run, failure policy
pub mod model; // shared data model
pub mod observability; // structured logging
pub mod resolver; // DAG construction + layering
pub mod tasks; // reference TaskExecutors for tests/demo

pub use collaborators::{ContextManager, TaskExecutor};
pub use errors::{DependencyError, DependencyErrorKind, ExecutorError};
pub use executor::{ExecutionMode, Executor, ExecutorConfig};
pub use model::{
    ExecutionLayer, GraphNode, TaskDeclaration, TaskResult, TaskStatus, WorkflowResult,
    WorkflowStatus,
};
pub use resolver::{DependencyResolver, ResolverStats};
