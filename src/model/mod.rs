// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The data model shared by the resolver and the executor: task
//! declarations, resolver-owned graph nodes, execution layers, and the
//! per-task / per-workflow result types.

mod execution_layer;
mod graph_node;
mod task_declaration;
mod task_result;
mod workflow_result;

pub use execution_layer::ExecutionLayer;
pub use graph_node::GraphNode;
pub use task_declaration::TaskDeclaration;
pub use task_result::{TaskResult, TaskStatus};
pub use workflow_result::{WorkflowResult, WorkflowStatus};
