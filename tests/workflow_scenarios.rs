// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Cross-module scenario tests exercising the resolver and executor
//! together, as seeded by the specification's concrete scenarios.

use std::collections::HashSet;
use std::sync::Arc;

use taskloom::collaborators::{ContextManager, TaskExecutor};
use taskloom::context::InMemoryContextManager;
use taskloom::model::{TaskDeclaration, TaskResult, TaskStatus, WorkflowStatus};
use taskloom::tasks::{EchoTask, FailTask};
use taskloom::{DependencyResolver, ExecutionMode, Executor, ExecutorConfig};
use tokio_util::sync::CancellationToken;

fn decl(id: &str, deps: &[&str], task_type: &str) -> TaskDeclaration {
    TaskDeclaration {
        id: id.to_string(),
        name: id.to_string(),
        task_type: task_type.to_string(),
        depends_on: deps.iter().map(|s| s.to_string()).collect(),
        when: String::new(),
        required: true,
        config: Default::default(),
    }
}

fn build_executor(config: ExecutorConfig) -> Arc<Executor> {
    let mut executor = Executor::new(config, Arc::new(InMemoryContextManager::new()));
    executor.register_task("echo", Arc::new(EchoTask));
    executor.register_task("fail", Arc::new(FailTask));
    Arc::new(executor)
}

#[tokio::test]
async fn fan_out_fan_in_produces_five_layers_and_succeeds() {
    let executor = build_executor(ExecutorConfig::default());
    let mut resolver = DependencyResolver::new();
    let cancel = CancellationToken::new();

    let tasks = vec![
        decl("init", &[], "echo"),
        decl("build1", &["init"], "echo"),
        decl("build2", &["init"], "echo"),
        decl("test1", &["build1"], "echo"),
        decl("test2", &["build2"], "echo"),
        decl("integrate", &["test1", "test2"], "echo"),
        decl("deploy", &["integrate"], "echo"),
    ];

    let (result, err) = executor
        .execute_workflow(&cancel, "fan-out-fan-in", tasks, &mut resolver)
        .await;

    assert!(err.is_none());
    assert_eq!(result.status, WorkflowStatus::Success);
    assert_eq!(result.tasks.len(), 7);

    let stats = resolver.stats().unwrap();
    assert_eq!(stats.layers, 5);
    assert_eq!(stats.max_parallelism, 2);
    assert_eq!(stats.total_edges, 7);
}

#[tokio::test]
async fn cycle_prevents_any_task_from_running() {
    let executor = build_executor(ExecutorConfig::default());
    let mut resolver = DependencyResolver::new();
    let cancel = CancellationToken::new();

    let tasks = vec![decl("A", &["B"], "echo"), decl("B", &["A"], "echo")];
    let (result, err) = executor
        .execute_workflow(&cancel, "cycle", tasks, &mut resolver)
        .await;

    assert!(result.tasks.is_empty(), "no plan means no task ever dispatches");
    match err {
        Some(taskloom::ExecutorError::Dependency(dep_err)) => {
            assert_eq!(dep_err.kind, taskloom::DependencyErrorKind::CircularDependency);
            assert!(dep_err.task_id == "A" || dep_err.task_id == "B");
        }
        other => panic!("expected a circular dependency error, got {other:?}"),
    }
}

#[tokio::test]
async fn parallel_mode_tolerates_an_optional_failure_but_reports_it_in_status() {
    let mut a = decl("A", &[], "fail");
    a.required = false;
    let b = decl("B", &[], "echo");

    let executor = build_executor(ExecutorConfig::default());
    let mut resolver = DependencyResolver::new();
    let cancel = CancellationToken::new();

    let (result, err) = executor
        .execute_workflow(&cancel, "optional-failure", vec![a, b], &mut resolver)
        .await;

    assert!(err.is_none());
    assert_eq!(result.status, WorkflowStatus::Failed);
    assert_eq!(result.tasks["A"].status, TaskStatus::Failed);
    assert_eq!(result.tasks["B"].status, TaskStatus::Success);
}

#[tokio::test]
async fn sequential_required_failure_leaves_dependents_entirely_undispatched() {
    let executor = build_executor(ExecutorConfig::new().with_mode(ExecutionMode::Sequential));
    let mut resolver = DependencyResolver::new();
    let cancel = CancellationToken::new();

    let tasks = vec![decl("A", &[], "fail"), decl("B", &["A"], "echo")];
    let (result, err) = executor
        .execute_workflow(&cancel, "seq-required-failure", tasks, &mut resolver)
        .await;

    assert!(matches!(err, Some(taskloom::ExecutorError::RequiredTaskFailed { .. })));
    assert_eq!(result.status, WorkflowStatus::Failed);
    assert!(result.tasks.contains_key("A"));
    assert!(!result.tasks.contains_key("B"));
}

/// A custom context manager whose `evaluate_string` always errors, to check
/// that evaluation failures are treated as a skip rather than a crash.
struct AlwaysErrorsContextManager(InMemoryContextManager);

#[async_trait::async_trait]
impl ContextManager for AlwaysErrorsContextManager {
    async fn initialize(&self) {
        self.0.initialize().await
    }
    async fn get_variable(&self, key: &str) -> Option<String> {
        self.0.get_variable(key).await
    }
    async fn set_variable(&self, key: &str, value: String) {
        self.0.set_variable(key, value).await
    }
    async fn get_env(&self, key: &str) -> Option<String> {
        self.0.get_env(key).await
    }
    async fn set_env(&self, key: &str, value: String) {
        self.0.set_env(key, value).await
    }
    async fn register_task_result(&self, result: &TaskResult) -> Result<(), String> {
        self.0.register_task_result(result).await
    }
    async fn get_task_result(&self, id: &str) -> Option<TaskResult> {
        self.0.get_task_result(id).await
    }
    async fn evaluate_string(&self, _expr: &str) -> Result<String, String> {
        Err("template engine unavailable".to_string())
    }
    async fn evaluate_map(
        &self,
        _values: &std::collections::HashMap<String, String>,
    ) -> Result<std::collections::HashMap<String, String>, String> {
        Err("template engine unavailable".to_string())
    }
    fn get_template_engine(&self) -> &str {
        "always-errors"
    }
    async fn get_context(&self) -> std::collections::HashMap<String, String> {
        self.0.get_context().await
    }
}

#[tokio::test]
async fn condition_evaluation_failure_skips_rather_than_aborts() {
    let mut executor = Executor::new(
        ExecutorConfig::default(),
        Arc::new(AlwaysErrorsContextManager(InMemoryContextManager::new())),
    );
    executor.register_task("echo", Arc::new(EchoTask));
    let executor = Arc::new(executor);

    let mut resolver = DependencyResolver::new();
    let cancel = CancellationToken::new();

    let mut a = decl("A", &[], "echo");
    a.when = "some-expression".to_string();

    let (result, err) = executor
        .execute_workflow(&cancel, "eval-failure", vec![a], &mut resolver)
        .await;

    assert!(err.is_none());
    assert_eq!(result.status, WorkflowStatus::PartialSuccess);
    let task_result = &result.tasks["A"];
    assert_eq!(task_result.status, TaskStatus::Skipped);
    assert!(task_result.message.contains("failed to evaluate condition"));
}

#[tokio::test]
async fn dependencies_and_dependents_are_queryable_after_planning() {
    let mut resolver = DependencyResolver::new();
    resolver
        .build_graph(vec![decl("A", &[], "echo"), decl("B", &["A"], "echo")])
        .unwrap();

    let deps: HashSet<String> = resolver.dependencies_of("B").unwrap().clone();
    assert_eq!(deps, HashSet::from(["A".to_string()]));

    let dependents: HashSet<String> = resolver.dependents_of("A").unwrap().clone();
    assert_eq!(dependents, HashSet::from(["B".to_string()]));
}
