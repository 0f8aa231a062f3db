// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Thin demonstration driver: loads a workflow YAML file, registers the
//! reference task executors, and runs it to completion. Not part of the
//! specified core — a stand-in for the config loader / CLI spec.md treats
//! as external collaborators.

use std::env;
use std::sync::Arc;

use taskloom::config::load_and_validate_workflow_file;
use taskloom::context::InMemoryContextManager;
use taskloom::tasks::{EchoTask, FailTask, ShellTask, SleepTask};
use taskloom::{ExecutionMode, Executor, ExecutorConfig};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let json_output = args.iter().any(|a| a == "--json");
    let path = args
        .iter()
        .skip(1)
        .find(|a| *a != "--json")
        .unwrap_or_else(|| {
            eprintln!("Usage: {} [--json] <workflow.yaml>", args[0]);
            std::process::exit(1);
        });

    let workflow = load_and_validate_workflow_file(path)?;

    let config = ExecutorConfig::new()
        .with_dry_run(workflow.dry_run)
        .with_max_concurrency(workflow.max_concurrency)
        .with_mode(ExecutionMode::from(workflow.mode));

    let mut executor = Executor::new(config, Arc::new(InMemoryContextManager::new()));
    executor.register_task("echo", Arc::new(EchoTask));
    executor.register_task("shell", Arc::new(ShellTask));
    executor.register_task("fail", Arc::new(FailTask));
    executor.register_task("sleep", Arc::new(SleepTask));
    let executor = Arc::new(executor);

    let cancel = CancellationToken::new();
    let mut resolver = taskloom::DependencyResolver::new();

    let (result, err) = executor
        .execute_workflow(&cancel, &workflow.name, workflow.tasks, &mut resolver)
        .await;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("workflow '{}': {:?} ({:?})", result.name, result.status, result.duration);
        let mut ids: Vec<&String> = result.tasks.keys().collect();
        ids.sort();
        for id in ids {
            let task = &result.tasks[id];
            println!("  {id}: {:?} - {}", task.status, task.message);
        }
    }

    if let Some(err) = err {
        eprintln!("workflow did not complete cleanly: {err}");
        std::process::exit(1);
    }

    Ok(())
}
