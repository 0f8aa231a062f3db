// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The (external, in spec.md's terms) configuration loader, included here
//! only so the crate has a driver to demonstrate the resolver/executor core
//! against. Parses a YAML workflow file, then hands its tasks to the
//! resolver for validation — mirroring the teacher's own
//! `load_config` / `load_and_validate_config` split.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::executor::ExecutionMode;
use crate::model::TaskDeclaration;
use crate::resolver::DependencyResolver;

/// A workflow as authored on disk: a name, its tasks, and the executor
/// knobs spec.md §4.2 enumerates.
#[derive(Debug, Deserialize)]
pub struct WorkflowFile {
    pub name: String,
    pub tasks: Vec<TaskDeclaration>,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    #[serde(default)]
    pub mode: WorkflowMode,
}

fn default_max_concurrency() -> usize {
    10
}

#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowMode {
    #[default]
    Parallel,
    Sequential,
}

impl From<WorkflowMode> for ExecutionMode {
    fn from(mode: WorkflowMode) -> Self {
        match mode {
            WorkflowMode::Parallel => ExecutionMode::Parallel,
            WorkflowMode::Sequential => ExecutionMode::Sequential,
        }
    }
}

#[derive(Debug, Error)]
pub enum WorkflowFileError {
    #[error("failed to read workflow file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse workflow file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("workflow graph is invalid: {0}")]
    Graph(#[from] crate::errors::DependencyError),
}

/// Parses a workflow file without validating its task graph.
pub fn load_workflow_file<P: AsRef<Path>>(path: P) -> Result<WorkflowFile, WorkflowFileError> {
    let content = fs::read_to_string(path)?;
    let file: WorkflowFile = serde_yaml::from_str(&content)?;
    Ok(file)
}

/// Parses a workflow file and validates its task graph against the
/// resolver, mirroring the teacher's parse-then-validate `load_and_validate_config`.
pub fn load_and_validate_workflow_file<P: AsRef<Path>>(
    path: P,
) -> Result<WorkflowFile, WorkflowFileError> {
    let file = load_workflow_file(path)?;

    let mut resolver = DependencyResolver::new();
    resolver.build_graph(file.tasks.clone())?;
    resolver.validate()?;

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn write_fixture(yaml: &str) -> NamedTempFile {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), yaml).unwrap();
        file
    }

    #[test]
    fn parses_a_basic_workflow() {
        let file = write_fixture(
            r#"
name: build-and-test
tasks:
  - id: build
    type: shell
    config:
      command: "echo building"
  - id: test
    type: shell
    depends_on: [build]
    config:
      command: "echo testing"
"#,
        );

        let parsed = load_workflow_file(file.path()).unwrap();
        assert_eq!(parsed.name, "build-and-test");
        assert_eq!(parsed.tasks.len(), 2);
        assert_eq!(parsed.max_concurrency, 10);
        assert!(!parsed.dry_run);
        assert_eq!(parsed.mode, WorkflowMode::Parallel);
    }

    #[test]
    fn honors_explicit_executor_knobs() {
        let file = write_fixture(
            r#"
name: deploy
dry_run: true
max_concurrency: 3
mode: sequential
tasks:
  - id: deploy
    type: shell
    config:
      command: "echo deploying"
"#,
        );

        let parsed = load_workflow_file(file.path()).unwrap();
        assert!(parsed.dry_run);
        assert_eq!(parsed.max_concurrency, 3);
        assert_eq!(parsed.mode, WorkflowMode::Sequential);
    }

    #[test]
    fn validation_accepts_a_valid_acyclic_workflow() {
        let file = write_fixture(
            r#"
name: build-and-test
tasks:
  - id: build
    type: shell
    config:
      command: "echo building"
  - id: test
    type: shell
    depends_on: [build]
    config:
      command: "echo testing"
"#,
        );

        let parsed = load_and_validate_workflow_file(file.path()).unwrap();
        assert_eq!(parsed.name, "build-and-test");
        assert_eq!(parsed.tasks.len(), 2);
    }

    #[test]
    fn validation_rejects_a_cycle() {
        let file = write_fixture(
            r#"
name: broken
tasks:
  - id: a
    type: shell
    depends_on: [b]
  - id: b
    type: shell
    depends_on: [a]
"#,
        );

        let result = load_and_validate_workflow_file(file.path());
        assert!(matches!(result, Err(WorkflowFileError::Graph(_))));
    }

    #[test]
    fn validation_rejects_a_missing_dependency() {
        let file = write_fixture(
            r#"
name: broken
tasks:
  - id: a
    type: shell
    depends_on: [ghost]
"#,
        );

        let result = load_and_validate_workflow_file(file.path());
        assert!(matches!(result, Err(WorkflowFileError::Graph(_))));
    }
}
