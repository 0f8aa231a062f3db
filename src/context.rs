//! A reference [`ContextManager`] for tests and the demo binary. Not part of
//! the specified core — the real context manager, with a full template
//! engine, is an external collaborator.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::collaborators::ContextManager;
use crate::model::TaskResult;

/// Truthiness rule (exact): a string is false iff it equals, case-sensitive,
/// one of `""`, `"false"`, `"0"`, `"no"`, `"off"`. All other strings are true.
pub fn is_truthy(value: &str) -> bool {
    !matches!(value, "" | "false" | "0" | "no" | "off")
}

/// Variables and prior results live behind a single `RwLock` each; evaluation
/// supports only literal passthrough and `${var}` substitution against
/// registered variables — a real expression language is out of scope.
#[derive(Default)]
pub struct InMemoryContextManager {
    variables: RwLock<HashMap<String, String>>,
    env: RwLock<HashMap<String, String>>,
    results: RwLock<HashMap<String, TaskResult>>,
}

impl InMemoryContextManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn substitute(&self, expr: &str, vars: &HashMap<String, String>) -> String {
        let mut out = String::with_capacity(expr.len());
        let mut rest = expr;
        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            rest = &rest[start + 2..];
            if let Some(end) = rest.find('}') {
                let key = &rest[..end];
                if let Some(value) = vars.get(key) {
                    out.push_str(value);
                }
                rest = &rest[end + 1..];
            } else {
                out.push_str("${");
                break;
            }
        }
        out.push_str(rest);
        out
    }
}

#[async_trait]
impl ContextManager for InMemoryContextManager {
    async fn initialize(&self) {}

    async fn get_variable(&self, key: &str) -> Option<String> {
        self.variables.read().await.get(key).cloned()
    }

    async fn set_variable(&self, key: &str, value: String) {
        self.variables.write().await.insert(key.to_string(), value);
    }

    async fn get_env(&self, key: &str) -> Option<String> {
        self.env.read().await.get(key).cloned()
    }

    async fn set_env(&self, key: &str, value: String) {
        self.env.write().await.insert(key.to_string(), value);
    }

    async fn register_task_result(&self, result: &TaskResult) -> Result<(), String> {
        self.results.write().await.insert(result.id.clone(), result.clone());
        Ok(())
    }

    async fn get_task_result(&self, id: &str) -> Option<TaskResult> {
        self.results.read().await.get(id).cloned()
    }

    async fn evaluate_string(&self, expr: &str) -> Result<String, String> {
        let vars = self.variables.read().await.clone();
        Ok(self.substitute(expr, &vars))
    }

    async fn evaluate_map(&self, values: &HashMap<String, String>) -> Result<HashMap<String, String>, String> {
        let vars = self.variables.read().await.clone();
        Ok(values
            .iter()
            .map(|(k, v)| (k.clone(), self.substitute(v, &vars)))
            .collect())
    }

    fn get_template_engine(&self) -> &str {
        "literal"
    }

    async fn get_context(&self) -> HashMap<String, String> {
        self.variables.read().await.clone()
    }
}
