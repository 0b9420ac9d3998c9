//! Test doubles shared by the catalog and DDL test modules.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::traits::Executor;
use crate::core::value::Row;
use crate::error::{AdapterError, Result};

/// Executor double that records issued SQL and serves scripted rows.
///
/// Query responses are keyed by SQL substring; the first registered needle
/// contained in the incoming statement wins. Unmatched queries return an
/// empty result set.
#[derive(Default)]
pub(crate) struct MockExecutor {
    responses: Vec<(String, Vec<Row>)>,
    failures: Vec<String>,
    queries: Mutex<Vec<String>>,
    statements: Mutex<Vec<String>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `rows` for any query containing `needle`.
    #[must_use]
    pub fn respond(mut self, needle: &str, rows: Vec<Row>) -> Self {
        self.responses.push((needle.to_string(), rows));
        self
    }

    /// Fail any query or statement containing `needle`.
    #[must_use]
    pub fn fail_matching(mut self, needle: &str) -> Self {
        self.failures.push(needle.to_string());
        self
    }

    /// All SQL passed to `query`, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    /// All SQL passed to `execute`, in order.
    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }

    fn check_failure(&self, sql: &str) -> Result<()> {
        if let Some(needle) = self.failures.iter().find(|n| sql.contains(n.as_str())) {
            return Err(AdapterError::data_access(
                format!("scripted failure for '{}'", needle),
                "mock executor",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Executor for MockExecutor {
    async fn query(&self, sql: &str, _tag: &str) -> Result<Vec<Row>> {
        self.queries.lock().unwrap().push(sql.to_string());
        self.check_failure(sql)?;
        Ok(self
            .responses
            .iter()
            .find(|(needle, _)| sql.contains(needle.as_str()))
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default())
    }

    async fn execute(&self, sql: &str) -> Result<()> {
        self.statements.lock().unwrap().push(sql.to_string());
        self.check_failure(sql)
    }
}
