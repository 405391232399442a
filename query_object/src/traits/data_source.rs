//! Data source seam
//!
//! The network client lives outside this crate. Statements are handed over as
//! text and rows come back as JSON objects, one per row (`JSONEachRow`).

use crate::errors::QueryError;
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use serde_json::{Map, Value};
use std::fmt::Debug;
use std::sync::Mutex;
use thiserror::Error;

/// One result row, column name to value
pub type Row = Map<String, Value>;

/// Pull-based stream of result rows
pub type RowStream = BoxStream<'static, Result<Row, QueryError>>;

/// Client able to run text statements against ClickHouse
#[async_trait]
pub trait DataSource: Send + Sync + Debug {
    /// Execute a query and return its rows as a stream
    async fn query(&self, sql: &str) -> Result<RowStream, QueryError>;

    /// Execute a statement that produces no rows
    async fn execute(&self, sql: &str) -> Result<(), QueryError>;
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct MemorySourceError(pub String);

/// In-process data source returning canned rows.
///
/// Responses are matched by substring against the statement text, first match
/// wins; unmatched queries get the default rows. Every statement is recorded.
#[derive(Debug, Default)]
pub struct MemoryDataSource {
    default_rows: Vec<Row>,
    responses: Vec<(String, Vec<Row>)>,
    failure: Option<String>,
    statements: Mutex<Vec<String>>,
}

impl MemoryDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows returned for any query without a more specific response.
    /// Non-object values are skipped.
    pub fn with_rows(mut self, rows: Vec<Value>) -> Self {
        self.default_rows = Self::to_rows(rows);
        self
    }

    /// Rows returned for queries containing `pattern`
    pub fn respond_to(mut self, pattern: impl Into<String>, rows: Vec<Value>) -> Self {
        self.responses.push((pattern.into(), Self::to_rows(rows)));
        self
    }

    /// Make every call fail with the given message
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Statements received so far, in order
    pub fn statements(&self) -> Vec<String> {
        match self.statements.lock() {
            Ok(statements) => statements.clone(),
            Err(_) => Vec::new(),
        }
    }

    fn to_rows(values: Vec<Value>) -> Vec<Row> {
        values
            .into_iter()
            .filter_map(|value| match value {
                Value::Object(row) => Some(row),
                _ => None,
            })
            .collect()
    }

    fn record(&self, sql: &str) -> Result<(), QueryError> {
        if let Ok(mut statements) = self.statements.lock() {
            statements.push(sql.to_string());
        }
        match &self.failure {
            Some(message) => Err(QueryError::data_source(MemorySourceError(message.clone()))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DataSource for MemoryDataSource {
    async fn query(&self, sql: &str) -> Result<RowStream, QueryError> {
        self.record(sql)?;

        let rows = self
            .responses
            .iter()
            .find(|(pattern, _)| sql.contains(pattern.as_str()))
            .map(|(_, rows)| rows.clone())
            .unwrap_or_else(|| self.default_rows.clone());

        Ok(stream::iter(rows.into_iter().map(Ok)).boxed())
    }

    async fn execute(&self, sql: &str) -> Result<(), QueryError> {
        self.record(sql)
    }
}
