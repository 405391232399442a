//! Execution against a bound data source
//!
//! Rows are pulled lazily from the source's stream and decoded into the
//! table type with serde.

use crate::errors::QueryError;
use crate::query_builder::builder::QueryBuilder;
use crate::query_builder::sql_generation::SqlGenerator;
use crate::traits::{DataSource, Row, TableMetadata};
use futures::{StreamExt, TryStreamExt};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Projection substituted by `count()`
const COUNT_PROJECTION: &str = "SELECT count() AS count";

impl<T> QueryBuilder<T>
where
    T: TableMetadata + DeserializeOwned,
{
    /// Run the statement and collect every row
    pub async fn all(&self) -> Result<Vec<T>, QueryError> {
        let source = self.data_source()?;
        let sql = self.to_sql();
        self.log_statement("ALL", &sql);

        let rows: Vec<Row> = source.query(&sql).await?.try_collect().await?;
        tracing::debug!("[ALL] Rows fetched: {}", rows.len());

        rows.into_iter().map(Self::decode_row).collect()
    }

    /// Run the statement with `LIMIT 1` and return the row, if any
    pub async fn first(&self) -> Result<Option<T>, QueryError> {
        let source = self.data_source()?;
        let sql = self.limit(1).to_sql();
        self.log_statement("FIRST", &sql);

        let mut stream = source.query(&sql).await?;
        match stream.next().await {
            Some(row) => Ok(Some(Self::decode_row(row?)?)),
            None => Ok(None),
        }
    }

    /// Count matching rows. The projection of the compiled statement is
    /// replaced, everything from `FROM` onwards is kept.
    ///
    /// `ORDER BY`, `LIMIT` and `OFFSET` are kept too, and pagination then
    /// applies to the single count row: `.offset(10).count()` returns no row
    /// and fails with [`QueryError::UnexpectedResult`]. Count on an unpaginated
    /// builder.
    pub async fn count(&self) -> Result<u64, QueryError> {
        let source = self.data_source()?;
        let sql = Self::count_sql(&self.to_sql());
        self.log_statement("COUNT", &sql);

        let mut stream = source.query(&sql).await?;
        let row = stream
            .next()
            .await
            .ok_or_else(|| QueryError::UnexpectedResult("count() returned no rows".to_string()))??;

        Self::read_count(&row)
    }

    /// Pull the next row. The row stream is opened on the first call and
    /// kept until exhausted or reset.
    pub async fn next(&mut self) -> Result<Option<T>, QueryError> {
        if self.cursor.is_none() {
            let source = self.data_source()?;
            let sql = self.to_sql();
            self.log_statement("NEXT", &sql);
            self.cursor = Some(source.query(&sql).await?);
        }

        let Some(cursor) = self.cursor.as_mut() else {
            return Ok(None);
        };

        match cursor.next().await {
            Some(row) => Ok(Some(Self::decode_row(row?)?)),
            None => Ok(None),
        }
    }

    /// Drop the open row stream; the next `next()` re-runs the statement
    pub fn reset_iterator(&mut self) {
        if self.cursor.take().is_some() {
            crate::trace_log!("Cursor on '{}' reset", T::table_name());
        }
    }

    /// Delete matching rows with a mutation. Refuses to run unfiltered.
    pub async fn delete(&self) -> Result<(), QueryError> {
        let Some(body) = SqlGenerator::build_conjunction(&self.conditions, &self.config) else {
            return Err(QueryError::UnfilteredDelete(T::table_name().to_string()));
        };

        let source = self.data_source()?;
        let sql = format!("ALTER TABLE {} DELETE WHERE {}", T::table_name(), body);
        self.log_statement("DELETE", &sql);

        source.execute(&sql).await
    }

    fn log_statement(&self, operation: &str, sql: &str) {
        if self.config.log_queries {
            tracing::info!(table = T::table_name(), "[{}] {}", operation, sql);
        } else {
            tracing::debug!("[{}] Table: {}", operation, T::table_name());
            tracing::debug!("[{}] SQL: {}", operation, sql);
        }
    }

    fn data_source(&self) -> Result<Arc<dyn DataSource>, QueryError> {
        self.source
            .clone()
            .ok_or_else(|| QueryError::NoDataSource(T::table_name().to_string()))
    }

    fn decode_row(row: Row) -> Result<T, QueryError> {
        serde_json::from_value(Value::Object(row)).map_err(|e| QueryError::decode(T::table_name(), e))
    }

    pub(crate) fn count_sql(sql: &str) -> String {
        match sql.find(" FROM ") {
            Some(position) => format!("{}{}", COUNT_PROJECTION, &sql[position..]),
            None => sql.to_string(),
        }
    }

    /// ClickHouse quotes 64-bit integers in JSON output by default
    pub(crate) fn read_count(row: &Row) -> Result<u64, QueryError> {
        let value = row
            .get("count")
            .or_else(|| row.values().next())
            .ok_or_else(|| QueryError::UnexpectedResult("count() row has no columns".to_string()))?;

        let count = match value {
            Value::Number(number) => number.as_u64(),
            Value::String(text) => text.parse::<u64>().ok(),
            _ => None,
        };

        count.ok_or_else(|| QueryError::UnexpectedResult(format!("count() returned {}", value)))
    }
}
