//! Core ClickHaus functionality
//!
//! This module contains the main ClickHaus struct, which owns the data source
//! and compiler settings and hands out bound query builders.

use futures::TryStreamExt;
use std::sync::Arc;

use crate::errors::ClickHausError;
use config::{AppConfig, DatabaseConfig, QueryConfig};
use query_object::{DataSource, QueryBuilder, TableMetadata};

/// Main ClickHaus coordinator
#[derive(Debug, Clone)]
pub struct ClickHaus {
    source: Arc<dyn DataSource>,
    database: Option<DatabaseConfig>,
    query: QueryConfig,
}

impl ClickHaus {
    /// Create a coordinator over an already connected data source
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self {
            source,
            database: None,
            query: QueryConfig::default(),
        }
    }

    /// Create a coordinator from validated application configuration
    pub fn from_config(source: Arc<dyn DataSource>, config: AppConfig) -> Result<Self, ClickHausError> {
        config.validate()?;

        tracing::info!(
            "ClickHaus configured for {} ({})",
            config.database.http_url(),
            config.database.database
        );

        Ok(Self {
            source,
            database: Some(config.database),
            query: config.query,
        })
    }

    /// Replace the compiler settings used by new builders
    pub fn with_query_config(mut self, query: QueryConfig) -> Self {
        self.query = query;
        self
    }

    /// Get data source reference
    pub fn source(&self) -> &Arc<dyn DataSource> {
        &self.source
    }

    pub fn database_config(&self) -> Option<&DatabaseConfig> {
        self.database.as_ref()
    }

    pub fn query_config(&self) -> &QueryConfig {
        &self.query
    }

    /// Builder over `T`, bound to this data source and settings
    pub fn objects<T: TableMetadata>(&self) -> QueryBuilder<T> {
        T::objects()
            .with_config(self.query.clone())
            .using(self.source.clone())
    }

    /// Check data source health
    pub async fn health_check(&self) -> Result<(), ClickHausError> {
        let rows: Vec<_> = self.source.query("SELECT 1").await?.try_collect().await?;
        crate::debug_log!("Health check returned {} row(s)", rows.len());

        if rows.is_empty() {
            return Err(ClickHausError::HealthCheck(
                "SELECT 1 returned no rows".to_string(),
            ));
        }
        Ok(())
    }
}
