use thiserror::Error;

/// Boxed error produced by an external data-source client
pub type SourceError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("FINAL is not supported for table '{table}' with engine {engine}")]
    FinalNotSupported { table: String, engine: String },

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Invalid sort specification: {0}")]
    InvalidSort(String),

    #[error("No data source bound to query on table '{0}'")]
    NoDataSource(String),

    #[error("Refusing to delete from '{0}' without any filter conditions")]
    UnfilteredDelete(String),

    #[error("Failed to decode row from '{table}': {source}")]
    Decode {
        table: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected result shape: {0}")]
    UnexpectedResult(String),

    #[error("Data source error: {0}")]
    DataSource(#[source] SourceError),
}

impl QueryError {
    /// Wrap an error raised by the external data-source client
    pub fn data_source<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        QueryError::DataSource(Box::new(error))
    }

    pub(crate) fn decode(table: &str, source: serde_json::Error) -> Self {
        QueryError::Decode {
            table: table.to_string(),
            source,
        }
    }
}
