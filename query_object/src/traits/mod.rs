//! Traits at the seams to the external schema and client layers

pub mod data_source;
pub mod table_metadata;

pub use data_source::{DataSource, MemoryDataSource, Row, RowStream};
pub use table_metadata::{TableEngine, TableMetadata};
