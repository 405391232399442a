//! Procedural macros for ClickHouse table metadata
//!
//! This crate provides the `TableMetadata` derive and the `#[model]` attribute,
//! which wire a struct to a table name and storage engine.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod codegen;
mod model_macro;
mod parsing;

use codegen::generate_table_metadata_impl;
use model_macro::model_attribute;
use parsing::parse_table_attributes;

/// Derive macro for the TableMetadata trait
///
/// ```rust,ignore
/// #[derive(Debug, Clone, serde::Deserialize, TableMetadata)]
/// #[table(name = "analytics.events", engine = "ReplacingMergeTree")]
/// pub struct Event {
///     pub id: u64,
///     pub kind: String,
/// }
/// ```
///
/// `engine` defaults to `MergeTree`. Table names may be qualified with a
/// database (`db.table`); every segment is validated at compile time.
#[proc_macro_derive(TableMetadata, attributes(table))]
pub fn derive_table_metadata(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let table_info = match parse_table_attributes(&input.attrs) {
        Ok(info) => info,
        Err(e) => return e.to_compile_error().into(),
    };

    TokenStream::from(generate_table_metadata_impl(&input, &table_info))
}

/// Convenience attribute macro that adds the derives a queryable table needs
///
/// ```rust,ignore
/// #[model]
/// #[table(name = "sales")]
/// pub struct Sale {
///     pub id: u64,
///     pub price: f64,
/// }
/// ```
#[proc_macro_attribute]
pub fn model(attr: TokenStream, item: TokenStream) -> TokenStream {
    model_attribute(attr, item)
}
