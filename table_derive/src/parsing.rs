//! Parsing utilities for the `#[table]` attribute
//!
//! This module handles the parsing of `#[table(name = "...", engine = "...")]`
//! and compile-time validation of table names.

use syn::{Attribute, Error, LitStr, Result};

#[derive(Debug, PartialEq)]
pub struct TableInfo {
    pub name: String,
    pub engine: Option<String>,
}

pub fn parse_table_attributes(attrs: &[Attribute]) -> Result<TableInfo> {
    let mut table_name: Option<LitStr> = None;
    let mut engine: Option<LitStr> = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("table")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                table_name = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("engine") {
                engine = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("unknown table attribute, expected `name` or `engine`"))
            }
        })?;
    }

    let table_name = table_name.ok_or_else(|| {
        Error::new(
            proc_macro2::Span::call_site(),
            "table attribute is required: add #[table(name = \"table_name\")] to your struct",
        )
    })?;

    // Validate table name at compile time with proper error handling
    validate_table_name_syn(&table_name.value(), table_name.span())?;

    let engine = match engine {
        Some(lit) if lit.value().trim().is_empty() => {
            return Err(Error::new(lit.span(), "engine cannot be empty"));
        }
        Some(lit) => Some(lit.value()),
        None => None,
    };

    Ok(TableInfo {
        name: table_name.value(),
        engine,
    })
}

/// Validate table name and return syn::Error for better proc macro error handling
pub fn validate_table_name_syn(name: &str, span: proc_macro2::Span) -> Result<()> {
    validate_table_name(name)
        .map_err(|e| Error::new(span, format!("Invalid table name '{}': {}", name, e)))
}

/// A table name is one identifier or `database.table`
fn validate_table_name(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    let segments: Vec<&str> = name.split('.').collect();
    if segments.len() > 2 {
        return Err(format!(
            "Name '{}' has too many segments: expected `table` or `database.table`",
            name
        ));
    }

    segments.into_iter().try_for_each(validate_identifier)
}

fn validate_identifier(name: &str) -> std::result::Result<(), String> {
    // Check first character (must be letter or underscore)
    let first_char = name
        .chars()
        .next()
        .ok_or_else(|| "Name segment cannot be empty".to_string())?;
    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(format!(
            "Name '{}' must start with a letter or underscore",
            name
        ));
    }

    // Check all characters (alphanumeric or underscore only)
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("Name '{}' contains invalid characters: only alphanumeric characters and underscores are allowed", name));
    }

    if is_reserved_keyword(name) {
        return Err(format!("Name '{}' is a reserved SQL keyword", name));
    }

    Ok(())
}

/// Keywords that would break the generated statements when used unquoted
fn is_reserved_keyword(name: &str) -> bool {
    const RESERVED_KEYWORDS: &[&str] = &[
        // SQL Standard keywords
        "SELECT",
        "INSERT",
        "UPDATE",
        "DELETE",
        "FROM",
        "WHERE",
        "JOIN",
        "ON",
        "AS",
        "AND",
        "OR",
        "NOT",
        "NULL",
        "IN",
        "LIKE",
        "BETWEEN",
        "ORDER",
        "BY",
        "GROUP",
        "HAVING",
        "LIMIT",
        "OFFSET",
        "UNION",
        "ALL",
        "DISTINCT",
        "ALTER",
        "TABLE",
        // ClickHouse specific keywords
        "FINAL",
        "PREWHERE",
        "SAMPLE",
        "ARRAY",
        "SETTINGS",
        "FORMAT",
        "GLOBAL",
        "ANY",
        "ASOF",
    ];

    RESERVED_KEYWORDS.contains(&name.to_ascii_uppercase().as_str())
}
