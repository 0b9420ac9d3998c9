//! Catalog row values and typed decoding.
//!
//! Catalog result sets arrive as column-name → value mappings. The [`Row`]
//! accessors resolve a fixed, expected column name to a typed field and fail
//! fast when the column is absent or holds the wrong value type, rather than
//! silently yielding an empty value.

use std::collections::HashMap;

use crate::error::{AdapterError, Result};

/// A single value decoded from a catalog result set.
///
/// The catalog surface only produces a handful of shapes: identifiers and
/// raw default text (`Text`), counts and discriminators (`Int`), flags
/// (`Bool`, or the catalog's `'Y'`/`'N'` characters), and SQL NULL.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// SQL NULL.
    Null,

    /// Signed integer (catalog ids, counts, discriminators).
    Int(i64),

    /// Text data (identifiers, raw default values, delimited lists).
    Text(String),

    /// Boolean flag.
    Bool(bool),
}

impl SqlValue {
    /// Short name of the value's shape, used in decode errors.
    fn kind(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::Int(_) => "integer",
            SqlValue::Text(_) => "text",
            SqlValue::Bool(_) => "boolean",
        }
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

/// One catalog result row.
#[derive(Debug, Clone, Default)]
pub struct Row {
    values: HashMap<String, SqlValue>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column value (builder style).
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.values.insert(column.into(), value.into());
        self
    }

    /// Add a column value.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<SqlValue>) {
        self.values.insert(column.into(), value.into());
    }

    /// Look up a column, failing when it is absent from the row.
    fn value(&self, column: &str) -> Result<&SqlValue> {
        self.values
            .get(column)
            .ok_or_else(|| AdapterError::MissingColumn(column.to_string()))
    }

    /// Decode a non-null text column.
    pub fn text(&self, column: &str) -> Result<&str> {
        match self.value(column)? {
            SqlValue::Text(s) => Ok(s),
            other => Err(AdapterError::decode(column, "text", other.kind())),
        }
    }

    /// Decode a text column that may be NULL.
    pub fn opt_text(&self, column: &str) -> Result<Option<&str>> {
        match self.value(column)? {
            SqlValue::Null => Ok(None),
            SqlValue::Text(s) => Ok(Some(s)),
            other => Err(AdapterError::decode(column, "text", other.kind())),
        }
    }

    /// Decode an integer column.
    pub fn int(&self, column: &str) -> Result<i64> {
        match self.value(column)? {
            SqlValue::Int(v) => Ok(*v),
            other => Err(AdapterError::decode(column, "integer", other.kind())),
        }
    }

    /// Decode a flag column.
    ///
    /// Accepts a boolean, a non-zero integer, or the catalog's `'Y'`/`'N'`
    /// character flags.
    pub fn flag(&self, column: &str) -> Result<bool> {
        match self.value(column)? {
            SqlValue::Bool(v) => Ok(*v),
            SqlValue::Int(v) => Ok(*v != 0),
            SqlValue::Text(s) if s.eq_ignore_ascii_case("Y") => Ok(true),
            SqlValue::Text(s) if s.eq_ignore_ascii_case("N") => Ok(false),
            other => Err(AdapterError::decode(column, "flag", other.kind())),
        }
    }
}

impl FromIterator<(String, SqlValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, SqlValue)>>(iter: I) -> Self {
        Row {
            values: iter.into_iter().collect(),
        }
    }
}
