//! Core abstractions shared by the catalog reader and the DDL editor.
//!
//! - [`schema`]: table, column, index, and constraint metadata types
//! - [`value`]: typed decoding of catalog result rows
//! - [`identifier`]: the single identifier/value quoting boundary
//! - [`traits`]: the data-access seam and rename bookkeeping hook

pub mod identifier;
pub mod schema;
pub mod traits;
pub mod value;

// Re-export commonly used types for convenience
pub use schema::{
    ColumnDefault, ColumnDefinition, ForeignKeyDefinition, IndexDefinition, NativeType,
    QualifiedName, ReferentialAction,
};
pub use traits::{Executor, IndexBookkeeping};
pub use value::{Row, SqlValue};
