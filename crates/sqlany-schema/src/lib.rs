//! # sqlany-schema
//!
//! Schema introspection and DDL generation for SAP SQL Anywhere.
//!
//! This library translates between an abstract relational-schema model and
//! the engine's native surface in both directions:
//!
//! - **Type mapping**: abstract column types plus size constraints become
//!   native DDL type tokens, through an explicit dialect-then-generic
//!   mapper chain
//! - **Catalog introspection**: the engine's system catalog is decoded
//!   into tables, views, columns, indexes, primary keys, and foreign keys
//! - **DDL synthesis**: migration intents become ordered statement
//!   sequences that work around the engine's quirks (case-insensitive
//!   rename no-ops, index-before-column drop ordering, DISTINCT/ORDER BY
//!   select-list rules)
//!
//! Connection management, transactions, and query execution belong to the
//! [`Executor`] implementation supplied by the caller.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sqlany_schema::{SqlAnyEditor, SqlAnyReader};
//!
//! let reader = SqlAnyReader::new(executor.clone()).with_default_owner("DBA");
//! for table in reader.list_tables().await? {
//!     println!("{}: {:?}", table, reader.primary_key_columns(&table.name).await?);
//! }
//!
//! let editor = SqlAnyEditor::new(executor);
//! editor.rename_column("accounts", "Name", "name").await?;
//! ```

pub mod catalog;
pub mod config;
pub mod core;
pub mod ddl;
pub mod defaults;
pub mod error;
pub mod typemap;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for convenient access
pub use catalog::SqlAnyReader;
pub use config::{AdapterConfig, ConnectionConfig};
pub use crate::core::schema::{
    ColumnDefault, ColumnDefinition, ForeignKeyDefinition, IndexDefinition, NativeType,
    QualifiedName, ReferentialAction,
};
pub use crate::core::traits::{Executor, IndexBookkeeping};
pub use crate::core::value::{Row, SqlValue};
pub use ddl::{
    columns_for_distinct_ordering, index_name, ColumnChange, IndexSelector, SqlAnyEditor,
};
pub use defaults::classify_default;
pub use error::{AdapterError, Result};
pub use typemap::{AbstractType, GenericTypeMapper, MapperChain, SqlAnyTypeMapper, TypeMapper};
