//! Core traits at the seams of the adapter.
//!
//! - [`Executor`]: the external data-access collaborator that actually
//!   talks to the engine. The adapter issues catalog queries and DDL
//!   statements through it and never manages connections itself.
//! - [`IndexBookkeeping`]: hook notified when renames invalidate index
//!   metadata tracked by upstream tooling.

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::value::Row;
use crate::error::Result;

/// Executes SQL against the engine on behalf of the adapter.
///
/// Implementations own connection management, transactions, timeouts, and
/// cancellation. The adapter performs no retries of its own: a failed
/// catalog query or DDL statement propagates unchanged to the caller.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Run a query and return its rows as column-name → value mappings.
    ///
    /// The `tag` labels the query for the executor's logging (catalog
    /// lookups are tagged distinctly from DDL).
    async fn query(&self, sql: &str, tag: &str) -> Result<Vec<Row>>;

    /// Run a statement that produces no meaningful result set.
    async fn execute(&self, sql: &str) -> Result<()>;
}

#[async_trait]
impl<T: Executor + ?Sized> Executor for Arc<T> {
    async fn query(&self, sql: &str, tag: &str) -> Result<Vec<Row>> {
        (**self).query(sql, tag).await
    }

    async fn execute(&self, sql: &str) -> Result<()> {
        (**self).execute(sql).await
    }
}

/// Observer for renames that affect index metadata kept by upstream
/// tooling (e.g. a migration runner tracking indexes by name).
///
/// Both hooks default to no-ops.
pub trait IndexBookkeeping: Send + Sync {
    /// A table was renamed.
    fn table_renamed(&self, _old: &str, _new: &str) {}

    /// A column was renamed.
    fn column_renamed(&self, _table: &str, _old: &str, _new: &str) {}
}

impl<T: IndexBookkeeping + ?Sized> IndexBookkeeping for Arc<T> {
    fn table_renamed(&self, old: &str, new: &str) {
        (**self).table_renamed(old, new)
    }

    fn column_renamed(&self, table: &str, old: &str, new: &str) {
        (**self).column_renamed(table, old, new)
    }
}
