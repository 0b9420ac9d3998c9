//! DDL synthesis for SQL Anywhere schema changes.
//!
//! [`SqlAnyEditor`] consumes migration intents and executes ordered
//! statement sequences, encoding the engine's quirks:
//!
//! - a case-only column rename is a no-op for the engine, so it runs as a
//!   two-phase rename through an intermediate name;
//! - an index referencing a column must be dropped before that column;
//! - `DISTINCT` requires every `ORDER BY` column in the select list.
//!
//! Multi-statement sequences are not wrapped in a transaction; a
//! mid-sequence failure leaves the catalog as the prior statements made it,
//! and serializing conflicting schema operations is the caller's job.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::core::identifier::{quote_ident, quote_string, quote_table, split_owner_qualified};
use crate::core::schema::ColumnDefault;
use crate::core::traits::{Executor, IndexBookkeeping};
use crate::error::{AdapterError, Result};
use crate::typemap::{AbstractType, MapperChain};

/// Tag attached to DDL-time catalog lookups for the executor's logging.
const SCHEMA_TAG: &str = "SCHEMA";

/// Suffix of the intermediate column name used by the two-phase case-only
/// rename. Deterministic, so an interrupted rename is detectable.
const RENAME_PENDING_SUFFIX: &str = "__rename_pending";

/// ASC/DESC and NULLS FIRST/LAST modifiers in an order expression.
static ORDER_MODIFIERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+(?:ASC|DESC)\b|\s+NULLS\s+(?:FIRST|LAST)\b").unwrap());

/// Requested column change for [`SqlAnyEditor::change_column`].
#[derive(Debug, Clone, Default)]
pub struct ColumnChange {
    /// Character/binary/integer size constraint.
    pub limit: Option<u32>,

    /// Numeric precision.
    pub precision: Option<u32>,

    /// Numeric scale.
    pub scale: Option<u32>,

    /// New default to declare with the altered type.
    pub default: Option<ColumnDefault>,

    /// Explicit nullability suffix. Left off the statement entirely when
    /// not requested.
    pub null: Option<bool>,
}

/// How [`SqlAnyEditor::remove_index`] resolves the index to drop.
#[derive(Debug, Clone)]
pub enum IndexSelector {
    /// Drop the index with this exact name.
    Name(String),

    /// Drop the conventionally named index over these columns.
    Columns(Vec<String>),
}

/// DDL editor for SQL Anywhere.
pub struct SqlAnyEditor<E> {
    executor: E,
    types: MapperChain,
    bookkeeping: Option<Box<dyn IndexBookkeeping>>,
}

impl<E: Executor> SqlAnyEditor<E> {
    /// Create an editor over the given executor with the standard type
    /// mapper chain.
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            types: MapperChain::sqlanywhere(),
            bookkeeping: None,
        }
    }

    /// Replace the type mapper chain.
    #[must_use]
    pub fn with_types(mut self, types: MapperChain) -> Self {
        self.types = types;
        self
    }

    /// Register a bookkeeping hook notified after renames.
    #[must_use]
    pub fn with_bookkeeping(mut self, bookkeeping: Box<dyn IndexBookkeeping>) -> Self {
        self.bookkeeping = Some(bookkeeping);
        self
    }

    /// Rename a table.
    pub async fn rename_table(&self, old: &str, new: &str) -> Result<()> {
        let sql = format!(
            "ALTER TABLE {} RENAME {}",
            quote_table(old)?,
            quote_ident(new)?
        );
        self.executor.execute(&sql).await?;

        if let Some(bookkeeping) = &self.bookkeeping {
            bookkeeping.table_renamed(old, new);
        }
        debug!("Renamed table {} to {}", old, new);
        Ok(())
    }

    /// Change a column's default value. `None` clears it to NULL.
    pub async fn change_column_default(
        &self,
        table: &str,
        column: &str,
        default: Option<&ColumnDefault>,
    ) -> Result<()> {
        let rendered = default.map(ColumnDefault::render).unwrap_or("NULL");
        let sql = format!(
            "ALTER TABLE {} ALTER {} DEFAULT {}",
            quote_table(table)?,
            quote_ident(column)?,
            rendered
        );
        self.executor.execute(&sql).await
    }

    /// Change a column's nullability.
    ///
    /// Tightening to NOT NULL with a supplied default first backfills
    /// existing NULLs to that default, then alters the column, in that
    /// order.
    pub async fn change_column_null(
        &self,
        table: &str,
        column: &str,
        nullable: bool,
        default: Option<&ColumnDefault>,
    ) -> Result<()> {
        if !nullable {
            if let Some(default) = default {
                let backfill = format!(
                    "UPDATE {} SET {} = {} WHERE {} IS NULL",
                    quote_table(table)?,
                    quote_ident(column)?,
                    default.render(),
                    quote_ident(column)?
                );
                self.executor.execute(&backfill).await?;
            }
        }

        let sql = format!(
            "ALTER TABLE {} ALTER {} {}",
            quote_table(table)?,
            quote_ident(column)?,
            if nullable { "NULL" } else { "NOT NULL" }
        );
        self.executor.execute(&sql).await
    }

    /// Change a column's type.
    pub async fn change_column(
        &self,
        table: &str,
        column: &str,
        ty: AbstractType,
        change: &ColumnChange,
    ) -> Result<()> {
        let native = self
            .types
            .resolve(ty, change.limit, change.precision, change.scale)?;

        let mut sql = format!(
            "ALTER TABLE {} ALTER {} {}",
            quote_table(table)?,
            quote_ident(column)?,
            native
        );
        if let Some(default) = &change.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(default.render());
        }
        match change.null {
            Some(true) => sql.push_str(" NULL"),
            Some(false) => sql.push_str(" NOT NULL"),
            None => {}
        }

        self.executor.execute(&sql).await
    }

    /// Rename a column.
    ///
    /// The engine treats a rename differing only by letter case as a
    /// no-op, so such renames run in two phases through the intermediate
    /// name [`pending_rename_name`] yields. An interruption between the
    /// phases leaves the column under that intermediate name; see
    /// [`resume_interrupted_rename`].
    ///
    /// [`resume_interrupted_rename`]: Self::resume_interrupted_rename
    pub async fn rename_column(&self, table: &str, old: &str, new: &str) -> Result<()> {
        if old != new && old.eq_ignore_ascii_case(new) {
            let pending = pending_rename_name(new);
            self.rename_column_stmt(table, old, &pending).await?;
            self.rename_column_stmt(table, &pending, new).await?;
        } else {
            self.rename_column_stmt(table, old, new).await?;
        }

        if let Some(bookkeeping) = &self.bookkeeping {
            bookkeeping.column_renamed(table, old, new);
        }
        debug!("Renamed column {}.{} to {}", table, old, new);
        Ok(())
    }

    async fn rename_column_stmt(&self, table: &str, old: &str, new: &str) -> Result<()> {
        let sql = format!(
            "ALTER TABLE {} RENAME {} TO {}",
            quote_table(table)?,
            quote_ident(old)?,
            quote_ident(new)?
        );
        self.executor.execute(&sql).await
    }

    /// Complete a case-only rename that was interrupted between its two
    /// phases. Returns `true` when a stranded intermediate column was
    /// found and renamed to `target`.
    pub async fn resume_interrupted_rename(&self, table: &str, target: &str) -> Result<bool> {
        let pending = pending_rename_name(target);
        let sql = format!(
            r#"SELECT c.column_name
  FROM SYS.SYSTABCOL c
  JOIN SYS.SYSTAB t ON t.table_id = c.table_id
  JOIN SYS.SYSUSER u ON u.user_id = t.creator
 WHERE {} AND c.column_name = {}"#,
            table_predicate(table),
            quote_string(&pending)
        );

        let rows = self.executor.query(&sql, SCHEMA_TAG).await?;
        if rows.is_empty() {
            return Ok(false);
        }

        self.rename_column_stmt(table, &pending, target).await?;
        debug!("Completed interrupted rename of {}.{}", table, target);
        Ok(true)
    }

    /// Remove one column.
    pub async fn remove_column(&self, table: &str, column: &str) -> Result<()> {
        self.remove_columns(table, &[column]).await
    }

    /// Remove columns, dropping referencing indexes first.
    ///
    /// The engine refuses to drop a column while an index references it,
    /// so every such index is discovered through the catalog and dropped
    /// ahead of the column. An index covering several of the removed
    /// columns is dropped exactly once.
    pub async fn remove_columns(&self, table: &str, columns: &[&str]) -> Result<()> {
        if columns.is_empty() {
            return Err(AdapterError::InvalidArgument(
                "remove_columns requires at least one column".to_string(),
            ));
        }

        let mut dropped: Vec<String> = Vec::new();
        for column in columns {
            for index in self.indexes_referencing(table, column).await? {
                if dropped.contains(&index) {
                    continue;
                }
                let sql = format!(
                    "DROP INDEX {}.{}",
                    quote_table(table)?,
                    quote_ident(&index)?
                );
                self.executor.execute(&sql).await?;
                dropped.push(index);
            }

            let sql = format!(
                "ALTER TABLE {} DROP {}",
                quote_table(table)?,
                quote_ident(column)?
            );
            self.executor.execute(&sql).await?;
        }

        debug!(
            "Removed {} columns from {} ({} indexes dropped)",
            columns.len(),
            table,
            dropped.len()
        );
        Ok(())
    }

    async fn indexes_referencing(&self, table: &str, column: &str) -> Result<Vec<String>> {
        let sql = format!(
            r#"SELECT DISTINCT i.index_name
  FROM SYS.SYSIDX i
  JOIN SYS.SYSIDXCOL ic ON ic.table_id = i.table_id AND ic.index_id = i.index_id
  JOIN SYS.SYSTABCOL c ON c.table_id = ic.table_id AND c.column_id = ic.column_id
  JOIN SYS.SYSTAB t ON t.table_id = i.table_id
  JOIN SYS.SYSUSER u ON u.user_id = t.creator
 WHERE {} AND c.column_name = {}
 ORDER BY i.index_name"#,
            table_predicate(table),
            quote_string(column)
        );

        let rows = self.executor.query(&sql, SCHEMA_TAG).await?;
        rows.iter()
            .map(|row| Ok(row.text("index_name")?.to_string()))
            .collect()
    }

    /// Drop an index.
    pub async fn remove_index(&self, table: &str, selector: &IndexSelector) -> Result<()> {
        let name = match selector {
            IndexSelector::Name(name) => name.clone(),
            IndexSelector::Columns(columns) => {
                let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
                index_name(table, &columns)?
            }
        };

        let sql = format!("DROP INDEX {}.{}", quote_table(table)?, quote_ident(&name)?);
        self.executor.execute(&sql).await
    }
}

/// The intermediate column name a case-only rename to `target` goes
/// through.
pub fn pending_rename_name(target: &str) -> String {
    format!("{}{}", target, RENAME_PENDING_SUFFIX)
}

/// Conventional name for an index over `columns`.
pub fn index_name(table: &str, columns: &[&str]) -> Result<String> {
    if columns.is_empty() {
        return Err(AdapterError::InvalidArgument(
            "index_name requires at least one column".to_string(),
        ));
    }
    let (_, bare) = split_owner_qualified(table);
    Ok(format!("index_{}_on_{}", bare, columns.join("_and_")))
}

/// Select-list columns for a DISTINCT query ordered by `order_by`.
///
/// The engine demands every ORDER BY column appear in the select list when
/// DISTINCT is used, so each order expression is appended as a positionally
/// aliased column with its ASC/DESC and NULLS FIRST/LAST modifiers
/// stripped.
pub fn columns_for_distinct_ordering(columns: &[&str], order_by: &[&str]) -> Vec<String> {
    let mut select: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
    for (position, expr) in order_by.iter().enumerate() {
        let stripped = ORDER_MODIFIERS.replace_all(expr, "");
        select.push(format!("{} AS alias_{}", stripped.trim(), position));
    }
    select
}

/// Predicate over the conventional `t`/`u` catalog aliases for a possibly
/// owner-qualified table name.
fn table_predicate(table: &str) -> String {
    match split_owner_qualified(table) {
        (Some(owner), bare) => format!(
            "t.table_name = {} AND u.user_name = {}",
            quote_string(bare),
            quote_string(owner)
        ),
        (None, bare) => format!("t.table_name = {}", quote_string(bare)),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::core::value::Row;
    use crate::testing::MockExecutor;

    fn editor(mock: &Arc<MockExecutor>) -> SqlAnyEditor<Arc<MockExecutor>> {
        SqlAnyEditor::new(Arc::clone(mock))
    }

    #[tokio::test]
    async fn test_rename_table() {
        let mock = Arc::new(MockExecutor::new());
        editor(&mock).rename_table("accounts", "ledgers").await.unwrap();

        assert_eq!(
            mock.statements(),
            vec![r#"ALTER TABLE "accounts" RENAME "ledgers""#]
        );
    }

    #[tokio::test]
    async fn test_rename_column_single_statement() {
        let mock = Arc::new(MockExecutor::new());
        editor(&mock)
            .rename_column("accounts", "foo", "bar")
            .await
            .unwrap();

        assert_eq!(
            mock.statements(),
            vec![r#"ALTER TABLE "accounts" RENAME "foo" TO "bar""#]
        );
    }

    #[tokio::test]
    async fn test_rename_column_case_only_two_phase() {
        let mock = Arc::new(MockExecutor::new());
        editor(&mock)
            .rename_column("accounts", "Foo", "foo")
            .await
            .unwrap();

        assert_eq!(
            mock.statements(),
            vec![
                r#"ALTER TABLE "accounts" RENAME "Foo" TO "foo__rename_pending""#,
                r#"ALTER TABLE "accounts" RENAME "foo__rename_pending" TO "foo""#,
            ]
        );
    }

    #[tokio::test]
    async fn test_rename_column_identical_name_is_single_statement() {
        let mock = Arc::new(MockExecutor::new());
        editor(&mock)
            .rename_column("accounts", "foo", "foo")
            .await
            .unwrap();

        assert_eq!(mock.statements().len(), 1);
    }

    #[tokio::test]
    async fn test_resume_interrupted_rename() {
        let mock = Arc::new(MockExecutor::new().respond(
            "c.column_name = 'foo__rename_pending'",
            vec![Row::new().with("column_name", "foo__rename_pending")],
        ));
        let done = editor(&mock)
            .resume_interrupted_rename("accounts", "foo")
            .await
            .unwrap();

        assert!(done);
        assert_eq!(
            mock.statements(),
            vec![r#"ALTER TABLE "accounts" RENAME "foo__rename_pending" TO "foo""#]
        );
    }

    #[tokio::test]
    async fn test_resume_interrupted_rename_nothing_stranded() {
        let mock = Arc::new(MockExecutor::new());
        let done = editor(&mock)
            .resume_interrupted_rename("accounts", "foo")
            .await
            .unwrap();

        assert!(!done);
        assert!(mock.statements().is_empty());
    }

    #[tokio::test]
    async fn test_change_column_default() {
        let mock = Arc::new(MockExecutor::new());
        let ed = editor(&mock);

        ed.change_column_default(
            "accounts",
            "status",
            Some(&ColumnDefault::Literal("'open'".to_string())),
        )
        .await
        .unwrap();
        ed.change_column_default(
            "accounts",
            "updated_at",
            Some(&ColumnDefault::Function("CURRENT TIMESTAMP".to_string())),
        )
        .await
        .unwrap();
        ed.change_column_default("accounts", "note", None)
            .await
            .unwrap();

        assert_eq!(
            mock.statements(),
            vec![
                r#"ALTER TABLE "accounts" ALTER "status" DEFAULT 'open'"#,
                r#"ALTER TABLE "accounts" ALTER "updated_at" DEFAULT CURRENT TIMESTAMP"#,
                r#"ALTER TABLE "accounts" ALTER "note" DEFAULT NULL"#,
            ]
        );
    }

    #[tokio::test]
    async fn test_change_column_null_backfills_first() {
        let mock = Arc::new(MockExecutor::new());
        editor(&mock)
            .change_column_null(
                "accounts",
                "status",
                false,
                Some(&ColumnDefault::Literal("'open'".to_string())),
            )
            .await
            .unwrap();

        assert_eq!(
            mock.statements(),
            vec![
                r#"UPDATE "accounts" SET "status" = 'open' WHERE "status" IS NULL"#,
                r#"ALTER TABLE "accounts" ALTER "status" NOT NULL"#,
            ]
        );
    }

    #[tokio::test]
    async fn test_change_column_null_loosening_is_one_statement() {
        let mock = Arc::new(MockExecutor::new());
        editor(&mock)
            .change_column_null("accounts", "status", true, None)
            .await
            .unwrap();

        assert_eq!(
            mock.statements(),
            vec![r#"ALTER TABLE "accounts" ALTER "status" NULL"#]
        );
    }

    #[tokio::test]
    async fn test_change_column_type_and_options() {
        let mock = Arc::new(MockExecutor::new());
        let ed = editor(&mock);

        ed.change_column(
            "accounts",
            "name",
            AbstractType::String,
            &ColumnChange {
                limit: Some(80),
                null: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        // No nullability suffix unless requested
        ed.change_column(
            "accounts",
            "flags",
            AbstractType::Boolean,
            &ColumnChange::default(),
        )
        .await
        .unwrap();

        assert_eq!(
            mock.statements(),
            vec![
                r#"ALTER TABLE "accounts" ALTER "name" varchar(80) NOT NULL"#,
                r#"ALTER TABLE "accounts" ALTER "flags" tinyint"#,
            ]
        );
    }

    #[tokio::test]
    async fn test_remove_columns_rejects_empty_list() {
        let mock = Arc::new(MockExecutor::new());
        let err = editor(&mock)
            .remove_columns("accounts", &[])
            .await
            .unwrap_err();

        assert!(matches!(err, AdapterError::InvalidArgument(_)));
        assert!(mock.statements().is_empty());
        assert!(mock.queries().is_empty());
    }

    #[tokio::test]
    async fn test_remove_column_drops_indexes_first() {
        let mock = Arc::new(MockExecutor::new().respond(
            "c.column_name = 'name'",
            vec![
                Row::new().with("index_name", "idx_name"),
                Row::new().with("index_name", "idx_owner_name"),
            ],
        ));
        editor(&mock).remove_column("accounts", "name").await.unwrap();

        assert_eq!(
            mock.statements(),
            vec![
                r#"DROP INDEX "accounts"."idx_name""#,
                r#"DROP INDEX "accounts"."idx_owner_name""#,
                r#"ALTER TABLE "accounts" DROP "name""#,
            ]
        );
    }

    #[tokio::test]
    async fn test_remove_columns_drops_shared_index_once() {
        let mock = Arc::new(
            MockExecutor::new()
                .respond(
                    "c.column_name = 'owner'",
                    vec![Row::new().with("index_name", "idx_owner_name")],
                )
                .respond(
                    "c.column_name = 'name'",
                    vec![Row::new().with("index_name", "idx_owner_name")],
                ),
        );
        editor(&mock)
            .remove_columns("accounts", &["owner", "name"])
            .await
            .unwrap();

        assert_eq!(
            mock.statements(),
            vec![
                r#"DROP INDEX "accounts"."idx_owner_name""#,
                r#"ALTER TABLE "accounts" DROP "owner""#,
                r#"ALTER TABLE "accounts" DROP "name""#,
            ]
        );
    }

    #[tokio::test]
    async fn test_remove_index_by_name_and_columns() {
        let mock = Arc::new(MockExecutor::new());
        let ed = editor(&mock);

        ed.remove_index("accounts", &IndexSelector::Name("idx_custom".to_string()))
            .await
            .unwrap();
        ed.remove_index(
            "accounts",
            &IndexSelector::Columns(vec!["owner".to_string(), "name".to_string()]),
        )
        .await
        .unwrap();

        assert_eq!(
            mock.statements(),
            vec![
                r#"DROP INDEX "accounts"."idx_custom""#,
                r#"DROP INDEX "accounts"."index_accounts_on_owner_and_name""#,
            ]
        );
    }

    #[tokio::test]
    async fn test_columns_for_distinct_ordering() {
        let select = columns_for_distinct_ordering(&["a"], &["b DESC", "c ASC NULLS LAST"]);
        assert_eq!(select, vec!["a", "b AS alias_0", "c AS alias_1"]);

        let untouched = columns_for_distinct_ordering(&["x", "y"], &[]);
        assert_eq!(untouched, vec!["x", "y"]);
    }

    #[tokio::test]
    async fn test_bookkeeping_hooks() {
        #[derive(Default)]
        struct Recorder {
            events: Mutex<Vec<String>>,
        }

        impl IndexBookkeeping for Recorder {
            fn table_renamed(&self, old: &str, new: &str) {
                self.events
                    .lock()
                    .unwrap()
                    .push(format!("table {} -> {}", old, new));
            }

            fn column_renamed(&self, table: &str, old: &str, new: &str) {
                self.events
                    .lock()
                    .unwrap()
                    .push(format!("column {}.{} -> {}", table, old, new));
            }
        }

        let recorder = Arc::new(Recorder::default());
        let mock = Arc::new(MockExecutor::new());
        let ed = SqlAnyEditor::new(Arc::clone(&mock))
            .with_bookkeeping(Box::new(Arc::clone(&recorder)));

        ed.rename_table("accounts", "ledgers").await.unwrap();
        ed.rename_column("ledgers", "Foo", "foo").await.unwrap();

        assert_eq!(
            *recorder.events.lock().unwrap(),
            vec![
                "table accounts -> ledgers".to_string(),
                "column ledgers.Foo -> foo".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_mid_sequence_failure_leaves_prior_statements() {
        let mock = Arc::new(
            MockExecutor::new()
                .respond(
                    "c.column_name = 'name'",
                    vec![Row::new().with("index_name", "idx_name")],
                )
                .fail_matching("ALTER TABLE"),
        );
        let err = editor(&mock).remove_column("accounts", "name").await;

        assert!(err.is_err());
        // The index drop already ran; there is no rollback
        assert_eq!(
            mock.statements(),
            vec![
                r#"DROP INDEX "accounts"."idx_name""#,
                r#"ALTER TABLE "accounts" DROP "name""#,
            ]
        );
    }
}
