//! Catalog introspection for SQL Anywhere.
//!
//! Reads the engine's system catalog (SYS.SYSTAB and friends) and
//! reconstructs schema entities: tables, views, columns, indexes, primary
//! keys, and foreign keys. Every call re-queries the catalog from scratch;
//! nothing is cached, and data-access failures propagate unchanged.

use tracing::{debug, warn};

use crate::config::AdapterConfig;
use crate::core::identifier::{quote_string, split_owner_qualified};
use crate::core::schema::{
    ColumnDefinition, ForeignKeyDefinition, IndexDefinition, NativeType, QualifiedName,
    ReferentialAction,
};
use crate::core::traits::Executor;
use crate::core::value::Row;
use crate::defaults::classify_default;
use crate::error::Result;

/// Tag attached to catalog lookups for the executor's logging.
const SCHEMA_TAG: &str = "SCHEMA";

/// Catalog reader for SQL Anywhere.
///
/// Table arguments may be owner-qualified (`owner.table`); unqualified
/// names are scoped by the configured default owner, when one is set.
pub struct SqlAnyReader<E> {
    executor: E,
    default_owner: Option<String>,
}

/// Owner scoping for a per-table catalog lookup.
struct TableScope {
    name: String,
    owner: Option<String>,
}

impl TableScope {
    /// Predicate over the conventional aliases `t` (SYSTAB) and `u`
    /// (SYSUSER) used by every per-table query.
    fn predicate(&self) -> String {
        match &self.owner {
            Some(owner) => format!(
                "t.table_name = {} AND u.user_name = {}",
                quote_string(&self.name),
                quote_string(owner)
            ),
            None => format!("t.table_name = {}", quote_string(&self.name)),
        }
    }
}

impl<E: Executor> SqlAnyReader<E> {
    /// Create a reader over the given executor.
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            default_owner: None,
        }
    }

    /// Scope unqualified table names by this owner.
    #[must_use]
    pub fn with_default_owner(mut self, owner: impl Into<String>) -> Self {
        self.default_owner = Some(owner.into());
        self
    }

    /// Create a reader taking the default owner from configuration.
    pub fn from_config(config: &AdapterConfig, executor: E) -> Self {
        Self::new(executor).with_default_owner(config.owner.clone())
    }

    fn scope(&self, table: &str) -> TableScope {
        let (owner, bare) = split_owner_qualified(table);
        TableScope {
            name: bare.to_string(),
            owner: owner.map(str::to_string).or_else(|| self.default_owner.clone()),
        }
    }

    /// List user base tables as owner-qualified names.
    ///
    /// Objects owned by the engine's reserved identities are excluded, and
    /// only native-server tables are returned (no proxy/remote objects).
    pub async fn list_tables(&self) -> Result<Vec<QualifiedName>> {
        self.list_relations("BASE").await
    }

    /// List user views as owner-qualified names.
    pub async fn list_views(&self) -> Result<Vec<QualifiedName>> {
        self.list_relations("VIEW").await
    }

    async fn list_relations(&self, table_type: &str) -> Result<Vec<QualifiedName>> {
        // Creators 0, 3 and 5 are the SYS, PUBLIC and dbo identities
        let sql = format!(
            r#"SELECT u.user_name AS owner, t.table_name
  FROM SYS.SYSTAB t
  JOIN SYS.SYSUSER u ON u.user_id = t.creator
 WHERE t.creator NOT IN ( 0, 3, 5 )
   AND t.server_type = 1
   AND t.table_type_str = {}
 ORDER BY u.user_name, t.table_name"#,
            quote_string(table_type)
        );

        let rows = self.executor.query(&sql, SCHEMA_TAG).await?;
        let names = rows
            .iter()
            .map(|row| {
                Ok(QualifiedName::new(
                    row.text("owner")?,
                    row.text("table_name")?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("Listed {} {} relations", names.len(), table_type);
        Ok(names)
    }

    /// Load column definitions for a table, in declaration order.
    pub async fn list_columns(&self, table: &str) -> Result<Vec<ColumnDefinition>> {
        let scope = self.scope(table);
        let sql = format!(
            r#"SELECT c.column_name, d.domain_name, c.width, c.scale, c.nulls, c."default"
  FROM SYS.SYSTABCOL c
  JOIN SYS.SYSDOMAIN d ON d.domain_id = c.domain_id
  JOIN SYS.SYSTAB t ON t.table_id = c.table_id
  JOIN SYS.SYSUSER u ON u.user_id = t.creator
 WHERE {}
 ORDER BY c.column_id"#,
            scope.predicate()
        );

        let rows = self.executor.query(&sql, SCHEMA_TAG).await?;
        let columns = rows
            .iter()
            .map(|row| self.decode_column(table, row))
            .collect::<Result<Vec<_>>>()?;

        debug!("Loaded {} columns for {}", columns.len(), table);
        Ok(columns)
    }

    fn decode_column(&self, table: &str, row: &Row) -> Result<ColumnDefinition> {
        let domain = row.text("domain_name")?.to_lowercase();
        let width = row.int("width")?;
        let scale = row.int("scale")?;

        Ok(ColumnDefinition {
            table: table.to_string(),
            name: row.text("column_name")?.to_string(),
            sql_type: native_type_from_catalog(domain, width, scale),
            nullable: row.flag("nulls")?,
            default: classify_default(row.opt_text("default")?),
        })
    }

    /// List user-defined indexes for a table.
    ///
    /// The primary-key and foreign-key index categories the server
    /// maintains itself are excluded. Member columns come back in the
    /// catalog's declared sequence.
    pub async fn list_indexes(&self, table: &str) -> Result<Vec<IndexDefinition>> {
        let scope = self.scope(table);
        let sql = format!(
            r#"SELECT DISTINCT i.index_name, i."unique"
  FROM SYS.SYSIDX i
  JOIN SYS.SYSTAB t ON t.table_id = i.table_id
  JOIN SYS.SYSUSER u ON u.user_id = t.creator
 WHERE {} AND i.index_category > 2
 ORDER BY i.index_name"#,
            scope.predicate()
        );

        let rows = self.executor.query(&sql, SCHEMA_TAG).await?;
        let mut indexes = Vec::with_capacity(rows.len());

        for row in &rows {
            let name = row.text("index_name")?.to_string();
            // 1 = unique index, 2 = unique constraint; 5 is non-unique
            let unique = matches!(row.int("unique")?, 1 | 2);
            let columns = self.index_columns(&scope, &name).await?;

            if columns.is_empty() {
                warn!("Index {} on {} has no member columns, skipping", name, table);
                continue;
            }

            indexes.push(IndexDefinition {
                table: table.to_string(),
                name,
                unique,
                columns,
            });
        }

        debug!("Loaded {} indexes for {}", indexes.len(), table);
        Ok(indexes)
    }

    async fn index_columns(&self, scope: &TableScope, index: &str) -> Result<Vec<String>> {
        let sql = format!(
            r#"SELECT c.column_name
  FROM SYS.SYSIDXCOL ic
  JOIN SYS.SYSIDX i ON i.table_id = ic.table_id AND i.index_id = ic.index_id
  JOIN SYS.SYSTABCOL c ON c.table_id = ic.table_id AND c.column_id = ic.column_id
  JOIN SYS.SYSTAB t ON t.table_id = ic.table_id
  JOIN SYS.SYSUSER u ON u.user_id = t.creator
 WHERE {} AND i.index_name = {}
 ORDER BY ic.sequence"#,
            scope.predicate(),
            quote_string(index)
        );

        let rows = self.executor.query(&sql, SCHEMA_TAG).await?;
        rows.iter()
            .map(|row| Ok(row.text("column_name")?.to_string()))
            .collect()
    }

    /// Primary key column names in key order, or `None` when the table
    /// has no primary key index.
    pub async fn primary_key_columns(&self, table: &str) -> Result<Option<Vec<String>>> {
        let scope = self.scope(table);
        let sql = format!(
            r#"SELECT LIST(c.column_name ORDER BY ic.sequence) AS pk_columns
  FROM SYS.SYSIDX i
  JOIN SYS.SYSIDXCOL ic ON ic.table_id = i.table_id AND ic.index_id = i.index_id
  JOIN SYS.SYSTABCOL c ON c.table_id = ic.table_id AND c.column_id = ic.column_id
  JOIN SYS.SYSTAB t ON t.table_id = i.table_id
  JOIN SYS.SYSUSER u ON u.user_id = t.creator
 WHERE {} AND i.index_category = 1
 GROUP BY i.table_id, i.index_id"#,
            scope.predicate()
        );

        let rows = self.executor.query(&sql, SCHEMA_TAG).await?;
        let Some(row) = rows.first() else {
            return Ok(None);
        };

        let columns = row
            .text("pk_columns")?
            .split(',')
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>();

        Ok((!columns.is_empty()).then_some(columns))
    }

    /// First primary key column, or `None` without a primary key.
    ///
    /// Legacy singular accessor; prefer [`primary_key_columns`] for
    /// compound keys.
    ///
    /// [`primary_key_columns`]: Self::primary_key_columns
    pub async fn primary_key_column(&self, table: &str) -> Result<Option<String>> {
        Ok(self
            .primary_key_columns(table)
            .await?
            .and_then(|columns| columns.into_iter().next()))
    }

    /// List foreign keys for a table.
    ///
    /// Restricted to constraints backed by exactly one column pair;
    /// compound keys are excluded entirely rather than partially
    /// represented. Referential actions come from the trigger metadata the
    /// engine generates per constraint (`event = 'C'` for update, `'D'`
    /// for delete); no trigger means the engine restricts the change.
    pub async fn list_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKeyDefinition>> {
        let scope = self.scope(table);
        let sql = format!(
            r#"SELECT i.index_name AS constraint_name,
       fc.column_name AS column_name,
       pt.table_name AS referenced_table,
       pc.column_name AS referenced_column,
       ( SELECT tr.referential_action
           FROM SYS.SYSTRIGGER tr
          WHERE tr.foreign_table_id = fk.foreign_table_id
            AND tr.foreign_key_id = fk.foreign_index_id
            AND tr.event = 'C' ) AS on_update,
       ( SELECT tr.referential_action
           FROM SYS.SYSTRIGGER tr
          WHERE tr.foreign_table_id = fk.foreign_table_id
            AND tr.foreign_key_id = fk.foreign_index_id
            AND tr.event = 'D' ) AS on_delete
  FROM SYS.SYSFKEY fk
  JOIN SYS.SYSTAB t ON t.table_id = fk.foreign_table_id
  JOIN SYS.SYSUSER u ON u.user_id = t.creator
  JOIN SYS.SYSTAB pt ON pt.table_id = fk.primary_table_id
  JOIN SYS.SYSIDX i ON i.table_id = fk.foreign_table_id AND i.index_id = fk.foreign_index_id
  JOIN SYS.SYSIDXCOL ic ON ic.table_id = i.table_id AND ic.index_id = i.index_id
  JOIN SYS.SYSTABCOL fc ON fc.table_id = ic.table_id AND fc.column_id = ic.column_id
  JOIN SYS.SYSIDX pi ON pi.table_id = fk.primary_table_id AND pi.index_id = fk.primary_index_id
  JOIN SYS.SYSIDXCOL pic ON pic.table_id = pi.table_id AND pic.index_id = pi.index_id
  JOIN SYS.SYSTABCOL pc ON pc.table_id = pic.table_id AND pc.column_id = pic.column_id
 WHERE {}
   AND ( SELECT COUNT(*)
           FROM SYS.SYSIDXCOL n
          WHERE n.table_id = i.table_id AND n.index_id = i.index_id ) = 1
 ORDER BY i.index_name"#,
            scope.predicate()
        );

        let rows = self.executor.query(&sql, SCHEMA_TAG).await?;
        let keys = rows
            .iter()
            .map(|row| {
                Ok(ForeignKeyDefinition {
                    table: table.to_string(),
                    referenced_table: row.text("referenced_table")?.to_string(),
                    column: row.text("column_name")?.to_string(),
                    name: row.text("constraint_name")?.to_string(),
                    referenced_column: row.text("referenced_column")?.to_string(),
                    on_update: ReferentialAction::from_trigger_event(row.opt_text("on_update")?),
                    on_delete: ReferentialAction::from_trigger_event(row.opt_text("on_delete")?),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("Loaded {} foreign keys for {}", keys.len(), table);
        Ok(keys)
    }
}

/// Build a native type descriptor from catalog width/scale fields.
///
/// Width carries the character/binary length for sized families and the
/// precision for exact numerics.
fn native_type_from_catalog(domain: String, width: i64, scale: i64) -> NativeType {
    match domain.as_str() {
        "decimal" | "numeric" => NativeType {
            name: domain,
            limit: None,
            precision: Some(width as u32),
            scale: Some(scale as u32),
        },
        "char" | "nchar" | "varchar" | "nvarchar" | "binary" | "varbinary" => NativeType {
            name: domain,
            limit: Some(width as u32),
            precision: None,
            scale: None,
        },
        _ => NativeType::named(domain),
    }
}
