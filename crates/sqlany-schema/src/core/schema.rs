//! Schema entity types for tables, views, columns, indexes, and constraints.
//!
//! These types are the structured form of what the engine's catalog
//! describes. They are constructed transiently per introspection call;
//! nothing here is cached and the caller owns entity lifetime.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An owner-qualified object name (`owner.name`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    /// Owning user.
    pub owner: String,

    /// Bare object name.
    pub name: String,
}

impl QualifiedName {
    /// Create a qualified name from owner and bare name.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.name)
    }
}

/// Native type descriptor for a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeType {
    /// Type name as declared in the domain catalog (e.g. "varchar").
    pub name: String,

    /// Character/binary length, when the type carries one.
    pub limit: Option<u32>,

    /// Numeric precision.
    pub precision: Option<u32>,

    /// Numeric scale.
    pub scale: Option<u32>,
}

impl NativeType {
    /// A bare type with no size information.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            limit: None,
            precision: None,
            scale: None,
        }
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(limit) = self.limit {
            write!(f, "{}({})", self.name, limit)
        } else if let Some(precision) = self.precision {
            match self.scale {
                Some(scale) => write!(f, "{}({},{})", self.name, precision, scale),
                None => write!(f, "{}({})", self.name, precision),
            }
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// A column default: either a constant stored with the column, or an
/// expression the engine evaluates at insert time.
///
/// The two cases are mutually exclusive by construction; a column either
/// has one of them or none at all (`Option<ColumnDefault>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnDefault {
    /// A literal SQL value, kept exactly as the catalog stores it
    /// (numeric text, or a single-quoted string literal).
    Literal(String),

    /// A computed expression invoking an engine builtin
    /// (e.g. `CURRENT TIMESTAMP`).
    Function(String),
}

impl ColumnDefault {
    /// The literal text, when this is a literal default.
    pub fn literal(&self) -> Option<&str> {
        match self {
            ColumnDefault::Literal(s) => Some(s),
            ColumnDefault::Function(_) => None,
        }
    }

    /// The function expression, when this is a computed default.
    pub fn function(&self) -> Option<&str> {
        match self {
            ColumnDefault::Literal(_) => None,
            ColumnDefault::Function(s) => Some(s),
        }
    }

    /// Render the default for use in a DDL `DEFAULT` clause.
    ///
    /// Both cases are already valid SQL text: literals carry their own
    /// quoting and expressions are emitted verbatim.
    pub fn render(&self) -> &str {
        match self {
            ColumnDefault::Literal(s) | ColumnDefault::Function(s) => s,
        }
    }
}

/// Column metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Owning table name, as passed to the lookup.
    pub table: String,

    /// Column name.
    pub name: String,

    /// Native type descriptor.
    pub sql_type: NativeType,

    /// Whether the column allows NULL.
    pub nullable: bool,

    /// Default value, when one is declared.
    pub default: Option<ColumnDefault>,
}

/// Index metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDefinition {
    /// Owning table name.
    pub table: String,

    /// Index name.
    pub name: String,

    /// Whether the index enforces uniqueness.
    pub unique: bool,

    /// Member column names in catalog-declared order. Never empty.
    pub columns: Vec<String>,
}

/// Behavior applied to a dependent row when its referenced row is updated
/// or deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferentialAction {
    /// Propagate the change to dependent rows.
    Cascade,

    /// Reset dependent columns to their declared default.
    SetDefault,

    /// Reset dependent columns to NULL.
    Nullify,

    /// Reject the change while dependent rows exist.
    Restrict,
}

impl ReferentialAction {
    /// Decode the single-character action code stored in trigger metadata.
    ///
    /// An absent trigger means the engine falls back to restricting the
    /// change, so `None` decodes to [`ReferentialAction::Restrict`].
    pub fn from_trigger_event(code: Option<&str>) -> Self {
        match code {
            Some("C") => ReferentialAction::Cascade,
            Some("D") => ReferentialAction::SetDefault,
            Some("N") => ReferentialAction::Nullify,
            _ => ReferentialAction::Restrict,
        }
    }

    /// The SQL phrase for this action.
    pub fn as_sql(&self) -> &'static str {
        match self {
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetDefault => "SET DEFAULT",
            ReferentialAction::Nullify => "SET NULL",
            ReferentialAction::Restrict => "RESTRICT",
        }
    }
}

/// Foreign key metadata.
///
/// Exactly one column pair per constraint: compound keys are excluded at
/// the catalog-query level and never partially represented here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyDefinition {
    /// Source (referencing) table name.
    pub table: String,

    /// Target (referenced) table name.
    pub referenced_table: String,

    /// Referencing column.
    pub column: String,

    /// Constraint name.
    pub name: String,

    /// Referenced column.
    pub referenced_column: String,

    /// Action on update of the referenced row.
    pub on_update: ReferentialAction,

    /// Action on delete of the referenced row.
    pub on_delete: ReferentialAction,
}
