//! Abstract-to-native type mapping.
//!
//! Mapping is an explicit chain of rules rather than an inheritance
//! hierarchy: the dialect-specific [`SqlAnyTypeMapper`] is consulted first
//! and declines types it has no opinion on, then the [`GenericTypeMapper`]
//! supplies the standard SQL rendition. [`MapperChain`] composes the two
//! (or any other arrangement the caller wants).

use std::fmt;

use crate::error::{AdapterError, Result};

/// Abstract column types as a migration DSL would express them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbstractType {
    /// Autoincrementing integer primary key.
    PrimaryKey,
    String,
    Text,
    Integer,
    BigInt,
    Float,
    Decimal,
    DateTime,
    Timestamp,
    Time,
    Date,
    Binary,
    Boolean,
}

impl fmt::Display for AbstractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AbstractType::PrimaryKey => "primary_key",
            AbstractType::String => "string",
            AbstractType::Text => "text",
            AbstractType::Integer => "integer",
            AbstractType::BigInt => "bigint",
            AbstractType::Float => "float",
            AbstractType::Decimal => "decimal",
            AbstractType::DateTime => "datetime",
            AbstractType::Timestamp => "timestamp",
            AbstractType::Time => "time",
            AbstractType::Date => "date",
            AbstractType::Binary => "binary",
            AbstractType::Boolean => "boolean",
        };
        write!(f, "{}", name)
    }
}

/// One rule set in the mapping chain.
///
/// Returns `None` when the rule set has nothing to say about a type, so
/// the next mapper in the chain gets a chance.
pub trait TypeMapper: Send + Sync {
    /// Map an abstract type plus size constraints to a native type token.
    fn map_type(
        &self,
        ty: AbstractType,
        limit: Option<u32>,
        precision: Option<u32>,
        scale: Option<u32>,
    ) -> Option<String>;
}

/// SQL Anywhere specific mapping rules.
#[derive(Debug, Clone, Default)]
pub struct SqlAnyTypeMapper;

impl SqlAnyTypeMapper {
    /// Create a new SQL Anywhere mapper.
    pub fn new() -> Self {
        Self
    }
}

impl TypeMapper for SqlAnyTypeMapper {
    fn map_type(
        &self,
        ty: AbstractType,
        limit: Option<u32>,
        _precision: Option<u32>,
        _scale: Option<u32>,
    ) -> Option<String> {
        match ty {
            AbstractType::Integer => Some(
                match limit {
                    Some(1) => "tinyint",
                    Some(2) => "smallint",
                    Some(3) | Some(4) | None => "integer",
                    Some(5..=8) => "bigint",
                    // Out-of-range limits get the 4-byte default
                    Some(_) => "integer",
                }
                .to_string(),
            ),

            // Only an explicit limit is dialect-specific; an unsized string
            // falls through to the generic rule
            AbstractType::String => limit.map(|n| format!("varchar({})", n)),

            // The native bit type cannot hold NULL, tinyint can
            AbstractType::Boolean => Some("tinyint".to_string()),

            AbstractType::Binary => Some(match limit {
                Some(n) => format!("binary({})", n),
                None => "long binary".to_string(),
            }),

            _ => None,
        }
    }
}

/// Standard SQL fallback rules, applied when no dialect rule matched.
#[derive(Debug, Clone, Default)]
pub struct GenericTypeMapper;

impl GenericTypeMapper {
    /// Create a new generic mapper.
    pub fn new() -> Self {
        Self
    }
}

impl TypeMapper for GenericTypeMapper {
    fn map_type(
        &self,
        ty: AbstractType,
        limit: Option<u32>,
        precision: Option<u32>,
        scale: Option<u32>,
    ) -> Option<String> {
        let token = match ty {
            AbstractType::PrimaryKey => {
                "integer primary key default autoincrement not null".to_string()
            }
            AbstractType::String => match limit {
                Some(n) => format!("varchar({})", n),
                None => "varchar(255)".to_string(),
            },
            AbstractType::Text => "long varchar".to_string(),
            AbstractType::Integer => "integer".to_string(),
            AbstractType::BigInt => "bigint".to_string(),
            AbstractType::Float => "float".to_string(),
            AbstractType::Decimal => match (precision, scale) {
                (Some(p), Some(s)) => format!("decimal({},{})", p, s),
                (Some(p), None) => format!("decimal({})", p),
                _ => "decimal".to_string(),
            },
            AbstractType::DateTime | AbstractType::Timestamp => "timestamp".to_string(),
            AbstractType::Time => "time".to_string(),
            AbstractType::Date => "date".to_string(),
            AbstractType::Binary => match limit {
                Some(n) => format!("binary({})", n),
                None => "long binary".to_string(),
            },
            AbstractType::Boolean => "bit".to_string(),
        };
        Some(token)
    }
}

/// An ordered chain of mapping rule sets; the first match wins.
pub struct MapperChain {
    mappers: Vec<Box<dyn TypeMapper>>,
}

impl MapperChain {
    /// Compose a chain from explicit rule sets.
    pub fn new(mappers: Vec<Box<dyn TypeMapper>>) -> Self {
        Self { mappers }
    }

    /// The standard SQL Anywhere chain: dialect rules first, generic
    /// fallback second.
    pub fn sqlanywhere() -> Self {
        Self::new(vec![
            Box::new(SqlAnyTypeMapper::new()),
            Box::new(GenericTypeMapper::new()),
        ])
    }

    /// Resolve an abstract type through the chain.
    pub fn resolve(
        &self,
        ty: AbstractType,
        limit: Option<u32>,
        precision: Option<u32>,
        scale: Option<u32>,
    ) -> Result<String> {
        self.mappers
            .iter()
            .find_map(|m| m.map_type(ty, limit, precision, scale))
            .ok_or_else(|| AdapterError::UnsupportedType(ty.to_string()))
    }
}

impl Default for MapperChain {
    fn default() -> Self {
        Self::sqlanywhere()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(ty: AbstractType, limit: Option<u32>) -> String {
        MapperChain::sqlanywhere()
            .resolve(ty, limit, None, None)
            .unwrap()
    }

    #[test]
    fn test_integer_limits() {
        assert_eq!(resolve(AbstractType::Integer, Some(1)), "tinyint");
        assert_eq!(resolve(AbstractType::Integer, Some(2)), "smallint");
        assert_eq!(resolve(AbstractType::Integer, Some(3)), "integer");
        assert_eq!(resolve(AbstractType::Integer, Some(4)), "integer");
        assert_eq!(resolve(AbstractType::Integer, None), "integer");
        assert_eq!(resolve(AbstractType::Integer, Some(5)), "bigint");
        assert_eq!(resolve(AbstractType::Integer, Some(8)), "bigint");
        // Out of range falls back to the 4-byte default
        assert_eq!(resolve(AbstractType::Integer, Some(9)), "integer");
    }

    #[test]
    fn test_boolean_ignores_limit() {
        assert_eq!(resolve(AbstractType::Boolean, None), "tinyint");
        assert_eq!(resolve(AbstractType::Boolean, Some(4)), "tinyint");
    }

    #[test]
    fn test_string_types() {
        assert_eq!(resolve(AbstractType::String, Some(255)), "varchar(255)");
        // No limit: generic fallback supplies the default width
        assert_eq!(resolve(AbstractType::String, None), "varchar(255)");
    }

    #[test]
    fn test_binary_types() {
        assert_eq!(resolve(AbstractType::Binary, Some(16)), "binary(16)");
        assert_eq!(resolve(AbstractType::Binary, None), "long binary");
    }

    #[test]
    fn test_fallback_types() {
        assert_eq!(resolve(AbstractType::Text, None), "long varchar");
        assert_eq!(resolve(AbstractType::DateTime, None), "timestamp");
        assert_eq!(resolve(AbstractType::Date, None), "date");
        assert_eq!(resolve(AbstractType::Float, None), "float");
    }

    #[test]
    fn test_decimal_precision_scale() {
        let chain = MapperChain::sqlanywhere();
        assert_eq!(
            chain
                .resolve(AbstractType::Decimal, None, Some(18), Some(2))
                .unwrap(),
            "decimal(18,2)"
        );
        assert_eq!(
            chain
                .resolve(AbstractType::Decimal, None, None, None)
                .unwrap(),
            "decimal"
        );
    }

    #[test]
    fn test_dialect_rules_win_over_generic() {
        // The generic mapper would say "bit"; the dialect rule must win
        let chain = MapperChain::sqlanywhere();
        assert_eq!(
            chain
                .resolve(AbstractType::Boolean, None, None, None)
                .unwrap(),
            "tinyint"
        );
        // A generic-only chain shows the difference
        let generic = MapperChain::new(vec![Box::new(GenericTypeMapper::new())]);
        assert_eq!(
            generic
                .resolve(AbstractType::Boolean, None, None, None)
                .unwrap(),
            "bit"
        );
    }
}
