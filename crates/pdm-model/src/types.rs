//! Column type vocabulary and its Java mapping.
//!
//! PDM columns carry vendor type strings such as `varchar(255)` or
//! `decimal(10,2)`. Only the bare keyword before the first parenthesis takes
//! part in the lookup, so length and precision suffixes never change the
//! mapped type.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Java types that generated entity fields can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JavaType {
    Boolean,
    Integer,
    Long,
    Float,
    Double,
    /// Arbitrary-precision decimal (`java.math.BigDecimal`).
    BigDecimal,
    String,
    /// Date/time value (`java.util.Date`).
    Date,
}

impl JavaType {
    /// Simple (unqualified) type name as written in a field declaration.
    pub const fn simple_name(self) -> &'static str {
        match self {
            JavaType::Boolean => "Boolean",
            JavaType::Integer => "Integer",
            JavaType::Long => "Long",
            JavaType::Float => "Float",
            JavaType::Double => "Double",
            JavaType::BigDecimal => "BigDecimal",
            JavaType::String => "String",
            JavaType::Date => "Date",
        }
    }

    /// Fully-qualified name for types outside `java.lang`.
    ///
    /// Returns `None` for types that are in scope without an import.
    pub const fn qualified_name(self) -> Option<&'static str> {
        match self {
            JavaType::BigDecimal => Some("java.math.BigDecimal"),
            JavaType::Date => Some("java.util.Date"),
            _ => None,
        }
    }

    pub const fn needs_import(self) -> bool {
        self.qualified_name().is_some()
    }
}

impl fmt::Display for JavaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.simple_name())
    }
}

/// Keyword table shipped with the mapper. Keywords are lower-case and matched
/// case-sensitively.
const STANDARD_MAPPINGS: &[(&str, JavaType)] = &[
    ("bit", JavaType::Boolean),
    // Integers
    ("tinyint", JavaType::Integer),
    ("smallint", JavaType::Integer),
    ("int", JavaType::Integer),
    ("bigint", JavaType::Long),
    // Floating point and decimals
    ("float", JavaType::Float),
    ("double", JavaType::Double),
    ("decimal", JavaType::BigDecimal),
    // Text
    ("char", JavaType::String),
    ("varchar", JavaType::String),
    ("text", JavaType::String),
    ("longtext", JavaType::String),
    ("json", JavaType::String),
    // Dates
    ("time", JavaType::Date),
    ("date", JavaType::Date),
    ("datetime", JavaType::Date),
    ("timestamp", JavaType::Date),
];

/// Immutable lookup table from column type keywords to Java types.
///
/// The table is never written after construction, so a single instance can be
/// shared by any number of concurrent extractions.
#[derive(Debug, Clone)]
pub struct TypeMapper {
    table: BTreeMap<&'static str, JavaType>,
}

impl TypeMapper {
    /// The process-wide mapper built from the standard keyword table.
    ///
    /// Initialized on first use.
    pub fn standard() -> &'static TypeMapper {
        static STANDARD: OnceLock<TypeMapper> = OnceLock::new();
        STANDARD.get_or_init(|| Self::from_entries(STANDARD_MAPPINGS.iter().copied()))
    }

    /// Build a mapper from explicit keyword entries. Later entries win.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, JavaType)>,
    {
        Self {
            table: entries.into_iter().collect(),
        }
    }

    /// Strip a length/precision suffix: `decimal(10,2)` becomes `decimal`.
    pub fn base_keyword(col_type: &str) -> &str {
        let keyword = match col_type.find('(') {
            Some(idx) => &col_type[..idx],
            None => col_type,
        };
        keyword.trim()
    }

    /// Look up a raw column type, returning `None` for unknown keywords.
    pub fn lookup(&self, col_type: &str) -> Option<JavaType> {
        self.table.get(Self::base_keyword(col_type)).copied()
    }

    /// Map a raw column type to its Java type.
    ///
    /// Unknown keywords are an error rather than a fallback type; a field with
    /// a guessed type would silently generate the wrong code.
    pub fn map(&self, col_type: &str) -> Result<JavaType> {
        self.lookup(col_type)
            .ok_or_else(|| ModelError::UnmappedType {
                col_type: col_type.to_string(),
            })
    }

    /// All keyword entries in keyword order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, JavaType)> + '_ {
        self.table.iter().map(|(keyword, java_type)| (*keyword, *java_type))
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_covers_every_keyword() {
        let mapper = TypeMapper::standard();
        assert_eq!(mapper.len(), STANDARD_MAPPINGS.len());
        for (keyword, expected) in STANDARD_MAPPINGS {
            assert_eq!(mapper.lookup(keyword), Some(*expected), "{keyword}");
        }
    }

    #[test]
    fn suffix_is_stripped_before_lookup() {
        let mapper = TypeMapper::standard();
        assert_eq!(mapper.map("varchar(255)"), mapper.map("varchar"));
        assert_eq!(mapper.map("decimal(10,2)"), Ok(JavaType::BigDecimal));
        assert_eq!(TypeMapper::base_keyword("decimal (10,2)"), "decimal");
    }

    #[test]
    fn unknown_keyword_is_an_error() {
        let err = TypeMapper::standard().map("geometry").unwrap_err();
        assert_eq!(
            err,
            ModelError::UnmappedType {
                col_type: "geometry".to_string()
            }
        );
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(TypeMapper::standard().lookup("VARCHAR(20)"), None);
    }

    #[test]
    fn only_decimal_and_dates_need_imports() {
        let mapper = TypeMapper::standard();
        let qualified: Vec<_> = mapper
            .entries()
            .filter(|(_, java_type)| java_type.needs_import())
            .map(|(keyword, _)| keyword)
            .collect();
        assert_eq!(
            qualified,
            vec!["date", "datetime", "decimal", "time", "timestamp"]
        );
        assert_eq!(
            JavaType::BigDecimal.qualified_name(),
            Some("java.math.BigDecimal")
        );
        assert_eq!(JavaType::Date.qualified_name(), Some("java.util.Date"));
        assert_eq!(JavaType::Long.qualified_name(), None);
    }
}
