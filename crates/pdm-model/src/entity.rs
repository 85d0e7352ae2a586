use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::JavaType;

/// One column of a source table, normalized for code generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Raw code of the owning table.
    pub entity_name: String,
    /// Document `Id` of the column element.
    pub col_id: String,
    pub col_name: String,
    /// Java field identifier (lower camel case).
    pub name: String,
    /// Raw column type, including any length suffix.
    pub col_type: String,
    #[serde(rename = "type")]
    pub java_type: JavaType,
    pub type_qualified_name: Option<String>,
    pub col_length: Option<u32>,
    pub comment: Option<String>,
    pub mandatory: bool,
    pub is_primary_key: bool,
}

impl Field {
    /// Simple Java type name used in declarations.
    pub fn type_name(&self) -> &'static str {
        self.java_type.simple_name()
    }
}

/// One source table, normalized for code generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Java class identifier (upper camel case).
    pub name: String,
    /// Table name with the configured prefix applied.
    pub table_name: String,
    pub comment: Option<String>,
    pub creator: Option<String>,
    pub create_date: Option<DateTime<Utc>>,
    /// Document `Id` of the table element.
    pub table_id: String,
    /// Column `Id` of the primary key, when the table declares one.
    pub primary_key_col_id: Option<String>,
    /// Fields in column document order.
    pub fields: Vec<Field>,
    /// Qualified type names the fields require.
    pub dependencies: BTreeSet<String>,
}

impl Entity {
    /// Collect the distinct, non-blank qualified type names of `fields`.
    pub fn dependencies_of(fields: &[Field]) -> BTreeSet<String> {
        fields
            .iter()
            .filter_map(|field| field.type_qualified_name.as_deref())
            .filter(|name| !name.trim().is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn primary_key(&self) -> Option<&Field> {
        self.fields.iter().find(|field| field.is_primary_key)
    }

    pub fn mandatory_count(&self) -> usize {
        self.fields.iter().filter(|field| field.mandatory).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, java_type: JavaType) -> Field {
        Field {
            entity_name: "t_order".to_string(),
            col_id: format!("o_{name}"),
            col_name: name.to_string(),
            name: name.to_string(),
            col_type: java_type.simple_name().to_lowercase(),
            java_type,
            type_qualified_name: java_type.qualified_name().map(str::to_string),
            col_length: None,
            comment: None,
            mandatory: false,
            is_primary_key: false,
        }
    }

    #[test]
    fn dependencies_skip_builtin_types() {
        let fields = vec![
            field("amount", JavaType::BigDecimal),
            field("code", JavaType::String),
            field("total", JavaType::BigDecimal),
        ];
        let deps = Entity::dependencies_of(&fields);
        assert_eq!(deps.len(), 1);
        assert!(deps.contains("java.math.BigDecimal"));
    }

    #[test]
    fn dependencies_ignore_blank_names() {
        let mut blank = field("note", JavaType::String);
        blank.type_qualified_name = Some("  ".to_string());
        assert!(Entity::dependencies_of(&[blank]).is_empty());
    }

    #[test]
    fn field_serializes_java_type_as_type() {
        let json = serde_json::to_value(field("amount", JavaType::BigDecimal))
            .expect("serialize field");
        assert_eq!(json["type"], "BigDecimal");
        assert_eq!(json["typeQualifiedName"], "java.math.BigDecimal");
        assert_eq!(json["isPrimaryKey"], false);
    }
}
