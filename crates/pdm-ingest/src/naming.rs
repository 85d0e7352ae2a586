//! Table and column name transforms.
//!
//! Names are split on underscores only; digits and existing capitals do not
//! start new words. The configured table prefix is part of the stored table
//! name but never part of the derived class name.

use convert_case::{Case, Casing};

/// `user_account` -> `UserAccount`.
pub fn upper_camel(name: &str) -> String {
    name.from_case(Case::Snake).to_case(Case::Pascal)
}

/// `user_name` -> `userName`.
pub fn lower_camel(name: &str) -> String {
    name.from_case(Case::Snake).to_case(Case::Camel)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamingOptions {
    /// Prefix shared by all table names; blank disables prefixing.
    pub table_prefix: String,
}

impl NamingOptions {
    pub fn new(table_prefix: impl Into<String>) -> Self {
        Self {
            table_prefix: table_prefix.into(),
        }
    }

    fn prefix(&self) -> Option<&str> {
        let prefix = self.table_prefix.as_str();
        (!prefix.trim().is_empty()).then_some(prefix)
    }

    /// Table name as stored on the entity: the code with the prefix applied
    /// once.
    pub fn prefixed_table_name(&self, code: &str) -> String {
        match self.prefix() {
            Some(prefix) if !code.starts_with(prefix) => format!("{prefix}{code}"),
            _ => code.to_string(),
        }
    }

    /// Class name for a table code, derived after stripping the prefix.
    pub fn entity_name(&self, code: &str) -> String {
        let stripped = self
            .prefix()
            .and_then(|prefix| code.strip_prefix(prefix))
            .unwrap_or(code);
        let name = upper_camel(stripped);
        if !name.is_empty() {
            return name;
        }
        let name = upper_camel(code);
        if name.is_empty() {
            code.to_string()
        } else {
            name
        }
    }

    /// Field name for a column, falling back to the raw name when the
    /// conversion leaves nothing (e.g. `___`).
    pub fn field_name(&self, col_name: &str) -> String {
        let name = lower_camel(col_name);
        if name.is_empty() {
            col_name.to_string()
        } else {
            name
        }
    }
}
