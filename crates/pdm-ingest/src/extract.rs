//! Schema extraction from a parsed PDM document.
//!
//! PDM documents describe relationships through `Id`/`Ref` attribute pairs
//! rather than nesting. A table marks its primary key by referencing a named
//! key object, and that key in turn references its columns:
//!
//! ```text
//! Table/PrimaryKey/Key[@Ref=K] -> Table/Keys/Key[@Id=K]/Key.Columns/Column[1]/@Ref -> Column/@Id
//! ```
//!
//! Only the first column of the primary key is used; composite keys are not
//! modeled.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, debug_span, info, info_span};

use pdm_model::{Entity, Field, TypeMapper};

use crate::error::{IngestError, Result};
use crate::naming::NamingOptions;
use crate::xml::XmlElement;

const TABLES: &str = "Tables";
const TABLE: &str = "Table";
const CODE: &str = "Code";
const COMMENT: &str = "Comment";
const CREATOR: &str = "Creator";
const CREATION_DATE: &str = "CreationDate";
const PRIMARY_KEY: &str = "PrimaryKey";
const KEYS: &str = "Keys";
const KEY: &str = "Key";
const KEY_COLUMNS: &str = "Key.Columns";
const COLUMNS: &str = "Columns";
const COLUMN: &str = "Column";
const DATA_TYPE: &str = "DataType";
const LENGTH: &str = "Length";
const COLUMN_MANDATORY: &str = "Column.Mandatory";
const ID: &str = "Id";
const REF: &str = "Ref";

/// Text of `Column.Mandatory` for non-nullable columns.
pub const MANDATORY_FLAG: &str = "1";

/// Options for schema extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub naming: NamingOptions,
}

impl ExtractOptions {
    pub fn with_table_prefix(table_prefix: impl Into<String>) -> Self {
        Self {
            naming: NamingOptions::new(table_prefix),
        }
    }
}

/// Extract one entity per `Table` element, in document order.
///
/// Any missing mandatory structure or unmappable column type aborts the whole
/// run; no partial entity list is returned.
pub fn extract_entities(
    root: &XmlElement,
    options: &ExtractOptions,
    mapper: &TypeMapper,
) -> Result<Vec<Entity>> {
    let span = info_span!("extract", prefix = %options.naming.table_prefix);
    let _guard = span.enter();

    let tables = root
        .descendant(TABLES)
        .ok_or(IngestError::MissingElement {
            element: TABLES,
            table: None,
        })?;

    let mut entities = Vec::new();
    for element in tables.elements() {
        if element.name != TABLE {
            debug!(element = %element.name, "skipping non-table element");
            continue;
        }
        entities.push(extract_table(element, options, mapper)?);
    }

    let field_count: usize = entities.iter().map(|entity| entity.fields.len()).sum();
    info!(
        entities = entities.len(),
        fields = field_count,
        "extracted PDM schema"
    );
    Ok(entities)
}

fn extract_table(
    table: &XmlElement,
    options: &ExtractOptions,
    mapper: &TypeMapper,
) -> Result<Entity> {
    let code = table
        .child_text(CODE)
        .ok_or(IngestError::MissingElement {
            element: CODE,
            table: None,
        })?;
    let span = debug_span!("table", table = code);
    let _guard = span.enter();

    let table_id = table
        .attribute(ID)
        .ok_or_else(|| IngestError::MissingAttribute {
            attribute: ID,
            element: TABLE,
            table: Some(code.to_string()),
        })?;

    let create_date = optional_text(table, CREATION_DATE)
        .map(|raw| parse_creation_date(raw, code))
        .transpose()?;
    let primary_key_col_id = resolve_primary_key(table);

    let columns = table
        .child(COLUMNS)
        .ok_or_else(|| IngestError::MissingElement {
            element: COLUMNS,
            table: Some(code.to_string()),
        })?;
    let mut fields = columns
        .children_named(COLUMN)
        .map(|column| extract_column(column, code, primary_key_col_id, options, mapper))
        .collect::<Result<Vec<_>>>()?;
    for field in &mut fields {
        field.entity_name = code.to_string();
    }
    let dependencies = Entity::dependencies_of(&fields);

    debug!(
        fields = fields.len(),
        primary_key = primary_key_col_id.unwrap_or("-"),
        "extracted table"
    );

    Ok(Entity {
        name: options.naming.entity_name(code),
        table_name: options.naming.prefixed_table_name(code),
        comment: table.child_text(COMMENT).map(str::to_string),
        creator: table.child_text(CREATOR).map(str::to_string),
        create_date,
        table_id: table_id.to_string(),
        primary_key_col_id: primary_key_col_id.map(str::to_string),
        fields,
        dependencies,
    })
}

fn extract_column(
    column: &XmlElement,
    table: &str,
    primary_key_col_id: Option<&str>,
    options: &ExtractOptions,
    mapper: &TypeMapper,
) -> Result<Field> {
    let col_id = column
        .attribute(ID)
        .ok_or_else(|| IngestError::MissingAttribute {
            attribute: ID,
            element: COLUMN,
            table: Some(table.to_string()),
        })?;
    let col_name = column
        .child_text(CODE)
        .ok_or_else(|| IngestError::MissingElement {
            element: CODE,
            table: Some(table.to_string()),
        })?;
    let col_type = column
        .child_text(DATA_TYPE)
        .ok_or_else(|| IngestError::MissingElement {
            element: DATA_TYPE,
            table: Some(table.to_string()),
        })?;

    let java_type = mapper
        .map(col_type)
        .map_err(|_| IngestError::UnmappableType {
            col_type: col_type.to_string(),
            table: table.to_string(),
        })?;

    let col_length = optional_text(column, LENGTH)
        .map(|raw| {
            raw.parse::<u32>().map_err(|_| IngestError::InvalidValue {
                field: LENGTH,
                value: raw.to_string(),
                table: table.to_string(),
            })
        })
        .transpose()?;

    Ok(Field {
        entity_name: String::new(),
        col_id: col_id.to_string(),
        col_name: col_name.to_string(),
        name: options.naming.field_name(col_name),
        col_type: col_type.to_string(),
        java_type,
        type_qualified_name: java_type.qualified_name().map(str::to_string),
        col_length,
        comment: column.child_text(COMMENT).map(str::to_string),
        mandatory: column.child_text(COLUMN_MANDATORY) == Some(MANDATORY_FLAG),
        is_primary_key: primary_key_col_id == Some(col_id),
    })
}

/// Follow the two-hop key indirection to the primary key column `Id`.
///
/// Every broken hop means "no primary key" rather than an error.
fn resolve_primary_key(table: &XmlElement) -> Option<&str> {
    let Some(primary_key) = table.descendant(PRIMARY_KEY) else {
        debug!("no primary key declared");
        return None;
    };
    let Some(key_ref) = primary_key.descendant(KEY).and_then(|key| key.attribute(REF)) else {
        debug!("primary key has no key reference");
        return None;
    };
    let keys = KeyIndex::build(table);
    let Some(key) = keys.get(key_ref) else {
        debug!(key_ref, "primary key references an unknown key");
        return None;
    };
    let column_ref = key
        .child(KEY_COLUMNS)
        .and_then(|columns| columns.children_named(COLUMN).next())
        .and_then(|column| column.attribute(REF));
    if column_ref.is_none() {
        debug!(key_ref, "primary key has no columns");
    }
    column_ref
}

/// `Id` -> key definition index over one table's `Keys` collection.
struct KeyIndex<'a> {
    by_id: HashMap<&'a str, &'a XmlElement>,
}

impl<'a> KeyIndex<'a> {
    fn build(table: &'a XmlElement) -> Self {
        let by_id = table
            .child(KEYS)
            .into_iter()
            .flat_map(|keys| keys.children_named(KEY))
            .filter_map(|key| key.attribute(ID).map(|id| (id, key)))
            .collect();
        Self { by_id }
    }

    fn get(&self, id: &str) -> Option<&'a XmlElement> {
        self.by_id.get(id).copied()
    }
}

/// Child text, treating a blank element the same as an absent one.
fn optional_text<'a>(element: &'a XmlElement, name: &str) -> Option<&'a str> {
    element
        .child_text(name)
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

fn parse_creation_date(raw: &str, table: &str) -> Result<DateTime<Utc>> {
    raw.parse::<i64>()
        .ok()
        .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
        .ok_or_else(|| IngestError::InvalidValue {
            field: CREATION_DATE,
            value: raw.to_string(),
            table: table.to_string(),
        })
}
