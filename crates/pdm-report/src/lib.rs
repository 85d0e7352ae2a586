//! Output generation for extracted PDM schemas.
//!
//! - **Java sources**: one entity class per table, rendered from a built-in
//!   template or a user template file and written under
//!   `<output>/<source root>/<package path>/`
//! - **Schema JSON**: the extracted model as pretty-printed JSON

mod common;
mod java;
mod schema_json;
mod template_file;

pub use common::{RenderOptions, package_path};
pub use java::{EntityTemplate, render_entity, write_entity_sources};
pub use schema_json::{schema_json_string, write_schema_json};
pub use template_file::TemplateFile;
