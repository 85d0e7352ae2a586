//! Schema model for PowerDesigner physical data models.
//!
//! An [`Entity`] describes one source table and owns its [`Field`]s in
//! document order. Column types are translated through the [`TypeMapper`],
//! which also reports which Java types need an explicit import.

pub mod entity;
pub mod error;
pub mod types;

pub use entity::{Entity, Field};
pub use error::{ModelError, Result};
pub use types::{JavaType, TypeMapper};
