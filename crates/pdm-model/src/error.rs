use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The column type keyword has no entry in the type mapping table.
    #[error("no Java type mapping for column type '{col_type}'")]
    UnmappedType { col_type: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
