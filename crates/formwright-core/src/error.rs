//! Error types for formwright-core

use thiserror::Error;

/// Problems found in a form schema's derivation setup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Two fields share an id
    #[error("Duplicate field id: {0}")]
    DuplicateFieldId(String),

    /// A derived field lists a parent that is not in the schema
    #[error("Field '{field}' references unknown parent field '{parent}'")]
    UnknownParent { field: String, parent: String },

    /// A derived field lists itself as a parent
    #[error("Field '{0}' cannot derive from itself")]
    SelfReference(String),

    /// A derived field lists another derived field as a parent
    #[error("Field '{field}' derives from '{parent}', which is itself derived")]
    DerivedParent { field: String, parent: String },

    /// A derived field has no formula text
    #[error("Derived field '{0}' has no formula")]
    MissingFormula(String),
}
