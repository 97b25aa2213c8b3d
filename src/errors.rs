//! Definition-time error types.
//!
//! Two disjoint failure classes exist in this crate:
//! - broken schema definitions are a programmer contract and fail fast with
//!   a [`DefinitionError`] at construction time;
//! - invalid instance data is expected and is always returned as
//!   [`Violation`](crate::result::Violation)s inside a
//!   [`ValidationResult`](crate::result::ValidationResult), never thrown.

use thiserror::Error;

/// Result type for schema definition and registry operations.
pub type DefinitionResult<T> = Result<T, DefinitionError>;

/// Errors raised while compiling a schema definition or operating the model
/// registry. A schema that fails construction is never produced.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DefinitionError {
    /// Property option with no registered builder.
    #[error("Unrecognised option '{0}'")]
    UnrecognisedOption(String),

    /// Malformed related-schema reference on the named property.
    #[error("{0}.schema is invalid")]
    InvalidSchemaSpec(String),

    /// Property name collides with a model entry point.
    #[error("Properties named '{0}' are not allowed")]
    ReservedProperty(String),

    /// `type` option naming no registered builder.
    #[error("Property type '{0}' is not supported")]
    UnsupportedType(String),

    /// Same property defined twice in one schema.
    #[error("Duplicate property '{0}'")]
    DuplicateProperty(String),

    /// Option spec with the wrong shape for its builder.
    #[error("Option '{option}' on property '{property}' is invalid: {reason}")]
    InvalidOption {
        property: String,
        option: String,
        reason: String,
    },

    /// Registered schemas are immutable; names are never reused.
    #[error("Schema '{0}' is already registered")]
    DuplicateSchema(String),

    /// Factory request for a name with no registered schema.
    #[error("Schema '{0}' is not registered")]
    UnknownSchema(String),

    /// JSON definition document without the expected shape.
    #[error("Malformed schema definition: {0}")]
    MalformedDefinition(String),
}
