//! Error types for schema validation and migration

use thiserror::Error;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Schema engine errors
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("invalid schema version '{version}': {reason}")]
    InvalidVersionFormat { version: String, reason: String },

    #[error("no schema definition for '{artifact}' at version {version}")]
    SchemaNotFound { version: String, artifact: String },

    #[error("schema definition '{artifact}' at version {version} is malformed: {reason}")]
    SchemaParse {
        version: String,
        artifact: String,
        reason: String,
    },

    #[error("document does not declare a schema version at meta.schema_version")]
    MissingVersion,

    #[error("cannot validate document from '{context}': {source}")]
    Validation {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("downgrade from {from} to {to} is not supported; migration is forward-only")]
    UnsupportedMigration { from: String, to: String },

    #[error("migration from {from} to {to} failed: {reason}")]
    Migration {
        from: String,
        to: String,
        reason: String,
        #[source]
        source: Option<Box<SchemaError>>,
    },
}
