//! Error types for schema generation

use std::path::PathBuf;

use thiserror::Error;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Schema generation errors
///
/// The first four variants are the recoverable failure modes of the generator.
/// They are produced at the point of failure and matched by the generator,
/// which logs them and degrades the output instead of returning them.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Unreadable member {owner}.{member}: {reason}")]
    UnreadableMember {
        owner: String,
        member: String,
        reason: String,
    },

    #[error("Type {type_name} cannot be default-constructed")]
    NonConstructibleType { type_name: String },

    #[error("Documentation export unavailable at {path:?}: {reason}")]
    MissingDocumentation { path: PathBuf, reason: String },

    #[error("No instance of root type {type_name}: {reason}")]
    TopLevelFailure { type_name: String, reason: String },

    #[error("Invalid documentation export: {0}")]
    InvalidDocumentation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

impl SchemaError {
    /// Build an [`SchemaError::UnreadableMember`] for a member accessor
    pub fn unreadable(
        owner: impl Into<String>,
        member: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::UnreadableMember {
            owner: owner.into(),
            member: member.into(),
            reason: reason.into(),
        }
    }
}
