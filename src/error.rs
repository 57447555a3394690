//! Crate-wide error taxonomy (§7). Every fallible public entry point
//! returns one of these typed errors rather than a bare `String` or
//! `anyhow::Error`; `anyhow` is still used internally in binaries/demos
//! that just need to propagate a chain up to a `main` that prints and
//! exits.

use crate::lineage::LineageError;
use crate::ra::RaConfigError;
use crate::value::SchemaValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FluentError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("relational algebra configuration error: {0}")]
    RaConfig(#[from] RaConfigError),

    #[error("schema validation error: {0}")]
    Schema(#[from] SchemaValidationError),

    #[error("lineage store error: {0}")]
    Lineage(#[from] LineageError),

    #[error("channel error: {0}")]
    Channel(#[from] crate::collections::ChannelError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(String),

    #[error("invalid node address '{0}': {1}")]
    InvalidAddress(String, String),

    #[error("missing required configuration field: {0}")]
    MissingField(String),

    #[error("rule {rule_number} targets unregistered collection '{target}'")]
    UnknownRuleTarget { rule_number: i64, target: String },
}

pub type FluentResult<T> = Result<T, FluentError>;
