use thiserror::Error;

use crate::domain::StoreKind;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Validation errors on submitted feedback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("feedback text is empty")]
    EmptyFeedback,
}

/// Storage-backend errors.
///
/// Inside the fallback chain these are logged and swallowed; only
/// `AllStoresFailed` and the delete-routing variants reach the caller.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store '{store}' unavailable: {reason}")]
    Unavailable { store: StoreKind, reason: String },

    #[error("store '{store}' does not support deletion")]
    DeleteUnsupported { store: StoreKind },

    #[error("no store '{0}' in the configured chain")]
    UnknownStore(String),

    #[error("all configured stores failed")]
    AllStoresFailed,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;
