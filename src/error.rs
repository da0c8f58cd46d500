//! Error handling module for the pack selector
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Nothing in here is fatal to a selection session: the controller recovers
//! every variant locally and at worst re-prompts.

use thiserror::Error;

/// Main error type for the pack selector
#[derive(Error, Debug)]
pub enum PackSelError {
    /// Row index outside the visible-pack bounds
    #[error("Row {row} is out of range (visible packs: {len})")]
    OutOfRange { row: usize, len: usize },

    /// User typed something that is not a menu choice
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A toggle that would break requiredness or dependency closure
    #[error("Toggle rejected: {0}")]
    RejectedToggle(String),

    /// Message resource could not be loaded
    #[error("Resource lookup failed: {0}")]
    ResourceLookup(String),

    /// Pack id not present in the catalog
    #[error("Unknown pack: {0}")]
    UnknownPack(String),

    /// Catalog construction errors (duplicate ids, dangling dependencies)
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// IO errors (console, resource files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for pack selector operations
pub type Result<T> = std::result::Result<T, PackSelError>;

// Convenient error constructors
impl PackSelError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a rejected toggle error
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::RejectedToggle(msg.into())
    }

    /// Create a resource lookup error
    pub fn resource_lookup(msg: impl Into<String>) -> Self {
        Self::ResourceLookup(msg.into())
    }

    /// Create a catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }
}
