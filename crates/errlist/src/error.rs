//! Error types for the fallible edges of the crate.
//!
//! Chain operations themselves never fail; these cover decoding,
//! array encoding and configuration parsing.

use thiserror::Error;

/// Errors that can occur while decoding, encoding or configuring chains.
#[derive(Debug, Error)]
pub enum ChainError {
    /// JSON encode/decode error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Decoded array held no nodes
    #[error("Chain is empty: at least one node is required")]
    EmptyChain,
}

pub type Result<T> = std::result::Result<T, ChainError>;

/// Failure to encode a single context value.
///
/// Renderers never propagate this; the message replaces the value.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EncodeError {
    /// NaN and infinities have no JSON representation
    #[error("json: unsupported value: {0}")]
    UnsupportedFloat(f64),

    /// Value failed to serialize when it was attached
    #[error("json: {0}")]
    Serialize(String),
}
