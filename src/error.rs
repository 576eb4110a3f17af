//! Error types for the facilitator assistant
//!
//! Failures are typed here with `thiserror`; call sites propagate them through
//! `anyhow` so context can be attached on the way up.

use thiserror::Error;

/// Errors raised while talking to the completion service or handling chat state
#[derive(Error, Debug)]
pub enum ChatError {
    /// No service credential was found in the config file or environment
    #[error("Missing credential: set api_key in the config file or GEMINI_API_KEY")]
    MissingCredential,

    /// A message failed the store's validation
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    /// The completion service answered with a non-success status
    #[error("Provider error ({status}): {body}")]
    Provider {
        /// HTTP status code returned by the service
        status: u16,
        /// Response body, as returned
        body: String,
    },

    /// A stream chunk could not be understood
    #[error("Malformed stream: {0}")]
    MalformedStream(String),

    /// The event channel closed before the stream reported completion
    #[error("Stream closed before completion")]
    StreamClosed,

    /// Configuration could not be read or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result alias used across the crate
pub type Result<T> = anyhow::Result<T>;
