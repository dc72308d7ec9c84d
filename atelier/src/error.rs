//! Error type for the campaign chain.
//!
//! Covers the three failure families the chain can hit: a missing API key,
//! transport/API failures against the model endpoint, and model replies that
//! are not usable JSON. No retry semantics; callers surface the message.

use thiserror::Error;

/// Errors surfaced while building a client or running the chain.
#[derive(Debug, Error)]
pub enum ChainError {
    /// No API key in the environment.
    #[error("missing API key: set GEMINI_API_KEY or GOOGLE_API_KEY")]
    MissingApiKey,

    /// Transport-level failure talking to the model endpoint.
    #[error("request failed: {0}")]
    Http(String),

    /// Non-success status from the model endpoint.
    #[error("Gemini API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The endpoint answered but carried no candidate text.
    #[error("model returned no content")]
    EmptyReply,

    /// A step reply could not be parsed as JSON, even after recovery.
    #[error("{step}: {message}")]
    InvalidJson { step: &'static str, message: String },

    /// The chain finished but the final document has no ideas.
    #[error("the model returned no ideas")]
    NoIdeas,
}
