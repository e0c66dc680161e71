//! Universal types for the completion exchange.
//!
//! These types isolate the application logic from the provider's wire
//! format and give failures a fixed classification.

use serde::Serialize;
use thiserror::Error;

/// The role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message in a completion request.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
}

/// A completed answer from the remote service.
#[derive(Debug, Clone)]
pub struct Answer {
    /// The generated text.
    pub text: String,
}

/// Classified failures of a completion request.
///
/// Exactly one request is made per ask; nothing here is retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    /// The service rejected the credential (HTTP 401).
    #[error("the API rejected the key")]
    Unauthorized,
    /// The service is rate limiting us (HTTP 429).
    #[error("rate limited by the API")]
    RateLimited,
    /// Any other non-success status.
    #[error("the API returned status {0}")]
    ServiceError(u16),
    /// A success response without the expected answer field.
    #[error("the API response did not contain an answer")]
    MalformedResponse,
    /// Transport-level failure; no response was received.
    #[error("network failure: {0}")]
    NetworkFailure(String),
}
