use std::time::Duration;

use thiserror::Error;

/// Why a round trip to the assistant backend did not produce a usable reply.
///
/// Every variant is absorbed by the dispatcher and turned into the fallback
/// message; nothing here ever reaches the shopper as a raw error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    // ── Connection ───────────────────────────────────────────────────────────
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Request timed out after {after:?}")]
    Timeout { after: Duration },

    // ── Backend answered, but not usefully ───────────────────────────────────
    #[error("Server error: HTTP {status}")]
    Status { status: u16 },

    #[error("Malformed response: {message}")]
    Malformed { message: String },

    // ── Local ────────────────────────────────────────────────────────────────
    #[error("Reply abandoned before it settled")]
    Abandoned,
}

impl TransportError {
    pub fn network(message: impl Into<String>) -> Self {
        TransportError::Network { message: message.into() }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        TransportError::Malformed { message: message.into() }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout { .. })
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, TransportError::Malformed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Message id '{id}' is already in the conversation")]
    DuplicateMessageId { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}
