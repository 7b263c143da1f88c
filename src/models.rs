use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A product suggestion attached to an assistant reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub price: f64,
    pub currency: String,
    pub image_url: String,
    pub url: String,
    pub category: String,
}

impl Product {
    /// Prices must be finite and non-negative.
    pub fn has_valid_price(&self) -> bool {
        self.price.is_finite() && self.price >= 0.0
    }
}

/// One entry of the visible transcript.
///
/// Only [`Message::user`] and [`Message::assistant`] build messages, so a user
/// message can never carry product suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub suggested_products: Vec<Product>,
}

impl Message {
    pub fn user(id: String, content: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            role: MessageRole::User,
            content,
            timestamp,
            suggested_products: Vec::new(),
        }
    }

    pub fn assistant(
        id: String,
        content: String,
        timestamp: DateTime<Utc>,
        suggested_products: Vec<Product>,
    ) -> Self {
        Self {
            id,
            role: MessageRole::Assistant,
            content,
            timestamp,
            suggested_products,
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    pub session_id: String,
}

/// Body returned by `POST /api/chat`.
///
/// `query_type` and the token counters are kept as raw JSON: the dispatcher
/// never looks at them and their shape varies between backends. Unknown
/// fields (the backend sometimes adds `metadata`) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub suggested_products: Option<Vec<Product>>,
    #[serde(default)]
    pub query_type: Option<serde_json::Value>,
    #[serde(default)]
    pub tokens_used: Option<serde_json::Value>,
    #[serde(default)]
    pub tokens_remaining: Option<serde_json::Value>,
}

impl ChatResponse {
    pub fn text(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            session_id: None,
            suggested_products: None,
            query_type: None,
            tokens_used: None,
            tokens_remaining: None,
        }
    }

    /// Splits the reply into the parts the dispatcher keeps.
    pub fn into_parts(self) -> (String, Option<String>, Vec<Product>) {
        (
            self.response,
            self.session_id,
            self.suggested_products.unwrap_or_default(),
        )
    }
}

/// `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub max_tokens_per_day: Option<u64>,
}

/// `GET /api/tokens/{session_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub tokens_used: u64,
    pub tokens_remaining: i64,
    pub date: String,
}
