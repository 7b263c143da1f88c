//! The seam between the dispatcher and the network.
//!
//! Futures are `LocalBoxFuture` because the widget runs on a single-threaded
//! event loop (a browser tab or a current-thread runtime) and browser HTTP
//! futures are not `Send`.

#[cfg(feature = "native")]
mod http;

use futures_util::future::LocalBoxFuture;

use crate::errors::TransportError;
use crate::models::{ChatRequest, ChatResponse};

#[cfg(feature = "native")]
pub use http::HttpTransport;

/// Performs `POST /api/chat`. Implementations enforce their own timeout and
/// report it as [`TransportError::Timeout`].
pub trait Transport {
    fn post_chat(
        &self,
        request: ChatRequest,
    ) -> LocalBoxFuture<'_, Result<ChatResponse, TransportError>>;
}

/// Decodes a `/api/chat` body. Anything that is not JSON or lacks `response`
/// is malformed.
pub fn decode_chat_response(body: &str) -> Result<ChatResponse, TransportError> {
    serde_json::from_str(body).map_err(|e| TransportError::malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_minimal_body() {
        let resp = decode_chat_response(r#"{"response":"Here is our size guide..."}"#).unwrap();
        assert_eq!(resp.response, "Here is our size guide...");
        assert_eq!(resp.suggested_products, None);
    }

    #[test]
    fn token_counters_of_any_shape_still_decode() {
        let nested = decode_chat_response(
            r#"{"response":"Hi","tokens_used":{"prompt":3,"completion":9,"total":12}}"#,
        )
        .unwrap();
        assert_eq!(nested.response, "Hi");

        let fractional = decode_chat_response(
            r#"{"response":"Hi","tokens_used":12.5,"tokens_remaining":null,"query_type":7}"#,
        )
        .unwrap();
        assert_eq!(fractional.response, "Hi");
    }

    #[test]
    fn html_error_page_is_malformed() {
        let err = decode_chat_response("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn missing_response_field_is_malformed() {
        let err = decode_chat_response(r#"{"detail":"Invalid request"}"#).unwrap_err();
        assert!(err.is_malformed());
    }
}
