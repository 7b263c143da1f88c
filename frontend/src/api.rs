use std::time::Duration;

use caviaar_chat::transport::{decode_chat_response, Transport};
use caviaar_chat::{ChatRequest, ChatResponse, TransportError};
use futures_util::future::{select, Either, FutureExt, LocalBoxFuture};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;

/// Base URL of the assistant backend.
pub const API_BASE: &str = "http://localhost:8000";

/// How long a reply may take before the widget gives up on it.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// First-party domain whose links render as buttons.
pub const STOREFRONT_DOMAIN: &str = "caviaarmode.com";

pub const STOREFRONT_URL: &str = "https://caviaarmode.com";

/// Browser `fetch` transport. The fetch itself has no deadline, so the call
/// races a timer.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooTransport;

impl GlooTransport {
    async fn send_chat(request: ChatRequest) -> Result<ChatResponse, TransportError> {
        let resp = Request::post(&format!("{API_BASE}/api/chat"))
            .json(&request)
            .map_err(|e| TransportError::network(format!("Serialize error: {e}")))?
            .send()
            .await
            .map_err(|e| TransportError::network(e.to_string()))?;

        if !resp.ok() {
            return Err(TransportError::Status { status: resp.status() });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| TransportError::network(e.to_string()))?;
        decode_chat_response(&body)
    }
}

impl Transport for GlooTransport {
    fn post_chat(
        &self,
        request: ChatRequest,
    ) -> LocalBoxFuture<'_, Result<ChatResponse, TransportError>> {
        async move {
            let call = Self::send_chat(request).boxed_local();
            let deadline = TimeoutFuture::new(REQUEST_TIMEOUT.as_millis() as u32).boxed_local();
            match select(call, deadline).await {
                Either::Left((outcome, _)) => outcome,
                Either::Right(((), _)) => {
                    log::warn!("Chat request timed out after {REQUEST_TIMEOUT:?}");
                    Err(TransportError::Timeout { after: REQUEST_TIMEOUT })
                }
            }
        }
        .boxed_local()
    }
}
