use std::time::Duration;

use futures_util::future::{FutureExt, LocalBoxFuture};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::{decode_chat_response, Transport};
use crate::config::WidgetConfig;
use crate::errors::TransportError;
use crate::models::{ChatRequest, ChatResponse, HealthStatus, TokenUsage};

/// reqwest-backed transport for native builds.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    chat_endpoint: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &WidgetConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TransportError::network(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            chat_endpoint: config.chat_endpoint(),
            timeout: config.request_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError> {
        debug!("POST {} (session {})", self.chat_endpoint, request.session_id);

        let resp = self
            .client
            .post(&self.chat_endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        if !status.is_success() {
            warn!("Chat endpoint answered {status}");
            return Err(TransportError::Status { status: status.as_u16() });
        }

        let body = resp.text().await.map_err(|e| self.classify(e))?;
        decode_chat_response(&body)
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<HealthStatus, TransportError> {
        self.get_json(&["health"]).await
    }

    /// `GET /api/tokens/{session_id}`
    pub async fn token_usage(&self, session_id: &str) -> Result<TokenUsage, TransportError> {
        self.get_json(&["api", "tokens", session_id]).await
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, TransportError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| TransportError::network(format!("Invalid base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| TransportError::network("Base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        debug!("GET {url}");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::Status { status: status.as_u16() });
        }

        let body = resp.text().await.map_err(|e| self.classify(e))?;
        serde_json::from_str(&body).map_err(|e| TransportError::malformed(e.to_string()))
    }

    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout { after: self.timeout }
        } else {
            TransportError::network(err.to_string())
        }
    }
}

impl Transport for HttpTransport {
    fn post_chat(
        &self,
        request: ChatRequest,
    ) -> LocalBoxFuture<'_, Result<ChatResponse, TransportError>> {
        async move { self.send_chat(&request).await }.boxed_local()
    }
}
