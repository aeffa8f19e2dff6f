pub mod http;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

/// A response the backend accepted. Bodies are kept as parsed JSON when
/// possible; callers are free to ignore them.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Option<Value>,
}

/// Outbound call failures, decided where the transport sees them.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    ServerRejected { status: u16, body: Option<Value> },
    /// The request went out but nothing came back (connect refused, timeout, reset).
    NoResponse(String),
    /// The request could not be built or dispatched at all.
    RequestConstruction(String),
}

impl ApiError {
    /// `message` field of a JSON error body, if the server sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::ServerRejected { body: Some(body), .. } => body
                .get("message")
                .and_then(|m| m.as_str())
                .filter(|m| !m.is_empty()),
            _ => None,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::ServerRejected { status, body } => match body {
                Some(body) => write!(f, "Server rejected request ({status}): {body}"),
                None => write!(f, "Server rejected request ({status})"),
            },
            ApiError::NoResponse(msg) => write!(f, "No response: {msg}"),
            ApiError::RequestConstruction(msg) => write!(f, "Request setup failed: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

#[async_trait]
pub trait ApiClient: Send + Sync {
    /// POST a JSON body to a path relative to the API base.
    async fn post(&self, path: &str, body: &Value) -> Result<ApiResponse, ApiError>;

    /// GET a path relative to the API base.
    async fn get(&self, path: &str) -> Result<ApiResponse, ApiError>;

    /// Send an `OPTIONS` request to an absolute URL. Any status the server
    /// answers with counts as a response; only transport failures are errors.
    async fn options(&self, url: &str) -> Result<ApiResponse, ApiError>;
}

/// Hands out API clients bound to one session's credentials.
pub trait ApiConnector: Send + Sync {
    fn connect(&self, bearer_token: &str) -> Arc<dyn ApiClient>;
}
