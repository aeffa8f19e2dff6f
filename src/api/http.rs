use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde_json::Value;

use super::{ApiClient, ApiConnector, ApiError, ApiResponse};

/// `reqwest`-backed API client rooted at the backend's API base URL.
#[derive(Clone)]
pub struct HttpApiClient {
    client: reqwest::Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl HttpApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::RequestConstruction(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let req = self.client.request(method, url);
        match &self.bearer_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn dispatch(&self, req: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        req.send().await.map_err(classify)
    }

    /// Turn a non-2xx response into `ServerRejected`, keeping a JSON body if there is one.
    async fn check(resp: reqwest::Response) -> Result<ApiResponse, ApiError> {
        let status = resp.status().as_u16();
        let body = read_body(resp).await;

        if (200..300).contains(&status) {
            Ok(ApiResponse { status, body })
        } else {
            Err(ApiError::ServerRejected { status, body })
        }
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn post(&self, path: &str, body: &Value) -> Result<ApiResponse, ApiError> {
        let url = self.url(path);
        tracing::debug!("POST {url}");
        let resp = self.dispatch(self.request(Method::POST, &url).json(body)).await?;
        Self::check(resp).await
    }

    async fn get(&self, path: &str) -> Result<ApiResponse, ApiError> {
        let url = self.url(path);
        tracing::debug!("GET {url}");
        let resp = self.dispatch(self.request(Method::GET, &url)).await?;
        Self::check(resp).await
    }

    async fn options(&self, url: &str) -> Result<ApiResponse, ApiError> {
        tracing::debug!("OPTIONS {url}");
        let resp = self.dispatch(self.client.request(Method::OPTIONS, url)).await?;
        let status = resp.status().as_u16();
        Ok(ApiResponse { status, body: None })
    }
}

impl ApiConnector for HttpApiClient {
    fn connect(&self, bearer_token: &str) -> Arc<dyn ApiClient> {
        Arc::new(HttpApiClient {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            bearer_token: Some(bearer_token.to_string()),
        })
    }
}

fn classify(err: reqwest::Error) -> ApiError {
    if err.is_builder() {
        ApiError::RequestConstruction(err.to_string())
    } else {
        ApiError::NoResponse(err.to_string())
    }
}

async fn read_body(resp: reqwest::Response) -> Option<Value> {
    let text = resp.text().await.ok()?;
    if text.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}
