use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use reqwest::Client;
use serde_json::{json, Value};

use staffdesk::config::Config;
use staffdesk::session::jwt::{encode_token, Claims};

pub const JWT_SECRET: &str = "test-jwt-secret-that-is-long-enough";

/// A request the fake backend saw.
#[derive(Debug, Clone)]
pub struct Received {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Value,
}

/// How the fake backend answers `POST /api/employee-requests`.
#[derive(Debug, Clone)]
pub enum Reply {
    Created,
    Status(u16, Option<Value>),
    Delayed(Duration),
}

#[derive(Clone, Default)]
struct BackendState {
    received: Arc<Mutex<Vec<Received>>>,
    reply: Arc<Mutex<Option<Reply>>>,
}

/// Stand-in for the real backend API.
pub struct FakeBackend {
    pub addr: SocketAddr,
    state: BackendState,
}

impl FakeBackend {
    pub fn api_base(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub fn reply_with(&self, reply: Reply) {
        *self.state.reply.lock().unwrap() = Some(reply);
    }

    pub fn received(&self) -> Vec<Received> {
        self.state.received.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<Received> {
        self.received()
            .into_iter()
            .filter(|r| r.method == Method::POST)
            .collect()
    }
}

async fn backend_handler(
    State(state): State<BackendState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    state.received.lock().unwrap().push(Received {
        method: method.clone(),
        path: uri.path().to_string(),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string()),
        body,
    });

    if method == Method::OPTIONS {
        return (
            StatusCode::NO_CONTENT,
            [("Access-Control-Allow-Methods", "GET, POST, OPTIONS")],
        )
            .into_response();
    }

    if method == Method::GET {
        return (StatusCode::OK, Json(json!([]))).into_response();
    }

    let reply = state.reply.lock().unwrap().clone().unwrap_or(Reply::Created);
    match reply {
        Reply::Created => (StatusCode::CREATED, Json(json!({ "id": 1 }))).into_response(),
        Reply::Status(code, body) => {
            let status = StatusCode::from_u16(code).unwrap();
            match body {
                Some(body) => (status, Json(body)).into_response(),
                None => status.into_response(),
            }
        }
        Reply::Delayed(delay) => {
            tokio::time::sleep(delay).await;
            (StatusCode::CREATED, Json(json!({ "id": 1 }))).into_response()
        }
    }
}

pub async fn spawn_backend() -> FakeBackend {
    let state = BackendState::default();
    let app = Router::new()
        .route("/api/employee-requests", any(backend_handler))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind backend port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Backend failed");
    });

    FakeBackend { addr, state }
}

/// Base URL of a port nobody listens on.
pub async fn dead_api_base() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api")
}

/// A running app instance.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// GET with the given user's session cookie, returning (status, body text).
    pub async fn get(&self, path: &str, token: &str) -> (StatusCode, String) {
        let resp = self
            .client
            .get(self.url(path))
            .header("cookie", format!("access_token={token}"))
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        (status, resp.text().await.unwrap_or_default())
    }

    /// Post the whole form the way HTMX does.
    pub async fn submit(&self, token: &str, fields: &[(&str, &str)]) -> (StatusCode, String) {
        let resp = self
            .client
            .post(self.url("/request"))
            .bearer_auth(token)
            .header("hx-request", "true")
            .form(fields)
            .send()
            .await
            .expect("submit request failed");
        let status = resp.status();
        (status, resp.text().await.unwrap_or_default())
    }

    pub async fn update_field(&self, token: &str, name: &str, value: &str) -> StatusCode {
        self.client
            .post(self.url("/request/field"))
            .bearer_auth(token)
            .form(&[(name, value)])
            .send()
            .await
            .expect("field update failed")
            .status()
    }

    pub async fn probe(&self, token: &str) -> (StatusCode, Value) {
        let resp = self
            .client
            .post(self.url("/request/probe"))
            .bearer_auth(token)
            .send()
            .await
            .expect("probe request failed");
        let status = resp.status();
        (status, resp.json().await.unwrap_or(json!(null)))
    }
}

pub fn test_config(api_base_url: &str) -> Config {
    Config {
        api_base_url: api_base_url.to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        request_timeout: Duration::from_secs(5),
        probe_url: None,
        mount_id: "root".to_string(),
        index_path: None,
        max_body_size: 65_536,
        form_idle_timeout: Duration::from_secs(3600),
        log_level: "warn".to_string(),
    }
}

pub async fn spawn_app(api_base_url: &str) -> TestApp {
    spawn_app_with(test_config(api_base_url)).await
}

pub async fn spawn_app_with(config: Config) -> TestApp {
    let app = staffdesk::build_app(config).expect("Failed to build app");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp { addr, client }
}

/// Access token for a user, signed the way the backend signs them.
pub fn token_for(id: &str, name: &str, email: &str) -> String {
    let claims = Claims::new(id, name, email, chrono::Duration::minutes(15));
    encode_token(&claims, JWT_SECRET).unwrap()
}

pub fn default_token() -> String {
    token_for("42", "Alex Doe", "alex@example.com")
}

pub const VALID_FORM: [(&str, &str); 4] = [
    ("position", "Customer Service"),
    ("experience", "3"),
    ("skills", "Stain removal"),
    ("message", "I enjoy helping customers"),
];

/// Write a host document to a unique temp file.
#[allow(dead_code)]
pub fn write_host_document(contents: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let path = std::env::temp_dir().join(format!("staffdesk_host_{}_{nanos}.html", std::process::id()));
    std::fs::write(&path, contents).expect("Failed to write host document");
    path
}
