pub mod api;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod request;
pub mod routes;
pub mod session;
pub mod state;
pub mod views;

use std::sync::{Arc, Weak};
use std::time::Duration;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::api::http::HttpApiClient;
use crate::api::ApiConnector;
use crate::config::Config;
use crate::request::FormRegistry;
use crate::state::{AppState, SharedState};

/// Build the app against the backend named in `config`.
pub fn build_app(config: Config) -> Result<Router, String> {
    let client = HttpApiClient::new(&config.api_base_url, config.request_timeout)
        .map_err(|e| e.to_string())?;
    tracing::info!("Backend API at {}", client.base_url());

    build_app_with(config, Arc::new(client))
}

/// How often idle form instances are swept.
const FORM_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Build the app with an explicit API connector. Must be called inside a
/// Tokio runtime, since it starts the idle-form sweeper.
pub fn build_app_with(config: Config, connector: Arc<dyn ApiConnector>) -> Result<Router, String> {
    let host_document = load_host_document(&config)?;
    let max_body_size = config.max_body_size;
    let form_idle_timeout = config.form_idle_timeout;

    let state: SharedState = Arc::new(AppState {
        config,
        connector,
        forms: FormRegistry::new(),
        host_document,
    });

    spawn_form_sweeper(Arc::downgrade(&state), form_idle_timeout);

    let app = Router::new()
        .merge(routes::api_routes())
        .merge(views::view_routes())
        .nest_service("/static", ServeDir::new("static"))
        .route("/health", axum::routing::get(health))
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Periodically drop idle form instances. Stops once the app is dropped.
fn spawn_form_sweeper(state: Weak<AppState>, max_age: Duration) {
    tokio::spawn(async move {
        let period = FORM_SWEEP_INTERVAL.min(max_age).max(Duration::from_secs(1));
        let mut interval = tokio::time::interval(period);
        interval.tick().await;
        loop {
            interval.tick().await;
            let Some(state) = state.upgrade() else {
                break;
            };
            let before = state.forms.len();
            state.forms.cleanup(max_age);
            let dropped = before.saturating_sub(state.forms.len());
            if dropped > 0 {
                tracing::debug!("Dropped {dropped} idle form instance(s)");
            }
        }
    });
}

fn load_host_document(config: &Config) -> Result<String, String> {
    match &config.index_path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read host document {}: {e}", path.display())),
        None => Ok(bootstrap::DEFAULT_HOST_DOCUMENT.to_string()),
    }
}

async fn health() -> &'static str {
    "ok"
}
