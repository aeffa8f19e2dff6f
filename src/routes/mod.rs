pub mod probe;

use axum::routing::post;
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Diagnostics
        .route("/request/probe", post(probe::probe))
}
