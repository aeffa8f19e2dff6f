pub mod request;

use axum::routing::{get, post};
use axum::Router;

use crate::state::SharedState;

pub fn view_routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(request::page))
        .route("/request", get(request::component).post(request::submit))
        .route("/request/field", post(request::update_field))
}
