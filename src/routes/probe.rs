use axum::extract::State;
use axum::Json;

use crate::request::{FormContext, ProbeReport, RequestForm, ToastQueue};
use crate::session::Session;
use crate::state::SharedState;

/// Check that the employee request endpoint answers. Form state is untouched.
pub async fn probe(session: Session, State(state): State<SharedState>) -> Json<ProbeReport> {
    let toasts = ToastQueue::new();
    let ctx = FormContext {
        user: &session.user,
        api: &*session.api,
    };
    let form = RequestForm::new(&state.forms, ctx, &toasts);

    Json(form.probe(&state.config.probe_url()).await)
}
