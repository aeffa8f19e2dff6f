use std::collections::HashMap;

use askama::Template;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;

use crate::bootstrap;
use crate::error::AppError;
use crate::request::validation::Violation;
use crate::request::{
    Field, FormContext, FormEvent, FormMachine, FormState, RequestForm, SubmitOutcome, Toast,
    ToastQueue, TransitionError, POSITIONS,
};
use crate::session::Session;
use crate::state::SharedState;

#[derive(Template)]
#[template(path = "request/component.html")]
struct ComponentTemplate {
    submitted: bool,
    busy: bool,
    positions: Vec<PositionOption>,
    experience: String,
    skills: String,
    message: String,
    position_error: Option<String>,
    experience_error: Option<String>,
    message_error: Option<String>,
    toasts: Vec<Toast>,
}

struct PositionOption {
    value: &'static str,
    selected: bool,
}

/// Render the component partial: the form, or the confirmation once submitted.
pub fn render_component(
    machine: &FormMachine,
    violations: &[Violation],
    toasts: Vec<Toast>,
) -> Result<String, askama::Error> {
    let form = &machine.form;
    ComponentTemplate {
        submitted: machine.is_submitted(),
        busy: machine.busy,
        positions: POSITIONS
            .iter()
            .map(|p| PositionOption {
                value: *p,
                selected: form.position == *p,
            })
            .collect(),
        experience: form.experience.clone(),
        skills: form.skills.clone(),
        message: form.message.clone(),
        position_error: first_violation(violations, Field::Position),
        experience_error: first_violation(violations, Field::Experience),
        message_error: first_violation(violations, Field::Message),
        toasts,
    }
    .render()
}

fn first_violation(violations: &[Violation], field: Field) -> Option<String> {
    violations
        .iter()
        .find(|v| v.field == field)
        .map(|v| v.message.clone())
}

/// Full page load: a fresh component instance mounted into the host page.
pub async fn page(session: Session, State(state): State<SharedState>) -> Html<String> {
    let machine = state.forms.remount(&session.user.id);
    Html(bootstrap::bootstrap(
        &state.host_document,
        &state.config.mount_id,
        || Ok(render_component(&machine, &[], Vec::new())?),
    ))
}

pub async fn component(
    session: Session,
    State(state): State<SharedState>,
) -> Result<Html<String>, AppError> {
    let machine = state.forms.snapshot(&session.user.id);
    Ok(Html(render_component(&machine, &[], Vec::new())?))
}

/// Single-field update. The body carries exactly one of the form's fields.
pub async fn update_field(
    session: Session,
    State(state): State<SharedState>,
    Form(body): Form<HashMap<String, String>>,
) -> Result<StatusCode, AppError> {
    let mut entries = body.into_iter();
    let (Some((name, value)), None) = (entries.next(), entries.next()) else {
        return Err(AppError::BadRequest(
            "Expected exactly one form field".to_string(),
        ));
    };
    let field: Field = name.parse().map_err(AppError::BadRequest)?;

    state
        .forms
        .apply(&session.user.id, FormEvent::FieldChanged(field, value))
        .map_err(|e| match e {
            TransitionError::AlreadySubmitted => AppError::Conflict(e.to_string()),
            other => AppError::BadRequest(other.to_string()),
        })?;

    Ok(StatusCode::NO_CONTENT)
}

/// Full form post: replay the fields, then submit.
pub async fn submit(
    session: Session,
    State(state): State<SharedState>,
    headers: HeaderMap,
    Form(posted): Form<FormState>,
) -> Result<Response, AppError> {
    let toasts = ToastQueue::new();
    let ctx = FormContext {
        user: &session.user,
        api: &*session.api,
    };
    let form = RequestForm::new(&state.forms, ctx, &toasts);

    for (field, value) in posted.entries() {
        if form.update_field(field, value.to_string()).is_err() {
            // Already submitted; the submit below reports it.
            break;
        }
    }

    let violations = match form.submit().await {
        SubmitOutcome::Rejected(TransitionError::Invalid(violations)) => violations,
        _ => Vec::new(),
    };

    let partial = render_component(&form.state(), &violations, toasts.drain())?;
    Ok(respond(&state, &headers, partial))
}

/// HTMX requests get the partial; plain form posts get the whole page.
fn respond(state: &SharedState, headers: &HeaderMap, partial: String) -> Response {
    if headers.contains_key("hx-request") {
        return Html(partial).into_response();
    }
    Html(bootstrap::bootstrap(
        &state.host_document,
        &state.config.mount_id,
        || Ok(partial),
    ))
    .into_response()
}
