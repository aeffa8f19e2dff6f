use chrono::Utc;
use serde::Serialize;

use crate::api::{ApiClient, ApiError};
use crate::session::SessionUser;

use super::fields::Field;
use super::machine::{FormEvent, FormMachine, TransitionError};
use super::messages;
use super::notify::Notifier;
use super::payload::RequestPayload;
use super::registry::FormRegistry;
use super::ENDPOINT;

/// What the form component is handed by its caller: who is submitting and
/// how to reach the backend.
#[derive(Clone, Copy)]
pub struct FormContext<'a> {
    pub user: &'a SessionUser,
    pub api: &'a dyn ApiClient,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Submitted,
    /// The backend call failed; the form stays up for another try.
    Failed(ApiError),
    /// No request was sent.
    Rejected(TransitionError),
}

#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub preflight_url: String,
    pub preflight_status: Option<u16>,
    pub preflight_error: Option<String>,
    pub api_status: Option<u16>,
    pub api_error: Option<String>,
}

/// The employee request form for one user, bound to its collaborators.
pub struct RequestForm<'a> {
    registry: &'a FormRegistry,
    ctx: FormContext<'a>,
    notifier: &'a dyn Notifier,
}

impl<'a> RequestForm<'a> {
    pub fn new(registry: &'a FormRegistry, ctx: FormContext<'a>, notifier: &'a dyn Notifier) -> Self {
        Self {
            registry,
            ctx,
            notifier,
        }
    }

    pub fn state(&self) -> FormMachine {
        self.registry.snapshot(&self.ctx.user.id)
    }

    pub fn update_field(&self, field: Field, value: String) -> Result<FormMachine, TransitionError> {
        self.registry
            .apply(&self.ctx.user.id, FormEvent::FieldChanged(field, value))
    }

    /// Validate, mark busy, send exactly one request and settle the result.
    pub async fn submit(&self) -> SubmitOutcome {
        let user = self.ctx.user;

        let (form, generation) = match self.registry.apply(&user.id, FormEvent::SubmitRequested) {
            Ok(state) => (state.form, state.generation),
            Err(e) => {
                tracing::debug!("Submit rejected for user {}: {e}", user.id);
                return SubmitOutcome::Rejected(e);
            }
        };

        let payload = RequestPayload::build(user, &form, Utc::now());
        tracing::info!(
            "Submitting employee request for user {} (position: {})",
            user.id,
            payload.position
        );

        let result = match serde_json::to_value(&payload) {
            Ok(body) => self.ctx.api.post(ENDPOINT, &body).await.map(|_| ()),
            Err(e) => Err(ApiError::RequestConstruction(format!(
                "Failed to encode request payload: {e}"
            ))),
        };

        match result {
            Ok(()) => {
                self.settle(FormEvent::SubmitSucceeded(generation));
                self.notifier.success(messages::SUBMITTED);
                tracing::info!("Employee request accepted for user {}", user.id);
                SubmitOutcome::Submitted
            }
            Err(err) => {
                match &err {
                    ApiError::ServerRejected { status, body } => {
                        tracing::error!(
                            "Employee request rejected for user {} with status {status}: {}",
                            user.id,
                            body.as_ref().map(|b| b.to_string()).unwrap_or_default()
                        );
                    }
                    ApiError::NoResponse(msg) => {
                        tracing::error!("No response for employee request of user {}: {msg}", user.id);
                    }
                    ApiError::RequestConstruction(msg) => {
                        tracing::error!("Employee request setup failed for user {}: {msg}", user.id);
                    }
                }
                self.settle(FormEvent::SubmitFailed(generation));
                self.notifier.error(&messages::failure_message(&err));
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Diagnostic only: check the endpoint answers, never touching form state.
    pub async fn probe(&self, preflight_url: &str) -> ProbeReport {
        tracing::info!("Testing endpoint {preflight_url}");

        let (preflight_status, preflight_error) = match self.ctx.api.options(preflight_url).await {
            Ok(resp) => {
                tracing::info!("Preflight test result: {}", resp.status);
                (Some(resp.status), None)
            }
            Err(e) => {
                tracing::error!("Preflight test failed: {e}");
                (None, Some(e.to_string()))
            }
        };

        let (api_status, api_error) = match self.ctx.api.get(ENDPOINT).await {
            Ok(resp) => {
                tracing::info!("API client test result: {}", resp.status);
                (Some(resp.status), None)
            }
            Err(e) => {
                tracing::error!("API client test failed: {e}");
                let status = match &e {
                    ApiError::ServerRejected { status, .. } => Some(*status),
                    _ => None,
                };
                (status, Some(e.to_string()))
            }
        };

        ProbeReport {
            preflight_url: preflight_url.to_string(),
            preflight_status,
            preflight_error,
            api_status,
            api_error,
        }
    }

    /// Results only land on the instance that issued the request.
    fn settle(&self, event: FormEvent) {
        if let Err(e) = self.registry.settle(&self.ctx.user.id, event) {
            tracing::debug!("Discarding late submission result for user {}: {e}", self.ctx.user.id);
        }
    }
}
