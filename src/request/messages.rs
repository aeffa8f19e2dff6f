use crate::api::ApiError;

pub const SUBMITTED: &str = "Employee request submitted! An admin will review your application.";
pub const ENDPOINT_NOT_FOUND: &str = "Server endpoint not found. Please contact support.";
pub const SERVER_ERROR: &str = "Server error. Please try again later.";
pub const NO_RESPONSE: &str = "No response from server. Please check your connection.";
pub const SETUP_FAILED: &str = "Failed to submit employee request. Please try again.";
const REJECTED_FALLBACK: &str = "Failed to submit request";

/// User-facing text for a failed submission.
pub fn failure_message(err: &ApiError) -> String {
    match err {
        ApiError::ServerRejected { status: 404, .. } => ENDPOINT_NOT_FOUND.to_string(),
        ApiError::ServerRejected { status: 500, .. } => SERVER_ERROR.to_string(),
        ApiError::ServerRejected { .. } => {
            format!("Error: {}", err.server_message().unwrap_or(REJECTED_FALLBACK))
        }
        ApiError::NoResponse(_) => NO_RESPONSE.to_string(),
        ApiError::RequestConstruction(_) => SETUP_FAILED.to_string(),
    }
}
