pub mod jwt;

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use crate::api::ApiClient;
use crate::error::AppError;
use crate::state::SharedState;

/// Identity of the signed-in user, as the backend issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Session context for one request: the user plus an API client that
/// carries their credentials.
#[derive(Clone)]
pub struct Session {
    pub user: SessionUser,
    pub api: Arc<dyn ApiClient>,
}

impl Session {
    fn from_token(token: &str, state: &SharedState) -> Result<Self, AppError> {
        let claims = jwt::decode_token(token, &state.config.jwt_secret)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(Session {
            user: SessionUser {
                id: claims.sub,
                name: claims.name,
                email: claims.email,
            },
            api: state.connector.connect(token),
        })
    }
}

impl FromRequestParts<SharedState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        // Bearer token first, then the cookie the backend sets
        if let Some(auth_header) = parts.headers.get("authorization") {
            let auth_str = auth_header
                .to_str()
                .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;

            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return Session::from_token(token, state);
            }
        }

        let jar = CookieJar::from_headers(&parts.headers);
        if let Some(cookie) = jar.get("access_token") {
            return Session::from_token(cookie.value(), state);
        }

        Err(AppError::Unauthorized(
            "Missing authentication token".to_string(),
        ))
    }
}
