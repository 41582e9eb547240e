use std::any::Any;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use super::AppState;
use crate::auth::{extract_credential, AuthOutcome};
use crate::error::{internal_error_response, AppError, InternalErrorMarker};
use crate::metrics::AuthMetrics;

/// API key authentication middleware.
///
/// Reads `x-api-key`, falling back to `Authorization: Bearer <key>`, and
/// rejects the request before any handler runs: 401 when no key is
/// presented, 403 when it does not match.
pub async fn api_key_auth(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let outcome = state
        .credential_gate
        .authenticate(extract_credential(req.headers()));

    match outcome {
        AuthOutcome::Authenticated => Ok(next.run(req).await),
        AuthOutcome::Unauthenticated => {
            AuthMetrics::record_missing();
            Err(AppError::Unauthenticated)
        }
        AuthOutcome::Forbidden => {
            AuthMetrics::record_invalid();
            Err(AppError::Forbidden)
        }
    }
}

/// Hide internal error detail from clients in production mode
pub async fn mask_internal_errors(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let response = next.run(req).await;

    if state.settings.is_production()
        && response.extensions().get::<InternalErrorMarker>().is_some()
    {
        return internal_error_response("", true);
    }

    response
}

/// Convert a handler panic into a 500 response
pub fn handle_panic(err: Box<dyn Any + Send + 'static>, production: bool) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!(panic = %details, "Handler panicked");
    internal_error_response(&details, production)
}
