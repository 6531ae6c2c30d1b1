pub mod auth;
pub mod health;
pub mod pages;
pub mod profile;

use crate::api::{types::ActionState, ApiError};
use axum::{
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

// common functions for the handlers

/// Failed action: the error's status with `{"errors": [status text]}`.
pub(crate) fn action_error(err: &ApiError) -> Response {
    warn!("action failed: {err}");

    (err.status(), Json(ActionState::error(err.status_text()))).into_response()
}
