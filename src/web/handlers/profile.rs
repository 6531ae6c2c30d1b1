use crate::{
    api::types::{ActionState, Profile, ProfileUpdate},
    session::SessionReader,
    web::{handlers::action_error, AppState},
};
use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use std::sync::Arc;
use tracing::instrument;

#[utoipa::path(
    get,
    path= "/profile",
    responses (
        (status = 200, description = "Current user", body = Profile, content_type = "application/json"),
        (status = 303, description = "Not signed in, redirect to /login"),
        (status = 502, description = "Remote API unreachable", body = ActionState, content_type = "application/json"),
    ),
    tag= "profile"
)]
#[instrument(skip_all)]
pub async fn profile(state: Extension<Arc<AppState>>, session: SessionReader) -> Response {
    match state.api.me(&session).await {
        Ok(profile) => Json(profile).into_response(),
        // The token expired between the guard check and this call.
        Err(e) if e.is_unauthenticated() => Redirect::to(state.routes.login_path()).into_response(),
        Err(e) => action_error(&e),
    }
}

#[utoipa::path(
    patch,
    path= "/profile",
    request_body(content = ProfileUpdate, content_type = "application/json"),
    responses (
        (status = 204, description = "Profile updated"),
        (status = 303, description = "Not signed in, redirect to /login"),
        (status = 422, description = "Update rejected", body = ActionState, content_type = "application/json"),
    ),
    tag= "profile"
)]
#[instrument(skip_all)]
pub async fn update_profile(
    state: Extension<Arc<AppState>>,
    session: SessionReader,
    Json(update): Json<ProfileUpdate>,
) -> Response {
    if update.is_empty() {
        return StatusCode::NO_CONTENT.into_response();
    }

    match state.api.update_me(&session, &update).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) if e.is_unauthenticated() => Redirect::to(state.routes.login_path()).into_response(),
        Err(e) => action_error(&e),
    }
}
