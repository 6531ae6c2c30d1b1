//! Login, registration and logout actions.
//!
//! These are the only handlers that take a [`SessionWriter`]: a successful
//! sign-in stores the issued token and redirects to the profile page, a
//! failed one answers `{"errors": [...]}` and leaves the cookie alone.

use crate::{
    api::{
        types::{ActionState, LoginRequest, RegisterRequest, TokenResponse},
        ApiError,
    },
    session::{SessionToken, SessionWriter},
    web::{
        guard::{LOGIN_PATH, PROFILE_PATH},
        handlers::action_error,
        AppState,
    },
};
use axum::{
    extract::{Extension, Form},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::ToSchema;

pub const PASSWORD_MISMATCH: &str = "Пароли должны совпадать";

#[derive(ToSchema, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    phone: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

impl From<LoginForm> for LoginRequest {
    fn from(form: LoginForm) -> Self {
        Self {
            password: form.password,
            phone: form.phone,
            email: form.email,
        }
    }
}

#[derive(ToSchema, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    phone: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    second_password: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    surname: String,
}

impl RegisterForm {
    /// Byte equality of the two password fields.
    fn passwords_match(&self) -> bool {
        self.password.as_bytes() == self.second_password.as_bytes()
    }
}

impl From<RegisterForm> for RegisterRequest {
    fn from(form: RegisterForm) -> Self {
        Self {
            password: form.password,
            phone: form.phone,
            email: form.email,
            name: form.name,
            surname: form.surname,
        }
    }
}

#[utoipa::path(
    post,
    path= "/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses (
        (status = 303, description = "Signed in, redirect to /profile"),
        (status = 401, description = "Credentials rejected", body = ActionState, content_type = "application/json"),
        (status = 502, description = "Remote API unreachable", body = ActionState, content_type = "application/json"),
    ),
    tag= "auth"
)]
#[instrument(skip_all)]
pub async fn login(
    state: Extension<Arc<AppState>>,
    session: SessionWriter,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.api.issue_token(&LoginRequest::from(form)).await {
        Ok(token) => sign_in(session, token),
        Err(e) => action_error(&e),
    }
}

#[utoipa::path(
    post,
    path= "/register",
    request_body(content = RegisterForm, content_type = "application/x-www-form-urlencoded"),
    responses (
        (status = 303, description = "Registered, redirect to /profile"),
        (status = 400, description = "Registration rejected", body = ActionState, content_type = "application/json"),
        (status = 422, description = "Passwords do not match", body = ActionState, content_type = "application/json"),
    ),
    tag= "auth"
)]
#[instrument(skip_all)]
pub async fn register(
    state: Extension<Arc<AppState>>,
    session: SessionWriter,
    Form(form): Form<RegisterForm>,
) -> Response {
    if !form.passwords_match() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ActionState::error(PASSWORD_MISMATCH)),
        )
            .into_response();
    }

    match state.api.register(&RegisterRequest::from(form)).await {
        Ok(token) => sign_in(session, token),
        Err(e) => action_error(&e),
    }
}

#[utoipa::path(
    post,
    path= "/logout",
    responses (
        (status = 303, description = "Session cleared, redirect to /login"),
    ),
    tag= "auth"
)]
#[instrument(skip_all)]
pub async fn logout(mut session: SessionWriter) -> Response {
    session.clear();

    (session, Redirect::to(LOGIN_PATH)).into_response()
}

/// Store the issued token and send the user to their profile.
fn sign_in(mut session: SessionWriter, token: TokenResponse) -> Response {
    let Some(token) = SessionToken::new(token.access_token) else {
        error!("Remote API issued an empty or malformed access token");

        return action_error(&ApiError::Rejected(StatusCode::BAD_GATEWAY));
    };

    session.set(token);
    info!("session started");

    (session, Redirect::to(PROFILE_PATH)).into_response()
}
