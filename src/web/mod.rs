#![allow(clippy::needless_for_each)]

use crate::{
    api::{
        types::{ActionState, Profile, ProfileUpdate},
        ApiClient,
    },
    session::CookieConfig,
    web::handlers::{
        auth::{
            LoginForm, RegisterForm, __path_login, __path_logout, __path_register, login, logout,
            register,
        },
        health::{Health, __path_health, health},
        profile::{__path_profile, __path_update_profile, profile, update_profile},
    },
};
use anyhow::Result;
use axum::{
    body::Body,
    extract::{Extension, MatchedPath},
    http::{HeaderName, HeaderValue, Request},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use utoipa::OpenApi;

pub mod guard;
pub(crate) mod handlers;

use self::guard::RouteTable;

/// Shared, read-only state of the running server.
#[derive(Debug, Clone)]
pub struct AppState {
    pub api: ApiClient,
    pub routes: RouteTable,
    pub cookie: CookieConfig,
}

impl AppState {
    #[must_use]
    pub fn new(api: ApiClient, routes: RouteTable, cookie: CookieConfig) -> Self {
        Self {
            api,
            routes,
            cookie,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, login, register, logout, profile, update_profile),
    components(schemas(Health, LoginForm, RegisterForm, ActionState, Profile, ProfileUpdate)),
    tags(
        (name = "profile-web", description = "Profile front-end")
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Build the application router.
///
/// Everything except `/health` passes the route guard, including the
/// fallback, so unknown paths are subject to the unguarded policy.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::pages::index))
        .route(
            guard::LOGIN_PATH,
            get(handlers::pages::login_page).post(login),
        )
        .route(
            guard::REGISTER_PATH,
            get(handlers::pages::register_page).post(register),
        )
        .route("/logout", post(logout))
        .route(
            guard::PROFILE_PATH,
            get(profile).patch(update_profile),
        )
        .fallback(handlers::pages::not_found)
        .layer(middleware::from_fn(guard::route_guard))
        .route("/health", get(health).options(health))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(state.cookie.clone()))
                .layer(Extension(state)),
        )
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, state: AppState) -> Result<()> {
    let app = router(Arc::new(state));

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Gracefully shutdown");
            }
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_local_endpoints() {
        let doc = openapi();
        for path in ["/health", "/login", "/register", "/logout", "/profile"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
