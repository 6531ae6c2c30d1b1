//! Route guard.
//!
//! Each request is classified as protected, public or unguarded. Protected
//! requests need a token the remote API accepts; otherwise they are redirected
//! to the login page before any handler runs. Unguarded paths follow the
//! configured [`UnguardedPolicy`].

use crate::{api::IdentityCheck, web::AppState};
use axum::{
    extract::{Extension, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::{fmt, sync::Arc};
use tracing::{debug, info};

pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const PROFILE_PATH: &str = "/profile";
pub const INDEX_PATH: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Protected,
    Public,
    Unguarded,
}

/// What to do with paths that are neither protected nor public.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnguardedPolicy {
    /// Let them through (fail-open).
    #[default]
    Allow,
    /// Guard them like protected paths (fail-closed).
    Deny,
}

impl fmt::Display for UnguardedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => f.write_str("allow"),
            Self::Deny => f.write_str("deny"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect,
}

/// Static partition of paths, read-only once the server starts.
#[derive(Debug, Clone)]
pub struct RouteTable {
    protected: Vec<String>,
    public: Vec<String>,
    login_path: String,
    unguarded: UnguardedPolicy,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(
            [PROFILE_PATH],
            [LOGIN_PATH, REGISTER_PATH, INDEX_PATH],
            LOGIN_PATH,
        )
    }
}

impl RouteTable {
    #[must_use]
    pub fn new<P, Q>(protected: P, public: Q, login_path: &str) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        Q: IntoIterator,
        Q::Item: Into<String>,
    {
        Self {
            protected: protected.into_iter().map(Into::into).collect(),
            public: public.into_iter().map(Into::into).collect(),
            login_path: login_path.to_string(),
            unguarded: UnguardedPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_unguarded_policy(mut self, policy: UnguardedPolicy) -> Self {
        self.unguarded = policy;
        self
    }

    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Protected paths cover their sub-paths; public paths match exactly.
    #[must_use]
    pub fn classify(&self, path: &str) -> RouteClass {
        let protected = self.protected.iter().any(|prefix| {
            path == prefix
                || path
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        });

        if protected {
            RouteClass::Protected
        } else if self.public.iter().any(|p| p == path) {
            RouteClass::Public
        } else {
            RouteClass::Unguarded
        }
    }

    /// Whether the decision for `class` depends on the caller's identity.
    #[must_use]
    pub fn requires_identity(&self, class: RouteClass) -> bool {
        match class {
            RouteClass::Protected => true,
            RouteClass::Public => false,
            RouteClass::Unguarded => self.unguarded == UnguardedPolicy::Deny,
        }
    }

    #[must_use]
    pub fn decide(&self, class: RouteClass, identity: &IdentityCheck) -> Decision {
        if self.requires_identity(class) && !identity.is_authenticated {
            Decision::Redirect
        } else {
            Decision::Allow
        }
    }
}

/// Middleware: redirect unauthenticated requests for guarded paths to login.
pub async fn route_guard(
    Extension(state): Extension<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let class = state.routes.classify(&path);

    if !state.routes.requires_identity(class) {
        return next.run(request).await;
    }

    let identity = state.api.identity_from_request(request.headers()).await;

    match state.routes.decide(class, &identity) {
        Decision::Allow => {
            debug!(path, "authenticated request allowed");
            next.run(request).await
        }
        Decision::Redirect => {
            info!(path, "unauthenticated request redirected to login");
            Redirect::to(state.routes.login_path()).into_response()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::session::SessionToken;

    fn authenticated() -> IdentityCheck {
        IdentityCheck::authenticated(SessionToken::new("abc").unwrap())
    }

    #[test]
    fn test_classify_default_table() {
        let routes = RouteTable::default();
        assert_eq!(routes.classify("/profile"), RouteClass::Protected);
        assert_eq!(routes.classify("/profile/edit"), RouteClass::Protected);
        assert_eq!(routes.classify("/login"), RouteClass::Public);
        assert_eq!(routes.classify("/register"), RouteClass::Public);
        assert_eq!(routes.classify("/"), RouteClass::Public);
        assert_eq!(routes.classify("/profiles"), RouteClass::Unguarded);
        assert_eq!(routes.classify("/about"), RouteClass::Unguarded);
    }

    #[test]
    fn test_protected_requires_identity() {
        let routes = RouteTable::default();
        assert_eq!(
            routes.decide(RouteClass::Protected, &IdentityCheck::anonymous()),
            Decision::Redirect
        );
        assert_eq!(
            routes.decide(RouteClass::Protected, &authenticated()),
            Decision::Allow
        );
    }

    #[test]
    fn test_public_always_allowed() {
        let routes = RouteTable::default().with_unguarded_policy(UnguardedPolicy::Deny);
        assert!(!routes.requires_identity(RouteClass::Public));
        assert_eq!(
            routes.decide(RouteClass::Public, &IdentityCheck::anonymous()),
            Decision::Allow
        );
    }

    #[test]
    fn test_unguarded_follows_policy() {
        let open = RouteTable::default();
        assert!(!open.requires_identity(RouteClass::Unguarded));
        assert_eq!(
            open.decide(RouteClass::Unguarded, &IdentityCheck::anonymous()),
            Decision::Allow
        );

        let closed = RouteTable::default().with_unguarded_policy(UnguardedPolicy::Deny);
        assert_eq!(
            closed.decide(RouteClass::Unguarded, &IdentityCheck::anonymous()),
            Decision::Redirect
        );
        assert_eq!(
            closed.decide(RouteClass::Unguarded, &authenticated()),
            Decision::Allow
        );
    }

    #[test]
    fn test_custom_table() {
        let routes = RouteTable::new(["/settings", "/profile"], ["/"], "/signin");
        assert_eq!(routes.classify("/settings/security"), RouteClass::Protected);
        assert_eq!(routes.login_path(), "/signin");
    }
}
