//! Identity check: is the session token present and still accepted by the
//! remote service?

use super::{ApiClient, FetchOptions, USER_ME_PATH};
use crate::session::{token_from_headers, SessionReader, SessionToken};
use axum::http::HeaderMap;
use reqwest::StatusCode;
use tracing::{debug, error, instrument};

/// Outcome of one identity check. Never cached across requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityCheck {
    pub is_authenticated: bool,
    pub token: Option<SessionToken>,
}

impl IdentityCheck {
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn authenticated(token: SessionToken) -> Self {
        Self {
            is_authenticated: true,
            token: Some(token),
        }
    }
}

impl ApiClient {
    /// Identity of a raw request, read from its own `Cookie` headers.
    ///
    /// Used by the route guard, which runs before any handler context exists.
    pub async fn identity_from_request(&self, headers: &HeaderMap) -> IdentityCheck {
        self.verify(token_from_headers(headers)).await
    }

    /// Identity of the session a handler extracted.
    pub async fn identity_from_context(&self, session: &SessionReader) -> IdentityCheck {
        self.verify(session.token().cloned()).await
    }

    /// `GET /user/me` with the token; only `200 OK` authenticates.
    #[instrument(skip_all)]
    async fn verify(&self, token: Option<SessionToken>) -> IdentityCheck {
        let Some(token) = token else {
            debug!("no session token");
            return IdentityCheck::anonymous();
        };

        let url = match self.endpoint(USER_ME_PATH) {
            Ok(url) => url,
            Err(e) => {
                error!("Error building verify URL: {e}");
                return IdentityCheck::anonymous();
            }
        };

        let session = SessionReader::new(Some(token.clone()));
        match self.fetch(&session, url, FetchOptions::default()).await {
            Ok(response) if response.status() == StatusCode::OK => {
                IdentityCheck::authenticated(token)
            }
            Ok(response) => {
                debug!("session token rejected: {}", response.status());
                IdentityCheck::anonymous()
            }
            Err(e) => {
                error!("Error verifying session token: {e}");
                IdentityCheck::anonymous()
            }
        }
    }
}
