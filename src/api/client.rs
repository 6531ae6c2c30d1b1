use super::{
    fetch::fetch_with_token,
    types::{LoginRequest, Profile, ProfileUpdate, RegisterRequest, TokenResponse},
    ApiError, FetchError, FetchOptions, USER_ME_PATH, USER_REGISTER_PATH, USER_TOKEN_PATH,
};
use crate::session::SessionReader;
use reqwest::{Client, Method, Response, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Handle to the remote profile API. Cheap to clone; clones share one
/// connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    /// `timeout` of `None` keeps the HTTP client default (no timeout).
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: Url, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder().user_agent(crate::APP_USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
        })
    }

    /// Absolute URL of `path` under the API base, keeping any base path prefix.
    ///
    /// # Errors
    /// Returns an error if the joined URL does not parse.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}/{}", path.trim().trim_start_matches('/')))
    }

    /// Authenticated fetch against any URL, see [`fetch_with_token`].
    ///
    /// # Errors
    /// [`FetchError::Unauthenticated`] without a token, otherwise transport failures.
    pub async fn fetch(
        &self,
        session: &SessionReader,
        url: Url,
        options: FetchOptions,
    ) -> Result<Response, FetchError> {
        fetch_with_token(&self.http, session, url, options).await
    }

    /// Exchange credentials for a session token.
    ///
    /// # Errors
    /// [`ApiError::Rejected`] for any status other than `200 OK`.
    #[instrument(skip_all)]
    pub async fn issue_token(&self, credentials: &LoginRequest) -> Result<TokenResponse, ApiError> {
        self.exchange(USER_TOKEN_PATH, credentials).await
    }

    /// Create an account and receive its session token.
    ///
    /// # Errors
    /// [`ApiError::Rejected`] for any status other than `200 OK`.
    #[instrument(skip_all)]
    pub async fn register(&self, account: &RegisterRequest) -> Result<TokenResponse, ApiError> {
        self.exchange(USER_REGISTER_PATH, account).await
    }

    /// Load the current user.
    ///
    /// # Errors
    /// Fails without a token, on transport errors and on any non-200 status.
    #[instrument(skip_all)]
    pub async fn me(&self, session: &SessionReader) -> Result<Profile, ApiError> {
        let url = self.endpoint(USER_ME_PATH)?;
        let response = self.fetch(session, url, FetchOptions::default()).await?;

        ensure_ok(&response)?;

        response.json::<Profile>().await.map_err(ApiError::Decode)
    }

    /// Apply a partial update to the current user.
    ///
    /// # Errors
    /// Fails without a token, on transport errors and on any non-200 status.
    #[instrument(skip_all)]
    pub async fn update_me(
        &self,
        session: &SessionReader,
        update: &ProfileUpdate,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(USER_ME_PATH)?;
        let options = FetchOptions::new(Method::PATCH).json(update)?;
        let response = self.fetch(session, url, options).await?;

        ensure_ok(&response)
    }

    async fn exchange<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<TokenResponse, ApiError> {
        let url = self.endpoint(path)?;
        let response = self.http.post(url).json(body).send().await?;

        ensure_ok(&response)?;

        response
            .json::<TokenResponse>()
            .await
            .map_err(ApiError::Decode)
    }
}

fn ensure_ok(response: &Response) -> Result<(), ApiError> {
    let status = response.status();
    if status == StatusCode::OK {
        Ok(())
    } else {
        debug!("{} responded with {}", response.url().path(), status);

        Err(ApiError::Rejected(status))
    }
}
