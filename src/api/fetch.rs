//! Authenticated fetch: one JSON request carrying the session token as a
//! bearer credential. Without a token the call fails before any I/O.

use super::FetchError;
use crate::session::{SessionReader, SessionToken};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, Response,
};
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

/// Method, headers and body of an authenticated request.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl FetchOptions {
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Serialize `body` as the JSON payload.
    ///
    /// # Errors
    /// Returns an error if `body` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }
}

/// Merge the bearer credential over caller headers.
///
/// Caller-supplied `Authorization` values are dropped so exactly one is sent;
/// `Content-Type` defaults to JSON.
pub(crate) fn authorized_headers(
    mut headers: HeaderMap,
    token: &SessionToken,
) -> Result<HeaderMap, FetchError> {
    let mut bearer =
        HeaderValue::from_str(&token.bearer()).map_err(|_| FetchError::InvalidToken)?;
    bearer.set_sensitive(true);

    headers.remove(AUTHORIZATION);
    headers.insert(AUTHORIZATION, bearer);

    if !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    Ok(headers)
}

/// Send `options` to `url` with the session token attached.
///
/// The response is returned as is; callers check the status themselves.
///
/// # Errors
/// [`FetchError::Unauthenticated`] when `session` holds no token, otherwise
/// transport failures.
#[instrument(skip(client, session, options), fields(method = %options.method))]
pub async fn fetch_with_token(
    client: &Client,
    session: &SessionReader,
    url: Url,
    options: FetchOptions,
) -> Result<Response, FetchError> {
    let token = session.token().ok_or(FetchError::Unauthenticated)?;
    let headers = authorized_headers(options.headers, token)?;

    debug!("authenticated request to {}", url.path());

    let mut request = client.request(options.method, url).headers(headers);
    if let Some(body) = options.body {
        request = request.body(body);
    }

    Ok(request.send().await?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;
    use wiremock::matchers::{any, body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session(raw: &str) -> SessionReader {
        SessionReader::new(SessionToken::new(raw))
    }

    #[test]
    fn test_authorized_headers_replaces_caller_authorization() {
        let mut headers = HeaderMap::new();
        headers.append(AUTHORIZATION, HeaderValue::from_static("Bearer evil"));
        headers.append(AUTHORIZATION, HeaderValue::from_static("Basic Zm9vOmJhcg=="));

        let token = SessionToken::new("abc").unwrap();
        let headers = authorized_headers(headers, &token).unwrap();

        let values: Vec<_> = headers.get_all(AUTHORIZATION).iter().collect();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0], "Bearer abc");
    }

    #[test]
    fn test_authorized_headers_keeps_caller_content_type() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        let token = SessionToken::new("abc").unwrap();
        let headers = authorized_headers(headers, &token).unwrap();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "text/plain");
    }

    #[test]
    fn test_authorized_headers_defaults_to_json() {
        let token = SessionToken::new("abc").unwrap();
        let headers = authorized_headers(HeaderMap::new(), &token).unwrap();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[tokio::test]
    async fn test_fetch_without_token_sends_nothing() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let url = Url::parse(&server.uri())?.join("/user/me")?;
        let result = fetch_with_token(
            &Client::new(),
            &SessionReader::default(),
            url,
            FetchOptions::default(),
        )
        .await;

        assert!(matches!(result, Err(FetchError::Unauthenticated)));
        server.verify().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_sends_single_bearer_header() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/me"))
            .and(header("Authorization", "Bearer abc"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let url = Url::parse(&server.uri())?.join("/user/me")?;
        let options = FetchOptions::default()
            .header(AUTHORIZATION, HeaderValue::from_static("Bearer other"));
        let response = fetch_with_token(&Client::new(), &session("abc"), url, options).await?;
        assert_eq!(response.status(), 200);

        let requests = server.received_requests().await.unwrap_or_default();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].headers.get_all("authorization").iter().count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_returns_non_success_untouched() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/user/me"))
            .and(body_json(json!({ "name": "Ivan" })))
            .respond_with(ResponseTemplate::new(422))
            .mount(&server)
            .await;

        let url = Url::parse(&server.uri())?.join("/user/me")?;
        let options = FetchOptions::new(Method::PATCH).json(&json!({ "name": "Ivan" }))?;
        let response = fetch_with_token(&Client::new(), &session("abc"), url, options).await?;
        assert_eq!(response.status(), 422);
        Ok(())
    }
}
