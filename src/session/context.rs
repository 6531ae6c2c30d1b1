//! Per-request session context.
//!
//! [`SessionReader`] is the read-only view any handler may extract.
//! [`SessionWriter`] is the mutation phase: it records cookie writes and emits
//! them as `Set-Cookie` headers when it becomes part of the response. Only
//! action handlers (login, registration, logout) take a writer.

use super::{
    cookie::{clear_cookie, set_cookie, token_from_headers},
    CookieConfig, SessionToken,
};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::SET_COOKIE, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponseParts, ResponseParts},
};
use std::convert::Infallible;
use tracing::error;

/// Token carried by the incoming request, if any.
#[derive(Debug, Clone, Default)]
pub struct SessionReader {
    token: Option<SessionToken>,
}

impl SessionReader {
    #[must_use]
    pub fn new(token: Option<SessionToken>) -> Self {
        Self { token }
    }

    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self::new(token_from_headers(headers))
    }

    #[must_use]
    pub fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionReader
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingWrite {
    Set(SessionToken),
    Clear,
}

/// Write access to the session cookie for the current response.
#[derive(Debug)]
pub struct SessionWriter {
    reader: SessionReader,
    config: CookieConfig,
    pending: Option<PendingWrite>,
}

impl SessionWriter {
    #[must_use]
    pub fn new(reader: SessionReader, config: CookieConfig) -> Self {
        Self {
            reader,
            config,
            pending: None,
        }
    }

    /// Current token, including writes made through this writer.
    #[must_use]
    pub fn token(&self) -> Option<&SessionToken> {
        match &self.pending {
            Some(PendingWrite::Set(token)) => Some(token),
            Some(PendingWrite::Clear) => None,
            None => self.reader.token(),
        }
    }

    /// Store `token`, replacing any previous one.
    pub fn set(&mut self, token: SessionToken) {
        self.pending = Some(PendingWrite::Set(token));
    }

    /// Drop the token and expire the cookie on the client.
    pub fn clear(&mut self) {
        self.pending = Some(PendingWrite::Clear);
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionWriter
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Cookie attributes come from the router; fall back to plain defaults.
        let config = parts
            .extensions
            .get::<CookieConfig>()
            .cloned()
            .unwrap_or_default();

        Ok(Self::new(SessionReader::from_headers(&parts.headers), config))
    }
}

impl IntoResponseParts for SessionWriter {
    type Error = (StatusCode, &'static str);

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        let cookie = match &self.pending {
            Some(PendingWrite::Set(token)) => set_cookie(&self.config, token),
            Some(PendingWrite::Clear) => clear_cookie(&self.config),
            None => return Ok(res),
        };

        match cookie {
            Ok(value) => {
                res.headers_mut().append(SET_COOKIE, value);
                Ok(res)
            }
            Err(e) => {
                error!("Error building session cookie: {e}");

                Err((StatusCode::INTERNAL_SERVER_ERROR, "Invalid session token"))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::{
        http::{header::COOKIE, HeaderValue, Request},
        response::IntoResponse,
    };

    fn token(raw: &str) -> SessionToken {
        SessionToken::new(raw).unwrap()
    }

    #[tokio::test]
    async fn test_reader_extracts_token_from_request() {
        let request = Request::builder()
            .header(COOKIE, "JWT_TOKEN=abc")
            .body(())
            .unwrap();
        let (mut parts, ()) = request.into_parts();

        let reader = SessionReader::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(reader.token(), Some(&token("abc")));
    }

    #[tokio::test]
    async fn test_writer_uses_cookie_config_extension() {
        let mut request = Request::builder().body(()).unwrap();
        request
            .extensions_mut()
            .insert(CookieConfig::new().with_secure(true));
        let (mut parts, ()) = request.into_parts();

        let mut writer = SessionWriter::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        writer.set(token("abc"));

        let response = (writer, StatusCode::OK).into_response();
        let cookie = response.headers().get(SET_COOKIE).unwrap();
        assert!(cookie.to_str().unwrap().ends_with("; Secure"));
    }

    #[test]
    fn test_writer_set_overwrites_previous_token() {
        let reader = SessionReader::new(Some(token("old")));
        let mut writer = SessionWriter::new(reader, CookieConfig::new());
        assert_eq!(writer.token(), Some(&token("old")));

        writer.set(token("new"));
        assert_eq!(writer.token(), Some(&token("new")));
    }

    #[test]
    fn test_writer_clear_removes_token() {
        let reader = SessionReader::new(Some(token("old")));
        let mut writer = SessionWriter::new(reader, CookieConfig::new());
        writer.clear();
        assert!(writer.token().is_none());

        let response = (writer, StatusCode::OK).into_response();
        let cookie = response.headers().get(SET_COOKIE).unwrap();
        assert!(cookie.to_str().unwrap().contains("Max-Age=0"));
    }

    #[test]
    fn test_untouched_writer_emits_nothing() {
        let writer = SessionWriter::new(SessionReader::default(), CookieConfig::new());
        let response = (writer, StatusCode::OK).into_response();
        assert!(response.headers().get(SET_COOKIE).is_none());
    }

    #[test]
    fn test_set_cookie_round_trips_through_reader() {
        let mut writer = SessionWriter::new(SessionReader::default(), CookieConfig::new());
        writer.set(token("eyJhbGciOiJIUzI1NiJ9.e30.sig-_="));
        let response = (writer, StatusCode::OK).into_response();

        let set_cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        let (pair, _) = set_cookie.split_once(';').unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(pair).unwrap());

        assert_eq!(
            SessionReader::from_headers(&headers).token(),
            Some(&token("eyJhbGciOiJIUzI1NiJ9.e30.sig-_="))
        );
    }

    #[test]
    fn test_reader_from_headers_without_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert("x-other", HeaderValue::from_static("1"));
        assert!(SessionReader::from_headers(&headers).token().is_none());
    }
}
