use super::SessionToken;
use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};

/// Cookie that carries the session token.
pub const TOKEN_COOKIE_NAME: &str = "JWT_TOKEN";

/// Attributes applied to the session cookie when it is written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieConfig {
    secure: bool,
    max_age: Option<u64>,
}

impl CookieConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only mark the cookie `Secure` when the front-end is served over HTTPS.
    #[must_use]
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// `None` keeps the cookie for the browser session only.
    #[must_use]
    pub fn with_max_age(mut self, max_age: Option<u64>) -> Self {
        self.max_age = max_age;
        self
    }

    #[must_use]
    pub fn secure(&self) -> bool {
        self.secure
    }

    #[must_use]
    pub fn max_age(&self) -> Option<u64> {
        self.max_age
    }
}

/// Read the session token from the `Cookie` headers of a request.
///
/// A cookie with an empty value counts as no token.
#[must_use]
pub fn token_from_headers(headers: &HeaderMap) -> Option<SessionToken> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (key, val) = pair.trim().split_once('=')?;
            if key.trim() == TOKEN_COOKIE_NAME {
                Some(val.trim())
            } else {
                None
            }
        })
        .and_then(SessionToken::new)
}

/// Build the `Set-Cookie` value that stores `token`.
pub(crate) fn set_cookie(
    config: &CookieConfig,
    token: &SessionToken,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!(
        "{TOKEN_COOKIE_NAME}={}; Path=/; HttpOnly; SameSite=Lax",
        token.expose()
    );
    if let Some(max_age) = config.max_age() {
        cookie.push_str(&format!("; Max-Age={max_age}"));
    }
    if config.secure() {
        cookie.push_str("; Secure");
    }
    let mut value = HeaderValue::from_str(&cookie)?;
    value.set_sensitive(true);
    Ok(value)
}

/// Build the `Set-Cookie` value that expires the session cookie.
pub(crate) fn clear_cookie(config: &CookieConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{TOKEN_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if config.secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}
