use reqwest::StatusCode;
use thiserror::Error;

/// Failures of an authenticated request.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No session token; nothing was sent.
    #[error("not logged in")]
    Unauthenticated,
    #[error("session token is not a valid header value")]
    InvalidToken,
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Failures of a typed remote API call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("remote API responded with {0}")]
    Rejected(StatusCode),
    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid request body: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("invalid response body: {0}")]
    Decode(#[source] reqwest::Error),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Fetch(FetchError::Request(err))
    }
}

impl ApiError {
    /// Status reported to the browser for this failure.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Fetch(FetchError::Unauthenticated) => StatusCode::UNAUTHORIZED,
            Self::Fetch(FetchError::InvalidToken) => StatusCode::BAD_REQUEST,
            Self::Fetch(FetchError::Request(_)) | Self::Decode(_) => StatusCode::BAD_GATEWAY,
            Self::Rejected(status) if status.is_client_error() || status.is_server_error() => {
                *status
            }
            // A non-200 success or redirect from upstream is still a failed action.
            Self::Rejected(_) => StatusCode::BAD_GATEWAY,
            Self::Url(_) | Self::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text shown to the user: the remote reason phrase for rejections,
    /// otherwise the reason phrase of [`ApiError::status`].
    #[must_use]
    pub fn status_text(&self) -> String {
        match self {
            Self::Rejected(status) => super::status_text(*status),
            _ => super::status_text(self.status()),
        }
    }

    /// True when the caller has no usable session.
    #[must_use]
    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            Self::Fetch(FetchError::Unauthenticated | FetchError::InvalidToken)
                | Self::Rejected(StatusCode::UNAUTHORIZED)
        )
    }
}
