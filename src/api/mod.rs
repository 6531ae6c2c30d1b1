//! Client for the remote profile API.
//!
//! The API is an external JSON-over-HTTP service. Only `200 OK` counts as
//! success; any other status is surfaced through its reason phrase.

pub mod client;
pub mod error;
pub mod fetch;
pub mod identity;
pub mod types;

pub use self::client::ApiClient;
pub use self::error::{ApiError, FetchError};
pub use self::fetch::FetchOptions;
pub use self::identity::IdentityCheck;

use reqwest::StatusCode;

pub const USER_TOKEN_PATH: &str = "/user/token";
pub const USER_REGISTER_PATH: &str = "/user/register";
pub const USER_ME_PATH: &str = "/user/me";

/// Reason phrase for `status`, the text users see when an action fails.
#[must_use]
pub fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map_or_else(|| status.as_str().to_string(), str::to_string)
}
