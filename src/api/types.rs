use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /user/token`. Missing contacts are sent as empty strings.
#[derive(Serialize, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub password: String,
    pub phone: String,
    pub email: String,
}

/// Body of `POST /user/register`.
#[derive(Serialize, Clone, PartialEq, Eq)]
pub struct RegisterRequest {
    pub password: String,
    pub phone: String,
    pub email: String,
    pub name: String,
    pub surname: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Current user as returned by `GET /user/me`.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub university: Option<String>,
    #[serde(default)]
    pub birthdate: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub short_status: Option<String>,
    #[serde(default)]
    pub full_status: Option<String>,
    #[serde(default)]
    pub about_me: Option<String>,
    #[serde(default)]
    pub links: Option<String>,
}

/// Partial profile for `PATCH /user/me`; absent fields are left untouched.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about_me: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<String>,
}

impl ProfileUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Errors of a failed login or registration, shown as a list.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionState {
    pub errors: Vec<String>,
}

impl ActionState {
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            errors: vec![message.into()],
        }
    }
}
