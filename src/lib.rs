//! # profile-web
//!
//! Server side of the profile front-end. Users sign in with a phone number or
//! an email plus password, register, and edit their profile; all user data
//! lives behind a remote JSON API.
//!
//! ## Sessions
//!
//! The remote identity service issues an opaque bearer token that is kept in
//! the `JWT_TOKEN` cookie. Handlers never touch the cookie jar directly:
//! reading goes through [`session::SessionReader`], writing through
//! [`session::SessionWriter`], which only action handlers extract.
//!
//! ## Route guard
//!
//! Every request passes [`web::guard::route_guard`] first. Protected paths
//! (`/profile`) require a token that `GET /user/me` accepts with `200 OK`;
//! anything else redirects to `/login`. The result is never cached, so each
//! guarded request costs one round trip to the remote API.

pub mod api;
pub mod cli;
pub mod session;
pub mod web;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
