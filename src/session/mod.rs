//! Token store for the session cookie.
//!
//! One opaque token per client, kept in the `JWT_TOKEN` cookie. Reads go
//! through [`SessionReader`], writes through [`SessionWriter`]; both are built
//! from the request being served, there is no process-wide cookie jar.

pub mod context;
pub mod cookie;
pub mod token;

pub use self::context::{SessionReader, SessionWriter};
pub use self::cookie::{CookieConfig, TOKEN_COOKIE_NAME, token_from_headers};
pub use self::token::SessionToken;
