use crate::{
    cli::{
        actions::{server::Args, Action},
        commands::{api, session, ARG_PORT},
    },
    web::guard::UnguardedPolicy,
};
use anyhow::{Context, Result};
use std::time::Duration;
use url::Url;

/// # Errors
/// Returns an error if required arguments are missing or the API URL is invalid.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);

    let api_url = matches
        .get_one::<String>(api::ARG_API_URL)
        .context("missing required argument: --api-url")?;
    let api_url = Url::parse(api_url).context("invalid PROFILE_WEB_API_URL")?;

    let api_timeout = matches
        .get_one::<u64>(api::ARG_API_TIMEOUT)
        .copied()
        .map(Duration::from_secs);

    let unguarded = if matches.get_flag(session::ARG_FAIL_CLOSED) {
        UnguardedPolicy::Deny
    } else {
        UnguardedPolicy::Allow
    };

    Ok(Action::Server(Args {
        port,
        api_url,
        api_timeout,
        cookie_secure: matches.get_flag(session::ARG_COOKIE_SECURE),
        cookie_max_age: matches.get_one::<u64>(session::ARG_COOKIE_MAX_AGE).copied(),
        unguarded,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    fn dispatch(args: &[&str]) -> Result<Action> {
        let mut argv = vec!["profile-web"];
        argv.extend_from_slice(args);
        handler(&commands::new().get_matches_from(argv))
    }

    fn clean_env<F: FnOnce()>(f: F) {
        temp_env::with_vars(
            [
                ("PROFILE_WEB_PORT", None::<&str>),
                ("PROFILE_WEB_API_URL", None),
                ("PROFILE_WEB_API_TIMEOUT", None),
                ("PROFILE_WEB_COOKIE_SECURE", None),
                ("PROFILE_WEB_COOKIE_MAX_AGE", None),
                ("PROFILE_WEB_FAIL_CLOSED", None),
            ],
            f,
        );
    }

    #[test]
    fn test_handler_defaults() {
        clean_env(|| {
            let Ok(Action::Server(args)) = dispatch(&[]) else {
                panic!("expected server action");
            };
            assert_eq!(args.port, 8080);
            assert_eq!(args.api_url.as_str(), "http://localhost/");
            assert_eq!(args.api_timeout, None);
            assert!(!args.cookie_secure);
            assert_eq!(args.cookie_max_age, None);
            assert_eq!(args.unguarded, UnguardedPolicy::Allow);
        });
    }

    #[test]
    fn test_handler_all_flags() {
        clean_env(|| {
            let Ok(Action::Server(args)) = dispatch(&[
                "--port",
                "9000",
                "--api-url",
                "https://api.example.com/v1/",
                "--api-timeout",
                "7",
                "--cookie-secure",
                "--cookie-max-age",
                "600",
                "--fail-closed",
            ]) else {
                panic!("expected server action");
            };
            assert_eq!(args.port, 9000);
            assert_eq!(args.api_url.as_str(), "https://api.example.com/v1/");
            assert_eq!(args.api_timeout, Some(Duration::from_secs(7)));
            assert!(args.cookie_secure);
            assert_eq!(args.cookie_max_age, Some(600));
            assert_eq!(args.unguarded, UnguardedPolicy::Deny);
        });
    }

    #[test]
    fn test_handler_invalid_api_url() {
        clean_env(|| {
            let result = dispatch(&["--api-url", "not a url"]);
            assert!(result.is_err());
        });
    }
}
