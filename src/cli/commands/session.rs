use clap::{Arg, ArgAction, Command};

pub const ARG_COOKIE_SECURE: &str = "cookie-secure";
pub const ARG_COOKIE_MAX_AGE: &str = "cookie-max-age";
pub const ARG_FAIL_CLOSED: &str = "fail-closed";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_COOKIE_SECURE)
                .long("cookie-secure")
                .help("Mark the session cookie Secure (serve over HTTPS)")
                .env("PROFILE_WEB_COOKIE_SECURE")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(ARG_COOKIE_MAX_AGE)
                .long("cookie-max-age")
                .help("Session cookie lifetime in seconds (default: browser session)")
                .env("PROFILE_WEB_COOKIE_MAX_AGE")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_FAIL_CLOSED)
                .long("fail-closed")
                .help("Require a session for every path that is not explicitly public")
                .env("PROFILE_WEB_FAIL_CLOSED")
                .action(ArgAction::SetTrue),
        )
}
