use clap::{Arg, Command};

pub const ARG_API_URL: &str = "api-url";
pub const ARG_API_TIMEOUT: &str = "api-timeout";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .short('a')
                .long("api-url")
                .help("Base URL of the remote profile API")
                .default_value("http://localhost:80")
                .env("PROFILE_WEB_API_URL"),
        )
        .arg(
            Arg::new(ARG_API_TIMEOUT)
                .long("api-timeout")
                .help("Timeout in seconds for remote API calls (default: none)")
                .env("PROFILE_WEB_API_TIMEOUT")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}
