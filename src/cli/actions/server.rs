use crate::{
    api::ApiClient,
    cli::telemetry,
    session::CookieConfig,
    web::{self, guard::RouteTable, guard::UnguardedPolicy, AppState},
};
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::info;
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub api_url: Url,
    pub api_timeout: Option<Duration>,
    pub cookie_secure: bool,
    pub cookie_max_age: Option<u64>,
    pub unguarded: UnguardedPolicy,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the HTTP client cannot be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    let api = ApiClient::new(args.api_url, args.api_timeout)
        .context("Could not build the remote API client")?;

    let routes = RouteTable::default().with_unguarded_policy(args.unguarded);

    let cookie = CookieConfig::new()
        .with_secure(args.cookie_secure)
        .with_max_age(args.cookie_max_age);

    let result = web::new(args.port, AppState::new(api, routes, cookie)).await;

    telemetry::shutdown_tracer();

    result
}

fn log_startup_args(args: &Args) {
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("api_url", args.api_url.to_string()),
        (
            "api_timeout",
            args.api_timeout
                .map_or_else(|| "none".to_string(), |t| format!("{}s", t.as_secs())),
        ),
        ("cookie_secure", args.cookie_secure.to_string()),
        (
            "cookie_max_age",
            args.cookie_max_age
                .map_or_else(|| "session".to_string(), |s| format!("{s}s")),
        ),
        ("unguarded_paths", args.unguarded.to_string()),
    ];
    log_entries("Startup configuration", &entries);
}

fn log_entries(title: &str, entries: &[(&str, String)]) {
    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!(
        "{} {} - {}\n\n{title}:",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        short_commit(crate::GIT_COMMIT_HASH)
    );
    for (key, value) in entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    info!("{message}");
}

fn short_commit(hash: &str) -> String {
    let trimmed = hash.trim();
    if trimmed.len() > 7 {
        trimmed[..7].to_string()
    } else {
        trimmed.to_string()
    }
}
