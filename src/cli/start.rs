use crate::cli::{
    actions::Action, commands, commands::logging::ARG_VERBOSITY, dispatch::handler, telemetry,
};
use anyhow::Result;
use tracing::Level;

fn get_verbosity_level(matches: &clap::ArgMatches) -> Option<Level> {
    match matches.get_one::<u8>(ARG_VERBOSITY).copied() {
        Some(0) | None => None,
        Some(1) => Some(Level::WARN),
        Some(2) => Some(Level::INFO),
        Some(3) => Some(Level::DEBUG),
        _ => Some(Level::TRACE),
    }
}

/// Start the CLI
///
/// # Errors
///
/// Returns an error if logging cannot be initialized or the arguments are invalid
pub fn start() -> Result<Action> {
    let matches = commands::new().get_matches();

    telemetry::init(get_verbosity_level(&matches))?;

    handler(&matches)
}
