//! Structured logging setup

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "ASSOCFORGE_LOG";

/// Initialize the tracing subscriber on stderr.
///
/// Respects `ASSOCFORGE_LOG`; otherwise logs at `debug` when verbose and
/// `warn` when not, so the rule table on stdout stays clean.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "assocforge=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    // A subscriber may already be installed when embedded or under test
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
