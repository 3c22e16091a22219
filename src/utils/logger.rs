use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const QUIET: &str = "mollusk_rest=info";
const VERBOSE: &str = "mollusk_rest=debug,tower_http=debug,info";

/// Filter directives used when `RUST_LOG` is unset: the config file wins, then `--verbose`.
pub fn default_directives(logging: &LoggingConfig, verbose: bool) -> &str {
    match logging.filter.as_deref() {
        Some(filter) => filter,
        None if verbose => VERBOSE,
        None => QUIET,
    }
}

pub fn init_logger(logging: &LoggingConfig, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(logging, verbose)))
        .unwrap_or_else(|_| EnvFilter::new(QUIET));

    let layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false);
    let registry = tracing_subscriber::registry().with(filter);

    match logging.format {
        LogFormat::Compact => registry.with(layer.compact()).init(),
        LogFormat::Json => registry.with(layer.json()).init(),
    }
}
