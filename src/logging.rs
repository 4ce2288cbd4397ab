//! Logging initialization and configuration.
//!
//! Log records go to stderr so they never interleave with the stdout of a
//! child process.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive when neither `RUST_LOG` nor a level is given.
pub const DEFAULT_FILTER: &str = "sysexec=info,writer=info";

/// Try to initialize the logging system.
///
/// Uses the `RUST_LOG` environment variable for filtering. If not set,
/// defaults to `sysexec=info,writer=info`.
///
/// Returns `Ok(())` if successful, or `Err` if logging has already been
/// initialized.
pub fn try_init() -> Result<(), tracing_subscriber::util::TryInitError> {
    try_init_with(None)
}

/// Try to initialize logging with a configured level.
///
/// `RUST_LOG` still wins when set. A bare level such as `debug` applies to
/// this crate and the writer utility; anything else is used as a raw filter
/// directive.
pub fn try_init_with(level: Option<&str>) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .try_init()
}

fn env_filter(level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive_for(level)))
}

/// Turn a configured level into a filter directive.
pub fn directive_for(level: Option<&str>) -> String {
    match level.map(str::trim) {
        None | Some("") => DEFAULT_FILTER.to_string(),
        Some(lvl) if is_bare_level(lvl) => format!("sysexec={lvl},writer={lvl}"),
        Some(directive) => directive.to_string(),
    }
}

fn is_bare_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "error" | "warn" | "info" | "debug" | "trace" | "off"
    )
}
