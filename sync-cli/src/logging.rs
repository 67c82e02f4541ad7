//! Tracing subscriber setup for the synctrack binary.
//!
//! Logs go to stderr so stdout stays machine-readable.
//!
//! # Priority (highest to lowest)
//!
//! 1. `SYNCTRACK_LOG` env var
//! 2. `RUST_LOG` env var
//! 3. CLI flags (`-v` → debug, `-q` → error)
//! 4. `[logging] level` from the config file (default `warn`)

use tracing::Level;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Verbosity level derived from CLI flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// `--quiet` / `-q`: only errors.
    Quiet,
    /// No flag: the config decides.
    Normal,
    /// `--verbose` / `-v`: debug-level output.
    Verbose,
}

impl Verbosity {
    /// Determine verbosity from the parsed CLI flags. Verbose wins.
    pub const fn from_flags(verbose: bool, quiet: bool) -> Self {
        if verbose {
            Self::Verbose
        } else if quiet {
            Self::Quiet
        } else {
            Self::Normal
        }
    }

    /// Level forced by the flags, if any.
    pub const fn level(self) -> Option<Level> {
        match self {
            Self::Quiet => Some(Level::ERROR),
            Self::Normal => None,
            Self::Verbose => Some(Level::DEBUG),
        }
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Fails if a global subscriber is already set.
pub fn init(
    verbosity: Verbosity,
    config_level: &str,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = build_env_filter(verbosity, config_level);

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .without_time()
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
}

fn build_env_filter(verbosity: Verbosity, config_level: &str) -> EnvFilter {
    // Unparseable env values fall through instead of failing.
    if let Ok(directives) = std::env::var("SYNCTRACK_LOG") {
        if let Ok(filter) = EnvFilter::try_new(&directives) {
            return filter;
        }
    }

    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    if let Some(level) = verbosity.level() {
        return EnvFilter::new(level.as_str());
    }

    EnvFilter::try_new(config_level).unwrap_or_else(|_| EnvFilter::new(Level::WARN.as_str()))
}
