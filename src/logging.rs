//! Logging setup for the command line tool.
//!
//! Everything is logged through `tracing` to stderr, so stdout stays free for
//! output. `RUST_LOG` takes precedence over the verbosity flags.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone)]
pub struct LogConfig {
	pub level: LevelFilter,
	/// Ignore `RUST_LOG` even if it's set
	pub ignore_env: bool,
	pub with_ansi: bool,
}

impl Default for LogConfig {
	fn default() -> Self {
		Self {
			level: LevelFilter::INFO,
			ignore_env: false,
			with_ansi: true,
		}
	}
}

impl LogConfig {
	/// `-q` wins over `-v`. 0 is info, 1 is debug and 2 or more is trace.
	pub fn from_verbosity(verbose: u8, quiet: bool) -> Self {
		let level = match (quiet, verbose) {
			(true, _) => LevelFilter::ERROR,
			(false, 0) => LevelFilter::INFO,
			(false, 1) => LevelFilter::DEBUG,
			(false, _) => LevelFilter::TRACE,
		};
		Self {
			level,
			..Self::default()
		}
	}

	fn filter(&self) -> EnvFilter {
		let fallback = EnvFilter::default().add_directive(self.level.into());
		if self.ignore_env {
			return fallback;
		}
		EnvFilter::try_from_default_env().unwrap_or(fallback)
	}
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LogConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
	tracing_subscriber::registry()
		.with(config.filter())
		.with(
			fmt::layer()
				.with_writer(std::io::stderr)
				.with_target(false)
				.with_ansi(config.with_ansi),
		)
		.try_init()
}

#[test]
fn verbosity_levels() {
	assert_eq!(LogConfig::from_verbosity(0, false).level, LevelFilter::INFO);
	assert_eq!(LogConfig::from_verbosity(1, false).level, LevelFilter::DEBUG);
	assert_eq!(LogConfig::from_verbosity(3, false).level, LevelFilter::TRACE);
	assert_eq!(LogConfig::from_verbosity(2, true).level, LevelFilter::ERROR);
}
