// crates.io
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Fallback filter applied when no directive is configured.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Installs the global `fmt` subscriber filtered by `directives`.
///
/// Invalid directives fall back to [`DEFAULT_LOG_FILTER`]. Returns an error if a global
/// subscriber is already installed.
pub fn init_logging(
	directives: Option<&str>,
) -> Result<(), tracing_subscriber::util::TryInitError> {
	let filter = directives
		.and_then(|value| EnvFilter::try_new(value).ok())
		.unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER));

	tracing_subscriber::registry().with(filter).with(fmt::layer().with_target(true)).try_init()
}
