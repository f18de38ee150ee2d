use tracing_subscriber::{fmt, EnvFilter};

pub const DEFAULT_FILTER: &str = "warn";

/// Pick the filter directive: explicit flag, then `RUST_LOG`, then `LOG_LEVEL`.
pub fn filter_directive(cli_level: Option<&str>) -> String {
  cli_level
    .map(str::to_string)
    .or_else(|| std::env::var("RUST_LOG").ok())
    .or_else(|| std::env::var("LOG_LEVEL").ok())
    .filter(|s| !s.trim().is_empty())
    .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Install the global subscriber on stderr so stdout carries only the report.
pub fn init_tracing(cli_level: Option<&str>) {
  let directive = filter_directive(cli_level);
  let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

  let _ = fmt()
    .with_env_filter(filter)
    .with_target(true)
    .with_writer(std::io::stderr)
    .try_init();
}
