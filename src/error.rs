use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimestampError {
  #[error("unable to parse timestamp {raw:?}")]
  Unparseable { raw: String },
}

/// Failures talking to the issue tracker or the code host.
#[derive(Debug, Error)]
pub enum ClientError {
  #[error("HTTP {status} from {url}: {body}")]
  Http { status: u16, url: String, body: String },

  #[error("request to {url} failed: {message}")]
  Transport { url: String, message: String },

  #[error("could not decode response from {url}: {message}")]
  Decode { url: String, message: String },

  #[error("not configured: {0}")]
  NotConfigured(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("{0} is required but not set")]
  Missing(&'static str),

  #[error("invalid {key}: {message}")]
  Invalid { key: &'static str, message: String },
}

#[derive(Debug, Error)]
pub enum TeamFileError {
  #[error("File not found for {}", .0.display())]
  NotFound(PathBuf),

  #[error("failed to read team file {}: {source}", path.display())]
  Io { path: PathBuf, source: std::io::Error },

  #[error("Failed to process team file {}: {source}", path.display())]
  Malformed { path: PathBuf, source: serde_json::Error },
}
