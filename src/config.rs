// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Read service endpoints, credentials, and timeouts from the environment (.env honored)
// role: config/env
// inputs: JIRA_BASE_URL, JIRA_EMAIL|JIRA_USERNAME, JIRA_API_TOKEN|JIRA_TOKEN, GITHUB_API_URL, HTTP_TIMEOUT_SECS
// outputs: AppConfig with optional JiraSettings
// invariants:
// - Jira is unconfigured (None) when JIRA_BASE_URL is absent; partial credentials are an error
// - Trailing slashes are stripped from base URLs
// errors: ConfigError::{Missing, Invalid}
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::env;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JiraSettings {
  pub base_url: String,
  pub email: String,
  pub api_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
  pub jira: Option<JiraSettings>,
  pub github_api_url: String,
  pub http_timeout: Duration,
}

impl AppConfig {
  /// Load configuration from environment variables, after a best-effort `.env` load.
  pub fn from_env() -> Result<Self, ConfigError> {
    let _ = dotenvy::dotenv();

    let jira = match get_opt("JIRA_BASE_URL") {
      None => None,
      Some(base_url) => Some(JiraSettings {
        base_url: base_url.trim_end_matches('/').to_string(),
        email: get_opt("JIRA_EMAIL")
          .or_else(|| get_opt("JIRA_USERNAME"))
          .ok_or(ConfigError::Missing("JIRA_EMAIL"))?,
        api_token: get_opt("JIRA_API_TOKEN")
          .or_else(|| get_opt("JIRA_TOKEN"))
          .ok_or(ConfigError::Missing("JIRA_API_TOKEN"))?,
      }),
    };

    let timeout_secs = match get_opt("HTTP_TIMEOUT_SECS") {
      None => DEFAULT_HTTP_TIMEOUT_SECS,
      Some(raw) => raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
        key: "HTTP_TIMEOUT_SECS",
        message: format!("{raw:?}: {e}"),
      })?,
    };

    Ok(Self {
      jira,
      github_api_url: get_var_or("GITHUB_API_URL", DEFAULT_GITHUB_API_URL)
        .trim_end_matches('/')
        .to_string(),
      http_timeout: Duration::from_secs(timeout_secs),
    })
  }
}

/// Set and non-blank.
fn get_opt(key: &str) -> Option<String> {
  env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn get_var_or(key: &str, default: &str) -> String {
  get_opt(key).unwrap_or_else(|| default.to_owned())
}
