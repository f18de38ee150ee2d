// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Code-host seam (CodeHost) counting closed PRs authored/reviewed via the GitHub search API
// role: client/github
// inputs: GitHub login; since date; env GITHUB_TOKEN/GH_TOKEN or `gh auth token`; GITHUB_API_URL; EAR_TEST_GITHUB_COUNTS_JSON
// outputs: PR counts (search `total_count`)
// side_effects: Network calls to the GitHub API; spawns `gh` for token discovery when env vars are absent
// invariants:
// - Token discovery prefers GITHUB_TOKEN, then GH_TOKEN, then `gh auth token`
// - Env fixtures win over HTTP whenever EAR_TEST_GITHUB_COUNTS_JSON is set
// - Reviewed counts exclude the reviewer's own PRs
// errors: ClientError from the search call; a missing token yields no backend (callers report zeros)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Duration;

use chrono::NaiveDate;

use crate::error::ClientError;
use crate::ext::serde_json::JsonFetch;
use crate::http;

pub const COUNTS_FIXTURE_VAR: &str = "EAR_TEST_GITHUB_COUNTS_JSON";

pub trait CodeHost: Send + Sync {
  /// Closed PRs opened by `login` after `since`.
  fn prs_authored(&self, login: &str, since: NaiveDate) -> Result<u64, ClientError>;

  /// Closed PRs reviewed by `login` after `since`, excluding their own.
  fn prs_reviewed(&self, login: &str, since: NaiveDate) -> Result<u64, ClientError>;
}

pub fn authored_query(login: &str, since: NaiveDate) -> String {
  format!("author:{login} is:pr closed:>{}", since.format("%Y-%m-%d"))
}

pub fn reviewed_query(login: &str, since: NaiveDate) -> String {
  format!("reviewed-by:{login} -author:{login} is:pr is:closed closed:>{}", since.format("%Y-%m-%d"))
}

/// Discover a GitHub token: env vars first, then `gh auth token` if available.
pub fn get_github_token() -> Option<String> {
  for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
    if let Ok(t) = std::env::var(var) {
      if !t.trim().is_empty() {
        return Some(t.trim().to_string());
      }
    }
  }

  if let Ok(output) = std::process::Command::new("gh").args(["auth", "token"]).output() {
    if output.status.success() {
      let t = String::from_utf8_lossy(&output.stdout).trim().to_string();

      if !t.is_empty() {
        return Some(t);
      }
    }
  }

  None
}

pub struct GithubHttpHost {
  agent: ureq::Agent,
  api_url: String,
  token: String,
}

impl GithubHttpHost {
  pub fn new(api_url: &str, token: String, timeout: Duration) -> Self {
    Self { agent: http::agent(timeout), api_url: api_url.trim_end_matches('/').to_string(), token }
  }

  fn search_count(&self, q: &str) -> Result<u64, ClientError> {
    let url = format!("{}/search/issues", self.api_url);
    let req = self
      .agent
      .get(&url)
      .set("Accept", "application/vnd.github+json")
      .set("Authorization", &format!("Bearer {}", self.token))
      .query("q", q);
    let v: serde_json::Value = http::get_json(req, &url)?;

    v.fetch("total_count").to::<u64>().ok_or_else(|| ClientError::Decode {
      url,
      message: "missing total_count".into(),
    })
  }
}

impl CodeHost for GithubHttpHost {
  fn prs_authored(&self, login: &str, since: NaiveDate) -> Result<u64, ClientError> {
    self.search_count(&authored_query(login, since))
  }

  fn prs_reviewed(&self, login: &str, since: NaiveDate) -> Result<u64, ClientError> {
    self.search_count(&reviewed_query(login, since))
  }
}

/// Fixture backend: `{"<login>": {"authored": n, "reviewed": m}}`; unknown logins count 0.
pub struct GithubEnvHost;

impl GithubEnvHost {
  fn count(&self, login: &str, key: &str) -> Result<u64, ClientError> {
    let Ok(s) = std::env::var(COUNTS_FIXTURE_VAR) else {
      return Ok(0);
    };
    let v: serde_json::Value = serde_json::from_str(&s).map_err(|e| ClientError::Decode {
      url: format!("env:{COUNTS_FIXTURE_VAR}"),
      message: e.to_string(),
    })?;

    Ok(v.fetch_in(&[login, key]).to_or_default())
  }
}

impl CodeHost for GithubEnvHost {
  fn prs_authored(&self, login: &str, _since: NaiveDate) -> Result<u64, ClientError> {
    self.count(login, "authored")
  }

  fn prs_reviewed(&self, login: &str, _since: NaiveDate) -> Result<u64, ClientError> {
    self.count(login, "reviewed")
  }
}

pub fn env_wants_mock() -> bool {
  std::env::var(COUNTS_FIXTURE_VAR).is_ok()
}

/// Pick the backend; `None` when there is neither a fixture nor a token.
pub fn build_code_host(api_url: &str, timeout: Duration) -> Option<Box<dyn CodeHost>> {
  if env_wants_mock() {
    return Some(Box::new(GithubEnvHost));
  }
  match get_github_token() {
    Some(token) => Some(Box::new(GithubHttpHost::new(api_url, token, timeout))),
    None => {
      tracing::warn!("no GitHub token found (GITHUB_TOKEN, GH_TOKEN, gh auth token); PR counts will be 0");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::http::testing::serve;
  use serial_test::serial;

  fn since() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
  }

  #[test]
  fn queries_match_search_syntax() {
    assert_eq!(authored_query("octocat", since()), "author:octocat is:pr closed:>2024-02-29");
    assert_eq!(
      reviewed_query("octocat", since()),
      "reviewed-by:octocat -author:octocat is:pr is:closed closed:>2024-02-29"
    );
  }

  #[test]
  #[serial]
  fn token_prefers_github_token_then_gh_token() {
    std::env::set_var("GITHUB_TOKEN", "  primary ");
    std::env::set_var("GH_TOKEN", "secondary");
    assert_eq!(get_github_token().as_deref(), Some("primary"));
    std::env::set_var("GITHUB_TOKEN", "");
    assert_eq!(get_github_token().as_deref(), Some("secondary"));
    std::env::remove_var("GITHUB_TOKEN");
    std::env::remove_var("GH_TOKEN");
  }

  #[test]
  fn http_search_reads_total_count() {
    let (base, rx, handle) = serve(vec![("200 OK", r#"{"total_count":12,"items":[]}"#.into())]);
    let host = GithubHttpHost::new(&base, "t0k".into(), Duration::from_secs(5));
    let n = host.prs_reviewed("octocat", since()).unwrap();
    handle.join().unwrap();

    assert_eq!(n, 12);
    let head = rx.recv().unwrap();
    assert!(head.starts_with("GET /search/issues?q="));
    assert!(head.contains("reviewed-by"));
    assert!(head.to_lowercase().contains("authorization: bearer t0k"));
  }

  #[test]
  fn http_search_without_total_count_is_decode_error() {
    let (base, _rx, handle) = serve(vec![("200 OK", r#"{"message":"odd"}"#.into())]);
    let host = GithubHttpHost::new(&base, "t".into(), Duration::from_secs(5));
    let err = host.prs_authored("octocat", since()).unwrap_err();
    handle.join().unwrap();
    assert!(matches!(err, ClientError::Decode { .. }));
  }

  #[test]
  fn http_rate_limit_is_http_error() {
    let (base, _rx, handle) = serve(vec![("403 Forbidden", r#"{"message":"API rate limit exceeded"}"#.into())]);
    let host = GithubHttpHost::new(&base, "t".into(), Duration::from_secs(5));
    let err = host.prs_authored("octocat", since()).unwrap_err();
    handle.join().unwrap();
    assert!(err.to_string().contains("rate limit"));
  }

  #[test]
  #[serial]
  fn env_backend_counts_by_login() {
    std::env::set_var(COUNTS_FIXTURE_VAR, r#"{"alice":{"authored":4,"reviewed":9},"bob.smith":{"authored":1}}"#);
    let host = build_code_host("http://unused", Duration::from_secs(1)).unwrap();
    let alice = (host.prs_authored("alice", since()).unwrap(), host.prs_reviewed("alice", since()).unwrap());
    let bob = (host.prs_authored("bob.smith", since()).unwrap(), host.prs_reviewed("bob.smith", since()).unwrap());
    let nobody = host.prs_authored("carol", since()).unwrap();
    std::env::remove_var(COUNTS_FIXTURE_VAR);

    assert_eq!(alice, (4, 9));
    assert_eq!(bob, (1, 0));
    assert_eq!(nobody, 0);
  }
}
