// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Issue-tracker seam (IssueTracker) with a Jira REST backend and an env-fixture backend
// role: client/jira
// inputs: JiraSettings (base URL, basic-auth credentials), timeout; or EAR_TEST_JIRA_* env fixtures
// outputs: TrackerUser lists; domain Issues with oldest-first histories
// side_effects: Network calls to the Jira REST API (HTTP backend only)
// invariants:
// - User search pages by 1000, issue search by 100; at most 6 pages each
// - Paging stops on an empty or short page
// - Backend selection: env fixtures win over HTTP when any EAR_TEST_JIRA_* variable is set
// errors: ClientError from transport/decode/status; fixture decode failures surface as ClientError::Decode
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Duration;

use chrono::NaiveDate;

use super::models::{JiraIssue, SearchResponse, TrackerUser};
use crate::config::JiraSettings;
use crate::error::ClientError;
use crate::ext::serde_json::JsonFetch;
use crate::http;
use crate::model::{Issue, IssueType};

pub const USER_PAGE_SIZE: usize = 1000;
pub const ISSUE_PAGE_SIZE: usize = 100;
pub const MAX_PAGES: usize = 6;
pub const ISSUE_FIELDS: &str = "id,key,summary,assignee,issuetype,customfield_10026,status";

pub const USERS_FIXTURE_VAR: &str = "EAR_TEST_JIRA_USERS_JSON";
pub const ISSUES_FIXTURE_VAR: &str = "EAR_TEST_JIRA_ISSUES_JSON";

pub trait IssueTracker: Send + Sync {
  /// Users matching a free-text query (usually an email address).
  fn find_users(&self, query: &str) -> Result<Vec<TrackerUser>, ClientError>;

  /// Issues of one type assigned to `account_id` and updated on or after `since`.
  fn closed_issues(&self, account_id: &str, issue_type: &IssueType, since: NaiveDate) -> Result<Vec<Issue>, ClientError>;
}

/// Fetch pages of `page_size` starting at offset 0 until a short or empty
/// page, or `MAX_PAGES` pages.
fn paginate<T>(
  page_size: usize,
  mut fetch_page: impl FnMut(usize) -> Result<Vec<T>, ClientError>,
) -> Result<Vec<T>, ClientError> {
  let mut out = Vec::new();

  for page in 0..MAX_PAGES {
    let items = fetch_page(page * page_size)?;
    let n = items.len();
    out.extend(items);

    if n < page_size {
      break;
    }
  }

  Ok(out)
}

pub fn issue_jql(account_id: &str, issue_type: &IssueType, since: NaiveDate) -> String {
  format!(
    "assignee={} AND updated>={} AND issuetype in ({})",
    account_id,
    since.format("%Y-%m-%d"),
    issue_type.name()
  )
}

pub struct JiraHttpTracker {
  agent: ureq::Agent,
  settings: JiraSettings,
}

impl JiraHttpTracker {
  pub fn new(settings: JiraSettings, timeout: Duration) -> Self {
    Self { agent: http::agent(timeout), settings }
  }

  fn get(&self, url: &str) -> ureq::Request {
    self
      .agent
      .get(url)
      .set("Accept", "application/json")
      .set("Authorization", &http::basic_auth(&self.settings.email, &self.settings.api_token))
  }
}

impl IssueTracker for JiraHttpTracker {
  fn find_users(&self, query: &str) -> Result<Vec<TrackerUser>, ClientError> {
    let url = format!("{}/rest/api/3/user/search", self.settings.base_url);

    paginate(USER_PAGE_SIZE, |start_at| {
      let req = self
        .get(&url)
        .query("query", query)
        .query("maxResults", &USER_PAGE_SIZE.to_string())
        .query("startAt", &start_at.to_string());
      http::get_json::<Vec<TrackerUser>>(req, &url)
    })
  }

  fn closed_issues(&self, account_id: &str, issue_type: &IssueType, since: NaiveDate) -> Result<Vec<Issue>, ClientError> {
    let url = format!("{}/rest/api/2/search", self.settings.base_url);
    let jql = issue_jql(account_id, issue_type, since);

    let raw = paginate(ISSUE_PAGE_SIZE, |start_at| {
      let req = self
        .get(&url)
        .query("jql", &jql)
        .query("fields", ISSUE_FIELDS)
        .query("expand", "changelog")
        .query("startAt", &start_at.to_string())
        .query("maxResults", &ISSUE_PAGE_SIZE.to_string());
      let page: SearchResponse = http::get_json(req, &url)?;
      tracing::debug!(account_id, start_at = page.start_at, total = page.total, n = page.issues.len(), "issue page");
      Ok(page.issues)
    })?;

    if raw.is_empty() {
      tracing::info!(account_id, issue_type = %issue_type, "no issues found");
    }

    Ok(raw.into_iter().map(JiraIssue::into_issue).collect())
  }
}

/// Fixture backend fed from environment variables.
///
/// `EAR_TEST_JIRA_USERS_JSON`: array of user-search results.
/// `EAR_TEST_JIRA_ISSUES_JSON`: object of account id -> array of search-result issues.
pub struct JiraEnvTracker;

fn fixture(var: &str) -> Result<Option<serde_json::Value>, ClientError> {
  match std::env::var(var) {
    Ok(s) => serde_json::from_str(&s).map(Some).map_err(|e| ClientError::Decode {
      url: format!("env:{var}"),
      message: e.to_string(),
    }),
    Err(_) => Ok(None),
  }
}

fn fixture_shape_error(var: &str, expected: &str) -> ClientError {
  ClientError::Decode { url: format!("env:{var}"), message: format!("expected {expected}") }
}

impl IssueTracker for JiraEnvTracker {
  fn find_users(&self, query: &str) -> Result<Vec<TrackerUser>, ClientError> {
    let Some(v) = fixture(USERS_FIXTURE_VAR)? else {
      return Ok(Vec::new());
    };
    let users: Vec<TrackerUser> = v.fetch("").to().ok_or_else(|| fixture_shape_error(USERS_FIXTURE_VAR, "an array of users"))?;
    let q = query.to_lowercase();

    Ok(
      users
        .into_iter()
        .filter(|u| {
          u.email_address.as_deref().is_some_and(|e| e.to_lowercase().contains(&q))
            || u.display_name.as_deref().is_some_and(|d| d.to_lowercase().contains(&q))
        })
        .collect(),
    )
  }

  fn closed_issues(&self, account_id: &str, issue_type: &IssueType, _since: NaiveDate) -> Result<Vec<Issue>, ClientError> {
    let Some(v) = fixture(ISSUES_FIXTURE_VAR)? else {
      return Ok(Vec::new());
    };
    let entry = v.fetch_in(&[account_id]);
    if !entry.exists() {
      return Ok(Vec::new());
    }
    let raw: Vec<JiraIssue> = entry
      .to()
      .ok_or_else(|| fixture_shape_error(ISSUES_FIXTURE_VAR, &format!("an array of issues for {account_id}")))?;

    Ok(
      raw
        .into_iter()
        .filter(|i| i.type_name() == Some(issue_type.name()))
        .map(JiraIssue::into_issue)
        .collect(),
    )
  }
}

pub fn env_wants_mock() -> bool {
  std::env::var(USERS_FIXTURE_VAR).is_ok() || std::env::var(ISSUES_FIXTURE_VAR).is_ok()
}

/// Pick the backend: env fixtures when present, otherwise Jira over HTTP.
pub fn build_tracker(settings: Option<&JiraSettings>, timeout: Duration) -> Result<Box<dyn IssueTracker>, ClientError> {
  if env_wants_mock() {
    return Ok(Box::new(JiraEnvTracker));
  }
  match settings {
    Some(s) => Ok(Box::new(JiraHttpTracker::new(s.clone(), timeout))),
    None => Err(ClientError::NotConfigured(
      "set JIRA_BASE_URL, JIRA_EMAIL and JIRA_API_TOKEN".into(),
    )),
  }
}

/// Resolve one tracker user by email: an exact (case-insensitive) email match
/// wins, otherwise the first search hit.
pub fn resolve_user(tracker: &dyn IssueTracker, email: &str) -> Result<Option<TrackerUser>, ClientError> {
  let users = tracker.find_users(email)?;

  if users.is_empty() {
    tracing::warn!(email, "no tracker users found");
    return Ok(None);
  }
  let pos = users.iter().position(|u| u.matches_email(email)).unwrap_or(0);

  Ok(users.into_iter().nth(pos))
}
