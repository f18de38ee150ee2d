// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the in-memory issue model (change events, histories, issues) and the flattened ProgressRecord
// role: model/types
// outputs: Plain data types shared by the tracker client, analysis, and rendering
// invariants:
// - IssueHistory is oldest-first and never reordered after construction
// - IssueType round-trips through its tracker name (Story/Task/Bug + Other)
// - ProgressRecord field names are stable (JSON output)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt;

use serde::{Deserialize, Serialize};

pub const STATUS_FIELD: &str = "status";
pub const SPRINT_FIELD: &str = "Sprint";

/// Issue categories reported on. Trackers are configured differently, so any
/// name outside the defaults is carried as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IssueType {
  Story,
  Task,
  Bug,
  Other(String),
}

impl IssueType {
  /// Types reported when the caller does not ask for specific ones, in table order.
  pub fn defaults() -> Vec<IssueType> {
    vec![IssueType::Story, IssueType::Task, IssueType::Bug]
  }

  pub fn from_name(name: &str) -> Self {
    match name {
      "Story" => IssueType::Story,
      "Task" => IssueType::Task,
      "Bug" => IssueType::Bug,
      other => IssueType::Other(other.to_string()),
    }
  }

  pub fn name(&self) -> &str {
    match self {
      IssueType::Story => "Story",
      IssueType::Task => "Task",
      IssueType::Bug => "Bug",
      IssueType::Other(name) => name,
    }
  }

  pub fn is_default(&self) -> bool {
    !matches!(self, IssueType::Other(_))
  }
}

impl From<String> for IssueType {
  fn from(s: String) -> Self {
    IssueType::from_name(&s)
  }
}

impl From<IssueType> for String {
  fn from(t: IssueType) -> Self {
    t.name().to_string()
  }
}

impl fmt::Display for IssueType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// One recorded field transition. `timestamp` keeps the tracker's raw text;
/// it is parsed when a duration is computed so a bad value only affects its issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
  pub field_name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub from_value: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub to_value: Option<String>,
  pub timestamp: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub author: Option<String>,
}

impl ChangeEvent {
  pub fn is_status(&self) -> bool {
    self.field_name == STATUS_FIELD
  }

  /// Status moved into `status`.
  pub fn entered(&self, status: &str) -> bool {
    self.is_status() && self.to_value.as_deref() == Some(status)
  }

  /// Status moved out of `status`.
  pub fn left(&self, status: &str) -> bool {
    self.is_status() && self.from_value.as_deref() == Some(status)
  }

  /// Issue was added to a sprint whose name contains `marker`.
  pub fn joined_sprint(&self, marker: &str) -> bool {
    self.field_name == SPRINT_FIELD && self.to_value.as_deref().is_some_and(|s| s.contains(marker))
  }
}

/// Oldest-first change log of one issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueHistory(Vec<ChangeEvent>);

impl IssueHistory {
  pub fn new(events: Vec<ChangeEvent>) -> Self {
    Self(events)
  }

  pub fn events(&self) -> &[ChangeEvent] {
    &self.0
  }
}

impl From<Vec<ChangeEvent>> for IssueHistory {
  fn from(events: Vec<ChangeEvent>) -> Self {
    Self(events)
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
  pub account_id: Option<String>,
  pub email: Option<String>,
  pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
  pub key: String,
  pub assignee: Assignee,
  pub issue_type: IssueType,
  pub story_points: Option<f64>,
  pub status: Option<String>,
  pub title: Option<String>,
  pub history: IssueHistory,
}

impl Issue {
  /// Story points as reported in tables: missing counts as zero, fractions truncate.
  pub fn points(&self) -> i64 {
    self.story_points.map(|p| p.trunc() as i64).unwrap_or(0)
  }

  /// People other than the assignee who moved the issue into a testing status.
  pub fn testers(&self) -> Vec<String> {
    let assignee = self.assignee.email.as_deref().unwrap_or("");
    let mut out: Vec<String> = Vec::new();

    for ev in self.history.events() {
      if !(ev.entered("Demo") || ev.entered("In Testing")) {
        continue;
      }
      if let Some(author) = ev.author.as_deref() {
        if author != assignee && !out.iter().any(|t| t == author) {
          out.push(author.to_string());
        }
      }
    }

    out
  }

  pub fn is_testable(&self) -> bool {
    self.issue_type.is_default() && !self.testers().is_empty()
  }
}

/// Flattened per-issue progress summary handed to rollups and reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
  pub account_id: Option<String>,
  pub email: Option<String>,
  pub display_name: Option<String>,
  pub issue_key: String,
  pub issue_type: IssueType,
  pub story_points: Option<i64>,
  /// Epoch milliseconds of the transition out of active work.
  pub work_finished: Option<i64>,
  pub days_in_progress: Option<i64>,
  pub status: Option<String>,
}

impl ProgressRecord {
  /// Rebuild an issue-shaped value (no history) so record sets can be fed back
  /// through issue-level rollups.
  pub fn to_issue(&self) -> Issue {
    Issue {
      key: self.issue_key.clone(),
      assignee: Assignee {
        account_id: self.account_id.clone(),
        email: self.email.clone(),
        display_name: self.display_name.clone(),
      },
      issue_type: self.issue_type.clone(),
      story_points: self.story_points.map(|p| p as f64),
      status: self.status.clone(),
      title: Some(self.issue_key.clone()),
      history: IssueHistory::default(),
    }
  }
}
