// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Reconstruct the "in progress" interval of an issue from its change history
// role: analysis/detection
// inputs: Issue with an oldest-first IssueHistory; DetectionRules (status names, sprint marker)
// outputs: Option<InProgressResult> (day count + start/end events), ProgressRecord per issue
// invariants:
// - Anchor strategies run in order: entered review (first match) then left in-progress (last match)
// - Start strategies run in order: entered prior status (first match at/before anchor) then joined sprint
// - day_count = ceil(ms / 86_400_000) + 1 and is always >= 1 when a result exists
// - Anomalous spans (ceil <= 0 or > anomaly_max_days) are logged, never rejected
// errors: None surfaced; unparseable timestamps make the issue undetectable and are logged with the raw text
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::Serialize;

use crate::model::{ChangeEvent, Issue, ProgressRecord};
use crate::timestamps::{inclusive_days, parse_jira_timestamp, parse_offset_timestamp};

/// Status names and markers the heuristics look for.
#[derive(Debug, Clone)]
pub struct DetectionRules {
  pub review_status: String,
  pub in_progress_status: String,
  pub default_prior_status: String,
  pub sprint_marker: String,
  pub anomaly_max_days: i64,
}

impl Default for DetectionRules {
  fn default() -> Self {
    Self {
      review_status: "Code Review".into(),
      in_progress_status: "In Progress".into(),
      default_prior_status: "Open".into(),
      sprint_marker: "MOB: ".into(),
      anomaly_max_days: 30,
    }
  }
}

/// Ways of finding the event that ends active work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorStrategy {
  /// First transition into the review status.
  EnteredReview,
  /// Last transition out of the in-progress status.
  LeftInProgress,
}

impl AnchorStrategy {
  pub const ORDER: [AnchorStrategy; 2] = [AnchorStrategy::EnteredReview, AnchorStrategy::LeftInProgress];

  pub fn find(self, events: &[ChangeEvent], rules: &DetectionRules) -> Option<usize> {
    match self {
      AnchorStrategy::EnteredReview => events.iter().position(|e| e.entered(&rules.review_status)),
      AnchorStrategy::LeftInProgress => events.iter().rposition(|e| e.left(&rules.in_progress_status)),
    }
  }

  pub fn is_fallback(self) -> bool {
    self != AnchorStrategy::EnteredReview
  }
}

/// Ways of finding the event that starts active work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StartStrategy {
  /// First transition into the status the anchor moved out of, at or before the anchor.
  EnteredPriorStatus,
  /// First time the issue joined a sprint carrying the team marker.
  JoinedSprint,
}

impl StartStrategy {
  pub const ORDER: [StartStrategy; 2] = [StartStrategy::EnteredPriorStatus, StartStrategy::JoinedSprint];

  pub fn find(self, events: &[ChangeEvent], anchor: usize, prior_status: &str, rules: &DetectionRules) -> Option<usize> {
    match self {
      StartStrategy::EnteredPriorStatus => events
        .iter()
        .take(anchor + 1)
        .position(|e| e.entered(prior_status)),
      StartStrategy::JoinedSprint => events.iter().position(|e| e.joined_sprint(&rules.sprint_marker)),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InProgressResult {
  pub day_count: i64,
  pub work_started: ChangeEvent,
  pub work_ended: ChangeEvent,
  pub anchor: AnchorStrategy,
  pub start: StartStrategy,
}

/// Detect with the default rules.
pub fn detect(issue: &Issue) -> Option<InProgressResult> {
  detect_with(issue, &DetectionRules::default())
}

pub fn detect_with(issue: &Issue, rules: &DetectionRules) -> Option<InProgressResult> {
  let events = issue.history.events();

  // Phase 1: anchor
  let (anchor_idx, anchor) = AnchorStrategy::ORDER
    .iter()
    .find_map(|s| s.find(events, rules).map(|idx| (idx, *s)))?;
  let ended = &events[anchor_idx];

  // Phase 2: status held just before the anchor
  let prior_status = ended
    .from_value
    .as_deref()
    .unwrap_or(&rules.default_prior_status);

  // Phase 3: start of work
  let found = StartStrategy::ORDER
    .iter()
    .find_map(|s| s.find(events, anchor_idx, prior_status, rules).map(|idx| (idx, *s)));

  if anchor.is_fallback() {
    tracing::debug!(
      issue = %issue.key,
      anchor_idx,
      anchor_at = %ended.timestamp,
      prior_status,
      start_idx = ?found.map(|(idx, _)| idx),
      "anchored on last exit from in-progress"
    );
  }

  let Some((start_idx, start)) = found else {
    tracing::warn!(
      issue = %issue.key,
      status = issue.status.as_deref().unwrap_or(""),
      title = issue.title.as_deref().unwrap_or(""),
      prior_status,
      anchor_idx,
      events = events.len(),
      "no start date found"
    );
    return None;
  };
  if start == StartStrategy::JoinedSprint {
    tracing::debug!(issue = %issue.key, "no transition into {prior_status}; using sprint entry as start");
  }
  let started = &events[start_idx];

  // Phase 4: span in inclusive days
  let started_at = match parse_jira_timestamp(&started.timestamp) {
    Ok(dt) => dt,
    Err(e) => {
      tracing::warn!(issue = %issue.key, error = %e, "unparseable start timestamp");
      return None;
    }
  };
  let ended_at = match parse_jira_timestamp(&ended.timestamp) {
    Ok(dt) => dt,
    Err(e) => {
      tracing::warn!(issue = %issue.key, error = %e, "unparseable end timestamp");
      return None;
    }
  };
  let (ceil_days, day_count) = inclusive_days(&started_at, &ended_at);

  // Phase 5: sanity check (logged only)
  if ceil_days <= 0 || ceil_days > rules.anomaly_max_days {
    tracing::warn!(
      issue = %issue.key,
      title = issue.title.as_deref().unwrap_or(""),
      days = ceil_days,
      started = %started.timestamp,
      ended = %ended.timestamp,
      "unusual in-progress span"
    );
    for ev in events[..=anchor_idx].iter().rev() {
      tracing::debug!(
        issue = %issue.key,
        at = %ev.timestamp,
        from = ev.from_value.as_deref().unwrap_or(""),
        to = ev.to_value.as_deref().unwrap_or(""),
        field = %ev.field_name,
        began_prior = ev.entered(prior_status),
        "history back from anchor"
      );
    }
  }

  if day_count < 1 {
    return None;
  }

  Some(InProgressResult {
    day_count,
    work_started: started.clone(),
    work_ended: ended.clone(),
    anchor,
    start,
  })
}

/// Most recent transition into review, used when no interval was detected.
pub fn last_review_entry<'a>(issue: &'a Issue, rules: &DetectionRules) -> Option<&'a ChangeEvent> {
  issue
    .history
    .events()
    .iter()
    .rev()
    .find(|e| e.entered(&rules.review_status))
}

/// Flatten an issue and its detection result into a ProgressRecord.
pub fn progress_record(issue: &Issue, rules: &DetectionRules) -> ProgressRecord {
  let result = detect_with(issue, rules);

  let finished_event = result
    .as_ref()
    .map(|r| &r.work_ended)
    .or_else(|| last_review_entry(issue, rules));
  let work_finished = finished_event
    .and_then(|e| parse_offset_timestamp(&e.timestamp).ok())
    .map(|dt| dt.timestamp_millis());

  ProgressRecord {
    account_id: issue.assignee.account_id.clone(),
    email: issue.assignee.email.clone(),
    display_name: issue.assignee.display_name.clone(),
    issue_key: issue.key.clone(),
    issue_type: issue.issue_type.clone(),
    story_points: issue.story_points.map(|p| p.trunc() as i64),
    work_finished,
    days_in_progress: result.map(|r| r.day_count),
    status: issue.status.clone(),
  }
}
