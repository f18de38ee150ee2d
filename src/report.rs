// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Orchestrate per-member fetches (tracker + code host) and assemble single-user and team reports
// role: processing/orchestrator
// inputs: IssueTracker, optional CodeHost, member identities (email, GitHub login, level), ReportWindow, DetectionRules
// outputs: SingleReport / TeamReport (serializable), consumed by render
// side_effects: Network calls through the client seams; members are fetched concurrently on the rayon pool
// invariants:
// - Each member's issues are fully paginated before analysis
// - A member's fetch failure is logged and recorded; it never aborts the team report
// - Team rollups use a Roster of members whose tracker account resolved
// errors: Single-user mode fails when the tracker user cannot be resolved
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{bail, Result};
use rayon::prelude::*;
use serde::Serialize;

use crate::analysis::in_progress::{progress_record, DetectionRules};
use crate::analysis::rollup::{
  average_days, average_days_across_team, measured, totals_by_type, weekly_summary, TypeBreakdown, WeekSummary,
};
use crate::github::CodeHost;
use crate::jira::{resolve_user, IssueTracker};
use crate::model::{Issue, IssueType, ProgressRecord};
use crate::team::{EngineeringLevel, MemberProfile, Roster, TeamFile};
use crate::window::ReportWindow;

/// Who to report on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInput {
  pub email: String,
  pub github_login: String,
  pub level: Option<EngineeringLevel>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberActivity {
  pub email: String,
  pub github_login: String,
  pub level: Option<EngineeringLevel>,
  pub account_id: Option<String>,
  pub display_name: Option<String>,
  pub totals: TypeBreakdown,
  pub prs_reviewed: u64,
  pub prs_authored: u64,
  pub average_days: Option<f64>,
  pub measured: usize,
  pub records: Vec<ProgressRecord>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub errors: Vec<String>,
  #[serde(skip)]
  pub issues: Vec<Issue>,
}

impl MemberActivity {
  pub fn testable_issues(&self) -> usize {
    self.issues.iter().filter(|i| i.is_testable()).count()
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct SingleReport {
  pub window: ReportWindow,
  pub member: MemberActivity,
  pub weeks: Vec<WeekSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamReport {
  pub name: String,
  pub window: ReportWindow,
  pub members: Vec<MemberActivity>,
  pub team_average_days: Option<f64>,
  pub weeks: Vec<WeekSummary>,
}

/// Shared inputs for every member fetch.
pub struct Sources<'a> {
  pub tracker: &'a dyn IssueTracker,
  pub code_host: Option<&'a dyn CodeHost>,
  pub window: ReportWindow,
  pub rules: &'a DetectionRules,
  pub issue_types: &'a [IssueType],
}

fn pr_counts(src: &Sources<'_>, login: &str, errors: &mut Vec<String>) -> (u64, u64) {
  let Some(host) = src.code_host else {
    return (0, 0);
  };
  let since = src.window.github_since;

  let mut count = |what: &str, res: Result<u64, crate::error::ClientError>| match res {
    Ok(n) => n,
    Err(e) => {
      tracing::warn!(login, error = %e, "failed to count {what} PRs");
      errors.push(format!("github {what}: {e}"));
      0
    }
  };
  let reviewed = count("reviewed", host.prs_reviewed(login, since));
  let authored = count("authored", host.prs_authored(login, since));

  (reviewed, authored)
}

/// Fetch and analyze one member. Failures are logged and leave that part empty.
pub fn collect_member(src: &Sources<'_>, input: &MemberInput) -> MemberActivity {
  let mut errors = Vec::new();

  let user = match resolve_user(src.tracker, &input.email) {
    Ok(u) => u,
    Err(e) => {
      tracing::warn!(email = %input.email, error = %e, "tracker user lookup failed");
      errors.push(format!("jira user lookup: {e}"));
      None
    }
  };

  let mut issues: Vec<Issue> = Vec::new();
  if let Some(u) = &user {
    for t in src.issue_types {
      match src.tracker.closed_issues(&u.account_id, t, src.window.jira_since) {
        Ok(found) => issues.extend(found),
        Err(e) => {
          tracing::warn!(email = %input.email, issue_type = %t, error = %e, "issue search failed");
          errors.push(format!("jira {t} search: {e}"));
        }
      }
    }
  }

  let records: Vec<ProgressRecord> = issues.iter().map(|i| progress_record(i, src.rules)).collect();
  let (prs_reviewed, prs_authored) = pr_counts(src, &input.github_login, &mut errors);

  MemberActivity {
    email: input.email.clone(),
    github_login: input.github_login.clone(),
    level: input.level,
    account_id: user.as_ref().map(|u| u.account_id.clone()),
    display_name: user.and_then(|u| u.display_name),
    totals: totals_by_type(&issues, src.issue_types),
    prs_reviewed,
    prs_authored,
    average_days: average_days(&records),
    measured: measured(&records),
    records,
    errors,
    issues,
  }
}

pub fn build_single_report(src: &Sources<'_>, input: &MemberInput) -> Result<SingleReport> {
  let member = collect_member(src, input);

  if member.account_id.is_none() {
    bail!("No Jira user found for {}", input.email);
  }
  let weeks = weekly_summary(&member.records);

  Ok(SingleReport { window: src.window, member, weeks })
}

/// Account id -> profile for every member whose tracker account resolved.
pub fn roster_of(members: &[MemberActivity]) -> Roster {
  let mut roster = Roster::default();

  for m in members {
    let (Some(id), Some(level)) = (m.account_id.clone(), m.level) else {
      continue;
    };
    roster.insert(
      id,
      MemberProfile {
        email: m.email.clone(),
        github_login: m.github_login.clone(),
        level,
        display_name: m.display_name.clone(),
      },
    );
  }

  roster
}

pub fn build_team_report(src: &Sources<'_>, team: &TeamFile) -> TeamReport {
  let inputs: Vec<MemberInput> = team
    .members
    .iter()
    .map(|m| MemberInput { email: m.jira_email.clone(), github_login: m.github_id.clone(), level: Some(m.level) })
    .collect();

  // par_iter keeps input order in the collected Vec
  let members: Vec<MemberActivity> = inputs.par_iter().map(|m| collect_member(src, m)).collect();

  let roster = roster_of(&members);
  let all: Vec<ProgressRecord> = members.iter().flat_map(|m| m.records.iter().cloned()).collect();
  tracing::debug!(members = members.len(), resolved = roster.len(), records = all.len(), "team fetch complete");
  if roster.is_empty() && !members.is_empty() {
    tracing::warn!(team = %team.name, "no team member resolved to a tracker account");
  }

  TeamReport {
    name: team.name.clone(),
    window: src.window,
    team_average_days: average_days_across_team(&all, &roster),
    weeks: weekly_summary(&all),
    members,
  }
}
