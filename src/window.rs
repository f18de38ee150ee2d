// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Resolve the reporting window ("since" dates) from a day count and an effective now
// role: time/window
// inputs: days; optional --now-override (RFC3339 or local YYYY-MM-DDTHH:MM:SS)
// outputs: ReportWindow with tracker and code-host since dates
// invariants:
// - jira_since = now - days; github_since = now - (days + 1) (GitHub `closed:>` is exclusive)
// - Dates are local calendar dates formatted YYYY-MM-DD
// errors: Invalid --now-override text is rejected with the offending value
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{bail, Result};
use chrono::{DateTime, Duration, Local, NaiveDate};
use serde::Serialize;

use crate::util::effective_now;

pub const DEFAULT_DAYS: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportWindow {
  pub days: u32,
  pub jira_since: NaiveDate,
  pub github_since: NaiveDate,
}

impl ReportWindow {
  pub fn new(days: u32, now: DateTime<Local>) -> Self {
    let today = now.date_naive();
    Self {
      days,
      jira_since: today - Duration::days(i64::from(days)),
      github_since: today - Duration::days(i64::from(days) + 1),
    }
  }

  /// Date shown in report headings.
  pub fn label(&self) -> String {
    self.github_since.format("%Y-%m-%d").to_string()
  }
}

/// Parse the hidden `--now-override` value.
pub fn parse_now_override(s: Option<&str>) -> Result<Option<DateTime<Local>>> {
  let Some(raw) = s else { return Ok(None) };

  let parsed = chrono::DateTime::parse_from_rfc3339(raw)
    .ok()
    .map(|dt| dt.with_timezone(&Local))
    .or_else(|| {
      chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .and_then(|ndt| ndt.and_local_timezone(Local).single())
    });

  match parsed {
    Some(dt) => Ok(Some(dt)),
    None => bail!("invalid --now-override {raw:?}; expected RFC3339"),
  }
}

pub fn resolve_window(days: u32, now_override: Option<&str>) -> Result<ReportWindow> {
  let now = effective_now(parse_now_override(now_override)?);
  Ok(ReportWindow::new(days, now))
}
