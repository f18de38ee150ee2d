// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Render single-user and team reports as fixed-width text tables or pretty JSON
// role: output/render
// inputs: SingleReport, TeamReport
// outputs: Strings for stdout
// invariants:
// - Single-user columns are len("Story Points") + 10 wide
// - Team columns are max(label, widest value) + 10 wide; rules span every column
// - Lines carry no trailing whitespace
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::Result;
use serde::Serialize;

use crate::analysis::rollup::WeekSummary;
use crate::model::IssueType;
use crate::report::{MemberActivity, SingleReport, TeamReport};
use crate::team::EngineeringLevel;
use crate::util::pad;

pub const LABEL_PADDING: usize = 10;

fn fmt_avg(avg: Option<f64>) -> String {
  avg.map(|a| format!("{a:.1}")).unwrap_or_else(|| "-".to_string())
}

/// Fixed-width text table; every column is `size + LABEL_PADDING` wide.
struct Table {
  sizes: Vec<usize>,
  lines: Vec<String>,
}

impl Table {
  /// Column sizes grow to fit the label and the given minimums.
  fn new(labels: &[&str], minimums: &[usize]) -> Self {
    let sizes: Vec<usize> = labels
      .iter()
      .enumerate()
      .map(|(i, l)| l.len().max(minimums.get(i).copied().unwrap_or(0)))
      .collect();
    let mut t = Table { sizes, lines: Vec::new() };
    let cells: Vec<String> = labels.iter().map(|s| s.to_string()).collect();
    t.row(&cells);
    t.rule();
    t
  }

  fn uniform(labels: &[&str], size: usize) -> Self {
    Self::new(labels, &vec![size; labels.len()])
  }

  fn row(&mut self, cells: &[String]) {
    let line: String = cells
      .iter()
      .zip(&self.sizes)
      .map(|(c, size)| pad(c, c.len().max(*size) + LABEL_PADDING))
      .collect();
    self.lines.push(line.trim_end().to_string());
  }

  fn rule(&mut self) {
    let width: usize = self.sizes.iter().map(|s| s + LABEL_PADDING).sum();
    self.lines.push("-".repeat(width));
  }

  fn render(self) -> String {
    let mut s = self.lines.join("\n");
    s.push('\n');
    s
  }
}

fn weeks_table(weeks: &[WeekSummary], size: Option<usize>) -> String {
  let labels = ["Week", "Issues", "Avg Days"];
  let mut t = match size {
    Some(s) => Table::uniform(&labels, s),
    None => Table::new(&labels, &["00/00/00".len()]),
  };
  for w in weeks {
    t.row(&[w.week.to_string(), w.issues.to_string(), fmt_avg(w.average_days)]);
  }
  t.render()
}

pub fn render_single_text(r: &SingleReport) -> String {
  let m = &r.member;
  let size = "Story Points".len();
  let name = m.display_name.as_deref().unwrap_or(&m.email);
  let mut out = format!("Jira Stats for {} since {}:\n\n", name, r.window.label());

  // Issue Type | Closed | Story Points
  let mut t = Table::uniform(&["Issue Type", "Closed", "Story Points"], size);
  for row in &m.totals.rows {
    t.row(&[row.issue_type.to_string(), row.totals.closed.to_string(), row.totals.story_points.to_string()]);
  }
  t.rule();
  t.row(&["Total".to_string(), m.totals.total.closed.to_string(), m.totals.total.story_points.to_string()]);
  out.push_str(&t.render());
  out.push('\n');

  // PRs Reviewed | PRs Authored
  let mut t = Table::uniform(&["PRs Reviewed", "PRs Authored"], size);
  t.lines.pop();
  t.row(&[m.prs_reviewed.to_string(), m.prs_authored.to_string()]);
  out.push_str(&t.render());
  out.push('\n');

  // Average days in progress
  let mut t = Table::uniform(&["Avg Days", "Measured", "Tested"], size);
  t.lines.pop();
  t.row(&[fmt_avg(m.average_days), m.measured.to_string(), m.testable_issues().to_string()]);
  out.push_str(&t.render());

  if !r.weeks.is_empty() {
    out.push('\n');
    out.push_str(&weeks_table(&r.weeks, Some(size)));
  }

  out
}

fn member_columns(members: &[MemberActivity]) -> [usize; 2] {
  let email = members.iter().map(|m| m.email.len()).max().unwrap_or(0);
  [email, EngineeringLevel::max_name_len()]
}

fn level_name(m: &MemberActivity) -> String {
  m.level.map(|l| l.to_string()).unwrap_or_default()
}

fn per_type_table(members: &[MemberActivity], cell: impl Fn(&MemberActivity, Option<&IssueType>) -> String) -> String {
  let types = IssueType::defaults();
  let mut labels = vec!["Email", "Level"];
  labels.extend(types.iter().map(|t| t.name()));
  labels.push("Total");

  let mut t = Table::new(&labels, &member_columns(members));
  for m in members {
    let mut cells = vec![m.email.clone(), level_name(m)];
    cells.extend(types.iter().map(|ty| cell(m, Some(ty))));
    cells.push(cell(m, None));
    t.row(&cells);
  }
  t.render()
}

pub fn render_team_text(r: &TeamReport) -> String {
  let since = r.window.label();
  let mut out = String::new();

  out.push_str(&format!("Jira tickets closed since {since}:\n\n"));
  out.push_str(&per_type_table(&r.members, |m, t| {
    let totals = t.map(|t| m.totals.get(t)).unwrap_or(m.totals.total);
    totals.closed.to_string()
  }));
  out.push_str("\n\n");

  out.push_str(&format!("Story points completed since {since}:\n\n"));
  out.push_str(&per_type_table(&r.members, |m, t| {
    let totals = t.map(|t| m.totals.get(t)).unwrap_or(m.totals.total);
    totals.story_points.to_string()
  }));
  out.push_str("\n\n");

  out.push_str(&format!("Github PRs since {since}:\n\n"));
  let mut t = Table::new(&["Email", "Level", "PRs Reviewed", "PRs Authored"], &member_columns(&r.members));
  for m in &r.members {
    t.row(&[m.email.clone(), level_name(m), m.prs_reviewed.to_string(), m.prs_authored.to_string()]);
  }
  out.push_str(&t.render());
  out.push_str("\n\n");

  out.push_str(&format!("Days in progress since {since}:\n\n"));
  let mut t = Table::new(&["Email", "Level", "Avg Days", "Measured"], &member_columns(&r.members));
  for m in &r.members {
    t.row(&[m.email.clone(), level_name(m), fmt_avg(m.average_days), m.measured.to_string()]);
  }
  out.push_str(&t.render());
  out.push_str(&format!("\nTeam average: {} days\n", fmt_avg(r.team_average_days)));

  if !r.weeks.is_empty() {
    out.push('\n');
    out.push_str(&weeks_table(&r.weeks, None));
  }

  out
}

pub fn render_json<T: Serialize>(report: &T) -> Result<String> {
  let mut s = serde_json::to_string_pretty(report)?;
  s.push('\n');
  Ok(s)
}
