// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Aggregate ProgressRecords and Issues into averages, weekly groups, and per-type totals
// role: analysis/rollup
// inputs: Slices of ProgressRecord / Issue; an explicit Roster for team averages
// outputs: Option<f64> averages (1 decimal, half-up), BTreeMap<WeekKey, Vec<ProgressRecord>>, TypeTotals rows
// invariants:
// - Absent day counts are excluded from numerator and denominator
// - Sums are integers; division and rounding happen once at the end
// - Week keys are Sunday starts in local time and sort chronologically
// - Absent story points count as zero; fractions truncate toward zero
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeMap;
use std::fmt;
use std::ops::AddAssign;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::model::{Issue, IssueType, ProgressRecord};
use crate::team::Roster;
use crate::timestamps::{week_label, week_start_millis};

fn present_days<'a>(records: impl IntoIterator<Item = &'a ProgressRecord>) -> (i64, i64) {
  records
    .into_iter()
    .filter_map(|r| r.days_in_progress)
    .fold((0, 0), |(sum, n), d| (sum + d, n + 1))
}

/// `num / den` rounded half-up to one decimal place; `den` must be positive.
fn half_up_tenths(num: i128, den: i128) -> f64 {
  let tenths = (num * 20 + den).div_euclid(2 * den);
  tenths as f64 / 10.0
}

/// Integer mean rounded half-up to one decimal place.
fn mean_tenths(sum: i64, count: i64) -> Option<f64> {
  (count > 0).then(|| half_up_tenths(i128::from(sum), i128::from(count)))
}

fn gcd(mut a: i128, mut b: i128) -> i128 {
  while b != 0 {
    (a, b) = (b, a % b);
  }
  a.abs()
}

/// Mean day count over records that have one.
pub fn average_days(records: &[ProgressRecord]) -> Option<f64> {
  let (sum, n) = present_days(records);
  mean_tenths(sum, n)
}

pub fn average_days_for(records: &[ProgressRecord], account_id: &str) -> Option<f64> {
  let (sum, n) = present_days(records.iter().filter(|r| r.account_id.as_deref() == Some(account_id)));
  mean_tenths(sum, n)
}

/// Mean of the per-member means; members without measured issues are skipped.
/// The sum of means is kept as an exact fraction so rounding happens once.
pub fn average_days_across_team(records: &[ProgressRecord], roster: &Roster) -> Option<f64> {
  let (mut num, mut den, mut members) = (0i128, 1i128, 0i128);

  for id in roster.account_ids() {
    let (sum, n) = present_days(records.iter().filter(|r| r.account_id.as_deref() == Some(id)));
    if n == 0 {
      continue;
    }
    let (sum, n) = (i128::from(sum), i128::from(n));
    num = num * n + sum * den;
    den *= n;
    let g = gcd(num, den).max(1);
    num /= g;
    den /= g;
    members += 1;
  }

  (members > 0).then(|| half_up_tenths(num, den * members))
}

/// Number of records carrying a day count.
pub fn measured(records: &[ProgressRecord]) -> usize {
  records.iter().filter(|r| r.days_in_progress.is_some()).count()
}

/// Sunday that starts a local calendar week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeekKey(pub NaiveDate);

impl WeekKey {
  pub fn of(record: &ProgressRecord) -> Self {
    WeekKey(week_start_millis(record.work_finished))
  }
}

impl fmt::Display for WeekKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&week_label(self.0))
  }
}

impl Serialize for WeekKey {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

pub fn group_by_week(records: &[ProgressRecord]) -> BTreeMap<WeekKey, Vec<ProgressRecord>> {
  let mut weeks: BTreeMap<WeekKey, Vec<ProgressRecord>> = BTreeMap::new();
  for r in records {
    weeks.entry(WeekKey::of(r)).or_default().push(r.clone());
  }
  weeks
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekSummary {
  pub week: WeekKey,
  pub issues: usize,
  pub average_days: Option<f64>,
}

/// One row per week, oldest first.
pub fn weekly_summary(records: &[ProgressRecord]) -> Vec<WeekSummary> {
  group_by_week(records)
    .into_iter()
    .map(|(week, recs)| WeekSummary { week, issues: recs.len(), average_days: average_days(&recs) })
    .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeTotals {
  pub closed: usize,
  pub story_points: i64,
}

impl TypeTotals {
  pub fn of<'a>(issues: impl IntoIterator<Item = &'a Issue>) -> Self {
    issues.into_iter().fold(TypeTotals::default(), |mut acc, i| {
      acc.closed += 1;
      acc.story_points += i.points();
      acc
    })
  }
}

impl AddAssign for TypeTotals {
  fn add_assign(&mut self, rhs: Self) {
    self.closed += rhs.closed;
    self.story_points += rhs.story_points;
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeRow {
  pub issue_type: IssueType,
  #[serde(flatten)]
  pub totals: TypeTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeBreakdown {
  pub rows: Vec<TypeRow>,
  pub total: TypeTotals,
}

/// Totals for each requested type, in the order given, plus the grand total
/// over those rows.
pub fn totals_by_type(issues: &[Issue], types: &[IssueType]) -> TypeBreakdown {
  let rows: Vec<TypeRow> = types
    .iter()
    .map(|t| TypeRow {
      issue_type: t.clone(),
      totals: TypeTotals::of(issues.iter().filter(|i| &i.issue_type == t)),
    })
    .collect();
  let mut total = TypeTotals::default();
  for row in &rows {
    total += row.totals;
  }
  TypeBreakdown { rows, total }
}

impl TypeBreakdown {
  pub fn get(&self, issue_type: &IssueType) -> TypeTotals {
    self
      .rows
      .iter()
      .find(|row| &row.issue_type == issue_type)
      .map(|row| row.totals)
      .unwrap_or_default()
  }
}
