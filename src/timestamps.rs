// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Parse tracker timestamps tolerantly and map instants onto Sunday-starting local weeks
// role: utilities/time
// inputs: Raw timestamp strings from the tracker; epoch milliseconds
// outputs: Local DateTimes, NaiveDate week starts, stable week labels
// invariants:
// - Parsing never substitutes a default instant; failure is an Err carrying the raw text
// - Week starts are Sundays in the system local timezone
// errors: TimestampError::Unparseable with the offending string
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone};

use crate::error::TimestampError;

/// Millisecond precision with a literal `Z` (e.g. 2023-06-20T19:19:12.314Z).
const PRECISE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
/// Seconds precision, applied to the text before the first `.`.
const SECONDS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
/// What Jira actually sends for changelog entries (e.g. 2023-07-28T11:19:50.673-0500).
const OFFSET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";
const DATE_FORMAT: &str = "%Y-%m-%d";

pub const MILLIS_PER_DAY: i64 = 86_400_000;

fn localize(ndt: NaiveDateTime, raw: &str) -> Result<DateTime<Local>, TimestampError> {
  ndt
    .and_local_timezone(Local)
    .earliest()
    .ok_or_else(|| TimestampError::Unparseable { raw: raw.to_string() })
}

/// Parse a changelog timestamp: precise format first, then seconds precision on
/// everything before the first `.`. Both are read as local wall-clock time.
pub fn parse_jira_timestamp(raw: &str) -> Result<DateTime<Local>, TimestampError> {
  if let Ok(ndt) = NaiveDateTime::parse_from_str(raw, PRECISE_FORMAT) {
    return localize(ndt, raw);
  }

  let head = raw.split('.').next().unwrap_or(raw);

  match NaiveDateTime::parse_from_str(head, SECONDS_FORMAT) {
    Ok(ndt) => localize(ndt, raw),
    Err(_) => {
      tracing::warn!(raw, "unable to parse date");
      Err(TimestampError::Unparseable { raw: raw.to_string() })
    }
  }
}

/// Offset-aware parse used for report-facing instants; falls back to the
/// changelog formats.
pub fn parse_offset_timestamp(raw: &str) -> Result<DateTime<Local>, TimestampError> {
  if let Ok(dt) = DateTime::<FixedOffset>::parse_from_str(raw, OFFSET_FORMAT) {
    return Ok(dt.with_timezone(&Local));
  }

  if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
    if let Some(ndt) = date.and_hms_opt(0, 0, 0) {
      return localize(ndt, raw);
    }
  }

  parse_jira_timestamp(raw)
}

/// Whole days spanned by `[start, end]`, counted inclusively: ceil(ms / day) + 1.
pub fn inclusive_days(start: &DateTime<Local>, end: &DateTime<Local>) -> (i64, i64) {
  let diff_ms = end.timestamp_millis() - start.timestamp_millis();
  let ceil = diff_ms.div_euclid(MILLIS_PER_DAY) + i64::from(diff_ms.rem_euclid(MILLIS_PER_DAY) != 0);

  (ceil, ceil + 1)
}

/// Sunday that starts the local calendar week containing `dt`.
pub fn week_start(dt: &DateTime<Local>) -> NaiveDate {
  let day = dt.date_naive();
  day - chrono::Duration::days(i64::from(day.weekday().num_days_from_sunday()))
}

/// Week start for an epoch-millisecond instant; missing or out-of-range values
/// land in the week of the epoch.
pub fn week_start_millis(millis: Option<i64>) -> NaiveDate {
  let dt = millis
    .and_then(|ms| Local.timestamp_millis_opt(ms).single())
    .or_else(|| Local.timestamp_millis_opt(0).single());

  match dt {
    Some(dt) => week_start(&dt),
    None => NaiveDate::default(),
  }
}

/// `MM/dd/yy` label of a week start.
pub fn week_label(start: NaiveDate) -> String {
  start.format("%m/%d/%y").to_string()
}
