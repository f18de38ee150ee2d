use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use crate::window::DEFAULT_DAYS;

#[derive(Parser, Debug)]
#[command(
    name = "eng-activity-report",
    version,
    about = "Summarize Jira tickets, story points, cycle time, and GitHub PRs for an engineer or a team",
    long_about = None
)]
pub struct Cli {
  /// Jira email of the engineer to report on
  #[arg(long, short = 'j')]
  pub jira: Option<String>,

  /// GitHub username of the engineer to report on
  #[arg(long, short = 'g', visible_alias = "gh")]
  pub github: Option<String>,

  /// Days of history to evaluate (default 90)
  #[arg(long, short = 'd')]
  pub days: Option<u32>,

  /// Team JSON file; selects team mode and ignores --jira/--github
  #[arg(long, short = 't')]
  pub team: Option<PathBuf>,

  /// Emit the report as JSON instead of tables
  #[arg(long)]
  pub json: bool,

  /// Log filter (overrides RUST_LOG / LOG_LEVEL), e.g. "debug" or "eng_activity_report=debug"
  #[arg(long)]
  pub log_level: Option<String>,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Override the "now" instant (hidden; tests only)
  #[arg(long = "now-override", hide = true)]
  pub now_override: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
  Single { jira_email: String, github_login: String },
  Team { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
  pub mode: Mode,
  pub days: u32,
  pub json: bool,
  pub now_override: Option<String>,
}

/// Print a hint and a question to `out`, then read one trimmed line from `input`.
fn ask(input: &mut dyn BufRead, out: &mut dyn Write, tip: &str, question: &str) -> Result<String> {
  writeln!(out, "Pro tip: {tip}")?;
  write!(out, "{question}")?;
  out.flush()?;

  let mut line = String::new();
  input.read_line(&mut line).context("reading answer from stdin")?;

  Ok(line.trim().to_string())
}

/// Resolve flags into an EffectiveConfig, prompting for missing single-user values.
pub fn normalize_with(cli: Cli, input: &mut dyn BufRead, out: &mut dyn Write) -> Result<EffectiveConfig> {
  if let Some(path) = cli.team {
    return Ok(EffectiveConfig {
      mode: Mode::Team { path },
      days: cli.days.unwrap_or(DEFAULT_DAYS),
      json: cli.json,
      now_override: cli.now_override,
    });
  }

  let jira_email = match cli.jira {
    Some(j) => j,
    None => ask(input, out, "use --jira <email> to skip this prompt next time", "Enter email of user to search for: ")?,
  };
  if jira_email.is_empty() {
    bail!("a Jira email is required (--jira <email>)");
  }

  let github_login = match cli.github {
    Some(g) => g,
    None => ask(input, out, "use --gh <username> to skip this prompt next time", "Enter GitHub username to search for: ")?,
  };
  if github_login.is_empty() {
    bail!("a GitHub username is required (--gh <username>)");
  }

  let days = match cli.days {
    Some(d) => d,
    None => ask(
      input,
      out,
      "use --days <days> to skip this prompt next time",
      "How many days of history to evaluate? (default 90): ",
    )?
    .parse()
    .unwrap_or(DEFAULT_DAYS),
  };

  Ok(EffectiveConfig {
    mode: Mode::Single { jira_email, github_login },
    days,
    json: cli.json,
    now_override: cli.now_override,
  })
}

/// Prompts read stdin and write to stderr so stdout carries only the report.
pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  let stdin = std::io::stdin();
  let mut input = stdin.lock();
  let mut err = std::io::stderr();
  normalize_with(cli, &mut input, &mut err)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn base_cli() -> Cli {
    Cli {
      jira: None,
      github: None,
      days: None,
      team: None,
      json: false,
      log_level: None,
      gen_man: false,
      now_override: None,
    }
  }

  fn run(cli: Cli, answers: &str) -> (Result<EffectiveConfig>, String) {
    let mut input = std::io::Cursor::new(answers.as_bytes().to_vec());
    let mut out: Vec<u8> = Vec::new();
    let res = normalize_with(cli, &mut input, &mut out);
    (res, String::from_utf8_lossy(&out).to_string())
  }

  #[test]
  fn flags_skip_prompts() {
    let mut cli = base_cli();
    cli.jira = Some("dev@example.com".into());
    cli.github = Some("dev".into());
    cli.days = Some(30);
    let (cfg, prompts) = run(cli, "");
    let cfg = cfg.unwrap();
    assert_eq!(
      cfg.mode,
      Mode::Single { jira_email: "dev@example.com".into(), github_login: "dev".into() }
    );
    assert_eq!(cfg.days, 30);
    assert!(prompts.is_empty());
  }

  #[test]
  fn missing_values_are_prompted_with_tips() {
    let (cfg, prompts) = run(base_cli(), "dev@example.com\ndev\n\n");
    let cfg = cfg.unwrap();
    assert_eq!(cfg.days, 90);
    assert!(prompts.contains("Pro tip: use --jira <email>"));
    assert!(prompts.contains("How many days of history to evaluate? (default 90): "));
  }

  #[test]
  fn unparseable_days_answer_uses_default() {
    let (cfg, _) = run(base_cli(), "dev@example.com\ndev\nlots\n");
    assert_eq!(cfg.unwrap().days, 90);
  }

  #[test]
  fn empty_email_is_an_error() {
    let (cfg, _) = run(base_cli(), "\n");
    assert!(cfg.unwrap_err().to_string().contains("Jira email is required"));
  }

  #[test]
  fn team_mode_ignores_single_user_flags() {
    let mut cli = base_cli();
    cli.team = Some(PathBuf::from("team.json"));
    cli.jira = Some("ignored@example.com".into());
    let (cfg, prompts) = run(cli, "");
    let cfg = cfg.unwrap();
    assert_eq!(cfg.mode, Mode::Team { path: PathBuf::from("team.json") });
    assert_eq!(cfg.days, 90);
    assert!(prompts.is_empty());
  }

  #[test]
  fn parses_short_and_alias_flags() {
    let cli = Cli::try_parse_from(["eng-activity-report", "-j", "a@b.c", "--gh", "abc", "-d", "14", "--json"]).unwrap();
    assert_eq!(cli.jira.as_deref(), Some("a@b.c"));
    assert_eq!(cli.github.as_deref(), Some("abc"));
    assert_eq!(cli.days, Some(14));
    assert!(cli.json);
  }
}
