use anyhow::{Context, Result};
use clap::Parser;

mod analysis;
mod cli;
mod config;
mod error;
mod ext;
mod github;
mod http;
mod jira;
mod logging;
mod model;
mod render;
mod report;
mod team;
mod timestamps;
mod util;
mod window;

use crate::analysis::in_progress::DetectionRules;
use crate::cli::{normalize, Cli, Mode};
use crate::config::AppConfig;
use crate::error::TeamFileError;
use crate::model::IssueType;
use crate::report::{build_single_report, build_team_report, MemberInput, Sources};

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  logging::init_tracing(cli.log_level.as_deref());

  // Phase 1: normalize CLI (prompts for missing single-user values)
  let cfg = normalize(cli)?;

  // Phase 2: team file before any network setup, so format errors surface first
  let team = match &cfg.mode {
    Mode::Team { path } => match team::load_team_file(path) {
      Ok(t) => Some(t),
      Err(e @ TeamFileError::Malformed { .. }) => {
        eprintln!("{}\n", team::team_file_help());
        return Err(e.into());
      }
      Err(e) => return Err(e.into()),
    },
    Mode::Single { .. } => None,
  };

  // Phase 3: environment, window, and client backends
  let app = AppConfig::from_env().context("loading configuration from environment")?;
  let window = window::resolve_window(cfg.days, cfg.now_override.as_deref())?;
  let tracker = jira::build_tracker(app.jira.as_ref(), app.http_timeout)?;
  let code_host = github::build_code_host(&app.github_api_url, app.http_timeout);

  let rules = DetectionRules::default();
  let issue_types = IssueType::defaults();
  let src = Sources {
    tracker: tracker.as_ref(),
    code_host: code_host.as_deref(),
    window,
    rules: &rules,
    issue_types: &issue_types,
  };

  // Phase 4: fetch, analyze, render
  let out = match (cfg.mode, team) {
    (Mode::Team { .. }, Some(team)) => {
      tracing::info!(team = %team.name, members = team.members.len(), "running for team");
      let report = build_team_report(&src, &team);
      if cfg.json {
        render::render_json(&report)?
      } else {
        format!("Running for {} Team\n\n{}", team.name, render::render_team_text(&report))
      }
    }
    (Mode::Single { jira_email, github_login }, _) => {
      let input = MemberInput { email: jira_email, github_login, level: None };
      let report = build_single_report(&src, &input)?;
      if cfg.json {
        render::render_json(&report)?
      } else {
        render::render_single_text(&report)
      }
    }
    (Mode::Team { path }, None) => anyhow::bail!("team file {} was not loaded", path.display()),
  };

  print!("{}", out);
  Ok(())
}
