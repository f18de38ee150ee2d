// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Load the JSON team file and hold the resolved account-id -> member Roster
// role: model/team
// inputs: Path to a team JSON file ({name, members:[{jiraEmail, githubId, level}]})
// outputs: TeamFile, Roster (BTreeMap keyed by tracker account id)
// invariants:
// - Level names are exactly SE1, SE2, Senior, LeadEngineer, TeamLead, Manager
// - Roster iteration order is by account id (deterministic)
// errors: TeamFileError::{NotFound, Io, Malformed}; callers print TEAM_FILE_HELP on Malformed
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TeamFileError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineeringLevel {
  SE1,
  SE2,
  Senior,
  LeadEngineer,
  TeamLead,
  Manager,
}

impl EngineeringLevel {
  pub const ALL: [EngineeringLevel; 6] = [
    EngineeringLevel::SE1,
    EngineeringLevel::SE2,
    EngineeringLevel::Senior,
    EngineeringLevel::LeadEngineer,
    EngineeringLevel::TeamLead,
    EngineeringLevel::Manager,
  ];

  pub fn name(self) -> &'static str {
    match self {
      EngineeringLevel::SE1 => "SE1",
      EngineeringLevel::SE2 => "SE2",
      EngineeringLevel::Senior => "Senior",
      EngineeringLevel::LeadEngineer => "LeadEngineer",
      EngineeringLevel::TeamLead => "TeamLead",
      EngineeringLevel::Manager => "Manager",
    }
  }

  /// Width of the longest level name; the Level column is at least this wide.
  pub fn max_name_len() -> usize {
    Self::ALL.iter().map(|l| l.name().len()).max().unwrap_or(0)
  }
}

impl fmt::Display for EngineeringLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberSpec {
  pub jira_email: String,
  pub github_id: String,
  pub level: EngineeringLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamFile {
  pub name: String,
  pub members: Vec<TeamMemberSpec>,
}

pub const TEAM_FILE_EXAMPLE: &str = r#"{
  "name": "Mobile Apps",
  "members": [
    {
      "jiraEmail": "jane.doe@example.com",
      "githubId": "janedoe",
      "level": "TeamLead"
    }
  ]
}"#;

/// Printed after a malformed team file.
pub fn team_file_help() -> String {
  let levels: Vec<&str> = EngineeringLevel::ALL.iter().map(|l| l.name()).collect();
  format!(
    "Example JSON:\n{TEAM_FILE_EXAMPLE}\n\nNote: level must be one of: {}",
    levels.join(", ")
  )
}

pub fn parse_team_file(path: &Path, text: &str) -> Result<TeamFile, TeamFileError> {
  serde_json::from_str(text).map_err(|source| TeamFileError::Malformed { path: path.to_path_buf(), source })
}

pub fn load_team_file(path: &Path) -> Result<TeamFile, TeamFileError> {
  if !path.exists() {
    return Err(TeamFileError::NotFound(path.to_path_buf()));
  }
  let text = std::fs::read_to_string(path).map_err(|source| TeamFileError::Io { path: path.to_path_buf(), source })?;
  parse_team_file(path, &text)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberProfile {
  pub email: String,
  pub github_login: String,
  pub level: EngineeringLevel,
  pub display_name: Option<String>,
}

/// Team identities keyed by tracker account id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Roster(BTreeMap<String, MemberProfile>);

impl Roster {
  pub fn insert(&mut self, account_id: String, profile: MemberProfile) -> Option<MemberProfile> {
    self.0.insert(account_id, profile)
  }

  pub fn account_ids(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}
