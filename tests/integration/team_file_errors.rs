use predicates::prelude::*;
use test_support::{fixture_report_cmd, tempdir, write_file};

#[test]
fn missing_team_file_is_reported() {
  let dir = tempdir();
  fixture_report_cmd(dir.path())
    .args(["--team", "no-such-team.json"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("File not found for no-such-team.json"));
}

#[test]
fn malformed_team_file_prints_the_expected_shape() {
  let dir = tempdir();
  let team = write_file(
    dir.path(),
    "team.json",
    r#"{ "name": "Mobile", "members": [{ "jiraEmail": "a@x.io", "githubId": "a", "level": "Wizard" }] }"#,
  );
  fixture_report_cmd(dir.path())
    .arg("--team")
    .arg(&team)
    .assert()
    .failure()
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("Example JSON:"))
    .stderr(predicate::str::contains("\"jiraEmail\": \"jane.doe@example.com\""))
    .stderr(predicate::str::contains(
      "Note: level must be one of: SE1, SE2, Senior, LeadEngineer, TeamLead, Manager",
    ))
    .stderr(predicate::str::contains("Failed to process team file"));
}
