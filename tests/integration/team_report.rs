use test_support::{fixture_report_cmd, fixtures_dir, read_fixture_json, tempdir, write_file};

/// Whitespace-split cells of every line whose first cell is `first`.
fn rows_starting_with(text: &str, first: &str) -> Vec<Vec<String>> {
  text
    .lines()
    .map(|l| l.split_whitespace().map(str::to_string).collect::<Vec<_>>())
    .filter(|cells| cells.first().map(String::as_str) == Some(first))
    .collect()
}

#[test]
fn team_text_report() {
  let dir = tempdir();
  let team = fixtures_dir().join("team.json");
  let out = fixture_report_cmd(dir.path()).arg("--team").arg(&team).output().unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

  let text = String::from_utf8(out.stdout).unwrap();
  assert!(text.starts_with("Running for Mobile Team\n\nJira tickets closed since 2024-03-02:\n\n"));
  assert!(text.contains("Story points completed since 2024-03-02:"));
  assert!(text.contains("Github PRs since 2024-03-02:"));
  assert!(text.contains("Days in progress since 2024-03-02:"));
  assert!(text.contains("\nTeam average: 5.5 days\n"));

  let ann = rows_starting_with(&text, "ann@example.com");
  assert_eq!(ann.len(), 4);
  assert_eq!(ann[0], ["ann@example.com", "SE2", "1", "0", "1", "2"]);
  assert_eq!(ann[1], ["ann@example.com", "SE2", "5", "0", "2", "7"]);
  assert_eq!(ann[2], ["ann@example.com", "SE2", "9", "4"]);
  assert_eq!(ann[3], ["ann@example.com", "SE2", "3.0", "2"]);

  let bob = rows_starting_with(&text, "bob@example.com");
  assert_eq!(bob[0], ["bob@example.com", "Senior", "0", "1", "0", "1"]);
  assert_eq!(bob[3], ["bob@example.com", "Senior", "8.0", "1"]);

  assert_eq!(rows_starting_with(&text, "05/19/24"), [["05/19/24", "1", "4.0"]]);
  assert_eq!(rows_starting_with(&text, "05/26/24"), [["05/26/24", "2", "5.0"]]);
  assert!(text.lines().all(|l| l == l.trim_end()));
}

#[test]
fn team_json_report() {
  let dir = tempdir();
  let team = fixtures_dir().join("team.json");
  let out = fixture_report_cmd(dir.path()).arg("--team").arg(&team).arg("--json").output().unwrap();
  assert!(out.status.success());

  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(v["name"], "Mobile");
  assert_eq!(v["window"]["days"], 90);
  assert_eq!(v["team_average_days"], 5.5);

  let team_file: serde_json::Value = read_fixture_json("team.json");
  let counts: serde_json::Value = read_fixture_json("github_counts.json");

  let members = v["members"].as_array().unwrap();
  assert_eq!(members.len(), team_file["members"].as_array().unwrap().len());
  for (member, spec) in members.iter().zip(team_file["members"].as_array().unwrap()) {
    assert_eq!(member["email"], spec["jiraEmail"]);
    assert_eq!(member["github_login"], spec["githubId"]);
    assert_eq!(member["level"], spec["level"]);
    let login = spec["githubId"].as_str().unwrap();
    assert_eq!(member["prs_reviewed"], counts[login]["reviewed"]);
    assert_eq!(member["prs_authored"], counts[login]["authored"]);
  }
  assert_eq!(members[1]["level"], "Senior");
  assert_eq!(members[1]["prs_reviewed"], 2);
  assert_eq!(members[1]["records"][0]["days_in_progress"], 8);

  assert_eq!(v["weeks"].as_array().unwrap().len(), 2);
  assert_eq!(v["weeks"][1]["issues"], 2);
}

#[test]
fn unresolved_member_does_not_abort_the_team() {
  let dir = tempdir();
  let team = write_file(
    dir.path(),
    "team.json",
    r#"{
      "name": "Mobile",
      "members": [
        { "jiraEmail": "ann@example.com", "githubId": "ann-gh", "level": "SE2" },
        { "jiraEmail": "ghost@example.com", "githubId": "ghost", "level": "SE1" },
        { "jiraEmail": "bob@example.com", "githubId": "bob-gh", "level": "Senior" }
      ]
    }"#,
  );
  let out = fixture_report_cmd(dir.path()).arg("--team").arg(&team).arg("--json").output().unwrap();
  assert!(out.status.success());

  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  let members = v["members"].as_array().unwrap();
  assert_eq!(members.len(), 3);
  assert_eq!(members[1]["email"], "ghost@example.com");
  assert!(members[1]["account_id"].is_null());
  assert_eq!(members[1]["totals"]["total"]["closed"], 0);
  assert!(members[1]["average_days"].is_null());
  assert_eq!(v["team_average_days"], 5.5);
}
