use predicates::prelude::*;
use test_support::{cmd_bin, fixture_report_cmd, tempdir, BIN, FIXTURE_ENV, SCRUBBED_ENV};

const ANN: [&str; 6] = ["--jira", "ann@example.com", "--gh", "ann-gh", "--days", "90"];

#[test]
fn single_text_report() {
  let dir = tempdir();
  let out = fixture_report_cmd(dir.path()).args(ANN).output().unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

  let text = String::from_utf8(out.stdout).unwrap();
  insta::assert_snapshot!(text, @r"
  Jira Stats for Ann Lee since 2024-03-02:

  Issue Type            Closed                Story Points
  ------------------------------------------------------------------
  Story                 1                     5
  Task                  0                     0
  Bug                   1                     2
  ------------------------------------------------------------------
  Total                 2                     7

  PRs Reviewed          PRs Authored
  9                     4

  Avg Days              Measured              Tested
  3.0                   2                     1

  Week                  Issues                Avg Days
  ------------------------------------------------------------------
  05/19/24              1                     4.0
  05/26/24              1                     2.0
  ");
}

#[test]
fn single_json_report() {
  let dir = tempdir();
  let out = fixture_report_cmd(dir.path()).args(ANN).arg("--json").output().unwrap();
  assert!(out.status.success());

  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(v["window"]["days"], 90);
  assert_eq!(v["window"]["github_since"], "2024-03-02");

  let m = &v["member"];
  assert_eq!(m["account_id"], "acc-ann");
  assert_eq!(m["display_name"], "Ann Lee");
  assert_eq!(m["totals"]["total"]["closed"], 2);
  assert_eq!(m["totals"]["total"]["story_points"], 7);
  assert_eq!(m["prs_reviewed"], 9);
  assert_eq!(m["prs_authored"], 4);
  assert_eq!(m["average_days"], 3.0);
  assert_eq!(m["measured"], 2);

  let records = m["records"].as_array().unwrap();
  let keys: Vec<&str> = records.iter().map(|r| r["issue_key"].as_str().unwrap()).collect();
  assert_eq!(keys, vec!["MOB-101", "MOB-107"]);
  assert_eq!(records[0]["days_in_progress"], 4);
  assert_eq!(records[1]["days_in_progress"], 2);
  assert_eq!(records[1]["issue_type"], "Bug");

  assert_eq!(v["weeks"][0]["week"], "05/19/24");
  assert_eq!(v["weeks"][1]["average_days"], 2.0);
}

#[test]
fn missing_values_are_prompted_on_stderr() {
  let dir = tempdir();
  fixture_report_cmd(dir.path())
    .write_stdin("ann@example.com\nann-gh\n\n")
    .assert()
    .success()
    .stdout(predicate::str::starts_with("Jira Stats for Ann Lee since 2024-03-02:"))
    .stderr(predicate::str::contains("Pro tip: use --jira <email>"))
    .stderr(predicate::str::contains("How many days of history to evaluate? (default 90): "));
}

#[test]
fn empty_email_answer_is_an_error() {
  let dir = tempdir();
  fixture_report_cmd(dir.path())
    .write_stdin("\n")
    .assert()
    .failure()
    .stderr(predicate::str::contains("a Jira email is required"));
}

#[test]
fn unknown_user_fails() {
  let dir = tempdir();
  fixture_report_cmd(dir.path())
    .args(["--jira", "nobody@example.com", "--gh", "nobody", "--days", "30"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("No Jira user found for nobody@example.com"));
}

#[test]
fn missing_jira_configuration_fails() {
  let dir = tempdir();
  let mut cmd = cmd_bin(BIN);
  cmd.current_dir(dir.path());
  for key in SCRUBBED_ENV {
    cmd.env_remove(key);
  }
  for (key, _) in FIXTURE_ENV {
    cmd.env_remove(key);
  }
  cmd
    .args(ANN)
    .assert()
    .failure()
    .stderr(predicate::str::contains("not configured: set JIRA_BASE_URL"));
}
