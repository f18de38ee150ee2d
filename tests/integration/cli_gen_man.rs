use test_support::{cmd_bin, BIN};

#[test]
fn cli_generates_man_page() {
  let out = cmd_bin(BIN).args(["--gen-man"]).output().unwrap();
  assert!(out.status.success());
  let s = String::from_utf8_lossy(&out.stdout);
  // clap_mangen emits a roff manpage starting with .TH and mentions the binary name
  assert!(s.contains(".TH"));
  assert!(s.contains("eng-activity-report"));
  assert!(s.contains("jira"));
}

#[test]
fn help_lists_the_gh_alias_but_not_hidden_flags() {
  let out = cmd_bin(BIN).arg("--help").output().unwrap();
  assert!(out.status.success());
  let s = String::from_utf8_lossy(&out.stdout);
  assert!(s.contains("--gh"));
  assert!(s.contains("--team"));
  assert!(!s.contains("--now-override"));
}
