//! test-support: helpers for robust, nextest-friendly tests of `eng-activity-report`.
//!
//! Add as a dev-dependency in your top-level `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test_support = { path = "tests/support", features = ["serde"] }
//! ```
//!
//! Then in tests:
//! ```rust,ignore
//! use test_support::{fixture_report_cmd, tempdir};
//!
//! #[test]
//! fn example() {
//!     let dir = tempdir();
//!     let out = fixture_report_cmd(dir.path()).args(["--jira", "ann@example.com"]).output().unwrap();
//!     assert!(out.status.success());
//! }
//! ```

use once_cell::sync::Lazy;
use tracing_subscriber::{fmt, EnvFilter};

use std::path::{Path, PathBuf};

pub const BIN: &str = "eng-activity-report";

/// Fixed "now" for reproducible windows; the default 90-day report is labeled 2024-03-02.
pub const NOW_OVERRIDE: &str = "2024-06-01T12:00:00";

/// Backend fixture variables read by the binary, paired with their fixture files.
pub const FIXTURE_ENV: [(&str, &str); 3] = [
  ("EAR_TEST_JIRA_USERS_JSON", "jira_users.json"),
  ("EAR_TEST_JIRA_ISSUES_JSON", "jira_issues.json"),
  ("EAR_TEST_GITHUB_COUNTS_JSON", "github_counts.json"),
];

/// Real-backend variables that must not leak into a fixture-driven run.
pub const SCRUBBED_ENV: [&str; 9] = [
  "JIRA_BASE_URL",
  "JIRA_EMAIL",
  "JIRA_USERNAME",
  "JIRA_API_TOKEN",
  "JIRA_TOKEN",
  "GITHUB_TOKEN",
  "GH_TOKEN",
  "RUST_LOG",
  "LOG_LEVEL",
];

/// Initialize `tracing` once, honoring `RUST_LOG` and writing via the test writer.
///
/// Safe to call from multiple tests; only the first call configures the global subscriber.
pub fn init_tracing() {
  static INIT: Lazy<()> = Lazy::new(|| {
    let filter = EnvFilter::try_from_default_env()
      .or_else(|_| EnvFilter::try_new("warn,test=info"))
      .unwrap();
    // with_test_writer() causes logs to appear alongside failing tests only (cargo/nextest)
    let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
  });
  Lazy::force(&INIT);
}

/// Return the path to the repository's `tests/fixtures` directory.
///
/// This crate lives in `<repo>/tests/support`, so fixtures are a sibling directory.
pub fn fixtures_dir() -> PathBuf {
  let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
  manifest.parent().map(|p| p.join("fixtures")).unwrap_or_else(|| manifest.join("fixtures"))
}

/// Read a UTF-8 text fixture into a string.
pub fn read_fixture_text<P: AsRef<Path>>(rel_path: P) -> String {
  let path = fixtures_dir().join(rel_path);
  std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
}

/// Deserialize a JSON fixture into `T` (enable `serde` feature).
#[cfg(feature = "serde")]
pub fn read_fixture_json<T, P>(rel_path: P) -> T
where
  T: serde::de::DeserializeOwned,
  P: AsRef<Path>,
{
  let path = fixtures_dir().join(rel_path);
  let file = std::fs::File::open(&path).unwrap_or_else(|e| panic!("failed to open fixture {}: {e}", path.display()));
  serde_json::from_reader::<_, T>(file).unwrap_or_else(|e| panic!("failed to parse JSON fixture {}: {e}", path.display()))
}

/// Create a temp directory that deletes on drop.
pub fn tempdir() -> tempfile::TempDir {
  tempfile::tempdir().expect("create tempdir")
}

/// Write `contents` to `name` inside `dir`, returning the full path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
  let path = dir.join(name);
  std::fs::write(&path, contents).unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
  path
}

/// Run the binary with `assert_cmd`, returning the ready-to-run `Command`.
pub fn cmd_bin(bin: &str) -> assert_cmd::Command {
  init_tracing();
  assert_cmd::Command::cargo_bin(bin).expect("binary target not found")
}

/// The report binary wired to the fixture backends, a UTC clock, and a fixed "now".
///
/// `cwd` should be an empty directory so no stray `.env` is picked up.
pub fn fixture_report_cmd(cwd: &Path) -> assert_cmd::Command {
  let mut cmd = cmd_bin(BIN);
  cmd.current_dir(cwd).env("TZ", "UTC").args(["--now-override", NOW_OVERRIDE]);
  for key in SCRUBBED_ENV {
    cmd.env_remove(key);
  }
  for (key, file) in FIXTURE_ENV {
    cmd.env(key, read_fixture_text(file));
  }
  cmd
}
