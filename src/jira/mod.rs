// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Jira issue-tracker integration (client seam + wire models)
// role: client/namespace
// outputs: IssueTracker, build_tracker, resolve_user, TrackerUser
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod client;
pub mod models;

pub use client::{build_tracker, resolve_user, IssueTracker};
pub use models::TrackerUser;
