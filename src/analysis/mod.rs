// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Namespace for issue lifecycle analysis (in-progress detection, rollups)
// role: analysis/namespace
// outputs: Public submodules with pure functions over the in-memory model
// invariants: No IO; diagnostics go through tracing only
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod in_progress;
pub mod rollup;
