// Driver for integration tests under tests/integration/
// Keeps tests organized in a subdirectory while remaining visible to Cargo.
//
#[path = "integration/cli_gen_man.rs"]
mod cli_gen_man;
#[path = "integration/single_report.rs"]
mod single_report;
#[path = "integration/team_file_errors.rs"]
mod team_file_errors;
#[path = "integration/team_report.rs"]
mod team_report;
