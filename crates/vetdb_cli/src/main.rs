//! `vetdb` console entry point.

use std::process::ExitCode;

fn main() -> ExitCode {
    vetdb_cli::run()
}
