//! DAG resource limit checker

use std::process::ExitCode;

use dagck::CheckKind;

fn main() -> ExitCode {
    dagck::main_for(CheckKind::Resources)
}
