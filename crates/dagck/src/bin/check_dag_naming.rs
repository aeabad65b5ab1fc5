//! DAG naming convention checker

use std::process::ExitCode;

use dagck::CheckKind;

fn main() -> ExitCode {
    dagck::main_for(CheckKind::Naming)
}
