//! DAG definition validator

use std::process::ExitCode;

use dagck::CheckKind;

fn main() -> ExitCode {
    dagck::main_for(CheckKind::Definition)
}
