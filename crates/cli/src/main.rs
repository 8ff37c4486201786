use std::process::ExitCode;

fn main() -> ExitCode {
    dinebot_cli::run()
}
