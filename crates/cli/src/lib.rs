pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "dinebot",
    about = "DineBot restaurant assistant CLI",
    long_about = "Ask for restaurant recommendations, inspect configuration, and check readiness.",
    after_help = "Examples:\n  dinebot ask \"Find vegetarian restaurants in Indiranagar\"\n  dinebot ask --server http://127.0.0.1:8000 \"sushi in MG Road\"\n  dinebot doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Recommend restaurants for a free-text query")]
    Ask {
        #[arg(help = "Free-text question, e.g. \"Indian food in Jayanagar\"")]
        query: String,
        #[arg(long, value_name = "URL", help = "Send the query to a running dinebot-server")]
        server: Option<String>,
        #[arg(long, help = "Emit the raw chat response as JSON")]
        json: bool,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, model credential, and fallback catalog readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Ask { query, server, json } => commands::ask::run(&query, server.as_deref(), json),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => commands::doctor::run(json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
