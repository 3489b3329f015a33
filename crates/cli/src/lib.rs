pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "deskmatch",
    about = "Deskmatch operator CLI",
    long_about = "Run desk recommendations offline, seed demo data, inspect configuration, and check runtime readiness.",
    after_help = "Examples:\n  deskmatch recommend --employee EMP-042 \"standing desk near marketing\"\n  deskmatch seed\n  deskmatch doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Run a desk recommendation against the local snapshot using the keyword interpreter")]
    Recommend {
        #[arg(long, help = "Employee id whose stored preferences should be merged in")]
        employee: Option<String>,
        #[arg(help = "Free-form workspace request, e.g. \"standing desk near marketing\"")]
        query: String,
    },
    #[command(about = "Write the deterministic demo snapshot into the configured snapshot directory")]
    Seed,
    #[command(about = "Inspect effective configuration values with source attribution and redaction")]
    Config,
    #[command(about = "Validate config, snapshot readiness, and interpreter selection")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Recommend { employee, query } => commands::recommend::run(employee, &query),
        Command::Seed => commands::seed::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
