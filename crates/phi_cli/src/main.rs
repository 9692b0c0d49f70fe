mod commands;
mod config;
mod error;
mod json_types;
mod session_io;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::error::CliError;

#[derive(Parser, Debug)]
#[command(
    name = "phi_cli",
    version,
    about = "Normalize and dataize φ-calculus programs under a ruleset"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rewrite a program under a ruleset
    Transform(commands::transform::TransformArgs),
    /// Normalize and reduce built-ins down to bytes
    Dataize(commands::dataize::DataizeArgs),
    /// Run the test vectors embedded in a ruleset
    Test(commands::test::TestArgs),
    /// Validate a batch-pipeline configuration
    Pipeline(commands::pipeline::PipelineArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result: Result<(), CliError> = match cli.command {
        Command::Transform(args) => commands::transform::run(args),
        Command::Dataize(args) => commands::dataize::run(args),
        Command::Test(args) => commands::test::run(args),
        Command::Pipeline(args) => commands::pipeline::run(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
