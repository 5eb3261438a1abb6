mod check;
mod completions;
mod explain;
mod fire;

use check::CheckCommand;
use clap::{Parser, Subcommand};
use completions::CompletionsCommand;
use explain::ExplainCommand;
use eyre::Result;
use fire::FireCommand;

/// Extension trait for exiting on manifest errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for kiln_manifest::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "kiln")]
#[command(version)]
#[command(about = "Generate serialization adapters from marker-annotated declarations")]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Fire(cmd) => cmd.run(),
            Commands::Check(cmd) => cmd.run(),
            Commands::Explain(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run a generation session and write units from kiln.toml
    Fire(FireCommand),

    /// Validate kiln.toml and dry-run a session without writing files
    Check(CheckCommand),

    /// Describe the resolved session: declarations, markers, stages
    Explain(ExplainCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}
