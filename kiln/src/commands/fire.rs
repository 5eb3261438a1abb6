use std::path::PathBuf;

use clap::Args;
use eyre::Result;

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct FireCommand {
    /// Path to kiln.toml (defaults to ./kiln.toml)
    #[arg(short, long, default_value = "kiln.toml")]
    pub config: PathBuf,

    /// Output directory for generated units
    #[arg(short, long, default_value = "generated")]
    pub out: PathBuf,
}

impl FireCommand {
    /// Run the fire command
    pub fn run(&self) -> Result<()> {
        let schema = kiln_manifest::parse_file(&self.config).unwrap_or_exit();

        let report = ops::fire(&schema, &self.out)?;
        report.render(&mut TerminalOutput::new());

        if !report.succeeded() {
            std::process::exit(1);
        }
        Ok(())
    }
}
