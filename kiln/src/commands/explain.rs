use std::path::PathBuf;

use clap::Args;
use eyre::Result;

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct ExplainCommand {
    /// Path to kiln.toml (defaults to ./kiln.toml)
    #[arg(short, long, default_value = "kiln.toml")]
    pub config: PathBuf,

    /// Emit the resolved session as JSON
    #[arg(long)]
    pub json: bool,
}

impl ExplainCommand {
    /// Run the explain command
    pub fn run(&self) -> Result<()> {
        let schema = kiln_manifest::parse_file(&self.config).unwrap_or_exit();

        let report = ops::explain(&schema);
        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            report.render(&mut TerminalOutput::new());
        }
        Ok(())
    }
}
