//! Resolve command: prints the rewrite rules that would be applied.

use anyhow::Result;
use clap::Parser;

use crate::cli::SyncOptions;
use crate::data::{to_yaml, ResolvedConfigView};

/// Resolve command options.
#[derive(Parser)]
pub struct ResolveCommand {
    /// Repository and rule options.
    #[command(flatten)]
    pub options: SyncOptions,
}

impl ResolveCommand {
    /// Executes the resolve command.
    pub fn execute(self) -> Result<()> {
        let (_target, resolved) = self.options.resolve()?;

        let yaml_output = to_yaml(&ResolvedConfigView::from(&resolved))?;
        println!("{yaml_output}");

        Ok(())
    }
}
