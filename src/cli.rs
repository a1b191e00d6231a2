//! CLI interface for changelog-sync.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod options;
pub mod resolve;
pub mod rewrite;

pub use options::SyncOptions;
pub use resolve::ResolveCommand;
pub use rewrite::RewriteCommand;

/// changelog-sync: rewrites changelog references for a split repository.
#[derive(Parser)]
#[command(name = "changelog-sync")]
#[command(
    about = "Rewrites changelog links, tags and commit hashes for a repository synced out of another",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Shows the rewrite rules derived from configuration and remotes.
    Resolve(ResolveCommand),
    /// Rewrites the changelog files staged in the target repository.
    Rewrite(RewriteCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Resolve(resolve_cmd) => resolve_cmd.execute(),
            Commands::Rewrite(rewrite_cmd) => rewrite_cmd.execute().await,
        }
    }
}
