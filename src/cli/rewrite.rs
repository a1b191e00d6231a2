//! Rewrite command: rewrites the staged changelog files of the target.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, warn};

use crate::cli::SyncOptions;
use crate::data::{to_yaml, CommitMap};
use crate::rewrite::{DocumentRewriter, WorkdirStore};

/// Rewrite command options.
#[derive(Parser)]
pub struct RewriteCommand {
    /// Repository and rule options.
    #[command(flatten)]
    pub options: SyncOptions,

    /// Source to target commit map (YAML, or JSON with a .json extension).
    /// Without it, commit hashes are left unchanged.
    #[arg(long, value_name = "FILE")]
    pub hash_map: Option<PathBuf>,

    /// Adds the rewritten files back to the index.
    #[arg(long)]
    pub stage: bool,

    /// Suppresses the YAML report.
    #[arg(long, short)]
    pub quiet: bool,
}

impl RewriteCommand {
    /// Executes the rewrite command.
    pub async fn execute(self) -> Result<()> {
        let (target, resolved) = self.options.resolve()?;

        let commit_map = match &self.hash_map {
            Some(path) => {
                let map = CommitMap::load_from_file(path)?;
                if map.is_empty() {
                    warn!("Commit map {} is empty", path.display());
                } else {
                    debug!("Loaded {} commit correspondences", map.len());
                }
                map
            }
            None => {
                debug!("No commit map given, commit hashes will not be translated");
                CommitMap::default()
            }
        };

        let workdir = target
            .workdir()
            .context("Target repository is bare, nothing to rewrite")?;
        let store = WorkdirStore::new(workdir);
        let staged = target.staged_files()?;

        let report = DocumentRewriter::new(&resolved)
            .rewrite(&staged, &store, &commit_map)
            .await
            .context("Failed to rewrite changelog files")?;

        if self.stage {
            let changed = report.changed_paths();
            if !changed.is_empty() {
                target
                    .stage_paths(&changed)
                    .context("Failed to stage rewritten files")?;
            }
        }

        if !self.quiet {
            let yaml_output = to_yaml(&report)?;
            println!("{yaml_output}");
        }

        Ok(())
    }
}
