//! Options shared by the resolve and rewrite commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::config::{ChangelogConfig, UrlSetting};
use crate::git::GitRepository;
use crate::rewrite::{ReferenceResolver, RemoteInspector, ResolvedConfig};

/// Repository and rule options.
#[derive(Args, Debug, Clone, Default)]
pub struct SyncOptions {
    /// Source repository the changelog was written in.
    #[arg(long, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Target repository receiving the synced commits.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub target: PathBuf,

    /// Config file (defaults to .changelog-sync.yaml in the target).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Web URL of the source repository, instead of the origin remote.
    #[arg(long, value_name = "URL")]
    pub source_url: Option<String>,

    /// Web URL of the target repository, instead of the origin remote.
    #[arg(long, value_name = "URL")]
    pub target_url: Option<String>,

    /// Disables source URL detection.
    #[arg(long, conflicts_with = "source_url")]
    pub no_source_url: bool,

    /// Disables target URL detection.
    #[arg(long, conflicts_with = "target_url")]
    pub no_target_url: bool,

    /// File eligible for rewriting (repeatable; replaces the configured list).
    #[arg(long = "file", value_name = "PATH")]
    pub files: Vec<String>,

    /// Tag prefix used in the source repository, e.g. "@org/pkg@".
    #[arg(long, value_name = "PREFIX")]
    pub remove_tag_prefix: Option<String>,

    /// Tag prefix used in the target repository, e.g. "v".
    #[arg(long, value_name = "PREFIX")]
    pub add_tag_prefix: Option<String>,
}

impl SyncOptions {
    /// Opens the target repository.
    pub fn open_target(&self) -> Result<GitRepository> {
        GitRepository::open_at(&self.target).context(
            "Failed to open target repository. Make sure --target points at a git repository.",
        )
    }

    /// Opens the source repository, when one was given.
    pub fn open_source(&self) -> Result<Option<GitRepository>> {
        self.source
            .as_ref()
            .map(|path| {
                GitRepository::open_at(path).context(
                    "Failed to open source repository. Make sure --source points at a git repository.",
                )
            })
            .transpose()
    }

    /// Loads the config file and layers the command-line flags over it.
    pub fn load_config(&self, target: &GitRepository) -> Result<ChangelogConfig> {
        let mut config = ChangelogConfig::discover(self.config.as_deref(), target.workdir())?;
        self.apply_overrides(&mut config);
        Ok(config)
    }

    /// Applies flags given on the command line to `config`.
    pub fn apply_overrides(&self, config: &mut ChangelogConfig) {
        if let Some(setting) = UrlSetting::from_flags(self.source_url.clone(), self.no_source_url)
        {
            config.source_url = setting;
        }
        if let Some(setting) = UrlSetting::from_flags(self.target_url.clone(), self.no_target_url)
        {
            config.target_url = setting;
        }
        if !self.files.is_empty() {
            config.files = Some(self.files.clone());
        }
        if let Some(prefix) = &self.remove_tag_prefix {
            config.remove_tag_prefix = Some(prefix.clone());
        }
        if let Some(prefix) = &self.add_tag_prefix {
            config.add_tag_prefix = Some(prefix.clone());
        }
    }

    /// Opens the repositories and resolves the rewrite rules.
    pub fn resolve(&self) -> Result<(GitRepository, ResolvedConfig)> {
        let target = self.open_target()?;
        let source = self.open_source()?;
        let config = self.load_config(&target)?;

        let resolved = ReferenceResolver::resolve(
            &config,
            source.as_ref().map(|repo| repo as &dyn RemoteInspector),
            Some(&target),
        )
        .context("Failed to build rewrite rules")?;

        Ok((target, resolved))
    }
}
