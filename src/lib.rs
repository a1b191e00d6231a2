//! # changelog-sync
//!
//! Rewrites a changelog written in one git repository so that it reads
//! correctly in a repository split out of one of its subdirectories.
//!
//! ## Features
//!
//! - Version tags are re-prefixed (`@scope/pkg@1.2.3` becomes `v1.2.3`)
//! - Links to the source repository point at the target, issue links excepted
//! - Full and abbreviated commit hashes are translated to the target history
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use changelog_sync::config::ChangelogConfig;
//! use changelog_sync::data::CommitMap;
//! use changelog_sync::git::GitRepository;
//! use changelog_sync::rewrite::{DocumentRewriter, ReferenceResolver, WorkdirStore};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let source = GitRepository::open_at("../monorepo")?;
//! let target = GitRepository::open_at(".")?;
//! let config = ChangelogConfig::default();
//! let resolved = ReferenceResolver::resolve(&config, Some(&source), Some(&target))?;
//!
//! let commits = CommitMap::load_from_file("commit-map.yaml")?;
//! let staged = target.staged_files()?;
//! DocumentRewriter::new(&resolved)
//!     .rewrite(&staged, &WorkdirStore::new("."), &commits)
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod data;
pub mod git;
pub mod rewrite;

pub use crate::cli::Cli;

/// The current version of changelog-sync.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
