//! Git repository operations

use std::path::Path;

use anyhow::{Context, Result};
use git2::{Delta, DiffFindOptions, DiffOptions, Repository};
use tracing::debug;

use crate::git::{https_base_url, DEFAULT_REMOTE};
use crate::rewrite::RemoteInspector;

/// Git repository wrapper
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Open repository at specified path
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Repository::open(path)
            .with_context(|| format!("Failed to open git repository: {}", path.display()))?;

        Ok(Self { repo })
    }

    /// Get workdir path
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    /// Get access to the underlying git2::Repository
    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Get the configured URL of a remote, if the remote exists and has one
    pub fn remote_url(&self, name: &str) -> Result<Option<String>> {
        let remote = match self.repo.find_remote(name) {
            Ok(remote) => remote,
            Err(e) if e.code() == git2::ErrorCode::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read remote: {name}"));
            }
        };

        Ok(remote
            .url()
            .filter(|url| !url.is_empty())
            .map(str::to_string))
    }

    /// List files staged for the pending commit.
    ///
    /// Only added, copied, modified and renamed entries are reported (the
    /// equivalent of `git diff --staged --diff-filter=ACMR --name-only`);
    /// renamed entries report their new path.
    pub fn staged_files(&self) -> Result<Vec<String>> {
        let head_tree = match self.repo.head() {
            Ok(head) => Some(
                head.peel_to_tree()
                    .context("Failed to peel HEAD to tree")?,
            ),
            Err(e)
                if e.code() == git2::ErrorCode::UnbornBranch
                    || e.code() == git2::ErrorCode::NotFound =>
            {
                None
            }
            Err(e) => return Err(e).context("Failed to get HEAD reference"),
        };

        let index = self.repo.index().context("Failed to read repository index")?;
        let mut opts = DiffOptions::new();
        let mut diff = self
            .repo
            .diff_tree_to_index(head_tree.as_ref(), Some(&index), Some(&mut opts))
            .context("Failed to diff HEAD against index")?;

        let mut find_opts = DiffFindOptions::new();
        find_opts.renames(true).copies(true);
        diff.find_similar(Some(&mut find_opts))
            .context("Failed to detect renames")?;

        let files = diff
            .deltas()
            .filter(|delta| {
                matches!(
                    delta.status(),
                    Delta::Added | Delta::Copied | Delta::Modified | Delta::Renamed
                )
            })
            .filter_map(|delta| delta.new_file().path())
            .map(|path| path.to_string_lossy().to_string())
            .collect::<Vec<_>>();

        debug!("Found staged files: {files:?}");
        Ok(files)
    }

    /// Add working tree contents of the given paths to the index
    pub fn stage_paths<S: AsRef<str>>(&self, paths: &[S]) -> Result<()> {
        let mut index = self.repo.index().context("Failed to read repository index")?;
        for path in paths {
            let path = path.as_ref();
            index
                .add_path(Path::new(path))
                .with_context(|| format!("Failed to stage file: {path}"))?;
        }
        index.write().context("Failed to write repository index")?;
        Ok(())
    }
}

impl RemoteInspector for GitRepository {
    fn web_url(&self) -> Option<String> {
        match self.remote_url(DEFAULT_REMOTE) {
            Ok(Some(raw)) => https_base_url(&raw),
            Ok(None) => {
                debug!("Repository has no {DEFAULT_REMOTE} remote");
                None
            }
            Err(e) => {
                debug!("Ignore get git url error: {e:#}");
                None
            }
        }
    }
}
