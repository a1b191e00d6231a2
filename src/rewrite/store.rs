//! File storage for rewritten documents.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use crate::rewrite::RewriteError;

/// Reads and writes whole text files addressed by repository-relative path.
pub trait FileStore: Send + Sync {
    /// Reads the full content of `path`.
    fn read_to_string<'a>(
        &'a self,
        path: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, RewriteError>> + Send + 'a>>;

    /// Replaces the content of `path`.
    fn write<'a>(
        &'a self,
        path: &'a str,
        content: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), RewriteError>> + Send + 'a>>;
}

/// [`FileStore`] rooted at a repository working directory.
#[derive(Debug, Clone)]
pub struct WorkdirStore {
    root: PathBuf,
}

impl WorkdirStore {
    /// Creates a store resolving paths against `root`.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }
}

impl FileStore for WorkdirStore {
    fn read_to_string<'a>(
        &'a self,
        path: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, RewriteError>> + Send + 'a>> {
        Box::pin(async move {
            let full_path = self.root.join(path);
            tokio::fs::read_to_string(&full_path)
                .await
                .map_err(|source| RewriteError::Read {
                    path: full_path,
                    source,
                })
        })
    }

    fn write<'a>(
        &'a self,
        path: &'a str,
        content: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), RewriteError>> + Send + 'a>> {
        Box::pin(async move {
            let full_path = self.root.join(path);
            tokio::fs::write(&full_path, content)
                .await
                .map_err(|source| RewriteError::Write {
                    path: full_path,
                    source,
                })
        })
    }
}
