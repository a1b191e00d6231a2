//! Data processing and serialization.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::rewrite::{ResolvedConfig, ShortHashMap};

pub mod commit_map;
pub mod yaml;

pub use commit_map::CommitMap;
pub use yaml::*;

/// Version information for the changelog-sync tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Version of changelog-sync that produced the output.
    pub changelog_sync: String,
}

impl Default for VersionInfo {
    fn default() -> Self {
        Self {
            changelog_sync: crate::VERSION.to_string(),
        }
    }
}

/// Resolved rewrite configuration as printed by `changelog-sync resolve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedConfigView {
    /// Version information.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub versions: Option<VersionInfo>,
    /// Web URL of the source repository.
    pub source_url: Option<String>,
    /// Web URL of the target repository.
    pub target_url: Option<String>,
    /// Regular expression matching source URLs (issue links excluded).
    pub source_url_pattern: Option<String>,
    /// Regular expression matching prefixed version tags.
    pub tag_pattern: Option<String>,
    /// Replacement template applied to matched tags.
    pub tag_replacement: Option<String>,
    /// Whether the URL pass will run (both URLs known).
    pub rewrites_urls: bool,
    /// Files eligible for rewriting.
    pub files: Vec<String>,
}

impl From<&ResolvedConfig> for ResolvedConfigView {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            versions: Some(VersionInfo::default()),
            source_url: config.source_url().map(str::to_string),
            target_url: config.target_url().map(str::to_string),
            source_url_pattern: config
                .url_rule()
                .map(|rule| format!("{}(?!/issue)", rule.pattern().as_str())),
            tag_pattern: config.tag_rule().map(|rule| rule.pattern().as_str().to_string()),
            tag_replacement: config.tag_rule().map(|rule| rule.replacement().to_string()),
            rewrites_urls: config.source_url().is_some() && config.target_url().is_some(),
            files: config.files().to_vec(),
        }
    }
}

/// Summary of one rewritten file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    /// Repository-relative path of the file.
    pub path: String,
    /// Whether the content differs from what was read.
    pub changed: bool,
    /// Version tags re-prefixed.
    pub tags_replaced: usize,
    /// Source URLs pointed at the target.
    pub urls_replaced: usize,
    /// Full hashes translated.
    pub hashes_resolved: usize,
    /// Full hashes without a known target commit.
    pub hashes_unresolved: usize,
    /// Short hash correspondences applied to abbreviated hashes.
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub short_hashes: BTreeMap<String, String>,
}

impl FileReport {
    /// Records the short hash correspondences learned by the hash pass.
    pub fn set_short_hashes(&mut self, short_hashes: &ShortHashMap) {
        self.short_hashes = short_hashes
            .iter()
            .map(|(s, t)| (s.to_string(), t.to_string()))
            .collect();
    }
}

/// Summary of a rewrite run over one commit's staged files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RewriteReport {
    /// Version information.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub versions: Option<VersionInfo>,
    /// Staged files that were not eligible for rewriting.
    pub skipped: Vec<String>,
    /// Files rewritten, in processing order.
    pub files: Vec<FileReport>,
}

impl RewriteReport {
    /// Paths of the files whose content changed.
    pub fn changed_paths(&self) -> Vec<&str> {
        self.files
            .iter()
            .filter(|f| f.changed)
            .map(|f| f.path.as_str())
            .collect()
    }
}
