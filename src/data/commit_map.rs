//! Precomputed source to target commit correspondence.
//!
//! A commit map is a flat mapping of full source hashes to full target
//! hashes, written by the sync pipeline as YAML:
//!
//! ```yaml
//! eab121cdc5ef25b633e50ef0f1919450bb003190: e38c589deb50a7f95d076afc4fca4c48f8f5747a
//! ```
//!
//! or as a JSON object when the file name ends in `.json`.

use std::collections::HashMap;
use std::fs;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::read_yaml_file;
use crate::rewrite::hashes::is_full_hash;
use crate::rewrite::HashLookup;

/// Source commit hash to target commit hash.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitMap {
    hashes: HashMap<String, String>,
}

impl CommitMap {
    /// Creates a validated map.
    pub fn new(hashes: HashMap<String, String>) -> Result<Self> {
        let map = Self { hashes };
        map.validate()?;
        Ok(map)
    }

    /// Loads a map from a YAML file, or a JSON file for `.json` paths.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let map: Self = if is_json {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read commit map: {}", path.display()))?;
            serde_json::from_str(&content).context("Failed to parse JSON commit map")?
        } else {
            read_yaml_file(path)?
        };

        map.validate()
            .with_context(|| format!("Invalid commit map: {}", path.display()))?;

        Ok(map)
    }

    /// Validates that every key and value is a full lowercase hash.
    pub fn validate(&self) -> Result<()> {
        for (source, target) in &self.hashes {
            validate_hash(source).with_context(|| format!("Invalid source hash: {source}"))?;
            validate_hash(target).with_context(|| format!("Invalid target hash: {target}"))?;
        }

        Ok(())
    }

    /// Target hash for a source hash.
    pub fn get(&self, source_hash: &str) -> Option<&str> {
        self.hashes.get(source_hash).map(String::as_str)
    }

    /// Number of known correspondences.
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// Whether the map knows no commits.
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

fn validate_hash(hash: &str) -> Result<()> {
    if !is_full_hash(hash) {
        anyhow::bail!(
            "Commit hash must be exactly 40 hexadecimal characters, got {} characters",
            hash.len()
        );
    }

    if hash.chars().any(|c| c.is_ascii_uppercase()) {
        anyhow::bail!("Commit hash must be lowercase");
    }

    Ok(())
}

impl HashLookup for CommitMap {
    fn target_hash<'a>(
        &'a self,
        source_hash: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>>> + Send + 'a>> {
        Box::pin(async move { Ok(self.get(source_hash).map(str::to_string)) })
    }
}
