//! Commit hash translation.
//!
//! Every 40-character hash in a document is looked up concurrently through a
//! [`HashLookup`]. Resolved hashes are substituted back in occurrence order
//! and their 7-character prefixes are recorded in a [`ShortHashMap`], which
//! then rewrites standalone abbreviated hashes (link labels such as
//! `[eab121c]`) that the full-hash pattern cannot see.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::LazyLock;

use anyhow::Result;
use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::git::{FULL_HASH_LEN, SHORT_HASH_LEN};

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static GIT_HASH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-f0-9]{40}\b").unwrap());

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static SHORT_HASH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-f0-9]{7}\b").unwrap());

/// Maps source commit hashes to the hashes they received in the target.
pub trait HashLookup: Send + Sync {
    /// Returns the target hash for a full source hash.
    ///
    /// `Ok(None)`, an empty or malformed hash and `Err(_)` all mean "no
    /// correspondence"; the occurrence is then left unchanged.
    fn target_hash<'a>(
        &'a self,
        source_hash: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>>> + Send + 'a>>;
}

/// Short source hash to short target hash, in insertion order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ShortHashMap {
    entries: Vec<(String, String)>,
}

impl ShortHashMap {
    /// Records a correspondence, replacing an earlier one for the same
    /// source prefix. Returns the replaced target when it differed.
    pub fn insert(&mut self, source: &str, target: &str) -> Option<String> {
        if let Some(entry) = self.entries.iter_mut().find(|(s, _)| s == source) {
            if entry.1 == target {
                return None;
            }
            return Some(std::mem::replace(&mut entry.1, target.to_string()));
        }

        self.entries.push((source.to_string(), target.to_string()));
        None
    }

    /// Looks up the target prefix for a source prefix.
    pub fn get(&self, source: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(s, _)| s == source)
            .map(|(_, t)| t.as_str())
    }

    /// Iterates `(source, target)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(s, t)| (s.as_str(), t.as_str()))
    }

    /// Number of recorded prefixes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replaces every standalone occurrence of each source prefix.
    ///
    /// Only whole 7-character hex words are candidates, so text inside a
    /// longer hash is never touched. Each occurrence is rewritten at most
    /// once, even when a target prefix is also a recorded source prefix.
    pub fn apply(&self, content: &str) -> String {
        if self.entries.is_empty() {
            return content.to_string();
        }

        SHORT_HASH_PATTERN
            .replace_all(content, |caps: &Captures| {
                self.get(&caps[0]).unwrap_or(&caps[0]).to_string()
            })
            .into_owned()
    }
}

/// Outcome of the hash pass over one document.
#[derive(Debug)]
pub struct HashPass {
    /// Document with full and short hashes translated.
    pub content: String,
    /// Occurrences replaced with a target hash.
    pub resolved: usize,
    /// Occurrences left unchanged.
    pub unresolved: usize,
    /// Short hash correspondences learned from the resolved occurrences.
    pub short_hashes: ShortHashMap,
}

/// Translates every full hash in `content`, then propagates the short-hash
/// correspondences.
///
/// One lookup is issued per occurrence and all of them are awaited
/// together, so the pass takes as long as the slowest lookup. Results are
/// consumed in match order regardless of completion order.
pub async fn resolve_hashes(content: &str, lookup: &dyn HashLookup) -> HashPass {
    let hashes: Vec<&str> = GIT_HASH_PATTERN
        .find_iter(content)
        .map(|m| m.as_str())
        .collect();

    if hashes.is_empty() {
        return HashPass {
            content: content.to_string(),
            resolved: 0,
            unresolved: 0,
            short_hashes: ShortHashMap::default(),
        };
    }

    let lookups = hashes
        .iter()
        .map(|hash| async move { (*hash, lookup_target(lookup, hash).await) });
    let results = futures::future::join_all(lookups).await;

    let mut short_hashes = ShortHashMap::default();
    let mut replacements = VecDeque::with_capacity(results.len());
    let mut resolved = 0;

    for (source, target) in results {
        match target {
            Some(target) => {
                let source_short = &source[..SHORT_HASH_LEN];
                let target_short = &target[..SHORT_HASH_LEN];
                if let Some(previous) = short_hashes.insert(source_short, target_short) {
                    warn!(
                        "Short hash {source_short} maps to both {previous} and {target_short}, using {target_short}"
                    );
                }
                resolved += 1;
                replacements.push_back(target);
            }
            None => replacements.push_back(source.to_string()),
        }
    }

    let replaced = GIT_HASH_PATTERN.replace_all(content, |caps: &Captures| {
        replacements
            .pop_front()
            .unwrap_or_else(|| caps[0].to_string())
    });
    let content = short_hashes.apply(&replaced);

    HashPass {
        content,
        resolved,
        unresolved: hashes.len() - resolved,
        short_hashes,
    }
}

async fn lookup_target(lookup: &dyn HashLookup, source_hash: &str) -> Option<String> {
    match lookup.target_hash(source_hash).await {
        Ok(Some(target)) if is_full_hash(&target) => Some(target),
        Ok(Some(target)) => {
            debug!("Ignoring malformed target hash for {source_hash}: {target:?}");
            None
        }
        Ok(None) => {
            debug!("No target commit for {source_hash}");
            None
        }
        Err(e) => {
            debug!("Hash lookup failed for {source_hash}: {e:#}");
            None
        }
    }
}

/// Whether `hash` is a 40-character hex string.
pub fn is_full_hash(hash: &str) -> bool {
    hash.len() == FULL_HASH_LEN && hash.chars().all(|c| c.is_ascii_hexdigit())
}
