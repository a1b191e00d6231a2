//! Reference resolution: compiles configuration into rewrite rules once per
//! sync operation.

use tracing::debug;

use crate::config::{ChangelogConfig, UrlSetting};
use crate::rewrite::{RewriteError, TagRule, UrlRule};

/// Files rewritten when the configuration does not name any.
pub const DEFAULT_FILES: &[&str] = &["CHANGELOG.md"];

/// Source of a repository's web URL.
pub trait RemoteInspector {
    /// Returns the https base URL of the repository (no trailing `/` or
    /// `.git`), or `None` when it cannot be determined. Never fails.
    fn web_url(&self) -> Option<String>;
}

/// Rewrite rules derived for one sync operation. Read-only once built.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    source_url: Option<String>,
    target_url: Option<String>,
    url_rule: Option<UrlRule>,
    tag_rule: Option<TagRule>,
    files: Vec<String>,
}

impl ResolvedConfig {
    /// Web URL of the source repository.
    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    /// Web URL of the target repository.
    pub fn target_url(&self) -> Option<&str> {
        self.target_url.as_deref()
    }

    /// Matcher for source URLs; present whenever the source URL is known.
    pub fn url_rule(&self) -> Option<&UrlRule> {
        self.url_rule.as_ref()
    }

    /// Tag prefix rule; present whenever a prefix to remove is configured.
    pub fn tag_rule(&self) -> Option<&TagRule> {
        self.tag_rule.as_ref()
    }

    /// Relative paths eligible for rewriting, in configured order.
    pub fn files(&self) -> &[String] {
        &self.files
    }
}

/// Builds a [`ResolvedConfig`] from configuration and repository remotes.
pub struct ReferenceResolver;

impl ReferenceResolver {
    /// Resolves URLs, compiles the URL and tag rules and settles the file
    /// list. `source` and `target` are consulted only for URLs left on
    /// automatic detection; a side without a repository passes `None`.
    pub fn resolve(
        config: &ChangelogConfig,
        source: Option<&dyn RemoteInspector>,
        target: Option<&dyn RemoteInspector>,
    ) -> Result<ResolvedConfig, RewriteError> {
        let source_url = resolve_url(&config.source_url, source, "source");
        let target_url = resolve_url(&config.target_url, target, "target");

        let url_rule = source_url.as_deref().map(UrlRule::new).transpose()?;

        let tag_rule = config
            .remove_tag_prefix
            .as_deref()
            .filter(|prefix| !prefix.is_empty())
            .map(|prefix| {
                TagRule::new(prefix, config.add_tag_prefix.as_deref().unwrap_or(""))
            })
            .transpose()?;

        let files = normalize_files(config.files.as_deref());

        debug!(
            source_url = ?source_url,
            target_url = ?target_url,
            tag_rule = tag_rule.is_some(),
            "Resolved changelog rewrite configuration"
        );

        Ok(ResolvedConfig {
            source_url,
            target_url,
            url_rule,
            tag_rule,
            files,
        })
    }
}

fn resolve_url(
    setting: &UrlSetting,
    inspector: Option<&dyn RemoteInspector>,
    side: &str,
) -> Option<String> {
    match setting {
        UrlSetting::Disabled => None,
        UrlSetting::Explicit(url) => trim_url(url),
        UrlSetting::Auto => {
            let url = inspector.and_then(|inspector| inspector.web_url());
            if url.is_none() {
                debug!("No {side} URL detected, URL rewriting disabled");
            }
            url
        }
    }
}

fn trim_url(url: &str) -> Option<String> {
    let url = url.trim().trim_end_matches('/');
    let url = url.strip_suffix(".git").unwrap_or(url);
    (!url.is_empty()).then(|| url.to_string())
}

/// Drops `./` prefixes, blanks and duplicates while keeping order.
fn normalize_files(files: Option<&[String]>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::new();
    let configured = files.map_or_else(
        || DEFAULT_FILES.iter().map(ToString::to_string).collect(),
        <[String]>::to_vec,
    );

    for file in configured {
        let file = file.trim();
        let file = file.strip_prefix("./").unwrap_or(file);
        if !file.is_empty() && !normalized.iter().any(|f| f == file) {
            normalized.push(file.to_string());
        }
    }

    normalized
}
