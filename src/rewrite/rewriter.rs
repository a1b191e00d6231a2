//! Document rewriting: applies the tag, URL and hash passes to each staged
//! changelog file of a commit.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::data::{FileReport, RewriteReport, VersionInfo};
use crate::rewrite::{resolve_hashes, FileStore, HashLookup, ResolvedConfig, RewriteError};

/// Rewrites changelog files according to a [`ResolvedConfig`].
pub struct DocumentRewriter<'a> {
    config: &'a ResolvedConfig,
}

impl<'a> DocumentRewriter<'a> {
    /// Creates a rewriter borrowing the resolved configuration.
    pub fn new(config: &'a ResolvedConfig) -> Self {
        Self { config }
    }

    /// Configured files that are staged in the current commit, in
    /// configured order.
    pub fn select_files<S: AsRef<str>>(&self, staged: &[S]) -> Vec<&'a str> {
        let staged: HashSet<&str> = staged.iter().map(|s| s.as_ref().trim()).collect();

        self.config
            .files()
            .iter()
            .map(String::as_str)
            .filter(|file| staged.contains(file))
            .collect()
    }

    /// Applies the three passes to one document.
    ///
    /// Tags are rewritten before URLs because tags commonly sit inside
    /// compare links. The URL pass only runs when both URLs are known.
    pub async fn rewrite_content(
        &self,
        content: &str,
        lookup: &dyn HashLookup,
    ) -> (String, FileReport) {
        let mut report = FileReport::default();

        let content = match self.config.tag_rule() {
            Some(rule) => {
                let (replaced, count) = rule.apply(content);
                report.tags_replaced = count;
                replaced.into_owned()
            }
            None => content.to_string(),
        };

        let content = match (self.config.url_rule(), self.config.target_url()) {
            (Some(rule), Some(target_url)) => {
                let (replaced, count) = rule.apply(&content, target_url);
                report.urls_replaced = count;
                replaced.into_owned()
            }
            _ => content,
        };

        let pass = resolve_hashes(&content, lookup).await;
        report.hashes_resolved = pass.resolved;
        report.hashes_unresolved = pass.unresolved;
        report.set_short_hashes(&pass.short_hashes);

        (pass.content, report)
    }

    /// Rewrites every selected file in place.
    ///
    /// Files are processed one after another. A read or write failure
    /// stops the run and is returned; files already written stay written.
    pub async fn rewrite<S: AsRef<str>>(
        &self,
        staged: &[S],
        store: &dyn FileStore,
        lookup: &dyn HashLookup,
    ) -> Result<RewriteReport, RewriteError> {
        let selected = self.select_files(staged);
        debug!("Found matched files: {selected:?}");

        let skipped = staged
            .iter()
            .map(|s| s.as_ref().trim())
            .filter(|s| !s.is_empty() && !selected.contains(s))
            .map(str::to_string)
            .collect();

        let mut files = Vec::with_capacity(selected.len());
        for path in selected {
            let original = store.read_to_string(path).await?;
            let (content, mut report) = self.rewrite_content(&original, lookup).await;

            report.path = path.to_string();
            report.changed = content != original;

            store.write(path, &content).await?;
            info!(
                path,
                changed = report.changed,
                tags = report.tags_replaced,
                urls = report.urls_replaced,
                hashes = report.hashes_resolved,
                "Rewrote changelog file"
            );
            files.push(report);
        }

        Ok(RewriteReport {
            versions: Some(VersionInfo::default()),
            skipped,
            files,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::{ChangelogConfig, UrlSetting};
    use crate::rewrite::test_utils::{
        MemoryStore, StaticLookup, SOURCE_A, SOURCE_B, TARGET_A, TARGET_B,
    };
    use crate::rewrite::ReferenceResolver;
    use proptest::prelude::*;

    const SOURCE_URL: &str = "https://github.com/twinh/github-actions-test";
    const TARGET_URL: &str = "https://github.com/twinh/target-repo";

    fn full_config() -> ChangelogConfig {
        ChangelogConfig {
            source_url: UrlSetting::Explicit(SOURCE_URL.to_string()),
            target_url: UrlSetting::Explicit(TARGET_URL.to_string()),
            remove_tag_prefix: Some("@github-test/target-repo@".to_string()),
            add_tag_prefix: Some("v".to_string()),
            ..ChangelogConfig::default()
        }
    }

    fn resolve(config: &ChangelogConfig) -> ResolvedConfig {
        ReferenceResolver::resolve(config, None, None).unwrap()
    }

    fn changelog() -> String {
        format!(
            r"
## [1.0.1]({SOURCE_URL}/compare/@github-test/target-repo@1.0.0...@github-test/target-repo@1.0.1) (2020-07-17)


### Bug Fixes

* test close ([eab121c]({SOURCE_URL}/commit/{SOURCE_A})), closes [#9]({SOURCE_URL}/issues/9)

# 1.0.0 (2020-07-17)


### Features

* feat ([8710ff2]({SOURCE_URL}/commit/{SOURCE_B}))
"
        )
    }

    fn rewritten_changelog() -> String {
        format!(
            r"
## [1.0.1]({TARGET_URL}/compare/v1.0.0...v1.0.1) (2020-07-17)


### Bug Fixes

* test close ([e38c589]({TARGET_URL}/commit/{TARGET_A})), closes [#9]({SOURCE_URL}/issues/9)

# 1.0.0 (2020-07-17)


### Features

* feat ([72514a4]({TARGET_URL}/commit/{TARGET_B}))
"
        )
    }

    #[tokio::test]
    async fn rewrites_tags_urls_and_hashes() {
        let config = resolve(&full_config());
        let rewriter = DocumentRewriter::new(&config);

        let (content, report) = rewriter
            .rewrite_content(&changelog(), &StaticLookup::fixture())
            .await;

        assert_eq!(content, rewritten_changelog());
        assert_eq!(report.tags_replaced, 2);
        assert_eq!(report.urls_replaced, 3);
        assert_eq!(report.hashes_resolved, 2);
        assert_eq!(report.hashes_unresolved, 0);
        assert_eq!(report.short_hashes.get("eab121c").map(String::as_str), Some("e38c589"));
    }

    #[tokio::test]
    async fn rewriting_twice_is_a_no_op() {
        let config = resolve(&full_config());
        let rewriter = DocumentRewriter::new(&config);
        let lookup = StaticLookup::fixture();

        let (once, _) = rewriter.rewrite_content(&changelog(), &lookup).await;
        let (twice, report) = rewriter.rewrite_content(&once, &lookup).await;

        assert_eq!(once, twice);
        assert_eq!(report.tags_replaced + report.urls_replaced, 0);
        assert_eq!(report.hashes_resolved, 0);
    }

    #[tokio::test]
    async fn nothing_configured_is_pass_through() {
        let config = resolve(&ChangelogConfig::default());
        let rewriter = DocumentRewriter::new(&config);
        let input = format!("{SOURCE_URL}/commit/x @github-test/target-repo@1.0.0");

        let (content, report) = rewriter
            .rewrite_content(&input, &StaticLookup::empty())
            .await;

        assert_eq!(content, input);
        assert_eq!(report, FileReport::default());
    }

    #[tokio::test]
    async fn url_pass_needs_target_url() {
        let config = resolve(&ChangelogConfig {
            source_url: UrlSetting::Explicit(SOURCE_URL.to_string()),
            target_url: UrlSetting::Disabled,
            ..ChangelogConfig::default()
        });
        let rewriter = DocumentRewriter::new(&config);
        let input = format!("{SOURCE_URL}/commit/abc");

        let (content, _) = rewriter
            .rewrite_content(&input, &StaticLookup::empty())
            .await;

        assert_eq!(content, input);
    }

    #[test]
    fn select_files_intersects_in_configured_order() {
        let config = resolve(&ChangelogConfig {
            files: Some(vec![
                "docs/CHANGES.md".to_string(),
                "CHANGELOG.md".to_string(),
                "README.md".to_string(),
            ]),
            ..ChangelogConfig::default()
        });
        let rewriter = DocumentRewriter::new(&config);

        let selected = rewriter.select_files(&["src/lib.rs", "CHANGELOG.md", "docs/CHANGES.md"]);

        assert_eq!(selected, vec!["docs/CHANGES.md", "CHANGELOG.md"]);
    }

    #[tokio::test]
    async fn rewrite_only_touches_selected_files() {
        let config = resolve(&ChangelogConfig {
            files: Some(vec!["README.md".to_string()]),
            ..full_config()
        });
        let store = MemoryStore::default()
            .with_file("CHANGELOG.md", "@github-test/target-repo@1.0.0")
            .with_file("README.md", "@github-test/target-repo@1.0.0");
        let rewriter = DocumentRewriter::new(&config);

        let report = rewriter
            .rewrite(
                &["CHANGELOG.md", "README.md"],
                &store,
                &StaticLookup::fixture(),
            )
            .await
            .unwrap();

        assert_eq!(
            store.content("CHANGELOG.md").as_deref(),
            Some("@github-test/target-repo@1.0.0")
        );
        assert_eq!(store.content("README.md").as_deref(), Some("v1.0.0"));
        assert_eq!(report.skipped, vec!["CHANGELOG.md".to_string()]);
        assert_eq!(report.changed_paths(), vec!["README.md"]);
    }

    #[tokio::test]
    async fn unstaged_configured_file_is_not_read() {
        let config = resolve(&full_config());
        // Reading CHANGELOG.md would fail: it is not in the store
        let store = MemoryStore::default();
        let rewriter = DocumentRewriter::new(&config);

        let report = rewriter
            .rewrite(&["README.md"], &store, &StaticLookup::fixture())
            .await
            .unwrap();

        assert!(report.files.is_empty());
    }

    #[tokio::test]
    async fn storage_failure_is_surfaced() {
        let config = resolve(&ChangelogConfig {
            files: Some(vec!["A.md".to_string(), "B.md".to_string()]),
            ..full_config()
        });
        let store = MemoryStore::default()
            .with_file("A.md", "@github-test/target-repo@1.0.0")
            .with_file("B.md", "@github-test/target-repo@2.0.0")
            .read_only("A.md");
        let rewriter = DocumentRewriter::new(&config);

        let err = rewriter
            .rewrite(&["A.md", "B.md"], &store, &StaticLookup::fixture())
            .await
            .unwrap_err();

        assert!(matches!(err, RewriteError::Write { .. }));
        // The run stops at the first failure
        assert_eq!(
            store.content("B.md").as_deref(),
            Some("@github-test/target-repo@2.0.0")
        );
    }

    #[tokio::test]
    async fn missing_selected_file_is_a_read_error() {
        let config = resolve(&full_config());
        let rewriter = DocumentRewriter::new(&config);

        let err = rewriter
            .rewrite(
                &["CHANGELOG.md"],
                &MemoryStore::default(),
                &StaticLookup::fixture(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RewriteError::Read { .. }));
    }

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap()
            .block_on(future)
    }

    proptest! {
        #[test]
        fn plain_text_is_unchanged(text in "[ -~\n]{0,200}") {
            let config = resolve(&full_config());
            let rewriter = DocumentRewriter::new(&config);
            prop_assume!(!text.contains(SOURCE_URL));
            prop_assume!(!text.contains("@github-test/target-repo@"));

            let (content, _) = block_on(rewriter.rewrite_content(&text, &StaticLookup::empty()));
            prop_assert_eq!(content, text);
        }

        #[test]
        fn rewriting_is_idempotent(prefix in "[a-z #\n]{0,40}", suffix in "[a-z #\n]{0,40}") {
            let config = resolve(&full_config());
            let rewriter = DocumentRewriter::new(&config);
            let lookup = StaticLookup::fixture();
            let input = format!("{prefix}{}{suffix}", changelog());

            let once = block_on(rewriter.rewrite_content(&input, &lookup)).0;
            let twice = block_on(rewriter.rewrite_content(&once, &lookup)).0;
            prop_assert_eq!(once, twice);
        }
    }
}
