//! Compiled substitution rules for the tag and URL passes.

use std::borrow::Cow;

use regex::Regex;

use crate::rewrite::RewriteError;

/// Path suffix that marks an issue-tracker link. Links to the source
/// repository's issues stay pointed at the source.
const ISSUE_PATH: &str = "/issue";

/// Capture group holding the `major.minor.patch` part of a tag.
const VERSION_GROUP: &str = "version";

/// Re-prefixes version tags, e.g. `@scope/pkg@1.2.3` to `v1.2.3`.
#[derive(Debug, Clone)]
pub struct TagRule {
    pattern: Regex,
    replacement: String,
}

impl TagRule {
    /// Builds the rule for the given prefixes. An empty `add_prefix` drops
    /// the prefix entirely.
    pub fn new(remove_prefix: &str, add_prefix: &str) -> Result<Self, RewriteError> {
        let pattern = Regex::new(&format!(
            r"{}(?P<{VERSION_GROUP}>[0-9]+\.[0-9]+\.[0-9]+)",
            regex::escape(remove_prefix)
        ))?;
        let replacement = format!("{}${{{VERSION_GROUP}}}", add_prefix.replace('$', "$$"));

        Ok(Self {
            pattern,
            replacement,
        })
    }

    /// The compiled tag matcher.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// The replacement template, with the version as `${version}`.
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Replaces every tag occurrence, returning the new text and the number
    /// of tags rewritten. Suffixes after the numeric triple (`-beta.1`) are
    /// left in place.
    pub fn apply<'t>(&self, content: &'t str) -> (Cow<'t, str>, usize) {
        let count = self.pattern.find_iter(content).count();
        if count == 0 {
            return (Cow::Borrowed(content), 0);
        }

        (
            self.pattern.replace_all(content, self.replacement.as_str()),
            count,
        )
    }
}

/// Points links at the source repository's web host to the target's.
#[derive(Debug, Clone)]
pub struct UrlRule {
    source_url: String,
    pattern: Regex,
}

impl UrlRule {
    /// Builds the rule matching `source_url` literally.
    pub fn new(source_url: &str) -> Result<Self, RewriteError> {
        Ok(Self {
            source_url: source_url.to_string(),
            pattern: Regex::new(&regex::escape(source_url))?,
        })
    }

    /// The source URL this rule matches.
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// The compiled source URL matcher, before the issue-link exclusion.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Replaces every occurrence of the source URL with `target_url`, except
    /// occurrences immediately followed by `/issue`.
    ///
    /// A rejected occurrence resumes scanning one character after its start,
    /// which matches the behavior of a `(?!/issue)` negative lookahead.
    pub fn apply<'t>(&self, content: &'t str, target_url: &str) -> (Cow<'t, str>, usize) {
        let mut out = String::new();
        let mut count = 0;
        let mut last = 0;
        let mut pos = 0;

        while let Some(m) = self.pattern.find_at(content, pos) {
            if content[m.end()..].starts_with(ISSUE_PATH) {
                pos = next_char_boundary(content, m.start());
                if pos > content.len() {
                    break;
                }
                continue;
            }

            out.push_str(&content[last..m.start()]);
            out.push_str(target_url);
            count += 1;
            last = m.end();
            pos = if m.is_empty() {
                next_char_boundary(content, m.end())
            } else {
                m.end()
            };
            if pos > content.len() {
                break;
            }
        }

        if count == 0 {
            return (Cow::Borrowed(content), 0);
        }

        out.push_str(&content[last..]);
        (Cow::Owned(out), count)
    }
}

/// Returns the byte offset of the character following the one at `at`.
fn next_char_boundary(content: &str, at: usize) -> usize {
    content[at..]
        .chars()
        .next()
        .map_or(content.len() + 1, |c| at + c.len_utf8())
}
