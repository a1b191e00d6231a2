//! Git remote URL normalization.
//!
//! Converts the URL configured for a remote (SSH, scp-like, HTTPS or a
//! hosting-provider shortcut) into the https base URL of the repository's
//! web page, e.g. `git@github.com:owner/repo.git` becomes
//! `https://github.com/owner/repo`.

use tracing::debug;
use url::Url;

/// Provider shortcuts accepted in place of a full remote URL.
const PROVIDER_SHORTCUTS: &[(&str, &str)] = &[
    ("github:", "github.com"),
    ("gitlab:", "gitlab.com"),
    ("bitbucket:", "bitbucket.org"),
];

/// Returns the https base URL for a remote URL, or `None` when the remote
/// does not point at a web host (local paths, `file://` URLs, garbage).
pub fn https_base_url(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let (host, path) = if let Some((host, path)) = split_shortcut(raw) {
        (host.to_string(), path.to_string())
    } else if raw.contains("://") {
        split_url(raw)?
    } else if let Some((host, path)) = split_scp_like(raw) {
        (host, path)
    } else if is_owner_repo(raw) {
        // Bare "owner/repo" is npm-style GitHub shorthand
        ("github.com".to_string(), raw.to_string())
    } else {
        debug!("Remote URL has no recognizable host: {raw}");
        return None;
    };

    let path = clean_path(&path);
    if host.is_empty() || path.is_empty() {
        return None;
    }

    Some(format!("https://{host}/{path}"))
}

/// Splits `github:owner/repo` style shortcuts.
fn split_shortcut(raw: &str) -> Option<(&'static str, &str)> {
    PROVIDER_SHORTCUTS.iter().find_map(|(prefix, host)| {
        raw.strip_prefix(prefix)
            .filter(|rest| !rest.starts_with("//"))
            .map(|rest| (*host, rest))
    })
}

/// Splits a scheme URL (`https://`, `ssh://`, `git://`, `git+https://`...).
fn split_url(raw: &str) -> Option<(String, String)> {
    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(e) => {
            debug!("Ignoring unparsable remote URL {raw}: {e}");
            return None;
        }
    };

    let scheme = url.scheme().trim_start_matches("git+");
    if !matches!(scheme, "https" | "http" | "ssh" | "git") {
        return None;
    }

    let host = url.host_str()?.to_string();
    Some((host, url.path().to_string()))
}

/// Splits scp-like SSH remotes: `[user@]host:owner/repo.git`.
fn split_scp_like(raw: &str) -> Option<(String, String)> {
    let (authority, path) = raw.split_once(':')?;
    let host = authority.rsplit('@').next()?;

    // A drive letter or a path before the colon means this is a local path
    if host.is_empty() || host.len() == 1 || host.contains('/') || path.starts_with("//") {
        return None;
    }

    Some((host.to_string(), path.to_string()))
}

fn is_owner_repo(raw: &str) -> bool {
    let mut parts = raw.split('/');
    let valid = |s: &str| {
        !s.is_empty()
            && !s.starts_with('.')
            && s.chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    };
    matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(owner), Some(repo), None) if valid(owner) && valid(repo)
    )
}

/// Strips query, fragment, surrounding slashes and the `.git` suffix.
fn clean_path(path: &str) -> String {
    let path = path.split(['#', '?']).next().unwrap_or_default();
    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    path.trim_end_matches('/').to_string()
}
