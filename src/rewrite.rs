//! Changelog reference rewriting.
//!
//! Rewriting happens in two phases. [`ReferenceResolver::resolve`] runs once
//! per sync operation and compiles the rules into a [`ResolvedConfig`].
//! [`DocumentRewriter`] then runs once per commit and applies, to every
//! staged changelog file, the tag pass, the URL pass and the hash pass, in
//! that order.

pub mod error;
pub mod hashes;
pub mod resolver;
pub mod rewriter;
pub mod rules;
pub mod store;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::RewriteError;
pub use hashes::{resolve_hashes, HashLookup, HashPass, ShortHashMap};
pub use resolver::{ReferenceResolver, RemoteInspector, ResolvedConfig, DEFAULT_FILES};
pub use rewriter::DocumentRewriter;
pub use rules::{TagRule, UrlRule};
pub use store::{FileStore, WorkdirStore};
