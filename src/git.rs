//! Git operations and repository management.

pub mod remote;
pub mod repository;

pub use remote::https_base_url;
pub use repository::GitRepository;

/// Number of hex characters in an abbreviated commit hash.
pub const SHORT_HASH_LEN: usize = 7;

/// Length of a full SHA-1 commit hash in hex characters.
pub const FULL_HASH_LEN: usize = 40;

/// Name of the remote whose URL identifies a repository on its web host.
pub const DEFAULT_REMOTE: &str = "origin";
