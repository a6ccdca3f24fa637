//! forge
//!
//! Access to the code-review host: fetching a pull request diff and posting
//! a comment on it.
//!
//! # Design
//!
//! The bot runs as one blocking sequence, so the [`Forge`] trait is
//! synchronous. [`github::GitHubForge`] talks to the GitHub REST API;
//! [`mock::MockForge`] records calls and serves scripted diffs for tests.

pub mod github;
pub mod mock;

use thiserror::Error;

pub use github::GitHubForge;
pub use mock::MockForge;

/// Errors from forge operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForgeError {
    /// Authentication failed (invalid token, expired, insufficient permissions).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// The host answered with an unexpected status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),
}

/// Operations the bot needs from the code-review host.
pub trait Forge {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Download the unified diff of a pull request. Only a `200 OK` counts as
    /// success.
    fn fetch_diff(&self, diff_url: &str) -> Result<String, ForgeError>;

    /// Post `body` as a conversation comment on pull request `number` of the
    /// `owner/name` repository.
    fn post_comment(&self, full_name: &str, number: u64, body: &str) -> Result<(), ForgeError>;
}
