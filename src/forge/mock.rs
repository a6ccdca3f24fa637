//! forge::mock
//!
//! Mock forge implementation for deterministic testing.
//!
//! The mock serves a scripted diff (or error) for every fetch and records each
//! call so tests can assert on exactly what reached the network.
//!
//! # Example
//!
//! ```
//! use spellbot::forge::{Forge, MockForge};
//!
//! let forge = MockForge::with_diff("--- a/a.txt\n+++ b/a.txt\n@@ -0,0 +1 @@\n+teh\n");
//! assert!(forge.fetch_diff("https://example.com/1.diff").is_ok());
//! forge.post_comment("octo/repo", 1, "hello").unwrap();
//!
//! assert_eq!(forge.comments().len(), 1);
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use super::{Forge, ForgeError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    FetchDiff { url: String },
    PostComment { full_name: String, number: u64, body: String },
}

/// Mock forge for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockForge {
    inner: Arc<Mutex<MockForgeInner>>,
}

#[derive(Debug, Default)]
struct MockForgeInner {
    diff: Option<Result<String, ForgeError>>,
    comment_error: Option<ForgeError>,
    calls: Vec<MockCall>,
}

impl MockForge {
    pub fn new() -> Self {
        Self::default()
    }

    /// A forge whose diff fetches all return `diff`.
    pub fn with_diff(diff: impl Into<String>) -> Self {
        let forge = Self::new();
        forge.lock().diff = Some(Ok(diff.into()));
        forge
    }

    /// A forge whose diff fetches all fail with `error`.
    pub fn with_diff_error(error: ForgeError) -> Self {
        let forge = Self::new();
        forge.lock().diff = Some(Err(error));
        forge
    }

    /// Make every comment post fail with `error`.
    pub fn fail_comments(&self, error: ForgeError) {
        self.lock().comment_error = Some(error);
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    /// Bodies of the comments posted so far.
    pub fn comments(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                MockCall::PostComment { body, .. } => Some(body.clone()),
                MockCall::FetchDiff { .. } => None,
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, MockForgeInner> {
        // A panicking test thread must not hide the recorded calls.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Forge for MockForge {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn fetch_diff(&self, diff_url: &str) -> Result<String, ForgeError> {
        let mut inner = self.lock();
        inner.calls.push(MockCall::FetchDiff {
            url: diff_url.to_string(),
        });
        inner
            .diff
            .clone()
            .unwrap_or_else(|| Err(ForgeError::NotFound(diff_url.to_string())))
    }

    fn post_comment(&self, full_name: &str, number: u64, body: &str) -> Result<(), ForgeError> {
        let mut inner = self.lock();
        inner.calls.push(MockCall::PostComment {
            full_name: full_name.to_string(),
            number,
            body: body.to_string(),
        });
        match &inner.comment_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}
