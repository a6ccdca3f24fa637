//! GitHub Actions event payload for `pull_request` workflows.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Value of `GITHUB_EVENT_NAME` this bot reacts to.
pub const PULL_REQUEST_EVENT: &str = "pull_request";

/// Pull request actions that trigger a check. Other actions (including
/// `reopened`) are deliberately left alone.
pub const CHECKED_ACTIONS: [&str; 3] = ["opened", "edited", "synchronize"];

#[derive(Debug, Error)]
pub enum EventError {
    #[error("failed to read event file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid event payload")]
    Payload(#[from] serde_json::Error),

    #[error("repository name `{0}` is not of the form owner/name")]
    Repository(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequestEvent {
    pub action: String,
    pub number: u64,
    pub pull_request: PullRequest,
    pub repository: Repository,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequest {
    pub diff_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Repository {
    pub full_name: String,
}

impl PullRequestEvent {
    pub fn from_path(path: &Path) -> Result<Self, EventError> {
        let contents = fs::read_to_string(path).map_err(|source| EventError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, EventError> {
        let event: Self = serde_json::from_str(json)?;

        match event.repository.full_name.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() => Ok(event),
            _ => Err(EventError::Repository(event.repository.full_name)),
        }
    }

    pub fn is_checked_action(&self) -> bool {
        CHECKED_ACTIONS.contains(&self.action.as_str())
    }
}

/// Whether `GITHUB_EVENT_NAME` names a pull request event.
pub fn is_pull_request_event(event_name: Option<&str>) -> bool {
    event_name == Some(PULL_REQUEST_EVENT)
}
