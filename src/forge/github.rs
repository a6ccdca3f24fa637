//! forge::github
//!
//! GitHub forge implementation over the REST API.
//!
//! Pull request comments are issue comments on GitHub, so posting goes to
//! `POST /repos/{owner}/{repo}/issues/{number}/comments`. The diff itself is
//! fetched from the `diff_url` given in the event payload.

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Forge, ForgeError};
use crate::config::DEFAULT_API_URL;

/// User-Agent header value for all requests.
const USER_AGENT_VALUE: &str = concat!("spellbot/", env!("CARGO_PKG_VERSION"));

const API_VERSION: &str = "2022-11-28";

pub struct GitHubForge {
    client: Client,
    token: String,
    /// API base URL (configurable for GitHub Enterprise)
    api_base: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitHubForge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubForge")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct CreateCommentRequest<'a> {
    body: &'a str,
}

#[derive(Debug, Deserialize)]
struct GitHubErrorResponse {
    message: String,
}

impl GitHubForge {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api_base(token, DEFAULT_API_URL)
    }

    pub fn with_api_base(token: impl Into<String>, api_base: impl Into<String>) -> Self {
        let api_base: String = api_base.into();
        Self {
            client: Client::new(),
            token: token.into(),
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn comments_url(&self, full_name: &str, number: u64) -> String {
        format!(
            "{}/repos/{}/issues/{}/comments",
            self.api_base, full_name, number
        )
    }

    fn api_headers(&self) -> Result<HeaderMap, ForgeError> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|_| ForgeError::AuthFailed("token is not a valid header value".into()))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));
        Ok(headers)
    }

    /// Map a non-success response to a [`ForgeError`].
    fn error_for(response: Response) -> ForgeError {
        let status = response.status();
        let message = match response.json::<GitHubErrorResponse>() {
            Ok(err) => err.message,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
        };

        match status {
            StatusCode::UNAUTHORIZED => ForgeError::AuthFailed("Invalid or expired token".into()),
            StatusCode::FORBIDDEN => ForgeError::AuthFailed(format!("Permission denied: {}", message)),
            StatusCode::NOT_FOUND => ForgeError::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => ForgeError::RateLimited,
            _ if status.is_server_error() => ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("GitHub server error: {}", message),
            },
            _ => ForgeError::ApiError {
                status: status.as_u16(),
                message,
            },
        }
    }
}

impl Forge for GitHubForge {
    fn name(&self) -> &'static str {
        "github"
    }

    fn fetch_diff(&self, diff_url: &str) -> Result<String, ForgeError> {
        debug!(url = diff_url, "fetching pull request diff");

        let response = self
            .client
            .get(diff_url)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .send()
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(Self::error_for(response));
        }

        response
            .text()
            .map_err(|e| ForgeError::NetworkError(e.to_string()))
    }

    fn post_comment(&self, full_name: &str, number: u64, body: &str) -> Result<(), ForgeError> {
        let url = self.comments_url(full_name, number);
        debug!(url = %url, bytes = body.len(), "posting pull request comment");

        let response = self
            .client
            .post(&url)
            .headers(self.api_headers()?)
            .json(&CreateCommentRequest { body })
            .send()
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_for(response));
        }

        Ok(())
    }
}
