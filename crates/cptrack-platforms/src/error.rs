use thiserror::Error;

use crate::types::Platform;

/// Message used wherever an upstream lookup fails without a user-facing reason.
pub const USER_NOT_FOUND_MESSAGE: &str = "User not found or API error";

/// Errors raised while talking to a single platform upstream.
///
/// These never reach the caller verbatim: the aggregator converts them to a
/// fixed per-platform message via [`PlatformError::public_message`].
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream answered 404, or its envelope says the handle does not exist.
    #[error("upstream resource not found: {url}")]
    NotFound { url: String },

    /// The upstream answered 2xx but flagged the request as failed.
    #[error("upstream reported failure: {}", message.as_deref().unwrap_or("no reason given"))]
    UpstreamFailure { message: Option<String> },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The body parsed but lacks a field the lookup cannot do without.
    #[error("malformed upstream response: {0}")]
    Malformed(String),

    #[error("lookup timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Coarse classification of a [`PlatformError`], used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    UpstreamError,
    MalformedUpstreamResponse,
}

impl PlatformError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Deserialize { .. } | Self::Malformed(_) => ErrorKind::MalformedUpstreamResponse,
            Self::Http(_)
            | Self::UpstreamFailure { .. }
            | Self::UnexpectedStatus { .. }
            | Self::Timeout { .. }
            | Self::InvalidBaseUrl { .. } => ErrorKind::UpstreamError,
        }
    }

    /// The message placed in the `{"error": ...}` entry for `platform`.
    ///
    /// Only CodeChef forwards upstream text, and only the reason its API
    /// reports alongside a failed status.
    #[must_use]
    pub fn public_message(&self, platform: Platform) -> String {
        match platform {
            Platform::Codeforces => USER_NOT_FOUND_MESSAGE.to_string(),
            Platform::Codechef => match self {
                Self::UpstreamFailure {
                    message: Some(message),
                } if !message.trim().is_empty() => message.clone(),
                Self::UpstreamFailure { .. } => USER_NOT_FOUND_MESSAGE.to_string(),
                _ => "Failed to fetch CodeChef data".to_string(),
            },
            Platform::Atcoder => match self.kind() {
                ErrorKind::NotFound | ErrorKind::MalformedUpstreamResponse => {
                    USER_NOT_FOUND_MESSAGE.to_string()
                }
                ErrorKind::UpstreamError => "Failed to fetch AtCoder data".to_string(),
            },
            Platform::Leetcode => "LeetCode fetch failed".to_string(),
        }
    }
}
