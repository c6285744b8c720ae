//! Codeforces lookup via the public `user.info` API.

use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::error::PlatformError;
use crate::http::{endpoint, parse_base_url, read_json};
use crate::types::CodeforcesStats;

const UNRATED: &str = "unrated";

#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    result: Vec<CodeforcesUser>,
}

/// The subset of a `user.info` result entry this lookup reads.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeforcesUser {
    pub handle: String,
    #[serde(default)]
    pub rating: Option<i64>,
    #[serde(default)]
    pub max_rating: Option<i64>,
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default)]
    pub max_rank: Option<String>,
}

pub struct CodeforcesClient {
    client: Client,
    base_url: Url,
}

impl CodeforcesClient {
    /// # Errors
    ///
    /// Returns [`PlatformError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn new(client: Client, base_url: &str) -> Result<Self, PlatformError> {
        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
        })
    }

    /// Fetches and normalizes one user's rating info.
    ///
    /// Codeforces answers an unknown handle with HTTP 400 and a `FAILED`
    /// envelope, so 400 bodies are read rather than rejected outright.
    ///
    /// # Errors
    ///
    /// - [`PlatformError::NotFound`] if the envelope is not `OK`.
    /// - [`PlatformError::Malformed`] if the result list is empty.
    /// - [`PlatformError::UnexpectedStatus`] for any other non-2xx status.
    /// - [`PlatformError::Http`] / [`PlatformError::Deserialize`] on transport or parse failure.
    pub async fn fetch(&self, handle: &str) -> Result<CodeforcesStats, PlatformError> {
        let url = self.user_info_url(handle);
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() && status != StatusCode::BAD_REQUEST {
            return Err(PlatformError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let envelope: Envelope = read_json(response, "codeforces user.info").await?;
        if envelope.status != "OK" {
            tracing::debug!(
                handle,
                comment = envelope.comment.as_deref().unwrap_or_default(),
                "codeforces rejected handle"
            );
            return Err(PlatformError::NotFound {
                url: url.to_string(),
            });
        }

        let user = envelope.result.into_iter().next().ok_or_else(|| {
            PlatformError::Malformed("codeforces user.info returned an empty result".to_owned())
        })?;
        Ok(normalize(user))
    }

    fn user_info_url(&self, handle: &str) -> Url {
        let mut url = endpoint(&self.base_url, &["api", "user.info"]);
        url.query_pairs_mut().append_pair("handles", handle);
        url
    }
}

/// Maps a `user.info` entry onto the fixed stats record.
///
/// `user.info` carries no solve or contest counts, so both stay 0.
#[must_use]
pub fn normalize(user: CodeforcesUser) -> CodeforcesStats {
    CodeforcesStats {
        username: user.handle,
        rating: user.rating.unwrap_or(0),
        max_rating: user.max_rating.unwrap_or(0),
        rank: non_blank_or_unrated(user.rank),
        max_rank: non_blank_or_unrated(user.max_rank),
        problems_solved: 0,
        contests_participated: 0,
    }
}

fn non_blank_or_unrated(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| UNRATED.to_owned())
}
