//! AtCoder lookup.
//!
//! AtCoder has no profile API. A lookup combines three reads issued
//! concurrently:
//!
//! 1. the profile page (HTML): username, current rating, rank
//! 2. `users/<handle>/history/json`: one entry per contest entered
//! 3. the AtCoder Problems `ac_rank` endpoint: accepted-problem count
//!
//! Only the profile page is required. History and accepted-count failures
//! degrade their fields to 0.

mod profile_page;

use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::PlatformError;
use crate::http::{endpoint, ensure_success, parse_base_url, read_json};
use crate::types::AtcoderStats;

use profile_page::{parse_profile_page, ProfilePage};

const UNRATED: &str = "unrated";

/// One entry of the contest history JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContestResult {
    #[serde(default)]
    pub is_rated: bool,
    #[serde(default)]
    pub new_rating: i64,
    #[serde(default)]
    pub contest_name: String,
}

#[derive(Debug, Deserialize)]
struct AcceptedRank {
    count: i64,
}

pub struct AtcoderClient {
    client: Client,
    base_url: Url,
    problems_base_url: Url,
}

impl AtcoderClient {
    /// # Errors
    ///
    /// Returns [`PlatformError::InvalidBaseUrl`] if either base URL does not parse.
    pub fn new(
        client: Client,
        base_url: &str,
        problems_base_url: &str,
    ) -> Result<Self, PlatformError> {
        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
            problems_base_url: parse_base_url(problems_base_url)?,
        })
    }

    /// Fetches and normalizes one user's AtCoder stats.
    ///
    /// # Errors
    ///
    /// - [`PlatformError::NotFound`] if the profile page is 404.
    /// - [`PlatformError::Malformed`] if the profile page carries no username.
    /// - [`PlatformError::Http`] / [`PlatformError::UnexpectedStatus`] if the
    ///   profile page cannot be fetched.
    pub async fn fetch(&self, handle: &str) -> Result<AtcoderStats, PlatformError> {
        // A failed profile read drops the secondary reads still in flight.
        let (profile, history, accepted) = tokio::try_join!(
            self.fetch_profile_page(handle),
            async { Ok::<_, PlatformError>(self.fetch_history(handle).await) },
            async { Ok::<_, PlatformError>(self.fetch_accepted_count(handle).await) },
        )?;

        let history = history.unwrap_or_else(|e| {
            tracing::warn!(handle, error = %e, "atcoder contest history unavailable");
            Vec::new()
        });
        let accepted = accepted.unwrap_or_else(|e| {
            tracing::warn!(handle, error = %e, "atcoder accepted count unavailable");
            0
        });

        normalize(profile, &history, accepted)
    }

    async fn fetch_profile_page(&self, handle: &str) -> Result<ProfilePage, PlatformError> {
        let mut url = endpoint(&self.base_url, &["users", handle]);
        // Row labels are localized; the parser reads the English page.
        url.query_pairs_mut().append_pair("lang", "en");
        let response = ensure_success(self.client.get(url).send().await?)?;
        let html = response.text().await?;
        Ok(parse_profile_page(&html))
    }

    async fn fetch_history(&self, handle: &str) -> Result<Vec<ContestResult>, PlatformError> {
        let url = endpoint(&self.base_url, &["users", handle, "history", "json"]);
        let response = ensure_success(self.client.get(url).send().await?)?;
        read_json(response, "atcoder contest history").await
    }

    async fn fetch_accepted_count(&self, handle: &str) -> Result<i64, PlatformError> {
        let mut url = endpoint(
            &self.problems_base_url,
            &["atcoder-api", "v3", "user", "ac_rank"],
        );
        url.query_pairs_mut().append_pair("user", handle);
        let response = ensure_success(self.client.get(url).send().await?)?;
        let rank: AcceptedRank = read_json(response, "atcoder problems ac_rank").await?;
        Ok(rank.count)
    }
}

/// Combines the three reads into the fixed stats record.
///
/// Rating prefers the profile page and falls back to the last rated contest.
fn normalize(
    profile: ProfilePage,
    history: &[ContestResult],
    accepted: i64,
) -> Result<AtcoderStats, PlatformError> {
    let username = profile.username.ok_or_else(|| {
        PlatformError::Malformed("atcoder profile page has no username".to_owned())
    })?;

    let rating = profile
        .rating
        .or_else(|| {
            let last_rated = history.iter().rev().find(|c| c.is_rated)?;
            tracing::debug!(
                username = %username,
                contest = %last_rated.contest_name,
                rating = last_rated.new_rating,
                "atcoder rating taken from contest history"
            );
            Some(last_rated.new_rating)
        })
        .unwrap_or(0);

    Ok(AtcoderStats {
        username,
        rating,
        rank: profile.rank.unwrap_or_else(|| UNRATED.to_owned()),
        contests_participated: i64::try_from(history.len()).unwrap_or(i64::MAX),
        problems_solved: accepted,
    })
}
