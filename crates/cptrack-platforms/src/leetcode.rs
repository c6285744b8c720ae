//! LeetCode lookup via the public GraphQL endpoint.

use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::PlatformError;
use crate::http::{ensure_success, parse_base_url, read_json};
use crate::types::{DifficultyCount, LeetcodeStats};

/// The handle is bound as `$username`, never spliced into the query text.
const PROFILE_QUERY: &str = r"
query userPublicProfile($username: String!) {
  matchedUser(username: $username) {
    username
    profile {
      realName
      ranking
      reputation
      starRating
    }
    submitStats {
      acSubmissionNum {
        difficulty
        count
      }
    }
    contestBadge {
      name
      expired
      hoverText
      icon
    }
  }
}
";

/// Synthetic bucket that totals the others; excluded from the solve sum.
const ALL_BUCKET: &str = "All";

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<MatchedUserData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchedUserData {
    matched_user: Option<MatchedUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedUser {
    pub username: String,
    #[serde(default)]
    pub profile: Value,
    pub submit_stats: SubmitStats,
    #[serde(default)]
    pub contest_badge: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitStats {
    pub ac_submission_num: Vec<DifficultyCount>,
}

pub struct LeetcodeClient {
    client: Client,
    graphql_url: Url,
}

impl LeetcodeClient {
    /// # Errors
    ///
    /// Returns [`PlatformError::InvalidBaseUrl`] if `graphql_url` does not parse.
    pub fn new(client: Client, graphql_url: &str) -> Result<Self, PlatformError> {
        let mut graphql_url = parse_base_url(graphql_url)?;
        // parse_base_url appends a slash; the endpoint itself must not have one.
        let path = graphql_url.path().trim_end_matches('/').to_owned();
        graphql_url.set_path(&path);
        Ok(Self {
            client,
            graphql_url,
        })
    }

    /// Fetches and normalizes one user's public LeetCode profile.
    ///
    /// # Errors
    ///
    /// - [`PlatformError::NotFound`] if `matchedUser` is null.
    /// - [`PlatformError::Malformed`] if the response has no `data`.
    /// - [`PlatformError::Http`] / [`PlatformError::UnexpectedStatus`] /
    ///   [`PlatformError::Deserialize`] on transport or parse failure.
    pub async fn fetch(&self, handle: &str) -> Result<LeetcodeStats, PlatformError> {
        let body = json!({
            "query": PROFILE_QUERY,
            "variables": { "username": handle },
        });
        let response = self
            .client
            .post(self.graphql_url.clone())
            .header(reqwest::header::REFERER, "https://leetcode.com")
            .json(&body)
            .send()
            .await?;
        let parsed: GraphQlResponse =
            read_json(ensure_success(response)?, "leetcode matchedUser").await?;

        let data = parsed.data.ok_or_else(|| {
            PlatformError::Malformed("leetcode response has no data".to_owned())
        })?;
        let user = data.matched_user.ok_or_else(|| PlatformError::NotFound {
            url: format!("{}#{handle}", self.graphql_url),
        })?;

        Ok(normalize(user))
    }
}

/// Maps a `matchedUser` onto the fixed stats record.
#[must_use]
pub fn normalize(user: MatchedUser) -> LeetcodeStats {
    let buckets = user.submit_stats.ac_submission_num;

    let problems_solved: i64 = buckets
        .iter()
        .filter(|b| b.difficulty != ALL_BUCKET)
        .map(|b| b.count)
        .sum();
    let solved = |difficulty: &str| {
        buckets
            .iter()
            .find(|b| b.difficulty == difficulty)
            .map_or(0, |b| b.count)
    };

    let rating = derived_rating(&user.profile);

    LeetcodeStats {
        username: user.username,
        easy_solved: solved("Easy"),
        medium_solved: solved("Medium"),
        hard_solved: solved("Hard"),
        profile: user.profile,
        contest_badge: user.contest_badge,
        rating,
        max_rating: rating,
        problems_solved,
        contests_attended: 0,
        submissions: buckets,
    }
}

/// `starRating * 100`, rounded; 0 when the profile has no star rating.
#[allow(clippy::cast_possible_truncation)]
fn derived_rating(profile: &Value) -> i64 {
    profile
        .get("starRating")
        .and_then(Value::as_f64)
        .filter(|stars| stars.is_finite())
        .map_or(0, |stars| (stars * 100.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched_user(star_rating: Value, buckets: Value) -> MatchedUser {
        serde_json::from_value(json!({
            "username": "neal_wu",
            "profile": {
                "realName": "Neal",
                "ranking": 1234,
                "reputation": 10,
                "starRating": star_rating
            },
            "submitStats": { "acSubmissionNum": buckets },
            "contestBadge": null
        }))
        .expect("deserialize matchedUser")
    }

    #[test]
    fn sums_all_buckets_except_all() {
        let user = matched_user(
            json!(3),
            json!([
                {"difficulty": "All", "count": 17},
                {"difficulty": "Easy", "count": 10},
                {"difficulty": "Medium", "count": 5},
                {"difficulty": "Hard", "count": 2}
            ]),
        );
        let stats = normalize(user);
        assert_eq!(stats.problems_solved, 17);
        assert_eq!(stats.easy_solved, 10);
        assert_eq!(stats.medium_solved, 5);
        assert_eq!(stats.hard_solved, 2);
        assert_eq!(stats.submissions.len(), 4);
    }

    #[test]
    fn derives_rating_from_star_rating() {
        let stats = normalize(matched_user(json!(3), json!([])));
        assert_eq!(stats.rating, 300);
        assert_eq!(stats.max_rating, 300);
        assert_eq!(stats.contests_attended, 0);
    }

    #[test]
    fn fractional_star_rating_rounds() {
        let stats = normalize(matched_user(json!(3.5), json!([])));
        assert_eq!(stats.rating, 350);
    }

    #[test]
    fn missing_star_rating_and_buckets_default_to_zero() {
        let stats = normalize(matched_user(Value::Null, json!([{"difficulty": "All", "count": 0}])));
        assert_eq!(stats.rating, 0);
        assert_eq!(stats.problems_solved, 0);
        assert_eq!(stats.easy_solved, 0);
        assert_eq!(stats.hard_solved, 0);
    }

    #[test]
    fn profile_and_badge_pass_through() {
        let stats = normalize(matched_user(json!(2), json!([])));
        assert_eq!(stats.profile["ranking"], 1234);
        assert_eq!(stats.contest_badge, Value::Null);
    }

    #[test]
    fn graphql_url_keeps_endpoint_path() {
        let client = LeetcodeClient::new(Client::new(), "https://leetcode.com/graphql/").unwrap();
        assert_eq!(client.graphql_url.as_str(), "https://leetcode.com/graphql");
    }
}
