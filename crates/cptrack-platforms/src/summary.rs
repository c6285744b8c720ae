//! Uniform rating summary derived from any platform's stats.
//!
//! This is the row a client persists after verifying a handle: one shape for
//! every platform, plus a display tier for the rating.

use serde::Serialize;

use crate::types::{Platform, PlatformStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingTier {
    Red,
    Orange,
    Purple,
    Blue,
    Cyan,
    Green,
    Gray,
}

impl RatingTier {
    /// Codeforces uses its own color bands; every other platform shares a
    /// coarser four-band scale.
    #[must_use]
    pub fn classify(platform: Platform, rating: i64) -> Self {
        match platform {
            Platform::Codeforces => match rating {
                2400.. => RatingTier::Red,
                2100.. => RatingTier::Orange,
                1900.. => RatingTier::Purple,
                1600.. => RatingTier::Blue,
                1400.. => RatingTier::Cyan,
                1200.. => RatingTier::Green,
                _ => RatingTier::Gray,
            },
            Platform::Codechef | Platform::Atcoder | Platform::Leetcode => match rating {
                2000.. => RatingTier::Red,
                1500.. => RatingTier::Orange,
                1000.. => RatingTier::Blue,
                _ => RatingTier::Green,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub platform: Platform,
    pub username: String,
    pub rating: i64,
    pub max_rating: i64,
    pub problems_solved: i64,
    pub contests_attended: i64,
    pub tier: RatingTier,
}

impl From<&PlatformStats> for RatingSummary {
    fn from(stats: &PlatformStats) -> Self {
        let (username, rating, max_rating, problems_solved, contests_attended) = match stats {
            PlatformStats::Codeforces(s) => (
                &s.username,
                s.rating,
                s.max_rating,
                s.problems_solved,
                s.contests_participated,
            ),
            PlatformStats::Codechef(s) => (
                &s.username,
                s.rating,
                0,
                s.problems_solved,
                s.contests_participated,
            ),
            PlatformStats::Atcoder(s) => (
                &s.username,
                s.rating,
                0,
                s.problems_solved,
                s.contests_participated,
            ),
            PlatformStats::Leetcode(s) => (
                &s.username,
                s.rating,
                s.max_rating,
                s.problems_solved,
                s.contests_attended,
            ),
        };

        let platform = stats.platform();
        Self {
            platform,
            username: username.clone(),
            rating,
            max_rating: if max_rating == 0 { rating } else { max_rating },
            problems_solved,
            contests_attended,
            tier: RatingTier::classify(platform, rating),
        }
    }
}
