//! Normalized per-platform stats and the aggregate response shape.
//!
//! Every stats record has a fixed field set. Fields the upstream does not
//! supply are filled with documented defaults (`0`, `"unrated"`, `"0★"`)
//! rather than omitted.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A supported competitive-programming platform.
///
/// Declaration order is the key order of [`AggregateResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Codeforces,
    Codechef,
    Atcoder,
    Leetcode,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Codeforces,
        Platform::Codechef,
        Platform::Atcoder,
        Platform::Leetcode,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Codeforces => "codeforces",
            Platform::Codechef => "codechef",
            Platform::Atcoder => "atcoder",
            Platform::Leetcode => "leetcode",
        }
    }

    /// Query-string parameter carrying this platform's handle.
    #[must_use]
    pub fn query_param(self) -> &'static str {
        match self {
            Platform::Codeforces => "cf",
            Platform::Codechef => "cc",
            Platform::Atcoder => "ac",
            Platform::Leetcode => "lc",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown platform \"{0}\" (expected codeforces, codechef, atcoder or leetcode)")]
pub struct UnknownPlatform(pub String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    /// Accepts the full name or the short query-parameter code, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == needle || p.query_param() == needle)
            .ok_or_else(|| UnknownPlatform(s.to_string()))
    }
}

/// Handles requested in one aggregation, keyed by the short query codes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileHandles {
    #[serde(rename = "cf")]
    pub codeforces: Option<String>,
    #[serde(rename = "cc")]
    pub codechef: Option<String>,
    #[serde(rename = "ac")]
    pub atcoder: Option<String>,
    #[serde(rename = "lc")]
    pub leetcode: Option<String>,
}

impl ProfileHandles {
    /// Handles for a single platform.
    #[must_use]
    pub fn single(platform: Platform, handle: impl Into<String>) -> Self {
        let mut handles = Self::default();
        *handles.slot_mut(platform) = Some(handle.into());
        handles
    }

    /// Returns the trimmed handle for `platform`; blank handles count as absent.
    #[must_use]
    pub fn get(&self, platform: Platform) -> Option<&str> {
        let slot = match platform {
            Platform::Codeforces => &self.codeforces,
            Platform::Codechef => &self.codechef,
            Platform::Atcoder => &self.atcoder,
            Platform::Leetcode => &self.leetcode,
        };
        slot.as_deref().map(str::trim).filter(|h| !h.is_empty())
    }

    /// Every `(platform, handle)` pair that was actually supplied.
    pub fn requested(&self) -> impl Iterator<Item = (Platform, &str)> + '_ {
        Platform::ALL
            .into_iter()
            .filter_map(|p| self.get(p).map(|h| (p, h)))
    }

    fn slot_mut(&mut self, platform: Platform) -> &mut Option<String> {
        match platform {
            Platform::Codeforces => &mut self.codeforces,
            Platform::Codechef => &mut self.codechef,
            Platform::Atcoder => &mut self.atcoder,
            Platform::Leetcode => &mut self.leetcode,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeforcesStats {
    pub username: String,
    pub rating: i64,
    pub max_rating: i64,
    pub rank: String,
    pub max_rank: String,
    /// Not exposed by `user.info`; always 0.
    pub problems_solved: i64,
    /// Not exposed by `user.info`; always 0.
    pub contests_participated: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodechefStats {
    pub username: String,
    pub rating: i64,
    pub global_rank: i64,
    pub country_rank: i64,
    pub stars: String,
    pub problems_solved: i64,
    pub contests_participated: i64,
}

/// AtCoder exposes only an aggregate accepted count, no per-contest-type split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtcoderStats {
    pub username: String,
    pub rating: i64,
    pub rank: String,
    pub contests_participated: i64,
    pub problems_solved: i64,
}

/// One `acSubmissionNum` bucket as returned by LeetCode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyCount {
    pub difficulty: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetcodeStats {
    pub username: String,
    pub profile: serde_json::Value,
    pub submissions: Vec<DifficultyCount>,
    pub contest_badge: serde_json::Value,
    /// `starRating * 100`. LeetCode has no public numeric rating; this is a
    /// display score, not comparable with other platforms' ratings.
    pub rating: i64,
    /// Mirrors `rating`.
    pub max_rating: i64,
    pub problems_solved: i64,
    /// Not derivable from the profile query; always 0.
    pub contests_attended: i64,
    #[serde(rename = "easy_solved")]
    pub easy_solved: i64,
    #[serde(rename = "medium_solved")]
    pub medium_solved: i64,
    #[serde(rename = "hard_solved")]
    pub hard_solved: i64,
}

/// Normalized stats for any one platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PlatformStats {
    Codeforces(CodeforcesStats),
    Codechef(CodechefStats),
    Atcoder(AtcoderStats),
    Leetcode(LeetcodeStats),
}

impl PlatformStats {
    #[must_use]
    pub fn platform(&self) -> Platform {
        match self {
            PlatformStats::Codeforces(_) => Platform::Codeforces,
            PlatformStats::Codechef(_) => Platform::Codechef,
            PlatformStats::Atcoder(_) => Platform::Atcoder,
            PlatformStats::Leetcode(_) => Platform::Leetcode,
        }
    }
}

/// Result of one platform lookup: stats, or an `{"error": ...}` marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PlatformOutcome {
    Stats(PlatformStats),
    Error { error: String },
}

impl PlatformOutcome {
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        PlatformOutcome::Error {
            error: message.into(),
        }
    }

    #[must_use]
    pub fn stats(&self) -> Option<&PlatformStats> {
        match self {
            PlatformOutcome::Stats(stats) => Some(stats),
            PlatformOutcome::Error { .. } => None,
        }
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            PlatformOutcome::Stats(_) => None,
            PlatformOutcome::Error { error } => Some(error),
        }
    }
}

/// The aggregate response: exactly one entry per requested platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AggregateResponse(BTreeMap<Platform, PlatformOutcome>);

impl AggregateResponse {
    pub fn insert(&mut self, platform: Platform, outcome: PlatformOutcome) {
        self.0.insert(platform, outcome);
    }

    #[must_use]
    pub fn get(&self, platform: Platform) -> Option<&PlatformOutcome> {
        self.0.get(&platform)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn platforms(&self) -> impl Iterator<Item = Platform> + '_ {
        self.0.keys().copied()
    }
}
