//! CodeChef lookup via the unofficial `codechef-api` aggregation service.
//!
//! The service returns loosely typed JSON: numeric fields often arrive as
//! strings (`"1834"`, `"1834 (Div 3)"`), so they are coerced by leading-integer
//! parsing instead of deserialized into a fixed struct.

use reqwest::{Client, Url};
use serde_json::{Map, Value};

use crate::error::PlatformError;
use crate::http::{endpoint, ensure_success, parse_base_url, read_json};
use crate::types::CodechefStats;

const DEFAULT_STARS: &str = "0★";

pub struct CodechefClient {
    client: Client,
    base_url: Url,
}

impl CodechefClient {
    /// # Errors
    ///
    /// Returns [`PlatformError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn new(client: Client, base_url: &str) -> Result<Self, PlatformError> {
        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
        })
    }

    /// Fetches and normalizes one user's CodeChef profile.
    ///
    /// # Errors
    ///
    /// - [`PlatformError::UpstreamFailure`] if the service reports a failed status;
    ///   carries the service's `message` when present.
    /// - [`PlatformError::NotFound`] / [`PlatformError::UnexpectedStatus`] for non-2xx.
    /// - [`PlatformError::Http`] / [`PlatformError::Deserialize`] on transport or parse failure.
    pub async fn fetch(&self, handle: &str) -> Result<CodechefStats, PlatformError> {
        let url = endpoint(&self.base_url, &["handle", handle]);
        let response = self.client.get(url).send().await?;
        let body: Value = read_json(ensure_success(response)?, "codechef handle").await?;
        normalize(handle, &body)
    }
}

/// Maps a `codechef-api` body onto the fixed stats record.
///
/// # Errors
///
/// Returns [`PlatformError::UpstreamFailure`] when the body is not an object,
/// has `status: "Failed"`, or has `success: false`.
pub fn normalize(handle: &str, body: &Value) -> Result<CodechefStats, PlatformError> {
    let Some(data) = body.as_object().filter(|data| !is_failed(data)) else {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned);
        return Err(PlatformError::UpstreamFailure { message });
    };

    Ok(CodechefStats {
        username: handle.to_owned(),
        rating: int_field(data, &["rating", "currentRating"]),
        global_rank: int_field(data, &["global_rank", "globalRank"]),
        country_rank: int_field(data, &["country_rank", "countryRank"]),
        stars: data
            .get("stars")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_STARS)
            .to_owned(),
        problems_solved: int_field(data, &["problems_solved", "problemsSolved"]),
        contests_participated: int_field(
            data,
            &["contests_participated", "contestsParticipated"],
        ),
    })
}

fn is_failed(data: &Map<String, Value>) -> bool {
    data.get("status").and_then(Value::as_str) == Some("Failed")
        || data.get("success").and_then(Value::as_bool) == Some(false)
}

/// Coerces the first present key to an integer, defaulting to 0.
fn int_field(data: &Map<String, Value>, keys: &[&str]) -> i64 {
    keys.iter()
        .find_map(|k| data.get(*k).filter(|v| !v.is_null()))
        .map_or(0, leading_int)
}

/// Leading-integer coercion: numbers truncate toward zero, strings parse their
/// leading optionally-signed digits, everything else is 0.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn leading_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n.as_i64().unwrap_or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map_or(0, |f| f.trunc() as i64)
        }),
        Value::String(s) => parse_leading_digits(s),
        _ => 0,
    }
}

fn parse_leading_digits(s: &str) -> i64 {
    let s = s.trim_start();
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse::<i64>().map_or(0, |n| sign * n)
}
