//! Shared request plumbing for the platform clients.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::PlatformError;

/// Builds the `reqwest::Client` shared by every platform client.
///
/// `timeout` bounds each individual request; the aggregator applies its own
/// budget to the whole lookup on top of this.
pub(crate) fn build_client(timeout: Duration, user_agent: &str) -> Result<Client, PlatformError> {
    let client = Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Parses a base URL and normalises it to end with exactly one slash, so
/// endpoint segments are appended rather than replacing the last segment.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, PlatformError> {
    let normalised = format!("{}/", base_url.trim().trim_end_matches('/'));
    let url = Url::parse(&normalised).map_err(|e| PlatformError::InvalidBaseUrl {
        url: base_url.to_owned(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(PlatformError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: "URL cannot be used as a base".to_owned(),
        });
    }
    Ok(url)
}

/// Appends path segments to `base`, percent-encoding each one.
///
/// Handles are user input, so they always go through here rather than
/// `format!` into a path.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Maps 404 to [`PlatformError::NotFound`] and any other non-2xx status to
/// [`PlatformError::UnexpectedStatus`].
pub(crate) fn ensure_success(response: Response) -> Result<Response, PlatformError> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(PlatformError::NotFound {
            url: response.url().to_string(),
        });
    }
    if !status.is_success() {
        return Err(PlatformError::UnexpectedStatus {
            status: status.as_u16(),
            url: response.url().to_string(),
        });
    }
    Ok(response)
}

/// Reads the body as text and deserializes it, tagging parse failures with `context`.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    context: &str,
) -> Result<T, PlatformError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| PlatformError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}
