//! Fan-out of a [`ProfileHandles`] request to every requested platform.
//!
//! Each lookup runs as its own task under a fixed time budget. A lookup that
//! fails or overruns is recorded as that platform's `{"error": ...}` entry;
//! the other lookups are unaffected.

use std::sync::Arc;
use std::time::{Duration, Instant};

use cptrack_core::AppConfig;
use reqwest::Client;
use thiserror::Error;
use tokio::task::JoinSet;

use crate::atcoder::AtcoderClient;
use crate::codechef::CodechefClient;
use crate::codeforces::CodeforcesClient;
use crate::error::PlatformError;
use crate::http::build_client;
use crate::leetcode::LeetcodeClient;
use crate::types::{AggregateResponse, Platform, PlatformOutcome, PlatformStats, ProfileHandles};

/// Failure of the aggregation itself, as opposed to one platform's lookup.
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("internal aggregation failure: {0}")]
    Internal(String),
}

struct PlatformClients {
    codeforces: CodeforcesClient,
    codechef: CodechefClient,
    atcoder: AtcoderClient,
    leetcode: LeetcodeClient,
}

/// Cheap to clone; clones share the underlying HTTP connection pool.
#[derive(Clone)]
pub struct ProfileAggregator {
    clients: Arc<PlatformClients>,
    budget: Duration,
}

impl ProfileAggregator {
    /// Builds the shared HTTP client and all four platform clients from config.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Http`] if the HTTP client cannot be built, or
    /// [`PlatformError::InvalidBaseUrl`] if a configured upstream URL is invalid.
    pub fn from_config(config: &AppConfig) -> Result<Self, PlatformError> {
        let budget = Duration::from_secs(config.upstream_timeout_secs);
        let client = build_client(budget, &config.user_agent)?;
        let urls = &config.upstreams;
        Ok(Self::new(
            CodeforcesClient::new(client.clone(), &urls.codeforces)?,
            CodechefClient::new(client.clone(), &urls.codechef)?,
            AtcoderClient::new(client.clone(), &urls.atcoder, &urls.atcoder_problems)?,
            LeetcodeClient::new(client, &urls.leetcode_graphql)?,
            budget,
        ))
    }

    #[must_use]
    pub fn new(
        codeforces: CodeforcesClient,
        codechef: CodechefClient,
        atcoder: AtcoderClient,
        leetcode: LeetcodeClient,
        budget: Duration,
    ) -> Self {
        Self {
            clients: Arc::new(PlatformClients {
                codeforces,
                codechef,
                atcoder,
                leetcode,
            }),
            budget,
        }
    }

    /// Same as [`ProfileAggregator::from_config`] but with a caller-supplied
    /// HTTP client, for tests that need a shorter request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::InvalidBaseUrl`] if a configured upstream URL is invalid.
    pub fn with_client(
        client: &Client,
        config: &AppConfig,
        budget: Duration,
    ) -> Result<Self, PlatformError> {
        let urls = &config.upstreams;
        Ok(Self::new(
            CodeforcesClient::new(client.clone(), &urls.codeforces)?,
            CodechefClient::new(client.clone(), &urls.codechef)?,
            AtcoderClient::new(client.clone(), &urls.atcoder, &urls.atcoder_problems)?,
            LeetcodeClient::new(client.clone(), &urls.leetcode_graphql)?,
            budget,
        ))
    }

    #[must_use]
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Looks up every supplied handle concurrently.
    ///
    /// The response has exactly one entry per supplied (non-blank) handle.
    /// Lookup failures never fail the call.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError::Internal`] only if a lookup task panics or is
    /// cancelled.
    pub async fn aggregate(
        &self,
        handles: &ProfileHandles,
    ) -> Result<AggregateResponse, AggregateError> {
        let mut tasks = JoinSet::new();
        for (platform, handle) in handles.requested() {
            let this = self.clone();
            let handle = handle.to_owned();
            tasks.spawn(async move {
                let outcome = this.lookup_outcome(platform, &handle).await;
                (platform, outcome)
            });
        }

        let mut response = AggregateResponse::default();
        while let Some(joined) = tasks.join_next().await {
            let (platform, outcome) = joined.map_err(|e| {
                tracing::error!(error = %e, "platform lookup task failed");
                AggregateError::Internal(e.to_string())
            })?;
            response.insert(platform, outcome);
        }
        Ok(response)
    }

    /// One platform lookup under the time budget, without the error mapping.
    ///
    /// # Errors
    ///
    /// Returns the platform's [`PlatformError`], or [`PlatformError::Timeout`]
    /// if the budget elapses first.
    pub async fn lookup(
        &self,
        platform: Platform,
        handle: &str,
    ) -> Result<PlatformStats, PlatformError> {
        let clients = &self.clients;
        let lookup = async {
            Ok::<_, PlatformError>(match platform {
                Platform::Codeforces => {
                    PlatformStats::Codeforces(clients.codeforces.fetch(handle).await?)
                }
                Platform::Codechef => PlatformStats::Codechef(clients.codechef.fetch(handle).await?),
                Platform::Atcoder => PlatformStats::Atcoder(clients.atcoder.fetch(handle).await?),
                Platform::Leetcode => PlatformStats::Leetcode(clients.leetcode.fetch(handle).await?),
            })
        };

        tokio::time::timeout(self.budget, lookup)
            .await
            .map_err(|_| PlatformError::Timeout {
                after_ms: u64::try_from(self.budget.as_millis()).unwrap_or(u64::MAX),
            })?
    }

    async fn lookup_outcome(&self, platform: Platform, handle: &str) -> PlatformOutcome {
        let started = Instant::now();
        let result = self.lookup(platform, handle).await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(stats) => {
                tracing::debug!(%platform, handle, elapsed_ms, "platform lookup succeeded");
                PlatformOutcome::Stats(stats)
            }
            Err(e) => {
                tracing::warn!(
                    %platform,
                    handle,
                    kind = ?e.kind(),
                    error = %e,
                    elapsed_ms,
                    "platform lookup failed"
                );
                PlatformOutcome::error(e.public_message(platform))
            }
        }
    }
}
