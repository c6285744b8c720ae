//! Upstream clients for competitive-programming platforms and the
//! aggregator that fans a set of handles out to them.
//!
//! Every platform lookup normalizes its upstream response into a fixed stats
//! record (see [`types`]); failures are captured per platform as an
//! `{"error": ...}` entry instead of failing the whole aggregate.

pub mod aggregate;
pub mod atcoder;
pub mod codechef;
pub mod codeforces;
pub mod error;
pub mod leetcode;
pub mod summary;
pub mod types;

mod http;

pub use aggregate::{AggregateError, ProfileAggregator};
pub use error::{ErrorKind, PlatformError};
pub use summary::{RatingSummary, RatingTier};
pub use types::{
    AggregateResponse, AtcoderStats, CodechefStats, CodeforcesStats, LeetcodeStats, Platform,
    PlatformOutcome, PlatformStats, ProfileHandles, UnknownPlatform,
};
