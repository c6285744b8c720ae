use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Base URLs for every upstream the aggregator talks to.
///
/// Overridable so tests can point each platform at a mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamUrls {
    pub codeforces: String,
    pub codechef: String,
    pub atcoder: String,
    pub atcoder_problems: String,
    pub leetcode_graphql: String,
}

impl Default for UpstreamUrls {
    fn default() -> Self {
        Self {
            codeforces: "https://codeforces.com".to_string(),
            codechef: "https://codechef-api.vercel.app".to_string(),
            atcoder: "https://atcoder.jp".to_string(),
            atcoder_problems: "https://kenkoooo.com/atcoder".to_string(),
            leetcode_graphql: "https://leetcode.com/graphql".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub upstream_timeout_secs: u64,
    pub user_agent: String,
    pub upstreams: UpstreamUrls,
    pub rate_limit_max_requests: usize,
    pub rate_limit_window_secs: u64,
}
