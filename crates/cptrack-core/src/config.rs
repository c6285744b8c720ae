use crate::app_config::{AppConfig, Environment, UpstreamUrls};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let base_url = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        let trimmed = raw.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(invalid(var, format!("\"{raw}\" is not an http(s) URL")));
        }
        Ok(trimmed.to_string())
    };

    let env = parse_environment(&or_default("CPTRACK_ENV", "development"));

    let bind_addr = or_default("CPTRACK_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("CPTRACK_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("CPTRACK_LOG_LEVEL", "info");

    let upstream_timeout_secs = parse_u64("CPTRACK_UPSTREAM_TIMEOUT_SECS", "5")?;
    if upstream_timeout_secs == 0 {
        return Err(invalid(
            "CPTRACK_UPSTREAM_TIMEOUT_SECS",
            "timeout must be at least 1 second".to_string(),
        ));
    }
    let user_agent = or_default("CPTRACK_USER_AGENT", "cptrack/0.1 (profile-aggregator)");

    let defaults = UpstreamUrls::default();
    let upstreams = UpstreamUrls {
        codeforces: base_url("CPTRACK_CODEFORCES_BASE_URL", &defaults.codeforces)?,
        codechef: base_url("CPTRACK_CODECHEF_BASE_URL", &defaults.codechef)?,
        atcoder: base_url("CPTRACK_ATCODER_BASE_URL", &defaults.atcoder)?,
        atcoder_problems: base_url(
            "CPTRACK_ATCODER_PROBLEMS_BASE_URL",
            &defaults.atcoder_problems,
        )?,
        leetcode_graphql: base_url("CPTRACK_LEETCODE_GRAPHQL_URL", &defaults.leetcode_graphql)?,
    };

    let rate_limit_max_requests = parse_usize("CPTRACK_RATE_LIMIT_MAX_REQUESTS", "120")?;
    if rate_limit_max_requests == 0 {
        return Err(invalid(
            "CPTRACK_RATE_LIMIT_MAX_REQUESTS",
            "must allow at least 1 request per window".to_string(),
        ));
    }
    let rate_limit_window_secs = parse_u64("CPTRACK_RATE_LIMIT_WINDOW_SECS", "60")?;
    if rate_limit_window_secs == 0 {
        return Err(invalid(
            "CPTRACK_RATE_LIMIT_WINDOW_SECS",
            "window must be at least 1 second".to_string(),
        ));
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        upstream_timeout_secs,
        user_agent,
        upstreams,
        rate_limit_max_requests,
        rate_limit_window_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
