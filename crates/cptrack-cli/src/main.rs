//! Command-line access to the profile aggregator, without the HTTP server.

use clap::{Parser, Subcommand};
use cptrack_platforms::{Platform, ProfileAggregator, ProfileHandles, RatingSummary};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "cptrack-cli")]
#[command(about = "Competitive-programming profile lookups")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Look up any combination of platforms and print the aggregate JSON
    Profile {
        /// Codeforces handle
        #[arg(long)]
        cf: Option<String>,
        /// CodeChef handle
        #[arg(long)]
        cc: Option<String>,
        /// AtCoder handle
        #[arg(long)]
        ac: Option<String>,
        /// LeetCode handle
        #[arg(long)]
        lc: Option<String>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Verify one handle and print its rating summary
    Verify {
        /// codeforces, codechef, atcoder, leetcode (or cf, cc, ac, lc)
        platform: Platform,
        handle: String,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    let config = cptrack_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    // stdout carries the JSON result
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        println!("cptrack-cli: use `profile` or `verify` (see --help)");
        return Ok(());
    };

    let aggregator = ProfileAggregator::from_config(&config)?;
    match command {
        Commands::Profile {
            cf,
            cc,
            ac,
            lc,
            pretty,
        } => {
            let handles = ProfileHandles {
                codeforces: cf,
                codechef: cc,
                atcoder: ac,
                leetcode: lc,
            };
            let response = aggregator.aggregate(&handles).await?;
            print_json(&response, pretty)?;
        }
        Commands::Verify {
            platform,
            handle,
            pretty,
        } => {
            let handle = handle.trim();
            if handle.is_empty() {
                anyhow::bail!("handle is required");
            }
            match aggregator.lookup(platform, handle).await {
                Ok(stats) => print_json(&RatingSummary::from(&stats), pretty)?,
                Err(e) => {
                    tracing::debug!(%platform, handle, error = %e, "verification failed");
                    anyhow::bail!("{}", e.public_message(platform));
                }
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests;
