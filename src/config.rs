use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};

use crate::achievement::AchievementFilter;

/// WasteWise - terminal client for the waste-sorting NFT reward backend
///
/// Configuration priority: CLI args > Environment variables > Defaults
#[derive(Parser, Debug)]
#[command(name = "wastewise")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "WasteWise backend terminal client", long_about = None)]
pub struct CliArgs {
    /// REST API base URL
    #[arg(long, env = "API_BASE_URL")]
    pub api_base_url: Option<String>,

    /// GraphQL endpoint URL (leaderboard)
    #[arg(long, env = "GRAPHQL_URL")]
    pub graphql_url: Option<String>,

    /// Wallet address to act as (0x + 40 hex chars)
    #[arg(long, env = "WALLET_ADDRESS")]
    pub wallet_address: Option<String>,

    /// HTTP request timeout in milliseconds (1000-120000)
    #[arg(long, env = "HTTP_TIMEOUT_MS")]
    pub http_timeout_ms: Option<u64>,

    /// Block-explorer network for transaction links (e.g. "sepolia", "mainnet")
    #[arg(long, env = "EXPLORER_NETWORK")]
    pub explorer_network: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List NFTs the wallet is (or could become) eligible to claim
    Eligible,
    /// List NFTs the wallet owns
    Owned,
    /// Show the wallet's claim history
    Claims,
    /// Look up a single claim record
    ClaimStatus {
        claim_id: u64,
    },
    /// Claim a pool entry into the wallet
    Claim {
        nft_pool_id: u64,
    },
    /// Reserve a pool entry (30-minute backend-enforced hold)
    Reserve {
        nft_pool_id: u64,
    },
    /// Admin: pool statistics
    PoolStats,
    /// Admin: mint a new NFT into the pool
    Mint {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        image_url: String,
        /// Rarity tier, 1 (Common) to 5 (Mythic)
        #[arg(long)]
        rarity: i64,
        #[arg(long, default_value_t = 0)]
        required_score: i64,
        #[arg(long, default_value_t = 0)]
        required_classifications: i64,
        #[arg(long)]
        category: Option<String>,
    },
    /// Admin: batch mint from a JSON file of pool entries
    BatchMint {
        /// Path to a JSON array of NFT definitions
        file: std::path::PathBuf,
    },
    /// List achievement progress
    Achievements {
        /// all | completed | claimable | claimed
        #[arg(long, default_value_t = AchievementFilter::All, value_parser = clap::value_parser!(AchievementFilter))]
        filter: AchievementFilter,
    },
    /// Claim a completed achievement
    ClaimAchievement {
        achievement_id: u64,
    },
    /// Show the global leaderboard
    Leaderboard {
        #[arg(long, default_value_t = 10)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Show the wallet's leaderboard ranking
    Ranking,
    /// Submit a waste image for AI classification
    Classify {
        #[arg(long)]
        image_url: String,
        /// Expected waste category (e.g. plastic, glass, paper)
        #[arg(long)]
        category: String,
    },
    /// Show recent classification history
    History,
    /// Show classification statistics
    Stats,
}

#[derive(Debug)]
pub struct Config {
    pub api_base_url: String,
    pub graphql_url: String,
    pub wallet_address: Option<String>,
    pub http_timeout_ms: u64,
    pub explorer_network: String,
    pub command: Command,
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

/// Validate URL format (basic scheme check)
fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!("{name} must start with http:// or https://"))
    }
}

/// Load configuration from CLI args and environment variables
pub fn load() -> Result<Config> {
    from_args(CliArgs::parse())
}

pub fn from_args(args: CliArgs) -> Result<Config> {
    let api_base_url = args
        .api_base_url
        .unwrap_or_else(|| "http://localhost:3001/api".to_string());
    validate_url(&api_base_url, "API_BASE_URL")?;

    let graphql_url = args
        .graphql_url
        .unwrap_or_else(|| "http://localhost:3001/graphql".to_string());
    validate_url(&graphql_url, "GRAPHQL_URL")?;

    let http_timeout_ms = args.http_timeout_ms.unwrap_or(10_000);
    let http_timeout_ms = validate_in_range(http_timeout_ms, 1_000, 120_000, "HTTP_TIMEOUT_MS")?;

    let explorer_network = args
        .explorer_network
        .unwrap_or_else(|| "sepolia".to_string());

    Ok(Config {
        api_base_url,
        graphql_url,
        wallet_address: args.wallet_address,
        http_timeout_ms,
        explorer_network,
        command: args.command,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["wastewise"];
        argv.extend_from_slice(extra);
        argv.push("eligible");
        CliArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let cfg = from_args(args(&[])).unwrap();
        assert_eq!(cfg.api_base_url, "http://localhost:3001/api");
        assert_eq!(cfg.graphql_url, "http://localhost:3001/graphql");
        assert_eq!(cfg.http_timeout_ms, 10_000);
        assert_eq!(cfg.explorer_network, "sepolia");
        assert!(cfg.wallet_address.is_none());
    }

    #[test]
    fn cli_args_override_defaults() {
        let cfg = from_args(args(&[
            "--api-base-url",
            "https://api.example/api",
            "--http-timeout-ms",
            "5000",
        ]))
        .unwrap();
        assert_eq!(cfg.api_base_url, "https://api.example/api");
        assert_eq!(cfg.http_timeout_ms, 5_000);
    }

    #[test]
    fn rejects_bad_urls_and_out_of_range_timeouts() {
        assert!(from_args(args(&["--api-base-url", "ftp://nope"])).is_err());
        assert!(from_args(args(&["--http-timeout-ms", "10"])).is_err());
        assert!(from_args(args(&["--http-timeout-ms", "999999"])).is_err());
    }
}
