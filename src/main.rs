use anyhow::{bail, Context, Result};

use wastewise::achievement::{AchievementApiClient, AchievementStore};
use wastewise::api::ApiClient;
use wastewise::classification::{ClassificationApiClient, ClassificationStore};
use wastewise::config::{self, Command, Config};
use wastewise::leaderboard::{GetLeaderboardInput, LeaderboardClient};
use wastewise::nft_api::{
    self, build_nft_attributes, etherscan_link, format_category, format_rarity, format_score,
    format_tx_hash, validate_nft_data, NftApiClient, NftBackend, NftDraft,
};
use wastewise::nft_store::NftStore;
use wastewise::types::AddNftToPoolRequest;
use wastewise::wallet::WalletSession;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    dotenvy::dotenv().ok();
    env_logger::init();

    let cfg = config::load().context("Failed to load configuration")?;

    let mut session = WalletSession::new();
    if let Some(address) = &cfg.wallet_address {
        session.connect(address)?;
    }

    let api = ApiClient::new(cfg.api_base_url.clone(), cfg.http_timeout_ms);
    let nft = NftApiClient::new(api.clone());
    let achievements_api = AchievementApiClient::new(api.clone());
    let classification_api = ClassificationApiClient::new(api);
    let leaderboard = LeaderboardClient::new(cfg.graphql_url.clone(), cfg.http_timeout_ms);

    run(
        cfg,
        session,
        nft,
        achievements_api,
        classification_api,
        leaderboard,
    )
    .await
}

async fn run(
    cfg: Config,
    session: WalletSession,
    nft: NftApiClient,
    achievements_api: AchievementApiClient,
    classification_api: ClassificationApiClient,
    leaderboard: LeaderboardClient,
) -> Result<()> {
    let mut store = NftStore::new();

    match cfg.command {
        Command::Eligible => {
            let wallet = session.require()?;
            store.fetch_eligible_nfts(&nft, wallet).await?;
            if store.eligible_nfts.is_empty() {
                println!("No eligible NFTs for {wallet}");
                return Ok(());
            }
            for entry in &store.eligible_nfts {
                let id = entry.nft.id.map(|i| i.to_string()).unwrap_or_default();
                println!(
                    "#{id} {} [{} {}] requires {} pts / {} sorts",
                    entry.nft.name,
                    entry.nft.rarity,
                    format_rarity(entry.nft.rarity),
                    format_score(entry.nft.required_score),
                    entry.nft.required_classifications,
                );
                if entry.can_claim {
                    println!("    claimable now");
                } else {
                    for reason in &entry.missing_requirements {
                        println!("    missing: {reason}");
                    }
                }
            }
        }
        Command::Owned => {
            let wallet = session.require()?;
            store.fetch_owned_nfts(&nft, wallet).await?;
            if store.owned_nfts.is_empty() {
                println!("No NFTs owned by {wallet}");
                return Ok(());
            }
            for owned in &store.owned_nfts {
                println!(
                    "{} [{}] claimed {} tx {}",
                    owned.nft.name,
                    format_rarity(owned.nft.rarity),
                    owned.claimed_at,
                    format_tx_hash(&owned.transaction_hash, 8),
                );
                println!(
                    "    {}",
                    etherscan_link(&owned.transaction_hash, &cfg.explorer_network)
                );
            }
        }
        Command::Claims => {
            let wallet = session.require()?;
            store.fetch_nft_claims(&nft, wallet).await?;
            if store.nft_claims.is_empty() {
                println!("No claims for {wallet}");
                return Ok(());
            }
            for claim in &store.nft_claims {
                print_claim(claim);
            }
        }
        Command::ClaimStatus { claim_id } => {
            let claim = nft.claim_status(claim_id).await?;
            print_claim(&claim);
        }
        Command::Claim { nft_pool_id } => {
            let wallet = session.require()?;
            let res = store.claim_nft(&nft, wallet, nft_pool_id).await?;
            println!("{}", res.message);
            println!(
                "claim #{} confirmed in block {} tx {}",
                res.claim_id,
                res.transfer_result.block_number,
                format_tx_hash(&res.transfer_result.transaction_hash, 8),
            );
            println!(
                "    {}",
                etherscan_link(&res.transfer_result.transaction_hash, &cfg.explorer_network)
            );
        }
        Command::Reserve { nft_pool_id } => {
            let wallet = session.require()?;
            let res = store.reserve_nft(&nft, wallet, nft_pool_id).await?;
            println!("{} (held until {})", res.message, res.reserved_until);
        }
        Command::PoolStats => {
            store.fetch_pool_stats(&nft).await?;
            let stats = store.pool_stats.as_ref().expect("stats just fetched");
            let o = &stats.overview;
            println!(
                "pool: {} total, {} available, {} claimed, {} pending ({:.1}% claim rate)",
                o.total_nfts,
                o.available_nfts,
                o.claimed_nfts,
                o.pending_claims,
                o.claim_rate * 100.0
            );
            for row in &stats.by_rarity {
                println!("  {:>9}: {}", format_rarity(row.rarity), row.count);
            }
            for row in &stats.by_category {
                println!("  {:>9}: {}", format_category(&row.category), row.count);
            }
        }
        Command::Mint {
            name,
            description,
            image_url,
            rarity,
            required_score,
            required_classifications,
            category,
        } => {
            let draft = NftDraft {
                name: Some(name.clone()),
                description: Some(description.clone()),
                image_url: Some(image_url.clone()),
                rarity: Some(rarity),
                required_score: Some(required_score),
                required_classifications: Some(required_classifications),
            };
            let validation = validate_nft_data(&draft);
            if !validation.is_valid {
                for error in &validation.errors {
                    eprintln!("invalid: {error}");
                }
                bail!("NFT definition is invalid");
            }

            let req = AddNftToPoolRequest {
                attributes: Some(build_nft_attributes(category.as_deref(), rarity as u8, &[])),
                name,
                description,
                image_url,
                rarity: rarity as u8,
                required_score: required_score as u64,
                required_classifications: required_classifications as u64,
                category,
            };
            let res = store.mint_nft(&nft, &req).await?;
            println!(
                "minted '{}' as token {} ({}) tx {}",
                res.name,
                res.token_id,
                res.status,
                format_tx_hash(&res.blockchain_info.transaction_hash, 8),
            );
            println!("    metadata: {}", res.metadata_uri);
        }
        Command::BatchMint { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let nfts: Vec<AddNftToPoolRequest> =
                serde_json::from_str(&raw).context("Failed to parse NFT definitions")?;
            if nfts.is_empty() {
                bail!("No NFT definitions in {}", file.display());
            }

            // Validate the whole batch before touching the network.
            let mut invalid = 0usize;
            for (idx, item) in nfts.iter().enumerate() {
                let validation = validate_nft_data(&NftDraft {
                    name: Some(item.name.clone()),
                    description: Some(item.description.clone()),
                    image_url: Some(item.image_url.clone()),
                    rarity: Some(item.rarity as i64),
                    required_score: Some(item.required_score as i64),
                    required_classifications: Some(item.required_classifications as i64),
                });
                for error in &validation.errors {
                    eprintln!("entry {idx}: {error}");
                }
                if !validation.is_valid {
                    invalid += 1;
                }
            }
            if invalid > 0 {
                bail!("{invalid} NFT definition(s) invalid, nothing minted");
            }

            let req = wastewise::types::BatchAddNftRequest { nfts };
            let minted = nft.batch_mint_nfts(&req).await?;
            for res in &minted {
                store.add_recent_mint(res.clone());
                println!("minted '{}' as token {}", res.name, res.token_id);
            }
            println!("{} NFT(s) minted", minted.len());
        }
        Command::Achievements { filter } => {
            let wallet = session.require()?;
            let mut achievements = AchievementStore::new();
            achievements.load_achievements(&achievements_api, wallet).await?;
            achievements.set_filter(filter);

            let rows = achievements.filtered_achievements();
            if rows.is_empty() {
                println!("No {filter} achievements for {wallet}");
            }
            for a in rows {
                let state = if a.is_claimed {
                    "claimed"
                } else if a.can_claim {
                    "claimable"
                } else if a.is_completed {
                    "completed"
                } else {
                    "in progress"
                };
                println!(
                    "#{} {} [{}/{}] {:.0}% - {} (+{} pts)",
                    a.id, a.name, a.category, a.tier, a.progress, state, a.score_reward
                );
            }
            println!("completion: {}%", achievements.completion_rate());
        }
        Command::ClaimAchievement { achievement_id } => {
            let wallet = session.require()?;
            let mut achievements = AchievementStore::new();
            achievements.load_achievements(&achievements_api, wallet).await?;
            achievements
                .claim_achievement(&achievements_api, achievement_id, wallet)
                .await?;
            println!("achievement {achievement_id} claimed");
        }
        Command::Leaderboard { limit, offset } => {
            let board = leaderboard
                .leaderboard(Some(GetLeaderboardInput {
                    limit: Some(limit),
                    offset: Some(offset),
                }))
                .await?;
            for entry in &board.entries {
                println!(
                    "#{:<4} {} {}",
                    entry.rank,
                    format_tx_hash(&entry.wallet_address, 6),
                    format_score(entry.score),
                );
            }
            println!("{} players total (as of {})", board.total, board.timestamp);
        }
        Command::Ranking => {
            let wallet = session.require()?;
            let ranking = leaderboard.user_ranking(wallet).await?;
            match ranking.rank {
                Some(rank) => println!(
                    "{} is #{} with {} points",
                    format_tx_hash(&ranking.wallet_address, 6),
                    rank,
                    format_score(ranking.score)
                ),
                None => println!(
                    "{} is unranked with {} points",
                    format_tx_hash(&ranking.wallet_address, 6),
                    format_score(ranking.score)
                ),
            }
        }
        Command::Classify { image_url, category } => {
            let wallet = session.require()?;
            let mut classification = ClassificationStore::new();
            classification.set_image_url(Some(image_url));
            classification.set_selected_category(Some(category));

            let result = classification
                .submit_classification(&classification_api, wallet)
                .await?;
            let verdict = if result.is_correct { "correct" } else { "incorrect" };
            println!(
                "{verdict}: expected {}, AI detected {} ({:.0}% confidence)",
                result.expected_category,
                result.ai_detected_category,
                result.confidence * 100.0
            );
            println!("+{} points", result.score);
            println!("{} ({})", result.ai_description, result.material_type);
            println!("disposal: {}", result.disposal_instructions);
            if let Some(rewards) = &result.available_nfts {
                for reward in rewards {
                    println!(
                        "unlockable NFT: {} [{}]",
                        reward.name,
                        format_rarity(reward.rarity)
                    );
                }
            }
        }
        Command::History => {
            let wallet = session.require()?;
            let mut classification = ClassificationStore::new();
            classification.load_history(&classification_api, wallet).await?;
            if classification.history.is_empty() {
                println!("No classifications yet for {wallet}");
                return Ok(());
            }
            for row in &classification.history {
                let mark = if row.is_correct { "+" } else { "-" };
                println!(
                    "{mark} {} {} -> {} (+{} pts) {}",
                    row.created_at, row.expected_category, row.ai_detected_category,
                    row.score, row.material_type
                );
            }
        }
        Command::Stats => {
            let wallet = session.require()?;
            let mut classification = ClassificationStore::new();
            classification.load_stats(&classification_api, wallet).await?;
            let stats = classification.stats.as_ref().expect("stats just fetched");
            println!(
                "{} classifications, {} correct ({:.1}% accuracy)",
                stats.total_classifications,
                stats.correct_classifications,
                stats.accuracy * 100.0
            );
            println!(
                "score {} streak {}",
                format_score(stats.total_score),
                stats.streak_count
            );
        }
    }

    Ok(())
}

fn print_claim(claim: &wastewise::types::NftClaim) {
    println!(
        "claim #{} pool {} {} requested {}",
        claim.id, claim.nft_pool_id, claim.status, claim.requested_at
    );
    if let Some(confirmed) = &claim.confirmed_at {
        println!("    confirmed {confirmed}");
    }
    if let Some(failed) = &claim.failed_at {
        let reason = claim.failure_reason.as_deref().unwrap_or("unknown");
        println!("    failed {failed}: {reason}");
    }
    if let Some(hash) = &claim.transaction_hash {
        println!("    tx {}", nft_api::format_tx_hash(hash, 8));
    }
}
