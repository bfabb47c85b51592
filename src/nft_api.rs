//! Typed service layer for the NFT pool endpoints, plus the pure validation
//! and display-formatting helpers the admin and collection commands share.

use anyhow::Result;
use async_trait::async_trait;
use rand::Rng;

use crate::api::ApiClient;
use crate::types::{
    AddNftToPoolRequest, BatchAddNftRequest, ClaimNftRequest, ClaimNftResponse, EligibleNft,
    MintNftResponse, NftAttribute, NftClaim, NftPoolStats, OwnedNft, ReserveNftRequest,
    ReserveNftResponse, NFT_CATEGORY_LABELS, NFT_RARITY_LABELS,
};

/// Backend seam for everything under `/nft`. Stores talk to this trait so the
/// claim lifecycle can be exercised without a live backend.
#[async_trait]
pub trait NftBackend: Send + Sync {
    async fn eligible_nfts(&self, wallet_address: &str) -> Result<Vec<EligibleNft>>;
    async fn reserve_nft(&self, req: &ReserveNftRequest) -> Result<ReserveNftResponse>;
    async fn claim_nft(&self, req: &ClaimNftRequest) -> Result<ClaimNftResponse>;
    async fn nft_claims(&self, wallet_address: &str) -> Result<Vec<NftClaim>>;
    async fn claim_status(&self, claim_id: u64) -> Result<NftClaim>;
    async fn owned_nfts(&self, wallet_address: &str) -> Result<Vec<OwnedNft>>;
    async fn mint_nft_to_pool(&self, req: &AddNftToPoolRequest) -> Result<MintNftResponse>;
    async fn batch_mint_nfts(&self, req: &BatchAddNftRequest) -> Result<Vec<MintNftResponse>>;
    async fn pool_stats(&self) -> Result<NftPoolStats>;
}

/// HTTP implementation over the REST backend.
#[derive(Clone, Debug)]
pub struct NftApiClient {
    api: ApiClient,
}

impl NftApiClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl NftBackend for NftApiClient {
    async fn eligible_nfts(&self, wallet_address: &str) -> Result<Vec<EligibleNft>> {
        log::info!("[nft_api] Fetching eligible NFTs for {wallet_address}");
        self.api
            .get("/nft/eligible", &[("walletAddress", wallet_address.to_string())])
            .await
    }

    async fn reserve_nft(&self, req: &ReserveNftRequest) -> Result<ReserveNftResponse> {
        log::info!(
            "[nft_api] Reserving pool entry {} for {}",
            req.nft_pool_id,
            req.wallet_address
        );
        self.api.post("/nft/reserve", req).await
    }

    async fn claim_nft(&self, req: &ClaimNftRequest) -> Result<ClaimNftResponse> {
        log::info!(
            "[nft_api] Claiming pool entry {} for {}",
            req.nft_pool_id,
            req.wallet_address
        );
        self.api.post("/nft/claim", req).await
    }

    async fn nft_claims(&self, wallet_address: &str) -> Result<Vec<NftClaim>> {
        self.api
            .get("/nft/claims", &[("walletAddress", wallet_address.to_string())])
            .await
    }

    async fn claim_status(&self, claim_id: u64) -> Result<NftClaim> {
        self.api.get(&format!("/nft/claims/{claim_id}"), &[]).await
    }

    async fn owned_nfts(&self, wallet_address: &str) -> Result<Vec<OwnedNft>> {
        self.api
            .get("/nft/owned", &[("walletAddress", wallet_address.to_string())])
            .await
    }

    async fn mint_nft_to_pool(&self, req: &AddNftToPoolRequest) -> Result<MintNftResponse> {
        log::info!("[nft_api] Minting '{}' into the pool", req.name);
        self.api.post("/nft/admin/pool", req).await
    }

    async fn batch_mint_nfts(&self, req: &BatchAddNftRequest) -> Result<Vec<MintNftResponse>> {
        log::info!("[nft_api] Batch minting {} NFTs", req.nfts.len());
        self.api.post("/nft/admin/pool/batch", req).await
    }

    async fn pool_stats(&self) -> Result<NftPoolStats> {
        self.api.get("/nft/admin/stats", &[]).await
    }
}

// ---------------------------------------------------------------------------
// Local validation (pure, synchronous, pre-network)
// ---------------------------------------------------------------------------

/// Partial NFT-creation input, as collected from admin flags before minting.
/// Thresholds are signed so out-of-range input survives until validation.
#[derive(Debug, Clone, Default)]
pub struct NftDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub rarity: Option<i64>,
    pub required_score: Option<i64>,
    pub required_classifications: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NftValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Validate admin NFT-creation input. Error ordering is stable: name,
/// description, image URL, rarity, score threshold, classification threshold.
pub fn validate_nft_data(data: &NftDraft) -> NftValidationResult {
    let mut errors = Vec::new();

    match &data.name {
        Some(name) if !name.trim().is_empty() => {
            if name.chars().count() > 100 {
                errors.push("NFT name must not exceed 100 characters".to_string());
            }
        }
        _ => errors.push("NFT name must not be empty".to_string()),
    }

    match &data.description {
        Some(desc) if !desc.trim().is_empty() => {
            if desc.chars().count() > 500 {
                errors.push("NFT description must not exceed 500 characters".to_string());
            }
        }
        _ => errors.push("NFT description must not be empty".to_string()),
    }

    match &data.image_url {
        Some(url) if !url.trim().is_empty() => {
            if !is_valid_url(url) {
                errors.push("Image URL is not a valid URL".to_string());
            }
        }
        _ => errors.push("Image URL must not be empty".to_string()),
    }

    if let Some(rarity) = data.rarity {
        if !(1..=5).contains(&rarity) {
            errors.push("Rarity must be an integer between 1 and 5".to_string());
        }
    }

    if let Some(score) = data.required_score {
        if score < 0 {
            errors.push("Required score must be a non-negative integer".to_string());
        }
    }

    if let Some(count) = data.required_classifications {
        if count < 0 {
            errors.push("Required classifications must be a non-negative integer".to_string());
        }
    }

    NftValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

fn is_valid_url(s: &str) -> bool {
    url::Url::parse(s).is_ok()
}

// ---------------------------------------------------------------------------
// Display formatting (pure, deterministic for any input)
// ---------------------------------------------------------------------------

/// Rarity label with a fixed fallback for out-of-range values.
pub fn format_rarity(rarity: u8) -> &'static str {
    NFT_RARITY_LABELS
        .iter()
        .find(|(r, _)| *r == rarity)
        .map(|(_, label)| *label)
        .unwrap_or("Unknown")
}

/// Category label; unknown categories pass through unchanged.
pub fn format_category(category: &str) -> String {
    NFT_CATEGORY_LABELS
        .iter()
        .find(|(key, _)| *key == category)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| category.to_string())
}

/// Terminal color name per rarity tier; out-of-range falls back to the
/// common tier.
pub fn rarity_color(rarity: u8) -> &'static str {
    match rarity {
        2 => "green",
        3 => "blue",
        4 => "magenta",
        5 => "yellow",
        _ => "gray",
    }
}

/// Compact score display: "999", "1.5K", "2.0M".
pub fn format_score(score: u64) -> String {
    if score >= 1_000_000 {
        format!("{:.1}M", score as f64 / 1_000_000.0)
    } else if score >= 1_000 {
        format!("{:.1}K", score as f64 / 1_000.0)
    } else {
        score.to_string()
    }
}

/// Truncate a transaction hash to `first{length}...last{length}`.
/// Short hashes pass through, empty maps to empty.
pub fn format_tx_hash(hash: &str, length: usize) -> String {
    if hash.is_empty() {
        return String::new();
    }
    let chars: Vec<char> = hash.chars().collect();
    if chars.len() <= length * 2 {
        return hash.to_string();
    }
    let head: String = chars[..length].iter().collect();
    let tail: String = chars[chars.len() - length..].iter().collect();
    format!("{head}...{tail}")
}

/// Block-explorer link for a transaction hash.
pub fn etherscan_link(tx_hash: &str, network: &str) -> String {
    let base = if network == "mainnet" {
        "https://etherscan.io".to_string()
    } else {
        format!("https://{network}.etherscan.io")
    };
    format!("{base}/tx/{tx_hash}")
}

/// Metadata attributes for a new pool entry: rarity tier, numeric rarity,
/// category, mint date, then any custom attributes.
pub fn build_nft_attributes(
    category: Option<&str>,
    rarity: u8,
    custom: &[NftAttribute],
) -> Vec<NftAttribute> {
    let mut attributes = vec![
        NftAttribute {
            trait_type: "Rarity".to_string(),
            value: serde_json::Value::from(format_rarity(rarity)),
        },
        NftAttribute {
            trait_type: "Rarity Level".to_string(),
            value: serde_json::Value::from(rarity),
        },
    ];

    if let Some(category) = category {
        attributes.push(NftAttribute {
            trait_type: "Category".to_string(),
            value: serde_json::Value::from(format_category(category)),
        });
    }

    attributes.push(NftAttribute {
        trait_type: "Created At".to_string(),
        value: serde_json::Value::from(chrono::Utc::now().format("%Y-%m-%d").to_string()),
    });

    attributes.extend_from_slice(custom);
    attributes
}

/// Local temporary identifier for not-yet-persisted entries.
pub fn generate_temp_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| {
            let n = rng.gen_range(0..36u32);
            char::from_digit(n, 36).unwrap_or('0')
        })
        .collect();
    format!("temp_{}_{}", chrono::Utc::now().timestamp_millis(), suffix)
}
