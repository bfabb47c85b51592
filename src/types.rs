use serde::{Deserialize, Serialize};
use std::fmt;

/// A single metadata attribute attached to a pool NFT.
/// Wire name is `trait_type` (ERC-721 metadata convention), so no camelCase here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NftAttribute {
    pub trait_type: String,
    pub value: serde_json::Value,
}

/// Administrator-defined NFT template with eligibility thresholds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NftData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub rarity: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub required_score: u64,
    pub required_classifications: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<NftAttribute>>,
}

/// Pool entry annotated per wallet with claimability, as computed server-side.
/// The client never re-derives `missing_requirements`; they are backend-owned strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EligibleNft {
    #[serde(flatten)]
    pub nft: NftData,
    pub can_claim: bool,
    pub missing_requirements: Vec<String>,
}

/// Lifecycle status of a claim record. Terminal once Confirmed, Failed, or Cancelled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    Pending,
    Confirmed,
    Failed,
    Cancelled,
}

impl ClaimStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ClaimStatus::Pending)
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimStatus::Pending => write!(f, "Pending"),
            ClaimStatus::Confirmed => write!(f, "Confirmed"),
            ClaimStatus::Failed => write!(f, "Failed"),
            ClaimStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// A wallet's attempt to obtain a specific pool entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NftClaim {
    pub id: u64,
    pub nft_pool_id: u64,
    pub wallet_address: String,
    pub status: ClaimStatus,
    pub requested_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
}

/// Materialized result of a confirmed claim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OwnedNft {
    pub claim_id: u64,
    pub nft: NftData,
    pub claimed_at: String,
    pub transaction_hash: String,
}

/// Availability of a pool entry on the backend side.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoolEntryStatus {
    Available,
    Claimed,
    Reserved,
}

impl fmt::Display for PoolEntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolEntryStatus::Available => write!(f, "Available"),
            PoolEntryStatus::Claimed => write!(f, "Claimed"),
            PoolEntryStatus::Reserved => write!(f, "Reserved"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlockchainInfo {
    pub token_id: u64,
    pub transaction_hash: String,
    pub metadata_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
}

/// Result of an admin mint-to-pool operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MintNftResponse {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub token_id: u64,
    pub contract_address: String,
    pub metadata_uri: String,
    pub status: PoolEntryStatus,
    pub blockchain_info: BlockchainInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NftPoolOverview {
    pub total_nfts: u64,
    pub available_nfts: u64,
    pub claimed_nfts: u64,
    pub pending_claims: u64,
    pub claim_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RarityCount {
    pub rarity: u8,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

/// Admin view of pool health.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NftPoolStats {
    pub overview: NftPoolOverview,
    pub by_rarity: Vec<RarityCount>,
    pub by_category: Vec<CategoryCount>,
}

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddNftToPoolRequest {
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub rarity: u8,
    pub required_score: u64,
    pub required_classifications: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<NftAttribute>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReserveNftRequest {
    pub wallet_address: String,
    pub nft_pool_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClaimNftRequest {
    pub wallet_address: String,
    pub nft_pool_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BatchAddNftRequest {
    pub nfts: Vec<AddNftToPoolRequest>,
}

/// `POST /nft/reserve` response. The hold is backend-enforced (30 minutes).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReserveNftResponse {
    pub message: String,
    pub reserved_until: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransferResult {
    pub transaction_hash: String,
    pub block_number: u64,
}

/// `POST /nft/claim` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClaimNftResponse {
    pub claim_id: u64,
    pub transfer_result: TransferResult,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NftReward {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub rarity: u8,
}

/// Verdict returned by the AI classification endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub id: u64,
    pub image_url: String,
    pub expected_category: String,
    pub ai_detected_category: String,
    pub is_correct: bool,
    pub score: u64,
    pub confidence: f64,
    pub ai_description: String,
    pub characteristics: Vec<String>,
    pub material_type: String,
    pub disposal_instructions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_nfts: Option<Vec<NftReward>>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationStats {
    pub total_classifications: u64,
    pub correct_classifications: u64,
    pub total_score: u64,
    pub accuracy: f64,
    pub streak_count: u64,
}

// ---------------------------------------------------------------------------
// Achievements
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: u64,
    pub code: String,
    pub name: String,
    pub description: String,
    pub score_reward: u64,
    pub icon_url: String,
    pub category: String,
    pub tier: String,
    /// Backend-defined requirement blob; shape varies per achievement.
    pub requirements: serde_json::Value,
    pub progress: f64,
    pub is_completed: bool,
    pub is_claimed: bool,
    pub can_claim: bool,
}

// ---------------------------------------------------------------------------
// Display label tables
// ---------------------------------------------------------------------------

pub const NFT_RARITY_LABELS: [(u8, &str); 5] = [
    (1, "Common"),
    (2, "Rare"),
    (3, "Epic"),
    (4, "Legendary"),
    (5, "Mythic"),
];

pub const NFT_CATEGORY_LABELS: [(&str, &str); 4] = [
    ("achievement", "Achievement"),
    ("milestone", "Milestone"),
    ("special", "Special Reward"),
    ("general", "General"),
];
