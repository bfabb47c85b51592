//! WasteWise - terminal client for the waste-sorting NFT reward platform
//!
//! This library wraps the WasteWise backend (REST + GraphQL) in typed service
//! layers and explicit application-state stores:
//!
//! - services translate between client types and backend endpoints, and own
//!   local validation plus display formatting;
//! - stores cache the backend-derived collections and drive the claim
//!   lifecycle (fetch, reserve, claim, resync);
//! - consistency is pull-based: successful mutations refetch the affected
//!   read collections, and the server view always wins.

// Configuration (CLI args > env vars > defaults)
pub mod config;

// Domain data model and wire types
pub mod types;

// Shared REST plumbing (HTTP client + response envelope)
pub mod api;

// NFT pool service layer: endpoints, validation, display formatting
pub mod nft_api;

// Claim-lifecycle state store
pub mod nft_store;

// Achievement service + filtered store
pub mod achievement;

// AI waste-classification submission flow
pub mod classification;

// GraphQL leaderboard client
pub mod leaderboard;

// Wallet session (connected account address)
pub mod wallet;

// Re-export commonly used types
pub use achievement::{AchievementApiClient, AchievementFilter, AchievementStore};
pub use api::ApiClient;
pub use classification::{ClassificationApiClient, ClassificationStore};
pub use config::Config;
pub use leaderboard::{GetLeaderboardInput, LeaderboardClient};
pub use nft_api::{NftApiClient, NftBackend, NftDraft};
pub use nft_store::NftStore;
pub use types::{ClaimStatus, EligibleNft, NftClaim, OwnedNft};
pub use wallet::WalletSession;
