//! Client-side cache of the NFT collections plus the claim-lifecycle actions.
//!
//! The store is an explicit state struct; actions borrow it mutably and take
//! the backend by reference, so state transitions stay observable and testable.
//! Consistency is pull-based: every successful mutation refetches at least one
//! read collection, and the refetched server view is authoritative over any
//! optimistic local update.

use anyhow::Result;
use chrono::Utc;

use crate::nft_api::NftBackend;
use crate::types::{
    AddNftToPoolRequest, ClaimNftRequest, ClaimNftResponse, ClaimStatus, EligibleNft,
    MintNftResponse, NftClaim, NftPoolStats, OwnedNft, ReserveNftRequest, ReserveNftResponse,
};

const RECENT_MINTS_KEPT: usize = 10;

#[derive(Debug, Default)]
pub struct NftStore {
    pub eligible_nfts: Vec<EligibleNft>,
    pub owned_nfts: Vec<OwnedNft>,
    pub nft_claims: Vec<NftClaim>,
    pub pool_stats: Option<NftPoolStats>,
    pub recent_mints: Vec<MintNftResponse>,

    pub is_loading_eligible: bool,
    pub is_loading_owned: bool,
    pub is_loading_claims: bool,
    pub is_loading_stats: bool,
    /// Store-wide, not per-entry. Concurrent claims on different entries share
    /// this flag.
    pub is_claiming: bool,
    pub is_minting: bool,

    /// Last action error, verbatim from the backend where available.
    pub error: Option<String>,
}

impl NftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh the eligible collection. On failure the last known good list is
    /// kept and the error is recorded; there is no automatic retry.
    pub async fn fetch_eligible_nfts(
        &mut self,
        api: &dyn NftBackend,
        wallet_address: &str,
    ) -> Result<()> {
        self.is_loading_eligible = true;
        self.error = None;
        match api.eligible_nfts(wallet_address).await {
            Ok(nfts) => {
                self.eligible_nfts = nfts;
                self.is_loading_eligible = false;
                Ok(())
            }
            Err(e) => {
                log::warn!("[nft_store] fetch_eligible_nfts failed: {e}");
                self.error = Some(e.to_string());
                self.is_loading_eligible = false;
                Err(e)
            }
        }
    }

    pub async fn fetch_owned_nfts(
        &mut self,
        api: &dyn NftBackend,
        wallet_address: &str,
    ) -> Result<()> {
        self.is_loading_owned = true;
        self.error = None;
        match api.owned_nfts(wallet_address).await {
            Ok(nfts) => {
                self.owned_nfts = nfts;
                self.is_loading_owned = false;
                Ok(())
            }
            Err(e) => {
                log::warn!("[nft_store] fetch_owned_nfts failed: {e}");
                self.error = Some(e.to_string());
                self.is_loading_owned = false;
                Err(e)
            }
        }
    }

    pub async fn fetch_nft_claims(
        &mut self,
        api: &dyn NftBackend,
        wallet_address: &str,
    ) -> Result<()> {
        self.is_loading_claims = true;
        self.error = None;
        match api.nft_claims(wallet_address).await {
            Ok(claims) => {
                self.nft_claims = claims;
                self.is_loading_claims = false;
                Ok(())
            }
            Err(e) => {
                log::warn!("[nft_store] fetch_nft_claims failed: {e}");
                self.error = Some(e.to_string());
                self.is_loading_claims = false;
                Err(e)
            }
        }
    }

    pub async fn fetch_pool_stats(&mut self, api: &dyn NftBackend) -> Result<()> {
        self.is_loading_stats = true;
        self.error = None;
        match api.pool_stats().await {
            Ok(stats) => {
                self.pool_stats = Some(stats);
                self.is_loading_stats = false;
                Ok(())
            }
            Err(e) => {
                log::warn!("[nft_store] fetch_pool_stats failed: {e}");
                self.error = Some(e.to_string());
                self.is_loading_stats = false;
                Err(e)
            }
        }
    }

    /// Place a 30-minute hold on a pool entry, then resync eligibility.
    pub async fn reserve_nft(
        &mut self,
        api: &dyn NftBackend,
        wallet_address: &str,
        nft_pool_id: u64,
    ) -> Result<ReserveNftResponse> {
        self.error = None;
        let req = ReserveNftRequest {
            wallet_address: wallet_address.to_string(),
            nft_pool_id,
        };
        match api.reserve_nft(&req).await {
            Ok(res) => {
                // Reservation changes entry availability server-side.
                let _ = self.fetch_eligible_nfts(api, wallet_address).await;
                Ok(res)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Claim a pool entry. On success a confirmed claim record is prepended
    /// locally (provisional) and the eligible and owned collections are
    /// refetched (authoritative). On failure the claim history is untouched
    /// and the backend message is recorded and propagated.
    pub async fn claim_nft(
        &mut self,
        api: &dyn NftBackend,
        wallet_address: &str,
        nft_pool_id: u64,
    ) -> Result<ClaimNftResponse> {
        self.is_claiming = true;
        self.error = None;
        let req = ClaimNftRequest {
            wallet_address: wallet_address.to_string(),
            nft_pool_id,
        };
        match api.claim_nft(&req).await {
            Ok(res) => {
                let now = Utc::now().to_rfc3339();
                self.nft_claims.insert(
                    0,
                    NftClaim {
                        id: res.claim_id,
                        nft_pool_id,
                        wallet_address: wallet_address.to_string(),
                        status: ClaimStatus::Confirmed,
                        requested_at: now.clone(),
                        confirmed_at: Some(now),
                        failed_at: None,
                        failure_reason: None,
                        transaction_hash: Some(res.transfer_result.transaction_hash.clone()),
                    },
                );
                self.is_claiming = false;

                // Resync with backend truth; refetch failures keep the
                // provisional local view.
                let _ = self.fetch_eligible_nfts(api, wallet_address).await;
                let _ = self.fetch_owned_nfts(api, wallet_address).await;
                Ok(res)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                self.is_claiming = false;
                Err(e)
            }
        }
    }

    /// Admin: mint a new entry into the pool and remember it locally.
    pub async fn mint_nft(
        &mut self,
        api: &dyn NftBackend,
        req: &AddNftToPoolRequest,
    ) -> Result<MintNftResponse> {
        self.is_minting = true;
        self.error = None;
        match api.mint_nft_to_pool(req).await {
            Ok(res) => {
                self.is_minting = false;
                self.add_recent_mint(res.clone());
                Ok(res)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                self.is_minting = false;
                Err(e)
            }
        }
    }

    pub fn add_recent_mint(&mut self, mint: MintNftResponse) {
        self.recent_mints.insert(0, mint);
        self.recent_mints.truncate(RECENT_MINTS_KEPT);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        BatchAddNftRequest, BlockchainInfo, NftData, NftPoolOverview, PoolEntryStatus,
        TransferResult,
    };
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn pool_entry(id: u64, can_claim: bool) -> EligibleNft {
        EligibleNft {
            nft: NftData {
                id: Some(id),
                name: format!("Entry {id}"),
                description: "test".to_string(),
                image_url: "https://img.example/e.png".to_string(),
                rarity: 1,
                category: None,
                required_score: 100,
                required_classifications: 0,
                attributes: None,
            },
            can_claim,
            missing_requirements: if can_claim {
                vec![]
            } else {
                vec!["Score 100 required, current score is 50".to_string()]
            },
        }
    }

    /// Scriptable in-memory backend recording which calls were made.
    #[derive(Default)]
    struct MockBackend {
        eligible: Vec<EligibleNft>,
        owned: Vec<OwnedNft>,
        claims: Vec<NftClaim>,
        fail_eligible: bool,
        fail_claim: Option<String>,
        calls: Mutex<Vec<&'static str>>,
    }

    impl MockBackend {
        fn record(&self, call: &'static str) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NftBackend for MockBackend {
        async fn eligible_nfts(&self, _wallet: &str) -> Result<Vec<EligibleNft>> {
            self.record("eligible");
            if self.fail_eligible {
                return Err(anyhow!("backend unreachable"));
            }
            Ok(self.eligible.clone())
        }

        async fn reserve_nft(&self, _req: &ReserveNftRequest) -> Result<ReserveNftResponse> {
            self.record("reserve");
            Ok(ReserveNftResponse {
                message: "reserved".to_string(),
                reserved_until: "2026-01-01T00:30:00Z".to_string(),
            })
        }

        async fn claim_nft(&self, req: &ClaimNftRequest) -> Result<ClaimNftResponse> {
            self.record("claim");
            if let Some(msg) = &self.fail_claim {
                return Err(anyhow!(msg.clone()));
            }
            Ok(ClaimNftResponse {
                claim_id: 42,
                transfer_result: TransferResult {
                    transaction_hash: format!("0xhash{}", req.nft_pool_id),
                    block_number: 123,
                },
                message: "claimed".to_string(),
            })
        }

        async fn nft_claims(&self, _wallet: &str) -> Result<Vec<NftClaim>> {
            self.record("claims");
            Ok(self.claims.clone())
        }

        async fn claim_status(&self, claim_id: u64) -> Result<NftClaim> {
            self.record("claim_status");
            self.claims
                .iter()
                .find(|c| c.id == claim_id)
                .cloned()
                .ok_or_else(|| anyhow!("claim {claim_id} not found"))
        }

        async fn owned_nfts(&self, _wallet: &str) -> Result<Vec<OwnedNft>> {
            self.record("owned");
            Ok(self.owned.clone())
        }

        async fn mint_nft_to_pool(&self, req: &AddNftToPoolRequest) -> Result<MintNftResponse> {
            self.record("mint");
            Ok(MintNftResponse {
                id: 1,
                name: req.name.clone(),
                description: req.description.clone(),
                token_id: 1,
                contract_address: "0xcontract".to_string(),
                metadata_uri: "ipfs://meta".to_string(),
                status: PoolEntryStatus::Available,
                blockchain_info: BlockchainInfo {
                    token_id: 1,
                    transaction_hash: "0xmint".to_string(),
                    metadata_uri: "ipfs://meta".to_string(),
                    contract_address: None,
                    block_number: None,
                },
            })
        }

        async fn batch_mint_nfts(&self, req: &BatchAddNftRequest) -> Result<Vec<MintNftResponse>> {
            self.record("batch_mint");
            let mut out = Vec::new();
            for nft in &req.nfts {
                out.push(self.mint_nft_to_pool(nft).await?);
            }
            Ok(out)
        }

        async fn pool_stats(&self) -> Result<NftPoolStats> {
            self.record("stats");
            Ok(NftPoolStats {
                overview: NftPoolOverview {
                    total_nfts: 10,
                    available_nfts: 8,
                    claimed_nfts: 2,
                    pending_claims: 0,
                    claim_rate: 0.2,
                },
                by_rarity: vec![],
                by_category: vec![],
            })
        }
    }

    const WALLET: &str = "0x00000000000000000000000000000000000000aa";

    #[tokio::test]
    async fn successful_claim_prepends_confirmed_record_and_refetches() {
        let backend = MockBackend {
            eligible: vec![pool_entry(7, true)],
            ..Default::default()
        };
        let mut store = NftStore::new();

        let res = store.claim_nft(&backend, WALLET, 7).await.unwrap();
        assert_eq!(res.claim_id, 42);

        assert!(!store.is_claiming);
        assert!(store.error.is_none());
        assert_eq!(store.nft_claims.len(), 1);
        let claim = &store.nft_claims[0];
        assert_eq!(claim.status, ClaimStatus::Confirmed);
        assert_eq!(claim.nft_pool_id, 7);
        assert_eq!(claim.transaction_hash.as_deref(), Some("0xhash7"));
        assert!(claim.confirmed_at.is_some());

        // Both read collections resynced after the mutation.
        assert_eq!(backend.calls(), vec!["claim", "eligible", "owned"]);
    }

    #[tokio::test]
    async fn failed_claim_records_backend_message_and_leaves_claims_untouched() {
        let backend = MockBackend {
            fail_claim: Some("Wallet not eligible for this NFT".to_string()),
            ..Default::default()
        };
        let mut store = NftStore::new();
        store.nft_claims = vec![NftClaim {
            id: 1,
            nft_pool_id: 3,
            wallet_address: WALLET.to_string(),
            status: ClaimStatus::Confirmed,
            requested_at: "2026-01-01T00:00:00Z".to_string(),
            confirmed_at: Some("2026-01-01T00:01:00Z".to_string()),
            failed_at: None,
            failure_reason: None,
            transaction_hash: Some("0xold".to_string()),
        }];
        let before = store.nft_claims.clone();

        let err = store.claim_nft(&backend, WALLET, 7).await.unwrap_err();
        assert_eq!(err.to_string(), "Wallet not eligible for this NFT");

        assert!(!store.is_claiming);
        assert_eq!(store.error.as_deref(), Some("Wallet not eligible for this NFT"));
        assert_eq!(store.nft_claims, before);
        // No refetch after a failed mutation.
        assert_eq!(backend.calls(), vec!["claim"]);
    }

    #[tokio::test]
    async fn fetch_failure_keeps_last_known_good_collection() {
        let backend = MockBackend {
            eligible: vec![pool_entry(1, false)],
            ..Default::default()
        };
        let mut store = NftStore::new();
        store.fetch_eligible_nfts(&backend, WALLET).await.unwrap();
        assert_eq!(store.eligible_nfts.len(), 1);
        assert!(!store.eligible_nfts[0].can_claim);
        assert!(!store.eligible_nfts[0].missing_requirements.is_empty());

        let failing = MockBackend {
            fail_eligible: true,
            ..Default::default()
        };
        assert!(store.fetch_eligible_nfts(&failing, WALLET).await.is_err());
        assert!(!store.is_loading_eligible);
        assert_eq!(store.error.as_deref(), Some("backend unreachable"));
        // Last known good survives the failed refresh.
        assert_eq!(store.eligible_nfts.len(), 1);
    }

    #[tokio::test]
    async fn reserve_resyncs_eligibility() {
        let backend = MockBackend::default();
        let mut store = NftStore::new();
        let res = store.reserve_nft(&backend, WALLET, 5).await.unwrap();
        assert_eq!(res.reserved_until, "2026-01-01T00:30:00Z");
        assert_eq!(backend.calls(), vec!["reserve", "eligible"]);
    }

    #[tokio::test]
    async fn mint_records_recent_and_caps_history() {
        let backend = MockBackend::default();
        let mut store = NftStore::new();
        let req = AddNftToPoolRequest {
            name: "Sorter".to_string(),
            description: "d".to_string(),
            image_url: "https://img.example/s.png".to_string(),
            rarity: 2,
            required_score: 0,
            required_classifications: 0,
            category: None,
            attributes: None,
        };

        for _ in 0..12 {
            store.mint_nft(&backend, &req).await.unwrap();
        }
        assert!(!store.is_minting);
        assert_eq!(store.recent_mints.len(), 10);
    }

    #[tokio::test]
    async fn clear_error_and_reset() {
        let backend = MockBackend {
            fail_claim: Some("duplicate claim".to_string()),
            ..Default::default()
        };
        let mut store = NftStore::new();
        let _ = store.claim_nft(&backend, WALLET, 7).await;
        assert!(store.error.is_some());

        store.clear_error();
        assert!(store.error.is_none());

        store.add_recent_mint(MintNftResponse {
            id: 9,
            name: "n".to_string(),
            description: "d".to_string(),
            token_id: 9,
            contract_address: "0xc".to_string(),
            metadata_uri: "ipfs://m".to_string(),
            status: PoolEntryStatus::Available,
            blockchain_info: BlockchainInfo {
                token_id: 9,
                transaction_hash: "0xt".to_string(),
                metadata_uri: "ipfs://m".to_string(),
                contract_address: None,
                block_number: None,
            },
        });
        store.reset();
        assert!(store.recent_mints.is_empty());
        assert!(store.nft_claims.is_empty());
        assert!(!store.is_claiming);
    }
}
