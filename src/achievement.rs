//! Achievement progress: backend seam, HTTP client, and the filtered
//! client-side cache.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::json;

use crate::api::ApiClient;
use crate::types::Achievement;

#[async_trait]
pub trait AchievementBackend: Send + Sync {
    async fn my_achievements(&self, wallet_address: &str) -> Result<Vec<Achievement>>;
    async fn claim_achievement(&self, achievement_id: u64, wallet_address: &str) -> Result<()>;
}

#[derive(Clone, Debug)]
pub struct AchievementApiClient {
    api: ApiClient,
}

impl AchievementApiClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl AchievementBackend for AchievementApiClient {
    async fn my_achievements(&self, wallet_address: &str) -> Result<Vec<Achievement>> {
        log::info!("[achievement] Fetching achievements for {wallet_address}");
        self.api
            .get(
                "/achievement/my-achievements",
                &[("walletAddress", wallet_address.to_string())],
            )
            .await
    }

    async fn claim_achievement(&self, achievement_id: u64, wallet_address: &str) -> Result<()> {
        log::info!("[achievement] Claiming achievement {achievement_id} for {wallet_address}");
        self.api
            .post_unit(
                "/achievement/claim",
                &json!({
                    "achievementId": achievement_id,
                    "walletAddress": wallet_address,
                }),
            )
            .await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AchievementFilter {
    #[default]
    All,
    Completed,
    Claimable,
    Claimed,
}

impl std::str::FromStr for AchievementFilter {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "all" => Ok(AchievementFilter::All),
            "completed" => Ok(AchievementFilter::Completed),
            "claimable" => Ok(AchievementFilter::Claimable),
            "claimed" => Ok(AchievementFilter::Claimed),
            _ => Err(anyhow!(
                "Invalid filter '{s}'. Valid options: all, completed, claimable, claimed"
            )),
        }
    }
}

impl std::fmt::Display for AchievementFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AchievementFilter::All => write!(f, "all"),
            AchievementFilter::Completed => write!(f, "completed"),
            AchievementFilter::Claimable => write!(f, "claimable"),
            AchievementFilter::Claimed => write!(f, "claimed"),
        }
    }
}

#[derive(Debug, Default)]
pub struct AchievementStore {
    pub achievements: Vec<Achievement>,
    pub is_loading: bool,
    pub filter: AchievementFilter,
}

impl AchievementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load_achievements(
        &mut self,
        api: &dyn AchievementBackend,
        wallet_address: &str,
    ) -> Result<()> {
        self.is_loading = true;
        match api.my_achievements(wallet_address).await {
            Ok(achievements) => {
                self.achievements = achievements;
                self.is_loading = false;
                Ok(())
            }
            Err(e) => {
                log::warn!("[achievement] load failed: {e}");
                self.is_loading = false;
                Err(e)
            }
        }
    }

    /// Claim a completed achievement, mark it locally, then reload for the
    /// backend's view (score rewards may change other rows).
    pub async fn claim_achievement(
        &mut self,
        api: &dyn AchievementBackend,
        achievement_id: u64,
        wallet_address: &str,
    ) -> Result<()> {
        api.claim_achievement(achievement_id, wallet_address).await?;

        for achievement in &mut self.achievements {
            if achievement.id == achievement_id {
                achievement.is_claimed = true;
            }
        }

        self.load_achievements(api, wallet_address).await
    }

    pub fn set_filter(&mut self, filter: AchievementFilter) {
        self.filter = filter;
    }

    pub fn filtered_achievements(&self) -> Vec<&Achievement> {
        self.achievements
            .iter()
            .filter(|a| match self.filter {
                AchievementFilter::All => true,
                AchievementFilter::Completed => a.is_completed,
                AchievementFilter::Claimable => a.can_claim && !a.is_claimed,
                AchievementFilter::Claimed => a.is_claimed,
            })
            .collect()
    }

    /// Completed-over-total as a whole percentage; 0 for an empty list.
    pub fn completion_rate(&self) -> u32 {
        if self.achievements.is_empty() {
            return 0;
        }
        let completed = self.achievements.iter().filter(|a| a.is_completed).count();
        ((completed as f64 / self.achievements.len() as f64) * 100.0).round() as u32
    }
}
