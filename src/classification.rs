//! Waste-classification submission flow: an uploaded image URL plus the
//! user-chosen category go to the AI endpoint, and the verdict, history, and
//! running stats are cached here.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::json;

use crate::api::ApiClient;
use crate::types::{ClassificationResult, ClassificationStats};

const HISTORY_PAGE_SIZE: u32 = 20;

#[async_trait]
pub trait ClassificationBackend: Send + Sync {
    async fn submit(
        &self,
        wallet_address: &str,
        image_url: &str,
        expected_category: &str,
    ) -> Result<ClassificationResult>;
    async fn history(&self, wallet_address: &str, limit: u32) -> Result<Vec<ClassificationResult>>;
    async fn stats(&self, wallet_address: &str) -> Result<ClassificationStats>;
}

#[derive(Clone, Debug)]
pub struct ClassificationApiClient {
    api: ApiClient,
}

impl ClassificationApiClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ClassificationBackend for ClassificationApiClient {
    async fn submit(
        &self,
        wallet_address: &str,
        image_url: &str,
        expected_category: &str,
    ) -> Result<ClassificationResult> {
        log::info!("[classification] Submitting {expected_category} image for {wallet_address}");
        self.api
            .post(
                "/classification",
                &json!({
                    "imageUrl": image_url,
                    "expectedCategory": expected_category,
                    "walletAddress": wallet_address,
                }),
            )
            .await
    }

    async fn history(&self, wallet_address: &str, limit: u32) -> Result<Vec<ClassificationResult>> {
        self.api
            .get(
                "/classification/history",
                &[
                    ("walletAddress", wallet_address.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await
    }

    async fn stats(&self, wallet_address: &str) -> Result<ClassificationStats> {
        self.api
            .get(
                "/classification/stats",
                &[("walletAddress", wallet_address.to_string())],
            )
            .await
    }
}

/// In-flight submission state.
#[derive(Debug, Default)]
pub struct CurrentClassification {
    pub image_url: Option<String>,
    pub selected_category: Option<String>,
    pub is_submitting: bool,
    pub result: Option<ClassificationResult>,
}

#[derive(Debug, Default)]
pub struct ClassificationStore {
    pub current: CurrentClassification,
    pub history: Vec<ClassificationResult>,
    pub is_loading_history: bool,
    pub stats: Option<ClassificationStats>,
    pub is_loading_stats: bool,
}

impl ClassificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_image_url(&mut self, image_url: Option<String>) {
        self.current.image_url = image_url;
    }

    pub fn set_selected_category(&mut self, category: Option<String>) {
        self.current.selected_category = category;
    }

    /// Submit the current image and category. Fails locally before any
    /// network call when either is missing.
    pub async fn submit_classification(
        &mut self,
        api: &dyn ClassificationBackend,
        wallet_address: &str,
    ) -> Result<ClassificationResult> {
        let (image_url, category) = match (
            self.current.image_url.clone(),
            self.current.selected_category.clone(),
        ) {
            (Some(url), Some(cat)) => (url, cat),
            _ => return Err(anyhow!("Upload an image and select a category first")),
        };

        self.current.is_submitting = true;
        match api.submit(wallet_address, &image_url, &category).await {
            Ok(result) => {
                self.current.result = Some(result.clone());
                self.current.is_submitting = false;
                self.history.insert(0, result.clone());

                // Score and streak move with every submission.
                let _ = self.load_stats(api, wallet_address).await;
                Ok(result)
            }
            Err(e) => {
                self.current.is_submitting = false;
                Err(e)
            }
        }
    }

    pub async fn load_history(
        &mut self,
        api: &dyn ClassificationBackend,
        wallet_address: &str,
    ) -> Result<()> {
        self.is_loading_history = true;
        match api.history(wallet_address, HISTORY_PAGE_SIZE).await {
            Ok(history) => {
                self.history = history;
                self.is_loading_history = false;
                Ok(())
            }
            Err(e) => {
                log::warn!("[classification] load_history failed: {e}");
                self.is_loading_history = false;
                Err(e)
            }
        }
    }

    pub async fn load_stats(
        &mut self,
        api: &dyn ClassificationBackend,
        wallet_address: &str,
    ) -> Result<()> {
        self.is_loading_stats = true;
        match api.stats(wallet_address).await {
            Ok(stats) => {
                self.stats = Some(stats);
                self.is_loading_stats = false;
                Ok(())
            }
            Err(e) => {
                log::warn!("[classification] load_stats failed: {e}");
                self.is_loading_stats = false;
                Err(e)
            }
        }
    }

    pub fn reset_current(&mut self) {
        self.current = CurrentClassification::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn verdict(id: u64, correct: bool) -> ClassificationResult {
        ClassificationResult {
            id,
            image_url: "https://img.example/waste.png".to_string(),
            expected_category: "plastic".to_string(),
            ai_detected_category: if correct { "plastic" } else { "glass" }.to_string(),
            is_correct: correct,
            score: if correct { 10 } else { 0 },
            confidence: 0.93,
            ai_description: "A crushed PET bottle".to_string(),
            characteristics: vec!["transparent".to_string()],
            material_type: "PET".to_string(),
            disposal_instructions: "Rinse and recycle".to_string(),
            available_nfts: None,
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[derive(Default)]
    struct MockBackend {
        fail_submit: bool,
        stats_loads: AtomicUsize,
    }

    #[async_trait]
    impl ClassificationBackend for MockBackend {
        async fn submit(
            &self,
            _wallet: &str,
            _image_url: &str,
            _category: &str,
        ) -> Result<ClassificationResult> {
            if self.fail_submit {
                return Err(anyhow!("Classification service unavailable"));
            }
            Ok(verdict(1, true))
        }

        async fn history(&self, _wallet: &str, limit: u32) -> Result<Vec<ClassificationResult>> {
            assert_eq!(limit, HISTORY_PAGE_SIZE);
            Ok(vec![verdict(2, false)])
        }

        async fn stats(&self, _wallet: &str) -> Result<ClassificationStats> {
            self.stats_loads.fetch_add(1, Ordering::SeqCst);
            Ok(ClassificationStats {
                total_classifications: 3,
                correct_classifications: 2,
                total_score: 20,
                accuracy: 0.6667,
                streak_count: 1,
            })
        }
    }

    #[tokio::test]
    async fn submit_requires_image_and_category() {
        let backend = MockBackend::default();
        let mut store = ClassificationStore::new();

        let err = store
            .submit_classification(&backend, "0xaa")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Upload an image"));

        store.set_image_url(Some("https://img.example/waste.png".to_string()));
        assert!(store.submit_classification(&backend, "0xaa").await.is_err());
    }

    #[tokio::test]
    async fn successful_submit_caches_verdict_and_reloads_stats() {
        let backend = MockBackend::default();
        let mut store = ClassificationStore::new();
        store.set_image_url(Some("https://img.example/waste.png".to_string()));
        store.set_selected_category(Some("plastic".to_string()));

        let result = store.submit_classification(&backend, "0xaa").await.unwrap();
        assert!(result.is_correct);
        assert!(!store.current.is_submitting);
        assert_eq!(store.current.result.as_ref().unwrap().id, 1);
        assert_eq!(store.history.len(), 1);
        assert_eq!(backend.stats_loads.load(Ordering::SeqCst), 1);
        assert_eq!(store.stats.as_ref().unwrap().total_score, 20);
    }

    #[tokio::test]
    async fn failed_submit_clears_flag_and_keeps_history() {
        let backend = MockBackend {
            fail_submit: true,
            ..Default::default()
        };
        let mut store = ClassificationStore::new();
        store.set_image_url(Some("https://img.example/waste.png".to_string()));
        store.set_selected_category(Some("plastic".to_string()));

        let err = store
            .submit_classification(&backend, "0xaa")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Classification service unavailable");
        assert!(!store.current.is_submitting);
        assert!(store.current.result.is_none());
        assert!(store.history.is_empty());
    }

    #[tokio::test]
    async fn reset_current_clears_submission_state_only() {
        let backend = MockBackend::default();
        let mut store = ClassificationStore::new();
        store.set_image_url(Some("https://img.example/waste.png".to_string()));
        store.set_selected_category(Some("plastic".to_string()));
        store.submit_classification(&backend, "0xaa").await.unwrap();

        store.reset_current();
        assert!(store.current.image_url.is_none());
        assert!(store.current.result.is_none());
        assert_eq!(store.history.len(), 1);
    }

    #[tokio::test]
    async fn load_history_replaces_cache() {
        let backend = MockBackend::default();
        let mut store = ClassificationStore::new();
        store.load_history(&backend, "0xaa").await.unwrap();
        assert_eq!(store.history.len(), 1);
        assert!(!store.history[0].is_correct);
        assert!(!store.is_loading_history);
    }
}
