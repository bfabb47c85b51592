//! GraphQL client for the leaderboard endpoint.

use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::api::http_client;

const LEADERBOARD_QUERY: &str = r#"
  query GetLeaderboard($input: GetLeaderboardInput) {
    leaderboard(input: $input) {
      entries {
        rank
        walletAddress
        score
        lastUpdated
      }
      total
      timestamp
    }
  }
"#;

const USER_RANKING_QUERY: &str = r#"
  query GetUserRanking($walletAddress: String!) {
    userRanking(walletAddress: $walletAddress) {
      walletAddress
      score
      rank
      timestamp
    }
  }
"#;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub wallet_address: String,
    pub score: u64,
    pub last_updated: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub entries: Vec<LeaderboardEntry>,
    pub total: u64,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserRanking {
    pub wallet_address: String,
    pub score: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GetLeaderboardInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse<T> {
    #[serde(default = "Option::default")]
    data: Option<T>,
    #[serde(default)]
    errors: Option<Vec<GraphqlError>>,
}

fn unwrap_graphql<T>(response: GraphqlResponse<T>) -> Result<T> {
    if let Some(errors) = response.errors {
        if let Some(first) = errors.first() {
            return Err(anyhow!(first.message.clone()));
        }
    }
    response
        .data
        .ok_or_else(|| anyhow!("No data returned from GraphQL query"))
}

#[derive(Clone, Debug)]
pub struct LeaderboardClient {
    graphql_url: String,
    timeout: Duration,
}

impl LeaderboardClient {
    pub fn new(graphql_url: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            graphql_url: graphql_url.into(),
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        let res = http_client()
            .post(&self.graphql_url)
            .json(&serde_json::json!({ "query": query, "variables": variables }))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| anyhow!("GraphQL request failed: {e}"))?;

        let response: GraphqlResponse<T> = res
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse GraphQL response: {e}"))?;
        unwrap_graphql(response)
    }

    pub async fn leaderboard(
        &self,
        input: Option<GetLeaderboardInput>,
    ) -> Result<LeaderboardResponse> {
        #[derive(Deserialize)]
        struct Data {
            leaderboard: LeaderboardResponse,
        }
        log::info!("[leaderboard] Fetching leaderboard");
        let data: Data = self
            .execute(
                LEADERBOARD_QUERY,
                serde_json::json!({ "input": input.unwrap_or_default() }),
            )
            .await?;
        Ok(data.leaderboard)
    }

    pub async fn user_ranking(&self, wallet_address: &str) -> Result<UserRanking> {
        #[derive(Deserialize)]
        struct Data {
            #[serde(rename = "userRanking")]
            user_ranking: UserRanking,
        }
        log::info!("[leaderboard] Fetching ranking for {wallet_address}");
        let data: Data = self
            .execute(
                USER_RANKING_QUERY,
                serde_json::json!({ "walletAddress": wallet_address }),
            )
            .await?;
        Ok(data.user_ranking)
    }
}
