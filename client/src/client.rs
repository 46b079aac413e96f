use minefield_common::{
    models::ScoreRecord,
    protocol::{LeaderboardQuery, SortOrder, SubmitResponse},
};
use reqwest::Client;
use url::Url;

use crate::Result;

/// HTTP client for the leaderboard server API
#[derive(Clone)]
pub struct LeaderboardClient {
    client: Client,
    base_url: Url,
}

impl LeaderboardClient {
    /// Create a new client connecting to the specified server URL
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        let client = Client::new();

        Ok(Self { client, base_url })
    }

    /// Submit a finished game's score record
    pub async fn submit(&self, record: &ScoreRecord) -> Result<()> {
        let submit_url = self.base_url.join("/scores")?;

        let response = self.client.post(submit_url).json(record).send().await?;

        if !response.status().is_success() {
            return Err(format!("Failed to submit score: {}", response.status()).into());
        }

        let submit_response: SubmitResponse = response.json().await?;
        if !submit_response.success {
            return Err("Leaderboard rejected the score".into());
        }

        Ok(())
    }

    /// Fetch the top leaderboard entries for the given query
    pub async fn top_scores(&self, query: &LeaderboardQuery) -> Result<Vec<ScoreRecord>> {
        let mut scores_url = self.base_url.join("/scores")?;
        {
            let mut pairs = scores_url.query_pairs_mut();
            pairs.append_pair("limit", &query.limit.to_string());
            if let Some(difficulty) = query.difficulty {
                pairs.append_pair("difficulty", difficulty.label());
            }
            if query.order == SortOrder::Time {
                pairs.append_pair("order", "time");
            }
        }

        let response = self.client.get(scores_url).send().await?;

        if !response.status().is_success() {
            return Err(format!("Failed to fetch leaderboard: {}", response.status()).into());
        }

        Ok(response.json().await?)
    }
}
