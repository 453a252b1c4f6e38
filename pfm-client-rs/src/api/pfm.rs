//! Asset aggregation and spending analysis endpoints.

use reqwest::Method;

use crate::client::PfmClient;
use crate::config::{
    ASSETS_PATH, ASSETS_SYNC_PATH, DEFAULT_SPENDING_DAYS, SPENDING_ANALYSIS_PATH,
    TRANSACTIONS_PATH,
};
use crate::error::Result;
use crate::models::pfm::{AssetSummary, SpendingAnalysis, TransactionPage, TransactionQuery};
use crate::transport::request::{ApiRequest, RequestOptions};

/// `/api/v1/pfm/*`.
pub struct PfmApi<'a> {
    client: &'a PfmClient,
}

impl<'a> PfmApi<'a> {
    pub(crate) fn new(client: &'a PfmClient) -> Self {
        Self { client }
    }

    /// Aggregated balances across all linked institutions.
    pub async fn assets(&self) -> Result<AssetSummary> {
        self.client
            .get(ASSETS_PATH, RequestOptions::new())
            .await?
            .into_data()
    }

    pub async fn transactions(&self, query: &TransactionQuery) -> Result<TransactionPage> {
        let options = RequestOptions::new().queries(query.to_pairs());
        self.client
            .get(TRANSACTIONS_PATH, options)
            .await?
            .into_data()
    }

    /// Spending over the last `days_back` days (30 when `None`).
    pub async fn spending_analysis(&self, days_back: Option<u32>) -> Result<SpendingAnalysis> {
        let options = RequestOptions::new()
            .query("daysBack", days_back.unwrap_or(DEFAULT_SPENDING_DAYS));
        self.client
            .get(SPENDING_ANALYSIS_PATH, options)
            .await?
            .into_data()
    }

    /// Ask the server to pull fresh balances from linked institutions.
    pub async fn sync_assets(&self) -> Result<()> {
        let request = ApiRequest::new(Method::POST, ASSETS_SYNC_PATH);
        self.client
            .send::<serde_json::Value>(&request)
            .await?
            .into_unit()
    }
}
