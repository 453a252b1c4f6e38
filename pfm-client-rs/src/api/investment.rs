//! Round-up investing endpoints.

use reqwest::Method;

use crate::client::PfmClient;
use crate::config::{round_up_path, INVEST_SUMMARY_PATH};
use crate::error::Result;
use crate::models::investment::InvestmentSummary;
use crate::transport::request::{ApiRequest, RequestOptions};

/// `/api/v1/invest/*`.
pub struct InvestmentApi<'a> {
    client: &'a PfmClient,
}

impl<'a> InvestmentApi<'a> {
    pub(crate) fn new(client: &'a PfmClient) -> Self {
        Self { client }
    }

    pub async fn summary(&self) -> Result<InvestmentSummary> {
        self.client
            .get(INVEST_SUMMARY_PATH, RequestOptions::new())
            .await?
            .into_data()
    }

    /// Start rounding up card spending on `account_id` into investments.
    pub async fn enable_round_up(&self, account_id: &str) -> Result<()> {
        self.toggle(true, account_id).await
    }

    pub async fn disable_round_up(&self, account_id: &str) -> Result<()> {
        self.toggle(false, account_id).await
    }

    async fn toggle(&self, enable: bool, account_id: &str) -> Result<()> {
        let request = ApiRequest::new(Method::POST, round_up_path(enable, account_id));
        self.client
            .send::<serde_json::Value>(&request)
            .await?
            .into_unit()
    }
}
