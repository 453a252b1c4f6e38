//! Transfer and payment history endpoints.

use crate::client::PfmClient;
use crate::config::{payment_path, PAYMENT_HISTORY_PATH, TRANSFER_PATH};
use crate::error::Result;
use crate::models::payment::{PageQuery, Payment, PaymentPage, TransferRequest};
use crate::transport::request::RequestOptions;

/// `/api/v1/payment/*`.
pub struct PaymentApi<'a> {
    client: &'a PfmClient,
}

impl<'a> PaymentApi<'a> {
    pub(crate) fn new(client: &'a PfmClient) -> Self {
        Self { client }
    }

    /// Start a transfer. The returned payment is usually still `PENDING`.
    pub async fn transfer(&self, request: &TransferRequest) -> Result<Payment> {
        self.client
            .post(TRANSFER_PATH, request, RequestOptions::new())
            .await?
            .into_data()
    }

    pub async fn payment(&self, payment_id: &str) -> Result<Payment> {
        self.client
            .get(&payment_path(payment_id), RequestOptions::new())
            .await?
            .into_data()
    }

    pub async fn history(&self, query: PageQuery) -> Result<PaymentPage> {
        let options = RequestOptions::new().queries(query.to_pairs());
        self.client
            .get(PAYMENT_HISTORY_PATH, options)
            .await?
            .into_data()
    }
}
