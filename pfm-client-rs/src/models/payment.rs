//! Transfer and payment-history payloads.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Completed,
    Pending,
    Failed,
    Cancelled,
}

impl PaymentStatus {
    /// True once the payment can no longer change state.
    pub fn is_final(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub from_account_id: String,
    pub to_account_id: String,
    pub recipient_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub payment_id: String,
    pub status: PaymentStatus,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(default)]
    pub currency: Option<String>,
    pub recipient_name: String,
    pub created_at: String,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Payment {
    pub fn created_at_utc(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        super::envelope::parse_timestamp(&self.created_at)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPage {
    #[serde(default)]
    pub payments: Vec<Payment>,
    pub total_pages: u32,
    pub total_elements: u64,
}

/// Paging for list endpoints. Unset fields are not sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl PageQuery {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page: Some(page),
            size: Some(size),
        }
    }

    pub(crate) fn to_pairs(self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(size) = self.size {
            pairs.push(("size".to_string(), size.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn test_transfer_amount_is_a_json_number() {
        let req = TransferRequest {
            from_account_id: "acc-1".into(),
            to_account_id: "acc-2".into(),
            recipient_name: "Lee".into(),
            amount: Decimal::from_str("50000.25").unwrap(),
            description: "rent".into(),
        };
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["amount"], json!(50000.25));
        assert_eq!(body["fromAccountId"], "acc-1");
    }

    #[test]
    fn test_payment_decodes() {
        let payment: Payment = serde_json::from_value(json!({
            "paymentId": "p1",
            "status": "COMPLETED",
            "amount": 50000,
            "currency": "KRW",
            "recipientName": "Lee",
            "createdAt": "2025-03-01T10:00:00",
            "completedAt": "2025-03-01T10:00:02"
        }))
        .unwrap();
        assert_eq!(payment.status, PaymentStatus::Completed);
        assert!(payment.status.is_final());
        assert!(payment.created_at_utc().is_some());
        assert!(payment.message.is_none());
    }

    #[test]
    fn test_page_query_pairs() {
        assert!(PageQuery::default().to_pairs().is_empty());
        assert_eq!(PageQuery::new(0, 20).to_pairs().len(), 2);
    }
}
