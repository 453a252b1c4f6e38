//! Asset, transaction and spending-analysis payloads.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Institution category of a linked asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    Bank,
    Card,
    Securities,
    Insurance,
    Fintech,
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bank => write!(f, "BANK"),
            Self::Card => write!(f, "CARD"),
            Self::Securities => write!(f, "SECURITIES"),
            Self::Insurance => write!(f, "INSURANCE"),
            Self::Fintech => write!(f, "FINTECH"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub asset_type: AssetType,
    pub institution_name: String,
    pub account_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub current_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub asset_type: AssetType,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_value: Decimal,
    pub count: u32,
}

/// Aggregated balances across every linked institution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_balance: Decimal,
    pub currency: String,
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub category_breakdown: Vec<CategoryBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub transaction_id: String,
    pub account_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub merchant_name: Option<String>,
    /// `DEBIT` or `CREDIT`.
    #[serde(default)]
    pub transaction_type: Option<String>,
    /// `COMPLETED`, `FAILED` or `PENDING`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub transaction_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    pub total_pages: u32,
    pub total_elements: u64,
}

/// Filters for the transaction listing. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub account_id: Option<String>,
}

impl TransactionQuery {
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub(crate) fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(size) = self.size {
            pairs.push(("size".to_string(), size.to_string()));
        }
        if let Some(account_id) = &self.account_id {
            pairs.push(("accountId".to_string(), account_id.clone()));
        }
        pairs
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingCategory {
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub transaction_count: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_amount: Decimal,
}

/// A transaction the server flagged as unusual for its category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalousTransaction {
    pub transaction_id: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub merchant_name: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingAnalysis {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_spending: Decimal,
    pub period: String,
    #[serde(default)]
    pub category_breakdown: Vec<SpendingCategory>,
    #[serde(default)]
    pub anomalous_transactions: Vec<AnomalousTransaction>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn test_asset_summary_decodes_exact_amounts() {
        let summary: AssetSummary = serde_json::from_value(json!({
            "totalBalance": 15230000.5,
            "currency": "KRW",
            "assets": [{
                "id": "a1",
                "assetType": "SECURITIES",
                "institutionName": "MyBank Securities",
                "accountName": "ISA",
                "balance": 1000,
                "currentValue": 1000.1
            }],
            "categoryBreakdown": [{"assetType": "SECURITIES", "totalValue": 1000.1, "count": 1}]
        }))
        .unwrap();
        assert_eq!(summary.total_balance, Decimal::from_str("15230000.5").unwrap());
        assert_eq!(summary.assets[0].asset_type, AssetType::Securities);
        assert_eq!(summary.assets[0].current_value, Decimal::from_str("1000.1").unwrap());
        assert_eq!(summary.category_breakdown[0].count, 1);
    }

    #[test]
    fn test_transaction_query_pairs() {
        assert!(TransactionQuery::default().to_pairs().is_empty());
        let pairs = TransactionQuery::default().page(2).account_id("acc-9").to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("page".to_string(), "2".to_string()),
                ("accountId".to_string(), "acc-9".to_string()),
            ]
        );
    }

    #[test]
    fn test_asset_type_display_matches_wire() {
        let wire = serde_json::to_value(AssetType::Fintech).unwrap();
        assert_eq!(wire, json!(AssetType::Fintech.to_string()));
    }
}
