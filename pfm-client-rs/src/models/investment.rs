//! Round-up investing payloads.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvestmentType {
    Roundup,
    Manual,
    Auto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub investment_id: String,
    pub product_name: String,
    pub investment_type: InvestmentType,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub invested_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentSummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_invested: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_rounded_up: Decimal,
    pub total_round_up_transactions: u64,
    #[serde(default)]
    pub recent_investments: Vec<Investment>,
}
