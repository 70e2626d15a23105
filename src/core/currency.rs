//! Exchange rate provider abstractions

use crate::core::rates::RateTable;
use anyhow::Result;
use async_trait::async_trait;

/// Base currency used when no other is configured.
pub const DEFAULT_BASE_CURRENCY: &str = "USD";

/// Currency codes offered for selection.
pub const SUPPORTED_CURRENCIES: [&str; 10] = [
    "USD", "EUR", "JPY", "GBP", "AUD", "CAD", "CHF", "CNY", "HKD", "INR",
];

/// Normalizes user supplied currency codes, e.g. " eur" -> "EUR".
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

#[async_trait]
pub trait RateTableProvider: Send + Sync {
    /// Fetches all rates expressed against one unit of `base`.
    async fn fetch_rates(&self, base: &str) -> Result<RateTable>;
}
