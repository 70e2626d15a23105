//! Exchange rate table relative to a single base currency.

use crate::core::currency::normalize_code;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// Units of each currency per one unit of the base currency.
///
/// A table is built once from a provider response and never changes
/// afterwards. Every stored rate is positive and finite, and the base
/// currency is always present with a rate of `1.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    base: String,
    rates: HashMap<String, f64>,
    updated_at: Option<DateTime<Utc>>,
    next_update_at: Option<DateTime<Utc>>,
}

impl RateTable {
    pub fn new<I, K>(base: &str, rates: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let base = normalize_code(base);
        let mut table = HashMap::new();
        for (code, rate) in rates {
            let code = normalize_code(code.as_ref());
            if !rate.is_finite() || rate <= 0.0 {
                warn!("Dropping unusable rate {} for {}", rate, code);
                continue;
            }
            table.insert(code, rate);
        }
        table.entry(base.clone()).or_insert(1.0);

        RateTable {
            base,
            rates: table,
            updated_at: None,
            next_update_at: None,
        }
    }

    pub fn with_update_times(
        mut self,
        updated_at: Option<DateTime<Utc>>,
        next_update_at: Option<DateTime<Utc>>,
    ) -> Self {
        self.updated_at = updated_at;
        self.next_update_at = next_update_at;
        self
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rates.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn next_update_at(&self) -> Option<DateTime<Utc>> {
        self.next_update_at
    }

    /// Rates ordered by currency code.
    pub fn sorted(&self) -> BTreeMap<&str, f64> {
        self.rates.iter().map(|(k, v)| (k.as_str(), *v)).collect()
    }
}
