//! Rate store and currency conversion.
//!
//! The store owns the rate table for the lifetime of a session. It starts
//! empty, becomes ready once a provider fetch succeeds, and never goes back.
//! Conversions are only answered from a ready store.

use crate::core::currency::{RateTableProvider, normalize_code};
use crate::core::rates::RateTable;
use anyhow::Result;
use std::fmt::Display;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, error, info, instrument};

/// Reasons a conversion request is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("Please enter a valid amount.")]
    InvalidAmount,

    #[error("Exchange rate unavailable for {0}.")]
    RateUnavailable(String),
}

/// A successful conversion. `value` is unrounded; rounding happens on display.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub value: f64,
}

impl Conversion {
    pub fn rounded(&self) -> f64 {
        round2(self.value)
    }
}

impl Display for Conversion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.rounded())
    }
}

/// Rounds to two decimal places, half away from zero.
///
/// Values too large to scale by 100 are returned unchanged; they carry no
/// fractional digits anyway.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 100.0
}

/// Parses a user entered amount. Blank or non-numeric text yields `None`.
pub fn parse_amount(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

#[derive(Debug, Default)]
pub struct RateStore {
    table: OnceCell<RateTable>,
}

impl RateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that is already ready with `table`.
    pub fn with_table(table: RateTable) -> Self {
        RateStore {
            table: OnceCell::new_with(Some(table)),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.table.initialized()
    }

    pub fn table(&self) -> Option<&RateTable> {
        self.table.get()
    }

    /// Fetches the rate table once and marks the store ready.
    ///
    /// A ready store returns immediately. Concurrent callers share one
    /// fetch. On failure the store stays not ready and nothing is retried.
    #[instrument(name = "LoadRates", skip(self, provider), fields(base = %base))]
    pub async fn load_rates(&self, provider: &dyn RateTableProvider, base: &str) -> Result<()> {
        if self.is_ready() {
            debug!("Rates already loaded, skipping fetch");
            return Ok(());
        }

        let base = normalize_code(base);
        match self
            .table
            .get_or_try_init(|| provider.fetch_rates(&base))
            .await
        {
            Ok(table) => {
                info!(
                    "Loaded {} exchange rates against {}",
                    table.len(),
                    table.base()
                );
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Error fetching exchange rates");
                Err(e)
            }
        }
    }

    /// Converts `amount` of `from` into `to` via the base currency.
    pub fn convert(
        &self,
        amount: Option<f64>,
        from: &str,
        to: &str,
    ) -> Result<Conversion, ConversionError> {
        let amount = match amount {
            Some(a) if a.is_finite() && a > 0.0 => a,
            _ => return Err(ConversionError::InvalidAmount),
        };

        let from = normalize_code(from);
        let to = normalize_code(to);

        let table = self.table.get();
        let lookup = |code: &str| {
            table
                .and_then(|t| t.rate(code))
                .ok_or_else(|| ConversionError::RateUnavailable(code.to_string()))
        };
        let from_rate = lookup(from.as_str())?;
        let to_rate = lookup(to.as_str())?;

        let value = (amount / from_rate) * to_rate;
        if !value.is_finite() {
            debug!("Conversion of {} {} to {} overflowed", amount, from, to);
            return Err(ConversionError::InvalidAmount);
        }
        debug!("Converted {} {} -> {} {}", amount, from, value, to);

        Ok(Conversion {
            amount,
            from,
            to,
            value,
        })
    }
}
