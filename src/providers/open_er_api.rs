use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::currency::{RateTableProvider, normalize_code};
use crate::core::rates::RateTable;

// OpenErApiProvider implementation for RateTableProvider
pub struct OpenErApiProvider {
    base_url: String,
    timeout: Option<Duration>,
}

impl OpenErApiProvider {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Self {
        OpenErApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    result: Option<String>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    base_code: Option<String>,
    time_last_update_unix: Option<i64>,
    time_next_update_unix: Option<i64>,
    rates: Option<HashMap<String, f64>>,
}

fn to_datetime(ts: Option<i64>) -> Option<DateTime<Utc>> {
    ts.and_then(|ts| Utc.timestamp_opt(ts, 0).single())
}

#[async_trait]
impl RateTableProvider for OpenErApiProvider {
    #[instrument(name = "OpenErApiFetch", skip(self), fields(base = %base))]
    async fn fetch_rates(&self, base: &str) -> Result<RateTable> {
        let base = normalize_code(base);
        let url = format!("{}/v6/latest/{}", self.base_url, base);
        debug!("Requesting exchange rates from {}", url);

        let mut builder = reqwest::Client::builder().user_agent("fxc/1.0");
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for base currency: {}", e, base))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for base currency: {}",
                response.status(),
                base
            ));
        }

        let text = response.text().await?;

        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", base, e))?;

        if data.result.as_deref() == Some("error") {
            return Err(anyhow!(
                "Rate service returned an error for {}: {}",
                base,
                data.error_type.as_deref().unwrap_or("unknown")
            ));
        }

        let rates = data
            .rates
            .ok_or_else(|| anyhow!("No rates found in response for base currency: {}", base))?;
        let reported_base = data.base_code.unwrap_or(base);

        debug!("Received {} rates for {}", rates.len(), reported_base);

        Ok(RateTable::new(&reported_base, rates).with_update_times(
            to_datetime(data.time_last_update_unix),
            to_datetime(data.time_next_update_unix),
        ))
    }
}
