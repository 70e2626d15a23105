use super::ui;
use crate::core::config::AppConfig;
use crate::core::converter::parse_amount;
use crate::core::{Conversion, RateStore, RateTableProvider};
use anyhow::{Context, Result};
use std::io::Write;

/// One-line summary, e.g. `100.00 USD = 90.00 EUR`.
pub fn format_conversion(conversion: &Conversion) -> String {
    format!(
        "{:.2} {} = {} {}",
        conversion.amount,
        conversion.from,
        ui::style_text(&conversion.to_string(), ui::StyleType::TotalValue),
        ui::style_text(&conversion.to, ui::StyleType::TotalLabel)
    )
}

/// Loads rates and writes the conversion to `output`.
///
/// Rejections are returned, not printed; the caller reports them once.
pub async fn run<W: Write>(
    store: &RateStore,
    provider: &dyn RateTableProvider,
    config: &AppConfig,
    amount: &str,
    from: &str,
    to: &str,
    output: &mut W,
) -> Result<Conversion> {
    let pb = ui::new_spinner("Loading rates...");
    let loaded = store.load_rates(provider, &config.base_currency).await;
    pb.finish_and_clear();
    loaded.context("Exchange rates could not be loaded")?;

    let conversion = store.convert(parse_amount(amount), from, to)?;
    writeln!(output, "{}", format_conversion(&conversion))?;
    Ok(conversion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RateTable;
    use crate::core::converter::ConversionError;
    use async_trait::async_trait;

    struct StaticProvider;

    #[async_trait]
    impl RateTableProvider for StaticProvider {
        async fn fetch_rates(&self, base: &str) -> Result<RateTable> {
            Ok(RateTable::new(base, [("EUR", 0.9), ("JPY", 150.0)]))
        }
    }

    #[tokio::test]
    async fn test_run_converts_after_loading() {
        let store = RateStore::new();
        let mut output = Vec::new();
        let conversion = run(
            &store,
            &StaticProvider,
            &AppConfig::default(),
            "10",
            "usd",
            "jpy",
            &mut output,
        )
        .await
        .unwrap();

        assert!(store.is_ready());
        assert_eq!(conversion.to_string(), "1500.00");
        assert_eq!(conversion.to, "JPY");
        let printed = String::from_utf8(output).unwrap();
        assert_eq!(printed.lines().count(), 1);
        assert!(printed.contains("1500.00"));
    }

    #[tokio::test]
    async fn test_run_reports_invalid_amount() {
        let store = RateStore::new();
        let mut output = Vec::new();
        let err = run(
            &store,
            &StaticProvider,
            &AppConfig::default(),
            "ten",
            "USD",
            "EUR",
            &mut output,
        )
        .await
        .unwrap_err();

        assert_eq!(
            err.downcast_ref::<ConversionError>(),
            Some(&ConversionError::InvalidAmount)
        );
        // Reported once, by whoever handles the returned error.
        assert!(output.is_empty());
    }

    #[test]
    fn test_format_conversion_contains_both_sides() {
        let conversion = Conversion {
            amount: 100.0,
            from: "USD".to_string(),
            to: "EUR".to_string(),
            value: 90.00000000000001,
        };
        let line = format_conversion(&conversion);
        assert!(line.starts_with("100.00 USD = "));
        assert!(line.contains("90.00"));
        assert!(line.contains("EUR"));
    }
}
