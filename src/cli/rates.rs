use super::ui;
use crate::core::config::AppConfig;
use crate::core::currency::normalize_code;
use crate::core::{RateStore, RateTable, RateTableProvider};
use anyhow::{Context, Result};
use comfy_table::Cell;

/// Renders the configured currencies against the table's base.
pub fn display_rates(table: &RateTable, currencies: &[String]) -> String {
    let base = table.base();
    let mut rates_table = ui::new_styled_table();
    rates_table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell(&format!("Per 1 {base}")),
        ui::header_cell(&format!("In {base}")),
    ]);

    for code in currencies {
        let code = normalize_code(code);
        let rate = table.rate(&code);
        rates_table.add_row(vec![
            Cell::new(&code),
            ui::format_optional_cell(rate, |r| format!("{r:.4}")),
            ui::format_optional_cell(rate, |r| format!("{:.4}", 1.0 / r)),
        ]);
    }

    let mut output = format!(
        "Exchange rates: {}\n\n",
        ui::style_text(base, ui::StyleType::Title)
    );
    output.push_str(&rates_table.to_string());

    if let Some(updated) = table.updated_at() {
        output.push_str(&format!(
            "\n\n{}",
            ui::style_text(
                &format!("Last updated {}", updated.format("%Y-%m-%d %H:%M UTC")),
                ui::StyleType::Subtle
            )
        ));
    }
    if let Some(next) = table.next_update_at() {
        output.push_str(&format!(
            "\n{}",
            ui::style_text(
                &format!("Next update {}", next.format("%Y-%m-%d %H:%M UTC")),
                ui::StyleType::Subtle
            )
        ));
    }

    output
}

pub async fn run(
    store: &RateStore,
    provider: &dyn RateTableProvider,
    config: &AppConfig,
) -> Result<()> {
    let pb = ui::new_spinner("Loading rates...");
    let loaded = store.load_rates(provider, &config.base_currency).await;
    pb.finish_and_clear();
    loaded.context("Exchange rates could not be loaded")?;

    let table = store
        .table()
        .context("Rate table missing after a successful load")?;
    println!("{}", display_rates(table, &config.currencies));
    Ok(())
}
