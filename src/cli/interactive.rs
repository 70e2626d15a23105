//! Prompt-driven converter session.
//!
//! Rates load on a background task as soon as the session starts. Input is
//! accepted right away, but conversions are refused until the store is ready.

use super::ui;
use crate::core::config::AppConfig;
use crate::core::converter::parse_amount;
use crate::core::currency::normalize_code;
use crate::core::{RateStore, RateTableProvider};
use anyhow::Result;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

#[derive(Debug, PartialEq)]
enum SessionCommand {
    Empty,
    Help,
    Currencies,
    Quit,
    Convert {
        amount: Option<f64>,
        from: String,
        to: String,
    },
    Unknown(String),
}

fn parse_command(line: &str) -> SessionCommand {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        [] => SessionCommand::Empty,
        [cmd] => match cmd.to_lowercase().as_str() {
            "help" | "?" => SessionCommand::Help,
            "currencies" | "list" => SessionCommand::Currencies,
            "quit" | "exit" | "q" => SessionCommand::Quit,
            _ => SessionCommand::Unknown(line.trim().to_string()),
        },
        [amount, from, to] => SessionCommand::Convert {
            amount: parse_amount(amount),
            from: normalize_code(from),
            to: normalize_code(to),
        },
        _ => SessionCommand::Unknown(line.trim().to_string()),
    }
}

fn print_help<W: Write>(output: &mut W) -> std::io::Result<()> {
    writeln!(output, "Commands:")?;
    writeln!(output, "  <amount> <from> <to>   convert, e.g. 100 USD EUR")?;
    writeln!(output, "  currencies             list selectable currencies")?;
    writeln!(output, "  help                   show this message")?;
    writeln!(output, "  quit                   leave the session")
}

/// Runs the prompt loop until `quit` or end of input.
pub async fn session<R, W>(
    store: &RateStore,
    currencies: &[String],
    input: R,
    output: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(
        output,
        "{}",
        ui::style_text("Currency Converter", ui::StyleType::Title)
    )?;
    print_help(output)?;

    let mut lines = input.lines();
    loop {
        write!(output, "> ")?;
        output.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_command(&line) {
            SessionCommand::Empty => {}
            SessionCommand::Help => print_help(output)?,
            SessionCommand::Currencies => writeln!(output, "{}", currencies.join(" "))?,
            SessionCommand::Quit => break,
            SessionCommand::Convert { amount, from, to } => {
                if !store.is_ready() {
                    writeln!(
                        output,
                        "{}",
                        ui::style_text("Loading rates...", ui::StyleType::Subtle)
                    )?;
                    continue;
                }
                match store.convert(amount, &from, &to) {
                    Ok(conversion) => writeln!(
                        output,
                        "Converted Amount: {} {}",
                        ui::style_text(&conversion.to_string(), ui::StyleType::TotalValue),
                        conversion.to
                    )?,
                    Err(e) => {
                        writeln!(output, "{}", ui::style_text(&e.to_string(), ui::StyleType::Error))?
                    }
                }
            }
            SessionCommand::Unknown(text) => {
                debug!("Unrecognized input: {}", text);
                writeln!(
                    output,
                    "{}",
                    ui::style_text(
                        &format!("Unrecognized input '{text}'. Type 'help' for usage."),
                        ui::StyleType::Error
                    )
                )?;
            }
        }
    }

    Ok(())
}

pub async fn run(
    store: Arc<RateStore>,
    provider: Arc<dyn RateTableProvider>,
    config: &AppConfig,
) -> Result<()> {
    let input = BufReader::new(tokio::io::stdin());
    run_with(
        store,
        provider,
        config,
        input,
        &mut std::io::stdout(),
        std::io::stderr(),
    )
    .await
}

/// Starts the background rate load, then runs the session over `input`.
///
/// A failed load is reported once to `notices`; the session keeps answering
/// that rates are loading.
pub async fn run_with<R, W, N>(
    store: Arc<RateStore>,
    provider: Arc<dyn RateTableProvider>,
    config: &AppConfig,
    input: R,
    output: &mut W,
    mut notices: N,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    N: Write + Send + 'static,
{
    let loader = {
        let store = Arc::clone(&store);
        let base = config.base_currency.clone();
        tokio::spawn(async move {
            if let Err(e) = store.load_rates(provider.as_ref(), &base).await {
                let notice = format!("Exchange rates could not be loaded: {e}");
                if let Err(io_err) =
                    writeln!(notices, "{}", ui::style_text(&notice, ui::StyleType::Subtle))
                {
                    debug!("Failed to report load failure: {}", io_err);
                }
            }
        })
    };

    let result = session(&store, &config.currencies, input, output).await;
    loader.abort();
    result
}
