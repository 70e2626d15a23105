pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::{RateStore, RateTableProvider};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Convert {
        amount: String,
        from: String,
        to: String,
    },
    Rates,
    Interactive,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider: Arc<dyn RateTableProvider> = Arc::new(
        providers::OpenErApiProvider::new(config.open_er_api_url(), config.request_timeout()),
    );
    let store = Arc::new(RateStore::new());

    match command {
        AppCommand::Convert { amount, from, to } => {
            cli::convert::run(
                &store,
                provider.as_ref(),
                &config,
                &amount,
                &from,
                &to,
                &mut std::io::stdout(),
            )
            .await
            .map(|_| ())
        }
        AppCommand::Rates => cli::rates::run(&store, provider.as_ref(), &config).await,
        AppCommand::Interactive => cli::interactive::run(store, provider, &config).await,
    }
}
