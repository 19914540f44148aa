//! FusionQuant Forecast - headless client
//!
//! Runs one forecast through the same scenario controller the desktop app
//! uses and prints the dashboard figures to stdout.
//!
//! # Usage
//! ```sh
//! cargo run --bin forecast -- AAPL --scenario --vol 2.0
//! MODE=mock cargo run --bin forecast -- BTC-USD --json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use fusionquant::application::client::ForecastClient;
use fusionquant::application::forecast_agent::ForecastAgent;
use fusionquant::application::scenario::RequestState;
use fusionquant::config::{Config, log_filter};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about = "Fetch a FusionQuant forecast", long_about = None)]
struct Cli {
    /// Ticker symbol (defaults to DEFAULT_TICKER)
    ticker: Option<String>,

    /// Enable the stress-test scenario
    #[arg(long)]
    scenario: bool,

    /// Volatility multiplier applied when the scenario is enabled (0.5 - 3.0)
    #[arg(long, default_value = "1.0")]
    vol: f64,

    /// Print the raw payload as JSON instead of the summary
    #[arg(long)]
    json: bool,

    /// Fail instead of printing a degraded summary when the payload is malformed
    #[arg(long)]
    strict: bool,

    /// Give up after this many seconds
    #[arg(long, default_value = "60")]
    timeout: u64,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(log_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    info!("Mode={:?}, Service={}", config.mode, config.service.base_url);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build Tokio runtime")?;
    let client = ForecastClient::new(runtime.handle().clone(), config.create_prediction_service()?);

    let ticker = cli.ticker.unwrap_or_else(|| config.default_ticker.clone());
    let mut agent = ForecastAgent::new(client, &ticker);
    agent.set_multiplier(cli.vol);
    agent.set_scenario_enabled(cli.scenario);
    agent.submit();

    if let Some(err) = &agent.state().validation {
        anyhow::bail!("{}", err);
    }
    if !agent.settle(Duration::from_secs(cli.timeout)) {
        anyhow::bail!("No forecast for {} after {}s", ticker, cli.timeout);
    }

    match &agent.state().request {
        RequestState::Ready(forecast) => {
            if cli.strict {
                forecast.result.ensure_well_formed(&forecast.ticker)?;
            }
            if cli.json {
                println!("{}", serde_json::to_string_pretty(forecast.result.as_ref())?);
            } else if let Some(projection) = agent.projection() {
                println!("{}", projection);
            }
            Ok(())
        }
        RequestState::Failed(failure) => anyhow::bail!("{}: {}", failure.ticker, failure.message),
        other => anyhow::bail!("Unexpected state after settle: {}", other.label()),
    }
}
