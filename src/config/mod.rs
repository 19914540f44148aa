//! Configuration module for FusionQuant.
//!
//! Settings are read from environment variables (optionally seeded from a
//! `.env` file by the binaries).

mod service_config;

pub use service_config::{DEVELOPMENT_API_URL, ServiceEnvConfig};

use crate::domain::ports::PredictionService;
use crate::domain::scenario::normalize_ticker;
use crate::infrastructure::http_client_factory::HttpClientFactory;
use crate::infrastructure::mock::SyntheticPredictionService;
use crate::infrastructure::prediction_api::HttpPredictionClient;
use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;
use std::sync::Arc;

pub const DEFAULT_TICKER: &str = "BTC-USD";

/// Which prediction service backs the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Http,
    Mock,
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "http" => Ok(Mode::Http),
            "mock" => Ok(Mode::Mock),
            _ => anyhow::bail!("Invalid MODE: {}. Must be 'http' or 'mock'", s),
        }
    }
}

/// Deployment flavor; decides the default service URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deployment {
    Development,
    Production,
}

impl FromStr for Deployment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Deployment::Development),
            "production" | "prod" => Ok(Deployment::Production),
            _ => anyhow::bail!(
                "Invalid DEPLOYMENT: {}. Must be 'development' or 'production'",
                s
            ),
        }
    }
}

impl Deployment {
    pub fn default_base_url(self) -> &'static str {
        match self {
            Deployment::Development => DEVELOPMENT_API_URL,
            Deployment::Production => "",
        }
    }
}

/// `RUST_LOG` when set and valid, `info` otherwise.
pub fn log_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    pub deployment: Deployment,
    pub default_ticker: String,
    pub service: ServiceEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let mode_str = env::var("MODE").unwrap_or_else(|_| "http".to_string());
        let mode = Mode::from_str(&mode_str)?;

        let deployment_str =
            env::var("DEPLOYMENT").unwrap_or_else(|_| "development".to_string());
        let deployment = Deployment::from_str(&deployment_str)?;

        let default_ticker = env::var("DEFAULT_TICKER")
            .map(|t| normalize_ticker(&t))
            .ok()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TICKER.to_string());

        let service = ServiceEnvConfig::from_env(deployment.default_base_url());

        if mode == Mode::Http && service.base_url.is_empty() {
            anyhow::bail!(
                "PREDICTION_API_URL must be set when DEPLOYMENT={:?} and MODE=http",
                deployment
            );
        }

        Ok(Self {
            mode,
            deployment,
            default_ticker,
            service,
        })
    }

    /// Builds the prediction service selected by `mode`.
    pub fn create_prediction_service(&self) -> Result<Arc<dyn PredictionService>> {
        match self.mode {
            Mode::Http => {
                let client = HttpClientFactory::create_client(
                    self.service.request_timeout,
                    self.service.connect_timeout,
                )?;
                let api = HttpPredictionClient::new(client, &self.service.base_url)
                    .context("Failed to configure prediction service client")?;
                Ok(Arc::new(api))
            }
            Mode::Mock => Ok(Arc::new(SyntheticPredictionService::new(
                self.service.mock_latency,
            ))),
        }
    }
}
