use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates the HTTP client used for forecast requests.
    ///
    /// No retry middleware: a failed forecast is reported to the user, who
    /// decides whether to resubmit.
    pub fn create_client(request_timeout: Duration, connect_timeout: Duration) -> Result<Client> {
        Client::builder()
            .pool_max_idle_per_host(2)
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .user_agent(concat!("fusionquant/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")
    }
}
