use crate::domain::errors::{PredictionError, ValidationError};
use crate::domain::ports::PredictionService;
use crate::domain::prediction::PredictionResult;
use crate::domain::scenario::validate_ticker;
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};
use url::Url;

/// Longest slice of an error body kept in the log
const ERROR_BODY_LIMIT: usize = 512;

/// `GET {base}/predict/{ticker}?vol_multiplier={m}` against the forecast service
pub struct HttpPredictionClient {
    client: Client,
    base_url: Url,
}

impl HttpPredictionClient {
    pub fn new(client: Client, base_url: &str) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid prediction service URL: '{}'", base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Prediction service URL cannot carry a path: {}", base_url);
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends `predict/{ticker}` to the base path, percent-encoding the ticker.
    pub fn endpoint(&self, ticker: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("predict").push(ticker);
        }
        url
    }

    async fn request(&self, ticker: &str, vol_multiplier: f64) -> anyhow::Result<PredictionResult> {
        let response = self
            .client
            .get(self.endpoint(ticker))
            .query(&[("vol_multiplier", format_multiplier(vol_multiplier))])
            .send()
            .await
            .context("Failed to send request to prediction service")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Prediction service returned status {}: {}",
                status,
                truncate(&body, ERROR_BODY_LIMIT)
            ));
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read prediction response body")?;
        serde_json::from_slice(&bytes).context("Failed to parse prediction response")
    }
}

#[async_trait]
impl PredictionService for HttpPredictionClient {
    async fn fetch_prediction(
        &self,
        ticker: &str,
        vol_multiplier: f64,
    ) -> Result<PredictionResult, PredictionError> {
        validate_ticker(ticker)?;
        if !(vol_multiplier.is_finite() && vol_multiplier > 0.0) {
            return Err(ValidationError::InvalidMultiplier {
                value: vol_multiplier,
            }
            .into());
        }

        info!(
            "Fetching prediction for {} (vol x{})...",
            ticker, vol_multiplier
        );
        match self.request(ticker, vol_multiplier).await {
            Ok(result) => {
                info!(
                    "Fetched prediction for {}: last close {:.2}, signal {}",
                    ticker, result.last_close, result.fusion_signal
                );
                Ok(result)
            }
            Err(cause) => {
                warn!("Prediction request for {} failed: {:#}", ticker, cause);
                Err(PredictionError::fetch_failed(ticker, cause))
            }
        }
    }
}

/// Decimal string for the query parameter: `1.0`, `2.5`, `1.25`.
pub fn format_multiplier(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

fn truncate(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpPredictionClient {
        HttpPredictionClient::new(Client::new(), base).unwrap()
    }

    #[test]
    fn test_endpoint_appends_predict_segment() {
        let c = client("http://127.0.0.1:8000");
        assert_eq!(
            c.endpoint("BTC-USD").as_str(),
            "http://127.0.0.1:8000/predict/BTC-USD"
        );

        let c = client("https://example.com/api/");
        assert_eq!(
            c.endpoint("AAPL").as_str(),
            "https://example.com/api/predict/AAPL"
        );
    }

    #[test]
    fn test_endpoint_encodes_ticker() {
        let c = client("http://localhost:8000");
        assert_eq!(
            c.endpoint("A B").as_str(),
            "http://localhost:8000/predict/A%20B"
        );
        assert_eq!(
            c.endpoint("A/B").as_str(),
            "http://localhost:8000/predict/A%2FB"
        );
    }

    #[test]
    fn test_rejects_unusable_base() {
        assert!(HttpPredictionClient::new(Client::new(), "").is_err());
        assert!(HttpPredictionClient::new(Client::new(), "mailto:ops@example.com").is_err());
    }

    #[test]
    fn test_format_multiplier() {
        assert_eq!(format_multiplier(1.0), "1.0");
        assert_eq!(format_multiplier(2.0), "2.0");
        assert_eq!(format_multiplier(2.5), "2.5");
        assert_eq!(format_multiplier(1.25), "1.25");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("abc", 10), "abc");
    }

    #[tokio::test]
    async fn test_invalid_inputs_make_no_request() {
        // Port 9 (discard) would fail loudly if a request were attempted
        let c = client("http://127.0.0.1:9");
        let err = c.fetch_prediction("", 1.0).await.unwrap_err();
        assert!(matches!(
            err,
            PredictionError::Validation(ValidationError::EmptyTicker)
        ));

        let err = c.fetch_prediction("AAPL", 0.0).await.unwrap_err();
        assert!(matches!(
            err,
            PredictionError::Validation(ValidationError::InvalidMultiplier { .. })
        ));
    }
}
