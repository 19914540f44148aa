use crate::domain::errors::PredictionError;
use crate::domain::prediction::PredictionResult;
use async_trait::async_trait;

#[async_trait]
pub trait PredictionService: Send + Sync {
    /// One request for `ticker` under the given volatility multiplier.
    ///
    /// Implementations do not retry and hold no state between calls.
    async fn fetch_prediction(
        &self,
        ticker: &str,
        vol_multiplier: f64,
    ) -> Result<PredictionResult, PredictionError>;
}
