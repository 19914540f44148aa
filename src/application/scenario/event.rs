use super::state::RequestToken;
use crate::domain::errors::PredictionError;
use crate::domain::prediction::PredictionResult;
use chrono::{DateTime, Utc};

#[derive(Debug)]
pub enum ScenarioEvent {
    /// Search box text changed; never fetches on its own
    TickerEdited { raw: String },
    /// Explicit search form submission
    Submitted,
    MultiplierChanged { value: f64 },
    ScenarioToggled { enabled: bool },
    FetchCompleted(FetchCompletion),
}

/// Result of one fetch, tagged with the token it was issued under
#[derive(Debug)]
pub struct FetchCompletion {
    pub token: RequestToken,
    pub received_at: DateTime<Utc>,
    pub outcome: Result<PredictionResult, PredictionError>,
}

impl FetchCompletion {
    pub fn new(token: RequestToken, outcome: Result<PredictionResult, PredictionError>) -> Self {
        Self {
            token,
            received_at: Utc::now(),
            outcome,
        }
    }
}

impl From<FetchCompletion> for ScenarioEvent {
    fn from(completion: FetchCompletion) -> Self {
        Self::FetchCompleted(completion)
    }
}
