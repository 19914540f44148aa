use crate::domain::errors::ValidationError;
use crate::domain::prediction::PredictionResult;
use crate::domain::scenario::ScenarioInput;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Sequence number handed to each fetch when it is issued
pub type RequestToken = u64;

/// Everything needed to run one fetch, captured at initiation time
#[derive(Debug, Clone, PartialEq)]
pub struct FetchCommand {
    pub token: RequestToken,
    pub ticker: String,
    pub vol_multiplier: f64,
}

/// A payload together with the parameters that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub ticker: String,
    pub vol_multiplier: f64,
    pub received_at: DateTime<Utc>,
    pub result: Arc<PredictionResult>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailureReason {
    pub ticker: String,
    /// Generic, user-facing; the underlying cause only goes to the log
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading {
        request: FetchCommand,
        /// A payload was on screen when this fetch started, so scenario
        /// changes keep replaying while it is in flight
        replay_armed: bool,
    },
    Ready(Forecast),
    Failed(FailureReason),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub fn forecast(&self) -> Option<&Forecast> {
        match self {
            Self::Ready(forecast) => Some(forecast),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        match self {
            Self::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Whether a change to the scenario inputs should recompute the forecast.
    pub fn replay_armed(&self) -> bool {
        match self {
            Self::Ready(_) => true,
            Self::Loading { replay_armed, .. } => *replay_armed,
            Self::Idle | Self::Failed(_) => false,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Loading { .. } => "Loading",
            Self::Ready(_) => "Ready",
            Self::Failed(_) => "Failed",
        }
    }
}

/// Owned state of the scenario controller
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScenarioState {
    pub input: ScenarioInput,
    pub request: RequestState,
    /// Inline message for the search form; no request was made
    pub validation: Option<ValidationError>,
    pub(crate) last_token: RequestToken,
}

impl ScenarioState {
    pub fn new(input: ScenarioInput) -> Self {
        Self {
            input,
            ..Default::default()
        }
    }

    pub fn payload(&self) -> Option<&PredictionResult> {
        self.request.forecast().map(|f| f.result.as_ref())
    }

    /// Token of the most recently issued fetch (0 before the first one).
    pub fn last_token(&self) -> RequestToken {
        self.last_token
    }

    pub(crate) fn issue(&mut self, ticker: String) -> FetchCommand {
        self.last_token += 1;
        FetchCommand {
            token: self.last_token,
            ticker,
            vol_multiplier: self.input.effective_multiplier(),
        }
    }
}
