use thiserror::Error;

/// Rejections raised before any request leaves the client
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Ticker is empty")]
    EmptyTicker,

    #[error("Ticker '{ticker}' contains invalid character '{found}'")]
    InvalidTicker { ticker: String, found: char },

    #[error("Volatility multiplier must be a positive number, got {value}")]
    InvalidMultiplier { value: f64 },
}

/// Shape problems found in a payload that decoded successfully
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PayloadIssue {
    #[error("simulation_data is empty")]
    EmptySimulation,

    #[error("historical_data is empty")]
    EmptyHistory,

    #[error("simulation day {day}: bands out of order (p10={p10}, mean={mean}, p90={p90})")]
    InvertedBand {
        day: String,
        p10: f64,
        mean: f64,
        p90: f64,
    },

    #[error("non-finite value in field {field}")]
    NonFinite { field: &'static str },
}

/// Errors surfaced by a prediction service
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Prediction fetch failed for {ticker}")]
    FetchFailed {
        ticker: String,
        #[source]
        cause: anyhow::Error,
    },

    #[error("Malformed prediction payload for {ticker}: {issue}")]
    MalformedPayload { ticker: String, issue: PayloadIssue },
}

impl PredictionError {
    pub fn fetch_failed(ticker: impl Into<String>, cause: impl Into<anyhow::Error>) -> Self {
        Self::FetchFailed {
            ticker: ticker.into(),
            cause: cause.into(),
        }
    }

    /// Generic text safe to show in the result panel.
    ///
    /// Transport and decode causes stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::FetchFailed { .. } | Self::MalformedPayload { .. } => {
                "Failed to fetch data. Please check the ticker.".to_string()
            }
        }
    }
}
