use crate::domain::errors::{PayloadIssue, PredictionError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Forecast payload returned by `/predict/{ticker}`.
///
/// Never patched after it is received; a newer fetch replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Echoed by the service, absent in older deployments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    pub last_close: f64,
    pub predicted_next_day_lstm: f64,
    /// Fractional, e.g. 0.0235 for 2.35%
    pub volatility: f64,
    pub rsi: f64,
    pub macd: f64,
    pub fusion_signal: String,
    pub sentiment: f64,
    pub probability_increase_5_percent: f64,
    pub historical_data: Vec<HistoricalPoint>,
    pub simulation_data: Vec<SimulationPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Close")]
    pub close: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationPoint {
    pub day: SimulationDay,
    pub p10: f64,
    pub p90: f64,
    pub mean: f64,
}

/// The service sends plain day indices, but labels are accepted too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SimulationDay {
    Number(f64),
    Label(String),
}

impl SimulationDay {
    /// Horizontal coordinate for charting; labels that are not numeric use `fallback`.
    pub fn as_axis_value(&self, fallback: f64) -> f64 {
        match self {
            Self::Number(n) if n.is_finite() => *n,
            Self::Number(_) => fallback,
            Self::Label(s) => s.trim().parse::<f64>().unwrap_or(fallback),
        }
    }
}

impl fmt::Display for SimulationDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            Self::Number(n) => write!(f, "{}", n),
            Self::Label(s) => write!(f, "{}", s),
        }
    }
}

impl SimulationPoint {
    pub fn is_ordered(&self) -> bool {
        self.p10 <= self.mean && self.mean <= self.p90
    }

    /// Lowest and highest of the three bands, whatever order they arrived in.
    pub fn envelope(&self) -> (f64, f64) {
        let low = self.p10.min(self.mean).min(self.p90);
        let high = self.p10.max(self.mean).max(self.p90);
        (low, high)
    }
}

impl PredictionResult {
    /// First simulated day, which the range display is built from.
    pub fn first_simulation_point(&self) -> Option<&SimulationPoint> {
        self.simulation_data.first()
    }

    /// Data-quality problems the view has to work around.
    ///
    /// An empty list means the payload is fully renderable.
    pub fn shape_issues(&self) -> Vec<PayloadIssue> {
        let mut issues = Vec::new();

        let scalars: [(&'static str, f64); 7] = [
            ("last_close", self.last_close),
            ("predicted_next_day_lstm", self.predicted_next_day_lstm),
            ("volatility", self.volatility),
            ("rsi", self.rsi),
            ("macd", self.macd),
            ("sentiment", self.sentiment),
            (
                "probability_increase_5_percent",
                self.probability_increase_5_percent,
            ),
        ];
        for (field, value) in scalars {
            if !value.is_finite() {
                issues.push(PayloadIssue::NonFinite { field });
            }
        }

        if self.historical_data.is_empty() {
            issues.push(PayloadIssue::EmptyHistory);
        } else if self.historical_data.iter().any(|p| !p.close.is_finite()) {
            issues.push(PayloadIssue::NonFinite {
                field: "historical_data.Close",
            });
        }

        if self.simulation_data.is_empty() {
            issues.push(PayloadIssue::EmptySimulation);
        }
        for point in &self.simulation_data {
            if !(point.p10.is_finite() && point.mean.is_finite() && point.p90.is_finite()) {
                issues.push(PayloadIssue::NonFinite {
                    field: "simulation_data",
                });
            } else if !point.is_ordered() {
                issues.push(PayloadIssue::InvertedBand {
                    day: point.day.to_string(),
                    p10: point.p10,
                    mean: point.mean,
                    p90: point.p90,
                });
            }
        }

        issues
    }

    /// Rejects the payload with its first shape issue as `MalformedPayload`.
    pub fn ensure_well_formed(&self, ticker: &str) -> Result<(), PredictionError> {
        match self.shape_issues().into_iter().next() {
            Some(issue) => Err(PredictionError::MalformedPayload {
                ticker: ticker.to_string(),
                issue,
            }),
            None => Ok(()),
        }
    }
}
