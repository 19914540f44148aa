use crate::domain::errors::ValidationError;

pub const MIN_VOL_MULTIPLIER: f64 = 0.5;
pub const MAX_VOL_MULTIPLIER: f64 = 3.0;
pub const BASELINE_VOL_MULTIPLIER: f64 = 1.0;
/// Slider granularity is 0.1
const VOL_MULTIPLIER_STEPS_PER_UNIT: f64 = 10.0;

/// What the user has set in the search form and the scenario card.
///
/// Only user interaction mutates this; fetch completions never do.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioInput {
    ticker: String,
    volatility_multiplier: f64,
    scenario_enabled: bool,
}

impl Default for ScenarioInput {
    fn default() -> Self {
        Self::new("")
    }
}

impl ScenarioInput {
    pub fn new(ticker: &str) -> Self {
        Self {
            ticker: normalize_ticker(ticker),
            volatility_multiplier: BASELINE_VOL_MULTIPLIER,
            scenario_enabled: false,
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn volatility_multiplier(&self) -> f64 {
        self.volatility_multiplier
    }

    pub fn scenario_enabled(&self) -> bool {
        self.scenario_enabled
    }

    pub fn set_ticker(&mut self, raw: &str) {
        self.ticker = normalize_ticker(raw);
    }

    /// Stores the slider value clamped into the supported range.
    ///
    /// Returns false (and leaves the stored value alone) for NaN or infinities.
    pub fn set_volatility_multiplier(&mut self, value: f64) -> bool {
        match clamp_multiplier(value) {
            Some(v) => {
                self.volatility_multiplier = v;
                true
            }
            None => false,
        }
    }

    pub fn set_scenario_enabled(&mut self, enabled: bool) {
        self.scenario_enabled = enabled;
    }

    /// Multiplier actually sent to the service: baseline while the scenario is off.
    pub fn effective_multiplier(&self) -> f64 {
        if self.scenario_enabled {
            self.volatility_multiplier
        } else {
            BASELINE_VOL_MULTIPLIER
        }
    }

    pub fn validated_ticker(&self) -> Result<&str, ValidationError> {
        validate_ticker(&self.ticker)?;
        Ok(&self.ticker)
    }
}

/// Trims surrounding whitespace and uppercases.
pub fn normalize_ticker(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Accepts symbols like `AAPL`, `BTC-USD`, `BRK.B`, `^GSPC`, `EURUSD=X`.
pub fn validate_ticker(ticker: &str) -> Result<(), ValidationError> {
    if ticker.is_empty() {
        return Err(ValidationError::EmptyTicker);
    }
    if let Some(found) = ticker
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '^' | '=' | '_')))
    {
        return Err(ValidationError::InvalidTicker {
            ticker: ticker.to_string(),
            found,
        });
    }
    Ok(())
}

/// Clamps into [0.5, 3.0] and snaps to one decimal, like the slider does.
pub fn clamp_multiplier(value: f64) -> Option<f64> {
    if !value.is_finite() {
        return None;
    }
    let clamped = value.clamp(MIN_VOL_MULTIPLIER, MAX_VOL_MULTIPLIER);
    Some((clamped * VOL_MULTIPLIER_STEPS_PER_UNIT).round() / VOL_MULTIPLIER_STEPS_PER_UNIT)
}
