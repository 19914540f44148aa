use crate::application::scenario::Forecast;
use crate::domain::errors::PayloadIssue;
use crate::domain::prediction::PredictionResult;
use crate::domain::scenario::BASELINE_VOL_MULTIPLIER;
use crate::domain::signals::{Bias, RsiZone, SignalTone};
use std::fmt;

/// Low/high estimate for the first simulated day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionRange {
    pub low: f64,
    pub high: f64,
}

/// Historical closes indexed by position; `dates[i]` labels `points[i]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    pub points: Vec<[f64; 2]>,
    pub dates: Vec<String>,
}

impl PriceSeries {
    pub fn date_at(&self, x: f64) -> Option<&str> {
        if x < 0.0 || x.fract() != 0.0 {
            return None;
        }
        self.dates.get(x as usize).map(String::as_str)
    }
}

/// Fan chart: p10..p90 band plus the mean path
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbabilityCloud {
    pub upper: Vec<[f64; 2]>,
    pub lower: Vec<[f64; 2]>,
    pub mean: Vec<[f64; 2]>,
}

impl ProbabilityCloud {
    /// The band split into one quad per pair of adjacent days.
    ///
    /// Plot polygons are filled as convex shapes, so a widening fan has to be
    /// drawn piecewise. Each quad runs upper left, upper right, lower right,
    /// lower left.
    pub fn band_segments(&self) -> Vec<[[f64; 2]; 4]> {
        self.upper
            .windows(2)
            .zip(self.lower.windows(2))
            .map(|(up, low)| [up[0], up[1], low[1], low[0]])
            .collect()
    }
}

/// Everything the dashboard renders, derived from one forecast.
///
/// Panels that depend on the simulation are `None` when the payload
/// cannot support them.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastProjection {
    pub ticker: String,
    pub vol_multiplier: f64,
    pub last_close: f64,
    pub predicted_next_day: f64,
    pub volatility_pct: f64,
    pub rsi: f64,
    pub rsi_zone: RsiZone,
    pub macd: f64,
    pub macd_trend: Bias,
    pub fusion_signal: String,
    pub signal_tone: SignalTone,
    pub sentiment: f64,
    pub sentiment_bias: Bias,
    pub range: Option<PredictionRange>,
    pub probability_increase_pct: Option<f64>,
    pub history: PriceSeries,
    pub cloud: Option<ProbabilityCloud>,
    pub issues: Vec<PayloadIssue>,
}

impl ForecastProjection {
    pub fn from_forecast(forecast: &Forecast) -> Self {
        Self::from_result(&forecast.ticker, forecast.vol_multiplier, &forecast.result)
    }

    pub fn from_result(ticker: &str, vol_multiplier: f64, result: &PredictionResult) -> Self {
        let range = result
            .first_simulation_point()
            .filter(|p| p.p10.is_finite() && p.mean.is_finite() && p.p90.is_finite())
            .map(|p| {
                let (low, high) = if p.is_ordered() {
                    (p.p10, p.p90)
                } else {
                    p.envelope()
                };
                PredictionRange { low, high }
            });

        let probability_increase_pct = if result.simulation_data.is_empty()
            || !result.probability_increase_5_percent.is_finite()
        {
            None
        } else {
            Some(result.probability_increase_5_percent.clamp(0.0, 100.0))
        };

        Self {
            ticker: ticker.to_string(),
            vol_multiplier,
            last_close: result.last_close,
            predicted_next_day: result.predicted_next_day_lstm,
            volatility_pct: result.volatility * 100.0,
            rsi: result.rsi,
            rsi_zone: RsiZone::from_rsi(result.rsi),
            macd: result.macd,
            macd_trend: Bias::from_macd(result.macd),
            fusion_signal: result.fusion_signal.clone(),
            signal_tone: SignalTone::from_fusion_label(&result.fusion_signal),
            sentiment: if result.sentiment.is_finite() {
                result.sentiment.clamp(0.0, 100.0)
            } else {
                50.0
            },
            sentiment_bias: Bias::from_sentiment(result.sentiment),
            range,
            probability_increase_pct,
            history: project_history(result),
            cloud: project_cloud(result),
            issues: result.shape_issues(),
        }
    }

    pub fn is_stressed(&self) -> bool {
        self.vol_multiplier != BASELINE_VOL_MULTIPLIER
    }
}

fn project_history(result: &PredictionResult) -> PriceSeries {
    let mut series = PriceSeries::default();
    for point in result
        .historical_data
        .iter()
        .filter(|p| p.close.is_finite())
    {
        series.points.push([series.points.len() as f64, point.close]);
        series.dates.push(point.date.clone());
    }
    series
}

fn project_cloud(result: &PredictionResult) -> Option<ProbabilityCloud> {
    let mut cloud = ProbabilityCloud::default();
    for (i, point) in result.simulation_data.iter().enumerate() {
        if !(point.p10.is_finite() && point.mean.is_finite() && point.p90.is_finite()) {
            continue;
        }
        let x = point.day.as_axis_value(i as f64);
        let (low, high) = point.envelope();
        cloud.upper.push([x, high]);
        cloud.lower.push([x, low]);
        cloud.mean.push([x, point.mean]);
    }

    if cloud.mean.is_empty() {
        None
    } else {
        Some(cloud)
    }
}

impl fmt::Display for ForecastProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} | {} | vol x{:.1}{}",
            self.ticker,
            self.fusion_signal,
            self.vol_multiplier,
            if self.is_stressed() { " (scenario)" } else { "" }
        )?;
        writeln!(f, "  Live price        ${:.2}", self.last_close)?;
        match self.range {
            Some(range) => writeln!(
                f,
                "  Prediction        ${:.2}  (est. ${:.2} - ${:.2})",
                self.predicted_next_day, range.low, range.high
            )?,
            None => writeln!(f, "  Prediction        ${:.2}", self.predicted_next_day)?,
        }
        writeln!(f, "  Volatility        {:.2}%", self.volatility_pct)?;
        match self.probability_increase_pct {
            Some(p) => writeln!(f, "  Confidence        {:.1}% chance of >5% gain in 30 days", p)?,
            None => writeln!(f, "  Confidence        n/a")?,
        }
        writeln!(f, "  RSI (14d)         {:.2} ({})", self.rsi, self.rsi_zone)?;
        writeln!(f, "  MACD              {:.4} ({})", self.macd, self.macd_trend)?;
        write!(
            f,
            "  Sentiment         {:.0}/100 ({})",
            self.sentiment, self.sentiment_bias
        )?;
        for issue in &self.issues {
            write!(f, "\n  ! {}", issue)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::prediction::{HistoricalPoint, SimulationDay, SimulationPoint};

    fn result() -> PredictionResult {
        PredictionResult {
            ticker: Some("BTC-USD".to_string()),
            last_close: 50000.0,
            predicted_next_day_lstm: 51000.0,
            volatility: 0.0312,
            rsi: 72.5,
            macd: -3.0,
            fusion_signal: "Strong Buy".to_string(),
            sentiment: 65.0,
            probability_increase_5_percent: 37.0,
            historical_data: vec![
                HistoricalPoint {
                    date: "2024-01-01".into(),
                    close: 48000.0,
                },
                HistoricalPoint {
                    date: "2024-01-02".into(),
                    close: f64::NAN,
                },
                HistoricalPoint {
                    date: "2024-01-03".into(),
                    close: 50000.0,
                },
            ],
            simulation_data: vec![
                SimulationPoint {
                    day: SimulationDay::Number(1.0),
                    p10: 49000.0,
                    p90: 53000.0,
                    mean: 51000.0,
                },
                SimulationPoint {
                    day: SimulationDay::Number(2.0),
                    p10: 48000.0,
                    p90: 55000.0,
                    mean: 51500.0,
                },
            ],
        }
    }

    #[test]
    fn test_headline_figures() {
        let p = ForecastProjection::from_result("BTC-USD", 1.0, &result());
        assert_eq!(p.range, Some(PredictionRange { low: 49000.0, high: 53000.0 }));
        assert_eq!(p.probability_increase_pct, Some(37.0));
        assert!((p.volatility_pct - 3.12).abs() < 1e-9);
        assert_eq!(p.rsi_zone, RsiZone::Overbought);
        assert_eq!(p.macd_trend, Bias::Bearish);
        assert_eq!(p.signal_tone, SignalTone::Bullish);
        assert_eq!(p.sentiment_bias, Bias::Bullish);
        assert!(!p.is_stressed());
    }

    #[test]
    fn test_history_skips_non_finite_closes() {
        let p = ForecastProjection::from_result("BTC-USD", 1.0, &result());
        assert_eq!(p.history.points, vec![[0.0, 48000.0], [1.0, 50000.0]]);
        assert_eq!(p.history.date_at(1.0), Some("2024-01-03"));
        assert_eq!(p.history.date_at(0.5), None);
        assert_eq!(p.history.date_at(7.0), None);
    }

    #[test]
    fn test_cloud_band_splits_into_quads() {
        let p = ForecastProjection::from_result("BTC-USD", 2.0, &result());
        let cloud = p.cloud.as_ref().unwrap();
        assert_eq!(
            cloud.band_segments(),
            vec![[[1.0, 53000.0], [2.0, 55000.0], [2.0, 48000.0], [1.0, 49000.0]]]
        );
        assert_eq!(cloud.mean, vec![[1.0, 51000.0], [2.0, 51500.0]]);
        assert!(p.is_stressed());
    }

    #[test]
    fn test_widening_band_segments_are_convex() {
        // Fan that pinches then flares, which a single outline fills wrongly
        let cloud = ProbabilityCloud {
            upper: vec![[0.0, 101.0], [1.0, 100.5], [2.0, 110.0], [3.0, 130.0]],
            lower: vec![[0.0, 99.0], [1.0, 99.5], [2.0, 90.0], [3.0, 70.0]],
            mean: vec![],
        };
        let quads = cloud.band_segments();
        assert_eq!(quads.len(), 3);

        for quad in quads {
            let turns: Vec<f64> = (0..4)
                .map(|i| {
                    let [a, b, c] = [quad[i], quad[(i + 1) % 4], quad[(i + 2) % 4]];
                    (b[0] - a[0]) * (c[1] - b[1]) - (b[1] - a[1]) * (c[0] - b[0])
                })
                .collect();
            assert!(
                turns.iter().all(|t| *t < 0.0),
                "quad {:?} is not convex",
                quad
            );
        }
    }

    #[test]
    fn test_single_day_cloud_has_no_band() {
        let cloud = ProbabilityCloud {
            upper: vec![[0.0, 105.0]],
            lower: vec![[0.0, 95.0]],
            mean: vec![[0.0, 100.0]],
        };
        assert!(cloud.band_segments().is_empty());
    }

    #[test]
    fn test_empty_simulation_omits_dependent_panels() {
        let mut r = result();
        r.simulation_data.clear();

        let p = ForecastProjection::from_result("BTC-USD", 1.0, &r);
        assert!(p.range.is_none());
        assert!(p.probability_increase_pct.is_none());
        assert!(p.cloud.is_none());
        assert!(p.issues.contains(&PayloadIssue::EmptySimulation));
        assert!(p.to_string().contains("Confidence        n/a"));
    }

    #[test]
    fn test_inverted_band_uses_envelope() {
        let mut r = result();
        r.simulation_data[0] = SimulationPoint {
            day: SimulationDay::Number(1.0),
            p10: 52000.0,
            p90: 50000.0,
            mean: 51000.0,
        };

        let p = ForecastProjection::from_result("BTC-USD", 1.0, &r);
        assert_eq!(p.range, Some(PredictionRange { low: 50000.0, high: 52000.0 }));
        assert_eq!(p.cloud.unwrap().upper[0], [1.0, 52000.0]);
        assert!(
            p.issues
                .iter()
                .any(|i| matches!(i, PayloadIssue::InvertedBand { .. }))
        );
    }

    #[test]
    fn test_summary_mentions_range() {
        let text = ForecastProjection::from_result("BTC-USD", 2.0, &result()).to_string();
        assert!(text.starts_with("BTC-USD | Strong Buy | vol x2.0 (scenario)"));
        assert!(text.contains("est. $49000.00 - $53000.00"));
    }
}
