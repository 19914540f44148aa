use crate::domain::errors::{PredictionError, ValidationError};
use crate::domain::ports::PredictionService;
use crate::domain::prediction::{
    HistoricalPoint, PredictionResult, SimulationDay, SimulationPoint,
};
use crate::domain::scenario::validate_ticker;
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use rand::Rng;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use ta::Next;
use ta::indicators::{MovingAverageConvergenceDivergence, RelativeStrengthIndex};
use tokio::sync::oneshot;
use tracing::info;

struct ScriptedReply {
    gate: Option<oneshot::Receiver<()>>,
    outcome: Result<PredictionResult, String>,
}

/// Replays queued replies in call order and records every call.
///
/// A gated reply does not resolve until its sender fires (or is dropped),
/// which lets tests complete requests out of order.
#[derive(Clone, Default)]
pub struct MockPredictionService {
    calls: Arc<Mutex<Vec<(String, f64)>>>,
    script: Arc<Mutex<VecDeque<ScriptedReply>>>,
}

impl MockPredictionService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, result: PredictionResult) {
        self.push(None, Ok(result));
    }

    pub fn push_err(&self, cause: impl Into<String>) {
        self.push(None, Err(cause.into()));
    }

    /// Queues a success that waits for the returned sender.
    pub fn push_gated_ok(&self, result: PredictionResult) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push(Some(rx), Ok(result));
        tx
    }

    pub fn calls(&self) -> Vec<(String, f64)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn push(&self, gate: Option<oneshot::Receiver<()>>, outcome: Result<PredictionResult, String>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(ScriptedReply { gate, outcome });
        }
    }
}

#[async_trait]
impl PredictionService for MockPredictionService {
    async fn fetch_prediction(
        &self,
        ticker: &str,
        vol_multiplier: f64,
    ) -> Result<PredictionResult, PredictionError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((ticker.to_string(), vol_multiplier));
        }
        let reply = self.script.lock().ok().and_then(|mut s| s.pop_front());

        let Some(reply) = reply else {
            return Err(PredictionError::fetch_failed(
                ticker,
                anyhow::anyhow!("MockPredictionService: no scripted reply left"),
            ));
        };
        if let Some(gate) = reply.gate {
            let _ = gate.await;
        }
        reply
            .outcome
            .map_err(|cause| PredictionError::fetch_failed(ticker, anyhow::anyhow!(cause)))
    }
}

/// Offline stand-in for the forecast service.
///
/// Produces a random-walk history and a Monte-Carlo fan whose spread scales
/// with the volatility multiplier.
pub struct SyntheticPredictionService {
    latency: Duration,
    history_days: usize,
    horizon_days: usize,
    paths: usize,
}

impl SyntheticPredictionService {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            history_days: 365,
            horizon_days: 30,
            paths: 100,
        }
    }

    pub fn generate(&self, ticker: &str, vol_multiplier: f64) -> PredictionResult {
        let mut rng = rand::rng();
        let daily_vol = 0.01 + (ticker_seed(ticker) % 30) as f64 / 1000.0;

        // History: geometric random walk ending today
        let today = Utc::now().date_naive();
        let mut price = 20.0 + (ticker_seed(ticker) % 500) as f64;
        let mut closes = Vec::with_capacity(self.history_days);
        for _ in 0..self.history_days {
            price *= 1.0 + daily_vol * standard_normal(&mut rng);
            closes.push(price.max(0.01));
        }
        let historical_data = closes
            .iter()
            .enumerate()
            .map(|(i, close)| HistoricalPoint {
                date: (today - ChronoDuration::days((self.history_days - 1 - i) as i64))
                    .format("%Y-%m-%d")
                    .to_string(),
                close: *close,
            })
            .collect();

        let last_close = *closes.last().unwrap_or(&price);
        let (simulation_data, finals) =
            self.simulate(&mut rng, last_close, daily_vol * vol_multiplier);

        let target = last_close * 1.05;
        let probability_increase_5_percent = if finals.is_empty() {
            0.0
        } else {
            finals.iter().filter(|p| **p > target).count() as f64 / finals.len() as f64 * 100.0
        };

        let predicted_next_day_lstm = simulation_data
            .first()
            .map(|p: &SimulationPoint| p.mean)
            .unwrap_or(last_close);
        let (rsi, macd) = indicators(&closes);
        let sentiment = rng.random_range(20.0..80.0_f64).round();

        PredictionResult {
            ticker: Some(ticker.to_string()),
            last_close,
            predicted_next_day_lstm,
            volatility: daily_vol,
            rsi,
            macd,
            fusion_signal: fusion_signal(last_close, predicted_next_day_lstm, rsi, sentiment)
                .to_string(),
            sentiment,
            probability_increase_5_percent,
            historical_data,
            simulation_data,
        }
    }

    /// Percentile bands per day plus every path's final price.
    fn simulate(
        &self,
        rng: &mut impl Rng,
        start: f64,
        daily_vol: f64,
    ) -> (Vec<SimulationPoint>, Vec<f64>) {
        let mut prices = vec![start; self.paths];
        let mut points = Vec::with_capacity(self.horizon_days);
        for day in 0..self.horizon_days {
            for p in prices.iter_mut() {
                *p *= 1.0 + daily_vol * standard_normal(rng);
            }
            let mut sorted = prices.clone();
            sorted.sort_by(f64::total_cmp);
            points.push(SimulationPoint {
                day: SimulationDay::Number(day as f64),
                p10: sorted[self.paths / 10],
                p90: sorted[self.paths * 9 / 10],
                mean: sorted.iter().sum::<f64>() / self.paths as f64,
            });
        }
        (points, prices)
    }
}

#[async_trait]
impl PredictionService for SyntheticPredictionService {
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
        tokio::time::sleep(self.latency).await;
        info!("Synthesized prediction for {} (vol x{})", ticker, vol_multiplier);
        Ok(self.generate(ticker, vol_multiplier))
    }
}

fn ticker_seed(ticker: &str) -> u64 {
    ticker
        .bytes()
        .fold(7u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64))
}

/// Box-Muller transform
fn standard_normal(rng: &mut impl Rng) -> f64 {
    let u1: f64 = 1.0 - rng.random::<f64>();
    let u2: f64 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// RSI(14) and the MACD(12, 26, 9) line as of the last close.
fn indicators(closes: &[f64]) -> (f64, f64) {
    let (Ok(mut rsi), Ok(mut macd)) = (
        RelativeStrengthIndex::new(14),
        MovingAverageConvergenceDivergence::new(12, 26, 9),
    ) else {
        return (50.0, 0.0);
    };
    closes.iter().fold((50.0, 0.0), |_, close| {
        (rsi.next(*close), macd.next(*close).macd)
    })
}

/// Same scoring the forecast service uses for its composite label.
fn fusion_signal(last_close: f64, prediction: f64, rsi: f64, sentiment: f64) -> &'static str {
    let mut score = 0;
    if prediction > last_close {
        score += 1;
    }
    if prediction > last_close * 1.02 {
        score += 1;
    }
    if rsi < 35.0 {
        score += 2;
    } else if rsi > 65.0 {
        score -= 2;
    }
    if sentiment > 65.0 {
        score += 1;
    }
    if sentiment < 35.0 {
        score -= 1;
    }

    match score {
        s if s >= 3 => "Strong Buy",
        s if s >= 1 => "Buy",
        s if s <= -3 => "Strong Sell",
        s if s <= -1 => "Sell",
        _ => "Neutral",
    }
}
