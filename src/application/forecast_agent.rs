use crate::application::client::ForecastClient;
use crate::application::projection::ForecastProjection;
use crate::application::scenario::{
    FetchCompletion, ScenarioController, ScenarioEvent, ScenarioState,
};
use crate::domain::prediction::PredictionResult;
use crate::domain::scenario::ScenarioInput;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// UI-facing owner of the scenario controller.
///
/// Widgets call the setters; every frame calls [`ForecastAgent::update`] to
/// fold finished fetches back into the state.
pub struct ForecastAgent {
    controller: ScenarioController,
    client: ForecastClient,
    projection: Option<(Arc<PredictionResult>, ForecastProjection)>,
}

impl ForecastAgent {
    pub fn new(client: ForecastClient, initial_ticker: &str) -> Self {
        Self {
            controller: ScenarioController::new(ScenarioState::new(ScenarioInput::new(
                initial_ticker,
            ))),
            client,
            projection: None,
        }
    }

    pub fn state(&self) -> &ScenarioState {
        self.controller.state()
    }

    pub fn input(&self) -> &ScenarioInput {
        &self.controller.state().input
    }

    /// Projection of the forecast currently in `Ready`, if any.
    pub fn projection(&self) -> Option<&ForecastProjection> {
        self.projection.as_ref().map(|(_, p)| p)
    }

    pub fn edit_ticker(&mut self, raw: &str) {
        self.apply(ScenarioEvent::TickerEdited {
            raw: raw.to_string(),
        });
    }

    pub fn submit(&mut self) {
        self.apply(ScenarioEvent::Submitted);
    }

    pub fn set_multiplier(&mut self, value: f64) {
        self.apply(ScenarioEvent::MultiplierChanged { value });
    }

    pub fn set_scenario_enabled(&mut self, enabled: bool) {
        self.apply(ScenarioEvent::ScenarioToggled { enabled });
    }

    /// Drains finished fetches. Returns true if any arrived.
    pub fn update(&mut self) -> bool {
        let mut received = false;
        while let Some(completion) = self.client.poll_next() {
            self.complete(completion);
            received = true;
        }
        received
    }

    /// Blocks until no fetch is in flight. Returns false on timeout.
    pub fn settle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.state().request.is_loading() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            if let Some(completion) = self.client.wait_next(remaining) {
                self.complete(completion);
            }
        }
        true
    }

    fn complete(&mut self, completion: FetchCompletion) {
        self.apply(ScenarioEvent::FetchCompleted(completion));
    }

    fn apply(&mut self, event: ScenarioEvent) {
        if let Some(command) = self.controller.handle(event) {
            self.client.dispatch(command);
        }
        self.refresh_projection();
    }

    fn refresh_projection(&mut self) {
        let Some(forecast) = self.controller.state().request.forecast() else {
            self.projection = None;
            return;
        };
        let stale = match &self.projection {
            Some((shown, _)) => !Arc::ptr_eq(shown, &forecast.result),
            None => true,
        };
        if stale {
            self.projection = Some((
                forecast.result.clone(),
                ForecastProjection::from_forecast(forecast),
            ));
        }
    }
}
