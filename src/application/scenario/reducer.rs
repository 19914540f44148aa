use super::event::{FetchCompletion, ScenarioEvent};
use super::state::{FailureReason, FetchCommand, Forecast, RequestState, ScenarioState};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Applies one event to the controller state.
///
/// Returns the next state and, when the event warrants it, the fetch to run.
/// Completions never touch `state.input`; they only produce a command when
/// the scenario changed while the first load was still in flight.
pub fn reduce(
    mut state: ScenarioState,
    event: ScenarioEvent,
) -> (ScenarioState, Option<FetchCommand>) {
    let command = match event {
        ScenarioEvent::TickerEdited { raw } => {
            state.input.set_ticker(&raw);
            state.validation = None;
            None
        }
        ScenarioEvent::Submitted => submit(&mut state),
        ScenarioEvent::MultiplierChanged { value } => {
            let before = state.input.volatility_multiplier();
            if !state.input.set_volatility_multiplier(value) {
                warn!("Scenario: ignoring non-finite volatility multiplier {}", value);
                None
            } else if state.input.volatility_multiplier() == before
                || !state.input.scenario_enabled()
            {
                // Effective multiplier unchanged
                None
            } else {
                replay(&mut state)
            }
        }
        ScenarioEvent::ScenarioToggled { enabled } => {
            if state.input.scenario_enabled() == enabled {
                None
            } else {
                state.input.set_scenario_enabled(enabled);
                replay(&mut state)
            }
        }
        ScenarioEvent::FetchCompleted(completion) => complete(&mut state, completion),
    };

    (state, command)
}

fn submit(state: &mut ScenarioState) -> Option<FetchCommand> {
    let ticker = match state.input.validated_ticker() {
        Ok(ticker) => ticker.to_string(),
        Err(e) => {
            info!("Scenario: submission rejected: {}", e);
            state.validation = Some(e);
            return None;
        }
    };
    state.validation = None;

    let replay_armed = state.request.replay_armed();
    Some(start(state, ticker, replay_armed))
}

/// Recomputes the displayed forecast under the current scenario.
fn replay(state: &mut ScenarioState) -> Option<FetchCommand> {
    // The ticker comes from what is on screen (or in flight), not the search box
    let ticker = match &state.request {
        RequestState::Ready(forecast) => forecast.ticker.clone(),
        RequestState::Loading {
            request,
            replay_armed: true,
        } => request.ticker.clone(),
        _ => {
            debug!(
                "Scenario: no payload in {} state, scenario change kept local",
                state.request.label()
            );
            return None;
        }
    };

    Some(start(state, ticker, true))
}

fn start(state: &mut ScenarioState, ticker: String, replay_armed: bool) -> FetchCommand {
    let command = state.issue(ticker);
    debug!(
        "Scenario: {} -> Loading (#{} {} x{})",
        state.request.label(),
        command.token,
        command.ticker,
        command.vol_multiplier
    );
    state.request = RequestState::Loading {
        request: command.clone(),
        replay_armed,
    };
    command
}

fn complete(state: &mut ScenarioState, completion: FetchCompletion) -> Option<FetchCommand> {
    let request = match &state.request {
        RequestState::Loading { request, .. } if request.token == completion.token => {
            request.clone()
        }
        _ => {
            debug!(
                "Scenario: dropping stale completion #{} (latest #{})",
                completion.token, state.last_token
            );
            return None;
        }
    };

    match completion.outcome {
        Ok(result) => {
            for issue in result.shape_issues() {
                warn!("Scenario: payload for {} degraded: {}", request.ticker, issue);
            }
            debug!("Scenario: Loading -> Ready (#{})", request.token);
            let ticker = request.ticker.clone();
            state.request = RequestState::Ready(Forecast {
                ticker: request.ticker,
                vol_multiplier: request.vol_multiplier,
                received_at: completion.received_at,
                result: Arc::new(result),
            });

            // Scenario edited during a load that could not replay yet
            if request.vol_multiplier != state.input.effective_multiplier() {
                debug!(
                    "Scenario: shown x{} but input is x{}, catching up",
                    request.vol_multiplier,
                    state.input.effective_multiplier()
                );
                return Some(start(state, ticker, true));
            }
            None
        }
        Err(err) => {
            error!(
                "Scenario: prediction for {} (x{}) failed: {:?}",
                request.ticker, request.vol_multiplier, err
            );
            state.request = RequestState::Failed(FailureReason {
                ticker: request.ticker,
                message: err.user_message(),
            });
            None
        }
    }
}

/// Owner of the scenario state; feeds events through [`reduce`].
#[derive(Debug, Default)]
pub struct ScenarioController {
    state: ScenarioState,
}

impl ScenarioController {
    pub fn new(state: ScenarioState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &ScenarioState {
        &self.state
    }

    pub fn handle(&mut self, event: impl Into<ScenarioEvent>) -> Option<FetchCommand> {
        let (next, command) = reduce(std::mem::take(&mut self.state), event.into());
        self.state = next;
        command
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::{PredictionError, ValidationError};
    use crate::domain::prediction::{
        HistoricalPoint, PredictionResult, SimulationDay, SimulationPoint,
    };
    use crate::domain::scenario::ScenarioInput;

    fn payload(last_close: f64) -> PredictionResult {
        PredictionResult {
            ticker: None,
            last_close,
            predicted_next_day_lstm: last_close * 1.02,
            volatility: 0.02,
            rsi: 50.0,
            macd: 1.0,
            fusion_signal: "Neutral".to_string(),
            sentiment: 50.0,
            probability_increase_5_percent: 20.0,
            historical_data: vec![HistoricalPoint {
                date: "2024-01-01".to_string(),
                close: last_close,
            }],
            simulation_data: vec![SimulationPoint {
                day: SimulationDay::Number(0.0),
                p10: last_close * 0.9,
                p90: last_close * 1.1,
                mean: last_close,
            }],
        }
    }

    fn controller(ticker: &str) -> ScenarioController {
        ScenarioController::new(ScenarioState::new(ScenarioInput::new(ticker)))
    }

    fn succeed(c: &mut ScenarioController, cmd: &FetchCommand, result: PredictionResult) {
        let none = c.handle(FetchCompletion::new(cmd.token, Ok(result)));
        assert!(none.is_none());
    }

    fn fail(c: &mut ScenarioController, cmd: &FetchCommand) {
        let err = PredictionError::fetch_failed(&cmd.ticker, anyhow::anyhow!("HTTP 500"));
        c.handle(FetchCompletion::new(cmd.token, Err(err)));
    }

    /// Brings a controller to Ready with a baseline payload.
    fn ready(ticker: &str) -> ScenarioController {
        let mut c = controller(ticker);
        let cmd = c.handle(ScenarioEvent::Submitted).unwrap();
        succeed(&mut c, &cmd, payload(100.0));
        assert_eq!(c.state().request.label(), "Ready");
        c
    }

    #[test]
    fn test_submit_from_idle_starts_loading() {
        let mut c = controller("btc-usd");
        let cmd = c.handle(ScenarioEvent::Submitted).expect("fetch issued");

        assert_eq!(cmd.ticker, "BTC-USD");
        assert_eq!(cmd.vol_multiplier, 1.0);
        assert_eq!(cmd.token, 1);
        assert!(c.state().request.is_loading());
    }

    #[test]
    fn test_disabled_scenario_always_sends_baseline() {
        for raw in [0.5, 0.8, 1.0, 1.7, 2.5, 3.0] {
            let mut c = controller("AAPL");
            c.handle(ScenarioEvent::MultiplierChanged { value: raw });
            let cmd = c.handle(ScenarioEvent::Submitted).unwrap();
            assert_eq!(cmd.vol_multiplier, 1.0, "slider at {}", raw);
        }
    }

    #[test]
    fn test_enabled_scenario_sends_slider_value() {
        let mut c = controller("AAPL");
        c.handle(ScenarioEvent::ScenarioToggled { enabled: true });
        c.handle(ScenarioEvent::MultiplierChanged { value: 2.5 });
        let cmd = c.handle(ScenarioEvent::Submitted).unwrap();
        assert_eq!(cmd.vol_multiplier, 2.5);
    }

    #[test]
    fn test_empty_ticker_is_rejected_without_fetch() {
        let mut c = controller("   ");
        assert!(c.handle(ScenarioEvent::Submitted).is_none());
        assert_eq!(c.state().validation, Some(ValidationError::EmptyTicker));
        assert_eq!(c.state().request, RequestState::Idle);
        assert_eq!(c.state().last_token(), 0);

        c.handle(ScenarioEvent::TickerEdited { raw: "msft".into() });
        assert!(c.state().validation.is_none());
        assert!(c.handle(ScenarioEvent::Submitted).is_some());
    }

    #[test]
    fn test_repeated_submission_has_same_transitions() {
        let mut c = controller("AAPL");
        for _ in 0..2 {
            let cmd = c.handle(ScenarioEvent::Submitted).unwrap();
            assert_eq!(c.state().request.label(), "Loading");
            succeed(&mut c, &cmd, payload(100.0));
            assert_eq!(c.state().request.label(), "Ready");
            assert_eq!(c.state().payload(), Some(&payload(100.0)));
        }

        for _ in 0..2 {
            let cmd = c.handle(ScenarioEvent::Submitted).unwrap();
            assert_eq!(c.state().request.label(), "Loading");
            fail(&mut c, &cmd);
            assert_eq!(c.state().request.label(), "Failed");
        }
    }

    #[test]
    fn test_late_superseded_response_is_dropped() {
        let mut c = controller("AAPL");
        let a = c.handle(ScenarioEvent::Submitted).unwrap();
        let b = c.handle(ScenarioEvent::Submitted).unwrap();
        assert!(b.token > a.token);

        succeed(&mut c, &b, payload(200.0));
        succeed(&mut c, &a, payload(100.0));

        assert_eq!(c.state().payload().unwrap().last_close, 200.0);
    }

    #[test]
    fn test_early_superseded_response_is_dropped() {
        let mut c = controller("AAPL");
        let a = c.handle(ScenarioEvent::Submitted).unwrap();
        let b = c.handle(ScenarioEvent::Submitted).unwrap();

        succeed(&mut c, &a, payload(100.0));
        assert!(c.state().request.is_loading(), "A must not commit");

        succeed(&mut c, &b, payload(200.0));
        assert_eq!(c.state().payload().unwrap().last_close, 200.0);
    }

    #[test]
    fn test_superseded_failure_does_not_clobber_ready() {
        let mut c = controller("AAPL");
        let a = c.handle(ScenarioEvent::Submitted).unwrap();
        let b = c.handle(ScenarioEvent::Submitted).unwrap();

        succeed(&mut c, &b, payload(200.0));
        fail(&mut c, &a);

        assert_eq!(c.state().request.label(), "Ready");
    }

    #[test]
    fn test_scenario_changes_without_payload_never_fetch() {
        let mut c = controller("AAPL");
        assert!(c.handle(ScenarioEvent::ScenarioToggled { enabled: true }).is_none());
        assert!(c.handle(ScenarioEvent::MultiplierChanged { value: 2.0 }).is_none());
        assert!(c.handle(ScenarioEvent::ScenarioToggled { enabled: false }).is_none());
        assert_eq!(c.state().request, RequestState::Idle);
        assert_eq!(c.state().last_token(), 0);

        // Same after a failed first attempt
        let cmd = c.handle(ScenarioEvent::Submitted).unwrap();
        fail(&mut c, &cmd);
        assert!(c.handle(ScenarioEvent::ScenarioToggled { enabled: true }).is_none());
        assert!(c.handle(ScenarioEvent::MultiplierChanged { value: 1.5 }).is_none());
    }

    #[test]
    fn test_scenario_change_during_first_load_catches_up() {
        let mut c = controller("AAPL");
        let first = c.handle(ScenarioEvent::Submitted).unwrap();
        assert_eq!(first.vol_multiplier, 1.0);

        assert!(c.handle(ScenarioEvent::ScenarioToggled { enabled: true }).is_none());
        assert!(c.handle(ScenarioEvent::MultiplierChanged { value: 2.0 }).is_none());

        let catch_up = c
            .handle(FetchCompletion::new(first.token, Ok(payload(100.0))))
            .expect("one follow-up fetch");
        assert_eq!(catch_up.vol_multiplier, 2.0);
        assert_eq!(catch_up.ticker, "AAPL");
        assert!(c.state().request.is_loading());

        succeed(&mut c, &catch_up, payload(120.0));
        let forecast = c.state().request.forecast().unwrap();
        assert_eq!(forecast.vol_multiplier, 2.0);
        assert_eq!(forecast.result.last_close, 120.0);
    }

    #[test]
    fn test_reverted_change_during_first_load_needs_no_catch_up() {
        let mut c = controller("AAPL");
        let first = c.handle(ScenarioEvent::Submitted).unwrap();
        c.handle(ScenarioEvent::ScenarioToggled { enabled: true });
        c.handle(ScenarioEvent::ScenarioToggled { enabled: false });

        succeed(&mut c, &first, payload(100.0));
        assert_eq!(c.state().request.label(), "Ready");
    }

    #[test]
    fn test_failed_first_load_does_not_catch_up() {
        let mut c = controller("AAPL");
        let first = c.handle(ScenarioEvent::Submitted).unwrap();
        c.handle(ScenarioEvent::ScenarioToggled { enabled: true });

        let err = PredictionError::fetch_failed("AAPL", anyhow::anyhow!("HTTP 500"));
        assert!(c.handle(FetchCompletion::new(first.token, Err(err))).is_none());
        assert_eq!(c.state().request.label(), "Failed");
    }

    #[test]
    fn test_toggle_replays_once_with_effective_multiplier() {
        let mut c = ready("AAPL");
        c.handle(ScenarioEvent::MultiplierChanged { value: 2.0 });
        assert!(c.state().request.forecast().is_some(), "disabled slider is inert");

        let on = c.handle(ScenarioEvent::ScenarioToggled { enabled: true });
        let on = on.expect("exactly one fetch on enable");
        assert_eq!(on.vol_multiplier, 2.0);
        assert_eq!(on.ticker, "AAPL");
        succeed(&mut c, &on, payload(100.0));

        let off = c.handle(ScenarioEvent::ScenarioToggled { enabled: false });
        let off = off.expect("exactly one fetch on disable");
        assert_eq!(off.vol_multiplier, 1.0);
        assert_eq!(off.token, on.token + 1);
    }

    #[test]
    fn test_repeated_toggle_value_is_not_a_change() {
        let mut c = ready("AAPL");
        assert!(c.handle(ScenarioEvent::ScenarioToggled { enabled: false }).is_none());
        assert_eq!(c.state().request.label(), "Ready");
    }

    #[test]
    fn test_slider_drag_keeps_replaying_while_loading() {
        let mut c = ready("AAPL");
        c.handle(ScenarioEvent::ScenarioToggled { enabled: true }).unwrap();

        let mut last = None;
        for value in [1.1, 1.2, 1.3] {
            last = c.handle(ScenarioEvent::MultiplierChanged { value });
            assert!(last.is_some());
        }
        let last = last.unwrap();
        assert_eq!(last.vol_multiplier, 1.3);

        succeed(&mut c, &last, payload(130.0));
        assert_eq!(c.state().request.forecast().unwrap().vol_multiplier, 1.3);
    }

    #[test]
    fn test_replay_uses_displayed_ticker_not_unsubmitted_text() {
        let mut c = ready("AAPL");
        c.handle(ScenarioEvent::TickerEdited { raw: "TSL".into() });
        let cmd = c.handle(ScenarioEvent::ScenarioToggled { enabled: true }).unwrap();
        assert_eq!(cmd.ticker, "AAPL");
    }

    #[test]
    fn test_replay_failure_keeps_scenario_inputs() {
        let mut c = ready("AAPL");
        c.handle(ScenarioEvent::ScenarioToggled { enabled: true });
        let cmd = c.handle(ScenarioEvent::MultiplierChanged { value: 2.7 }).unwrap();
        fail(&mut c, &cmd);

        let state = c.state();
        assert!(state.payload().is_none(), "old chart is not shown as current");
        assert_eq!(state.request.failure().unwrap().ticker, "AAPL");
        assert!(state.input.scenario_enabled());
        assert_eq!(state.input.volatility_multiplier(), 2.7);
    }

    #[test]
    fn test_completion_never_writes_input() {
        let mut c = controller("AAPL");
        c.handle(ScenarioEvent::MultiplierChanged { value: 1.8 });
        let before = c.state().input.clone();
        let cmd = c.handle(ScenarioEvent::Submitted).unwrap();
        succeed(&mut c, &cmd, payload(10.0));
        assert_eq!(c.state().input, before);
    }

    #[test]
    fn test_failed_submit_retries_with_current_input() {
        let mut c = controller("AAPL");
        let cmd = c.handle(ScenarioEvent::Submitted).unwrap();
        fail(&mut c, &cmd);

        c.handle(ScenarioEvent::TickerEdited { raw: "nvda".into() });
        let retry = c.handle(ScenarioEvent::Submitted).unwrap();
        assert_eq!(retry.ticker, "NVDA");
        assert!(!c.state().request.replay_armed());
    }

    #[test]
    fn test_ready_payload_is_kept_unchanged() {
        let mut c = controller("BTC-USD");
        let cmd = c.handle(ScenarioEvent::Submitted).unwrap();
        let mut expected = payload(50000.0);
        expected.predicted_next_day_lstm = 51000.0;
        expected.simulation_data[0] = SimulationPoint {
            day: SimulationDay::Number(1.0),
            p10: 49000.0,
            p90: 53000.0,
            mean: 51000.0,
        };

        succeed(&mut c, &cmd, expected.clone());

        let forecast = c.state().request.forecast().unwrap();
        assert_eq!(forecast.result.as_ref(), &expected);
        assert_eq!(forecast.vol_multiplier, 1.0);
        assert_eq!(forecast.ticker, "BTC-USD");
    }

    #[test]
    fn test_empty_simulation_still_reaches_ready() {
        let mut c = controller("AAPL");
        let cmd = c.handle(ScenarioEvent::Submitted).unwrap();
        let mut degraded = payload(100.0);
        degraded.simulation_data.clear();

        succeed(&mut c, &cmd, degraded);
        assert!(c.state().payload().unwrap().simulation_data.is_empty());
    }
}
