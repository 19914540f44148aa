//! Scenario controller: decides when to (re-)fetch a forecast.
//!
//! State lives in [`ScenarioState`] and only changes through [`reduce`].
//! Fetching itself happens elsewhere; the reducer just hands back a
//! [`FetchCommand`] tagged with a sequence token, and the matching
//! [`FetchCompletion`] is committed only if that token is still the latest.

pub mod event;
pub mod reducer;
pub mod state;

pub use event::{FetchCompletion, ScenarioEvent};
pub use reducer::{ScenarioController, reduce};
pub use state::{FailureReason, FetchCommand, Forecast, RequestState, RequestToken, ScenarioState};
