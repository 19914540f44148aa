pub mod http_client_factory;
pub mod mock;
pub mod prediction_api;

pub use mock::{MockPredictionService, SyntheticPredictionService};
pub use prediction_api::HttpPredictionClient;
