// Domain-specific error types
pub mod errors;

// Port interfaces
pub mod ports;

// Forecast payload model
pub mod prediction;

// Scenario inputs and their normalization
pub mod scenario;

// Indicator classifications
pub mod signals;
