// Fetch dispatch between the UI thread and the runtime
pub mod client;

// Controller owner used by the desktop app and the CLI
pub mod forecast_agent;

// Display figures derived from a forecast
pub mod projection;

// Scenario state machine
pub mod scenario;
