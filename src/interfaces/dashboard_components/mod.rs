pub mod chart_panel;
pub mod metrics_card;
