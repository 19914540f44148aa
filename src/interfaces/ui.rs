use crate::application::forecast_agent::ForecastAgent;
use crate::application::scenario::RequestState;
use crate::domain::scenario::{MAX_VOL_MULTIPLIER, MIN_VOL_MULTIPLIER};
use crate::interfaces::components::card::Card;
use crate::interfaces::dashboard_components::chart_panel::{
    render_history_chart, render_probability_cloud,
};
use crate::interfaces::dashboard_components::metrics_card::{
    render_indicator, render_stat_card, render_status_pill,
};
use crate::interfaces::design_system::DesignSystem;
use crate::interfaces::view_models::forecast_view_model::ForecastViewModel;
use eframe::egui;

/// Desktop shell around a [`ForecastAgent`].
///
/// Holds the only widget state the controller does not own: the search box
/// text and the slider position while dragging.
pub struct ForecastApp {
    agent: ForecastAgent,
    ticker_draft: String,
    slider_value: f64,
}

impl ForecastApp {
    pub fn new(agent: ForecastAgent) -> Self {
        let ticker_draft = agent.input().ticker().to_string();
        let slider_value = agent.input().volatility_multiplier();
        Self {
            agent,
            ticker_draft,
            slider_value,
        }
    }

    fn render_search(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let edit = ui.add(
                egui::TextEdit::singleline(&mut self.ticker_draft)
                    .hint_text("Enter ticker (e.g. BTC-USD, AAPL)")
                    .desired_width(260.0),
            );
            if edit.changed() {
                self.agent.edit_ticker(&self.ticker_draft);
                self.ticker_draft = self.agent.input().ticker().to_string();
            }
            let entered = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            let loading = self.agent.state().request.is_loading();
            let button = ui.add_enabled(
                !loading,
                egui::Button::new(if loading { "Analyzing..." } else { "Analyze" })
                    .fill(DesignSystem::ACCENT_PRIMARY),
            );
            if button.clicked() || (entered && !loading) {
                self.agent.submit();
            }
            if loading {
                ui.spinner();
            }
        });

        if let Some(err) = &self.agent.state().validation {
            ui.label(egui::RichText::new(err.to_string()).color(DesignSystem::WARNING));
        }
    }

    fn render_scenario(&mut self, ui: &mut egui::Ui) {
        let enabled = self.agent.input().scenario_enabled();
        let highlight = enabled.then_some(DesignSystem::ACCENT_SCENARIO);

        Card::new()
            .title("STRESS TEST SCENARIO")
            .highlight(highlight)
            .show(ui, |ui| {
                let mut toggle = enabled;
                ui.horizontal(|ui| {
                    if ui
                        .checkbox(&mut toggle, "Simulate market shock (volatility multiplier)")
                        .changed()
                    {
                        self.agent.set_scenario_enabled(toggle);
                    }
                    let (text, color) = if enabled {
                        ("ON", DesignSystem::ACCENT_SCENARIO)
                    } else {
                        ("OFF", DesignSystem::TEXT_MUTED)
                    };
                    render_status_pill(ui, text, color);
                });

                ui.add_enabled_ui(enabled, |ui| {
                    ui.spacing_mut().slider_width = 300.0;
                    let slider = egui::Slider::new(
                        &mut self.slider_value,
                        MIN_VOL_MULTIPLIER..=MAX_VOL_MULTIPLIER,
                    )
                    .step_by(0.1)
                    .suffix("x")
                    .show_value(true);
                    if ui.add(slider).changed() {
                        self.agent.set_multiplier(self.slider_value);
                        self.slider_value = self.agent.input().volatility_multiplier();
                    }
                    ui.horizontal(|ui| {
                        ui.label(
                            egui::RichText::new("Cautious")
                                .size(10.0)
                                .color(DesignSystem::TEXT_MUTED),
                        );
                        ui.add_space(240.0);
                        ui.label(
                            egui::RichText::new("Aggressive")
                                .size(10.0)
                                .color(DesignSystem::TEXT_MUTED),
                        );
                    });
                });

                ui.label(
                    egui::RichText::new(format!(
                        "Effective multiplier: {:.1}x",
                        self.agent.input().effective_multiplier()
                    ))
                    .size(11.0)
                    .color(DesignSystem::TEXT_SECONDARY),
                );
            });
    }

    fn render_result(&self, ui: &mut egui::Ui) {
        match &self.agent.state().request {
            RequestState::Idle => {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        egui::RichText::new("Search a ticker to run the forecast.")
                            .color(DesignSystem::TEXT_MUTED),
                    );
                });
            }
            RequestState::Failed(failure) => {
                DesignSystem::banner_frame(DesignSystem::DANGER).show(ui, |ui| {
                    ui.label(
                        egui::RichText::new(&failure.message)
                            .strong()
                            .color(DesignSystem::DANGER),
                    );
                });
            }
            RequestState::Loading { request, .. } => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(
                        egui::RichText::new(format!(
                            "Forecasting {} (vol x{:.1})...",
                            request.ticker, request.vol_multiplier
                        ))
                        .color(DesignSystem::TEXT_SECONDARY),
                    );
                });
            }
            RequestState::Ready(_) => self.render_forecast(ui),
        }
    }

    fn render_forecast(&self, ui: &mut egui::Ui) {
        let Some(p) = self.agent.projection() else {
            return;
        };

        ui.horizontal(|ui| {
            ui.heading(egui::RichText::new(&p.ticker).strong());
            render_status_pill(
                ui,
                &p.fusion_signal,
                ForecastViewModel::signal_color(p.signal_tone),
            );
            ui.label(
                egui::RichText::new("Model: Random Forest Fusion")
                    .size(11.0)
                    .color(DesignSystem::TEXT_MUTED),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.add(
                    egui::ProgressBar::new((p.sentiment / 100.0) as f32)
                        .desired_width(160.0)
                        .fill(ForecastViewModel::sentiment_color(p.sentiment_bias))
                        .text(format!("Sentiment {:.0}", p.sentiment)),
                );
            });
        });
        ui.add_space(DesignSystem::SPACING_SMALL);

        if !p.issues.is_empty() {
            DesignSystem::banner_frame(DesignSystem::WARNING).show(ui, |ui| {
                ui.label(
                    egui::RichText::new("Forecast data is incomplete; some panels are hidden.")
                        .color(DesignSystem::WARNING),
                );
            });
            ui.add_space(DesignSystem::SPACING_SMALL);
        }

        let cards = ForecastViewModel::stat_cards(p);
        ui.columns(cards.len(), |cols| {
            for (col, card) in cols.iter_mut().zip(&cards) {
                render_stat_card(col, card);
            }
        });
        ui.add_space(DesignSystem::SPACING_MEDIUM);

        Card::new().title("TECHNICAL INDICATORS").show(ui, |ui| {
            let indicators = ForecastViewModel::indicators(p);
            ui.columns(indicators.len(), |cols| {
                for (col, indicator) in cols.iter_mut().zip(&indicators) {
                    render_indicator(col, indicator);
                }
            });
        });
        ui.add_space(DesignSystem::SPACING_MEDIUM);

        ui.columns(2, |cols| {
            Card::new()
                .title("PRICE HISTORY (1Y)")
                .show(&mut cols[0], |ui| render_history_chart(ui, &p.ticker, &p.history));
            Card::new()
                .title("PROBABILITY CLOUD (30 DAYS)")
                .highlight(p.is_stressed().then_some(DesignSystem::ACCENT_SCENARIO))
                .show(&mut cols[1], |ui| {
                    render_probability_cloud(ui, &p.ticker, p.cloud.as_ref())
                });
        });
    }
}

impl eframe::App for ForecastApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(DesignSystem::theme());

        // Fold finished fetches into the controller before drawing
        self.agent.update();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("FusionQuant");
                ui.separator();
                ui.label(
                    egui::RichText::new("AI-powered market forecasting")
                        .color(DesignSystem::TEXT_SECONDARY),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let state = &self.agent.state().request;
                    let color = match state {
                        RequestState::Failed(_) => DesignSystem::DANGER,
                        RequestState::Loading { .. } => DesignSystem::WARNING,
                        _ => DesignSystem::SUCCESS,
                    };
                    ui.label(egui::RichText::new(format!("● {}", state.label())).color(color).small());
                });
            });
        });

        egui::CentralPanel::default()
            .frame(DesignSystem::main_frame())
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.render_search(ui);
                    ui.add_space(DesignSystem::SPACING_MEDIUM);
                    self.render_scenario(ui);
                    ui.add_space(DesignSystem::SPACING_LARGE);
                    self.render_result(ui);
                });
            });
    }
}
