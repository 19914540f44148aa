use crate::interfaces::design_system::DesignSystem;
use crate::interfaces::view_models::forecast_view_model::{IndicatorView, StatCardView};
use eframe::egui;

/// Headline card: title and icon, big value, muted caption
pub fn render_stat_card(ui: &mut egui::Ui, card: &StatCardView) {
    let card_size = egui::vec2(ui.available_width(), 100.0);

    ui.allocate_ui_with_layout(card_size, egui::Layout::top_down(egui::Align::LEFT), |ui| {
        egui::Frame::NONE
            .fill(DesignSystem::BG_CARD)
            .inner_margin(egui::Margin::same(12))
            .corner_radius(8)
            .shadow(egui::epaint::Shadow {
                offset: [0, 4],
                blur: 16,
                spread: 0,
                color: egui::Color32::from_black_alpha(100),
            })
            .stroke(egui::Stroke::new(1.0, egui::Color32::from_white_alpha(10)))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.set_height(76.0);

                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(card.title.to_uppercase())
                            .size(10.0)
                            .color(egui::Color32::from_gray(140))
                            .strong(),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(card.icon)
                                .size(14.0)
                                .color(card.value_color.linear_multiply(0.8)),
                        );
                    });
                });

                ui.add_space(6.0);
                ui.label(
                    egui::RichText::new(&card.value)
                        .size(24.0)
                        .strong()
                        .color(card.value_color),
                );

                ui.add_space(4.0);
                ui.label(
                    egui::RichText::new(&card.caption)
                        .size(10.0)
                        .color(egui::Color32::from_gray(120)),
                );
            });
    });
}

pub fn render_indicator(ui: &mut egui::Ui, indicator: &IndicatorView) {
    ui.vertical(|ui| {
        ui.label(
            egui::RichText::new(indicator.title.to_uppercase())
                .size(9.0)
                .color(egui::Color32::from_gray(120)),
        );
        ui.label(
            egui::RichText::new(&indicator.value)
                .size(16.0)
                .strong()
                .color(DesignSystem::TEXT_PRIMARY),
        );
        render_status_pill(ui, &indicator.verdict, indicator.color);
    });
}

/// Colored pill, used for verdicts and the fusion signal badge
pub fn render_status_pill(ui: &mut egui::Ui, text: &str, color: egui::Color32) {
    egui::Frame::NONE
        .fill(color.linear_multiply(0.15))
        .corner_radius(12)
        .inner_margin(egui::Margin::symmetric(8, 4))
        .show(ui, |ui| {
            ui.label(egui::RichText::new(text).size(12.0).strong().color(color));
        });
}
