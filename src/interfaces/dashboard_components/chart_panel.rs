use crate::application::projection::{PriceSeries, ProbabilityCloud};
use crate::interfaces::design_system::DesignSystem;
use eframe::egui;
use egui_plot::{Legend, Line, LineStyle, Plot, PlotPoints, Polygon};

const BAND_NAME: &str = "Range (p10 - p90)";

/// Closing prices over the last year, x axis labelled by date
pub fn render_history_chart(ui: &mut egui::Ui, ticker: &str, history: &PriceSeries) {
    if history.points.is_empty() {
        ui.centered_and_justified(|ui| {
            ui.label(
                egui::RichText::new("No price history available.")
                    .italics()
                    .color(DesignSystem::TEXT_MUTED),
            );
        });
        return;
    }

    let floor = history
        .points
        .iter()
        .map(|p| p[1])
        .fold(f64::INFINITY, f64::min);

    Plot::new(format!("history_{}", ticker))
        .height(260.0)
        .show_grid([true, true])
        .allow_scroll(false)
        .x_axis_formatter(|mark, _range| {
            history
                .date_at(mark.value)
                .map(str::to_string)
                .unwrap_or_default()
        })
        .label_formatter(|_name, value| match history.date_at(value.x.round()) {
            Some(date) => format!("{}\n${:.2}", date, value.y),
            None => format!("${:.2}", value.y),
        })
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new("Close", PlotPoints::from(history.points.clone()))
                    .color(DesignSystem::HISTORY_LINE)
                    .width(2.0)
                    .fill(floor as f32),
            );
        });
}

/// p10..p90 band with the dashed mean path on top
pub fn render_probability_cloud(ui: &mut egui::Ui, ticker: &str, cloud: Option<&ProbabilityCloud>) {
    let Some(cloud) = cloud else {
        ui.centered_and_justified(|ui| {
            ui.label(
                egui::RichText::new("No simulation data in this forecast.")
                    .italics()
                    .color(DesignSystem::TEXT_MUTED),
            );
        });
        return;
    };

    Plot::new(format!("cloud_{}", ticker))
        .height(260.0)
        .show_grid([true, true])
        .allow_scroll(false)
        .legend(Legend::default())
        .x_axis_formatter(|mark, _range| format!("Day {}", mark.value as i64))
        .show(ui, |plot_ui| {
            // Shared name keeps the quads and edges as one legend entry
            for quad in cloud.band_segments() {
                plot_ui.polygon(
                    Polygon::new(BAND_NAME, PlotPoints::from(quad.to_vec()))
                        .fill_color(DesignSystem::CLOUD_BAND.linear_multiply(0.3))
                        .stroke(egui::Stroke::NONE),
                );
            }
            for edge in [&cloud.upper, &cloud.lower] {
                plot_ui.line(
                    Line::new(BAND_NAME, PlotPoints::from(edge.clone()))
                        .color(DesignSystem::CLOUD_BAND)
                        .width(1.0),
                );
            }
            plot_ui.line(
                Line::new("Mean", PlotPoints::from(cloud.mean.clone()))
                    .color(DesignSystem::CLOUD_MEAN)
                    .width(2.0)
                    .style(LineStyle::dashed_loose()),
            );
        });
}
