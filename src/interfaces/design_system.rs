use eframe::egui;
use egui::{Color32, Frame, Margin, Stroke};

/// Zinc surfaces with violet, cyan and pink chart accents
pub struct DesignSystem;

impl DesignSystem {
    // Surfaces
    pub const BG_WINDOW: Color32 = Color32::from_rgb(9, 9, 11); // zinc-950
    pub const BG_CARD: Color32 = Color32::from_rgb(24, 24, 27); // zinc-900
    pub const BORDER: Color32 = Color32::from_rgb(39, 39, 42); // zinc-800

    // Text
    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(250, 250, 250);
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(161, 161, 170);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(113, 113, 122);

    // Accents: violet for the baseline, orange once the scenario is stressed
    pub const ACCENT_PRIMARY: Color32 = Color32::from_rgb(139, 92, 246);
    pub const ACCENT_SCENARIO: Color32 = Color32::from_rgb(249, 115, 22);

    // Signals
    pub const SUCCESS: Color32 = Color32::from_rgb(34, 197, 94);
    pub const DANGER: Color32 = Color32::from_rgb(239, 68, 68);
    pub const WARNING: Color32 = Color32::from_rgb(234, 179, 8);

    // Charts
    pub const HISTORY_LINE: Color32 = Color32::from_rgb(6, 182, 212); // cyan-500
    pub const CLOUD_BAND: Color32 = Color32::from_rgb(236, 72, 153); // pink-500
    pub const CLOUD_MEAN: Color32 = Color32::from_rgb(244, 114, 182);

    pub const RADIUS: f32 = 12.0;
    pub const SPACING_SMALL: f32 = 8.0;
    pub const SPACING_MEDIUM: f32 = 16.0;
    pub const SPACING_LARGE: f32 = 24.0;

    pub fn theme() -> egui::Visuals {
        let mut visuals = egui::Visuals::dark();
        visuals.window_fill = Self::BG_WINDOW;
        visuals.panel_fill = Self::BG_WINDOW;
        visuals.extreme_bg_color = Self::BG_CARD;

        let widgets = &mut visuals.widgets;
        widgets.noninteractive.bg_stroke = Stroke::new(1.0, Self::BORDER);
        widgets.noninteractive.fg_stroke = Stroke::new(1.0, Self::TEXT_PRIMARY);
        widgets.inactive.fg_stroke = Stroke::new(1.0, Self::TEXT_SECONDARY);
        widgets.inactive.bg_fill = Self::BG_CARD;
        widgets.inactive.weak_bg_fill = Self::BG_CARD;

        visuals.selection.bg_fill = Self::ACCENT_PRIMARY.linear_multiply(0.35);
        visuals.selection.stroke = Stroke::new(1.0, Self::ACCENT_PRIMARY);
        visuals
    }

    pub fn card_frame() -> Frame {
        Frame::NONE
            .fill(Self::BG_CARD)
            .stroke(Stroke::new(1.0, Self::BORDER))
            .corner_radius(Self::RADIUS)
            .inner_margin(Margin::same(Self::SPACING_MEDIUM as i8))
    }

    pub fn main_frame() -> Frame {
        Frame::NONE
            .fill(Self::BG_WINDOW)
            .inner_margin(Margin::same(Self::SPACING_LARGE as i8))
    }

    /// Tinted strip for the error message and payload warnings
    pub fn banner_frame(tint: Color32) -> Frame {
        Frame::NONE
            .fill(tint.linear_multiply(0.12))
            .stroke(Stroke::new(1.0, tint.linear_multiply(0.6)))
            .corner_radius(Self::RADIUS)
            .inner_margin(Margin::symmetric(12, 8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_uses_dashboard_surfaces() {
        let visuals = DesignSystem::theme();
        assert!(visuals.dark_mode);
        assert_eq!(visuals.panel_fill, DesignSystem::BG_WINDOW);
        assert_eq!(visuals.window_fill, DesignSystem::BG_WINDOW);
        assert_eq!(visuals.widgets.inactive.bg_fill, DesignSystem::BG_CARD);
    }

    #[test]
    fn test_banner_is_a_faint_tint_of_its_colour() {
        let frame = DesignSystem::banner_frame(DesignSystem::DANGER);
        assert!(frame.fill.a() < DesignSystem::DANGER.a());
        assert_eq!(frame.corner_radius, egui::CornerRadius::same(12));
    }

    #[test]
    fn test_stress_accent_differs_from_baseline() {
        assert_ne!(DesignSystem::ACCENT_SCENARIO, DesignSystem::ACCENT_PRIMARY);
        assert_ne!(DesignSystem::CLOUD_BAND, DesignSystem::HISTORY_LINE);
    }
}
