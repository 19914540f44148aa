use crate::application::projection::ForecastProjection;
use crate::domain::signals::{Bias, RsiZone, SignalTone};
use crate::interfaces::design_system::DesignSystem;
use eframe::egui;

/// One headline card: big value plus a muted caption
pub struct StatCardView {
    pub icon: &'static str,
    pub title: &'static str,
    pub value: String,
    pub caption: String,
    pub value_color: egui::Color32,
}

/// One cell of the technical indicator row
pub struct IndicatorView {
    pub title: &'static str,
    pub value: String,
    pub verdict: String,
    pub color: egui::Color32,
}

pub struct ForecastViewModel;

impl ForecastViewModel {
    pub fn stat_cards(p: &ForecastProjection) -> Vec<StatCardView> {
        let range_caption = p
            .range
            .map(|range| format!("Est: {:.2} - {:.2}", range.low, range.high))
            .unwrap_or_default();

        let (confidence_value, confidence_color) = match p.probability_increase_pct {
            Some(pct) => (format!("{:.1}%", pct), Self::confidence_color(pct)),
            None => ("n/a".to_string(), DesignSystem::TEXT_MUTED),
        };

        vec![
            StatCardView {
                icon: "$",
                title: "Live Price",
                value: format!("${:.2}", p.last_close),
                caption: p.ticker.clone(),
                value_color: DesignSystem::TEXT_PRIMARY,
            },
            StatCardView {
                icon: "↗",
                title: "Prediction Range",
                value: format!("${:.2}", p.predicted_next_day),
                caption: range_caption,
                value_color: DesignSystem::ACCENT_PRIMARY,
            },
            StatCardView {
                icon: "~",
                title: "Volatility",
                value: format!("{:.2}%", p.volatility_pct),
                caption: if p.is_stressed() {
                    format!("Stressed x{:.1}", p.vol_multiplier)
                } else {
                    "Daily standard deviation".to_string()
                },
                value_color: if p.is_stressed() {
                    DesignSystem::ACCENT_SCENARIO
                } else {
                    DesignSystem::TEXT_PRIMARY
                },
            },
            StatCardView {
                icon: "%",
                title: "Confidence Index",
                value: confidence_value,
                caption: "Probability of >5% gain in 30 days".to_string(),
                value_color: confidence_color,
            },
        ]
    }

    pub fn indicators(p: &ForecastProjection) -> Vec<IndicatorView> {
        vec![
            IndicatorView {
                title: "RSI (14)",
                value: format!("{:.2}", p.rsi),
                verdict: p.rsi_zone.to_string(),
                color: Self::rsi_color(p.rsi_zone),
            },
            IndicatorView {
                title: "MACD",
                value: format!("{:.4}", p.macd),
                verdict: p.macd_trend.to_string(),
                color: Self::bias_color(p.macd_trend),
            },
            IndicatorView {
                title: "Sentiment",
                value: format!("{:.0}/100", p.sentiment),
                verdict: p.sentiment_bias.to_string(),
                color: Self::bias_color(p.sentiment_bias),
            },
        ]
    }

    pub fn signal_color(tone: SignalTone) -> egui::Color32 {
        match tone {
            SignalTone::Bullish => DesignSystem::SUCCESS,
            SignalTone::Bearish => DesignSystem::DANGER,
            SignalTone::Neutral => DesignSystem::WARNING,
        }
    }

    pub fn sentiment_color(bias: Bias) -> egui::Color32 {
        Self::bias_color(bias)
    }

    fn rsi_color(zone: RsiZone) -> egui::Color32 {
        match zone {
            RsiZone::Overbought => DesignSystem::DANGER,
            RsiZone::Oversold => DesignSystem::SUCCESS,
            RsiZone::Neutral => DesignSystem::TEXT_SECONDARY,
        }
    }

    fn bias_color(bias: Bias) -> egui::Color32 {
        match bias {
            Bias::Bullish => DesignSystem::SUCCESS,
            Bias::Bearish => DesignSystem::DANGER,
        }
    }

    fn confidence_color(pct: f64) -> egui::Color32 {
        if pct >= 50.0 {
            DesignSystem::SUCCESS
        } else if pct >= 20.0 {
            DesignSystem::WARNING
        } else {
            DesignSystem::DANGER
        }
    }
}
