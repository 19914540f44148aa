//! Display classifications derived from raw indicator values.

use std::fmt;

/// Direction carried by the service's composite `fusion_signal` label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalTone {
    Bullish,
    Bearish,
    Neutral,
}

impl SignalTone {
    /// "Strong Buy" and "Buy" are bullish, "Sell" variants bearish, anything else neutral.
    pub fn from_fusion_label(label: &str) -> Self {
        if label.contains("Buy") {
            Self::Bullish
        } else if label.contains("Sell") {
            Self::Bearish
        } else {
            Self::Neutral
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsiZone {
    Overbought,
    Oversold,
    Neutral,
}

impl RsiZone {
    pub const OVERBOUGHT: f64 = 70.0;
    pub const OVERSOLD: f64 = 30.0;

    pub fn from_rsi(rsi: f64) -> Self {
        if rsi > Self::OVERBOUGHT {
            Self::Overbought
        } else if rsi < Self::OVERSOLD {
            Self::Oversold
        } else {
            Self::Neutral
        }
    }
}

impl fmt::Display for RsiZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overbought => write!(f, "Overbought"),
            Self::Oversold => write!(f, "Oversold"),
            Self::Neutral => write!(f, "Neutral"),
        }
    }
}

/// Bullish/bearish reading used for both the MACD trend and the sentiment bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    Bullish,
    Bearish,
}

impl Bias {
    pub fn from_macd(macd: f64) -> Self {
        if macd > 0.0 { Self::Bullish } else { Self::Bearish }
    }

    /// Sentiment is on a 0-100 scale; 50 and below reads bearish.
    pub fn from_sentiment(sentiment: f64) -> Self {
        if sentiment > 50.0 {
            Self::Bullish
        } else {
            Self::Bearish
        }
    }
}

impl fmt::Display for Bias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bullish => write!(f, "Bullish"),
            Self::Bearish => write!(f, "Bearish"),
        }
    }
}
