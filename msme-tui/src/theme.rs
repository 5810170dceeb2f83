//! Parrot/neon theme tokens for the dashboard.
//!
//! # Color Palette
//! - **Accent**: Electric cyan (focus, headings)
//! - **Positive**: Neon green (healthy book, green zone)
//! - **Negative**: Hot pink (NPA, red zone, errors)
//! - **Warning**: Neon orange (upcoming NPA, alerts)
//! - **Neutral**: Cool purple (secondary info)
//! - **Muted**: Steel blue (labels, hints)

use ratatui::style::{Color, Modifier, Style};

use msme_core::analyzer::RiskBand;
use msme_core::domain::{RiskZone, Segment};

pub const BACKGROUND: Color = Color::Rgb(18, 18, 20);
pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const CAUTION: Color = Color::Rgb(255, 230, 0);

/// Theme for the dashboard.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    /// Yellow zone; between positive and warning.
    pub caution: Color,
    pub neutral: Color,
    pub muted: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::parrot_neon()
    }
}

impl Theme {
    pub fn parrot_neon() -> Self {
        Self {
            background: BACKGROUND,
            accent: ACCENT,
            positive: POSITIVE,
            negative: NEGATIVE,
            warning: WARNING,
            caution: CAUTION,
            neutral: NEUTRAL,
            muted: MUTED,
            text_primary: Color::White,
            text_secondary: Color::Rgb(170, 170, 170),
        }
    }

    pub fn band_color(&self, band: RiskBand) -> Color {
        match band {
            RiskBand::Low => self.positive,
            RiskBand::Moderate => self.warning,
            RiskBand::High => self.negative,
        }
    }

    pub fn zone_color(&self, zone: RiskZone) -> Color {
        match zone {
            RiskZone::Green => self.positive,
            RiskZone::Yellow => self.caution,
            RiskZone::Orange => self.warning,
            RiskZone::Red => self.negative,
            RiskZone::Unclassified => self.text_secondary,
        }
    }

    /// Segments borrow the color of the zone they imply.
    pub fn segment_color(&self, segment: Segment) -> Color {
        self.zone_color(segment.implied_zone())
    }

    /// Color for a percentage where higher is better (coverage, adoption).
    pub fn coverage_color(&self, pct: f64) -> Color {
        match pct {
            p if p >= 75.0 => self.positive,
            p if p >= 50.0 => self.accent,
            p if p >= 25.0 => self.warning,
            _ => self.negative,
        }
    }
}

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

pub fn fg(color: Color) -> Style {
    Style::default().fg(color)
}
