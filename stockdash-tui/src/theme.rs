//! Parrot/neon theme tokens for the stockdash TUI
//!
//! # Color Palette
//! - **Accent**: Electric cyan (focus, price line)
//! - **Positive**: Neon green (gains)
//! - **Negative**: Hot pink (losses, errors)
//! - **Warning**: Neon orange (alerts)
//! - **Neutral**: Cool purple (absent values)
//! - **Muted**: Steel blue (labels, secondary text)

use ratatui::style::{Color, Modifier, Style};

use stockdash_core::present::ReturnTone;

pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);

/// Color for a return cell or metric value.
pub fn tone_color(tone: ReturnTone) -> Color {
    match tone {
        ReturnTone::Positive => POSITIVE,
        ReturnTone::Negative => NEGATIVE,
        ReturnTone::Neutral => NEUTRAL,
    }
}

pub fn tone(tone: ReturnTone) -> Style {
    Style::default().fg(tone_color(tone))
}

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
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

pub fn panel_border(focused: bool) -> Style {
    if focused {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(focused: bool) -> Style {
    if focused {
        accent_bold()
    } else {
        muted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_colors() {
        assert_eq!(tone_color(ReturnTone::Positive), POSITIVE);
        assert_eq!(tone_color(ReturnTone::Negative), NEGATIVE);
        assert_eq!(tone_color(ReturnTone::Neutral), NEUTRAL);
    }

    #[test]
    fn focus_changes_border() {
        assert_eq!(panel_border(true).fg, Some(ACCENT));
        assert_eq!(panel_border(false).fg, Some(MUTED));
    }
}
