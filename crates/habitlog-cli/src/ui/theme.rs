//! Badges, symbols and text styles.

use owo_colors::{OwoColorize, Style};

/// Badge types for status indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Ok,
    Warn,
    Err,
    Info,
}

impl Badge {
    /// Badge with symbol for display.
    pub fn display(&self, unicode: bool) -> &'static str {
        match (self, unicode) {
            (Self::Ok, true) => "[\u{2713}]",
            (Self::Ok, false) => "[OK]",
            (Self::Warn, true) => "[\u{26A0}]",
            (Self::Warn, false) => "[WARN]",
            (Self::Err, true) => "[\u{2717}]",
            (Self::Err, false) => "[ERR]",
            (Self::Info, true) => "[\u{2139}]",
            (Self::Info, false) => "[INFO]",
        }
    }

    pub fn style(&self) -> Style {
        match self {
            Self::Ok => styles::ok(),
            Self::Warn => styles::warn(),
            Self::Err => styles::err(),
            Self::Info => styles::info(),
        }
    }
}

/// Mark for a met / unmet threshold.
pub fn check_mark(met: bool, unicode: bool) -> &'static str {
    match (met, unicode) {
        (true, true) => "\u{2713}",
        (false, true) => "\u{00B7}",
        (true, false) => "yes",
        (false, false) => "no",
    }
}

pub mod styles {
    use owo_colors::Style;

    pub fn bold() -> Style {
        Style::new().bold()
    }

    pub fn dim() -> Style {
        Style::new().dimmed()
    }

    pub fn ok() -> Style {
        Style::new().green()
    }

    pub fn warn() -> Style {
        Style::new().yellow()
    }

    pub fn err() -> Style {
        Style::new().red()
    }

    pub fn info() -> Style {
        Style::new().cyan()
    }
}

/// Apply `style` when color is enabled.
pub fn styled(text: &str, style: Style, color: bool) -> String {
    if color {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}
