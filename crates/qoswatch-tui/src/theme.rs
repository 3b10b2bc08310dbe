//! Palette and semantic styles for the dashboard.

use qoswatch_core::MetricKind;
use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const ELECTRIC_PURPLE: Color = Color::Rgb(225, 53, 255); // #e135ff
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const CORAL: Color = Color::Rgb(255, 106, 193); // #ff6ac1
pub const ELECTRIC_YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36
pub const LIGHT_BLUE: Color = Color::Rgb(139, 233, 253); // #8be9fd

/// Series color for a metric. Shared by the trend lines and the
/// proportion bars so the same metric reads the same everywhere.
pub fn metric_color(kind: MetricKind) -> Color {
    match kind {
        MetricKind::Bandwidth => NEON_CYAN,
        MetricKind::Delay => CORAL,
        MetricKind::Jitter => ELECTRIC_PURPLE,
        MetricKind::Loss => ELECTRIC_YELLOW,
        MetricKind::Latency => LIGHT_BLUE,
    }
}

// ── Semantic Styles ───────────────────────────────────────────────────

pub fn title_style() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

/// Border for the panel under the pointer.
pub fn border_focused() -> Style {
    Style::default().fg(ELECTRIC_PURPLE)
}

pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn table_header() -> Style {
    Style::default()
        .fg(NEON_CYAN)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Newest history row.
pub fn table_latest() -> Style {
    Style::default()
        .fg(ELECTRIC_PURPLE)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Selector field with input focus.
pub fn field_active() -> Style {
    Style::default()
        .fg(ELECTRIC_PURPLE)
        .add_modifier(Modifier::BOLD)
}

pub fn field_inactive() -> Style {
    Style::default().fg(DIM_WHITE)
}

pub fn status_ok() -> Style {
    Style::default().fg(SUCCESS_GREEN)
}

pub fn status_error() -> Style {
    Style::default().fg(ERROR_RED)
}

/// Placeholder text in empty panels.
pub fn placeholder() -> Style {
    Style::default().fg(BORDER_GRAY).add_modifier(Modifier::ITALIC)
}

pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}
