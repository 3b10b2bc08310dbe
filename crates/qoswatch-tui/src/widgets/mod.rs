//! Panel renderers for the dashboard screen. Each takes the view's
//! surface by reference and draws it, or a placeholder, into an area.

pub mod history_table;
pub mod panel;
pub mod proportion_bars;
pub mod selector;
pub mod trend_chart;
