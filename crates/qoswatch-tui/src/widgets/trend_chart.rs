//! Trend panel: one Braille line per metric over the sample index, with
//! a dot on every sample.

use qoswatch_core::view::TrendFrame;
use qoswatch_core::view::trend::TREND_Y_BOUNDS;
use qoswatch_core::{DeviceId, Surface};
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::Style,
    symbols::Marker,
    text::Span,
    widgets::{Axis, Chart, Dataset, GraphType},
};

use super::panel::{current_frame, panel_block, render_placeholder};
use crate::theme;

pub fn render_trend(
    frame: &mut Frame,
    area: Rect,
    surface: &Surface<TrendFrame>,
    selected: Option<&DeviceId>,
    hovered: bool,
) {
    let trend = match current_frame(surface, selected) {
        Ok(trend) => trend,
        Err(message) => {
            render_placeholder(frame, area, panel_block("Trend", hovered), &message);
            return;
        }
    };

    let lines = trend.lines.iter().map(|line| {
        Dataset::default()
            .name(line.kind.label())
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme::metric_color(line.kind)))
            .data(&line.points)
    });
    // Unnamed so the legend lists each metric once. Drawn after the lines
    // so no line covers a sample.
    let points = trend.lines.iter().map(|line| {
        Dataset::default()
            .marker(Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(theme::metric_color(line.kind)))
            .data(&line.points)
    });
    let datasets: Vec<Dataset> = lines.chain(points).collect();

    let axis_style = Style::default().fg(theme::BORDER_GRAY);
    let [y_min, y_max] = TREND_Y_BOUNDS;
    let x_max = trend.x_max.max(1.0);

    let chart = Chart::new(datasets)
        .block(panel_block(&trend.caption, hovered))
        .x_axis(
            Axis::default()
                .bounds([0.0, x_max])
                .labels(vec![
                    Span::styled("0", axis_style),
                    Span::styled(format!("{x_max:.0}"), axis_style),
                ])
                .style(axis_style),
        )
        .y_axis(
            Axis::default()
                .bounds(TREND_Y_BOUNDS)
                .labels(vec![
                    Span::styled(format!("{y_min:.0}"), axis_style),
                    Span::styled(format!("{:.0}", (y_min + y_max) / 2.0), axis_style),
                    Span::styled(format!("{y_max:.0}"), axis_style),
                ])
                .style(axis_style),
        )
        .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)));

    frame.render_widget(chart, area);
}
