//! History panel: newest sample first, one column per metric.

use qoswatch_core::view::HistoryFrame;
use qoswatch_core::{DeviceId, MetricKind, Surface};
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    widgets::{Row, Table},
};

use super::panel::{current_frame, panel_block, render_placeholder};
use crate::theme;

/// Draw the history table starting `scroll` rows below the newest.
/// `scroll` is clamped to the last row.
pub fn render_history(
    frame: &mut Frame,
    area: Rect,
    surface: &Surface<HistoryFrame>,
    selected: Option<&DeviceId>,
    hovered: bool,
    scroll: usize,
) {
    let history = match current_frame(surface, selected) {
        Ok(history) => history,
        Err(message) => {
            render_placeholder(frame, area, panel_block("History", hovered), &message);
            return;
        }
    };

    let scroll = scroll.min(history.rows.len().saturating_sub(1));
    let rows: Vec<Row> = history
        .rows
        .iter()
        .enumerate()
        .skip(scroll)
        .map(|(i, row)| {
            let cells = std::iter::once(row.time.clone())
                .chain(MetricKind::ALL.iter().map(|&k| format_value(*row.values.get(k))));
            Row::new(cells).style(if i == 0 {
                theme::table_latest()
            } else {
                theme::table_row()
            })
        })
        .collect();

    let first_width = history
        .rows
        .iter()
        .map(|row| row.time.chars().count())
        .chain(history.header.first().map(|h| h.chars().count()))
        .max()
        .unwrap_or(8);
    let widths = std::iter::once(Constraint::Length(
        u16::try_from(first_width).unwrap_or(u16::MAX),
    ))
    .chain(MetricKind::ALL.iter().map(|_| Constraint::Fill(1)));

    let table = Table::new(rows, widths)
        .header(Row::new(history.header.clone()).style(theme::table_header()))
        .block(panel_block(&history.caption, hovered))
        .column_spacing(2);

    frame.render_widget(table, area);
}

/// Whole numbers print bare; anything else to two decimals.
pub fn format_value(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use qoswatch_core::view::{HistoryView, View};
    use qoswatch_core::{HistoryTable, PerMetric};
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::widgets::test_support::buffer_text;

    fn surface(device: &DeviceId) -> Surface<HistoryFrame> {
        let table = HistoryTable::from_columns(
            vec!["10:00".into(), "10:01".into(), "10:02".into()],
            PerMetric {
                bandwidth: vec![1.0, 2.0, 3.5],
                delay: vec![0.0; 3],
                jitter: vec![0.0; 3],
                loss: vec![0.0; 3],
                latency: vec![9.0; 3],
            },
        )
        .unwrap();
        Surface {
            device: Some(device.clone()),
            frame: Some(Arc::new(HistoryView::render(device, table).unwrap())),
            error: None,
            refreshed_at: None,
        }
    }

    fn draw(surface: &Surface<HistoryFrame>, device: &DeviceId, scroll: usize) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(90, 8)).unwrap();
        terminal
            .draw(|f| render_history(f, f.area(), surface, Some(device), false, scroll))
            .unwrap();
        buffer_text(terminal.backend().buffer())
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn formats_values() {
        assert_eq!(format_value(3.0), "3");
        assert_eq!(format_value(3.456), "3.46");
    }

    #[test]
    fn header_then_newest_first() {
        let device = DeviceId::new("1", "2").unwrap();
        let rows = draw(&surface(&device), &device, 0);

        assert!(rows[1].contains("s1-eth2"), "{rows:#?}");
        assert!(rows[1].contains("bandwidth"), "{rows:#?}");
        assert!(rows[1].contains("latency"), "{rows:#?}");
        assert!(rows[2].contains("10:02"), "{rows:#?}");
        assert!(rows[2].contains("3.50"), "{rows:#?}");
        assert!(rows[3].contains("10:01"), "{rows:#?}");
        assert!(rows[4].contains("10:00"), "{rows:#?}");
    }

    #[test]
    fn scroll_skips_newest_and_clamps() {
        let device = DeviceId::new("1", "2").unwrap();
        let rows = draw(&surface(&device), &device, 1);
        assert!(rows[2].contains("10:01"), "{rows:#?}");

        let rows = draw(&surface(&device), &device, 99);
        assert!(rows[2].contains("10:00"), "{rows:#?}");
        assert!(!rows.iter().any(|r| r.contains("10:02")), "{rows:#?}");
    }
}
