//! Proportion panel: one horizontal bar per metric, sized by its share
//! of the total.

use qoswatch_core::view::ProportionFrame;
use qoswatch_core::{DeviceId, Surface};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::panel::{current_frame, panel_block, render_placeholder};
use crate::theme;

const LABEL_WIDTH: usize = 10;

pub fn render_proportions(
    frame: &mut Frame,
    area: Rect,
    surface: &Surface<ProportionFrame>,
    selected: Option<&DeviceId>,
    hovered: bool,
) {
    let proportions = match current_frame(surface, selected) {
        Ok(proportions) => proportions,
        Err(message) => {
            render_placeholder(frame, area, panel_block("Proportion", hovered), &message);
            return;
        }
    };

    let block = panel_block(&proportions.caption, hovered);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // "  label      " + bar + " 100%"
    let bar_budget = usize::from(inner.width).saturating_sub(LABEL_WIDTH + 9);
    let lines: Vec<Line> = proportions
        .slices
        .iter()
        .take(usize::from(inner.height))
        .map(|slice| {
            Line::from(vec![
                Span::styled(
                    format!("  {:<LABEL_WIDTH$} ", slice.label),
                    Style::default().fg(theme::DIM_WHITE),
                ),
                Span::styled(
                    bar(slice.percent, bar_budget),
                    Style::default().fg(theme::metric_color(slice.kind)),
                ),
                Span::styled(
                    format!(" {:>4.0}%", slice.percent),
                    Style::default().fg(theme::DIM_WHITE),
                ),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::as_conversions
)]
fn bar(percent: f64, budget: usize) -> String {
    let width = (percent / 100.0 * budget as f64).round().max(0.0) as usize;
    "█".repeat(width.min(budget))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use qoswatch_core::view::{ProportionView, View};
    use qoswatch_core::{PerMetric, ProportionSet};
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::widgets::test_support::buffer_text;

    #[test]
    fn bar_scales_with_share() {
        assert_eq!(bar(50.0, 20), "█".repeat(10));
        assert_eq!(bar(0.0, 20), "");
        assert_eq!(bar(100.0, 0), "");
    }

    #[test]
    fn one_row_per_metric_with_percent() {
        let device = DeviceId::new("2", "5").unwrap();
        let set = ProportionSet::new(PerMetric {
            bandwidth: 2.0,
            delay: 1.0,
            jitter: 1.0,
            loss: 0.0,
            latency: 0.0,
        })
        .unwrap();
        let surface = Surface {
            device: Some(device.clone()),
            frame: Some(Arc::new(ProportionView::render(&device, set).unwrap())),
            error: None,
            refreshed_at: None,
        };

        let mut terminal = Terminal::new(TestBackend::new(70, 8)).unwrap();
        terminal
            .draw(|f| render_proportions(f, f.area(), &surface, Some(&device), true))
            .unwrap();
        let text = buffer_text(terminal.backend().buffer());
        let rows: Vec<&str> = text.lines().collect();

        assert!(rows[0].contains("Port s2-eth5 history QoS volatility"), "{text}");
        assert!(rows[1].contains("bandwidth"), "{text}");
        assert!(rows[1].trim_end_matches('│').trim_end().ends_with("50%"), "{text}");
        assert!(rows[2].contains("delay"), "{text}");
        assert!(rows[2].trim_end_matches('│').trim_end().ends_with("25%"), "{text}");
        assert!(rows[5].contains("latency"), "{text}");
        assert!(rows[5].trim_end_matches('│').trim_end().ends_with("0%"), "{text}");
    }
}
