//! Selector bar: switch and port inputs plus the resolved device id.

use qoswatch_core::SelectorValues;
use ratatui::text::{Line, Span};

use crate::theme;

/// Which selector input receives step keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectorField {
    #[default]
    Switch,
    Port,
}

impl SelectorField {
    pub fn toggle(self) -> Self {
        match self {
            Self::Switch => Self::Port,
            Self::Port => Self::Switch,
        }
    }
}

/// Render the selector line. `ports` is the known port list for the
/// current switch, shown as a position hint when the port is in it.
pub fn selector_line(values: &SelectorValues, focus: SelectorField, ports: &[String]) -> Line<'static> {
    let field = |label: &str, value: &str, active: bool| {
        let shown = if value.is_empty() { "_" } else { value };
        let style = if active {
            theme::field_active()
        } else {
            theme::field_inactive()
        };
        [
            Span::styled(format!(" {label} "), theme::key_hint()),
            Span::styled(
                if active {
                    format!("[{shown}]")
                } else {
                    format!(" {shown} ")
                },
                style,
            ),
        ]
    };

    let mut spans = Vec::with_capacity(8);
    spans.extend(field("switch", &values.switch, focus == SelectorField::Switch));
    spans.extend(field("port", &values.port, focus == SelectorField::Port));

    if let Some(pos) = ports.iter().position(|p| *p == values.port) {
        spans.push(Span::styled(
            format!(" ({}/{})", pos + 1, ports.len()),
            theme::key_hint(),
        ));
    }

    spans.push(Span::styled("  ▸ ", theme::key_hint()));
    spans.push(match values.device_id() {
        Ok(device) => Span::styled(device.to_string(), theme::title_style()),
        Err(_) => Span::styled("no device", theme::placeholder()),
    });

    Line::from(spans)
}
