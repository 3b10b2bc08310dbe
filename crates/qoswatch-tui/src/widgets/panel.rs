//! Shared panel chrome: bordered block, title, and what to show when a
//! surface has nothing to draw yet.

use std::sync::Arc;

use qoswatch_core::{DeviceId, Surface};
use ratatui::{
    Frame,
    layout::Rect,
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use crate::theme;

/// Rounded block titled with `title`. The hovered panel gets the accent
/// border.
pub fn panel_block(title: &str, hovered: bool) -> Block<'static> {
    Block::default()
        .title(format!(" {title} "))
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if hovered {
            theme::border_focused()
        } else {
            theme::border_default()
        })
}

/// The frame to draw for `selected`, or the message to show instead.
///
/// A frame is only returned when it belongs to the selected device, so
/// a panel never paints one device's data under another's selection.
pub fn current_frame<'a, F>(
    surface: &'a Surface<F>,
    selected: Option<&DeviceId>,
) -> Result<&'a Arc<F>, String> {
    let Some(selected) = selected else {
        return Err("Select a switch and port".into());
    };
    if surface.device.as_ref() != Some(selected) {
        return Err(format!("Loading {selected}…"));
    }
    match (&surface.frame, &surface.error) {
        (Some(frame), _) => Ok(frame),
        (None, Some(err)) => Err(err.to_string()),
        (None, None) => Err(format!("Loading {selected}…")),
    }
}

/// Draw `block` with `message` inside it.
pub fn render_placeholder(frame: &mut Frame, area: Rect, block: Block<'_>, message: &str) {
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new(format!("  {message}"))
            .style(theme::placeholder())
            .wrap(Wrap { trim: false }),
        inner,
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use qoswatch_core::FetchError;

    use super::*;

    #[test]
    fn no_selection_asks_for_one() {
        let surface: Surface<()> = Surface::default();
        assert_eq!(
            current_frame(&surface, None).unwrap_err(),
            "Select a switch and port"
        );
    }

    #[test]
    fn frame_for_other_device_is_not_shown() {
        let old = DeviceId::new("1", "1").unwrap();
        let selected = DeviceId::new("1", "2").unwrap();
        let surface = Surface {
            device: Some(old),
            frame: Some(Arc::new(())),
            error: None,
            refreshed_at: None,
        };
        assert_eq!(
            current_frame(&surface, Some(&selected)).unwrap_err(),
            "Loading s1-eth2…"
        );
    }

    #[test]
    fn error_without_frame_is_reported() {
        let device = DeviceId::new("3", "4").unwrap();
        let surface: Surface<()> = Surface {
            device: Some(device.clone()),
            frame: None,
            error: Some(FetchError::Timeout { timeout_ms: 100 }),
            refreshed_at: None,
        };
        assert_eq!(
            current_frame(&surface, Some(&device)).unwrap_err(),
            "Request timed out after 100ms"
        );
    }

    #[test]
    fn stale_frame_survives_an_error() {
        let device = DeviceId::new("3", "4").unwrap();
        let surface = Surface {
            device: Some(device.clone()),
            frame: Some(Arc::new(7_u8)),
            error: Some(FetchError::malformed("bad")),
            refreshed_at: None,
        };
        assert_eq!(**current_frame(&surface, Some(&device)).unwrap(), 7);
    }
}
