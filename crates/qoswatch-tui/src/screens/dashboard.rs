//! Dashboard screen: selector bar, the three live views, and a status
//! line with per-view refresh state.
//!
//! ```text
//! ┌ selector ──────────────────────────────────────────────────────┐
//! │ switch [1] port  2  (2/4)  ▸ s1-eth2                           │
//! └────────────────────────────────────────────────────────────────┘
//! ┌ trend ─────────────────────────────┐┌ proportion ──────────────┐
//! │ Braille lines, y in [0, 150]       ││ bandwidth ████████  40%  │
//! └────────────────────────────────────┘└──────────────────────────┘
//! ┌ history ───────────────────────────────────────────────────────┐
//! │ s1-eth2  bandwidth  delay  jitter  loss  latency               │
//! └────────────────────────────────────────────────────────────────┘
//!  trend ✓ 12:00:01  proportion ✓ 12:00:01  history ✗ timeout
//! ```

use std::cell::Cell;

use chrono::Local;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use qoswatch_core::{DashboardController, DeviceId, Surface, ViewKind};
use qoswatch_core::view::{HistoryFrame, ProportionFrame, TrendFrame};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use tokio::sync::{mpsc::UnboundedSender, watch};
use tracing::{debug, warn};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::{
    history_table::render_history,
    proportion_bars::render_proportions,
    selector::{SelectorField, selector_line},
    trend_chart::render_trend,
};

pub struct DashboardScreen {
    controller: DashboardController,
    trend: watch::Receiver<Surface<TrendFrame>>,
    proportion: watch::Receiver<Surface<ProportionFrame>>,
    history: watch::Receiver<Surface<HistoryFrame>>,
    action_tx: Option<UnboundedSender<Action>>,
    focus: SelectorField,
    /// Known ports for `ports_switch`.
    ports: Vec<String>,
    ports_switch: String,
    history_scroll: usize,
    hovered: Option<ViewKind>,
    /// Panel areas from the last render, in `ViewKind::ALL` order.
    panels: Cell<[Rect; 3]>,
}

impl DashboardScreen {
    pub fn new(controller: DashboardController) -> Self {
        Self {
            trend: controller.trend(),
            proportion: controller.proportion(),
            history: controller.history(),
            controller,
            action_tx: None,
            focus: SelectorField::default(),
            ports: Vec::new(),
            ports_switch: String::new(),
            history_scroll: 0,
            hovered: None,
            panels: Cell::new([Rect::default(); 3]),
        }
    }

    /// Look up the ports of `switch` in the background.
    fn load_ports(&mut self, switch: &str) {
        self.ports.clear();
        self.ports_switch = switch.to_owned();
        let Some(tx) = self.action_tx.clone() else {
            return;
        };
        if switch.is_empty() {
            return;
        }
        let controller = self.controller.clone();
        let switch = switch.to_owned();
        tokio::spawn(async move {
            match controller.port_ids(&switch).await {
                Ok(ports) => {
                    debug!(%switch, count = ports.len(), "ports loaded");
                    let _ = tx.send(Action::PortsLoaded { switch, ports });
                }
                Err(e) => warn!(%switch, error = %e, "port lookup failed"),
            }
        });
    }

    /// Next or previous value for the focused selector field.
    fn step(&self, forward: bool) -> Action {
        let values = self.controller.selection().values();
        match self.focus {
            SelectorField::Switch => Action::SelectSwitch(step_number(&values.switch, forward)),
            SelectorField::Port => Action::SelectPort(step_port(&values.port, &self.ports, forward)),
        }
    }

    /// Apply an edit of the focused field's text.
    fn edit(&self, edit: impl FnOnce(&mut String)) -> Action {
        let values = self.controller.selection().values();
        match self.focus {
            SelectorField::Switch => {
                let mut switch = values.switch;
                edit(&mut switch);
                Action::SelectSwitch(switch)
            }
            SelectorField::Port => {
                let mut port = values.port;
                edit(&mut port);
                Action::SelectPort(port)
            }
        }
    }

    fn panel_at(&self, column: u16, row: u16) -> Option<ViewKind> {
        let pos = Position::new(column, row);
        ViewKind::ALL
            .into_iter()
            .zip(self.panels.get())
            .find_map(|(kind, rect)| rect.contains(pos).then_some(kind))
    }

    fn render_selector(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Device ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let line = selector_line(&self.controller.selection().values(), self.focus, &self.ports);
        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, selected: Option<&DeviceId>) {
        let mut spans = vec![Span::raw(" ")];
        spans.extend(surface_status(ViewKind::Trend, &*self.trend.borrow(), selected));
        spans.extend(surface_status(
            ViewKind::Proportion,
            &*self.proportion.borrow(),
            selected,
        ));
        spans.extend(surface_status(ViewKind::History, &*self.history.borrow(), selected));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_hints(frame: &mut Frame, area: Rect) {
        let hint = |key: &'static str, what: &'static str| {
            [
                Span::styled(key, theme::key_hint_key()),
                Span::styled(what, theme::key_hint()),
            ]
        };
        let spans: Vec<Span> = [
            hint(" tab ", "field  "),
            hint("←/→ ", "step  "),
            hint("0-9 ", "edit  "),
            hint("r ", "refresh  "),
            hint("j/k ", "scroll  "),
            hint("q ", "quit"),
        ]
        .into_iter()
        .flatten()
        .collect();
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

impl Component for DashboardScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        let switch = self.controller.selection().values().switch;
        self.load_ports(&switch);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = self.focus.toggle();
                return Ok(None);
            }
            KeyCode::Left | KeyCode::Char('h' | '-') => self.step(false),
            KeyCode::Right | KeyCode::Char('l' | '+' | '=') => self.step(true),
            KeyCode::Char(c) if c.is_ascii_digit() => self.edit(|s| s.push(c)),
            KeyCode::Backspace => self.edit(|s| {
                s.pop();
            }),
            KeyCode::Up | KeyCode::Char('k') => Action::ScrollUp,
            KeyCode::Down | KeyCode::Char('j') => Action::ScrollDown,
            KeyCode::Char('r') => Action::RequestRefresh,
            _ => return Ok(None),
        };
        Ok(Some(action))
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let over = self.panel_at(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::ScrollDown if over == Some(ViewKind::History) => {
                Ok(Some(Action::ScrollDown))
            }
            MouseEventKind::ScrollUp if over == Some(ViewKind::History) => {
                Ok(Some(Action::ScrollUp))
            }
            MouseEventKind::Moved => {
                // Refresh on entering a panel, not on every motion inside it.
                let entered = over.filter(|kind| self.hovered != Some(*kind));
                self.hovered = over;
                Ok(entered.map(Action::Hover))
            }
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::SelectSwitch(switch) => {
                self.history_scroll = 0;
                if *switch != self.ports_switch {
                    self.load_ports(switch);
                }
            }
            Action::SelectPort(_) => self.history_scroll = 0,
            Action::PortsLoaded { switch, ports } => {
                if *switch == self.ports_switch {
                    self.ports.clone_from(ports);
                }
            }
            Action::ScrollUp => self.history_scroll = self.history_scroll.saturating_sub(1),
            Action::ScrollDown => {
                let rows = self
                    .history
                    .borrow()
                    .frame
                    .as_ref()
                    .map_or(0, |h| h.rows.len());
                self.history_scroll = (self.history_scroll + 1).min(rows.saturating_sub(1));
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let selected = self.controller.current_device_id().ok();
        let selected = selected.as_ref();

        let [selector_area, body, status_area, hints_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);
        let [top, history_area] =
            Layout::vertical([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(body);
        let [trend_area, proportion_area] =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(top);
        self.panels.set([trend_area, proportion_area, history_area]);

        self.render_selector(frame, selector_area);

        // Clone out of the watch so the lock is not held while drawing.
        let trend = self.trend.borrow().clone();
        let proportion = self.proportion.borrow().clone();
        let history = self.history.borrow().clone();
        let hovered = |kind| self.hovered == Some(kind);

        render_trend(frame, trend_area, &trend, selected, hovered(ViewKind::Trend));
        render_proportions(
            frame,
            proportion_area,
            &proportion,
            selected,
            hovered(ViewKind::Proportion),
        );
        render_history(
            frame,
            history_area,
            &history,
            selected,
            hovered(ViewKind::History),
            self.history_scroll,
        );

        self.render_status(frame, status_area, selected);
        Self::render_hints(frame, hints_area);
    }
}

/// "trend ✓ 12:00:01 " style status for one surface.
fn surface_status<F>(
    kind: ViewKind,
    surface: &Surface<F>,
    selected: Option<&DeviceId>,
) -> [Span<'static>; 2] {
    let label = Span::styled(format!("{kind} "), theme::key_hint());
    let state = if selected.is_none() || surface.device.as_ref() != selected {
        Span::styled("…  ", theme::placeholder())
    } else if let Some(err) = &surface.error {
        Span::styled(format!("✗ {}  ", err.kind()), theme::status_error())
    } else if let Some(at) = surface.refreshed_at {
        Span::styled(
            format!("✓ {}  ", at.with_timezone(&Local).format("%H:%M:%S")),
            theme::status_ok(),
        )
    } else {
        Span::styled("…  ", theme::placeholder())
    };
    [label, state]
}

/// Step a numeric id by one, never below 1. Non-numeric input restarts at 1.
fn step_number(current: &str, forward: bool) -> String {
    let next = match current.parse::<u64>() {
        Ok(n) if forward => n.saturating_add(1),
        Ok(n) => n.saturating_sub(1).max(1),
        Err(_) => 1,
    };
    next.to_string()
}

/// Cycle through the known ports, or step numerically when none are known.
fn step_port(current: &str, ports: &[String], forward: bool) -> String {
    let len = ports.len();
    if len == 0 {
        return step_number(current, forward);
    }
    let next = match (ports.iter().position(|p| p == current), forward) {
        (Some(i), true) => (i + 1) % len,
        (Some(i), false) => (i + len - 1) % len,
        (None, true) => 0,
        (None, false) => len - 1,
    };
    ports.get(next).cloned().unwrap_or_default()
}
