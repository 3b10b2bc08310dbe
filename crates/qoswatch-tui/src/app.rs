//! Application core: event loop, action dispatch, and the bridge between
//! operator input and the dashboard controller.

use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use qoswatch_core::DashboardController;
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::action::Action;
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screens::dashboard::DashboardScreen;
use crate::tui::Tui;

/// Redraw period (~30 FPS). Surfaces are read fresh on every frame.
const RENDER_RATE: Duration = Duration::from_millis(33);

pub struct App {
    controller: DashboardController,
    screen: DashboardScreen,
    running: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(controller: DashboardController) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            screen: DashboardScreen::new(controller.clone()),
            controller,
            running: true,
            action_tx,
            action_rx,
        }
    }

    /// Run until the operator quits. The controller is shut down on the
    /// way out, whatever ended the loop.
    pub async fn run(&mut self) -> Result<()> {
        self.controller.start().await?;

        let result = self.event_loop().await;

        self.controller.shutdown().await;
        result
    }

    async fn event_loop(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.screen.init(self.action_tx.clone())?;

        let mut events = EventReader::new(RENDER_RATE);
        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Mouse(mouse) => {
                    if let Some(action) = self.screen.handle_mouse_event(mouse)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if action == Action::Render {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Global keys first, then the screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Ok(Some(Action::Quit)),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Ok(Some(Action::Quit))
            }
            _ => self.screen.handle_key_event(key),
        }
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
                return Ok(());
            }
            Action::SelectSwitch(switch) => {
                if self.controller.selection().set_switch(switch) {
                    debug!(%switch, "switch selected");
                }
            }
            Action::SelectPort(port) => {
                if self.controller.selection().set_port(port) {
                    debug!(%port, "port selected");
                }
            }
            Action::Hover(kind) => {
                if let Err(e) = self.controller.hover(*kind) {
                    warn!(%kind, error = %e, "hover refresh rejected");
                }
            }
            Action::RequestRefresh => {
                if let Err(e) = self.controller.request_refresh() {
                    warn!(error = %e, "manual refresh rejected");
                }
            }
            _ => {}
        }

        if let Some(follow_up) = self.screen.update(action)? {
            self.action_tx.send(follow_up)?;
        }
        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        self.screen.render(frame, frame.area());
    }
}
