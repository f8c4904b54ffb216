use crate::core::controller::RoundController;
use crate::core::renderer;
use crate::core::round::{CreatureId, Round};
use crate::core::session::{GuessOutcome, Session};
use crate::error::RoundError;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::debug;

/// Redraw / input poll period
const FRAME: Duration = Duration::from_millis(16);

/// Completions coming back from background work
#[derive(Debug)]
pub enum EngineEvent {
    RoundLoaded {
        id: CreatureId,
        result: Result<Round, RoundError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Owns the session; every key press and load completion goes through here, one at a time.
pub struct Engine {
    controller: Arc<RoundController>,
    session: Session,
}

impl Engine {
    pub fn new(controller: Arc<RoundController>) -> Self {
        Self {
            controller,
            session: Session::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Kick off a round load in the background. Ignored while one is already loading,
    /// the same way the new-round button is disabled.
    pub fn request_round(&mut self, events: &UnboundedSender<EngineEvent>) -> bool {
        if self.session.is_loading() {
            debug!("new round requested while loading; ignored");
            return false;
        }
        self.session.begin_loading();
        let id = self.controller.pick_creature_id();
        let controller = self.controller.clone();
        let events = events.clone();
        tokio::spawn(async move {
            let result = controller.load_round(id).await;
            // The receiver only goes away when the engine has quit.
            let _ = events.send(EngineEvent::RoundLoaded { id, result });
        });
        true
    }

    pub fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::RoundLoaded { id, result } => {
                // Already logged by the controller; the session carries the failure.
                let _ = self.controller.finish_round(&mut self.session, id, result);
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, events: &UnboundedSender<EngineEvent>) -> Control {
        if key.kind != KeyEventKind::Press {
            return Control::Continue;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => return Control::Quit,
            KeyCode::Char('c') if ctrl => return Control::Quit,
            KeyCode::F(2) => {
                self.request_round(events);
            }
            KeyCode::Char('n') if ctrl => {
                self.request_round(events);
            }
            KeyCode::Enter => {
                self.guess();
            }
            KeyCode::Backspace => {
                self.session.input.pop();
            }
            KeyCode::Char(c) if !ctrl => self.session.input.push(c),
            _ => {}
        }
        Control::Continue
    }

    fn guess(&mut self) -> GuessOutcome {
        let input = self.session.input.clone();
        self.controller.submit_guess(&mut self.session, &input)
    }

    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<Session> {
        let (events_tx, mut events_rx) = mpsc::unbounded_channel::<EngineEvent>();
        self.request_round(&events_tx);

        loop {
            terminal.draw(|f| {
                if let Some(cursor) = renderer::render(f, &self.session) {
                    f.set_cursor_position(cursor);
                }
            })?;

            // INPUT (Non-blocking)
            if event::poll(Duration::from_millis(0))? {
                if let Event::Key(key) = event::read()? {
                    if self.handle_key(key, &events_tx) == Control::Quit {
                        break;
                    }
                }
            }

            tokio::select! {
                Some(event) = events_rx.recv() => {
                    self.handle_event(event);
                }
                _ = tokio::time::sleep(FRAME) => {}
            }
        }

        Ok(self.session)
    }
}
