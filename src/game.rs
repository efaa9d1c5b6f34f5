//! Game loop driver
//!
//! Owns a session and its collaborators: settings, the high score ledger and
//! the event sink. Hosts call `frame` once per display refresh (or from a
//! fixed-rate timer) and keep scheduling frames while `wants_frame` is true.
//! Collaborator failures are logged here and never reach the tick.

use rand::Rng;
use thiserror::Error;

use crate::highscores::HighScoreLedger;
use crate::persistence::KeyValueStore;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameSession, TickInput, tick};

/// Failure of an event sink
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink is not ready")]
    NotReady,
    #[error("failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("sink i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Consumer of simulation events (renderer, audio, HUD)
pub trait EventSink {
    fn emit(&mut self, event: &GameEvent) -> Result<(), SinkError>;
}

impl<T: EventSink + ?Sized> EventSink for Box<T> {
    fn emit(&mut self, event: &GameEvent) -> Result<(), SinkError> {
        (**self).emit(event)
    }
}

/// Collects events in memory
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Drain everything collected so far
    pub fn take(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: &GameEvent) -> Result<(), SinkError> {
        self.events.push(event.clone());
        Ok(())
    }
}

/// A running game and its collaborators
pub struct Game<S: KeyValueStore, K: EventSink> {
    session: GameSession,
    settings: Settings,
    ledger: HighScoreLedger<S>,
    sink: K,
    input: TickInput,
    stopped: bool,
}

impl<S: KeyValueStore, K: EventSink> Game<S, K> {
    /// Start a game, loading the high score from `store`
    pub fn new(settings: Settings, store: S, sink: K, seed: u64) -> Self {
        let ledger = HighScoreLedger::open(store);
        let session = GameSession::new(&settings, seed, ledger.best());
        log::info!(
            "Game started ({} variant, seed {}, high score {})",
            settings.variant.as_str(),
            seed,
            ledger.best()
        );
        Self {
            session,
            settings,
            ledger,
            sink,
            input: TickInput::default(),
            stopped: false,
        }
    }

    /// Run one frame at `timestamp_ms`, returning the number of events produced.
    /// Pending input is consumed whether or not the tick ran.
    pub fn frame(&mut self, timestamp_ms: f64) -> usize {
        let input = std::mem::take(&mut self.input);
        if self.stopped {
            return 0;
        }
        let events = tick(&mut self.session, &input, timestamp_ms, &self.settings);
        for event in &events {
            self.dispatch(event);
        }
        events.len()
    }

    fn dispatch(&mut self, event: &GameEvent) {
        match event {
            GameEvent::HighScoreChanged { high_score } => {
                self.ledger.record_if_higher(*high_score);
            }
            GameEvent::GameOver { final_score, .. } => {
                self.ledger.record_if_higher(*final_score);
            }
            _ => {}
        }
        if let Err(e) = self.sink.emit(event) {
            log::warn!("Event sink dropped {}: {}", event.name(), e);
        }
    }

    fn emit_all(&mut self, events: &[GameEvent]) {
        for event in events {
            self.dispatch(event);
        }
    }

    /// Queue input for the next frame (replaces anything pending)
    pub fn set_input(&mut self, input: TickInput) {
        self.input = input;
    }

    pub fn move_left(&mut self) {
        self.input.move_left = true;
    }

    pub fn move_right(&mut self) {
        self.input.move_right = true;
    }

    /// Drag/touch to an x position in play area pixels
    pub fn drag_to(&mut self, x_px: f32) {
        self.input.target_percent = Some(self.session.area.px_to_percent(x_px));
    }

    /// Suspend the loop; returns false if there was nothing to pause
    pub fn pause(&mut self) -> bool {
        let paused = self.session.pause();
        if paused {
            log::info!("Paused");
        }
        paused
    }

    /// Resume from pause with a fresh clock baseline
    pub fn resume(&mut self) -> bool {
        let resumed = self.session.resume();
        if resumed {
            log::info!("Resumed");
        }
        resumed
    }

    pub fn toggle_pause(&mut self) -> bool {
        if self.session.is_paused() {
            self.resume()
        } else {
            self.pause()
        }
    }

    /// Reset the session for a new run (also revives a stopped game)
    pub fn restart(&mut self) {
        let seed = self.session.rng_mut().random::<u64>();
        self.session.high_score = self.session.high_score.max(self.ledger.best());
        self.session.reset(&self.settings, seed);
        self.stopped = false;
        self.input = TickInput::default();
        log::info!("Game restarted with seed: {}", seed);

        let session = &self.session;
        let events = [
            GameEvent::ScoreChanged {
                score: session.score,
            },
            GameEvent::LivesChanged {
                lives: session.lives,
            },
            GameEvent::ComboChanged {
                multiplier: session.combo.multiplier,
            },
        ];
        self.emit_all(&events);
    }

    /// Stop scheduling frames. Idempotent.
    pub fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            log::info!("Game stopped at score {}", self.session.score);
        }
    }

    /// Resize the play area (paddle width follows)
    pub fn resize(&mut self, width: f32, height: f32) {
        self.session.resize(width, height, &self.settings);
    }

    /// Whether the host should schedule another frame
    pub fn wants_frame(&self) -> bool {
        !self.stopped && self.session.is_running() && !self.session.is_paused()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn ledger(&self) -> &HighScoreLedger<S> {
        &self.ledger
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }
}
