//! Balloon Catch entry point
//!
//! The browser build is driven from the page through `balloon_catch::web`.
//! Natively this runs a headless autopilot session at a fixed 60 Hz step and
//! prints discrete events as JSON lines on stdout.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::io::{BufWriter, Stdout, Write};
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use balloon_catch::persistence::FileStore;
    use balloon_catch::platform::{FixedStepTimer, InputState};
    use balloon_catch::sim::{GameEvent, GameSession};
    use balloon_catch::{EventSink, Game, Settings, SinkError};

    const SETTINGS_ENV: &str = "BALLOON_CATCH_SETTINGS";
    const DATA_FILE: &str = "balloon_catch_data.json";
    /// Ten minutes of play at 60 Hz
    const MAX_FRAMES: u32 = 36_000;

    /// Writes one JSON object per discrete event
    struct JsonLines {
        out: BufWriter<Stdout>,
        written: usize,
    }

    impl JsonLines {
        fn new() -> Self {
            Self {
                out: BufWriter::new(std::io::stdout()),
                written: 0,
            }
        }
    }

    impl EventSink for JsonLines {
        fn emit(&mut self, event: &GameEvent) -> Result<(), SinkError> {
            if event.is_motion() {
                return Ok(());
            }
            serde_json::to_writer(&mut self.out, event)?;
            self.out.write_all(b"\n")?;
            self.written += 1;
            Ok(())
        }
    }

    fn load_settings() -> Settings {
        let path = std::env::args()
            .nth(1)
            .or_else(|| std::env::var(SETTINGS_ENV).ok())
            .map(PathBuf::from);
        let Some(path) = path else {
            return Settings::default();
        };
        match Settings::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!(
                    "Could not load settings from {}: {}; using defaults",
                    path.display(),
                    e
                );
                Settings::default()
            }
        }
    }

    fn seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }

    /// Steer toward the lowest object by holding the arrow keys
    fn autopilot(session: &GameSession, input: &mut InputState) {
        let Some(target) = session
            .objects
            .iter()
            .max_by(|a, b| a.bottom().total_cmp(&b.bottom()))
        else {
            input.key_up("ArrowLeft");
            input.key_up("ArrowRight");
            return;
        };
        let paddle_x = session.paddle.center_px(&session.area);
        let step_px = session.area.percent_to_px(session.paddle.speed_percent);
        let offset = target.center_x() - paddle_x;
        if offset < -step_px / 2.0 {
            input.key_up("ArrowRight");
            input.key_down("ArrowLeft");
        } else if offset > step_px / 2.0 {
            input.key_up("ArrowLeft");
            input.key_down("ArrowRight");
        } else {
            input.key_up("ArrowLeft");
            input.key_up("ArrowRight");
        }
    }

    pub fn run() {
        env_logger::init();
        log::info!("Balloon Catch (headless) starting...");

        let settings = load_settings();
        let store = FileStore::new(DATA_FILE);
        let mut game = Game::new(settings, store, JsonLines::new(), seed());
        let mut input = InputState::new();
        let mut timer = FixedStepTimer::with_hz(60);

        let mut frames = 0;
        while game.wants_frame() && frames < MAX_FRAMES {
            autopilot(game.session(), &mut input);
            game.set_input(input.take_tick_input());
            game.frame(timer.next_timestamp());
            frames += 1;
        }
        game.stop();

        if let Err(e) = game.sink_mut().out.flush() {
            log::warn!("Failed to flush event output: {}", e);
        }

        let session = game.session();
        log::info!(
            "Finished after {} frames ({:.1}s): score {}, level {}, lives {}, best {}, {} events",
            frames,
            timer.now_ms() / 1000.0,
            session.score,
            session.level,
            session.lives,
            game.ledger().best(),
            game.sink().written
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is balloon_catch::web::start, this is just to satisfy the compiler
}
