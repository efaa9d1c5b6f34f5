//! Browser binding (WASM only)
//!
//! The page owns rendering and the animation frame loop. It forwards DOM
//! events here, calls `frame` from `requestAnimationFrame` while `wantsFrame`
//! is true, and draws from the returned JSON event list.

use wasm_bindgen::prelude::*;

use crate::game::{EventLog, Game};
use crate::persistence::LocalStore;
use crate::platform::InputState;
use crate::settings::{Settings, Variant};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Balloon Catch (web) starting...");
}

#[wasm_bindgen]
pub struct WebGame {
    game: Game<LocalStore, EventLog>,
    input: InputState,
}

#[wasm_bindgen]
impl WebGame {
    /// Start a session sized to the play area element
    #[wasm_bindgen(constructor)]
    pub fn new(variant: &str, width: f32, height: f32) -> WebGame {
        let store = LocalStore::new();
        let mut settings = Settings::load_or_preset(&store, Variant::from_str(variant));
        settings.area_width = width;
        settings.area_height = height;

        let seed = js_sys::Date::now() as u64;
        WebGame {
            game: Game::new(settings, store, EventLog::new(), seed),
            input: InputState::new(),
        }
    }

    /// Run one frame; returns the frame's events as a JSON array
    pub fn frame(&mut self, timestamp_ms: f64) -> String {
        let input = self.input.take_tick_input();
        self.game.set_input(input);
        self.game.frame(timestamp_ms);
        self.drain_events()
    }

    fn drain_events(&mut self) -> String {
        let events = self.game.sink_mut().take();
        match serde_json::to_string(&events) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to encode {} events: {}", events.len(), e);
                "[]".to_string()
            }
        }
    }

    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: &str) -> bool {
        self.input.key_down(key)
    }

    #[wasm_bindgen(js_name = keyUp)]
    pub fn key_up(&mut self, key: &str) -> bool {
        self.input.key_up(key)
    }

    /// Pointer/touch x relative to the play area's left edge
    #[wasm_bindgen(js_name = dragTo)]
    pub fn drag_to(&mut self, x_px: f32) {
        let area = self.game.session().area;
        self.input.drag_to(x_px, &area);
    }

    pub fn tap(&mut self, x_px: f32) {
        let area = self.game.session().area;
        self.input.tap(x_px, &area);
    }

    pub fn pause(&mut self) -> bool {
        self.input.clear();
        self.game.pause()
    }

    pub fn resume(&mut self) -> bool {
        self.game.resume()
    }

    #[wasm_bindgen(js_name = togglePause)]
    pub fn toggle_pause(&mut self) -> bool {
        self.game.toggle_pause()
    }

    /// Restart and return the reset events as JSON
    pub fn restart(&mut self) -> String {
        self.input.clear();
        self.game.restart();
        self.drain_events()
    }

    pub fn stop(&mut self) {
        self.game.stop();
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.game.resize(width, height);
    }

    #[wasm_bindgen(js_name = wantsFrame)]
    pub fn wants_frame(&self) -> bool {
        self.game.wants_frame()
    }

    /// Paddle center in pixels for the renderer
    #[wasm_bindgen(js_name = paddleX)]
    pub fn paddle_x(&self) -> f32 {
        let session = self.game.session();
        session.paddle.center_px(&session.area)
    }

    #[wasm_bindgen(js_name = paddleWidth)]
    pub fn paddle_width(&self) -> f32 {
        self.game.session().paddle.width_px
    }

    pub fn score(&self) -> f64 {
        self.game.session().score as f64
    }

    pub fn lives(&self) -> u32 {
        self.game.session().lives
    }

    pub fn level(&self) -> u32 {
        self.game.session().level
    }

    #[wasm_bindgen(js_name = highScore)]
    pub fn high_score(&self) -> f64 {
        self.game.session().high_score as f64
    }

    pub fn multiplier(&self) -> u32 {
        self.game.session().combo.multiplier
    }

    #[wasm_bindgen(js_name = isPaused)]
    pub fn is_paused(&self) -> bool {
        self.game.session().is_paused()
    }

    /// Level-up flash on the live objects is still showing
    #[wasm_bindgen(js_name = flashActive)]
    pub fn flash_active(&self) -> bool {
        self.game.session().flash_active()
    }

    #[wasm_bindgen(js_name = isGameOver)]
    pub fn is_game_over(&self) -> bool {
        !self.game.session().is_running()
    }
}
