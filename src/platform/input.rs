//! Input collection between frames
//!
//! Host event handlers write here; the frame loop drains it into one
//! `TickInput`. A held key steps the paddle on every tick until released, a
//! press shorter than one frame still steps once, and a drag replaces any
//! earlier drag in the same frame.

use crate::sim::{PlayArea, TickInput};

#[derive(Debug, Clone, Default)]
pub struct InputState {
    left_queued: bool,
    right_queued: bool,
    left_held: bool,
    right_held: bool,
    target_percent: Option<f32>,
    pause_requested: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key press by its DOM `key` name. Returns true if the key is bound.
    pub fn key_down(&mut self, key: &str) -> bool {
        match key {
            "ArrowLeft" | "a" | "A" => {
                self.left_held = true;
                self.left_queued = true;
            }
            "ArrowRight" | "d" | "D" => {
                self.right_held = true;
                self.right_queued = true;
            }
            "Escape" | "p" | "P" => self.pause_requested = true,
            _ => return false,
        }
        true
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        match key {
            "ArrowLeft" | "a" | "A" => self.left_held = false,
            "ArrowRight" | "d" | "D" => self.right_held = false,
            _ => return false,
        }
        true
    }

    /// Drag/touch at `x_px` relative to the play area's left edge
    pub fn drag_to(&mut self, x_px: f32, area: &PlayArea) {
        if x_px.is_finite() {
            self.target_percent = Some(area.px_to_percent(x_px));
        }
    }

    /// Tap on one half of the play area steps toward it
    pub fn tap(&mut self, x_px: f32, area: &PlayArea) {
        if !x_px.is_finite() {
            return;
        }
        if x_px < area.width / 2.0 {
            self.left_queued = true;
        } else {
            self.right_queued = true;
        }
    }

    pub fn request_pause(&mut self) {
        self.pause_requested = true;
    }

    /// Drain queued input into one tick's worth of commands.
    /// Held flags survive; everything else is one-shot.
    pub fn take_tick_input(&mut self) -> TickInput {
        let input = TickInput {
            move_left: self.left_queued || self.left_held,
            move_right: self.right_queued || self.right_held,
            target_percent: self.target_percent,
            pause: self.pause_requested,
        };
        self.left_queued = false;
        self.right_queued = false;
        self.target_percent = None;
        self.pause_requested = false;
        input
    }

    /// Forget everything, including held keys (focus loss)
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::{GameSession, tick};

    #[test]
    fn test_key_bindings() {
        let mut input = InputState::new();
        assert!(input.key_down("ArrowLeft"));
        assert!(input.key_down("d"));
        assert!(!input.key_down("x"));

        let tick = input.take_tick_input();
        assert!(tick.move_left);
        assert!(tick.move_right);
        assert!(!tick.pause);

        // Held keys keep stepping every tick
        let tick = input.take_tick_input();
        assert!(tick.move_left && tick.move_right);

        assert!(input.key_up("ArrowLeft"));
        let tick = input.take_tick_input();
        assert!(!tick.move_left && tick.move_right);

        input.key_up("d");
        assert_eq!(input.take_tick_input(), TickInput::default());
    }

    #[test]
    fn test_short_press_steps_once() {
        let mut input = InputState::new();
        input.key_down("a");
        input.key_up("a");
        assert!(input.take_tick_input().move_left);
        assert_eq!(input.take_tick_input(), TickInput::default());
    }

    #[test]
    fn test_held_key_moves_paddle_each_tick() {
        let settings = Settings::default();
        let mut session = GameSession::new(&settings, 5, 0);
        let mut input = InputState::new();
        input.key_down("ArrowLeft");

        for t in [0.0, 16.0, 32.0] {
            tick(&mut session, &input.take_tick_input(), t, &settings);
        }
        assert_eq!(session.paddle.center_percent, 20.0);

        input.key_up("ArrowLeft");
        tick(&mut session, &input.take_tick_input(), 48.0, &settings);
        assert_eq!(session.paddle.center_percent, 20.0);
    }

    #[test]
    fn test_drag_and_tap() {
        let area = PlayArea::new(400.0, 600.0);
        let mut input = InputState::new();
        input.drag_to(100.0, &area);
        input.drag_to(300.0, &area);
        input.drag_to(f32::NAN, &area);
        assert_eq!(input.take_tick_input().target_percent, Some(75.0));

        input.tap(50.0, &area);
        let tick = input.take_tick_input();
        assert!(tick.move_left && !tick.move_right);
        input.tap(350.0, &area);
        assert!(input.take_tick_input().move_right);
    }

    #[test]
    fn test_pause_request() {
        let mut input = InputState::new();
        input.key_down("Escape");
        assert!(input.take_tick_input().pause);
        input.request_pause();
        input.key_down("ArrowRight");
        input.clear();
        // Held keys are forgotten too
        assert_eq!(input.take_tick_input(), TickInput::default());
    }
}
