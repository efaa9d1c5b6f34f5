//! Per-frame simulation tick
//!
//! Order within a tick is fixed: combo decay, difficulty, input, spawn,
//! advance, resolve, level. An object spawned this tick is advanced and
//! tested in the same tick.

use super::collision::{CatchZone, Resolution, resolve};
use super::difficulty::{current_level, next_level_score};
use super::events::{EffectKind, GameEvent};
use super::scoring::popup_tier;
use super::spawner::{SpawnContext, maybe_spawn};
use super::state::{Direction, GameSession};
use crate::consts::{CATCH_BURST_MS, PADDLE_BOUNCE_MS, SCORE_POPUP_MS};
use crate::settings::Settings;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Absolute paddle center from drag/touch, percent of play area width
    pub target_percent: Option<f32>,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the session to `timestamp_ms` and return what happened
pub fn tick(
    session: &mut GameSession,
    input: &TickInput,
    timestamp_ms: f64,
    settings: &Settings,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if !session.is_running() {
        return events;
    }

    if input.pause {
        if session.is_paused() {
            session.resume();
            log::info!("Resumed");
        } else {
            session.pause();
            log::info!("Paused");
            return events;
        }
    }
    if session.is_paused() {
        return events;
    }

    let delta_ms = session.clock.delta(timestamp_ms);
    let now_ms = session.clock.elapsed_ms();

    if session.combo.decay(now_ms, &settings.combo) {
        events.push(GameEvent::ComboChanged { multiplier: 1 });
    }

    // Difficulty for this tick's spawn decision and paddle speed
    session.params = settings.difficulty.policy.parameters_for(
        session.score,
        session.level,
        &settings.difficulty,
    );
    session.paddle.speed_percent = session.params.paddle_speed_percent;

    apply_input(session, input);

    let mut ctx = SpawnContext {
        area: &session.area,
        playfield: &settings.playfield,
        tuning: &settings.spawn,
        rng: &mut session.rng,
        next_id: &mut session.next_id,
    };
    if let Some(object) = maybe_spawn(now_ms, session.last_spawn_ms, &session.params, &mut ctx) {
        events.push(GameEvent::ObjectSpawned {
            id: object.id,
            x: object.pos.x,
            color: object.color,
            speed: object.fall_speed,
            is_special: object.is_special,
        });
        session.objects.push(object);
        session.last_spawn_ms = Some(now_ms);
    }

    session.objects.advance(delta_ms);
    events.extend(session.objects.iter().map(|o| GameEvent::ObjectAdvanced {
        id: o.id,
        y: o.top(),
    }));

    let zone = CatchZone::new(&session.paddle, &session.area, &settings.playfield);
    let resolutions = resolve(
        &mut session.objects,
        &zone,
        &mut session.combo,
        &settings.combo,
        now_ms,
        session.lives,
    );
    for resolution in resolutions {
        match resolution {
            Resolution::Caught(catch) => {
                let x = catch.object.center_x();
                let y = zone.paddle.min.y;
                session.score = session.score.saturating_add(catch.score.points);
                log::debug!(
                    "Caught {} for {} (bonus x{}, combo x{})",
                    catch.object.id,
                    catch.score.points,
                    catch.score.speed_bonus,
                    catch.score.multiplier
                );

                events.push(GameEvent::ObjectCaught {
                    id: catch.object.id,
                    x,
                    y,
                    color: catch.object.color,
                    points: catch.score.points,
                });
                events.push(GameEvent::Effect {
                    kind: EffectKind::CatchBurst {
                        color: catch.object.color,
                    },
                    x,
                    y,
                    duration_ms: CATCH_BURST_MS,
                });
                events.push(GameEvent::Effect {
                    kind: EffectKind::ScorePopup {
                        points: catch.score.points,
                        tier: popup_tier(catch.score.points),
                    },
                    x,
                    y: y - 20.0,
                    duration_ms: SCORE_POPUP_MS,
                });
                events.push(GameEvent::Effect {
                    kind: EffectKind::PaddleBounce,
                    x: session.paddle.center_px(&session.area),
                    y,
                    duration_ms: PADDLE_BOUNCE_MS,
                });
                events.push(GameEvent::ScoreChanged {
                    score: session.score,
                });
                if catch.score.combo_changed {
                    events.push(GameEvent::ComboChanged {
                        multiplier: catch.score.multiplier,
                    });
                }

                if session.score > session.high_score {
                    session.high_score = session.score;
                    events.push(GameEvent::HighScoreChanged {
                        high_score: session.high_score,
                    });
                }
            }
            Resolution::Missed(object) => {
                session.lives = session.lives.saturating_sub(1);
                log::debug!("Missed {} ({} lives left)", object.id, session.lives);
                events.push(GameEvent::ObjectMissed {
                    id: object.id,
                    x: object.center_x(),
                    y: object.bottom(),
                });
                events.push(GameEvent::LivesChanged {
                    lives: session.lives,
                });
            }
        }
    }

    update_level(session, settings, now_ms, &mut events);

    if session.lives == 0 {
        if let Some(game_over) = session.end() {
            log::info!(
                "Game over: score {} (level {})",
                session.score,
                session.level
            );
            events.push(game_over);
        }
    }

    events
}

/// Move the paddle from this tick's input
fn apply_input(session: &mut GameSession, input: &TickInput) {
    let area = session.area;
    if let Some(target) = input.target_percent {
        session.paddle.set_target_percent(target, &area);
    }
    if input.move_left {
        session.paddle.step(Direction::Left, &area);
    }
    if input.move_right {
        session.paddle.step(Direction::Right, &area);
    }
}

/// Recompute the level from score; a level up refreshes difficulty immediately
fn update_level(
    session: &mut GameSession,
    settings: &Settings,
    now_ms: f64,
    events: &mut Vec<GameEvent>,
) {
    let threshold = settings.difficulty.level_threshold;
    let level = current_level(session.score, threshold);
    if level <= session.level {
        return;
    }

    session.level = level;
    session.params =
        settings
            .difficulty
            .policy
            .parameters_for(session.score, level, &settings.difficulty);
    log::info!("Level up: {} (spawn every {:.0} ms)", level, session.params.spawn_interval_ms);

    events.push(GameEvent::LevelUp {
        level,
        next_level_score: next_level_score(level, threshold),
    });

    if settings.level_up_flash_ms > 0 && !session.objects.is_empty() {
        session.flash_until_ms = Some(now_ms + settings.level_up_flash_ms as f64);
        events.push(GameEvent::SpecialFlash {
            ids: session.objects.ids(),
            duration_ms: settings.level_up_flash_ms,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FIRST_TICK_MS;
    use crate::sim::objects::{ColorTag, FallingObject};
    use crate::sim::state::GamePhase;
    use glam::Vec2;

    /// Settings where nothing spawns on its own during a short test
    fn quiet_settings() -> Settings {
        let mut settings = Settings::default();
        settings.difficulty.spawn_interval_ms = 1.0e9;
        settings.difficulty.spawn_interval_min_ms = 1.0e9;
        settings
    }

    /// Session whose automatic first spawn has already happened
    fn quiet_session(settings: &Settings) -> GameSession {
        let mut session = GameSession::new(settings, 12345, 0);
        session.last_spawn_ms = Some(0.0);
        session
    }

    /// Object centered on the paddle with its bottom edge at `bottom`
    fn object_over_paddle(session: &mut GameSession, bottom: f32, speed: f32) -> FallingObject {
        let id = session.next_object_id();
        let center = session.paddle.center_px(&session.area);
        FallingObject::new(
            id,
            Vec2::new(center - 15.0, bottom - 40.0),
            Vec2::new(30.0, 40.0),
            speed,
            ColorTag::Green,
        )
    }

    #[test]
    fn test_first_tick_spawns() {
        let settings = Settings::default();
        let mut session = GameSession::new(&settings, 12345, 0);

        let events = tick(&mut session, &TickInput::default(), 5000.0, &settings);
        assert!(matches!(events[0], GameEvent::ObjectSpawned { id: 1, .. }));
        assert_eq!(session.objects.len(), 1);
        assert_eq!(session.last_spawn_ms, Some(FIRST_TICK_MS));
        // Spawned and advanced in the same tick
        assert!(session.objects.get(0).unwrap().top() > 0.0);
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::ObjectAdvanced { id: 1, .. })));
    }

    #[test]
    fn test_pause_toggle() {
        let settings = Settings::default();
        let mut session = GameSession::new(&settings, 1, 0);
        tick(&mut session, &TickInput::default(), 0.0, &settings);
        let y = session.objects.get(0).unwrap().top();

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        assert!(tick(&mut session, &pause, 16.0, &settings).is_empty());
        assert_eq!(session.phase, GamePhase::Paused);

        // Paused ticks do nothing
        assert!(tick(&mut session, &TickInput::default(), 5000.0, &settings).is_empty());
        assert_eq!(session.objects.get(0).unwrap().top(), y);

        // Resume counts only the fallback delta, not the paused time
        tick(&mut session, &pause, 10_000.0, &settings);
        assert_eq!(session.phase, GamePhase::Playing);
        let moved = session.objects.get(0).unwrap().top() - y;
        let speed = session.objects.get(0).unwrap().fall_speed;
        assert!(moved < speed * 2.0);
    }

    #[test]
    fn test_input_moves_paddle() {
        let settings = quiet_settings();
        let mut session = quiet_session(&settings);

        let left = TickInput {
            move_left: true,
            ..Default::default()
        };
        tick(&mut session, &left, 0.0, &settings);
        assert_eq!(session.paddle.center_percent, 40.0);

        let drag = TickInput {
            target_percent: Some(75.0),
            ..Default::default()
        };
        tick(&mut session, &drag, 16.0, &settings);
        assert_eq!(session.paddle.center_percent, 75.0);

        let both = TickInput {
            move_left: true,
            move_right: true,
            ..Default::default()
        };
        tick(&mut session, &both, 32.0, &settings);
        assert_eq!(session.paddle.center_percent, 75.0);
    }

    #[test]
    fn test_catch_scores_and_emits() {
        let settings = quiet_settings();
        let mut session = quiet_session(&settings);
        let object = object_over_paddle(&mut session, 540.0, 0.5);
        let id = object.id;
        session.objects.push(object);

        let events = tick(&mut session, &TickInput::default(), 0.0, &settings);
        assert_eq!(session.score, 2);
        assert_eq!(session.high_score, 2);
        assert!(session.objects.is_empty());
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::ObjectCaught { id: caught, points: 2, .. } if *caught == id)));
        assert!(events.contains(&GameEvent::ScoreChanged { score: 2 }));
        assert!(events.contains(&GameEvent::ComboChanged { multiplier: 2 }));
        assert!(events.contains(&GameEvent::HighScoreChanged { high_score: 2 }));
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::Effect {
                kind: EffectKind::PaddleBounce,
                duration_ms: 300,
                ..
            }
        )));
    }

    #[test]
    fn test_miss_costs_a_life() {
        let settings = quiet_settings();
        let mut session = quiet_session(&settings);
        let mut object = object_over_paddle(&mut session, 590.0, 1.0);
        object.pos.x = 0.0;
        object.prev_bottom = 590.0;
        session.objects.push(object);

        let events = tick(&mut session, &TickInput::default(), 0.0, &settings);
        assert_eq!(session.lives, 9);
        assert!(session.objects.is_empty());
        assert!(events.contains(&GameEvent::LivesChanged { lives: 9 }));
        assert!(events.iter().any(|e| matches!(e, GameEvent::ObjectMissed { .. })));
    }

    #[test]
    fn test_combo_decays_on_tick() {
        let settings = quiet_settings();
        let mut session = quiet_session(&settings);
        let object = object_over_paddle(&mut session, 540.0, 0.5);
        session.objects.push(object);
        tick(&mut session, &TickInput::default(), 0.0, &settings);
        assert_eq!(session.combo.multiplier, 2);

        let mut t = 0.0;
        let mut decayed = false;
        while t < 4000.0 {
            t += 50.0;
            let events = tick(&mut session, &TickInput::default(), t, &settings);
            if events.contains(&GameEvent::ComboChanged { multiplier: 1 }) {
                decayed = true;
                break;
            }
        }
        assert!(decayed);
        assert_eq!(session.combo.consecutive_catches, 0);
        assert_eq!(session.combo.multiplier, 1);
    }

    #[test]
    fn test_level_up_once() {
        let mut settings = quiet_settings();
        settings.difficulty.level_threshold = 20;
        let mut session = quiet_session(&settings);
        session.score = 19;

        // A bystander object high up gets flashed
        let bystander = object_over_paddle(&mut session, 100.0, 0.1);
        let bystander_id = bystander.id;
        session.objects.push(bystander);
        let object = object_over_paddle(&mut session, 540.0, 0.5);
        session.objects.push(object);

        let events = tick(&mut session, &TickInput::default(), 0.0, &settings);
        assert_eq!(session.level, 2);
        let level_ups: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::LevelUp { .. }))
            .collect();
        assert_eq!(
            level_ups,
            vec![&GameEvent::LevelUp {
                level: 2,
                next_level_score: 40
            }]
        );
        assert!(events.contains(&GameEvent::SpecialFlash {
            ids: vec![bystander_id],
            duration_ms: 2000
        }));
        assert!(session.flash_active());

        // No repeat on the next tick
        let events = tick(&mut session, &TickInput::default(), 16.0, &settings);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::LevelUp { .. })));

        // Flash lasts 2000 ms of simulation time from the level-up tick
        tick(&mut session, &TickInput::default(), 1900.0, &settings);
        assert!(session.flash_active());
        tick(&mut session, &TickInput::default(), 2100.0, &settings);
        assert!(!session.flash_active());
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut settings = quiet_settings();
        settings.initial_lives = 1;
        let mut session = quiet_session(&settings);
        let mut object = object_over_paddle(&mut session, 590.0, 1.0);
        object.pos.x = 0.0;
        object.prev_bottom = 590.0;
        session.objects.push(object);

        let events = tick(&mut session, &TickInput::default(), 0.0, &settings);
        assert_eq!(
            events.last(),
            Some(&GameEvent::GameOver {
                final_score: 0,
                is_new_high_score: false
            })
        );
        assert!(!session.is_running());

        // Further ticks, including pause toggles, are ignored
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        assert!(tick(&mut session, &pause, 16.0, &settings).is_empty());
        assert!(tick(&mut session, &TickInput::default(), 32.0, &settings).is_empty());
        assert_eq!(session.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_determinism() {
        let settings = Settings::default();
        let mut a = GameSession::new(&settings, 99999, 0);
        let mut b = GameSession::new(&settings, 99999, 0);

        let mut t = 0.0;
        for i in 0..2000 {
            let input = TickInput {
                move_left: i % 7 == 0,
                move_right: i % 5 == 0,
                ..Default::default()
            };
            let ea = tick(&mut a, &input, t, &settings);
            let eb = tick(&mut b, &input, t, &settings);
            assert_eq!(ea, eb);
            t += 16.67;
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.lives, b.lives);
    }
}
