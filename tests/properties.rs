use balloon_catch::sim::{DifficultyPolicy, GameEvent, GameSession, TickInput, tick};
use balloon_catch::{Settings, Variant};
use proptest::prelude::*;

/// One host frame: elapsed wall time plus the input delivered with it
#[derive(Debug, Clone)]
struct Frame {
    delta_ms: f64,
    input: TickInput,
}

fn frame_strategy() -> impl Strategy<Value = Frame> {
    (
        0.0f64..250.0,
        any::<bool>(),
        any::<bool>(),
        prop::option::weighted(0.2, -20.0f32..120.0),
        prop::bool::weighted(0.02),
    )
        .prop_map(|(delta_ms, move_left, move_right, target_percent, pause)| Frame {
            delta_ms,
            input: TickInput {
                move_left,
                move_right,
                target_percent,
                pause,
            },
        })
}

fn settings_for(festival: bool) -> Settings {
    if festival {
        Settings::from_variant(Variant::Festival)
    } else {
        Settings::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn session_invariants_hold(
        seed in any::<u64>(),
        festival in any::<bool>(),
        frames in prop::collection::vec(frame_strategy(), 1..600),
    ) {
        let settings = settings_for(festival);
        let mut session = GameSession::new(&settings, seed, 0);
        let mut t = 0.0;
        let mut game_overs = 0;

        for frame in &frames {
            t += frame.delta_ms;
            let lives_before = session.lives;
            let score_before = session.score;
            let events = tick(&mut session, &frame.input, t, &settings);

            // Lives never go up
            prop_assert!(session.lives <= lives_before);

            // Multiplier stays within [1, cap]
            prop_assert!(session.combo.multiplier >= 1);
            prop_assert!(session.combo.multiplier <= settings.combo.cap);

            // Paddle stays inside the play area
            let (left, right) = session.paddle.span_px(&session.area);
            prop_assert!(left >= -1e-3, "left edge {}", left);
            prop_assert!(right <= session.area.width + 1e-3, "right edge {}", right);

            prop_assert!(session.params.spawn_interval_ms >= settings.difficulty.spawn_interval_min_ms);

            // Every catch adds at least one point and score only grows by catches
            let mut caught = 0u64;
            for event in &events {
                match event {
                    GameEvent::ObjectCaught { points, .. } => {
                        prop_assert!(*points >= 1);
                        caught += points;
                    }
                    GameEvent::GameOver { final_score, .. } => {
                        prop_assert_eq!(*final_score, session.score);
                        game_overs += 1;
                    }
                    _ => {}
                }
            }
            prop_assert_eq!(session.score, score_before + caught);

            prop_assert_eq!(session.is_running(), session.lives > 0);
        }

        prop_assert!(game_overs <= 1);
        prop_assert_eq!(game_overs == 1, session.lives == 0);
    }

    #[test]
    fn difficulty_respects_limits(
        score in 0u64..100_000,
        level in 1u32..5_000,
        linear in any::<bool>(),
        festival in any::<bool>(),
    ) {
        let settings = settings_for(festival);
        let policy = if linear {
            DifficultyPolicy::LevelLinear
        } else {
            DifficultyPolicy::ScoreTiered
        };
        let tuning = &settings.difficulty;
        let params = policy.parameters_for(score, level, tuning);

        prop_assert!(params.spawn_interval_ms >= tuning.spawn_interval_min_ms);
        prop_assert!(params.spawn_interval_ms <= tuning.spawn_interval_ms);
        prop_assert!(params.fall_speed_base >= tuning.fall_speed_base);
        prop_assert!(params.fall_speed_base <= tuning.fall_speed_max.max(tuning.fall_speed_base));
        prop_assert!(params.paddle_speed_percent >= tuning.paddle_speed_percent);

        // Harder never means easier later on
        let later = policy.parameters_for(score + 1, level + 1, tuning);
        prop_assert!(later.spawn_interval_ms <= params.spawn_interval_ms);
        prop_assert!(later.fall_speed_base >= params.fall_speed_base);
    }
}
