use flappy_grove::config::Config;
use flappy_grove::consts::*;
use flappy_grove::sim::{
    Aabb, Bird, GameEvent, GamePhase, GameState, PipeField, Playfield, autopilot, tick,
};
use flappy_grove::{Collaborators, Session, SessionPhase};
use glam::Vec2;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Scroll a single pipe past a stationary bird box with a constant delta
fn score_crossing(dt: f32, steps: u32) -> u32 {
    let mut field = PipeField::new(PIPE_WIDTH, 180.0, PIPE_SPEED, SPAWN_INTERVAL_TICKS);
    field.spawn_at(300.0, 200.0);
    let bird_right = 80.0 + BIRD_WIDTH;
    (0..steps).map(|_| field.scroll(dt, bird_right)).sum()
}

#[test]
fn test_frame_rate_independent_scoring() {
    // 300 px of travel either way; the pipe's right edge starts at 380
    assert_eq!(score_crossing(1.0, 100), score_crossing(0.5, 200));
    assert_eq!(score_crossing(1.0, 100), 1);
}

#[test]
fn test_obstacle_above_gap_scenario() {
    // gapTop=100, gap 250, bird at y=50 overlapping horizontally
    let config = Config::default();
    let mut state = GameState::new(&config, Playfield::new(400.0, 600.0), 5);
    state.pipes = PipeField::new(PIPE_WIDTH, 250.0, PIPE_SPEED, SPAWN_INTERVAL_TICKS);
    state.pipes.spawn_at(100.0, 100.0);
    state.bird.pos.y = 50.0;
    state.bird.velocity = -config.gravity;

    tick(&mut state, &config, 1.0);
    assert_eq!(state.phase, GamePhase::Ended);
}

#[test]
fn test_session_reports_score_at_ground() {
    let mut session = Session::new(
        Config::default(),
        Playfield::new(400.0, 600.0),
        Collaborators::default(),
        11,
    );
    session.start();

    // Free fall from the middle of the playfield reaches y = 600 - 80 - 50
    let mut final_event = None;
    for t in 0..200 {
        for event in session.tick(t as f64) {
            if let GameEvent::Ended { score, .. } = event {
                final_event = Some(score);
            }
        }
        if !session.is_running() {
            break;
        }
    }
    assert_eq!(session.phase(), SessionPhase::Ended);
    assert_eq!(final_event, Some(session.score()));
    let bird = &session.state().unwrap().bird;
    assert!(bird.pos.y + bird.size.y >= 520.0);
}

#[test]
fn test_autopilot_clears_first_pipe() {
    let config = Config::default();
    let mut state = GameState::new(&config, Playfield::new(400.0, 600.0), 2024);
    // The first pipe's right edge passes the bird's right edge on tick 117
    for _ in 0..150 {
        if autopilot::should_flap(&state) {
            state.flap(config.flap_impulse);
        }
        tick(&mut state, &config, 1.0);
        if state.phase == GamePhase::Ended {
            break;
        }
    }
    assert!(state.score >= 1);
}

proptest! {
    #[test]
    fn prop_gap_always_passable(height in -100.0f32..4000.0) {
        let config = Config::default();
        let playfield = Playfield::new(400.0, height);
        let gap = config.gap_height(playfield.height);
        prop_assert!(gap > 0.0);
        prop_assert!(gap < playfield.height - config.ground_height - config.spawn_margin);
        prop_assert!(gap < playfield.height - config.ground_height);
    }

    #[test]
    fn prop_velocity_integrated_before_position(
        y in 0.0f32..400.0,
        v in -10.0f32..10.0,
        dt in 0.0f32..3.0,
    ) {
        let mut bird = Bird::new(Vec2::new(80.0, y), Vec2::new(BIRD_WIDTH, BIRD_HEIGHT));
        bird.velocity = v;
        bird.advance(dt, GRAVITY, 10_000.0);

        let v_after = v + GRAVITY * dt;
        let y_after = y + v_after * dt;
        if y_after > 1.0 {
            prop_assert!((bird.velocity - v_after).abs() < 1e-4);
            prop_assert!((bird.pos.y - y_after).abs() < 1e-3);
        } else if y_after < -1.0 {
            // Ceiling clamp
            prop_assert_eq!(bird.pos.y, 0.0);
            prop_assert_eq!(bird.velocity, 0.0);
        }
    }

    #[test]
    fn prop_scoring_once_per_pipe(dt in 0.05f32..6.0) {
        // 400 px of travel is enough to clear the bird's right edge at 130
        let steps = (400.0 / (PIPE_SPEED * dt)).ceil() as u32;
        prop_assert_eq!(score_crossing(dt, steps), 1);
        prop_assert_eq!(score_crossing(dt, steps * 3), 1);
    }

    #[test]
    fn prop_retired_pipes_never_linger(dt in 0.1f32..5.0, steps in 1u32..400) {
        let mut field = PipeField::new(PIPE_WIDTH, 180.0, PIPE_SPEED, SPAWN_INTERVAL_TICKS);
        field.spawn_at(400.0, 100.0);
        field.spawn_at(250.0, 100.0);
        for _ in 0..steps {
            field.scroll(dt, 130.0);
            for pipe in field.pipes() {
                // Trailing edge is on screen, or at most one step's travel past it
                prop_assert!(pipe.x + PIPE_WIDTH >= 0.0);
                prop_assert!(pipe.x + PIPE_WIDTH > -PIPE_SPEED * dt);
            }
        }
    }

    #[test]
    fn prop_gap_top_within_spawn_range(seed in any::<u64>(), height in 320.0f32..2000.0) {
        let config = Config::default();
        let gap = config.gap_height(height);
        let mut field = PipeField::new(PIPE_WIDTH, gap, PIPE_SPEED, SPAWN_INTERVAL_TICKS);
        let mut rng = Pcg32::seed_from_u64(seed);
        for i in 0..20 {
            let elapsed = (i * SPAWN_INTERVAL_TICKS) as f32;
            let margin = config.spawn_margin;
            field.maybe_spawn(elapsed, 500.0, height, config.ground_height, margin, &mut rng);
        }

        let (lo, hi) = field.gap_top_range(height, config.ground_height, config.spawn_margin);
        let lowest_gap_bottom = height - config.ground_height - config.spawn_margin;
        prop_assert_eq!(field.len(), 20);
        for pipe in field.pipes() {
            prop_assert!(pipe.gap_top >= lo && pipe.gap_top <= hi);
            prop_assert!(pipe.gap_top + gap <= lowest_gap_bottom + 1e-3);
        }
    }

    #[test]
    fn prop_termination_is_one_way(extra_ticks in 1usize..50) {
        let config = Config::default();
        let mut state = GameState::new(&config, Playfield::new(400.0, 600.0), 9);
        state.bird.pos.y = 480.0;
        let ended = tick(&mut state, &config, 1.0);
        let finished = matches!(ended.last(), Some(GameEvent::Ended { .. }));
        prop_assert!(finished);

        let bird_before: Aabb = state.bird.bounds();
        for _ in 0..extra_ticks {
            prop_assert!(tick(&mut state, &config, 1.0).is_empty());
            prop_assert!(!state.flap(config.flap_impulse));
        }
        prop_assert_eq!(state.bird.bounds(), bird_before);
        prop_assert_eq!(state.phase, GamePhase::Ended);
    }
}
