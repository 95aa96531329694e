//! Simulation step
//!
//! Pure state transition: no collaborators are called from here. The caller
//! gets back the events the step produced and dispatches them itself.

use super::bird::BirdStatus;
use super::state::{EndReason, GameEvent, GamePhase, GameState};
use crate::config::Config;

/// Advance the game by `dt` reference ticks
///
/// Order: bird physics, pipe field (spawn, scroll, score, retire), pipe
/// collisions. The first termination cause found wins. Once the game has
/// ended, further calls do nothing.
pub fn tick(state: &mut GameState, config: &Config, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Running {
        return events;
    }

    let mut end_reason = None;

    if state.bird.advance(dt, config.gravity, state.ground.y) == BirdStatus::Grounded {
        end_reason = Some(EndReason::Ground);
    }

    state.pipes.maybe_spawn(
        state.elapsed,
        state.playfield.width,
        state.playfield.height,
        state.ground.height,
        config.spawn_margin,
        &mut state.rng,
    );

    let bird_box = state.bird.bounds();
    for _ in 0..state.pipes.scroll(dt, bird_box.right()) {
        state.score += 1;
        log::debug!("Scored: {}", state.score);
        events.push(GameEvent::Scored { total: state.score });
    }

    if end_reason.is_none() {
        end_reason = state
            .pipes
            .first_blocking(&bird_box)
            .map(|pipe| EndReason::Pipe { id: pipe.id });
    }

    state.ticks += 1;
    state.elapsed += dt;

    if let Some(reason) = end_reason {
        state.phase = GamePhase::Ended;
        log::info!(
            "Game over after {} ticks: {:?}, score {}",
            state.ticks,
            reason,
            state.score
        );
        events.push(GameEvent::Ended {
            score: state.score,
            reason,
        });
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::pipes::PipeField;
    use crate::sim::state::Playfield;

    fn new_game() -> (GameState, Config) {
        let config = Config::default();
        let state = GameState::new(&config, Playfield::new(400.0, 600.0), 12345);
        (state, config)
    }

    #[test]
    fn test_first_tick_spawns_pipe() {
        let (mut state, config) = new_game();
        tick(&mut state, &config, 1.0);
        assert_eq!(state.pipes.len(), 1);
        // Spawned at the right edge, then scrolled once
        assert_eq!(state.pipes.pipes()[0].x, 397.0);
        assert_eq!(state.ticks, 1);
    }

    #[test]
    fn test_flap_then_ten_ticks_closed_form() {
        let (mut state, config) = new_game();
        let g = config.gravity;
        let j = config.flap_impulse;
        let y0 = state.bird.pos.y;
        state.flap(j);

        for _ in 0..10 {
            let events = tick(&mut state, &config, 1.0);
            assert!(events.iter().all(|e| !matches!(e, GameEvent::Ended { .. })));
        }

        // v_n = j + n g, y_n = y0 + sum_{k=1..n} (j + k g)
        let n = 10.0;
        let expected_v = j + n * g;
        let expected_y = y0 + n * j + g * n * (n + 1.0) / 2.0;
        assert!((state.bird.velocity - expected_v).abs() < 1e-4);
        assert!((state.bird.pos.y - expected_y).abs() < 1e-3);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_ground_ends_game() {
        let (mut state, config) = new_game();
        state.score = 4;
        // Bottom of playfield minus ground minus bird height
        state.bird.pos.y = 600.0 - 80.0 - 50.0;
        let events = tick(&mut state, &config, 1.0);
        assert_eq!(state.phase, GamePhase::Ended);
        assert_eq!(
            events.last(),
            Some(&GameEvent::Ended {
                score: 4,
                reason: EndReason::Ground
            })
        );
    }

    #[test]
    fn test_pipe_collision_ends_game() {
        let (mut state, config) = new_game();
        state.pipes = PipeField::new(80.0, 250.0, 3.0, 100);
        let id = state.pipes.spawn_at(90.0, 100.0);
        state.bird.pos.y = 50.0;
        state.bird.velocity = -config.gravity; // hold still for one tick

        let events = tick(&mut state, &config, 1.0);
        assert_eq!(state.phase, GamePhase::Ended);
        assert!(events.contains(&GameEvent::Ended {
            score: 0,
            reason: EndReason::Pipe { id }
        }));
    }

    #[test]
    fn test_ground_wins_over_pipe() {
        let (mut state, config) = new_game();
        state.pipes.spawn_at(90.0, 100.0);
        state.bird.pos.y = 500.0;
        let events = tick(&mut state, &config, 1.0);
        assert!(matches!(
            events.last(),
            Some(GameEvent::Ended {
                reason: EndReason::Ground,
                ..
            })
        ));
    }

    #[test]
    fn test_ended_is_terminal() {
        let (mut state, config) = new_game();
        state.bird.pos.y = 515.0;
        let events = tick(&mut state, &config, 1.0);
        assert_eq!(events.len(), 1);

        let snapshot_y = state.bird.pos.y;
        let ticks = state.ticks;
        for _ in 0..5 {
            assert!(tick(&mut state, &config, 1.0).is_empty());
        }
        assert_eq!(state.bird.pos.y, snapshot_y);
        assert_eq!(state.ticks, ticks);
    }

    #[test]
    fn test_scoring_emits_running_total() {
        let (mut state, config) = new_game();
        state.pipes = PipeField::new(80.0, 600.0, 3.0, 1000);
        state.score = 2;
        // Pipe right edge at 131, bird right edge at 130
        state.pipes.spawn_at(51.0, -100.0);
        state.bird.velocity = -config.gravity;
        let events = tick(&mut state, &config, 1.0);
        assert_eq!(events, vec![GameEvent::Scored { total: 3 }]);
        assert_eq!(state.score, 3);
    }
}
