//! Idle/demo mode - AI plays the game
//!
//! Aims for the lower part of the next gap: a flap lifts the bird well
//! clear of the bottom trunk without reaching the top one.

use super::state::GameState;

/// How far above the gap bottom (or ground) the bird's bottom edge may sink
/// before the autopilot flaps
const FLAP_CLEARANCE: f32 = 30.0;

/// Bottom edge the bird should stay above this tick
pub fn target_floor(state: &GameState) -> f32 {
    let bird = state.bird.bounds();
    let width = state.pipes.width();

    // Nearest pipe the bird hasn't cleared yet
    state
        .pipes
        .pipes()
        .iter()
        .find(|p| p.x + width > bird.left())
        .map(|p| p.gap_top + state.pipes.gap_height())
        .unwrap_or(state.ground.y)
        .min(state.ground.y)
}

/// Whether the autopilot wants to flap now
pub fn should_flap(state: &GameState) -> bool {
    if !state.is_running() {
        return false;
    }
    // Never flap while still rising
    if state.bird.velocity < 0.0 {
        return false;
    }
    state.bird.bounds().bottom() > target_floor(state) - FLAP_CLEARANCE
}
