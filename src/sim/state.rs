//! Game state and core simulation types
//!
//! One `GameState` is one game: it is rebuilt from scratch on restart,
//! never reset field by field.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bird::Bird;
use super::pipes::{Pipe, PipeField};
use crate::config::Config;
use crate::consts::{MIN_PLAYFIELD_HEIGHT, MIN_PLAYFIELD_WIDTH};

/// Current phase of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Running,
    /// Terminal; only a new game leaves this phase
    Ended,
}

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Bird touched the ground
    Ground,
    /// Bird clipped a pipe
    Pipe { id: u32 },
}

/// Discrete outcomes of a step, dispatched to collaborators afterwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A flap impulse was applied
    Flapped,
    /// A pipe was passed; `total` is the new score
    Scored { total: u64 },
    /// Game over (emitted exactly once per game)
    Ended { score: u64, reason: EndReason },
}

/// Visible simulation area in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    /// Playfield clamped to the minimum playable size
    ///
    /// Zero, negative and non-finite dimensions from degenerate resizes end
    /// up at the minimum.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: clamp_dimension(width, MIN_PLAYFIELD_WIDTH),
            height: clamp_dimension(height, MIN_PLAYFIELD_HEIGHT),
        }
    }
}

fn clamp_dimension(value: f32, min: f32) -> f32 {
    if value.is_finite() { value.max(min) } else { min }
}

/// Ground strip along the bottom of the playfield
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ground {
    /// Top edge (the collision plane)
    pub y: f32,
    pub height: f32,
}

impl Ground {
    pub fn for_playfield(playfield: &Playfield, height: f32) -> Self {
        Self {
            y: playfield.height - height,
            height,
        }
    }
}

/// Read-only view handed to renderers once per tick
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub playfield: Playfield,
    pub ground: Ground,
    pub bird: &'a Bird,
    pub pipes: &'a [Pipe],
    pub pipe_width: f32,
    pub gap_height: f32,
    pub score: u64,
    pub ticks: u64,
    pub phase: GamePhase,
}

/// Complete state of one game
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed this game's RNG was built from
    pub seed: u64,
    pub rng: Pcg32,
    pub playfield: Playfield,
    pub ground: Ground,
    pub bird: Bird,
    pub pipes: PipeField,
    /// Pipes passed
    pub score: u64,
    /// Ticks stepped while running
    pub ticks: u64,
    /// Sum of deltas (in reference ticks) stepped while running
    pub elapsed: f32,
    pub phase: GamePhase,
}

impl GameState {
    /// Fresh running game laid out for `playfield`
    pub fn new(config: &Config, playfield: Playfield, seed: u64) -> Self {
        let playfield = Playfield::new(playfield.width, playfield.height);
        let ground = Ground::for_playfield(&playfield, config.ground_height);
        let bird = Bird::spawn(config, playfield.width, playfield.height);
        let pipes = PipeField::new(
            config.pipe_width,
            config.gap_height(playfield.height),
            config.pipe_speed,
            config.spawn_interval_ticks,
        );

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            playfield,
            ground,
            bird,
            pipes,
            score: 0,
            ticks: 0,
            elapsed: 0.0,
            phase: GamePhase::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Apply a new playfield size
    ///
    /// Moves the ground immediately. Bird x, gap height and existing pipes are
    /// left alone, so a mid-game resize changes how hard the current pipes are.
    pub fn resize(&mut self, playfield: Playfield) {
        self.playfield = Playfield::new(playfield.width, playfield.height);
        self.ground = Ground::for_playfield(&self.playfield, self.ground.height);
    }

    /// Flap if the game is still running
    pub fn flap(&mut self, impulse: f32) -> bool {
        if !self.is_running() {
            return false;
        }
        self.bird.flap(impulse);
        true
    }

    pub fn frame(&self) -> FrameView<'_> {
        FrameView {
            playfield: self.playfield,
            ground: self.ground,
            bird: &self.bird,
            pipes: self.pipes.pipes(),
            pipe_width: self.pipes.width(),
            gap_height: self.pipes.gap_height(),
            score: self.score,
            ticks: self.ticks,
            phase: self.phase,
        }
    }
}
