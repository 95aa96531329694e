//! Game session controller
//!
//! Owns the current game and the collaborator handles. The host calls
//! `tick` once per delivered frame and forwards input/resize events between
//! ticks; everything that reaches a renderer, HUD or audio backend goes
//! through here after the simulation step has finished.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use thiserror::Error;

use crate::config::Config;
use crate::sim::{self, FrameView, GameEvent, GameState, Playfield, Timestep};

/// Failure reported by a collaborator
///
/// The session logs these and carries on; they never touch game state.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("renderer failed: {0}")]
    Renderer(String),
    #[error("HUD update failed: {0}")]
    Hud(String),
    #[error("audio failed: {0}")]
    Audio(String),
}

/// Draws a frame from read-only game state (once per tick)
pub trait Renderer {
    fn render(&mut self, frame: &FrameView<'_>) -> Result<(), CollaboratorError>;
}

/// On-screen score text and overlays
pub trait Hud {
    fn game_started(&mut self) -> Result<(), CollaboratorError>;
    fn score_changed(&mut self, score: u64) -> Result<(), CollaboratorError>;
    fn game_ended(&mut self, final_score: u64) -> Result<(), CollaboratorError>;
}

/// Fire-and-forget sound cues
pub trait AudioNotifier {
    fn impulse(&mut self) -> Result<(), CollaboratorError>;
    fn game_over(&mut self) -> Result<(), CollaboratorError>;
}

/// Collaborator that ignores everything (headless runs, tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct Noop;

impl Renderer for Noop {
    fn render(&mut self, _frame: &FrameView<'_>) -> Result<(), CollaboratorError> {
        Ok(())
    }
}

impl Hud for Noop {
    fn game_started(&mut self) -> Result<(), CollaboratorError> {
        Ok(())
    }

    fn score_changed(&mut self, _score: u64) -> Result<(), CollaboratorError> {
        Ok(())
    }

    fn game_ended(&mut self, _final_score: u64) -> Result<(), CollaboratorError> {
        Ok(())
    }
}

impl AudioNotifier for Noop {
    fn impulse(&mut self) -> Result<(), CollaboratorError> {
        Ok(())
    }

    fn game_over(&mut self) -> Result<(), CollaboratorError> {
        Ok(())
    }
}

/// Handles injected at session construction
pub struct Collaborators {
    pub renderer: Box<dyn Renderer>,
    pub hud: Box<dyn Hud>,
    pub audio: Box<dyn AudioNotifier>,
}

impl Collaborators {
    pub fn new(
        renderer: impl Renderer + 'static,
        hud: impl Hud + 'static,
        audio: impl AudioNotifier + 'static,
    ) -> Self {
        Self {
            renderer: Box::new(renderer),
            hud: Box::new(hud),
            audio: Box::new(audio),
        }
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::new(Noop, Noop, Noop)
    }
}

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No game started yet
    Idle,
    /// Tick loop active
    Running,
    /// Game over, waiting for restart
    Ended,
}

/// Log and drop a collaborator failure
fn report(result: Result<(), CollaboratorError>) {
    if let Err(e) = result {
        log::warn!("{}", e);
    }
}

pub struct Session {
    config: Config,
    playfield: Playfield,
    timestep: Timestep,
    /// Draws a fresh seed for every game
    seeder: Pcg32,
    game: Option<GameState>,
    games_started: u64,
    collaborators: Collaborators,
}

impl Session {
    pub fn new(
        config: Config,
        playfield: Playfield,
        collaborators: Collaborators,
        seed: u64,
    ) -> Self {
        let timestep = Timestep::from_config(&config);
        Self {
            config,
            playfield: Playfield::new(playfield.width, playfield.height),
            timestep,
            seeder: Pcg32::seed_from_u64(seed),
            game: None,
            games_started: 0,
            collaborators,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn playfield(&self) -> Playfield {
        self.playfield
    }

    /// Current game, if one was ever started
    pub fn state(&self) -> Option<&GameState> {
        self.game.as_ref()
    }

    pub fn phase(&self) -> SessionPhase {
        match &self.game {
            None => SessionPhase::Idle,
            Some(game) if game.is_running() => SessionPhase::Running,
            Some(_) => SessionPhase::Ended,
        }
    }

    /// Whether the host should keep scheduling ticks
    pub fn is_running(&self) -> bool {
        self.phase() == SessionPhase::Running
    }

    pub fn score(&self) -> u64 {
        self.game.as_ref().map(|g| g.score).unwrap_or(0)
    }

    pub fn games_started(&self) -> u64 {
        self.games_started
    }

    /// Build a new game and enter Running
    ///
    /// Any previous game is discarded, not resumed.
    pub fn start(&mut self) {
        let seed = self.seeder.random::<u64>();
        self.game = Some(GameState::new(&self.config, self.playfield, seed));
        self.timestep.reset();
        self.games_started += 1;
        log::info!("Game {} started (seed {})", self.games_started, seed);

        report(self.collaborators.hud.game_started());
        report(self.collaborators.hud.score_changed(0));
    }

    pub fn restart(&mut self) {
        self.start();
    }

    /// Run one tick; a no-op unless Running
    ///
    /// `now_ms` is the host frame timestamp (only Normalized mode reads it).
    pub fn tick(&mut self, now_ms: f64) -> Vec<GameEvent> {
        let Some(game) = self.game.as_mut() else {
            return Vec::new();
        };
        if !game.is_running() {
            return Vec::new();
        }

        let dt = self.timestep.delta(now_ms);
        let events = sim::tick(game, &self.config, dt);
        report(self.collaborators.renderer.render(&game.frame()));

        self.dispatch(&events);
        events
    }

    /// Player pressed flap
    ///
    /// Only changes the bird while Running; the audio cue fires either way.
    /// Returns whether the impulse was applied.
    pub fn on_input_impulse(&mut self) -> bool {
        let applied = match self.game.as_mut() {
            Some(game) => game.flap(self.config.flap_impulse),
            None => false,
        };

        if applied {
            self.dispatch(&[GameEvent::Flapped]);
        } else {
            report(self.collaborators.audio.impulse());
        }
        applied
    }

    /// Host viewport changed; takes effect immediately
    pub fn on_resize(&mut self, width: f32, height: f32) {
        self.playfield = Playfield::new(width, height);
        log::debug!(
            "Playfield resized to {}x{}",
            self.playfield.width,
            self.playfield.height
        );
        if let Some(game) = self.game.as_mut() {
            game.resize(self.playfield);
        }
    }

    fn dispatch(&mut self, events: &[GameEvent]) {
        let c = &mut self.collaborators;
        for event in events {
            match *event {
                GameEvent::Flapped => report(c.audio.impulse()),
                GameEvent::Scored { total } => report(c.hud.score_changed(total)),
                GameEvent::Ended { score, .. } => {
                    report(c.hud.game_ended(score));
                    report(c.audio.game_over());
                }
            }
        }
    }
}
