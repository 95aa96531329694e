//! Flappy Grove - a side-scrolling tree-dodging arcade game
//!
//! Core modules:
//! - `sim`: Pure simulation (bird physics, pipe field, collisions, timestep)
//! - `session`: Start/tick/end orchestration and collaborator contracts
//! - `config`: Device-class tuning resolved once per session
//! - `platform`: Browser/native host detection and clocks

pub mod config;
pub mod platform;
pub mod session;
pub mod sim;

pub use config::{Config, ConfigError, DeviceClass, TimestepMode};
pub use session::{
    AudioNotifier, CollaboratorError, Collaborators, Hud, Noop, Renderer, Session, SessionPhase,
};

/// Reference tuning constants
pub mod consts {
    /// Frame rate the per-tick tuning was authored against
    pub const REFERENCE_FPS: f32 = 60.0;

    /// Smallest playfield the game will lay out (degenerate resizes clamp here)
    pub const MIN_PLAYFIELD_WIDTH: f32 = 240.0;
    pub const MIN_PLAYFIELD_HEIGHT: f32 = 320.0;

    /// Bird defaults
    pub const BIRD_WIDTH: f32 = 50.0;
    pub const BIRD_HEIGHT: f32 = 50.0;
    /// Horizontal bird position as a fraction of playfield width
    pub const BIRD_X_FRACTION: f32 = 0.2;
    /// Downward acceleration per tick²
    pub const GRAVITY: f32 = 0.6;
    /// Velocity set by a flap (negative is up)
    pub const FLAP_IMPULSE: f32 = -10.0;

    /// Pipe defaults
    pub const PIPE_WIDTH: f32 = 80.0;
    /// Horizontal travel per tick
    pub const PIPE_SPEED: f32 = 3.0;
    /// Gap height as a fraction of playfield height...
    pub const PIPE_GAP_FRACTION: f32 = 0.3;
    /// ...capped at this many pixels
    pub const PIPE_GAP_MAX: f32 = 250.0;
    /// Logical ticks between spawns
    pub const SPAWN_INTERVAL_TICKS: u32 = 100;
    /// Minimum distance between a gap and the top of the playfield or the ground
    pub const SPAWN_MARGIN: f32 = 50.0;

    /// Height of the ground strip at the bottom of the playfield
    pub const GROUND_HEIGHT: f32 = 80.0;
}
