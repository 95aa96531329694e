//! Simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time only enters as a delta argument
//! - Seeded RNG only
//! - Pipes iterate oldest first
//! - No rendering, UI, audio or platform dependencies

pub mod autopilot;
pub mod bird;
pub mod collision;
pub mod pipes;
pub mod state;
pub mod tick;
pub mod timestep;

pub use bird::{Bird, BirdStatus};
pub use collision::{Aabb, pipe_hit};
pub use pipes::{Pipe, PipeField};
pub use state::{EndReason, FrameView, GameEvent, GamePhase, GameState, Ground, Playfield};
pub use tick::tick;
pub use timestep::Timestep;
