//! The player-controlled bird

use glam::Vec2;

use super::collision::Aabb;
use crate::config::Config;

/// Tilt while rising (radians, nose up)
const RISING_ROTATION: f32 = -0.3;
/// Velocity-to-tilt divisor while falling
const FALL_ROTATION_SCALE: f32 = 10.0;

/// Outcome of one physics step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirdStatus {
    Airborne,
    /// Bottom edge reached the ground plane
    Grounded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    /// Top-left corner; x stays fixed for the whole session
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity (positive is down)
    pub velocity: f32,
    /// Cosmetic tilt derived from velocity
    pub rotation: f32,
}

impl Bird {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            velocity: 0.0,
            rotation: 0.0,
        }
    }

    /// Starting bird for a playfield: 20% in from the left, vertically centred
    pub fn spawn(config: &Config, playfield_width: f32, playfield_height: f32) -> Self {
        Self::new(
            Vec2::new(playfield_width * config.bird_x_fraction, playfield_height / 2.0),
            Vec2::new(config.bird_width, config.bird_height),
        )
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    /// Replace the vertical velocity with an upward impulse
    pub fn flap(&mut self, impulse: f32) {
        self.velocity = impulse;
    }

    /// Integrate one step: velocity first, then position
    ///
    /// The top of the playfield is a soft ceiling (clamp and stop); the
    /// ground is fatal.
    pub fn advance(&mut self, dt: f32, gravity: f32, ground_y: f32) -> BirdStatus {
        self.velocity += gravity * dt;
        self.pos.y += self.velocity * dt;

        self.rotation = if self.velocity < 0.0 {
            RISING_ROTATION
        } else {
            (self.velocity / FALL_ROTATION_SCALE).min(std::f32::consts::FRAC_PI_2)
        };

        if self.pos.y <= 0.0 {
            self.pos.y = 0.0;
            self.velocity = 0.0;
        }

        if self.pos.y + self.size.y >= ground_y {
            BirdStatus::Grounded
        } else {
            BirdStatus::Airborne
        }
    }
}
