//! Scrolling pipe field
//!
//! Pipes enter at the right edge on a fixed cadence, scroll left, score once
//! when the bird gets past them and are dropped after leaving the screen.

use rand::Rng;

use super::collision::{Aabb, pipe_hit};

/// A pipe pair (upper and lower trunk around a gap)
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    pub id: u32,
    /// Left edge
    pub x: f32,
    /// Top of the passable gap
    pub gap_top: f32,
    /// Set once the bird has passed this pipe
    pub scored: bool,
}

/// Ordered collection of live pipes (oldest first)
#[derive(Debug, Clone)]
pub struct PipeField {
    pipes: Vec<Pipe>,
    /// Constant for the session
    width: f32,
    /// Constant for the session
    gap_height: f32,
    speed: f32,
    spawn_interval: f32,
    /// Logical time (in reference ticks) at which the next pipe is due
    next_spawn_at: f32,
    next_id: u32,
}

impl PipeField {
    pub fn new(width: f32, gap_height: f32, speed: f32, spawn_interval_ticks: u32) -> Self {
        Self {
            pipes: Vec::new(),
            width,
            gap_height,
            speed,
            spawn_interval: spawn_interval_ticks as f32,
            next_spawn_at: 0.0,
            next_id: 1,
        }
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn gap_height(&self) -> f32 {
        self.gap_height
    }

    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }

    /// Append a pipe with a known gap (returns its id)
    pub fn spawn_at(&mut self, x: f32, gap_top: f32) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.pipes.push(Pipe {
            id,
            x,
            gap_top,
            scored: false,
        });
        id
    }

    /// Range the gap top is drawn from
    ///
    /// Keeps `margin` clear above the gap and above the ground below it. If a
    /// resize left no room the range collapses to the top margin.
    pub fn gap_top_range(
        &self,
        playfield_height: f32,
        ground_height: f32,
        margin: f32,
    ) -> (f32, f32) {
        let lo = margin;
        let hi = (playfield_height - self.gap_height - ground_height - margin).max(lo);
        (lo, hi)
    }

    /// Spawn at most one pipe if the schedule says one is due
    ///
    /// `elapsed` is logical time since the game started. Pipes are due at
    /// 0, interval, 2 * interval, ... so fixed-step play spawns on ticks
    /// 0, 100, 200 exactly. If a long delta skipped several slots only one
    /// pipe is spawned and the schedule catches up.
    pub fn maybe_spawn<R: Rng>(
        &mut self,
        elapsed: f32,
        playfield_width: f32,
        playfield_height: f32,
        ground_height: f32,
        margin: f32,
        rng: &mut R,
    ) -> Option<u32> {
        if elapsed < self.next_spawn_at {
            return None;
        }

        let (lo, hi) = self.gap_top_range(playfield_height, ground_height, margin);
        let gap_top = if hi > lo { rng.random_range(lo..hi) } else { lo };
        let id = self.spawn_at(playfield_width, gap_top);

        self.next_spawn_at += self.spawn_interval;
        if self.next_spawn_at <= elapsed {
            let missed = ((elapsed - self.next_spawn_at) / self.spawn_interval).floor() + 1.0;
            self.next_spawn_at += missed * self.spawn_interval;
        }

        Some(id)
    }

    /// Move every pipe left by `speed * dt`, score passed pipes and drop
    /// pipes whose right edge has left the screen
    ///
    /// Returns how many pipes were scored this step. A pipe scores once, when
    /// the bird's right edge first gets past the pipe's right edge.
    pub fn scroll(&mut self, dt: f32, bird_right: f32) -> u32 {
        let travel = self.speed * dt;
        let width = self.width;
        let mut scored = 0;

        for pipe in &mut self.pipes {
            pipe.x -= travel;
            if !pipe.scored && bird_right > pipe.x + width {
                pipe.scored = true;
                scored += 1;
            }
        }

        self.pipes.retain(|p| p.x + width >= 0.0);
        scored
    }

    /// First pipe (oldest first) the bird is colliding with
    pub fn first_blocking(&self, bird: &Aabb) -> Option<&Pipe> {
        self.pipes
            .iter()
            .find(|p| pipe_hit(bird, p.x, self.width, p.gap_top, self.gap_height))
    }
}
