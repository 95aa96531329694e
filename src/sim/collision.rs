//! Axis-aligned collision tests
//!
//! Screen coordinates: y grows downward, so `min.y` is the top edge.

use glam::Vec2;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box from top-left corner and size
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.max.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    /// Strict overlap of the horizontal spans (touching edges don't count)
    pub fn overlaps_x(&self, left: f32, right: f32) -> bool {
        self.right() > left && self.left() < right
    }

    /// Whether the box lies entirely inside the vertical band [top, bottom]
    pub fn within_y(&self, top: f32, bottom: f32) -> bool {
        self.top() >= top && self.bottom() <= bottom
    }
}

/// Test a bird box against one pipe
///
/// A pipe is a column `[x, x + width]` that is solid everywhere except the
/// gap `[gap_top, gap_top + gap_height]`. While the spans overlap
/// horizontally the bird must sit entirely within the gap.
pub fn pipe_hit(bird: &Aabb, pipe_x: f32, pipe_width: f32, gap_top: f32, gap_height: f32) -> bool {
    bird.overlaps_x(pipe_x, pipe_x + pipe_width) && !bird.within_y(gap_top, gap_top + gap_height)
}
