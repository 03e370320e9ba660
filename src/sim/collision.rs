//! Collision detection and response for axis-aligned geometry
//!
//! Balls are tested against rectangles using their bounding boxes, which is
//! how the classic game resolves paddle and brick contacts. Rebounds reflect
//! off the axis of least penetration.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Overlap test that counts touching edges as contact
    pub fn touches(&self, other: &Rect) -> bool {
        self.right() >= other.x
            && self.x <= other.right()
            && self.bottom() >= other.y
            && self.y <= other.bottom()
    }
}

/// Which velocity component a rebound flips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReboundAxis {
    /// Side contact, flip dx
    Horizontal,
    /// Top/bottom contact, flip dy
    Vertical,
}

/// Penetration depths of a ball's bounding box into a rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Overlap {
    /// Axis with the smaller penetration. Ties go to the vertical axis.
    pub fn least_axis(&self) -> ReboundAxis {
        let min_x = self.left.min(self.right);
        let min_y = self.top.min(self.bottom);
        if min_x < min_y {
            ReboundAxis::Horizontal
        } else {
            ReboundAxis::Vertical
        }
    }
}

/// Strict bounding-box overlap between a ball and a rectangle
pub fn ball_overlaps_rect(pos: Vec2, radius: f32, rect: &Rect) -> bool {
    pos.x + radius > rect.x
        && pos.x - radius < rect.right()
        && pos.y + radius > rect.y
        && pos.y - radius < rect.bottom()
}

/// Inclusive bounding-box contact between a ball and a rectangle
pub fn ball_touches_rect(pos: Vec2, radius: f32, rect: &Rect) -> bool {
    pos.y + radius >= rect.y
        && pos.y - radius <= rect.bottom()
        && pos.x + radius >= rect.x
        && pos.x - radius <= rect.right()
}

/// Directional penetration of a ball's bounding box into a rectangle
pub fn ball_rect_overlap(pos: Vec2, radius: f32, rect: &Rect) -> Overlap {
    Overlap {
        left: pos.x + radius - rect.x,
        right: rect.right() - (pos.x - radius),
        top: pos.y + radius - rect.y,
        bottom: rect.bottom() - (pos.y - radius),
    }
}

/// Flip the velocity component for the given axis
#[inline]
pub fn reflect(vel: Vec2, axis: ReboundAxis) -> Vec2 {
    match axis {
        ReboundAxis::Horizontal => Vec2::new(-vel.x, vel.y),
        ReboundAxis::Vertical => Vec2::new(vel.x, -vel.y),
    }
}

/// Result of bouncing a ball against the field walls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallContact {
    /// Still in play
    InPlay,
    /// Bottom edge crossed the floor
    Lost,
}

/// Bounce a ball off the left, right and top walls.
///
/// Position is clamped back inside before the velocity flips. The floor is
/// open: a ball whose bottom edge passes it is reported lost.
pub fn bounce_off_walls(
    pos: &mut Vec2,
    vel: &mut Vec2,
    radius: f32,
    field_width: f32,
    field_height: f32,
) -> WallContact {
    if pos.x + radius > field_width {
        pos.x = field_width - radius;
        *vel = reflect(*vel, ReboundAxis::Horizontal);
    } else if pos.x - radius < 0.0 {
        pos.x = radius;
        *vel = reflect(*vel, ReboundAxis::Horizontal);
    }

    if pos.y - radius < 0.0 {
        pos.y = radius;
        *vel = reflect(*vel, ReboundAxis::Vertical);
    }

    if pos.y + radius > field_height {
        WallContact::Lost
    } else {
        WallContact::InPlay
    }
}

/// Paddle bounce angle from vertical, scaled by where the ball struck.
///
/// Offset is normalized so the paddle edges map to ±1 (clamped), giving
/// `±max_angle` at the edges and straight up at the center.
pub fn paddle_bounce_angle(ball_x: f32, paddle: &Rect, max_angle: f32) -> f32 {
    let half = paddle.width / 2.0;
    let hit = ((ball_x - paddle.center_x()) / half).clamp(-1.0, 1.0);
    max_angle * hit
}
