//! Bouncy Arena - 2D bounce/collision arena for playful UI widgets
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (bodies, collisions, dragging, shooting game)
//! - `settings`: Arena configuration, presets and validation
//! - `render`: Per-frame snapshot handed to whatever draws the bodies
//! - `host`: Frame loop driver with input dispatch and teardown
//! - `web`: wasm-bindgen handle for browser hosts

pub mod host;
pub mod render;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use host::{FrameLoop, InputEvent};
pub use render::RenderFrame;
pub use settings::{ArenaConfig, ConfigError};

use glam::Vec2;

/// Tuning constants lifted from the widgets this arena drives.
///
/// Velocities are in pixels per tick, not per second: the step applies fixed
/// increments each frame.
pub mod consts {
    /// Frame duration the drag velocity estimate is normalized to (ms)
    pub const FRAME_BASELINE_MS: f32 = 16.0;
    /// Longest frame gap the host loop will report to timers (ms)
    pub const MAX_FRAME_MS: f64 = 100.0;
    /// Hard cap on body speed (pixels/tick)
    pub const MAX_SPEED: f32 = 40.0;

    /// Floating buttons
    pub const BUTTON_SIZE: f32 = 56.0;
    pub const BUTTON_GRAVITY: f32 = 0.6;
    pub const BUTTON_FRICTION: f32 = 0.98;
    pub const BUTTON_SIDE_RESTITUTION: f32 = 0.7;
    pub const BUTTON_FLOOR_RESTITUTION: f32 = 0.35;
    /// Resting floor sits this far above the bottom edge
    pub const BUTTON_GROUND_OFFSET: f32 = 80.0;
    pub const BUTTON_REST_VX: f32 = 0.5;
    pub const BUTTON_REST_VY: f32 = 2.5;
    pub const BUTTON_ROTATION_FACTOR: f32 = 0.5;
    /// Buttons start repelling at this center distance
    pub const BUTTON_PROXIMITY_DISTANCE: f32 = BUTTON_SIZE * 1.2;
    pub const BUTTON_PROXIMITY_FORCE: f32 = 5.0;
    /// Horizontal inset of the two spawn anchors
    pub const BUTTON_SPAWN_INSET: f32 = 60.0;

    /// Service cards
    pub const CARD_WIDTH: f32 = 280.0;
    pub const CARD_HEIGHT: f32 = 200.0;
    pub const CARD_COUNT: usize = 4;
    pub const CARD_PADDING: f32 = 8.0;
    pub const CARD_FRICTION: f32 = 0.99;
    pub const CARD_WALL_RESTITUTION: f32 = 0.35;
    pub const CARD_BODY_RESTITUTION: f32 = 0.95;
    /// Collision circle diameter as a fraction of card width
    pub const CARD_COLLISION_SCALE: f32 = 0.85;
    pub const CARD_MIN_SPEED: f32 = 0.5;
    pub const CARD_NUDGE_JITTER: f32 = 0.45;
    pub const CARD_ROTATION_FACTOR: f32 = 0.18;
    pub const CARD_SPAWN_SPEED_MIN: f32 = 3.5;
    pub const CARD_SPAWN_SPEED_MAX: f32 = 7.0;
    pub const CARD_HIT_RADIUS: f32 = 160.0;
    /// Shockwave kick range is [-CARD_KICK, CARD_KICK] on each axis
    pub const CARD_KICK: f32 = 2.75;
    pub const SPLASH_LIFETIME_MS: f32 = 700.0;
    pub const WIN_RESET_DELAY_MS: f32 = 2200.0;
}

/// Unit vector at `angle` scaled to `length`
#[inline]
pub fn from_angle(angle: f32, length: f32) -> Vec2 {
    Vec2::new(angle.cos() * length, angle.sin() * length)
}

/// Angle of the line from `from` to `to` (radians)
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Clamp a velocity's magnitude to `max`, keeping its direction.
///
/// Returns the input untouched when it is already within range.
#[inline]
pub fn clamp_speed(vel: Vec2, max: f32) -> Vec2 {
    let len_sq = vel.length_squared();
    if len_sq > max * max {
        vel * (max / len_sq.sqrt())
    } else {
        vel
    }
}
