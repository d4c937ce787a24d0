//! Arena configuration and presets
//!
//! Supplied once when an arena is built. Persisted as JSON (LocalStorage on
//! the web) so a page can tweak the feel without a rebuild.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised when validating or parsing a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("arena bounds must be positive and finite, got {width}x{height}")]
    NonPositiveBounds { width: f32, height: f32 },
    #[error("body {body_width}x{body_height} (+{padding} padding) does not fit in a {width}x{height} arena")]
    BodyDoesNotFit {
        body_width: f32,
        body_height: f32,
        padding: f32,
        width: f32,
        height: f32,
    },
    #[error("{name} must be within [{min}, {max}], got {value}")]
    CoefficientOutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    #[error("arena must contain at least one body")]
    EmptyArena,
    #[error("spawn speed band [{min}, {max}] is invalid")]
    InvalidSpeedBand { min: f32, max: f32 },
    #[error("anchored spawn lists {found} points for {expected} bodies")]
    SpawnMismatch { expected: usize, found: usize },
    #[error("unknown preset '{0}'")]
    UnknownPreset(String),
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Wall restitution per wall kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallPolicy {
    /// Left and right walls
    pub side: f32,
    /// Bottom wall (or resting floor)
    pub floor: f32,
    /// Top wall
    pub ceiling: f32,
}

impl WallPolicy {
    pub fn uniform(restitution: f32) -> Self {
        Self {
            side: restitution,
            floor: restitution,
            ceiling: restitution,
        }
    }
}

/// A floor bodies come to rest on instead of bouncing forever
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RestingFloor {
    /// Distance of the ground line above the bottom edge
    pub ground_offset: f32,
    /// A grounded body with |vx| below this ...
    pub rest_vx: f32,
    /// ... and |vy| below this is snapped to rest
    pub rest_vy: f32,
}

/// Soft repulsion between bodies that get close, layered on top of hard
/// collisions (or used alone)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProximityNudge {
    /// Center distance where repulsion starts
    pub distance: f32,
    /// Impulse at zero distance; falls off linearly to 0 at `distance`
    pub force: f32,
}

/// Random kick that keeps slow bodies drifting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LowSpeedNudge {
    pub min_speed: f32,
    /// Kick range is [-jitter, jitter] per axis
    pub jitter: f32,
}

/// How bodies are placed when the arena (re)initializes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpawnPattern {
    /// Uniform position inside the walls, uniform heading, speed in [min, max)
    Random { speed_min: f32, speed_max: f32 },
    /// Fixed starting points (clamped inside the walls), at rest
    Anchored { points: Vec<Vec2> },
}

/// Shooting game rules (multi-body arenas only)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameRules {
    /// Click must land within this distance of a body center
    pub hit_radius: f32,
    /// Shockwave kick range is [-kick, kick] per axis
    pub kick: f32,
    pub splash_lifetime_ms: f32,
    pub win_reset_delay_ms: f32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            hit_radius: CARD_HIT_RADIUS,
            kick: CARD_KICK,
            splash_lifetime_ms: SPLASH_LIFETIME_MS,
            win_reset_delay_ms: WIN_RESET_DELAY_MS,
        }
    }
}

/// Complete arena configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaConfig {
    pub width: f32,
    pub height: f32,
    /// On-screen size of every body (walls use half of this)
    pub body_size: Vec2,
    /// Collision circle diameter as a fraction of `body_size.x`
    pub collision_scale: f32,
    pub body_count: usize,
    /// Gap between walls and the arena edge
    pub padding: f32,
    /// Added to vy each tick
    pub gravity: f32,
    /// Per-tick velocity damping per axis
    pub friction: Vec2,
    pub walls: WallPolicy,
    #[serde(default)]
    pub floor: Option<RestingFloor>,
    /// Body-body collision response (hard collisions only)
    pub body_restitution: f32,
    pub hard_collisions: bool,
    #[serde(default)]
    pub proximity: Option<ProximityNudge>,
    #[serde(default)]
    pub nudge: Option<LowSpeedNudge>,
    /// Degrees of spin added per unit of vx
    pub rotation_factor: f32,
    /// Spin only accumulates while |vx| exceeds this
    pub rotation_threshold: f32,
    pub max_speed: f32,
    pub spawn: SpawnPattern,
    #[serde(default)]
    pub game: Option<GameRules>,
    pub draggable: bool,
}

impl ArenaConfig {
    /// Two draggable buttons that drop in from the top corners and settle on
    /// a floor above the bottom edge.
    pub fn floating_buttons(width: f32, height: f32) -> Self {
        let top = BUTTON_SIZE / 2.0;
        Self {
            width,
            height,
            body_size: Vec2::splat(BUTTON_SIZE),
            collision_scale: 1.0,
            body_count: 2,
            padding: 0.0,
            gravity: BUTTON_GRAVITY,
            friction: Vec2::new(BUTTON_FRICTION, 1.0),
            walls: WallPolicy {
                side: BUTTON_SIDE_RESTITUTION,
                floor: BUTTON_FLOOR_RESTITUTION,
                ceiling: BUTTON_FLOOR_RESTITUTION,
            },
            floor: Some(RestingFloor {
                ground_offset: BUTTON_GROUND_OFFSET,
                rest_vx: BUTTON_REST_VX,
                rest_vy: BUTTON_REST_VY,
            }),
            body_restitution: CARD_BODY_RESTITUTION,
            hard_collisions: false,
            proximity: Some(ProximityNudge {
                distance: BUTTON_PROXIMITY_DISTANCE,
                force: BUTTON_PROXIMITY_FORCE,
            }),
            nudge: None,
            rotation_factor: BUTTON_ROTATION_FACTOR,
            rotation_threshold: BUTTON_REST_VX,
            max_speed: MAX_SPEED,
            spawn: SpawnPattern::Anchored {
                points: vec![
                    Vec2::new(BUTTON_SPAWN_INSET, top),
                    Vec2::new(width - BUTTON_SPAWN_INSET, top),
                ],
            },
            game: None,
            draggable: true,
        }
    }

    /// Four cards drifting around a padded box, shot down by clicks.
    pub fn card_shooter(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            body_size: Vec2::new(CARD_WIDTH, CARD_HEIGHT),
            collision_scale: CARD_COLLISION_SCALE,
            body_count: CARD_COUNT,
            padding: CARD_PADDING,
            gravity: 0.0,
            friction: Vec2::splat(CARD_FRICTION),
            walls: WallPolicy::uniform(CARD_WALL_RESTITUTION),
            floor: None,
            body_restitution: CARD_BODY_RESTITUTION,
            hard_collisions: true,
            proximity: None,
            nudge: Some(LowSpeedNudge {
                min_speed: CARD_MIN_SPEED,
                jitter: CARD_NUDGE_JITTER,
            }),
            rotation_factor: CARD_ROTATION_FACTOR,
            rotation_threshold: 0.0,
            max_speed: MAX_SPEED,
            spawn: SpawnPattern::Random {
                speed_min: CARD_SPAWN_SPEED_MIN,
                speed_max: CARD_SPAWN_SPEED_MAX,
            },
            game: Some(GameRules::default()),
            draggable: false,
        }
    }

    /// Resolve a preset by name ("buttons" or "cards")
    pub fn preset(name: &str, width: f32, height: f32) -> Result<Self, ConfigError> {
        match name.to_lowercase().as_str() {
            "buttons" | "floating_buttons" => Ok(Self::floating_buttons(width, height)),
            "cards" | "card_shooter" => Ok(Self::card_shooter(width, height)),
            _ => Err(ConfigError::UnknownPreset(name.to_string())),
        }
    }

    /// Half of the body's on-screen size
    #[inline]
    pub fn half_extent(&self) -> Vec2 {
        self.body_size / 2.0
    }

    /// Radius of the collision circle
    #[inline]
    pub fn radius(&self) -> f32 {
        self.body_size.x * self.collision_scale / 2.0
    }

    /// Smallest legal body center
    #[inline]
    pub fn min_bound(&self) -> Vec2 {
        self.half_extent() + Vec2::splat(self.padding)
    }

    /// Largest legal body center (bottom is the ground line when there is a
    /// resting floor above the wall)
    pub fn max_bound(&self) -> Vec2 {
        let max = Vec2::new(self.width, self.height) - self.half_extent() - Vec2::splat(self.padding);
        match self.ground_y() {
            Some(ground) => Vec2::new(max.x, max.y.min(ground).max(self.min_bound().y)),
            None => max,
        }
    }

    /// Ground line of the resting floor, if any
    pub fn ground_y(&self) -> Option<f32> {
        self.floor.map(|f| self.height - f.ground_offset)
    }

    /// Bodies spawned by this config
    pub fn spawn_count(&self) -> usize {
        match &self.spawn {
            SpawnPattern::Anchored { points } => points.len(),
            SpawnPattern::Random { .. } => self.body_count,
        }
    }

    /// Check bounds, coefficients and spawn settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::NonPositiveBounds {
                width: self.width,
                height: self.height,
            });
        }

        // Written as a positive test so NaN sizes or padding fail it
        let fits = |size: f32, dim: f32| {
            size.is_finite() && size > 0.0 && size + 2.0 * self.padding < dim
        };
        if !(self.padding.is_finite()
            && self.padding >= 0.0
            && fits(self.body_size.x, self.width)
            && fits(self.body_size.y, self.height))
        {
            return Err(ConfigError::BodyDoesNotFit {
                body_width: self.body_size.x,
                body_height: self.body_size.y,
                padding: self.padding,
                width: self.width,
                height: self.height,
            });
        }

        let unit = [
            ("friction.x", self.friction.x),
            ("friction.y", self.friction.y),
            ("walls.side", self.walls.side),
            ("walls.floor", self.walls.floor),
            ("walls.ceiling", self.walls.ceiling),
            ("body_restitution", self.body_restitution),
        ];
        for (name, value) in unit {
            check_range(name, value, 0.0, 1.0)?;
        }
        check_range("collision_scale", self.collision_scale, f32::EPSILON, 2.0)?;
        check_range("max_speed", self.max_speed, f32::EPSILON, f32::MAX)?;
        check_range("gravity", self.gravity, -f32::MAX, f32::MAX)?;
        check_range("rotation_factor", self.rotation_factor, -f32::MAX, f32::MAX)?;
        check_range("rotation_threshold", self.rotation_threshold, 0.0, f32::MAX)?;
        if let Some(floor) = &self.floor {
            check_range("floor.ground_offset", floor.ground_offset, 0.0, f32::MAX)?;
            check_range("floor.rest_vx", floor.rest_vx, 0.0, f32::MAX)?;
            check_range("floor.rest_vy", floor.rest_vy, 0.0, f32::MAX)?;
        }
        if let Some(nudge) = &self.nudge {
            check_range("nudge.min_speed", nudge.min_speed, 0.0, f32::MAX)?;
            check_range("nudge.jitter", nudge.jitter, 0.0, f32::MAX)?;
        }
        if let Some(proximity) = &self.proximity {
            check_range("proximity.distance", proximity.distance, f32::EPSILON, f32::MAX)?;
            check_range("proximity.force", proximity.force, 0.0, f32::MAX)?;
        }
        if let Some(game) = &self.game {
            check_range("game.hit_radius", game.hit_radius, f32::EPSILON, f32::MAX)?;
            check_range("game.kick", game.kick, 0.0, f32::MAX)?;
            check_range("game.splash_lifetime_ms", game.splash_lifetime_ms, 0.0, f32::MAX)?;
            check_range("game.win_reset_delay_ms", game.win_reset_delay_ms, 0.0, f32::MAX)?;
        }

        if self.body_count == 0 {
            return Err(ConfigError::EmptyArena);
        }

        match &self.spawn {
            SpawnPattern::Random {
                speed_min,
                speed_max,
            } => {
                if !(*speed_min >= 0.0 && speed_min <= speed_max && speed_max.is_finite()) {
                    return Err(ConfigError::InvalidSpeedBand {
                        min: *speed_min,
                        max: *speed_max,
                    });
                }
            }
            SpawnPattern::Anchored { points } => {
                if points.len() != self.body_count {
                    return Err(ConfigError::SpawnMismatch {
                        expected: self.body_count,
                        found: points.len(),
                    });
                }
                for point in points {
                    check_range("spawn.x", point.x, -f32::MAX, f32::MAX)?;
                    check_range("spawn.y", point.y, -f32::MAX, f32::MAX)?;
                }
            }
        }

        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Load a saved config from LocalStorage, falling back to `fallback`
    #[cfg(target_arch = "wasm32")]
    pub fn load(key: &str, fallback: Self) -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(key) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded arena config '{}' from LocalStorage", key);
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config '{}': {}", key, e),
                }
            }
        }

        fallback
    }

    /// Save config to LocalStorage
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self, key: &str) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(key, &json);
                log::info!("Arena config '{}' saved", key);
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(_key: &str, fallback: Self) -> Self {
        fallback
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self, _key: &str) {
        // No-op for native
    }
}

fn check_range(name: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::CoefficientOutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}
