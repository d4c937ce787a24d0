//! Arena state and core simulation types
//!
//! One `Arena` owns every body, the drag session, game-layer state and the
//! seeded RNG. Nothing is shared; the stepper takes the arena explicitly.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::drag::DragSession;
use crate::settings::{ArenaConfig, ConfigError, SpawnPattern};

/// Stable body handle (its index in the arena)
pub type BodyId = u32;

/// A simulated body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    /// Center, arena-local
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    /// Degrees, cosmetic only
    pub rotation: f32,
    /// Collision circle radius
    pub radius: f32,
    /// Half of the on-screen size, used against walls
    pub half_extent: Vec2,
    /// False once shot; a dead body keeps its last transform
    pub alive: bool,
    /// Position is owned by the drag session
    pub held: bool,
    /// Has touched the resting floor at least once
    pub landed: bool,
}

impl Body {
    pub fn new(id: BodyId, pos: Vec2, vel: Vec2, config: &ArenaConfig) -> Self {
        Self {
            id,
            pos,
            vel,
            rotation: 0.0,
            radius: config.radius(),
            half_extent: config.half_extent(),
            alive: true,
            held: false,
            landed: false,
        }
    }

    /// Takes part in integration and collisions this tick
    #[inline]
    pub fn is_active(&self) -> bool {
        self.alive && !self.held
    }

    /// Whether `point` falls inside the collision circle
    pub fn contains(&self, point: Vec2) -> bool {
        self.pos.distance_squared(point) <= self.radius * self.radius
    }
}

/// Transient marker left where a body was shot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Splash {
    pub id: u32,
    pub pos: Vec2,
    pub age_ms: f32,
}

impl Splash {
    /// 0 at spawn, 1 at expiry
    pub fn age_fraction(&self, lifetime_ms: f32) -> f32 {
        if lifetime_ms <= 0.0 {
            1.0
        } else {
            (self.age_ms / lifetime_ms).clamp(0.0, 1.0)
        }
    }
}

/// Game-layer phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Phase {
    Playing,
    /// Everything shot; frozen until the reset timer fires
    /// (`None` once the timer has been cancelled)
    Won { reset_in_ms: Option<f32> },
}

/// Things the host may want to react to (sounds, button actions)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BodyEliminated { id: BodyId, pos: Vec2 },
    Won,
    ArenaReset,
    BodyLanded { id: BodyId },
    /// Pointer went down and up on a body without moving it
    BodyTapped { id: BodyId },
    BodyThrown { id: BodyId, vel: Vec2 },
}

/// The arena: bounded box of bodies plus everything that mutates them
#[derive(Debug, Clone)]
pub struct Arena {
    pub config: ArenaConfig,
    /// Stable order, used for pairwise iteration and hit testing
    pub bodies: Vec<Body>,
    pub splashes: Vec<Splash>,
    pub phase: Phase,
    pub drag: DragSession,
    /// Steps taken since construction
    pub time_ticks: u64,
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    seed: u64,
    next_splash_id: u32,
}

impl Arena {
    /// Build an arena and spawn its bodies
    pub fn new(config: ArenaConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut arena = Self {
            config,
            bodies: Vec::new(),
            splashes: Vec::new(),
            phase: Phase::Playing,
            drag: DragSession::Idle,
            time_ticks: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            seed,
            next_splash_id: 1,
        };
        arena.spawn_bodies();

        log::info!(
            "Arena {}x{} created with {} bodies (seed {})",
            arena.config.width,
            arena.config.height,
            arena.bodies.len(),
            seed
        );
        Ok(arena)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Replace every body with a freshly spawned one, all alive
    fn spawn_bodies(&mut self) {
        let min = self.config.min_bound();
        let max = self.config.max_bound();

        let bodies: Vec<Body> = match &self.config.spawn {
            SpawnPattern::Random {
                speed_min,
                speed_max,
            } => (0..self.config.body_count)
                .map(|i| {
                    let pos = Vec2::new(
                        min.x + self.rng.random::<f32>() * (max.x - min.x),
                        min.y + self.rng.random::<f32>() * (max.y - min.y),
                    );
                    let angle = self.rng.random::<f32>() * std::f32::consts::TAU;
                    let speed = speed_min + self.rng.random::<f32>() * (speed_max - speed_min);
                    Body::new(i as BodyId, pos, crate::from_angle(angle, speed), &self.config)
                })
                .collect(),
            SpawnPattern::Anchored { points } => points
                .iter()
                .enumerate()
                .map(|(i, p)| Body::new(i as BodyId, p.clamp(min, max), Vec2::ZERO, &self.config))
                .collect(),
        };

        self.bodies = bodies;
    }

    /// Respawn all bodies and return to play
    pub fn reset(&mut self) {
        self.drag = DragSession::Idle;
        self.spawn_bodies();
        self.phase = Phase::Playing;
        self.events.push(GameEvent::ArenaReset);
        log::info!("Arena reset ({} bodies)", self.bodies.len());
    }

    /// Change the arena bounds, pulling every body back inside the walls
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), ConfigError> {
        let mut config = self.config.clone();
        config.width = width;
        config.height = height;
        config.validate()?;
        self.config = config;

        let min = self.config.min_bound();
        let max = self.config.max_bound();
        for body in &mut self.bodies {
            body.pos = body.pos.clamp(min, max);
        }
        log::debug!("Arena resized to {}x{}", width, height);
        Ok(())
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id as usize)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id as usize)
    }

    /// First alive body whose collision circle contains `point`
    pub fn body_at(&self, point: Vec2) -> Option<BodyId> {
        self.bodies
            .iter()
            .find(|b| b.alive && b.contains(point))
            .map(|b| b.id)
    }

    pub fn alive_count(&self) -> usize {
        self.bodies.iter().filter(|b| b.alive).count()
    }

    pub fn is_won(&self) -> bool {
        matches!(self.phase, Phase::Won { .. })
    }

    /// Hand accumulated events to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Allocate a splash id
    pub(crate) fn next_splash_id(&mut self) -> u32 {
        let id = self.next_splash_id;
        self.next_splash_id = self.next_splash_id.wrapping_add(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards() -> Arena {
        Arena::new(ArenaConfig::card_shooter(1000.0, 600.0), 7).unwrap()
    }

    #[test]
    fn test_random_spawn_inside_walls() {
        let arena = cards();
        let min = arena.config.min_bound();
        let max = arena.config.max_bound();
        assert_eq!(arena.bodies.len(), 4);
        for (i, body) in arena.bodies.iter().enumerate() {
            assert_eq!(body.id, i as BodyId);
            assert!(body.alive);
            assert!(body.pos.cmpge(min).all() && body.pos.cmple(max).all());
            let speed = body.vel.length();
            assert!((3.5..=7.0).contains(&speed), "speed {speed}");
        }
    }

    #[test]
    fn test_anchored_spawn() {
        let arena = Arena::new(ArenaConfig::floating_buttons(800.0, 600.0), 1).unwrap();
        assert_eq!(arena.bodies.len(), 2);
        assert_eq!(arena.bodies[0].pos, Vec2::new(60.0, 28.0));
        assert_eq!(arena.bodies[1].pos, Vec2::new(740.0, 28.0));
        assert!(arena.bodies.iter().all(|b| b.vel == Vec2::ZERO));
    }

    #[test]
    fn test_same_seed_same_spawn() {
        let a = cards();
        let b = cards();
        assert_eq!(a.bodies, b.bodies);
    }

    #[test]
    fn test_reset_revives_and_rerolls() {
        let mut arena = cards();
        let before: Vec<Vec2> = arena.bodies.iter().map(|b| b.pos).collect();
        for body in &mut arena.bodies {
            body.alive = false;
        }
        arena.phase = Phase::Won {
            reset_in_ms: Some(0.0),
        };

        arena.reset();
        assert_eq!(arena.phase, Phase::Playing);
        assert_eq!(arena.alive_count(), 4);
        let after: Vec<Vec2> = arena.bodies.iter().map(|b| b.pos).collect();
        assert_ne!(before, after);
        assert_eq!(arena.drain_events(), vec![GameEvent::ArenaReset]);
    }

    #[test]
    fn test_resize_clamps_bodies() {
        let mut arena = cards();
        arena.bodies[0].pos = Vec2::new(900.0, 500.0);
        arena.resize(700.0, 500.0).unwrap();
        let max = arena.config.max_bound();
        assert_eq!(max, Vec2::new(552.0, 392.0));
        assert!(arena.bodies.iter().all(|b| b.pos.cmple(max).all()));

        assert!(arena.resize(100.0, 500.0).is_err());
        assert_eq!(arena.config.width, 700.0);
    }

    #[test]
    fn test_body_at_skips_dead() {
        let mut arena = cards();
        let target = arena.bodies[2].pos;
        for body in &mut arena.bodies {
            body.pos = Vec2::new(150.0, 110.0);
        }
        arena.bodies[2].pos = target;
        arena.bodies[2].alive = false;
        assert_ne!(arena.body_at(target), Some(2));
    }

    #[test]
    fn test_splash_age_fraction() {
        let splash = Splash {
            id: 1,
            pos: Vec2::ZERO,
            age_ms: 350.0,
        };
        assert!((splash.age_fraction(700.0) - 0.5).abs() < 1e-6);
        assert_eq!(splash.age_fraction(0.0), 1.0);
    }
}
