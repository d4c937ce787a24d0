//! Render snapshot
//!
//! Everything a drawing layer needs for one frame, detached from the arena.
//! Serializes to JSON for browser hosts.

use glam::Vec2;
use serde::Serialize;

use crate::sim::{Arena, Body, BodyId};

/// Scale applied to a body while it is held
pub const HELD_SCALE: f32 = 1.1;

/// Ground shadow under a body resting over a floor
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShadowView {
    /// Shadow center, on the ground line
    pub position: Vec2,
    /// Diameter (height is half of this)
    pub size: f32,
    pub opacity: f32,
}

impl ShadowView {
    /// Shrinks and fades as the body rises
    pub fn under(pos: Vec2, ground: f32) -> Self {
        let distance = ground - pos.y;
        Self {
            position: Vec2::new(pos.x, ground),
            size: (60.0 - distance / 10.0).clamp(10.0, 40.0),
            opacity: (1.0 - distance / 500.0).clamp(0.1, 0.3),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyView {
    pub id: BodyId,
    pub position: Vec2,
    /// Degrees
    pub rotation: f32,
    /// Dead bodies stay in the list (last transform) but are hidden
    pub alive: bool,
    pub held: bool,
    pub scale: f32,
    /// Lower bodies draw on top
    pub z_index: i32,
    pub shadow: Option<ShadowView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SplashView {
    pub id: u32,
    pub position: Vec2,
    /// 0 at spawn, 1 at expiry
    pub age_fraction: f32,
}

/// One frame's worth of output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    pub tick: u64,
    pub bodies: Vec<BodyView>,
    pub splashes: Vec<SplashView>,
    pub won: bool,
}

impl RenderFrame {
    pub fn capture(arena: &Arena) -> Self {
        let ground = arena.config.ground_y().map(|_| arena.config.max_bound().y);
        let height = arena.config.height;

        let bodies = arena
            .bodies
            .iter()
            .map(|b| body_view(b, ground, height))
            .collect();

        let lifetime = arena.config.game.map(|g| g.splash_lifetime_ms).unwrap_or(0.0);
        let splashes = arena
            .splashes
            .iter()
            .map(|s| SplashView {
                id: s.id,
                position: s.pos,
                age_fraction: s.age_fraction(lifetime),
            })
            .collect();

        Self {
            tick: arena.time_ticks,
            bodies,
            splashes,
            won: arena.is_won(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn body_view(body: &Body, ground: Option<f32>, height: f32) -> BodyView {
    // Floating widgets keep their size; free-floating cards get a little
    // perspective from their height in the arena.
    let base_scale = match ground {
        Some(_) => 1.0,
        None => 0.95 + (body.pos.y / height) * 0.08,
    };
    let scale = if body.held { base_scale * HELD_SCALE } else { base_scale };

    let shadow = match ground {
        Some(ground) if !body.held => Some(ShadowView::under(body.pos, ground)),
        _ => None,
    };

    BodyView {
        id: body.id,
        position: body.pos,
        rotation: body.rotation,
        alive: body.alive,
        held: body.held,
        scale,
        z_index: body.pos.y.round() as i32,
        shadow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ArenaConfig;

    #[test]
    fn test_shadow_shrinks_with_height() {
        let on_ground = ShadowView::under(Vec2::new(10.0, 520.0), 520.0);
        assert_eq!(on_ground.size, 40.0);
        assert!((on_ground.opacity - 0.3).abs() < 1e-6);
        assert_eq!(on_ground.position, Vec2::new(10.0, 520.0));

        let high = ShadowView::under(Vec2::new(10.0, 20.0), 520.0);
        assert_eq!(high.size, 10.0);
        assert!((high.opacity - 0.1).abs() < 1e-6);

        let mid = ShadowView::under(Vec2::new(10.0, 270.0), 520.0);
        assert!((mid.size - 35.0).abs() < 1e-4);
    }

    #[test]
    fn test_capture_cards() {
        let mut arena = Arena::new(ArenaConfig::card_shooter(1000.0, 600.0), 4).unwrap();
        arena.bodies[0].pos = Vec2::new(300.0, 300.0);
        let pos = arena.bodies[0].pos;
        arena.shoot(pos);

        let frame = RenderFrame::capture(&arena);
        assert_eq!(frame.bodies.len(), 4);
        assert!(!frame.bodies[0].alive);
        assert_eq!(frame.bodies[0].position, pos);
        assert!((frame.bodies[0].scale - 0.99).abs() < 1e-5);
        assert_eq!(frame.bodies[0].z_index, 300);
        assert!(frame.bodies.iter().all(|b| b.shadow.is_none()));
        assert_eq!(frame.splashes.len(), 1);
        assert_eq!(frame.splashes[0].age_fraction, 0.0);
        assert!(!frame.won);
    }

    #[test]
    fn test_capture_buttons() {
        let mut arena = Arena::new(ArenaConfig::floating_buttons(800.0, 600.0), 4).unwrap();
        let pos = arena.bodies[1].pos;
        arena.pointer_down(1, pos, 0.0);

        let frame = RenderFrame::capture(&arena);
        assert_eq!(frame.bodies[0].scale, 1.0);
        assert!(frame.bodies[0].shadow.is_some());
        assert!(frame.bodies[1].held);
        assert!((frame.bodies[1].scale - HELD_SCALE).abs() < 1e-6);
        assert!(frame.bodies[1].shadow.is_none());
    }

    #[test]
    fn test_frame_json() {
        let arena = Arena::new(ArenaConfig::card_shooter(1000.0, 600.0), 4).unwrap();
        let json = RenderFrame::capture(&arena).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["bodies"].as_array().unwrap().len(), 4);
        assert_eq!(value["won"], serde_json::Value::Bool(false));
    }
}
