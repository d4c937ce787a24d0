//! Per-frame arena step
//!
//! Velocities are per tick, so effective speed follows the host's frame
//! rate. `dt_ms` only drives the game-layer timers.

use glam::Vec2;
use rand::Rng;

use super::collision;
use super::state::{Arena, Body, GameEvent};
use crate::settings::ArenaConfig;

/// Advance the arena by one frame
pub fn tick(arena: &mut Arena, dt_ms: f32) {
    arena.time_ticks += 1;

    arena.advance_timers(dt_ms);

    // Pairs first, walls last: whatever the pair pass does, every body ends
    // the step inside the walls.
    collision::resolve_bodies(&mut arena.bodies, &arena.config);

    for body in arena.bodies.iter_mut().filter(|b| b.is_active()) {
        if let Some(event) = integrate(body, &arena.config, &mut arena.rng) {
            arena.events.push(event);
        }
    }
}

/// Move one free body: position, walls, floor, gravity, damping, nudge,
/// speed cap and spin. Returns a landing event the first time the body
/// touches a resting floor.
pub fn integrate<R: Rng>(body: &mut Body, config: &ArenaConfig, rng: &mut R) -> Option<GameEvent> {
    let mut event = None;
    body.pos += body.vel;

    match config.floor {
        Some(floor) => {
            let min = config.min_bound();
            let max = config.max_bound();
            collision::bounce_side_walls(body, min.x, max.x, config.walls.side);
            collision::bounce_ceiling(body, min.y, config.walls.ceiling);

            let ground = max.y;
            if body.pos.y >= ground {
                if !body.landed {
                    body.landed = true;
                    event = Some(GameEvent::BodyLanded { id: body.id });
                    log::debug!("Body {} landed", body.id);
                }

                if body.vel.y.abs() < floor.rest_vy && body.vel.x.abs() < floor.rest_vx {
                    body.vel = Vec2::ZERO;
                } else {
                    body.vel.x *= config.friction.x;
                    body.vel.y = -body.vel.y * config.walls.floor;
                }
                body.pos.y = ground;
            }

            // Settled bodies stop accumulating gravity
            if body.pos.y < ground || body.vel.y.abs() > 0.1 {
                body.vel *= config.friction;
                body.vel.y += config.gravity;
            }
        }
        None => {
            collision::bounce_walls(body, config);
            body.vel *= config.friction;
            body.vel.y += config.gravity;
        }
    }

    if let Some(nudge) = &config.nudge {
        if body.vel.length() < nudge.min_speed {
            body.vel += Vec2::new(
                rng.random_range(-nudge.jitter..=nudge.jitter),
                rng.random_range(-nudge.jitter..=nudge.jitter),
            );
        }
    }

    let capped = crate::clamp_speed(body.vel, config.max_speed);
    if capped != body.vel {
        log::debug!("Body {} speed clamped from {}", body.id, body.vel.length());
        body.vel = capped;
    }

    if body.vel.x.abs() > config.rotation_threshold {
        body.rotation += body.vel.x * config.rotation_factor;
    }

    event
}
