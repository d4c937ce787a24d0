//! Collision detection and response
//!
//! Walls are axis-aligned and sit half a body plus padding in from each
//! edge. Bodies collide with each other as equal-mass circles.

use glam::Vec2;

use super::state::Body;
use crate::settings::{ArenaConfig, ProximityNudge};

/// Walls touched during one resolution pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallHits {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl WallHits {
    pub fn any(&self) -> bool {
        self.left || self.right || self.top || self.bottom
    }
}

/// Clamp one axis into [lo, hi] and send the velocity back inward, scaled by
/// the restitution of the wall it hit. Returns (hit_lo, hit_hi).
#[inline]
fn bounce_axis(pos: &mut f32, vel: &mut f32, lo: f32, hi: f32, k_lo: f32, k_hi: f32) -> (bool, bool) {
    if *pos < lo {
        *pos = lo;
        *vel = vel.abs() * k_lo;
        (true, false)
    } else if *pos > hi {
        *pos = hi;
        *vel = -vel.abs() * k_hi;
        (false, true)
    } else {
        (false, false)
    }
}

/// Left and right walls
pub fn bounce_side_walls(body: &mut Body, min_x: f32, max_x: f32, restitution: f32) -> WallHits {
    let (left, right) = bounce_axis(
        &mut body.pos.x,
        &mut body.vel.x,
        min_x,
        max_x,
        restitution,
        restitution,
    );
    WallHits {
        left,
        right,
        ..Default::default()
    }
}

/// Top wall only (arenas with a resting floor handle the bottom themselves)
pub fn bounce_ceiling(body: &mut Body, min_y: f32, restitution: f32) -> bool {
    bounce_axis(
        &mut body.pos.y,
        &mut body.vel.y,
        min_y,
        f32::INFINITY,
        restitution,
        restitution,
    )
    .0
}

/// All four walls
pub fn bounce_walls(body: &mut Body, config: &ArenaConfig) -> WallHits {
    let min = config.min_bound();
    let max = config.max_bound();
    let walls = &config.walls;

    let mut hits = bounce_side_walls(body, min.x, max.x, walls.side);
    let (top, bottom) = bounce_axis(
        &mut body.pos.y,
        &mut body.vel.y,
        min.y,
        max.y,
        walls.ceiling,
        walls.floor,
    );
    hits.top = top;
    hits.bottom = bottom;
    hits
}

/// Contact between two overlapping circles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairContact {
    /// Unit normal pointing from `b` toward `a`
    pub normal: Vec2,
    /// How far the circles interpenetrate
    pub overlap: f32,
}

/// Overlap test for two equal circles of `radius`
pub fn pair_contact(a: Vec2, b: Vec2, radius: f32) -> Option<PairContact> {
    let delta = a - b;
    let dist = delta.length();
    let min_dist = radius * 2.0;

    if dist >= min_dist {
        return None;
    }

    // Coincident centers have no direction; push apart along x
    let normal = if dist > f32::EPSILON { delta / dist } else { Vec2::X };
    Some(PairContact {
        normal,
        overlap: min_dist - dist,
    })
}

/// Separate two bodies and exchange momentum along the contact normal.
///
/// Each body moves half the overlap. The impulse only applies while the
/// bodies approach; tangential velocity is untouched.
pub fn resolve_pair(a: &mut Body, b: &mut Body, contact: PairContact, restitution: f32) {
    let n = contact.normal;
    let half = contact.overlap / 2.0;
    a.pos += n * half;
    b.pos -= n * half;

    let v_n = (a.vel - b.vel).dot(n);
    if v_n > 0.0 {
        return;
    }

    // Equal masses: each side takes half of the total impulse
    let impulse = -(1.0 + restitution) * v_n * 0.5;
    a.vel += n * impulse;
    b.vel -= n * impulse;
}

/// Soft repulsion impulse for body `b` (body `a` receives the negation)
pub fn proximity_impulse(a: Vec2, b: Vec2, nudge: &ProximityNudge) -> Option<Vec2> {
    let dist = a.distance(b);
    if dist >= nudge.distance || dist <= 0.0 {
        return None;
    }

    let force = (nudge.distance - dist) / nudge.distance * nudge.force;
    Some(crate::from_angle(crate::angle_between(a, b), force))
}

/// Two distinct mutable bodies out of one slice (`i < j`)
fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> (&mut Body, &mut Body) {
    debug_assert!(i < j);
    let (head, tail) = bodies.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

/// Run proximity nudges and hard collisions over every active pair.
///
/// Pairs resolve in place in (i, j) order, so a later pair sees the
/// positions and velocities left by earlier ones. Returns the number of hard
/// contacts resolved.
pub fn resolve_bodies(bodies: &mut [Body], config: &ArenaConfig) -> usize {
    let radius = config.radius();
    let mut contacts = 0;

    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let (a, b) = pair_mut(bodies, i, j);
            if !a.is_active() || !b.is_active() {
                continue;
            }

            if let Some(nudge) = &config.proximity {
                if let Some(impulse) = proximity_impulse(a.pos, b.pos, nudge) {
                    a.vel -= impulse;
                    b.vel += impulse;
                }
            }

            if config.hard_collisions {
                if let Some(contact) = pair_contact(a.pos, b.pos, radius) {
                    resolve_pair(a, b, contact, config.body_restitution);
                    contacts += 1;
                }
            }
        }
    }

    contacts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(id: u32, pos: Vec2, vel: Vec2) -> Body {
        Body::new(id, pos, vel, &ArenaConfig::card_shooter(1000.0, 600.0))
    }

    #[test]
    fn test_side_wall_reflects_and_damps() {
        let mut b = body(0, Vec2::new(10.0, 300.0), Vec2::new(-8.0, 1.0));
        let hits = bounce_side_walls(&mut b, 28.0, 500.0, 0.7);
        assert!(hits.left && !hits.right);
        assert_eq!(b.pos.x, 28.0);
        assert!((b.vel.x - 5.6).abs() < 1e-5);
        assert_eq!(b.vel.y, 1.0);

        let mut b = body(0, Vec2::new(520.0, 300.0), Vec2::new(4.0, 0.0));
        let hits = bounce_side_walls(&mut b, 28.0, 500.0, 0.5);
        assert!(hits.right);
        assert_eq!(b.pos.x, 500.0);
        assert!((b.vel.x + 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_all_walls() {
        let config = ArenaConfig::card_shooter(1000.0, 600.0);
        let mut b = body(0, Vec2::new(900.0, 50.0), Vec2::new(3.0, -6.0));
        let hits = bounce_walls(&mut b, &config);
        assert!(hits.right && hits.top && hits.any());
        assert_eq!(b.pos, Vec2::new(852.0, 108.0));
        assert!(b.vel.x < 0.0 && b.vel.y > 0.0);
        assert!((b.vel.y - 6.0 * 0.35).abs() < 1e-5);

        let mut inside = body(1, Vec2::new(500.0, 300.0), Vec2::new(3.0, -6.0));
        assert!(!bounce_walls(&mut inside, &config).any());
        assert_eq!(inside.vel, Vec2::new(3.0, -6.0));
    }

    #[test]
    fn test_ceiling_only() {
        let mut b = body(0, Vec2::new(100.0, -40.0), Vec2::new(0.0, -3.0));
        assert!(bounce_ceiling(&mut b, 28.0, 0.35));
        assert_eq!(b.pos.y, 28.0);
        assert!(b.vel.y > 0.0);

        let mut low = body(0, Vec2::new(100.0, 9000.0), Vec2::new(0.0, 3.0));
        assert!(!bounce_ceiling(&mut low, 28.0, 0.35));
        assert_eq!(low.pos.y, 9000.0);
    }

    #[test]
    fn test_head_on_collision_reverses() {
        let radius = 119.0;
        let mut a = body(0, Vec2::new(400.0, 300.0), Vec2::new(5.0, 0.0));
        let mut b = body(1, Vec2::new(600.0, 300.0), Vec2::new(-5.0, 0.0));
        let before = (b.pos - a.pos).length();

        let contact = pair_contact(a.pos, b.pos, radius).unwrap();
        assert!((contact.overlap - 38.0).abs() < 1e-4);
        assert_eq!(contact.normal, Vec2::new(-1.0, 0.0));

        resolve_pair(&mut a, &mut b, contact, 0.95);
        let after = (b.pos - a.pos).length();
        assert!(after - before >= contact.overlap - 1e-3);
        assert!((after - radius * 2.0).abs() < 1e-3);
        assert!(a.vel.x < 0.0 && b.vel.x > 0.0);
        assert!((a.vel.x + 4.75).abs() < 1e-4);
        assert!((b.vel.x - 4.75).abs() < 1e-4);
    }

    #[test]
    fn test_separating_pair_keeps_velocity() {
        let mut a = body(0, Vec2::new(400.0, 300.0), Vec2::new(-2.0, 1.0));
        let mut b = body(1, Vec2::new(500.0, 300.0), Vec2::new(2.0, -1.0));
        let contact = pair_contact(a.pos, b.pos, 119.0).unwrap();
        resolve_pair(&mut a, &mut b, contact, 0.95);
        assert_eq!(a.vel, Vec2::new(-2.0, 1.0));
        assert_eq!(b.vel, Vec2::new(2.0, -1.0));
        assert!(a.pos.x < 400.0 && b.pos.x > 500.0);
    }

    #[test]
    fn test_tangential_velocity_untouched() {
        let mut a = body(0, Vec2::new(400.0, 300.0), Vec2::new(5.0, 3.0));
        let mut b = body(1, Vec2::new(600.0, 300.0), Vec2::new(-5.0, -2.0));
        let contact = pair_contact(a.pos, b.pos, 119.0).unwrap();
        resolve_pair(&mut a, &mut b, contact, 0.95);
        assert_eq!(a.vel.y, 3.0);
        assert_eq!(b.vel.y, -2.0);
    }

    #[test]
    fn test_coincident_centers_separate_along_x() {
        let contact = pair_contact(Vec2::new(10.0, 10.0), Vec2::new(10.0, 10.0), 5.0).unwrap();
        assert_eq!(contact.normal, Vec2::X);
        assert_eq!(contact.overlap, 10.0);
        assert!(pair_contact(Vec2::ZERO, Vec2::new(10.0, 0.0), 5.0).is_none());
    }

    #[test]
    fn test_proximity_impulse_pushes_apart() {
        let nudge = ProximityNudge {
            distance: 67.2,
            force: 5.0,
        };
        let impulse = proximity_impulse(Vec2::new(100.0, 100.0), Vec2::new(133.6, 100.0), &nudge).unwrap();
        assert!((impulse.x - 2.5).abs() < 1e-4);
        assert!(impulse.y.abs() < 1e-4);

        assert!(proximity_impulse(Vec2::ZERO, Vec2::new(80.0, 0.0), &nudge).is_none());
        assert!(proximity_impulse(Vec2::ZERO, Vec2::ZERO, &nudge).is_none());
    }

    #[test]
    fn test_resolve_bodies_skips_dead_and_held() {
        let config = ArenaConfig::card_shooter(1000.0, 600.0);
        let mut bodies = vec![
            body(0, Vec2::new(400.0, 300.0), Vec2::new(5.0, 0.0)),
            body(1, Vec2::new(500.0, 300.0), Vec2::new(-5.0, 0.0)),
        ];
        bodies[1].alive = false;
        assert_eq!(resolve_bodies(&mut bodies, &config), 0);
        assert_eq!(bodies[0].pos.x, 400.0);

        bodies[1].alive = true;
        bodies[1].held = true;
        assert_eq!(resolve_bodies(&mut bodies, &config), 0);

        bodies[1].held = false;
        assert_eq!(resolve_bodies(&mut bodies, &config), 1);
        assert!(bodies[0].vel.x < 0.0);
    }

    #[test]
    fn test_pairs_resolve_in_order() {
        // Three bodies in a row: pair (0, 1) pushes body 1 into body 2 before
        // pair (1, 2) is examined.
        let config = ArenaConfig::card_shooter(2000.0, 600.0);
        let mut bodies = vec![
            body(0, Vec2::new(400.0, 300.0), Vec2::ZERO),
            body(1, Vec2::new(600.0, 300.0), Vec2::ZERO),
            body(2, Vec2::new(839.0, 300.0), Vec2::ZERO),
        ];
        // Body 2 starts just clear of body 1
        assert!(pair_contact(bodies[1].pos, bodies[2].pos, config.radius()).is_none());

        let contacts = resolve_bodies(&mut bodies, &config);
        assert_eq!(contacts, 2);
        assert!(bodies[2].pos.x > 839.0);
    }
}
