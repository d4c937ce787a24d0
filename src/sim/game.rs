//! Shooting game layer
//!
//! Clicks eliminate bodies, every elimination rattles the survivors, and
//! clearing the arena freezes it until a timed reset.

use glam::Vec2;
use rand::Rng;

use super::state::{Arena, Body, BodyId, GameEvent, Phase, Splash};
use crate::settings::GameRules;

/// First alive body (in arena order) within `hit_radius` of `point`.
///
/// First match wins even if a later body is closer.
pub fn hit_test(bodies: &[Body], point: Vec2, hit_radius: f32) -> Option<usize> {
    bodies
        .iter()
        .position(|b| b.alive && b.pos.distance(point) < hit_radius)
}

impl Arena {
    /// Shoot at `point`. Returns the body eliminated, if any.
    ///
    /// At most one body dies per click. No-op without game rules, while
    /// the arena is frozen after a win, or for points outside the arena.
    pub fn shoot(&mut self, point: Vec2) -> Option<BodyId> {
        let rules = self.config.game?;
        if self.is_won() {
            return None;
        }
        let size = Vec2::new(self.config.width, self.config.height);
        if !(point.cmpge(Vec2::ZERO).all() && point.cmple(size).all()) {
            return None;
        }

        let index = hit_test(&self.bodies, point, rules.hit_radius)?;
        let id = self.bodies[index].id;
        self.eliminate(index, &rules);

        if self.alive_count() == 0 {
            self.win(&rules);
        }
        Some(id)
    }

    fn eliminate(&mut self, index: usize, rules: &GameRules) {
        let (id, pos) = {
            let body = &mut self.bodies[index];
            body.alive = false;
            body.vel = Vec2::ZERO;
            (body.id, body.pos)
        };

        // A held body that gets shot drops out of the drag
        if self.drag.held_body() == Some(id) {
            self.drag = super::drag::DragSession::Idle;
            self.bodies[index].held = false;
        }

        let splash_id = self.next_splash_id();
        self.splashes.push(Splash {
            id: splash_id,
            pos,
            age_ms: 0.0,
        });

        // Shockwave
        for (i, other) in self.bodies.iter_mut().enumerate() {
            if i == index || !other.alive {
                continue;
            }
            other.vel += Vec2::new(
                self.rng.random_range(-rules.kick..=rules.kick),
                self.rng.random_range(-rules.kick..=rules.kick),
            );
        }

        self.events.push(GameEvent::BodyEliminated { id, pos });
        log::debug!("Body {} eliminated at {:?}, {} left", id, pos, self.alive_count());
    }

    fn win(&mut self, rules: &GameRules) {
        for body in &mut self.bodies {
            body.vel = Vec2::ZERO;
        }
        self.phase = Phase::Won {
            reset_in_ms: Some(rules.win_reset_delay_ms),
        };
        self.events.push(GameEvent::Won);
        log::info!("Arena cleared, resetting in {} ms", rules.win_reset_delay_ms);
    }

    /// Age splashes and run the win-reset countdown
    pub fn advance_timers(&mut self, dt_ms: f32) {
        let Some(rules) = self.config.game else {
            return;
        };

        for splash in &mut self.splashes {
            splash.age_ms += dt_ms;
        }
        self.splashes
            .retain(|s| s.age_ms < rules.splash_lifetime_ms);

        if let Phase::Won {
            reset_in_ms: Some(remaining),
        } = self.phase
        {
            let remaining = remaining - dt_ms;
            if remaining <= 0.0 {
                self.reset();
            } else {
                self.phase = Phase::Won {
                    reset_in_ms: Some(remaining),
                };
            }
        }
    }

    /// Drop every pending timer: splashes vanish and a pending win reset
    /// never fires.
    pub fn cancel_timers(&mut self) {
        self.splashes.clear();
        if let Phase::Won { reset_in_ms } = &mut self.phase {
            *reset_in_ms = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ArenaConfig;

    /// Cards parked far apart and at rest so hits are unambiguous
    fn parked() -> Arena {
        let mut arena = Arena::new(ArenaConfig::card_shooter(1200.0, 800.0), 42).unwrap();
        let spots = [
            Vec2::new(200.0, 200.0),
            Vec2::new(1000.0, 200.0),
            Vec2::new(200.0, 600.0),
            Vec2::new(1000.0, 600.0),
        ];
        for (body, spot) in arena.bodies.iter_mut().zip(spots) {
            body.pos = spot;
            body.vel = Vec2::ZERO;
        }
        arena
    }

    #[test]
    fn test_hit_test_first_match_wins() {
        let mut arena = parked();
        arena.bodies[1].pos = Vec2::new(260.0, 200.0);
        // Body 1 is closer to the click but body 0 comes first
        assert_eq!(hit_test(&arena.bodies, Vec2::new(250.0, 200.0), 160.0), Some(0));
        arena.bodies[0].alive = false;
        assert_eq!(hit_test(&arena.bodies, Vec2::new(250.0, 200.0), 160.0), Some(1));
        assert_eq!(hit_test(&arena.bodies, Vec2::new(600.0, 400.0), 160.0), None);
    }

    #[test]
    fn test_shoot_eliminates_one_and_kicks_the_rest() {
        let mut arena = parked();
        assert_eq!(arena.shoot(Vec2::new(210.0, 190.0)), Some(0));

        assert!(!arena.bodies[0].alive);
        assert_eq!(arena.bodies[0].vel, Vec2::ZERO);
        assert_eq!(arena.bodies[0].pos, Vec2::new(200.0, 200.0));
        assert_eq!(arena.alive_count(), 3);
        for body in &arena.bodies[1..] {
            assert!(body.vel.x.abs() <= 2.75 && body.vel.y.abs() <= 2.75);
        }
        assert!(arena.bodies[1..].iter().any(|b| b.vel != Vec2::ZERO));

        assert_eq!(arena.splashes.len(), 1);
        assert_eq!(arena.splashes[0].pos, Vec2::new(200.0, 200.0));
        assert_eq!(
            arena.drain_events(),
            vec![GameEvent::BodyEliminated {
                id: 0,
                pos: Vec2::new(200.0, 200.0)
            }]
        );
        assert!(!arena.is_won());
    }

    #[test]
    fn test_miss_is_noop() {
        let mut arena = parked();
        let before = arena.bodies.clone();
        assert_eq!(arena.shoot(Vec2::new(600.0, 400.0)), None);
        assert_eq!(arena.bodies, before);
        assert!(arena.splashes.is_empty());
        assert!(arena.events.is_empty());
    }

    #[test]
    fn test_last_two_in_range_only_one_dies() {
        let mut arena = parked();
        let first = arena.bodies[0].pos;
        let second = arena.bodies[1].pos;
        arena.shoot(first);
        arena.shoot(second);
        arena.bodies[2].pos = Vec2::new(500.0, 600.0);
        arena.bodies[3].pos = Vec2::new(600.0, 600.0);

        assert_eq!(arena.shoot(Vec2::new(550.0, 600.0)), Some(2));
        assert_eq!(arena.alive_count(), 1);
        assert!(arena.bodies[3].alive);
        assert!(!arena.is_won());
    }

    #[test]
    fn test_click_outside_arena_ignored() {
        let mut arena = parked();
        arena.bodies[0].pos = Vec2::new(150.0, 300.0);
        // Within hit range of the edge card but left of the arena
        assert_eq!(arena.shoot(Vec2::new(-10.0, 300.0)), None);
        assert_eq!(arena.alive_count(), 4);
        assert!(arena.splashes.is_empty());

        assert_eq!(arena.shoot(Vec2::new(10.0, 300.0)), Some(0));
    }

    #[test]
    fn test_dead_body_cannot_be_shot_twice() {
        let mut arena = parked();
        assert_eq!(arena.shoot(Vec2::new(200.0, 200.0)), Some(0));
        assert_eq!(arena.shoot(Vec2::new(200.0, 200.0)), None);
        assert_eq!(arena.splashes.len(), 1);
    }

    #[test]
    fn test_win_and_reset() {
        let mut arena = parked();
        let spots: Vec<Vec2> = arena.bodies.iter().map(|b| b.pos).collect();
        for spot in &spots {
            assert!(arena.shoot(*spot).is_some());
        }
        assert!(arena.is_won());
        assert!(arena.bodies.iter().all(|b| !b.alive && b.vel == Vec2::ZERO));
        assert!(arena.drain_events().contains(&GameEvent::Won));

        // Frozen: clicks ignored
        assert_eq!(arena.shoot(spots[0]), None);

        arena.advance_timers(700.0);
        assert!(arena.splashes.is_empty());
        assert!(arena.is_won());

        arena.advance_timers(1499.0);
        assert!(arena.is_won());

        arena.advance_timers(2.0);
        assert!(!arena.is_won());
        assert_eq!(arena.alive_count(), 4);
        assert!(arena.bodies.iter().all(|b| b.vel != Vec2::ZERO));
        let fresh: Vec<Vec2> = arena.bodies.iter().map(|b| b.pos).collect();
        assert_ne!(fresh, spots);
        assert_eq!(arena.drain_events(), vec![GameEvent::ArenaReset]);
    }

    #[test]
    fn test_splash_expires() {
        let mut arena = parked();
        arena.shoot(Vec2::new(1000.0, 600.0));
        arena.advance_timers(350.0);
        assert_eq!(arena.splashes.len(), 1);
        assert!((arena.splashes[0].age_fraction(700.0) - 0.5).abs() < 1e-6);
        arena.advance_timers(350.0);
        assert!(arena.splashes.is_empty());
    }

    #[test]
    fn test_cancel_timers_blocks_reset() {
        let mut arena = parked();
        let spots: Vec<Vec2> = arena.bodies.iter().map(|b| b.pos).collect();
        for spot in spots {
            arena.shoot(spot);
        }
        arena.cancel_timers();
        assert!(arena.splashes.is_empty());
        arena.advance_timers(10_000.0);
        assert!(arena.is_won());
        assert_eq!(arena.alive_count(), 0);
    }

    #[test]
    fn test_no_rules_no_game() {
        let mut arena = Arena::new(ArenaConfig::floating_buttons(800.0, 600.0), 3).unwrap();
        let pos = arena.bodies[0].pos;
        assert_eq!(arena.shoot(pos), None);
        assert_eq!(arena.alive_count(), 2);
    }
}
