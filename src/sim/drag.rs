//! Drag-to-throw controller
//!
//! Idle -> Dragging on pointer down over a body, Dragging -> Idle on pointer
//! up. While dragging the body follows the pointer and a velocity estimate is
//! kept from recent pointer motion; release hands that estimate to the body.
//!
//! Transitions are pure functions on `DragSession`; `Arena` applies their
//! results to the bodies.

use glam::Vec2;

use super::state::{Arena, BodyId, GameEvent};
use crate::consts::FRAME_BASELINE_MS;

/// Drag state for the single pointer driving an arena
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragSession {
    #[default]
    Idle,
    Dragging {
        body: BodyId,
        /// Pointer minus body center at grab time
        grab_offset: Vec2,
        last_pos: Vec2,
        last_time_ms: f64,
        /// Latest throw estimate, pixels per 16 ms frame
        velocity: Vec2,
        /// Any pointer motion since the grab
        moved: bool,
    },
}

/// What a pointer release turned into
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Release {
    /// Down and up without motion
    Tapped { body: BodyId },
    Thrown { body: BodyId, velocity: Vec2 },
}

impl DragSession {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragSession::Dragging { .. })
    }

    pub fn held_body(&self) -> Option<BodyId> {
        match *self {
            DragSession::Dragging { body, .. } => Some(body),
            DragSession::Idle => None,
        }
    }

    /// Grab `body` (centered at `body_pos`) with the pointer at `pointer`.
    /// Ignored while another drag is in progress.
    pub fn on_pointer_down(self, body: BodyId, body_pos: Vec2, pointer: Vec2, now_ms: f64) -> Self {
        match self {
            DragSession::Idle => DragSession::Dragging {
                body,
                grab_offset: pointer - body_pos,
                last_pos: body_pos,
                last_time_ms: now_ms,
                velocity: Vec2::ZERO,
                moved: false,
            },
            dragging => dragging,
        }
    }

    /// Follow the pointer. Returns the held body and its new center.
    pub fn on_pointer_move(self, pointer: Vec2, now_ms: f64) -> (Self, Option<(BodyId, Vec2)>) {
        self.on_pointer_move_within(pointer, now_ms, Vec2::NEG_INFINITY, Vec2::INFINITY)
    }

    /// Like `on_pointer_move`, with the body center held inside
    /// `min..=max`. The throw estimate follows the clamped center.
    pub fn on_pointer_move_within(
        self,
        pointer: Vec2,
        now_ms: f64,
        min: Vec2,
        max: Vec2,
    ) -> (Self, Option<(BodyId, Vec2)>) {
        let DragSession::Dragging {
            body,
            grab_offset,
            last_pos,
            last_time_ms,
            velocity,
            moved,
        } = self
        else {
            return (self, None);
        };

        let pos = (pointer - grab_offset).clamp(min, max);
        let dt = (now_ms - last_time_ms) as f32;
        // Same-millisecond samples keep the previous estimate
        let velocity = if dt > 0.0 {
            (pos - last_pos) / dt * FRAME_BASELINE_MS
        } else {
            velocity
        };

        let next = DragSession::Dragging {
            body,
            grab_offset,
            last_pos: pos,
            last_time_ms: now_ms,
            velocity,
            moved: moved || pos != last_pos,
        };
        (next, Some((body, pos)))
    }

    /// Let go. The throw velocity is capped at `max_speed`.
    pub fn on_pointer_up(self, max_speed: f32) -> (Self, Option<Release>) {
        match self {
            DragSession::Idle => (self, None),
            DragSession::Dragging {
                body,
                velocity,
                moved,
                ..
            } => {
                let release = if moved {
                    Release::Thrown {
                        body,
                        velocity: crate::clamp_speed(velocity, max_speed),
                    }
                } else {
                    Release::Tapped { body }
                };
                (DragSession::Idle, Some(release))
            }
        }
    }
}

impl Arena {
    /// Start dragging `id` with the pointer at `pointer`.
    /// Returns false when the arena is not draggable, the body is dead or
    /// missing, or a drag is already running.
    pub fn pointer_down(&mut self, id: BodyId, pointer: Vec2, now_ms: f64) -> bool {
        if !self.config.draggable || self.drag.is_dragging() || self.is_won() {
            return false;
        }
        let Some(body) = self.bodies.get_mut(id as usize) else {
            return false;
        };
        if !body.alive {
            return false;
        }

        self.drag = self.drag.on_pointer_down(id, body.pos, pointer, now_ms);
        body.held = true;
        body.vel = Vec2::ZERO;
        log::debug!("Grabbed body {} at {:?}", id, body.pos);
        true
    }

    /// Move the held body with the pointer (clamped inside the walls)
    pub fn pointer_move(&mut self, pointer: Vec2, now_ms: f64) {
        let min = self.config.min_bound();
        let max = self.config.max_bound();
        let (session, moved) = self.drag.on_pointer_move_within(pointer, now_ms, min, max);
        self.drag = session;

        if let Some((id, pos)) = moved {
            if let Some(body) = self.bodies.get_mut(id as usize) {
                body.pos = pos;
            }
        }
    }

    /// Release the held body, handing it the throw velocity
    pub fn pointer_up(&mut self) -> Option<Release> {
        let (session, release) = self.drag.on_pointer_up(self.config.max_speed);
        self.drag = session;

        let release = release?;
        match release {
            Release::Tapped { body: id } => {
                if let Some(body) = self.bodies.get_mut(id as usize) {
                    body.held = false;
                }
                self.events.push(GameEvent::BodyTapped { id });
                log::debug!("Body {} tapped", id);
            }
            Release::Thrown { body: id, velocity } => {
                if let Some(body) = self.bodies.get_mut(id as usize) {
                    body.held = false;
                    body.vel = velocity;
                }
                self.events.push(GameEvent::BodyThrown { id, vel: velocity });
                log::debug!("Body {} thrown at {:?}", id, velocity);
            }
        }
        Some(release)
    }
}
