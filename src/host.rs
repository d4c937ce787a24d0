//! Frame loop driver
//!
//! Owns one arena on the host's single simulation thread. Pointer and click
//! events apply immediately; `frame` runs exactly one step per call. Once
//! stopped, pending timers are dropped and every call becomes a no-op.

use glam::Vec2;

use crate::consts::MAX_FRAME_MS;
use crate::render::RenderFrame;
use crate::settings::{ArenaConfig, ConfigError};
use crate::sim::{Arena, BodyId, GameEvent, tick};

/// Input from the host's event layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed; `body` is the element under it if the host knows,
    /// otherwise the arena looks it up
    PointerDown {
        body: Option<BodyId>,
        x: f32,
        y: f32,
        time_ms: f64,
    },
    PointerMove { x: f32, y: f32, time_ms: f64 },
    PointerUp,
    /// Shot at a point inside the arena
    Click { x: f32, y: f32 },
    Resize { width: f32, height: f32 },
}

pub struct FrameLoop {
    arena: Arena,
    running: bool,
    last_frame_ms: Option<f64>,
}

impl FrameLoop {
    pub fn new(config: ArenaConfig, seed: u64) -> Result<Self, ConfigError> {
        Ok(Self {
            arena: Arena::new(config, seed)?,
            running: true,
            last_frame_ms: None,
        })
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Apply an input event. Returns whether it changed anything.
    pub fn dispatch(&mut self, event: InputEvent) -> bool {
        if !self.running {
            return false;
        }

        match event {
            InputEvent::PointerDown { body, x, y, time_ms } => {
                let pointer = Vec2::new(x, y);
                let target = body.or_else(|| self.arena.body_at(pointer));
                match target {
                    Some(id) => self.arena.pointer_down(id, pointer, time_ms),
                    None => false,
                }
            }
            InputEvent::PointerMove { x, y, time_ms } => {
                if !self.arena.drag.is_dragging() {
                    return false;
                }
                self.arena.pointer_move(Vec2::new(x, y), time_ms);
                true
            }
            InputEvent::PointerUp => self.arena.pointer_up().is_some(),
            InputEvent::Click { x, y } => self.arena.shoot(Vec2::new(x, y)).is_some(),
            InputEvent::Resize { width, height } => match self.arena.resize(width, height) {
                Ok(()) => true,
                Err(e) => {
                    log::warn!("Ignoring resize to {}x{}: {}", width, height, e);
                    false
                }
            },
        }
    }

    /// Run one step at host time `now_ms` and snapshot the result
    pub fn frame(&mut self, now_ms: f64) -> Option<RenderFrame> {
        if !self.running {
            return None;
        }

        let dt_ms = match self.last_frame_ms {
            Some(last) => (now_ms - last).clamp(0.0, MAX_FRAME_MS),
            None => 0.0,
        };
        self.last_frame_ms = Some(now_ms);

        tick(&mut self.arena, dt_ms as f32);
        Some(RenderFrame::capture(&self.arena))
    }

    /// Events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.arena.drain_events()
    }

    /// Tear down: cancel timers, drop any drag, refuse further work
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.arena.cancel_timers();
        self.arena.pointer_up();
        self.arena.events.clear();
        log::info!("Frame loop stopped after {} ticks", self.arena.time_ticks);
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
