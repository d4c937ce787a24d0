//! Frame-stepped arena simulation
//!
//! All physics and game logic lives here. Rules:
//! - One step per frame, fixed per-tick increments
//! - Seeded RNG only
//! - Stable iteration order (by body id)
//! - No rendering or platform dependencies

pub mod collision;
pub mod drag;
pub mod game;
pub mod state;
pub mod tick;

pub use collision::{PairContact, WallHits, pair_contact, resolve_bodies, resolve_pair};
pub use drag::{DragSession, Release};
pub use game::hit_test;
pub use state::{Arena, Body, BodyId, GameEvent, Phase, Splash};
pub use tick::{integrate, tick};
