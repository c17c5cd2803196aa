//! Desert Duel - a two-player top-down shootout
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, bullet physics, collisions, power-ups)
//! - `config`: Data-driven game balance (one core, variant constants as configuration)
//! - `audio`: Sound event catalog and the injected sink interface
//! - `game`: Match lifecycle wrapper (start/restart, per-frame drive, HUD snapshot)
//!
//! Rendering, input polling, and UI updates live outside this crate: callers
//! feed a held-keys snapshot into [`game::Duel::frame`] and read entity state
//! back out of [`sim::World`] each frame.

pub mod audio;
pub mod config;
pub mod game;
pub mod sim;

pub use audio::{AudioSink, NullAudio, Sound};
pub use config::Config;
pub use game::{Duel, HudPlayer, HudSnapshot};

use glam::Vec2;

/// Unit vector for an angle in radians (0 = +x, counterclockwise)
#[inline]
pub fn vec_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle of a vector in radians
#[inline]
pub fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}
