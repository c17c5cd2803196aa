//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed per-frame update order
//! - Seeded RNG only
//! - No rendering, audio, or platform dependencies
//!
//! The embedder drives it through [`tick::tick`] (or the `game::Duel`
//! wrapper) and reads entity state back out of [`state::World`].

pub mod collision;
pub mod powerup;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{circles_overlap, collision_normal, reflect_velocity};
pub use powerup::PowerUpKind;
pub use spawn::PLACEMENT_ATTEMPTS;
pub use state::{
    ActiveEffects, Bullet, GameEvent, MatchPhase, Obstacle, Particle, Pickup, Player, PlayerId,
    ShotKind, World, MAX_PARTICLES, PLAYER_COLORS,
};
pub use tick::{PlayerInput, TickInput, tick};
