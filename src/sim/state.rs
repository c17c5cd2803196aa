//! Game state and core simulation types
//!
//! All match state lives in [`World`]; nothing is shared across matches and
//! a restart rebuilds everything in place.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::powerup::PowerUpKind;
use super::spawn;
use crate::config::Config;

/// Player identity - the authoritative key for bullet ownership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    /// The opponent
    #[inline]
    pub fn other(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }
}

/// Match state machine
///
/// `NotStarted -> Running` on start, `Running -> Ended` when a player's
/// health reaches zero, `Ended -> Running` only via restart. No entity
/// updates happen outside `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    NotStarted,
    Running,
    Ended { winner: PlayerId },
}

/// Special behavior of the next bullet(s) a player fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotKind {
    /// Three bullets in a spread; consumed by the shot
    Scatter,
    /// Extended bounce limit; held until the power-up expires
    Ricochet,
    /// Destroys obstacles on contact; held until the power-up expires
    Incendiary,
}

/// Active power-up bookkeeping: one optional expiry clock per kind
///
/// A fixed table over the closed kind enumeration, so there is nothing
/// unbounded to iterate and at most one expiry per kind by construction.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    expiry: [Option<f64>; PowerUpKind::COUNT],
}

impl ActiveEffects {
    /// Record (or refresh) an expiry clock for a kind
    pub fn set(&mut self, kind: PowerUpKind, expires_at: f64) {
        self.expiry[kind.index()] = Some(expires_at);
    }

    pub fn clear(&mut self, kind: PowerUpKind) {
        self.expiry[kind.index()] = None;
    }

    pub fn clear_all(&mut self) {
        self.expiry = [None; PowerUpKind::COUNT];
    }

    pub fn expiry(&self, kind: PowerUpKind) -> Option<f64> {
        self.expiry[kind.index()]
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.expiry[kind.index()].is_some()
    }

    /// Active kinds with their expiry clocks, in catalog order
    pub fn iter_active(&self) -> impl Iterator<Item = (PowerUpKind, f64)> + '_ {
        PowerUpKind::ALL
            .iter()
            .filter_map(|&kind| self.expiry[kind.index()].map(|at| (kind, at)))
    }
}

/// Renderer color tags for the two players (red, blue)
pub const PLAYER_COLORS: [u32; 2] = [0xff6666, 0x6666ff];

/// A duelist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub pos: Vec2,
    pub radius: f32,
    /// Remaining hits; the match ends when this reaches zero
    pub health: u8,
    /// Facing direction: +1 right, -1 left
    pub facing: f32,
    /// Current movement speed (modified by the speed boost)
    pub move_speed: f32,
    /// Current minimum time between shots (modified by quick-shot)
    pub shoot_cooldown: f64,
    /// Match clock of the previous shot
    pub last_shot: f64,
    /// Hits the shield still absorbs
    pub shields: u8,
    /// Pending special behavior for the next shot
    pub next_shot: Option<ShotKind>,
    /// Expiry table for active power-ups
    pub effects: ActiveEffects,
    /// Renderer color tag
    pub color: u32,
}

impl Player {
    pub fn new(id: PlayerId, pos: Vec2, facing: f32, config: &Config) -> Self {
        Self {
            id,
            pos,
            radius: config.player_radius,
            health: config.player_health,
            facing,
            move_speed: config.player_speed,
            shoot_cooldown: config.shoot_cooldown,
            // Allows an immediate first shot
            last_shot: -config.shoot_cooldown,
            shields: 0,
            next_shot: None,
            effects: ActiveEffects::default(),
            color: PLAYER_COLORS[id.index()],
        }
    }
}

/// A bullet in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub owner: PlayerId,
    pub bounces: u8,
    pub max_bounces: u8,
    pub incendiary: bool,
    /// Renderer color tag (owner's color, or the power-up's for special shots)
    pub color: u32,
}

/// A static obstacle (cactus)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec2,
    pub radius: f32,
}

/// A collectible power-up on the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub pos: Vec2,
    pub radius: f32,
    pub kind: PowerUpKind,
    /// Match clock at spawn; despawns after the configured time-to-live
    pub spawned_at: f64,
}

/// A cosmetic fire particle - never collides with anything
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Hue in the orange-red fire range, for the renderer
    pub hue: f32,
    pub size: f32,
    pub age: f32,
    pub lifetime: f32,
}

impl Particle {
    /// Render opacity, fading linearly over the lifetime
    pub fn alpha(&self) -> f32 {
        (1.0 - self.age / self.lifetime).max(0.0)
    }

    pub fn expired(&self) -> bool {
        self.age >= self.lifetime
    }
}

/// Maximum live particles; the oldest are evicted past this
pub const MAX_PARTICLES: usize = 256;

/// Append a particle, evicting the oldest when at the cap
pub(crate) fn push_particle(particles: &mut Vec<Particle>, particle: Particle) {
    if particles.len() >= MAX_PARTICLES {
        particles.remove(0);
    }
    particles.push(particle);
}

/// Discrete things that happened during a frame
///
/// Drained by the embedder each frame: sound-bearing events go to the audio
/// sink, the rest feed notifications and the HUD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Shot { shooter: PlayerId },
    Ricochet,
    Hit { target: PlayerId },
    ShieldAbsorbed { target: PlayerId },
    PowerupCollected { player: PlayerId, kind: PowerUpKind },
    PowerupExpired { player: PlayerId, kind: PowerUpKind },
    ObstacleIncinerated { pos: Vec2 },
    MatchEnded { winner: PlayerId },
}

/// Complete match state
///
/// Owns every entity collection for the duration of one match; the tick and
/// collision code borrow pieces of it mutably but nothing outlives a frame.
#[derive(Debug, Clone)]
pub struct World {
    /// Seed the RNG started from, for reproducing a match
    pub seed: u64,
    pub phase: MatchPhase,
    /// Match clock in seconds, zeroed on start/restart
    pub clock: f64,
    pub players: [Player; 2],
    pub bullets: Vec<Bullet>,
    pub obstacles: Vec<Obstacle>,
    pub pickups: Vec<Pickup>,
    pub particles: Vec<Particle>,
    /// Events from the most recent frame
    pub events: Vec<GameEvent>,
    /// Match clock of the previous pickup spawn attempt
    pub last_pickup_spawn: f64,
    pub(crate) rng: Pcg32,
}

impl World {
    /// Create an idle world; nothing moves until the first start
    pub fn new(config: &Config, seed: u64) -> Self {
        let [left, right] = config.spawn_positions();
        Self {
            seed,
            phase: MatchPhase::NotStarted,
            clock: 0.0,
            players: [
                Player::new(PlayerId::One, left, 1.0, config),
                Player::new(PlayerId::Two, right, -1.0, config),
            ],
            bullets: Vec::new(),
            obstacles: Vec::new(),
            pickups: Vec::new(),
            particles: Vec::new(),
            events: Vec::new(),
            last_pickup_spawn: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Full reinitialization: players repositioned and healed, obstacles
    /// re-placed, everything transient cleared. Start and restart are the
    /// same operation.
    pub fn reset(&mut self, config: &Config) {
        let [left, right] = config.spawn_positions();
        self.players = [
            Player::new(PlayerId::One, left, 1.0, config),
            Player::new(PlayerId::Two, right, -1.0, config),
        ];
        self.bullets.clear();
        self.pickups.clear();
        self.particles.clear();
        self.events.clear();
        self.clock = 0.0;
        self.last_pickup_spawn = 0.0;
        self.obstacles.clear();
        spawn::place_obstacles(self, config);
        self.phase = MatchPhase::Running;
        log::info!(
            "match started: {} obstacles placed (seed {})",
            self.obstacles.len(),
            self.seed
        );
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_other() {
        assert_eq!(PlayerId::One.other(), PlayerId::Two);
        assert_eq!(PlayerId::Two.other(), PlayerId::One);
    }

    #[test]
    fn test_active_effects_one_slot_per_kind() {
        let mut effects = ActiveEffects::default();
        effects.set(PowerUpKind::Speed, 5.0);
        effects.set(PowerUpKind::Speed, 9.0);
        assert_eq!(effects.expiry(PowerUpKind::Speed), Some(9.0));
        assert_eq!(effects.iter_active().count(), 1);

        effects.clear(PowerUpKind::Speed);
        assert!(!effects.is_active(PowerUpKind::Speed));
    }

    #[test]
    fn test_particle_cap_evicts_oldest() {
        let mut particles = Vec::new();
        for i in 0..(MAX_PARTICLES + 10) {
            push_particle(
                &mut particles,
                Particle {
                    pos: Vec2::new(i as f32, 0.0),
                    vel: Vec2::ZERO,
                    hue: 20.0,
                    size: 2.0,
                    age: 0.0,
                    lifetime: 1.0,
                },
            );
        }
        assert_eq!(particles.len(), MAX_PARTICLES);
        // The first ten were evicted
        assert_eq!(particles[0].pos.x, 10.0);
    }

    #[test]
    fn test_world_reset_reinitializes() {
        let config = Config::default();
        let mut world = World::new(&config, 7);
        assert_eq!(world.phase, MatchPhase::NotStarted);
        assert!(world.obstacles.is_empty());

        world.reset(&config);
        assert_eq!(world.phase, MatchPhase::Running);
        assert!(!world.obstacles.is_empty());
        assert_eq!(world.players[0].health, config.player_health);

        // Damage a player and litter the field, then restart
        world.players[1].health = 1;
        world.bullets.push(Bullet {
            pos: Vec2::ZERO,
            vel: Vec2::X,
            radius: 5.0,
            owner: PlayerId::One,
            bounces: 0,
            max_bounces: 3,
            incendiary: false,
            color: 0,
        });
        world.reset(&config);
        assert_eq!(world.players[1].health, config.player_health);
        assert!(world.bullets.is_empty());
        assert_eq!(world.clock, 0.0);
    }
}
