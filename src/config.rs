//! Data-driven game balance
//!
//! Every tunable the two shipped variants disagreed on lives here, so the
//! simulation is written once and a variant is just a different `Config`.
//! `Default` carries the primary variant's numbers; alternates are JSON
//! overrides on top of it.
//!
//! Units: lengths in pixels, speeds in pixels/second, times in seconds.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Complete rules table for one match
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Play-field dimensions
    pub field_width: f32,
    pub field_height: f32,

    // === Players ===
    pub player_radius: f32,
    pub player_health: u8,
    pub player_speed: f32,
    /// Minimum time between shots
    pub shoot_cooldown: f64,
    /// Horizontal spawn inset as a fraction of field width (mirrored for player two)
    pub spawn_inset: f32,

    // === Bullets ===
    pub bullet_speed: f32,
    pub bullet_radius: f32,
    pub bullet_max_bounces: u8,
    /// Extra bounces granted to bullets fired under the ricochet power-up
    pub ricochet_bonus_bounces: u8,
    /// Seconds of travel a bullet is nudged after reflecting, so it clears the surface
    pub ricochet_nudge: f32,

    // === Obstacles (cacti) ===
    pub cactus_count: usize,
    pub cactus_min_radius: f32,
    pub cactus_max_radius: f32,
    /// Minimum clearance between obstacle circles
    pub obstacle_margin: f32,
    /// Minimum clearance between an obstacle and a player spawn
    pub spawn_margin: f32,

    // === Pickups ===
    pub pickup_radius: f32,
    pub pickup_spawn_interval: f64,
    /// Active time for a collected power-up
    pub powerup_duration: f64,
    /// Maximum pickups on the field at once
    pub pickup_cap: usize,
    /// Uncollected pickups despawn after this long
    pub pickup_ttl: f64,
    pub pickup_obstacle_margin: f32,
    pub pickup_player_margin: f32,

    // === Power-up effects ===
    /// Movement multiplier while the speed boost is active
    pub speed_boost_factor: f32,
    /// Cooldown multiplier while quick-shot is active
    pub quickshot_factor: f64,
    /// Hits absorbed by a fresh shield
    pub shield_hits: u8,
    /// Angular offset of the outer scatter bullets (radians)
    pub scatter_spread: f32,

    // === Particles ===
    /// Incineration burst size before the per-radius bonus
    pub fire_burst_base: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            field_width: 800.0,
            field_height: 600.0,

            player_radius: 15.0,
            player_health: 3,
            player_speed: 150.0,
            shoot_cooldown: 0.5,
            spawn_inset: 0.125,

            bullet_speed: 800.0,
            bullet_radius: 5.0,
            bullet_max_bounces: 3,
            ricochet_bonus_bounces: 3,
            ricochet_nudge: 0.02,

            cactus_count: 10,
            cactus_min_radius: 20.0,
            cactus_max_radius: 40.0,
            obstacle_margin: 10.0,
            spawn_margin: 50.0,

            pickup_radius: 20.0,
            pickup_spawn_interval: 8.0,
            powerup_duration: 10.0,
            pickup_cap: 3,
            pickup_ttl: 20.0,
            pickup_obstacle_margin: 5.0,
            pickup_player_margin: 30.0,

            speed_boost_factor: 1.5,
            quickshot_factor: 0.5,
            shield_hits: 2,
            scatter_spread: 15.0_f32.to_radians(),

            fire_burst_base: 20,
        }
    }
}

impl Config {
    /// Spawn points: mirrored left/right, vertically centered
    pub fn spawn_positions(&self) -> [Vec2; 2] {
        let y = self.field_height / 2.0;
        [
            Vec2::new(self.field_width * self.spawn_inset, y),
            Vec2::new(self.field_width * (1.0 - self.spawn_inset), y),
        ]
    }

    /// Load a variant config from JSON; omitted fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_spawns_are_mirrored() {
        let config = Config::default();
        let [left, right] = config.spawn_positions();
        assert_eq!(left.x, 100.0);
        assert_eq!(right.x, 700.0);
        assert_eq!(left.y, right.y);
    }

    #[test]
    fn test_variant_overrides() {
        // A faster arena variant: only the changed fields appear in the JSON
        let config = Config::from_json(
            r#"{
                "player_speed": 300.0,
                "bullet_speed": 600.0,
                "cactus_min_radius": 15.0,
                "cactus_max_radius": 30.0,
                "pickup_spawn_interval": 10.0,
                "speed_boost_factor": 2.0,
                "spawn_inset": 0.25
            }"#,
        )
        .unwrap();

        assert_eq!(config.player_speed, 300.0);
        assert_eq!(config.speed_boost_factor, 2.0);
        // Untouched fields keep the defaults
        assert_eq!(config.player_health, 3);
        assert_eq!(config.shoot_cooldown, 0.5);
        assert_eq!(config.spawn_positions()[0].x, 200.0);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(Config::from_json("not json").is_err());
    }
}
