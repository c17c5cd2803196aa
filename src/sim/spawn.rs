//! Randomized field placement
//!
//! Obstacles and pickups are placed by rejection sampling with a bounded
//! attempt cap. Placement is best-effort: a spot that cannot be found within
//! the cap is skipped and logged, never an error. Callers must tolerate
//! fewer-than-requested obstacles.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::powerup::PowerUpKind;
use super::state::{Obstacle, Pickup, World};
use crate::config::Config;

/// Attempts per placement before giving up on it
pub const PLACEMENT_ATTEMPTS: u32 = 50;

/// Fill the field with non-overlapping obstacles, clear of both spawn zones
pub fn place_obstacles(world: &mut World, config: &Config) {
    for _ in 0..config.cactus_count {
        match try_place_obstacle(world, config) {
            Some(obstacle) => world.obstacles.push(obstacle),
            None => {
                log::debug!("obstacle placement exhausted after {PLACEMENT_ATTEMPTS} attempts");
            }
        }
    }
}

fn try_place_obstacle(world: &mut World, config: &Config) -> Option<Obstacle> {
    for _ in 0..PLACEMENT_ATTEMPTS {
        let radius = world
            .rng
            .random_range(config.cactus_min_radius..=config.cactus_max_radius);
        let pos = random_point_inset(&mut world.rng, config, radius);

        let clear_of_obstacles = world
            .obstacles
            .iter()
            .all(|o| pos.distance(o.pos) >= radius + o.radius + config.obstacle_margin);
        let clear_of_players = world
            .players
            .iter()
            .all(|p| pos.distance(p.pos) >= radius + p.radius + config.spawn_margin);

        if clear_of_obstacles && clear_of_players {
            return Some(Obstacle { pos, radius });
        }
    }
    None
}

/// Try to spawn one pickup of a random kind; returns whether it landed
pub fn spawn_pickup(world: &mut World, config: &Config) -> bool {
    let kind = PowerUpKind::ALL[world.rng.random_range(0..PowerUpKind::COUNT)];
    let radius = config.pickup_radius;

    for _ in 0..PLACEMENT_ATTEMPTS {
        let pos = random_point_inset(&mut world.rng, config, radius);

        let clear_of_obstacles = world
            .obstacles
            .iter()
            .all(|o| pos.distance(o.pos) >= radius + o.radius + config.pickup_obstacle_margin);
        let clear_of_players = world
            .players
            .iter()
            .all(|p| pos.distance(p.pos) >= radius + p.radius + config.pickup_player_margin);

        if clear_of_obstacles && clear_of_players {
            world.pickups.push(Pickup {
                pos,
                radius,
                kind,
                spawned_at: world.clock,
            });
            return true;
        }
    }

    log::debug!("pickup placement exhausted after {PLACEMENT_ATTEMPTS} attempts");
    false
}

/// Uniform point within the field, inset by `inset` on every side
fn random_point_inset(rng: &mut Pcg32, config: &Config, inset: f32) -> Vec2 {
    Vec2::new(
        rng.random_range(inset..=config.field_width - inset),
        rng.random_range(inset..=config.field_height - inset),
    )
}
