//! Per-frame simulation tick
//!
//! One call advances the whole match by `dt` seconds, in a fixed order:
//! clock, player movement and obstacle push-out, cooldown-gated shooting,
//! bullet advancement, collision resolution, pickup aging and spawning,
//! power-up expiry, particle aging. Single-threaded and deterministic for a
//! given seed and input script.

use glam::Vec2;

use super::collision;
use super::powerup::{self, PowerUpKind};
use super::spawn;
use super::state::{
    Bullet, GameEvent, MatchPhase, Particle, ShotKind, World, push_particle,
};
use crate::config::Config;
use crate::vec_from_angle;

/// Held-input snapshot for one player
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub shoot: bool,
}

/// Input commands for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub players: [PlayerInput; 2],
}

/// Advance the match by one frame
pub fn tick(world: &mut World, input: &TickInput, dt: f32, config: &Config) {
    world.events.clear();

    // Physics stops outside Running; the final frame stays renderable
    if world.phase != MatchPhase::Running {
        return;
    }

    world.clock += f64::from(dt);
    let now = world.clock;

    move_players(world, input, dt, config);
    process_shots(world, input, now, config);
    advance_bullets(world, dt, config);
    collision::resolve_frame(world, config);
    prune_stale_pickups(world, config);
    maybe_spawn_pickup(world, config);
    for i in 0..2 {
        powerup::expire_effects(&mut world.players[i], now, config, &mut world.events);
    }
    age_particles(world, dt);
}

/// Apply held movement, clamp to the field, and push players out of
/// obstacles. Runs before shooting so a shot never originates from an
/// overlapping position.
fn move_players(world: &mut World, input: &TickInput, dt: f32, config: &Config) {
    let World {
        players, obstacles, ..
    } = world;

    for (player, held) in players.iter_mut().zip(&input.players) {
        let step = player.move_speed * dt;
        if held.up {
            player.pos.y -= step;
        }
        if held.down {
            player.pos.y += step;
        }
        if held.left {
            player.pos.x -= step;
            player.facing = -1.0;
        }
        if held.right {
            player.pos.x += step;
            player.facing = 1.0;
        }

        // Keep the whole circle on the field
        player.pos.x = player
            .pos
            .x
            .clamp(player.radius, config.field_width - player.radius);
        player.pos.y = player
            .pos
            .y
            .clamp(player.radius, config.field_height - player.radius);

        // Push out of any overlapping obstacle along the center-to-center axis
        for obstacle in obstacles.iter() {
            let min_dist = player.radius + obstacle.radius;
            if player.pos.distance_squared(obstacle.pos) < min_dist * min_dist {
                let dir = collision::collision_normal(obstacle.pos, player.pos);
                player.pos = obstacle.pos + dir * min_dist;
            }
        }
    }
}

fn process_shots(world: &mut World, input: &TickInput, now: f64, config: &Config) {
    for i in 0..2 {
        if !input.players[i].shoot {
            continue;
        }
        let player = &world.players[i];
        if now - player.last_shot < player.shoot_cooldown {
            continue;
        }
        world.players[i].last_shot = now;
        fire(world, i, config);
    }
}

/// Spawn the bullet(s) for one shot, honoring the pending shot kind
fn fire(world: &mut World, index: usize, config: &Config) {
    let player = &world.players[index];
    let owner = player.id;
    let pending = player.next_shot;
    let color = player.color;
    let base_angle = if player.facing > 0.0 {
        0.0
    } else {
        std::f32::consts::PI
    };
    // Bullets leave from the muzzle, not the player center
    let muzzle = player.pos + Vec2::new(player.facing * player.radius, 0.0);

    let new_bullet = |angle: f32, max_bounces: u8, incendiary: bool, color: u32| Bullet {
        pos: muzzle,
        vel: vec_from_angle(angle) * config.bullet_speed,
        radius: config.bullet_radius,
        owner,
        bounces: 0,
        max_bounces,
        incendiary,
        color,
    };

    match pending {
        Some(ShotKind::Scatter) => {
            for offset in [-config.scatter_spread, 0.0, config.scatter_spread] {
                world.bullets.push(new_bullet(
                    base_angle + offset,
                    config.bullet_max_bounces,
                    false,
                    color,
                ));
            }
            // The charge is consumed by this shot
            world.players[index].next_shot = None;
        }
        Some(ShotKind::Ricochet) => {
            world.bullets.push(new_bullet(
                base_angle,
                config.bullet_max_bounces + config.ricochet_bonus_bounces,
                false,
                PowerUpKind::Ricochet.color(),
            ));
        }
        Some(ShotKind::Incendiary) => {
            world.bullets.push(new_bullet(
                base_angle,
                config.bullet_max_bounces,
                true,
                PowerUpKind::Incendiary.color(),
            ));
        }
        None => {
            world
                .bullets
                .push(new_bullet(base_angle, config.bullet_max_bounces, false, color));
        }
    }

    world.events.push(GameEvent::Shot { shooter: owner });
}

/// Integrate bullet positions and drop any that left the field
fn advance_bullets(world: &mut World, dt: f32, config: &Config) {
    let World {
        bullets,
        particles,
        rng,
        ..
    } = world;

    for bi in (0..bullets.len()).rev() {
        let bullet = &mut bullets[bi];
        bullet.pos += bullet.vel * dt;

        // Incendiary rounds shed a small ember trail
        if bullet.incendiary {
            use rand::Rng;
            for _ in 0..2 {
                let vel = Vec2::new(
                    rng.random_range(-30.0..30.0),
                    rng.random_range(-30.0..30.0),
                );
                push_particle(
                    particles,
                    Particle {
                        pos: bullet.pos,
                        vel,
                        hue: rng.random_range(20.0..40.0),
                        size: rng.random_range(2.0..4.0),
                        age: 0.0,
                        lifetime: rng.random_range(0.2..0.5),
                    },
                );
            }
        }

        let r = bullet.radius;
        let gone = bullet.pos.x < -r
            || bullet.pos.x > config.field_width + r
            || bullet.pos.y < -r
            || bullet.pos.y > config.field_height + r;
        if gone {
            bullets.remove(bi);
        }
    }
}

fn prune_stale_pickups(world: &mut World, config: &Config) {
    let now = world.clock;
    world
        .pickups
        .retain(|p| now - p.spawned_at < config.pickup_ttl);
}

fn maybe_spawn_pickup(world: &mut World, config: &Config) {
    if world.clock - world.last_pickup_spawn < config.pickup_spawn_interval {
        return;
    }
    if world.pickups.len() >= config.pickup_cap {
        return;
    }
    // The timer is consumed even if placement fails; the next attempt
    // waits a full interval
    world.last_pickup_spawn = world.clock;
    spawn::spawn_pickup(world, config);
}

fn age_particles(world: &mut World, dt: f32) {
    for particle in world.particles.iter_mut() {
        particle.pos += particle.vel * dt;
        particle.age += dt;
    }
    world.particles.retain(|p| !p.expired());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::PlayerId;

    const DT: f32 = 1.0 / 60.0;

    /// Running world with no obstacles, for controlled geometry
    fn bare_world(config: &Config) -> World {
        let mut world = World::new(config, 1);
        world.phase = MatchPhase::Running;
        world
    }

    fn hold(update: impl Fn(&mut PlayerInput)) -> TickInput {
        let mut input = TickInput::default();
        update(&mut input.players[0]);
        input
    }

    #[test]
    fn test_not_started_is_inert() {
        let config = Config::default();
        let mut world = World::new(&config, 1);
        let before = world.players[0].pos;

        tick(&mut world, &hold(|p| p.right = true), DT, &config);

        assert_eq!(world.players[0].pos, before);
        assert_eq!(world.clock, 0.0);
    }

    #[test]
    fn test_movement_and_facing() {
        let config = Config::default();
        let mut world = bare_world(&config);
        let start = world.players[0].pos;

        tick(&mut world, &hold(|p| p.right = true), DT, &config);
        assert!(world.players[0].pos.x > start.x);
        assert_eq!(world.players[0].facing, 1.0);

        tick(&mut world, &hold(|p| p.left = true), DT, &config);
        assert_eq!(world.players[0].facing, -1.0);
    }

    #[test]
    fn test_movement_clamped_to_field() {
        let config = Config::default();
        let mut world = bare_world(&config);
        world.players[0].pos = Vec2::new(config.player_radius + 1.0, 300.0);

        for _ in 0..10 {
            tick(&mut world, &hold(|p| p.left = true), DT, &config);
        }
        assert_eq!(world.players[0].pos.x, config.player_radius);
    }

    #[test]
    fn test_obstacle_push_out() {
        let config = Config::default();
        let mut world = bare_world(&config);
        world.obstacles.push(crate::sim::state::Obstacle {
            pos: Vec2::new(200.0, 300.0),
            radius: 30.0,
        });
        // Drop the player straight into the cactus
        world.players[0].pos = Vec2::new(210.0, 300.0);

        tick(&mut world, &TickInput::default(), DT, &config);

        let expected = config.player_radius + 30.0;
        let dist = world.players[0].pos.distance(Vec2::new(200.0, 300.0));
        assert!((dist - expected).abs() < 1e-3);
    }

    #[test]
    fn test_shot_cooldown_gating() {
        let config = Config::default();
        let mut world = bare_world(&config);

        tick(&mut world, &hold(|p| p.shoot = true), DT, &config);
        tick(&mut world, &hold(|p| p.shoot = true), DT, &config);
        // Bullets fly off to the right but stay on the field this quickly
        assert_eq!(world.bullets.len(), 1);

        // After the cooldown another shot goes through
        let frames = (config.shoot_cooldown / f64::from(DT)).ceil() as usize + 1;
        for _ in 0..frames {
            tick(&mut world, &hold(|p| p.shoot = true), DT, &config);
        }
        assert_eq!(world.bullets.len(), 2);
    }

    #[test]
    fn test_bullet_spawns_at_muzzle() {
        let config = Config::default();
        let mut world = bare_world(&config);
        let shooter = world.players[0].pos;

        tick(&mut world, &hold(|p| p.shoot = true), DT, &config);

        let bullet = &world.bullets[0];
        // One frame of travel past the muzzle point
        let expected_x = shooter.x + config.player_radius + config.bullet_speed * DT;
        assert!((bullet.pos.x - expected_x).abs() < 1e-3);
        assert_eq!(bullet.owner, PlayerId::One);
    }

    #[test]
    fn test_scatter_fires_three_in_spread() {
        let config = Config::default();
        let mut world = bare_world(&config);
        powerup::apply(
            &mut world.players[0],
            PowerUpKind::Scatter,
            0.0,
            &config,
        );

        tick(&mut world, &hold(|p| p.shoot = true), DT, &config);

        assert_eq!(world.bullets.len(), 3);
        let mut angles: Vec<f32> = world
            .bullets
            .iter()
            .map(|b| crate::angle_of(b.vel))
            .collect();
        angles.sort_by(f32::total_cmp);
        assert!((angles[0] + config.scatter_spread).abs() < 1e-3);
        assert!(angles[1].abs() < 1e-3);
        assert!((angles[2] - config.scatter_spread).abs() < 1e-3);

        // Consumed atomically by the shot
        assert_eq!(world.players[0].next_shot, None);
        // The timer entry survives until its own expiry
        assert!(world.players[0].effects.is_active(PowerUpKind::Scatter));
    }

    #[test]
    fn test_ricochet_shot_keeps_tag_and_extends_bounces() {
        let config = Config::default();
        let mut world = bare_world(&config);
        powerup::apply(
            &mut world.players[0],
            PowerUpKind::Ricochet,
            0.0,
            &config,
        );

        tick(&mut world, &hold(|p| p.shoot = true), DT, &config);

        assert_eq!(
            world.bullets[0].max_bounces,
            config.bullet_max_bounces + config.ricochet_bonus_bounces
        );
        assert_eq!(world.bullets[0].color, PowerUpKind::Ricochet.color());
        // Duration model: the tag is held until expiry, not consumed
        assert_eq!(world.players[0].next_shot, Some(ShotKind::Ricochet));
    }

    #[test]
    fn test_incendiary_shot_flags_bullet() {
        let config = Config::default();
        let mut world = bare_world(&config);
        powerup::apply(
            &mut world.players[0],
            PowerUpKind::Incendiary,
            0.0,
            &config,
        );

        tick(&mut world, &hold(|p| p.shoot = true), DT, &config);

        assert!(world.bullets[0].incendiary);
        assert_eq!(world.players[0].next_shot, Some(ShotKind::Incendiary));
        // Trail embers appeared along the flight path
        assert!(!world.particles.is_empty());
    }

    #[test]
    fn test_bullets_leave_the_field() {
        let config = Config::default();
        let mut world = bare_world(&config);
        world.bullets.push(Bullet {
            pos: Vec2::new(config.field_width - 1.0, 300.0),
            vel: Vec2::new(config.bullet_speed, 0.0),
            radius: config.bullet_radius,
            owner: PlayerId::One,
            bounces: 0,
            max_bounces: 3,
            incendiary: false,
            color: 0,
        });

        tick(&mut world, &TickInput::default(), DT, &config);
        assert!(world.bullets.is_empty());
    }

    #[test]
    fn test_pickups_despawn_after_ttl() {
        let config = Config::default();
        let mut world = bare_world(&config);
        world.pickups.push(crate::sim::state::Pickup {
            pos: Vec2::new(400.0, 100.0),
            radius: config.pickup_radius,
            kind: PowerUpKind::Speed,
            spawned_at: 0.0,
        });

        // Age the match past the TTL
        world.clock = config.pickup_ttl;
        tick(&mut world, &TickInput::default(), DT, &config);
        assert!(world.pickups.is_empty());
    }

    #[test]
    fn test_pickup_spawn_interval_and_cap() {
        let config = Config {
            cactus_count: 0,
            ..Config::default()
        };
        let mut world = World::new(&config, 3);
        world.reset(&config);

        // Nothing spawns before the interval
        tick(&mut world, &TickInput::default(), DT, &config);
        assert!(world.pickups.is_empty());

        // Jump the clock past the interval: one spawn per elapsed interval
        world.clock = config.pickup_spawn_interval;
        tick(&mut world, &TickInput::default(), DT, &config);
        assert_eq!(world.pickups.len(), 1);

        // At the cap, the timer stays overdue but nothing spawns
        world.pickups.truncate(0);
        for _ in 0..config.pickup_cap {
            world.pickups.push(crate::sim::state::Pickup {
                pos: Vec2::new(50.0, 50.0),
                radius: config.pickup_radius,
                kind: PowerUpKind::Shield,
                spawned_at: world.clock,
            });
        }
        world.clock += config.pickup_spawn_interval * 2.0;
        tick(&mut world, &TickInput::default(), DT, &config);
        assert_eq!(world.pickups.len(), config.pickup_cap);
    }

    #[test]
    fn test_three_hits_end_the_match() {
        let config = Config::default();
        let mut world = bare_world(&config);
        assert_eq!(world.players[1].health, 3);

        for expected_health in [2, 1, 0] {
            let target = world.players[1].pos;
            world.bullets.push(Bullet {
                pos: target,
                vel: Vec2::ZERO,
                radius: config.bullet_radius,
                owner: PlayerId::One,
                bounces: 0,
                max_bounces: 3,
                incendiary: false,
                color: 0,
            });
            tick(&mut world, &TickInput::default(), DT, &config);
            assert_eq!(world.players[1].health, expected_health);
        }

        assert_eq!(
            world.phase,
            MatchPhase::Ended {
                winner: PlayerId::One
            }
        );

        // No further position updates after the deciding frame
        let frozen = world.players[0].pos;
        tick(&mut world, &hold(|p| p.right = true), DT, &config);
        assert_eq!(world.players[0].pos, frozen);
    }

    #[test]
    fn test_determinism_same_seed_same_script() {
        let config = Config::default();
        let mut a = World::new(&config, 424242);
        let mut b = World::new(&config, 424242);
        a.reset(&config);
        b.reset(&config);

        let script = [
            hold(|p| p.right = true),
            hold(|p| {
                p.right = true;
                p.shoot = true;
            }),
            hold(|p| p.down = true),
            TickInput::default(),
            hold(|p| p.shoot = true),
        ];

        for input in &script {
            for _ in 0..30 {
                tick(&mut a, input, DT, &config);
                tick(&mut b, input, DT, &config);
            }
        }

        assert_eq!(a.clock, b.clock);
        assert_eq!(a.bullets.len(), b.bullets.len());
        assert_eq!(a.players[0].pos, b.players[0].pos);
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        for (x, y) in a.obstacles.iter().zip(&b.obstacles) {
            assert_eq!(x.pos, y.pos);
        }
    }
}
