//! Collision detection and response
//!
//! Circle primitives plus the per-frame resolution passes, run in a fixed
//! order to avoid order-dependent double resolution: bullet-obstacle first,
//! then bullet-player, then pickup-player. Bullets iterate by reverse index
//! so removing one mid-scan never skips or double-processes a neighbor.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use std::f32::consts::TAU;

use super::powerup;
use super::state::{GameEvent, MatchPhase, Particle, World, push_particle};
use crate::config::Config;
use crate::vec_from_angle;

/// Circle-circle overlap test
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) < (ra + rb) * (ra + rb)
}

/// Unit normal from `from` toward `to`; falls back to +x if the centers coincide
#[inline]
pub fn collision_normal(from: Vec2, to: Vec2) -> Vec2 {
    let n = to - from;
    if n.length_squared() > 1e-12 {
        n / n.length()
    } else {
        Vec2::X
    }
}

/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Run one frame's collision passes in fixed order
pub fn resolve_frame(world: &mut World, config: &Config) {
    resolve_bullets_vs_obstacles(world, config);
    resolve_bullets_vs_players(world);
    resolve_pickups_vs_players(world, config);
}

fn resolve_bullets_vs_obstacles(world: &mut World, config: &Config) {
    let World {
        bullets,
        obstacles,
        particles,
        events,
        rng,
        ..
    } = world;

    for bi in (0..bullets.len()).rev() {
        for oi in (0..obstacles.len()).rev() {
            let (bullet_pos, bullet_radius) = (bullets[bi].pos, bullets[bi].radius);
            let (obstacle_pos, obstacle_radius) = (obstacles[oi].pos, obstacles[oi].radius);
            if !circles_overlap(bullet_pos, bullet_radius, obstacle_pos, obstacle_radius) {
                continue;
            }

            if bullets[bi].incendiary {
                // Burn it down: obstacle, bullet, and a shower of sparks
                spawn_fire_burst(particles, rng, obstacle_pos, obstacle_radius, config);
                events.push(GameEvent::ObstacleIncinerated { pos: obstacle_pos });
                obstacles.remove(oi);
                bullets.remove(bi);
            } else if bullets[bi].bounces < bullets[bi].max_bounces {
                let normal = collision_normal(obstacle_pos, bullet_pos);
                let bullet = &mut bullets[bi];
                bullet.vel = reflect_velocity(bullet.vel, normal);
                bullet.bounces += 1;
                // Nudge along the new heading so it clears the surface
                bullet.pos += bullet.vel * config.ricochet_nudge;
                events.push(GameEvent::Ricochet);
            } else {
                bullets.remove(bi);
            }
            // One obstacle interaction per bullet per frame
            break;
        }
    }
}

fn resolve_bullets_vs_players(world: &mut World) {
    let World {
        bullets,
        players,
        events,
        phase,
        ..
    } = world;

    for bi in (0..bullets.len()).rev() {
        for player in players.iter_mut() {
            // No self-damage; ownership is the key, never color
            if bullets[bi].owner == player.id {
                continue;
            }
            if !circles_overlap(
                bullets[bi].pos,
                bullets[bi].radius,
                player.pos,
                player.radius,
            ) {
                continue;
            }

            if player.shields > 0 {
                player.shields -= 1;
                events.push(GameEvent::ShieldAbsorbed { target: player.id });
            } else {
                player.health = player.health.saturating_sub(1);
                events.push(GameEvent::Hit { target: player.id });
                if player.health == 0 && *phase == MatchPhase::Running {
                    let winner = player.id.other();
                    *phase = MatchPhase::Ended { winner };
                    events.push(GameEvent::MatchEnded { winner });
                }
            }
            // The bullet is spent regardless of shield outcome
            bullets.remove(bi);
            break;
        }
    }
}

fn resolve_pickups_vs_players(world: &mut World, config: &Config) {
    let now = world.clock;
    let World {
        pickups,
        players,
        events,
        ..
    } = world;

    for pi in (0..pickups.len()).rev() {
        // Array order is the documented tie-break if both players reach a
        // pickup in the same frame
        for player in players.iter_mut() {
            if !circles_overlap(
                pickups[pi].pos,
                pickups[pi].radius,
                player.pos,
                player.radius,
            ) {
                continue;
            }

            let kind = pickups[pi].kind;
            powerup::apply(player, kind, now, config);
            events.push(GameEvent::PowerupCollected {
                player: player.id,
                kind,
            });
            pickups.remove(pi);
            break;
        }
    }
}

/// Spark shower where an obstacle burned down; bigger cacti shed more
pub(crate) fn spawn_fire_burst(
    particles: &mut Vec<Particle>,
    rng: &mut Pcg32,
    pos: Vec2,
    radius: f32,
    config: &Config,
) {
    let count = config.fire_burst_base + radius as usize;
    for _ in 0..count {
        let angle = rng.random_range(0.0..TAU);
        let speed = rng.random_range(50.0..150.0);
        push_particle(
            particles,
            Particle {
                pos,
                vel: vec_from_angle(angle) * speed,
                hue: rng.random_range(20.0..40.0),
                size: rng.random_range(2.0..6.0),
                age: 0.0,
                lifetime: rng.random_range(0.5..1.5),
            },
        );
    }
}
