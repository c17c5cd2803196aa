//! Power-up catalog and timed-effect bookkeeping
//!
//! Two effect models:
//! - "duration" kinds apply a standing modifier reverted when the match
//!   clock passes the recorded expiry, whether or not it was ever used;
//! - "charge" kinds arm the next shot and are consumed atomically when it
//!   fires (an unused charge still lapses at expiry).
//!
//! Activation always *sets* from the config baseline rather than scaling
//! the current value, so collecting the same kind again just refreshes its
//! expiry - effects never stack and revert restores the exact default.

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, Player, ShotKind};
use crate::config::Config;

/// The closed catalog of power-up kinds, in spawn-table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Halved shooting cooldown
    QuickShot,
    /// Absorbs the next two hits
    Shield,
    /// Movement speed boost
    Speed,
    /// Next shot fires three bullets in a spread
    Scatter,
    /// Bullets bounce more times
    Ricochet,
    /// Bullets burn obstacles down
    Incendiary,
}

impl PowerUpKind {
    pub const COUNT: usize = 6;

    pub const ALL: [PowerUpKind; Self::COUNT] = [
        PowerUpKind::QuickShot,
        PowerUpKind::Shield,
        PowerUpKind::Speed,
        PowerUpKind::Scatter,
        PowerUpKind::Ricochet,
        PowerUpKind::Incendiary,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display name for HUD chips
    pub fn name(self) -> &'static str {
        match self {
            PowerUpKind::QuickShot => "Quick Draw",
            PowerUpKind::Shield => "Bulletproof Vest",
            PowerUpKind::Speed => "Speed Boots",
            PowerUpKind::Scatter => "Scatter Shot",
            PowerUpKind::Ricochet => "Ricocheting Bullet",
            PowerUpKind::Incendiary => "Incendiary Bullet",
        }
    }

    /// Collection notification text
    pub fn description(self) -> &'static str {
        match self {
            PowerUpKind::QuickShot => "Faster shooting!",
            PowerUpKind::Shield => "Bulletproof!",
            PowerUpKind::Speed => "Speed boost!",
            PowerUpKind::Scatter => "Scatter shot!",
            PowerUpKind::Ricochet => "Ricocheting bullets!",
            PowerUpKind::Incendiary => "Incendiary bullets!",
        }
    }

    /// Renderer color tag for the pickup (and for special bullets)
    pub fn color(self) -> u32 {
        match self {
            PowerUpKind::QuickShot => 0xff9900,
            PowerUpKind::Shield => 0xaaaaaa,
            PowerUpKind::Speed => 0x33ff33,
            PowerUpKind::Scatter => 0xff00ff,
            PowerUpKind::Ricochet => 0x00ccff,
            PowerUpKind::Incendiary => 0xff4500,
        }
    }

    /// Charge kinds are consumed by the next shot fired
    pub fn is_charge(self) -> bool {
        matches!(self, PowerUpKind::Scatter)
    }

    /// The shot behavior this kind arms, if any
    pub fn shot_kind(self) -> Option<ShotKind> {
        match self {
            PowerUpKind::Scatter => Some(ShotKind::Scatter),
            PowerUpKind::Ricochet => Some(ShotKind::Ricochet),
            PowerUpKind::Incendiary => Some(ShotKind::Incendiary),
            _ => None,
        }
    }
}

/// Apply a collected power-up to a player, recording its expiry
pub fn apply(player: &mut Player, kind: PowerUpKind, now: f64, config: &Config) {
    match kind {
        PowerUpKind::QuickShot => {
            player.shoot_cooldown = config.shoot_cooldown * config.quickshot_factor;
        }
        PowerUpKind::Shield => {
            player.shields = config.shield_hits;
        }
        PowerUpKind::Speed => {
            player.move_speed = config.player_speed * config.speed_boost_factor;
        }
        PowerUpKind::Scatter | PowerUpKind::Ricochet | PowerUpKind::Incendiary => {
            player.next_shot = kind.shot_kind();
        }
    }
    player.effects.set(kind, now + config.powerup_duration);
}

/// Revert and drop every active kind whose expiry has passed
///
/// The only place default stats are restored; runs once per player per
/// frame so expiry is a plain clock comparison, never a scheduled callback.
pub fn expire_effects(
    player: &mut Player,
    now: f64,
    config: &Config,
    events: &mut Vec<GameEvent>,
) {
    for kind in PowerUpKind::ALL {
        let Some(expires_at) = player.effects.expiry(kind) else {
            continue;
        };
        if now < expires_at {
            continue;
        }
        revert(player, kind, config);
        player.effects.clear(kind);
        events.push(GameEvent::PowerupExpired {
            player: player.id,
            kind,
        });
    }
}

/// Undo exactly what [`apply`] did for a kind
fn revert(player: &mut Player, kind: PowerUpKind, config: &Config) {
    match kind {
        PowerUpKind::QuickShot => {
            player.shoot_cooldown = config.shoot_cooldown;
        }
        PowerUpKind::Speed => {
            player.move_speed = config.player_speed;
        }
        // Remaining shield charges are consumed via hits, not the clock
        PowerUpKind::Shield => {}
        PowerUpKind::Scatter | PowerUpKind::Ricochet | PowerUpKind::Incendiary => {
            if player.next_shot == kind.shot_kind() {
                player.next_shot = None;
            }
        }
    }
}

/// Seconds left on an active kind, for HUD indicator chips
pub fn remaining(player: &Player, kind: PowerUpKind, now: f64) -> Option<f32> {
    player
        .effects
        .expiry(kind)
        .map(|at| ((at - now).max(0.0)) as f32)
}
