//! Match lifecycle wrapper
//!
//! [`Duel`] is what embedders hold: it owns the [`World`], the rules
//! [`Config`], and the injected audio sink, and exposes the start/restart
//! entry points, the per-frame drive, and the HUD snapshot. Rendering reads
//! entity state straight from [`Duel::world`].

use crate::audio::{AudioSink, Sound};
use crate::config::Config;
use crate::sim::powerup::{self, PowerUpKind};
use crate::sim::state::{GameEvent, MatchPhase, PlayerId, World};
use crate::sim::tick::{TickInput, tick};

/// One running (or about-to-run) match
pub struct Duel {
    config: Config,
    world: World,
    audio: Box<dyn AudioSink>,
}

impl Duel {
    /// Build an idle match; call [`Duel::start`] to begin play
    pub fn new(config: Config, seed: u64, audio: Box<dyn AudioSink>) -> Self {
        let world = World::new(&config, seed);
        Self {
            config,
            world,
            audio,
        }
    }

    /// Begin a fresh match: players healed and repositioned, field re-rolled
    pub fn start(&mut self) {
        self.world.reset(&self.config);
    }

    /// Identical to [`Duel::start`]; valid from any phase
    pub fn restart(&mut self) {
        self.start();
    }

    /// Advance one frame and route sounds to the sink.
    ///
    /// Returns the frame's events for the UI collaborator (notifications,
    /// HUD flashes). The slice is valid until the next call.
    pub fn frame(&mut self, input: &TickInput, dt: f32) -> &[GameEvent] {
        tick(&mut self.world, input, dt, &self.config);
        for event in &self.world.events {
            if let Some(sound) = sound_for(event) {
                self.audio.play(sound);
            }
        }
        &self.world.events
    }

    /// Read-only entity state for the rendering collaborator
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Snapshot for health bars, power-up indicator chips, and the winner label
    pub fn hud(&self) -> HudSnapshot {
        let now = self.world.clock;
        let players = [
            hud_player(&self.world, PlayerId::One, now),
            hud_player(&self.world, PlayerId::Two, now),
        ];
        let winner = match self.world.phase {
            MatchPhase::Ended { winner } => Some(winner),
            _ => None,
        };
        HudSnapshot { players, winner }
    }
}

/// Per-player HUD values
#[derive(Debug, Clone, PartialEq)]
pub struct HudPlayer {
    pub health: u8,
    pub shields: u8,
    /// Active power-ups with seconds remaining, in catalog order
    pub effects: Vec<(PowerUpKind, f32)>,
}

/// Everything the UI collaborator displays
#[derive(Debug, Clone, PartialEq)]
pub struct HudSnapshot {
    pub players: [HudPlayer; 2],
    pub winner: Option<PlayerId>,
}

fn hud_player(world: &World, id: PlayerId, now: f64) -> HudPlayer {
    let player = world.player(id);
    let effects = player
        .effects
        .iter_active()
        .filter_map(|(kind, _)| powerup::remaining(player, kind, now).map(|left| (kind, left)))
        .collect();
    HudPlayer {
        health: player.health,
        shields: player.shields,
        effects,
    }
}

/// Which sound, if any, a game event triggers
fn sound_for(event: &GameEvent) -> Option<Sound> {
    match event {
        GameEvent::Shot { .. } => Some(Sound::Shot),
        GameEvent::Ricochet => Some(Sound::Ricochet),
        GameEvent::Hit { .. } => Some(Sound::Hit),
        GameEvent::PowerupCollected { .. } => Some(Sound::Powerup),
        GameEvent::ObstacleIncinerated { .. } => Some(Sound::Fire),
        GameEvent::ShieldAbsorbed { .. }
        | GameEvent::PowerupExpired { .. }
        | GameEvent::MatchEnded { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullAudio;
    use crate::sim::tick::PlayerInput;

    const DT: f32 = 1.0 / 60.0;

    fn new_duel() -> Duel {
        Duel::new(Config::default(), 11, Box::new(NullAudio))
    }

    #[test]
    fn test_idle_until_started() {
        let mut duel = new_duel();
        assert_eq!(duel.world().phase, MatchPhase::NotStarted);

        let events = duel.frame(&TickInput::default(), DT);
        assert!(events.is_empty());
        assert_eq!(duel.world().clock, 0.0);
    }

    #[test]
    fn test_start_places_field_and_runs() {
        let mut duel = new_duel();
        duel.start();
        assert_eq!(duel.world().phase, MatchPhase::Running);
        assert!(!duel.world().obstacles.is_empty());

        duel.frame(&TickInput::default(), DT);
        assert!(duel.world().clock > 0.0);
    }

    #[test]
    fn test_restart_from_ended_state() {
        let mut duel = new_duel();
        duel.start();
        duel.world.players[1].health = 0;
        duel.world.phase = MatchPhase::Ended {
            winner: PlayerId::One,
        };

        duel.restart();
        assert_eq!(duel.world().phase, MatchPhase::Running);
        assert_eq!(duel.world().players[1].health, 3);
        assert_eq!(duel.hud().winner, None);
    }

    #[test]
    fn test_shot_event_reaches_embedder() {
        let mut duel = new_duel();
        duel.start();

        let mut input = TickInput::default();
        input.players[0] = PlayerInput {
            shoot: true,
            ..Default::default()
        };
        let events = duel.frame(&input, DT);
        assert!(events.contains(&GameEvent::Shot {
            shooter: PlayerId::One
        }));
    }

    #[test]
    fn test_hud_reports_effects_and_winner() {
        let mut duel = new_duel();
        duel.start();

        powerup::apply(
            &mut duel.world.players[0],
            PowerUpKind::Speed,
            duel.world.clock,
            &duel.config,
        );
        let hud = duel.hud();
        assert_eq!(hud.players[0].effects.len(), 1);
        let (kind, left) = hud.players[0].effects[0];
        assert_eq!(kind, PowerUpKind::Speed);
        assert!(left > 0.0 && f64::from(left) <= duel.config.powerup_duration);
        assert_eq!(hud.players[1].effects.len(), 0);
        assert_eq!(hud.winner, None);

        duel.world.phase = MatchPhase::Ended {
            winner: PlayerId::Two,
        };
        assert_eq!(duel.hud().winner, Some(PlayerId::Two));
    }
}
