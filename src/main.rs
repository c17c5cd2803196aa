//! Desert Duel entry point
//!
//! Runs a headless demo match between two scripted duelists and prints the
//! outcome. Set `RUST_LOG=debug` for per-sound output, or pass a seed as
//! the first argument to reproduce a specific field layout.

use desert_duel::audio::LogAudio;
use desert_duel::sim::{GameEvent, MatchPhase, PlayerInput, TickInput};
use desert_duel::{Config, Duel};

const DT: f32 = 1.0 / 60.0;
/// Give up and call it a draw after two minutes of play
const MAX_FRAMES: u32 = 60 * 120;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(12345);

    let mut duel = Duel::new(Config::default(), seed, Box::new(LogAudio));
    duel.start();

    for frame in 0..MAX_FRAMES {
        let input = scripted_input(frame);
        for event in duel.frame(&input, DT) {
            match event {
                GameEvent::Hit { target } => log::info!("{target:?} took a hit"),
                GameEvent::ShieldAbsorbed { target } => {
                    log::info!("{target:?}'s shield absorbed a hit");
                }
                GameEvent::PowerupCollected { player, kind } => {
                    log::info!("{player:?} collected {} - {}", kind.name(), kind.description());
                }
                GameEvent::ObstacleIncinerated { pos } => {
                    log::info!("cactus at ({:.0}, {:.0}) went up in flames", pos.x, pos.y);
                }
                _ => {}
            }
        }

        if let MatchPhase::Ended { winner } = duel.world().phase {
            let hud = duel.hud();
            println!(
                "match over after {:.1}s: {winner:?} wins ({} vs {} health)",
                duel.world().clock,
                hud.players[0].health,
                hud.players[1].health,
            );
            return;
        }
    }

    println!("draw: no winner within {MAX_FRAMES} frames");
}

/// Canned choreography: approach, strafe, and keep shooting
fn scripted_input(frame: u32) -> TickInput {
    let phase = (frame / 90) % 4;
    let one = PlayerInput {
        up: phase == 1,
        down: phase == 3,
        left: false,
        right: phase == 0,
        shoot: frame % 7 == 0,
    };
    let two = PlayerInput {
        up: phase == 3,
        down: phase == 1,
        left: phase == 0,
        right: false,
        shoot: frame % 11 == 0,
    };
    TickInput { players: [one, two] }
}
