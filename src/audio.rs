//! Sound events and the audio sink boundary
//!
//! The simulation never talks to an audio device. It emits named events and
//! the embedder injects an [`AudioSink`] at construction; headless and test
//! runs use [`NullAudio`]. Sinks are infallible by contract - a playback
//! problem is the sink's to log, never the frame loop's to unwind.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    /// A bullet was fired
    Shot,
    /// A bullet bounced off an obstacle
    Ricochet,
    /// A player took damage
    Hit,
    /// A power-up was collected
    Powerup,
    /// An obstacle went up in flames
    Fire,
}

/// Playback interface supplied by the embedder
///
/// Implementations handle overlap-safe replay themselves (restart from zero
/// on repeated triggers, mixing, etc.).
pub trait AudioSink {
    fn play(&mut self, sound: Sound);
}

/// No-op sink for headless and test runs
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _sound: Sound) {}
}

/// Sink that logs each trigger, for the demo binary
#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, sound: Sound) {
        log::debug!("sound: {sound:?}");
    }
}
