/// Sound boundary.
///
/// The core never talks to an audio device.  It pushes `Sfx` events into a
/// `SoundQueue` as gameplay happens; the front end drains the queue once per
/// frame and forwards the events to whatever backend it has (the terminal
/// bell, in the shipped binary).  The queue gates on the session's sound
/// flag at emission time, so a muted game records nothing.

/// Number of notes in the looping march sequence played as the formation steps.
pub const MARCH_NOTES: u64 = 4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sfx {
    /// Player fired a bolt.
    ShipFire,
    /// An alien fired a bolt.
    AlienFire,
    /// A player bolt destroyed an alien.
    AlienHit,
    /// An alien bolt destroyed the ship.
    ShipBlast,
    /// The formation reached the defense line.
    LineBreach,
    /// One note of the looping march sequence, `0..MARCH_NOTES`.
    MarchNote(u64),
}

/// Per-frame collection of sound events, gated by the sound toggle.
#[derive(Clone, Debug, Default)]
pub struct SoundQueue {
    enabled: bool,
    pending: Vec<Sfx>,
}

impl SoundQueue {
    pub fn new(enabled: bool) -> SoundQueue {
        SoundQueue {
            enabled,
            pending: Vec::new(),
        }
    }

    /// Sync with the session's sound toggle; while disabled, `play` is a no-op.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record a sound event.  Fire-and-forget: never blocks, never fails.
    pub fn play(&mut self, sfx: Sfx) {
        if self.enabled {
            self.pending.push(sfx);
        }
    }

    /// Hand the frame's events to the backend, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<Sfx> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> &[Sfx] {
        &self.pending
    }
}
