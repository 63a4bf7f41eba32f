/// Top-level game state machine.
///
/// `update` is the one entry point the front end calls per frame: it takes
/// the previous session, one input sample, the frame delta, and an RNG, and
/// returns the next session.  Nothing here touches the terminal; a seeded
/// RNG and a scripted input sequence replay a whole game deterministically.

use rand::Rng;

use crate::audio::SoundQueue;
use crate::config::{Config, SOUND_DEBOUNCE};
use crate::wave::Wave;

/// Which phase of the game the application is in.
///
/// `NewWave` and `Continue` are single-frame transitional states: they
/// always advance on the next `update` call.  `Complete` is terminal after
/// a loss; after a cleared wave it advances to the next level on start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// Before any game has started; start prompt showing.
    Inactive,
    /// Allocating the next wave.
    NewWave,
    /// Normal play.
    Active,
    /// Player pressed the pause key.
    PlayerPaused,
    /// Automatic pause after a life was lost.
    Paused,
    /// Restoring the ship before play resumes.
    Continue,
    /// Wave over, won or lost.
    Complete,
}

/// One frame's worth of polled input.  A key held across frames reads true
/// every frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputFrame {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub pause: bool,
    pub start: bool,
    pub sound_toggle: bool,
}

#[derive(Clone, Debug)]
pub struct GameSession {
    pub state: State,
    /// The running wave; `None` until the first `NewWave` frame has run.
    pub wave: Option<Wave>,
    /// Cumulative score across waves.
    pub score: u32,
    /// Score at the start of the current wave.
    pub wave_base_score: u32,
    /// Waves started so far; drives the march cadence.
    pub level: u32,
    pub sound_enabled: bool,
    /// Seconds since the sound toggle last flipped.
    pub sound_clock: f32,
    pub config: Config,
}

/// A fresh session sitting at the start prompt.
pub fn new_session(config: Config) -> GameSession {
    GameSession {
        state: State::Inactive,
        wave: None,
        score: 0,
        wave_base_score: 0,
        level: 0,
        sound_enabled: false,
        sound_clock: 0.0,
        config,
    }
}

/// Advance the session by one frame.
///
/// Exactly one state transition can happen per call; inside `Active` the
/// checks run in fixed priority order (pause, cleared, ship hit with lives
/// left, out of lives, line crossed) and the first match wins.
pub fn update(
    session: &GameSession,
    input: &InputFrame,
    dt: f32,
    rng: &mut impl Rng,
    sfx: &mut SoundQueue,
) -> GameSession {
    let mut next = session.clone();

    tick_sound_toggle(&mut next, input, dt);
    sfx.set_enabled(next.sound_enabled);

    match next.state {
        State::Inactive => {
            if input.start {
                next.state = State::NewWave;
            }
        }
        State::NewWave => {
            next.wave = Some(Wave::new(&next.config));
            next.level += 1;
            next.wave_base_score = next.score;
            next.state = State::Active;
        }
        State::Active => update_active(&mut next, input, dt, rng, sfx),
        State::PlayerPaused | State::Paused => {
            if input.start {
                next.state = State::Continue;
            }
        }
        State::Continue => {
            if let Some(wave) = next.wave.as_mut() {
                wave.respawn_ship();
            }
            next.state = State::Active;
        }
        State::Complete => {
            let cleared = next.wave.as_ref().is_some_and(Wave::all_cleared);
            if cleared && input.start {
                next.state = State::NewWave;
            }
            // A lost game stays here until the application restarts.
        }
    }

    next
}

/// One frame of normal play: input, marching, firing, bolt motion,
/// collisions, then the transition checks.
fn update_active(
    session: &mut GameSession,
    input: &InputFrame,
    dt: f32,
    rng: &mut impl Rng,
    sfx: &mut SoundQueue,
) {
    let base = session.wave_base_score;
    let level = session.level;
    let Some(wave) = session.wave.as_mut() else {
        return;
    };

    wave.move_ship(input.left, input.right);
    wave.march(level, dt, sfx);
    wave.fire_ship_bolt(input.fire, sfx);
    wave.fire_alien_bolt(rng, sfx);
    wave.advance_bolts();
    wave.check_alien_hits(sfx);

    let score = base + wave.score();
    let state = if input.pause {
        State::PlayerPaused
    } else if wave.all_cleared() {
        State::Complete
    } else if wave.check_ship_hit(sfx) && wave.lives() > 0 {
        wave.clear_bolts();
        State::Paused
    } else if wave.lives() == 0 {
        State::Complete
    } else if wave.line_crossed(sfx) {
        State::Complete
    } else {
        State::Active
    };

    session.score = score;
    session.state = state;
}

/// Flip the sound flag on the toggle key, then ignore the key for
/// `SOUND_DEBOUNCE` seconds so a held key switches it once, not every frame.
fn tick_sound_toggle(session: &mut GameSession, input: &InputFrame, dt: f32) {
    if session.sound_clock > SOUND_DEBOUNCE {
        if input.sound_toggle {
            session.sound_clock = 0.0;
            session.sound_enabled = !session.sound_enabled;
        }
    } else {
        session.sound_clock += dt;
    }
}
