use alien_invaders::audio::SoundQueue;
use alien_invaders::config::Config;
use alien_invaders::entities::Bolt;
use alien_invaders::session::{new_session, update, GameSession, InputFrame, State};

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn muted() -> SoundQueue {
    SoundQueue::new(false)
}

fn idle() -> InputFrame {
    InputFrame::default()
}

fn pressing_start() -> InputFrame {
    InputFrame {
        start: true,
        ..InputFrame::default()
    }
}

/// Run one frame with a small dt and default plumbing.
fn step(session: &GameSession, input: &InputFrame) -> GameSession {
    update(session, input, 0.016, &mut seeded_rng(), &mut muted())
}

/// A session sitting in Active with a live wave (two update frames in).
fn active_session() -> GameSession {
    let s = new_session(Config::default());
    let s = step(&s, &pressing_start()); // Inactive -> NewWave
    step(&s, &idle()) // NewWave -> Active
}

// ── Startup ───────────────────────────────────────────────────────────────────

#[test]
fn session_starts_inactive_without_a_wave() {
    let s = new_session(Config::default());
    assert_eq!(s.state, State::Inactive);
    assert!(s.wave.is_none());
    assert_eq!(s.level, 0);
    assert_eq!(s.score, 0);
    assert!(!s.sound_enabled);
}

#[test]
fn inactive_waits_for_the_start_key() {
    let s = new_session(Config::default());
    let s = step(&s, &idle());
    assert_eq!(s.state, State::Inactive);
}

#[test]
fn start_key_walks_through_new_wave_into_active() {
    // Scenario: one start press, then two updates — the session passes
    // through NewWave and lands in Active with the level bumped exactly once.
    let s = new_session(Config::default());

    let s = step(&s, &pressing_start());
    assert_eq!(s.state, State::NewWave);
    assert_eq!(s.level, 0); // wave not allocated yet

    let s = step(&s, &idle());
    assert_eq!(s.state, State::Active);
    assert_eq!(s.level, 1);
    assert!(s.wave.is_some());
}

#[test]
fn new_wave_respects_configured_grid() {
    let cfg = Config {
        rows: 2,
        per_row: 3,
        march_interval: 1.0,
    };
    let s = new_session(cfg);
    let s = step(&s, &pressing_start());
    let s = step(&s, &idle());
    let wave = s.wave.as_ref().unwrap();
    assert_eq!(wave.grid.len(), 2);
    assert!(wave.grid.iter().all(|row| row.len() == 3));
}

// ── Active play ───────────────────────────────────────────────────────────────

#[test]
fn active_stays_active_on_a_quiet_frame() {
    let s = active_session();
    let s = step(&s, &idle());
    assert_eq!(s.state, State::Active);
}

#[test]
fn active_moves_the_ship() {
    let s = active_session();
    let x0 = s.wave.as_ref().unwrap().ship.unwrap().body.x;
    let s = step(
        &s,
        &InputFrame {
            right: true,
            ..InputFrame::default()
        },
    );
    let x1 = s.wave.as_ref().unwrap().ship.unwrap().body.x;
    assert!(x1 > x0);
}

#[test]
fn active_fires_on_input_with_cap() {
    let mut s = active_session();
    let fire = InputFrame {
        fire: true,
        ..InputFrame::default()
    };
    for _ in 0..5 {
        s = step(&s, &fire);
        assert!(s.wave.as_ref().unwrap().player_bolt_count() <= 1);
    }
}

#[test]
fn pause_key_takes_priority() {
    let s = active_session();
    let s = step(
        &s,
        &InputFrame {
            pause: true,
            ..InputFrame::default()
        },
    );
    assert_eq!(s.state, State::PlayerPaused);
}

// ── Life loss & continue ──────────────────────────────────────────────────────

/// Plant an alien bolt one advance above the ship so the next frame hits.
fn plant_ship_hit(session: &mut GameSession) {
    let wave = session.wave.as_mut().unwrap();
    let ship = wave.ship.unwrap();
    wave.bolts.push(Bolt::from_alien(ship.body.x, ship.body.y + 15.0));
}

#[test]
fn ship_hit_with_lives_left_pauses_and_clears_bolts() {
    let mut s = active_session();
    plant_ship_hit(&mut s);
    let s = step(&s, &idle());
    assert_eq!(s.state, State::Paused);
    let wave = s.wave.as_ref().unwrap();
    assert!(wave.ship.is_none());
    assert_eq!(wave.lives(), 4);
    assert!(wave.bolts.is_empty());
}

#[test]
fn last_life_lost_completes_the_game() {
    // Scenario: one life left, ship takes a hit — the session must go to
    // Complete on the loss path, never to Paused.
    let mut s = active_session();
    s.wave.as_mut().unwrap().lives = 1;
    plant_ship_hit(&mut s);
    let s = step(&s, &idle());
    assert_eq!(s.state, State::Complete);
    let wave = s.wave.as_ref().unwrap();
    assert_eq!(wave.lives(), 0);
    assert!(wave.ship.is_none());
}

#[test]
fn paused_resumes_through_continue_with_a_fresh_ship() {
    let mut s = active_session();
    plant_ship_hit(&mut s);
    let s = step(&s, &idle()); // Active -> Paused
    let s = step(&s, &pressing_start()); // Paused -> Continue
    assert_eq!(s.state, State::Continue);
    let s = step(&s, &idle()); // Continue -> Active, ship restored
    assert_eq!(s.state, State::Active);
    assert!(s.wave.as_ref().unwrap().ship.is_some());
}

#[test]
fn player_pause_resumes_the_same_way() {
    let s = active_session();
    let s = step(
        &s,
        &InputFrame {
            pause: true,
            ..InputFrame::default()
        },
    );
    let s = step(&s, &pressing_start());
    assert_eq!(s.state, State::Continue);
    let s = step(&s, &idle());
    assert_eq!(s.state, State::Active);
}

#[test]
fn paused_ignores_other_keys() {
    let mut s = active_session();
    plant_ship_hit(&mut s);
    let s = step(&s, &idle());
    let s = step(
        &s,
        &InputFrame {
            fire: true,
            left: true,
            ..InputFrame::default()
        },
    );
    assert_eq!(s.state, State::Paused);
}

// ── Wave completion ───────────────────────────────────────────────────────────

fn clear_grid(session: &mut GameSession) {
    let wave = session.wave.as_mut().unwrap();
    for row in wave.grid.iter_mut() {
        for cell in row.iter_mut() {
            *cell = None;
        }
    }
}

#[test]
fn cleared_grid_completes_the_wave() {
    let mut s = active_session();
    clear_grid(&mut s);
    let s = step(&s, &idle());
    assert_eq!(s.state, State::Complete);
}

#[test]
fn won_wave_advances_to_the_next_level() {
    let mut s = active_session();
    clear_grid(&mut s);
    let s = step(&s, &idle()); // -> Complete
    let s = step(&s, &pressing_start()); // -> NewWave
    assert_eq!(s.state, State::NewWave);
    let s = step(&s, &idle()); // -> Active
    assert_eq!(s.state, State::Active);
    assert_eq!(s.level, 2);
    assert!(!s.wave.as_ref().unwrap().all_cleared()); // fresh grid
}

#[test]
fn lost_game_is_terminal() {
    let mut s = active_session();
    s.wave.as_mut().unwrap().lives = 1;
    plant_ship_hit(&mut s);
    let s = step(&s, &idle()); // -> Complete (loss)
    let s = step(&s, &pressing_start());
    assert_eq!(s.state, State::Complete); // no restart from a loss
}

#[test]
fn crossed_line_completes_the_wave() {
    let mut s = active_session();
    {
        let wave = s.wave.as_mut().unwrap();
        for row in wave.grid.iter_mut() {
            for cell in row.iter_mut().flatten() {
                cell.body.y = 120.0; // below the adjusted defense line
            }
        }
    }
    let s = step(&s, &idle());
    assert_eq!(s.state, State::Complete);
}

// ── Score across waves ────────────────────────────────────────────────────────

#[test]
fn score_carries_across_waves() {
    let mut s = active_session();
    s.score = 500;
    s.wave_base_score = 500;
    clear_grid(&mut s);
    let s = step(&s, &idle()); // -> Complete
    let s = step(&s, &pressing_start()); // -> NewWave
    let s = step(&s, &idle()); // allocates wave, snapshots baseline
    assert_eq!(s.wave_base_score, 500);
    assert_eq!(s.score, 500);
}

#[test]
fn score_is_baseline_plus_wave_score() {
    let mut s = active_session();
    s.wave_base_score = 200;
    {
        // Line up a kill: aligned bolt already touching the last alien
        let wave = s.wave.as_mut().unwrap();
        for row in wave.grid.iter_mut() {
            for cell in row.iter_mut() {
                *cell = None;
            }
        }
        let survivor = alien_invaders::entities::Alien::new(400.0, 400.0, 0);
        wave.grid[0][0] = Some(survivor);
        wave.bolts.push(Bolt::from_player(400.0, 400.0 - 15.0));
    }
    let s = step(&s, &idle());
    assert_eq!(s.score, 250); // baseline 200 + alien worth 50
}

// ── Sound toggle debounce ─────────────────────────────────────────────────────

#[test]
fn sound_toggle_flips_after_the_debounce_window() {
    let toggle = InputFrame {
        sound_toggle: true,
        ..InputFrame::default()
    };
    let s = new_session(Config::default());

    // First frame only accumulates the debounce clock
    let s = update(&s, &toggle, 0.3, &mut seeded_rng(), &mut muted());
    assert!(!s.sound_enabled);

    // Clock is past the window now; the held key flips the toggle once
    let s = update(&s, &toggle, 0.3, &mut seeded_rng(), &mut muted());
    assert!(s.sound_enabled);

    // Immediately after a flip the toggle is locked again
    let s = update(&s, &toggle, 0.1, &mut seeded_rng(), &mut muted());
    assert!(s.sound_enabled);
}

#[test]
fn sound_queue_follows_the_session_flag() {
    let mut sfx = muted();
    let mut s = new_session(Config::default());
    s.sound_enabled = true;
    s.sound_clock = 0.0;
    let _ = update(&s, &idle(), 0.016, &mut seeded_rng(), &mut sfx);
    assert!(sfx.is_enabled());
}
