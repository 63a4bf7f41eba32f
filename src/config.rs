/// Game constants and startup configuration.
///
/// All coordinates are in game units (a 800×700 play field, y growing
/// upward).  The display layer scales them to terminal cells; the core
/// only ever works in these units.

// ── Play field ────────────────────────────────────────────────────────────────

pub const GAME_WIDTH: f32 = 800.0;
pub const GAME_HEIGHT: f32 = 700.0;

// ── Ship ──────────────────────────────────────────────────────────────────────

pub const SHIP_WIDTH: f32 = 44.0;
pub const SHIP_HEIGHT: f32 = 44.0;
/// y-coordinate of the ship (distance from the bottom of the field).
pub const SHIP_BOTTOM: f32 = 32.0;
/// Horizontal game units moved per input tick.
pub const SHIP_MOVEMENT: f32 = 5.0;
pub const SHIP_LIVES: u32 = 5;

/// y-coordinate of the line the ship defends; aliens reaching it lose the game.
pub const DEFENSE_LINE: f32 = 50.0;

// ── Aliens ────────────────────────────────────────────────────────────────────

pub const ALIEN_WIDTH: f32 = 33.0;
pub const ALIEN_HEIGHT: f32 = 33.0;
/// Horizontal separation between grid slots (also the left margin).
pub const ALIEN_H_SEP: f32 = 43.0;
/// Vertical separation between grid rows.
pub const ALIEN_V_SEP: f32 = 50.0;
/// Horizontal game units per formation step.
pub const ALIEN_H_WALK: f32 = 8.0;
/// Vertical game units per descent.
pub const ALIEN_V_WALK: f32 = 16.0;
/// Distance of the top alien row from the top of the field.
pub const ALIEN_CEILING: f32 = 100.0;

/// Points per sprite tier, top rows first.  Tiers cycle every two rows.
pub const ALIEN_SCORES: [u32; 3] = [50, 40, 30];

// ── Bolts ─────────────────────────────────────────────────────────────────────

pub const BOLT_WIDTH: f32 = 4.0;
pub const BOLT_HEIGHT: f32 = 8.0;
/// Game units a bolt travels per frame.
pub const BOLT_SPEED: f32 = 15.0;
/// Upper bound on the number of formation steps between alien bolts.
pub const BOLT_RATE: u32 = 5;

// ── Difficulty scaling ────────────────────────────────────────────────────────

/// March-interval multiplier applied once per level beyond the first.
pub const SPEED_LEVEL_FACTOR: f32 = 0.75;
/// March-interval multiplier applied once per alien destroyed.
pub const SPEED_KILL_FACTOR: f32 = 0.98;

/// Seconds the sound toggle stays locked after a switch, so a held key
/// does not flip it every frame.
pub const SOUND_DEBOUNCE: f32 = 0.2;

// ── Startup configuration ─────────────────────────────────────────────────────

/// Tunables that can be overridden from the command line.
///
/// `alien_invaders 3 4 0.5` plays 3 rows of 4 aliens stepping every half
/// second.  Out-of-range or unparsable values silently keep the default.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Alien rows, in `1..=10`.
    pub rows: usize,
    /// Aliens per row, in `1..=15`.
    pub per_row: usize,
    /// Base seconds between formation steps, in `(0, 3]`.
    pub march_interval: f32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rows: 5,
            per_row: 12,
            march_interval: 1.0,
        }
    }
}

impl Config {
    /// Build a config from positional arguments (program name excluded).
    pub fn from_args<I, S>(args: I) -> Config
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cfg = Config::default();
        let mut args = args.into_iter();

        if let Some(rows) = args.next().and_then(|a| a.as_ref().parse::<usize>().ok()) {
            if (1..=10).contains(&rows) {
                cfg.rows = rows;
            }
        }
        if let Some(per_row) = args.next().and_then(|a| a.as_ref().parse::<usize>().ok()) {
            if (1..=15).contains(&per_row) {
                cfg.per_row = per_row;
            }
        }
        if let Some(interval) = args.next().and_then(|a| a.as_ref().parse::<f32>().ok()) {
            if interval > 0.0 && interval <= 3.0 {
                cfg.march_interval = interval;
            }
        }

        cfg
    }
}
