/// One wave: the ship, the alien grid, and every bolt in flight.
///
/// A `Wave` owns the full simulation state of a single level.  The session
/// drives it with one call per concern per frame (move, march, fire,
/// collide) and reads the aggregate queries back to decide state
/// transitions.  All randomness comes through an injected `impl Rng` so a
/// seeded `StdRng` replays a wave exactly.
///
/// The formation's heading is stored explicitly as a `Direction` and only
/// ever changes on an edge touch, so every survivor always agrees on where
/// the swarm is going — including when the grid has emptied out.

use rand::Rng;

use crate::audio::{Sfx, SoundQueue, MARCH_NOTES};
use crate::config::{
    Config, ALIEN_CEILING, ALIEN_H_SEP, ALIEN_H_WALK, ALIEN_SCORES, ALIEN_V_SEP, ALIEN_V_WALK,
    ALIEN_WIDTH, BOLT_RATE, GAME_HEIGHT, GAME_WIDTH, SHIP_BOTTOM, SHIP_HEIGHT, SHIP_LIVES,
    SHIP_MOVEMENT, SPEED_KILL_FACTOR, SPEED_LEVEL_FACTOR,
};
use crate::entities::{Alien, Bolt, DefenseLine, Ship};

/// Current heading of the alien formation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// Seconds between formation steps at the given level and kill count.
/// Both factors are below one, so the cadence strictly shortens as either
/// input grows.
pub fn march_interval(base: f32, level: u32, kills: u32) -> f32 {
    base * SPEED_LEVEL_FACTOR.powi(level.saturating_sub(1) as i32)
        * SPEED_KILL_FACTOR.powi(kills as i32)
}

#[derive(Clone, Debug)]
pub struct Wave {
    /// `None` between taking a hit and the respawn on continue.
    pub ship: Option<Ship>,
    /// `rows × cols` of grid slots; a destroyed alien leaves `None` behind.
    /// Dimensions never change for the lifetime of the wave.
    pub grid: Vec<Vec<Option<Alien>>>,
    pub bolts: Vec<Bolt>,
    pub dline: DefenseLine,
    pub lives: u32,
    pub direction: Direction,
    /// Seconds accumulated since the last formation step.
    pub clock: f32,
    /// Grid-wide shifts since the last alien bolt (a descent step counts
    /// its drop and its horizontal move separately).
    pub steps_since_shot: u32,
    /// Formation steps since the wave began; drives the march music loop.
    pub total_steps: u64,
    pub score: u32,
    pub aliens_destroyed: u32,
    base_interval: f32,
}

impl Wave {
    /// A fresh wave: full grid, centred ship, no bolts.
    pub fn new(cfg: &Config) -> Wave {
        Wave {
            ship: Some(Ship::new()),
            grid: build_grid(cfg.rows, cfg.per_row),
            bolts: Vec::new(),
            dline: DefenseLine::new(),
            lives: SHIP_LIVES,
            direction: Direction::Right,
            clock: 0.0,
            steps_since_shot: 0,
            total_steps: 0,
            score: 0,
            aliens_destroyed: 0,
            base_interval: cfg.march_interval,
        }
    }

    // ── Ship movement ─────────────────────────────────────────────────────────

    /// Apply one input tick of horizontal movement.  No ship, no motion.
    pub fn move_ship(&mut self, left: bool, right: bool) {
        let Some(ship) = self.ship.as_mut() else {
            return;
        };
        if left {
            ship.shift(-SHIP_MOVEMENT);
        }
        if right {
            ship.shift(SHIP_MOVEMENT);
        }
    }

    /// Put a fresh centred ship on screen (wave start and continue).
    pub fn respawn_ship(&mut self) {
        self.ship = Some(Ship::new());
    }

    // ── Formation marching ────────────────────────────────────────────────────

    /// Accumulate `dt`; once the cadence interval elapses, perform exactly
    /// one formation step and restart the clock.  The interval shrinks
    /// with level and kills, so the wave speeds up as it thins out.
    pub fn march(&mut self, level: u32, dt: f32, sfx: &mut SoundQueue) {
        if self.clock > march_interval(self.base_interval, level, self.aliens_destroyed) {
            sfx.play(Sfx::MarchNote(self.total_steps % MARCH_NOTES));
            self.step();
            self.total_steps += 1;
            self.clock = 0.0;
        } else {
            self.clock += dt;
        }
    }

    /// One discrete lock-step displacement of every surviving alien.
    ///
    /// Touching the left edge drops the formation a row and turns it
    /// around in the same step; touching the right edge only turns it
    /// around.  The asymmetry is deliberate level design.
    fn step(&mut self) {
        match self.direction {
            Direction::Right => {
                if self.rightmost_x() + ALIEN_WIDTH >= GAME_WIDTH {
                    self.direction = Direction::Left;
                    self.shift_formation(-ALIEN_H_WALK, 0.0);
                } else {
                    self.shift_formation(ALIEN_H_WALK, 0.0);
                }
            }
            Direction::Left => {
                if self.leftmost_x() <= ALIEN_H_SEP {
                    self.shift_formation(0.0, -ALIEN_V_WALK);
                    self.direction = Direction::Right;
                    self.shift_formation(ALIEN_H_WALK, 0.0);
                } else {
                    self.shift_formation(-ALIEN_H_WALK, 0.0);
                }
            }
        }
    }

    /// Move the whole grid at once.  Counts toward the firing cadence.
    fn shift_formation(&mut self, dx: f32, dy: f32) {
        for alien in self.grid.iter_mut().flatten().flatten() {
            alien.shift(dx, dy);
        }
        self.steps_since_shot += 1;
    }

    // ── Firing ────────────────────────────────────────────────────────────────

    /// Fire from the ship on input, capped at one player bolt in flight.
    pub fn fire_ship_bolt(&mut self, fire: bool, sfx: &mut SoundQueue) {
        if !fire || self.player_bolt_count() >= 1 {
            return;
        }
        let Some(ship) = self.ship.as_ref() else {
            return;
        };
        self.bolts
            .push(Bolt::from_player(ship.body.x, SHIP_BOTTOM + SHIP_HEIGHT));
        sfx.play(Sfx::ShipFire);
    }

    /// Let the formation fire once enough steps have passed.
    ///
    /// The threshold is re-drawn every call, uniform in `1..=BOLT_RATE`
    /// formation shifts.  The shot comes from the lowest survivor of a
    /// uniformly chosen non-empty column; an emptied grid never fires.
    pub fn fire_alien_bolt(&mut self, rng: &mut impl Rng, sfx: &mut SoundQueue) {
        if self.steps_since_shot <= rng.gen_range(1..=BOLT_RATE) {
            return;
        }
        if self.all_cleared() {
            return;
        }
        self.steps_since_shot = 0;

        let cols = self.grid[0].len();
        let mut col = rng.gen_range(0..cols);
        while self.column_empty(col) {
            col = rng.gen_range(0..cols);
        }
        if let Some(alien) = self.lowest_in_column(col) {
            self.bolts.push(Bolt::from_alien(alien.body.x, alien.body.y));
            sfx.play(Sfx::AlienFire);
        }
    }

    // ── Bolt motion ───────────────────────────────────────────────────────────

    /// Advance every bolt by its velocity and drop the ones that left the
    /// vertical play bounds.
    pub fn advance_bolts(&mut self) {
        for bolt in &mut self.bolts {
            bolt.advance();
        }
        self.bolts
            .retain(|b| b.body.y > 0.0 && b.body.y < GAME_HEIGHT);
    }

    /// Remove every bolt on screen (used when play pauses after a hit).
    pub fn clear_bolts(&mut self) {
        self.bolts.clear();
    }

    // ── Collisions ────────────────────────────────────────────────────────────

    /// Resolve player-bolt hits on the grid.  Each hit empties the cell,
    /// consumes the bolt, and banks the alien's score; an alien can only
    /// be hit once per pass because it is removed immediately.
    pub fn check_alien_hits(&mut self, sfx: &mut SoundQueue) {
        for row in 0..self.grid.len() {
            for col in 0..self.grid[row].len() {
                let Some(alien) = self.grid[row][col] else {
                    continue;
                };
                if let Some(hit) = self.bolts.iter().position(|b| alien.collides(b)) {
                    self.score += alien.score;
                    self.grid[row][col] = None;
                    self.bolts.remove(hit);
                    self.aliens_destroyed += 1;
                    sfx.play(Sfx::AlienHit);
                }
            }
        }
    }

    /// Resolve the first alien-bolt hit on the ship, if any.  A hit
    /// destroys the ship and costs a life; an absent ship cannot be hit.
    pub fn check_ship_hit(&mut self, sfx: &mut SoundQueue) -> bool {
        let Some(ship) = self.ship.as_ref() else {
            return false;
        };
        if self.bolts.iter().any(|b| ship.collides(b)) {
            sfx.play(Sfx::ShipBlast);
            self.ship = None;
            self.lives = self.lives.saturating_sub(1);
            return true;
        }
        false
    }

    /// True once the lowest survivor, measured against the ship's top
    /// edge, has reached the defense line.  An empty grid cannot cross.
    pub fn line_crossed(&mut self, sfx: &mut SoundQueue) -> bool {
        let Some(lowest) = self.lowest_alien_y() else {
            return false;
        };
        let adjusted = lowest - (SHIP_BOTTOM + SHIP_HEIGHT);
        if adjusted == self.dline.y {
            sfx.play(Sfx::LineBreach);
        }
        adjusted <= self.dline.y
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// True iff every grid cell is empty.
    pub fn all_cleared(&self) -> bool {
        self.surviving().next().is_none()
    }

    pub fn player_bolt_count(&self) -> usize {
        self.bolts.iter().filter(|b| b.is_player_bolt()).count()
    }

    // ── Grid scans ────────────────────────────────────────────────────────────

    fn surviving(&self) -> impl Iterator<Item = &Alien> {
        self.grid.iter().flatten().flatten()
    }

    /// x of the leftmost survivor; 0 on an empty grid.
    pub fn leftmost_x(&self) -> f32 {
        let min = self
            .surviving()
            .map(|a| a.body.x)
            .fold(f32::INFINITY, f32::min);
        if min.is_finite() {
            min
        } else {
            0.0
        }
    }

    /// x of the rightmost survivor; 0 on an empty grid.
    pub fn rightmost_x(&self) -> f32 {
        self.surviving().map(|a| a.body.x).fold(0.0, f32::max)
    }

    /// y of the lowest survivor, or `None` on an empty grid.
    fn lowest_alien_y(&self) -> Option<f32> {
        self.surviving()
            .map(|a| a.body.y)
            .fold(None, |acc, y| Some(acc.map_or(y, |m: f32| m.min(y))))
    }

    fn column_empty(&self, col: usize) -> bool {
        self.grid.iter().all(|row| row[col].is_none())
    }

    /// The on-screen lowest survivor of a column (highest row index).
    fn lowest_in_column(&self, col: usize) -> Option<Alien> {
        self.grid.iter().rev().find_map(|row| row[col])
    }
}

/// Lay out a full grid: row 0 sits at the ceiling, later rows below it,
/// sprite tier advancing every two rows.
fn build_grid(rows: usize, per_row: usize) -> Vec<Vec<Option<Alien>>> {
    let mut grid = Vec::with_capacity(rows);
    let mut y = GAME_HEIGHT - ALIEN_CEILING;

    for row in 0..rows {
        let tier = (row / 2) % ALIEN_SCORES.len();
        let mut alien_row = Vec::with_capacity(per_row);
        let mut x = ALIEN_H_SEP;
        for _ in 0..per_row {
            alien_row.push(Some(Alien::new(x, y, tier)));
            x += ALIEN_H_SEP;
        }
        grid.push(alien_row);
        y -= ALIEN_V_SEP;
    }

    grid
}
