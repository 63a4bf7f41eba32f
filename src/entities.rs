/// All game entity types — pure data plus the containment test.
///
/// Everything on screen is a positioned, sized rectangle.  `Body` carries
/// the shared geometry; Ship/Alien/Bolt wrap it with the little extra state
/// each one needs.  No entity knows about the grid, the wave, or the
/// terminal.

use crate::config::{
    ALIEN_HEIGHT, ALIEN_SCORES, ALIEN_WIDTH, BOLT_HEIGHT, BOLT_SPEED, BOLT_WIDTH, DEFENSE_LINE,
    GAME_WIDTH, SHIP_BOTTOM, SHIP_HEIGHT, SHIP_WIDTH,
};

// ── Geometry ──────────────────────────────────────────────────────────────────

/// An axis-aligned rectangle centred on `(x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Body {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Body {
        Body { x, y, width, height }
    }

    /// True if `(px, py)` lies inside this rectangle, edges included.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        (px - self.x).abs() <= self.width / 2.0 && (py - self.y).abs() <= self.height / 2.0
    }
}

// ── Ship ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ship {
    pub body: Body,
}

impl Ship {
    /// A new ship centred at the bottom of the play field.
    pub fn new() -> Ship {
        Ship {
            body: Body::new(GAME_WIDTH / 2.0, SHIP_BOTTOM, SHIP_WIDTH, SHIP_HEIGHT),
        }
    }

    /// Translate horizontally, clamped so the ship stays fully on screen.
    pub fn shift(&mut self, dx: f32) {
        let half = self.body.width / 2.0;
        self.body.x = (self.body.x + dx).clamp(half, GAME_WIDTH - half);
    }

    /// True if an alien bolt touches this ship.  Player bolts never hit it.
    pub fn collides(&self, bolt: &Bolt) -> bool {
        bolt.owner == BoltOwner::Alien
            && bolt.corners().iter().any(|&(px, py)| self.body.contains(px, py))
    }
}

impl Default for Ship {
    fn default() -> Ship {
        Ship::new()
    }
}

// ── Alien ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Alien {
    pub body: Body,
    /// Sprite tier (0 = top rows), cycling every two grid rows.
    pub tier: usize,
    /// Points awarded when this alien is destroyed.
    pub score: u32,
}

impl Alien {
    pub fn new(x: f32, y: f32, tier: usize) -> Alien {
        Alien {
            body: Body::new(x, y, ALIEN_WIDTH, ALIEN_HEIGHT),
            tier,
            score: ALIEN_SCORES[tier % ALIEN_SCORES.len()],
        }
    }

    /// True if a player bolt touches this alien.  Alien bolts never hit it.
    pub fn collides(&self, bolt: &Bolt) -> bool {
        bolt.owner == BoltOwner::Player
            && bolt.corners().iter().any(|&(px, py)| self.body.contains(px, py))
    }

    pub fn shift(&mut self, dx: f32, dy: f32) {
        self.body.x += dx;
        self.body.y += dy;
    }
}

// ── Bolts ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BoltOwner {
    Player,
    Alien,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bolt {
    pub body: Body,
    /// Signed vertical speed: positive travels up, negative travels down.
    pub velocity: f32,
    pub owner: BoltOwner,
}

impl Bolt {
    /// A bolt fired upward by the player from `(x, y)`.
    pub fn from_player(x: f32, y: f32) -> Bolt {
        Bolt {
            body: Body::new(x, y, BOLT_WIDTH, BOLT_HEIGHT),
            velocity: BOLT_SPEED,
            owner: BoltOwner::Player,
        }
    }

    /// A bolt fired downward by an alien from `(x, y)`.
    pub fn from_alien(x: f32, y: f32) -> Bolt {
        Bolt {
            body: Body::new(x, y, BOLT_WIDTH, BOLT_HEIGHT),
            velocity: -BOLT_SPEED,
            owner: BoltOwner::Alien,
        }
    }

    pub fn is_player_bolt(&self) -> bool {
        self.owner == BoltOwner::Player
    }

    /// Advance one frame along y.
    pub fn advance(&mut self) {
        self.body.y += self.velocity;
    }

    /// The four corner points used by the containment hit test.
    pub fn corners(&self) -> [(f32, f32); 4] {
        let hw = self.body.width / 2.0;
        let hh = self.body.height / 2.0;
        [
            (self.body.x - hw, self.body.y + hh),
            (self.body.x + hw, self.body.y + hh),
            (self.body.x - hw, self.body.y - hh),
            (self.body.x + hw, self.body.y - hh),
        ]
    }
}

// ── Defense line ──────────────────────────────────────────────────────────────

/// The horizontal line above the ship that the aliens must not cross.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DefenseLine {
    pub y: f32,
}

impl DefenseLine {
    pub fn new() -> DefenseLine {
        DefenseLine { y: DEFENSE_LINE }
    }
}

impl Default for DefenseLine {
    fn default() -> DefenseLine {
        DefenseLine::new()
    }
}
