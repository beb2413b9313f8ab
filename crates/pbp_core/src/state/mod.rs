//! Game State
//!
//! The single mutable record the rules engine threads through a replay, plus
//! the bookkeeping helpers every policy relies on:
//! - run accumulation into the line score (`score_run`)
//! - out accounting with the three-out trigger (`record_out`)
//! - count reset and inning-slot backfill (idempotent)
//! - the half-inning transition itself (`end_half_inning`)
//!
//! ## Invariants
//! - the batting side is derived from `half`, never stored
//! - `outs` is observed in `0..=2`; reaching 3 flips the half in the same call
//! - the line score only grows

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Ball count that ends an at-bat with a walk.
pub const MAX_BALLS: u8 = 4;
/// Strike count that ends an at-bat with a strikeout.
pub const MAX_STRIKES: u8 = 3;
/// Outs that end a half-inning.
pub const OUTS_PER_HALF: u8 = 3;

// ============================================================================
// Sides and bases
// ============================================================================

/// Half of an inning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Half {
    Top,
    Bottom,
}

impl Half {
    /// Side at bat during this half
    pub fn batting(self) -> Side {
        match self {
            Half::Top => Side::Away,
            Half::Bottom => Side::Home,
        }
    }
}

/// Team side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Away,
    Home,
}

/// A base a runner can occupy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Base {
    First,
    Second,
    Third,
}

impl Base {
    /// Bases ordered lead runner first.
    pub const LEAD_FIRST: [Base; 3] = [Base::Third, Base::Second, Base::First];

    /// 1-based base number
    pub fn number(self) -> u8 {
        match self {
            Base::First => 1,
            Base::Second => 2,
            Base::Third => 3,
        }
    }

    /// Base for a 1-based number; `None` for home plate or anything else
    pub fn from_number(n: u8) -> Option<Base> {
        match n {
            1 => Some(Base::First),
            2 => Some(Base::Second),
            3 => Some(Base::Third),
            _ => None,
        }
    }
}

/// Base occupancy. Only presence is tracked, never runner identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Bases {
    pub on1: bool,
    pub on2: bool,
    pub on3: bool,
}

impl Bases {
    pub fn loaded() -> Self {
        Self { on1: true, on2: true, on3: true }
    }

    pub fn is_occupied(&self, base: Base) -> bool {
        match base {
            Base::First => self.on1,
            Base::Second => self.on2,
            Base::Third => self.on3,
        }
    }

    pub fn set(&mut self, base: Base, occupied: bool) {
        match base {
            Base::First => self.on1 = occupied,
            Base::Second => self.on2 = occupied,
            Base::Third => self.on3 = occupied,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        !(self.on1 || self.on2 || self.on3)
    }

    /// Number of runners on base
    pub fn runners(&self) -> u32 {
        u32::from(self.on1) + u32::from(self.on2) + u32::from(self.on3)
    }

    /// Highest occupied base, i.e. the lead runner
    pub fn lead_runner(&self) -> Option<Base> {
        Base::LEAD_FIRST.into_iter().find(|b| self.is_occupied(*b))
    }

    /// Display form: `1`/`2`/`3` for occupied bases, `-` for empty ones.
    pub fn to_display(&self) -> String {
        let mut s = String::with_capacity(3);
        s.push(if self.on1 { '1' } else { '-' });
        s.push(if self.on2 { '2' } else { '-' });
        s.push(if self.on3 { '3' } else { '-' });
        s
    }
}

/// Ball-strike count
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Count {
    pub balls: u8,
    pub strikes: u8,
}

/// Per-inning run totals for both sides. Index `i` holds inning `i + 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Linescore {
    pub away: Vec<u32>,
    pub home: Vec<u32>,
}

impl Linescore {
    pub fn side(&self, side: Side) -> &[u32] {
        match side {
            Side::Away => &self.away,
            Side::Home => &self.home,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut Vec<u32> {
        match side {
            Side::Away => &mut self.away,
            Side::Home => &mut self.home,
        }
    }

    /// Total runs for a side
    pub fn total(&self, side: Side) -> u32 {
        self.side(side).iter().sum()
    }

    /// Runs for a side in a 1-based inning; unplayed innings read as 0.
    pub fn runs_in(&self, side: Side, inning: u32) -> u32 {
        inning
            .checked_sub(1)
            .and_then(|idx| self.side(side).get(idx as usize))
            .copied()
            .unwrap_or(0)
    }
}

/// `{bases, outs}` pair captured around a transition for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Projection {
    pub bases: String,
    pub outs: u8,
}

// ============================================================================
// GameState
// ============================================================================

/// Evolving game state, mutated in place once per play event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GameState {
    pub inning: u32,
    pub half: Half,
    pub outs: u8,
    pub bases: Bases,
    pub linescore: Linescore,
    pub count: Count,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Inning 1, top half, no outs, bases empty, 0-0 count.
    pub fn new() -> Self {
        Self {
            inning: 1,
            half: Half::Top,
            outs: 0,
            bases: Bases::default(),
            linescore: Linescore::default(),
            count: Count::default(),
        }
    }

    /// Side currently at bat
    pub fn batting(&self) -> Side {
        self.half.batting()
    }

    /// Total runs for a side
    pub fn runs(&self, side: Side) -> u32 {
        self.linescore.total(side)
    }

    pub fn projection(&self) -> Projection {
        Projection {
            bases: self.bases.to_display(),
            outs: self.outs,
        }
    }

    /// Make sure the batting side has a slot for the current inning,
    /// backfilling skipped innings with zero.
    pub fn ensure_inning_slot(&mut self) {
        let inning = self.inning as usize;
        let side = self.batting();
        let slots = self.linescore.side_mut(side);
        if slots.len() < inning {
            slots.resize(inning, 0);
        }
    }

    /// Credit `n` runs to the batting side in the current inning.
    pub fn score_run(&mut self, n: u32) {
        if n == 0 {
            return;
        }
        self.ensure_inning_slot();
        let side = self.batting();
        let slot = (self.inning as usize)
            .checked_sub(1)
            .and_then(|idx| self.linescore.side_mut(side).get_mut(idx));
        match slot {
            Some(slot) => *slot += n,
            None => {
                tracing::warn!(inning = self.inning, n, "no inning slot for runs; dropped");
                return;
            }
        }
        tracing::trace!(?side, inning = self.inning, n, "runs scored");
    }

    pub fn reset_count(&mut self) {
        self.count = Count::default();
    }

    /// Add `n` outs. Returns `true` when this closed the half-inning, in which
    /// case outs, bases and count have already been reset.
    pub fn record_out(&mut self, n: u8) -> bool {
        self.outs = self.outs.saturating_add(n);
        if self.outs >= OUTS_PER_HALF {
            self.end_half_inning();
            return true;
        }
        false
    }

    /// Close the current half-inning and hand the bat to the other side.
    pub fn end_half_inning(&mut self) {
        self.ensure_inning_slot();
        self.outs = 0;
        self.bases.clear();
        self.reset_count();
        match self.half {
            Half::Top => self.half = Half::Bottom,
            Half::Bottom => {
                self.half = Half::Top;
                self.inning += 1;
            }
        }
        tracing::debug!(inning = self.inning, half = ?self.half, "half-inning changed");
    }
}
