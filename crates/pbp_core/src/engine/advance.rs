//! Runner movement primitives
//!
//! Everything that moves a runner goes through [`advance_one`], so runs and
//! outs are counted in exactly one place. On top of it sit the force chain
//! (walks, sacrifices, fielder's choice) and the directive resolver shared by
//! most policies in the rules table.
//!
//! ## Resolution order (fixed)
//! Runners are visited lead runner first: third, second, first. A trailing
//! runner therefore never moves against a stale position of the runner ahead
//! of it.

use crate::models::{Destination, Directive};
use crate::state::{Base, Bases, GameState};

/// What `from == to` means while resolving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationaryMode {
    /// The runner stays put; no default movement applies to it.
    Hold,
    /// Put a runner on the base regardless of occupancy (tie-break runner).
    Place,
}

/// Outcome of a resolver pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Source bases that were driven by a directive, lead runner first
    pub handled: Vec<Base>,
    /// The third out was recorded; remaining directives were discarded
    pub half_ended: bool,
}

impl Resolution {
    pub fn handled(&self, base: Base) -> bool {
        self.handled.contains(&base)
    }
}

/// Move, score or retire the runner on `from`.
///
/// No-op when `from` is empty. Returns `true` if the move recorded the third
/// out and closed the half-inning.
pub fn advance_one(state: &mut GameState, from: Base, to: Destination) -> bool {
    if !state.bases.is_occupied(from) {
        return false;
    }
    state.bases.set(from, false);
    tracing::trace!(?from, ?to, "runner moved");
    match to {
        Destination::Out => state.record_out(1),
        Destination::Home => {
            state.score_run(1);
            false
        }
        Destination::Base(base) => {
            state.bases.set(base, true);
            false
        }
    }
}

/// Destination `n` bases ahead of `base`; home once the count runs past third.
pub fn bases_ahead(base: Base, n: u8) -> Destination {
    match Base::from_number(base.number().saturating_add(n)) {
        Some(next) => Destination::Base(next),
        None => Destination::Home,
    }
}

/// Push forced runners one base ahead of a batter bound for first.
///
/// Only runners with no empty base behind them move. First is left empty for
/// the caller to fill (or not). Returns runs forced in.
pub fn force_advance_chain(bases: &mut Bases) -> u32 {
    if !bases.on1 {
        return 0;
    }
    let mut runs = 0;
    if bases.on2 {
        if bases.on3 {
            runs = 1;
        }
        bases.on3 = true;
    }
    bases.on2 = true;
    bases.on1 = false;
    runs
}

/// Keep the first directive per source base, in feed order.
fn first_per_source(directives: &[Directive]) -> Vec<Directive> {
    let mut chosen: Vec<Directive> = Vec::with_capacity(3);
    for directive in directives {
        if chosen.iter().any(|d| d.from == directive.from) {
            tracing::debug!(?directive, "second directive for the same runner ignored");
            continue;
        }
        chosen.push(*directive);
    }
    chosen
}

/// Apply directives, lead runner first, with no default movement.
pub fn resolve_directives(
    state: &mut GameState,
    directives: &[Directive],
    mode: StationaryMode,
) -> Resolution {
    resolve_directives_with(state, directives, mode, |_| None)
}

/// Apply directives, lead runner first, falling back to `default` for every
/// base no directive names.
///
/// Stops as soon as the third out is recorded.
pub fn resolve_directives_with<F>(
    state: &mut GameState,
    directives: &[Directive],
    mode: StationaryMode,
    mut default: F,
) -> Resolution
where
    F: FnMut(Base) -> Option<Destination>,
{
    let chosen = first_per_source(directives);
    let mut resolution = Resolution::default();

    for base in Base::LEAD_FIRST {
        let ended = match chosen.iter().find(|d| d.from == base) {
            Some(directive) => {
                resolution.handled.push(base);
                if directive.is_stationary() {
                    if mode == StationaryMode::Place {
                        state.bases.set(base, true);
                    }
                    false
                } else {
                    advance_one(state, base, directive.to)
                }
            }
            None => match default(base) {
                Some(to) => advance_one(state, base, to),
                None => false,
            },
        };

        if ended {
            resolution.half_ended = true;
            break;
        }
    }

    resolution
}
