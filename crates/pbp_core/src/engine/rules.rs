//! Rules Engine - one policy per event category
//!
//! ## Key Design Principles
//! 1. **Deterministic** - the same feed always yields the same state
//! 2. **Infallible** - unknown codes and malformed directives never fail
//! 3. **Stateless engine** - `RulesEngine` only holds its configuration; the
//!    caller owns the `GameState` and any snapshots of it
//!
//! ## Policy order inside an event
//! Pitches (`B`) resolve directives before the walk check. Outs charged to
//! the batter (`S` at strike three, `K`, `GO`, `FO`) are recorded before
//! runner directives, so a third out on the batter discards runner movement.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::advance::{
    advance_one, bases_ahead, force_advance_chain, resolve_directives, resolve_directives_with,
    StationaryMode,
};
use super::config::{EngineConfig, GroundoutPolicy};
use crate::models::{Destination, Directive, EventCode, PlayEvent};
use crate::state::{Base, GameState, Projection, MAX_BALLS, MAX_STRIKES};

/// Before/after view of one applied event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Transition {
    pub before: Projection,
    pub after: Projection,
    /// This event closed a half-inning
    pub half_ended: bool,
}

/// Baseball rules table
#[derive(Debug, Clone, Default)]
pub struct RulesEngine {
    config: EngineConfig,
}

impl RulesEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Apply one play event to `state` in place.
    pub fn apply(&self, state: &mut GameState, event: &PlayEvent) -> Transition {
        let before = state.projection();
        let half_before = (state.inning, state.half);

        if event.code.is_known() {
            state.ensure_inning_slot();
        }
        let directives = event.directives();

        match &event.code {
            EventCode::Ball => ball(state, &directives),
            EventCode::Strike => strike(state, &directives),
            EventCode::Foul => foul(state, &directives),

            EventCode::Single | EventCode::Double | EventCode::Triple | EventCode::HomeRun => {
                let value = event.code.hit_value().unwrap_or(1);
                hit(state, &directives, value);
            }

            EventCode::Walk | EventCode::IntentionalWalk | EventCode::HitByPitch => {
                award_first_base(state);
            }

            EventCode::Strikeout => batter_out_then(state, &directives),
            EventCode::Groundout => self.groundout(state, &directives),
            EventCode::Flyout => batter_out_then(state, &directives),
            EventCode::InfieldFly => {
                state.reset_count();
                state.record_out(1);
            }
            EventCode::SacrificeFly => sacrifice_fly(state),
            EventCode::SacrificeBunt => sacrifice_bunt(state),
            EventCode::FieldersChoice | EventCode::Error => fielders_choice(state, &directives),
            EventCode::DoublePlay => multi_out_play(state, &directives, 2),
            EventCode::TriplePlay => multi_out_play(state, &directives, 3),

            EventCode::StealSecond => {
                advance_one(state, Base::First, Destination::Base(Base::Second));
            }
            EventCode::StealThird => {
                advance_one(state, Base::Second, Destination::Base(Base::Third));
            }
            EventCode::StealHome => {
                advance_one(state, Base::Third, Destination::Home);
            }
            EventCode::CaughtStealingSecond => {
                advance_one(state, Base::First, Destination::Out);
            }
            EventCode::CaughtStealingThird => {
                advance_one(state, Base::Second, Destination::Out);
            }
            EventCode::CaughtStealingHome => {
                advance_one(state, Base::Third, Destination::Out);
            }
            EventCode::PickoffFirst => {
                advance_one(state, Base::First, Destination::Out);
            }
            EventCode::PickoffSecond => {
                advance_one(state, Base::Second, Destination::Out);
            }
            EventCode::PickoffThird => {
                advance_one(state, Base::Third, Destination::Out);
            }
            EventCode::WildPitch | EventCode::PassedBall | EventCode::Balk => {
                runners_move_up(state);
            }

            EventCode::Other => {
                resolve_directives(state, &directives, StationaryMode::Place);
            }
            // Slot backfill above is all END does.
            EventCode::End => {}

            EventCode::Unknown(raw) => {
                tracing::warn!(code = %raw, "unrecognized event code ignored");
            }
        }

        let after = state.projection();
        let half_ended = (state.inning, state.half) != half_before;
        tracing::debug!(
            code = %event.code,
            before = %before.bases,
            after = %after.bases,
            outs = after.outs,
            half_ended,
            "event applied"
        );

        Transition {
            before,
            after,
            half_ended,
        }
    }

    fn groundout(&self, state: &mut GameState, directives: &[Directive]) {
        state.reset_count();
        if state.record_out(1) {
            return;
        }
        match self.config.groundout {
            GroundoutPolicy::ForceAdvance if directives.is_empty() => {
                let runs = force_advance_chain(&mut state.bases);
                state.score_run(runs);
            }
            _ => {
                resolve_directives(state, directives, StationaryMode::Hold);
            }
        }
    }
}

/// Apply `event` with the default configuration.
pub fn apply_event(state: &mut GameState, event: &PlayEvent) -> Transition {
    RulesEngine::default().apply(state, event)
}

// ============================================================================
// Pitches
// ============================================================================

fn ball(state: &mut GameState, directives: &[Directive]) {
    state.count.balls = (state.count.balls + 1).min(MAX_BALLS);
    if resolve_directives(state, directives, StationaryMode::Hold).half_ended {
        return;
    }
    if state.count.balls >= MAX_BALLS {
        award_first_base(state);
    }
}

fn strike(state: &mut GameState, directives: &[Directive]) {
    state.count.strikes = (state.count.strikes + 1).min(MAX_STRIKES);
    if state.count.strikes >= MAX_STRIKES {
        state.reset_count();
        if state.record_out(1) {
            return;
        }
    }
    resolve_directives(state, directives, StationaryMode::Hold);
}

fn foul(state: &mut GameState, directives: &[Directive]) {
    if state.count.strikes < MAX_STRIKES - 1 {
        state.count.strikes += 1;
    }
    resolve_directives(state, directives, StationaryMode::Hold);
}

// ============================================================================
// Batted balls and free passes
// ============================================================================

/// Walk, intentional walk, hit-by-pitch, or ball four.
fn award_first_base(state: &mut GameState) {
    let runs = force_advance_chain(&mut state.bases);
    state.score_run(runs);
    state.bases.on1 = true;
    state.reset_count();
}

fn hit(state: &mut GameState, directives: &[Directive], value: u8) {
    state.reset_count();
    let resolution = resolve_directives_with(state, directives, StationaryMode::Hold, |base| {
        Some(bases_ahead(base, value))
    });
    if resolution.half_ended {
        return;
    }

    match Base::from_number(value) {
        Some(target) => {
            if state.bases.is_occupied(target) {
                tracing::warn!(?target, "batter lands on a base a directed runner ended on");
            }
            state.bases.set(target, true);
        }
        None => state.score_run(1),
    }
}

/// Batter out, then runner directives if the half survived.
fn batter_out_then(state: &mut GameState, directives: &[Directive]) {
    state.reset_count();
    if state.record_out(1) {
        return;
    }
    resolve_directives(state, directives, StationaryMode::Hold);
}

fn sacrifice_fly(state: &mut GameState) {
    state.reset_count();
    if !state.record_out(1) && state.bases.on3 {
        state.bases.on3 = false;
        state.score_run(1);
    }
}

fn sacrifice_bunt(state: &mut GameState) {
    state.reset_count();
    if !state.record_out(1) {
        let runs = force_advance_chain(&mut state.bases);
        state.score_run(runs);
    }
}

/// Some directive retires a runner who is actually on base.
fn names_an_out(state: &GameState, directives: &[Directive]) -> bool {
    directives
        .iter()
        .any(|d| d.to == Destination::Out && state.bases.is_occupied(d.from))
}

fn fielders_choice(state: &mut GameState, directives: &[Directive]) {
    state.reset_count();

    // Default victim: the lead runner no directive accounts for.
    if !names_an_out(state, directives) {
        let lead = Base::LEAD_FIRST.into_iter().find(|base| {
            state.bases.is_occupied(*base) && !directives.iter().any(|d| d.from == *base)
        });
        if let Some(lead) = lead {
            state.bases.set(lead, false);
            if state.record_out(1) {
                return;
            }
        }
    }

    if resolve_directives(state, directives, StationaryMode::Hold).half_ended {
        return;
    }

    let runs = force_advance_chain(&mut state.bases);
    state.score_run(runs);
    state.bases.on1 = true;
}

/// Double or triple play: the batter plus `outs - 1` runners, retired at once.
fn multi_out_play(state: &mut GameState, directives: &[Directive], outs: u8) {
    state.reset_count();
    let runners = usize::from(outs - 1);

    let mut retired: Vec<Base> = Vec::with_capacity(runners);
    for directive in directives {
        if directive.to == Destination::Out
            && state.bases.is_occupied(directive.from)
            && !retired.contains(&directive.from)
        {
            retired.push(directive.from);
        }
    }
    retired.truncate(runners);
    for base in Base::LEAD_FIRST {
        if retired.len() >= runners {
            break;
        }
        if state.bases.is_occupied(base)
            && !retired.contains(&base)
            && !directives.iter().any(|d| d.from == base)
        {
            retired.push(base);
        }
    }

    for base in &retired {
        state.bases.set(*base, false);
    }
    if state.record_out(outs) {
        return;
    }

    // Outs are fixed at +2/+3; surplus out directives are ignored.
    let remaining: Vec<Directive> = directives
        .iter()
        .filter(|d| d.to != Destination::Out && !retired.contains(&d.from))
        .copied()
        .collect();
    resolve_directives(state, &remaining, StationaryMode::Hold);
}

// ============================================================================
// Baserunning
// ============================================================================

/// Wild pitch, passed ball, balk: each runner takes the next base if free.
fn runners_move_up(state: &mut GameState) {
    advance_one(state, Base::Third, Destination::Home);
    if !state.bases.on3 {
        advance_one(state, Base::Second, Destination::Base(Base::Third));
    }
    if !state.bases.on2 {
        advance_one(state, Base::First, Destination::Base(Base::Second));
    }
}
