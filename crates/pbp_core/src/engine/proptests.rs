//! Property-based tests over random event sequences

use proptest::prelude::*;

use super::{EngineConfig, RulesEngine};
use crate::models::{BaseToken, EventCode, PlayEvent, RunnerAdvance};
use crate::state::{GameState, Side, MAX_BALLS, MAX_STRIKES};

const TOKENS: [&str; 35] = [
    "B", "S", "F", "1B", "2B", "3B", "HR", "BB", "IBB", "HBP", "K", "GO", "FO", "IF", "SF", "SAC",
    "FC", "E", "DP", "TP", "SB2", "SB3", "SBH", "CS2", "CS3", "CSH", "PO1", "PO2", "PO3", "WP",
    "PB", "BK", "OTHER", "END", "XYZ",
];

fn code_strategy() -> impl Strategy<Value = EventCode> {
    prop::sample::select(TOKENS.to_vec()).prop_map(EventCode::parse)
}

fn token_strategy() -> impl Strategy<Value = BaseToken> {
    prop_oneof![
        prop::sample::select(vec!["first", "second", "third", "home", "out", "H", "batter"])
            .prop_map(BaseToken::from),
        (0i64..=5).prop_map(BaseToken::Number),
    ]
}

fn advance_strategy() -> impl Strategy<Value = RunnerAdvance> {
    (prop::option::of(token_strategy()), prop::option::of(token_strategy()))
        .prop_map(|(from, to)| RunnerAdvance { from, to })
}

fn event_strategy() -> impl Strategy<Value = PlayEvent> {
    (code_strategy(), prop::collection::vec(advance_strategy(), 0..=3)).prop_map(
        |(code, runner_advances)| PlayEvent {
            runner_advances,
            ..PlayEvent::new(code)
        },
    )
}

fn config_strategy() -> impl Strategy<Value = EngineConfig> {
    prop_oneof![Just(EngineConfig::directive_feed()), Just(EngineConfig::legacy_feed())]
}

fn total_runs(state: &GameState) -> u32 {
    state.runs(Side::Away) + state.runs(Side::Home)
}

proptest! {
    /// Property: outs and count stay in range after every event
    #[test]
    fn prop_counters_in_range(
        config in config_strategy(),
        events in prop::collection::vec(event_strategy(), 0..80)
    ) {
        let engine = RulesEngine::with_config(config);
        let mut state = GameState::new();
        for event in &events {
            engine.apply(&mut state, event);
            prop_assert!(state.outs <= 2);
            prop_assert!(state.count.balls < MAX_BALLS);
            prop_assert!(state.count.strikes < MAX_STRIKES);
            prop_assert!(state.inning >= 1);
        }
    }

    /// Property: runs never decrease and the line score never shrinks
    #[test]
    fn prop_linescore_monotonic(
        config in config_strategy(),
        events in prop::collection::vec(event_strategy(), 0..80)
    ) {
        let engine = RulesEngine::with_config(config);
        let mut state = GameState::new();
        for event in &events {
            let runs = total_runs(&state);
            let slots = (state.linescore.away.len(), state.linescore.home.len());
            engine.apply(&mut state, event);
            prop_assert!(total_runs(&state) >= runs);
            prop_assert!(state.linescore.away.len() >= slots.0);
            prop_assert!(state.linescore.home.len() >= slots.1);
        }
    }

    /// Property: a known event leaves the batting side a slot for its inning
    #[test]
    fn prop_known_event_has_inning_slot(
        events in prop::collection::vec(event_strategy(), 1..60)
    ) {
        let engine = RulesEngine::new();
        let mut state = GameState::new();
        for event in &events {
            let inning = state.inning as usize;
            let side = state.batting();
            engine.apply(&mut state, event);
            if event.code.is_known() {
                prop_assert!(state.linescore.side(side).len() >= inning);
            }
        }
    }

    /// Property: unknown codes change nothing, whatever their directives
    #[test]
    fn prop_unknown_code_is_noop(
        prefix in prop::collection::vec(event_strategy(), 0..40),
        advances in prop::collection::vec(advance_strategy(), 0..=3)
    ) {
        let engine = RulesEngine::new();
        let mut state = GameState::new();
        for event in &prefix {
            engine.apply(&mut state, event);
        }
        let before = state.clone();
        let unknown = PlayEvent {
            runner_advances: advances,
            ..PlayEvent::new(EventCode::parse("NOPE"))
        };
        engine.apply(&mut state, &unknown);
        prop_assert_eq!(state, before);
    }

    /// Property: replaying the same events gives the same state
    #[test]
    fn prop_deterministic(
        config in config_strategy(),
        events in prop::collection::vec(event_strategy(), 0..80)
    ) {
        let engine = RulesEngine::with_config(config);
        let mut a = GameState::new();
        let mut b = GameState::new();
        for event in &events {
            let ta = engine.apply(&mut a, event);
            let tb = engine.apply(&mut b, event);
            prop_assert_eq!(ta, tb);
        }
        prop_assert_eq!(a, b);
    }
}
