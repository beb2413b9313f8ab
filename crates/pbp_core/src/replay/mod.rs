//! Replay driver
//!
//! Runs a whole feed through the rules engine from a fresh state and keeps
//! what a viewer needs to step through the game afterwards:
//! - one [`Frame`] per event (before/after projection and runs scored)
//! - one [`Snapshot`] per event for seeking
//!
//! The engine never reports run deltas. They are recovered here by diffing
//! the line-score slot of the side that was batting when the event started.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::engine::RulesEngine;
use crate::models::PlayEvent;
use crate::state::{Bases, Count, GameState, Half, Linescore, Projection, Side};

/// One replayed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Frame {
    /// 0-based position in the feed
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<String>,
    /// Canonical event token
    pub code: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
    pub before: Projection,
    pub after: Projection,
    /// Runs credited to the side at bat when the event started
    pub runs: u32,
}

/// Displayed state after a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Snapshot {
    pub inning: u32,
    pub half: Half,
    pub batting: Side,
    pub outs: u8,
    pub bases: Bases,
    pub count: Count,
    pub linescore: Linescore,
}

impl From<&GameState> for Snapshot {
    fn from(state: &GameState) -> Self {
        Self {
            inning: state.inning,
            half: state.half,
            batting: state.batting(),
            outs: state.outs,
            bases: state.bases,
            count: state.count,
            linescore: state.linescore.clone(),
        }
    }
}

/// Game totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Score {
    pub away: u32,
    pub home: u32,
}

impl Score {
    pub fn from_linescore(linescore: &Linescore) -> Self {
        Self {
            away: linescore.total(Side::Away),
            home: linescore.total(Side::Home),
        }
    }

    /// `"away:home"`
    pub fn to_text(&self) -> String {
        format!("{}:{}", self.away, self.home)
    }
}

/// A fully replayed feed
#[derive(Debug, Clone, PartialEq)]
pub struct Replay {
    frames: Vec<Frame>,
    snapshots: Vec<Snapshot>,
    final_state: GameState,
}

impl Replay {
    /// Apply `events` in order to a fresh game.
    pub fn run(engine: &RulesEngine, events: &[PlayEvent]) -> Self {
        let mut state = GameState::new();
        let mut frames = Vec::with_capacity(events.len());
        let mut snapshots = Vec::with_capacity(events.len());

        for (index, event) in events.iter().enumerate() {
            let side = state.batting();
            let inning = state.inning;
            let runs_before = state.linescore.runs_in(side, inning);

            let transition = engine.apply(&mut state, event);

            let runs = state
                .linescore
                .runs_in(side, inning)
                .saturating_sub(runs_before);
            let code = event.code.to_string();
            let description = event
                .event
                .clone()
                .unwrap_or_else(|| format!("Event {}", code));

            frames.push(Frame {
                index,
                ts: event.ts.clone(),
                code,
                description,
                meta: event.meta.clone(),
                before: transition.before,
                after: transition.after,
                runs,
            });
            snapshots.push(Snapshot::from(&state));
        }

        tracing::debug!(
            events = events.len(),
            inning = state.inning,
            half = ?state.half,
            "replay finished"
        );

        Self {
            frames,
            snapshots,
            final_state: state,
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// State after event `index` (0-based)
    pub fn snapshot(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn final_state(&self) -> &GameState {
        &self.final_state
    }

    pub fn score(&self) -> Score {
        Score::from_linescore(&self.final_state.linescore)
    }

    pub fn into_parts(self) -> (Vec<Frame>, Vec<Snapshot>, GameState) {
        (self.frames, self.snapshots, self.final_state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventCode;
    use insta::assert_json_snapshot;

    fn ev(code: EventCode) -> PlayEvent {
        PlayEvent::new(code)
    }

    #[test]
    fn test_empty_feed() {
        let replay = Replay::run(&RulesEngine::new(), &[]);
        assert!(replay.is_empty());
        assert_eq!(replay.final_state(), &GameState::new());
        assert_eq!(replay.score().to_text(), "0:0");
        assert!(replay.snapshot(0).is_none());
    }

    #[test]
    fn test_frame_shape() {
        let replay = Replay::run(&RulesEngine::new(), &[ev(EventCode::HomeRun)]);
        assert_json_snapshot!(replay.frames()[0], @r###"
        {
          "index": 0,
          "code": "HR",
          "description": "Event HR",
          "before": {
            "bases": "---",
            "outs": 0
          },
          "after": {
            "bases": "---",
            "outs": 0
          },
          "runs": 1
        }
        "###);
    }

    #[test]
    fn test_description_and_passthrough() {
        let mut event = ev(EventCode::Walk).with_description("Four-pitch walk");
        event.ts = Some("2025-09-12T18:35:00+08:00".to_string());
        event.meta = Some(serde_json::json!({"pitcher": 41}));

        let replay = Replay::run(&RulesEngine::new(), &[event]);
        let frame = &replay.frames()[0];
        assert_eq!(frame.description, "Four-pitch walk");
        assert_eq!(frame.ts.as_deref(), Some("2025-09-12T18:35:00+08:00"));
        assert_eq!(frame.meta.as_ref().map(|m| m["pitcher"].clone()), Some(41.into()));
        assert_eq!(frame.after.bases, "1--");
    }

    #[test]
    fn test_run_delta_follows_batting_side() {
        let events = vec![
            ev(EventCode::Triple),
            ev(EventCode::Groundout).with_advance("third", "home"),
            ev(EventCode::Strikeout),
            ev(EventCode::Strikeout),
            ev(EventCode::HomeRun),
            ev(EventCode::Single),
        ];

        let replay = Replay::run(&RulesEngine::new(), &events);
        let runs: Vec<u32> = replay.frames().iter().map(|f| f.runs).collect();
        assert_eq!(runs, vec![0, 1, 0, 0, 1, 0]);

        // The home run belongs to the home side in the bottom of the first.
        assert_eq!(replay.score(), Score { away: 1, home: 1 });
        assert_eq!(replay.score().to_text(), "1:1");
    }

    #[test]
    fn test_deltas_sum_to_totals() {
        let events = vec![
            ev(EventCode::Walk),
            ev(EventCode::Walk),
            ev(EventCode::Walk),
            ev(EventCode::Walk),
            ev(EventCode::Double),
            ev(EventCode::WildPitch),
            ev(EventCode::DoublePlay),
            ev(EventCode::HomeRun),
            ev(EventCode::Flyout),
        ];
        let replay = Replay::run(&RulesEngine::new(), &events);
        let total: u32 = replay.frames().iter().map(|f| f.runs).sum();
        let score = replay.score();
        assert_eq!(total, score.away + score.home);
        assert_eq!(score.away, 5);
    }

    #[test]
    fn test_snapshots_seek() {
        let events = vec![ev(EventCode::Single), ev(EventCode::StealSecond), ev(EventCode::Strikeout)];
        let replay = Replay::run(&RulesEngine::new(), &events);
        assert_eq!(replay.len(), 3);

        let after_steal = replay.snapshot(1).unwrap();
        assert_eq!(after_steal.bases, Bases { on1: false, on2: true, on3: false });
        assert_eq!(after_steal.outs, 0);
        assert_eq!(after_steal.batting, Side::Away);

        let last = replay.snapshot(2).unwrap();
        assert_eq!(last.outs, 1);
        assert!(replay.snapshot(3).is_none());
        assert_eq!(replay.final_state().outs, 1);
    }
}
