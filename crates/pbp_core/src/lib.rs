//! # pbp_core - Deterministic Baseball Play-by-Play State Engine
//!
//! Applies normalized play-by-play events, one at a time, to a mutable game
//! state (inning, half, outs, bases, count, line score) and replays whole
//! feeds into per-event frames for display.
//!
//! ## Features
//! - 100% deterministic (same feed = same state)
//! - Infallible engine: unknown codes and bad directives are ignored
//! - Explicit runner-advance directives override default movement
//! - JSON API for hosts that only speak text
//!
//! ```rust
//! use pbp_core::{apply_event, EventCode, GameState, PlayEvent};
//!
//! let mut state = GameState::new();
//! state.bases.on3 = true;
//! apply_event(&mut state, &PlayEvent::new(EventCode::Single));
//! assert_eq!(state.linescore.away, vec![1]);
//! assert!(state.bases.on1);
//! ```

pub mod api;
pub mod engine;
pub mod error;
pub mod models;
pub mod replay;
pub mod state;

pub use api::{replay_feed, replay_feed_json, ReplayResponse, SCHEMA_VERSION};
pub use engine::{apply_event, EngineConfig, GroundoutPolicy, RulesEngine, Transition};
pub use error::{CoreError, Result};
pub use models::{
    feed_digest, parse_feed, BaseToken, Destination, Directive, EventCode, FeedStatus, GameFeed,
    PlayEvent, RunnerAdvance,
};
pub use replay::{Frame, Replay, Score, Snapshot};
pub use state::{Base, Bases, Count, GameState, Half, Linescore, Projection, Side};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
