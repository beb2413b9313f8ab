//! JSON API
//!
//! Feed text in, replay document out. This is the surface the CLI (and any
//! other host) talks to.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::engine::{EngineConfig, RulesEngine};
use crate::error::{CoreError, Result};
use crate::models::{feed_digest, parse_feed, FeedStatus};
use crate::replay::{Frame, Replay, Score, Snapshot};
use crate::state::GameState;

/// Version of the [`ReplayResponse`] layout.
pub const SCHEMA_VERSION: u8 = 1;

/// Full replay of one feed document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReplayResponse {
    pub schema_version: u8,
    /// Short digest of the raw feed text
    pub digest: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<FeedStatus>,
    pub frames: Vec<Frame>,
    pub snapshots: Vec<Snapshot>,
    pub final_state: GameState,
    pub score: Score,
}

/// Parse and replay a feed document.
pub fn replay_feed(input: &str, config: &EngineConfig) -> Result<ReplayResponse> {
    let feed = parse_feed(input)?;
    let digest = feed_digest(input);
    let engine = RulesEngine::with_config(config.clone());

    let replay = Replay::run(&engine, &feed.events);
    let score = replay.score();
    let (frames, snapshots, final_state) = replay.into_parts();

    tracing::info!(
        game_id = feed.game_id.as_deref().unwrap_or("-"),
        %digest,
        events = frames.len(),
        score = %score.to_text(),
        "feed replayed"
    );

    Ok(ReplayResponse {
        schema_version: SCHEMA_VERSION,
        digest,
        game_id: feed.game_id,
        status: feed.status,
        frames,
        snapshots,
        final_state,
        score,
    })
}

/// [`replay_feed`], serialized to JSON.
pub fn replay_feed_json(input: &str, config: &EngineConfig) -> Result<String> {
    let response = replay_feed(input, config)?;
    serde_json::to_string(&response).map_err(CoreError::Serialization)
}
