pub mod json_api;

pub use json_api::{replay_feed, replay_feed_json, ReplayResponse, SCHEMA_VERSION};
