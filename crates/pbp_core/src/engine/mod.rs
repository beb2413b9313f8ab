//! Transition engine
//!
//! - `advance`: single-runner primitive, force chain, directive resolver
//! - `rules`: the per-category policy table (`RulesEngine`)
//! - `config`: feed conventions (`EngineConfig`)

pub mod advance;
pub mod config;
pub mod rules;

#[cfg(test)]
mod proptests;

pub use advance::{
    advance_one, force_advance_chain, resolve_directives, resolve_directives_with, Resolution,
    StationaryMode,
};
pub use config::{EngineConfig, GroundoutPolicy};
pub use rules::{apply_event, RulesEngine, Transition};
