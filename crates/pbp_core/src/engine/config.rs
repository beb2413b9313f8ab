//! # Engine Configuration
//!
//! Feed conventions that change how the rules table reads an event.
//!
//! ## Presets
//! - `directive_feed()` (default): runner movement on a groundout comes only
//!   from directives
//! - `legacy_feed()`: a groundout without directives force-advances runners
//!
//! ```rust
//! use pbp_core::engine::config::{EngineConfig, GroundoutPolicy};
//!
//! let config = EngineConfig::from_yaml_str("groundout: force_advance").unwrap();
//! assert_eq!(config.groundout, GroundoutPolicy::ForceAdvance);
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// How a plain groundout moves the other runners
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum GroundoutPolicy {
    /// Only directives move runners.
    #[default]
    Directives,
    /// With no valid directive, forced runners advance one base.
    ForceAdvance,
}

/// Rules engine settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EngineConfig {
    pub groundout: GroundoutPolicy,
}

impl EngineConfig {
    /// Feeds that spell out every runner movement
    pub fn directive_feed() -> Self {
        Self::default()
    }

    /// Older feeds that rely on implicit force advances on groundouts
    pub fn legacy_feed() -> Self {
        Self {
            groundout: GroundoutPolicy::ForceAdvance,
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| CoreError::Config(e.to_string()))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }
}
