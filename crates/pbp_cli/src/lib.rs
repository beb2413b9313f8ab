//! pbp CLI library
//!
//! File handling around `pbp_core`: feed and config loading, replay output,
//! step lookup and schema export.

use anyhow::{bail, Context, Result};
use pbp_core::{replay_feed, EngineConfig, GroundoutPolicy, PlayEvent, ReplayResponse, Snapshot};
use std::fs;
use std::path::Path;

/// Read a feed document from disk.
pub fn read_feed(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read feed file: {}", path.display()))
}

/// Load engine settings from an optional file, then apply the CLI override.
///
/// `.yaml`/`.yml` files are read as YAML, anything else as JSON.
pub fn load_config(path: Option<&Path>, groundout: Option<GroundoutPolicy>) -> Result<EngineConfig> {
    let mut config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let is_yaml = matches!(
                path.extension().and_then(|ext| ext.to_str()),
                Some("yaml") | Some("yml")
            );
            let parsed = if is_yaml {
                EngineConfig::from_yaml_str(&text)
            } else {
                EngineConfig::from_json_str(&text)
            };
            parsed.with_context(|| format!("Invalid config file: {}", path.display()))?
        }
        None => EngineConfig::default(),
    };

    if let Some(policy) = groundout {
        config.groundout = policy;
    }
    tracing::debug!(?config, "engine config loaded");
    Ok(config)
}

/// Replay a feed file into a response document.
pub fn replay_file(input: &Path, config: &EngineConfig) -> Result<ReplayResponse> {
    let text = read_feed(input)?;
    replay_feed(&text, config).with_context(|| format!("Failed to replay feed: {}", input.display()))
}

/// Render a response as JSON, pretty unless `compact`.
pub fn render_response(response: &ReplayResponse, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(response)
    } else {
        serde_json::to_string_pretty(response)
    };
    json.context("Failed to serialize replay response")
}

/// One-line summary for stderr.
pub fn summary_line(response: &ReplayResponse) -> String {
    format!(
        "{}: {} events, score {} (digest {})",
        response.game_id.as_deref().unwrap_or("feed"),
        response.frames.len(),
        response.score.to_text(),
        response.digest
    )
}

/// Snapshot after 1-based `step`.
pub fn snapshot_at(response: &ReplayResponse, step: usize) -> Result<Snapshot> {
    let total = response.snapshots.len();
    if step == 0 || step > total {
        bail!("Step {} out of range (feed has {} events)", step, total);
    }
    Ok(response.snapshots[step - 1].clone())
}

/// JSON schema of a single play event.
pub fn event_schema() -> Result<String> {
    let schema = schemars::schema_for!(PlayEvent);
    serde_json::to_string_pretty(&schema).context("Failed to serialize event schema")
}

/// Write `text` to `path`, or stdout when `path` is `None`.
pub fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, text)
            .with_context(|| format!("Failed to write output file: {}", path.display())),
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    const FEED: &str = r#"[
        {"code": "BB"},
        {"code": "2B", "runner_advances": [{"from": "first", "to": "home"}]},
        {"code": "GO"}
    ]"#;

    fn temp_with(suffix: &str, text: &str) -> Result<NamedTempFile> {
        let mut file = Builder::new().suffix(suffix).tempfile()?;
        file.write_all(text.as_bytes())?;
        Ok(file)
    }

    #[test]
    fn test_replay_file() -> Result<()> {
        let feed = temp_with(".json", FEED)?;
        let response = replay_file(feed.path(), &EngineConfig::default())?;

        assert_eq!(response.frames.len(), 3);
        assert_eq!(response.score.to_text(), "1:0");
        assert!(summary_line(&response).starts_with("feed: 3 events, score 1:0"));
        Ok(())
    }

    #[test]
    fn test_missing_feed_file() {
        let err = read_feed(Path::new("/nonexistent/feed.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read feed file"));
    }

    #[test]
    fn test_load_config_yaml_and_json() -> Result<()> {
        let yaml = temp_with(".yml", "groundout: force_advance\n")?;
        let config = load_config(Some(yaml.path()), None)?;
        assert_eq!(config.groundout, GroundoutPolicy::ForceAdvance);

        let json = temp_with(".json", r#"{"groundout": "directives"}"#)?;
        let config = load_config(Some(json.path()), None)?;
        assert_eq!(config.groundout, GroundoutPolicy::Directives);
        Ok(())
    }

    #[test]
    fn test_groundout_override_wins() -> Result<()> {
        let yaml = temp_with(".yaml", "groundout: directives\n")?;
        let config = load_config(Some(yaml.path()), Some(GroundoutPolicy::ForceAdvance))?;
        assert_eq!(config.groundout, GroundoutPolicy::ForceAdvance);

        let config = load_config(None, None)?;
        assert_eq!(config, EngineConfig::default());
        Ok(())
    }

    #[test]
    fn test_bad_config_has_context() -> Result<()> {
        let json = temp_with(".json", r#"{"groundout": 3}"#)?;
        let err = load_config(Some(json.path()), None).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
        Ok(())
    }

    #[test]
    fn test_snapshot_at_is_one_based() -> Result<()> {
        let feed = temp_with(".json", FEED)?;
        let response = replay_file(feed.path(), &EngineConfig::default())?;

        let first = snapshot_at(&response, 1)?;
        assert!(first.bases.on1);
        let last = snapshot_at(&response, 3)?;
        assert_eq!(last.outs, 1);

        assert!(snapshot_at(&response, 0).is_err());
        assert!(snapshot_at(&response, 4).is_err());
        Ok(())
    }

    #[test]
    fn test_write_output_and_compact() -> Result<()> {
        let feed = temp_with(".json", FEED)?;
        let response = replay_file(feed.path(), &EngineConfig::default())?;

        let compact = render_response(&response, true)?;
        assert!(!compact.contains('\n'));
        let pretty = render_response(&response, false)?;
        assert!(pretty.contains('\n'));

        let out = NamedTempFile::new()?;
        write_output(Some(out.path()), &compact)?;
        let written = fs::read_to_string(out.path())?;
        let parsed: ReplayResponse = serde_json::from_str(&written)?;
        assert_eq!(parsed, response);
        Ok(())
    }

    #[test]
    fn test_event_schema() -> Result<()> {
        let schema = event_schema()?;
        let value: serde_json::Value = serde_json::from_str(&schema)?;
        assert_eq!(value["title"], "PlayEvent");
        assert!(value["properties"]["code"].is_object());
        assert!(value["properties"]["runner_advances"].is_object());
        Ok(())
    }
}
