//! Play events and runner-advance directives
//!
//! Event codes arrive as short string tokens from the upstream pipeline
//! (`"1B"`, `"GO"`, `"SB2"`, ...). The catalogue is modeled as a closed enum
//! with an [`EventCode::Unknown`] arm so that new codes deserialize cleanly
//! and fall through the engine as no-ops.

use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::state::Base;

// ============================================================================
// Event codes
// ============================================================================

/// Event code catalogue
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventCode {
    // Pitches
    Ball,
    Strike,
    Foul,

    // Hits
    Single,
    Double,
    Triple,
    HomeRun,

    // Free passes
    Walk,
    IntentionalWalk,
    HitByPitch,

    // Outs in play
    Strikeout,
    Groundout,
    Flyout,
    InfieldFly,
    SacrificeFly,
    SacrificeBunt,
    FieldersChoice,
    Error,
    DoublePlay,
    TriplePlay,

    // Baserunning
    StealSecond,
    StealThird,
    StealHome,
    CaughtStealingSecond,
    CaughtStealingThird,
    CaughtStealingHome,
    PickoffFirst,
    PickoffSecond,
    PickoffThird,
    WildPitch,
    PassedBall,
    Balk,

    // Control
    Other,
    End,

    /// Any code outside the catalogue, kept verbatim.
    Unknown(String),
}

impl EventCode {
    /// Canonical wire token
    pub fn as_str(&self) -> &str {
        match self {
            EventCode::Ball => "B",
            EventCode::Strike => "S",
            EventCode::Foul => "F",
            EventCode::Single => "1B",
            EventCode::Double => "2B",
            EventCode::Triple => "3B",
            EventCode::HomeRun => "HR",
            EventCode::Walk => "BB",
            EventCode::IntentionalWalk => "IBB",
            EventCode::HitByPitch => "HBP",
            EventCode::Strikeout => "K",
            EventCode::Groundout => "GO",
            EventCode::Flyout => "FO",
            EventCode::InfieldFly => "IF",
            EventCode::SacrificeFly => "SF",
            EventCode::SacrificeBunt => "SAC",
            EventCode::FieldersChoice => "FC",
            EventCode::Error => "E",
            EventCode::DoublePlay => "DP",
            EventCode::TriplePlay => "TP",
            EventCode::StealSecond => "SB2",
            EventCode::StealThird => "SB3",
            EventCode::StealHome => "SBH",
            EventCode::CaughtStealingSecond => "CS2",
            EventCode::CaughtStealingThird => "CS3",
            EventCode::CaughtStealingHome => "CSH",
            EventCode::PickoffFirst => "PO1",
            EventCode::PickoffSecond => "PO2",
            EventCode::PickoffThird => "PO3",
            EventCode::WildPitch => "WP",
            EventCode::PassedBall => "PB",
            EventCode::Balk => "BK",
            EventCode::Other => "OTHER",
            EventCode::End => "END",
            EventCode::Unknown(raw) => raw,
        }
    }

    /// Parse a wire token. Never fails: unrecognized tokens become `Unknown`.
    pub fn parse(token: &str) -> EventCode {
        match token.trim().to_ascii_uppercase().as_str() {
            "B" => EventCode::Ball,
            "S" => EventCode::Strike,
            "F" => EventCode::Foul,
            "1B" => EventCode::Single,
            "2B" => EventCode::Double,
            "3B" => EventCode::Triple,
            "HR" => EventCode::HomeRun,
            "BB" => EventCode::Walk,
            "IBB" => EventCode::IntentionalWalk,
            "HBP" => EventCode::HitByPitch,
            "K" => EventCode::Strikeout,
            "GO" => EventCode::Groundout,
            "FO" => EventCode::Flyout,
            "IF" => EventCode::InfieldFly,
            "SF" => EventCode::SacrificeFly,
            "SAC" => EventCode::SacrificeBunt,
            "FC" => EventCode::FieldersChoice,
            "E" => EventCode::Error,
            "DP" => EventCode::DoublePlay,
            "TP" => EventCode::TriplePlay,
            "SB2" => EventCode::StealSecond,
            "SB3" => EventCode::StealThird,
            "SBH" => EventCode::StealHome,
            "CS2" => EventCode::CaughtStealingSecond,
            "CS3" => EventCode::CaughtStealingThird,
            "CSH" => EventCode::CaughtStealingHome,
            "PO1" => EventCode::PickoffFirst,
            "PO2" => EventCode::PickoffSecond,
            "PO3" => EventCode::PickoffThird,
            "WP" => EventCode::WildPitch,
            "PB" => EventCode::PassedBall,
            "BK" => EventCode::Balk,
            "OTHER" => EventCode::Other,
            "END" => EventCode::End,
            _ => EventCode::Unknown(token.to_string()),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, EventCode::Unknown(_))
    }

    /// Bases gained by the batter on a hit
    pub fn hit_value(&self) -> Option<u8> {
        match self {
            EventCode::Single => Some(1),
            EventCode::Double => Some(2),
            EventCode::Triple => Some(3),
            EventCode::HomeRun => Some(4),
            _ => None,
        }
    }
}

impl From<String> for EventCode {
    fn from(token: String) -> Self {
        EventCode::parse(&token)
    }
}

impl From<EventCode> for String {
    fn from(code: EventCode) -> Self {
        code.as_str().to_string()
    }
}

impl FromStr for EventCode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(EventCode::parse(s))
    }
}

impl fmt::Display for EventCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl JsonSchema for EventCode {
    fn schema_name() -> String {
        "EventCode".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        String::json_schema(gen)
    }
}

// ============================================================================
// Runner-advance directives
// ============================================================================

/// Where a directed runner ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    Base(Base),
    Home,
    Out,
}

/// A validated `{from, to}` instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Directive {
    pub from: Base,
    pub to: Destination,
}

impl Directive {
    pub fn new(from: Base, to: Destination) -> Self {
        Self { from, to }
    }

    /// `from == to`: a hold, or a direct placement under `OTHER`.
    pub fn is_stationary(&self) -> bool {
        self.to == Destination::Base(self.from)
    }
}

/// Raw base token as found in feeds: a name (`"second"`, `"H"`) or a number.
/// Anything else is kept as `Other` and never resolves to a base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum BaseToken {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl BaseToken {
    fn normalized(&self) -> String {
        match self {
            BaseToken::Number(n) => n.to_string(),
            BaseToken::Text(s) => s.trim().to_ascii_lowercase(),
            BaseToken::Other(_) => String::new(),
        }
    }

    /// Source base; only first, second and third are valid.
    pub fn as_source(&self) -> Option<Base> {
        match self.normalized().as_str() {
            "first" | "1" => Some(Base::First),
            "second" | "2" => Some(Base::Second),
            "third" | "3" => Some(Base::Third),
            _ => None,
        }
    }

    /// Destination; only second, third, home and out are valid.
    pub fn as_destination(&self) -> Option<Destination> {
        match self.normalized().as_str() {
            "second" | "2" => Some(Destination::Base(Base::Second)),
            "third" | "3" => Some(Destination::Base(Base::Third)),
            "home" | "h" | "4" => Some(Destination::Home),
            "out" => Some(Destination::Out),
            _ => None,
        }
    }
}

impl From<&str> for BaseToken {
    fn from(s: &str) -> Self {
        BaseToken::Text(s.to_string())
    }
}

/// Runner-advance directive exactly as it appeared in the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RunnerAdvance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<BaseToken>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<BaseToken>,
}

impl RunnerAdvance {
    pub fn new(from: impl Into<BaseToken>, to: impl Into<BaseToken>) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
        }
    }

    /// Validated form, or `None` if either side is missing or unrecognized.
    pub fn directive(&self) -> Option<Directive> {
        let from = self.from.as_ref()?.as_source()?;
        let to = self.to.as_ref()?.as_destination()?;
        Some(Directive { from, to })
    }
}

// ============================================================================
// PlayEvent
// ============================================================================

/// `null` reads as no directives; entries that are not directive objects are
/// dropped so the rest of the event still applies.
fn lenient_advances<'de, D>(deserializer: D) -> Result<Vec<RunnerAdvance>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => return Ok(Vec::new()),
        serde_json::Value::Array(entries) => entries,
        other => {
            tracing::debug!(value = %other, "runner_advances is not a list; ignored");
            return Ok(Vec::new());
        }
    };

    Ok(entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<RunnerAdvance>(entry.clone()) {
            Ok(advance) => Some(advance),
            Err(err) => {
                tracing::debug!(%entry, error = %err, "dropping unreadable runner advance");
                None
            }
        })
        .collect())
}

/// One normalized play-by-play record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlayEvent {
    /// Timestamp, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<String>,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    pub code: EventCode,
    #[serde(default, deserialize_with = "lenient_advances", skip_serializing_if = "Vec::is_empty")]
    #[schemars(with = "Vec<RunnerAdvance>")]
    pub runner_advances: Vec<RunnerAdvance>,
    /// Free-form upstream metadata, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl PlayEvent {
    pub fn new(code: EventCode) -> Self {
        Self {
            ts: None,
            event: None,
            code,
            runner_advances: Vec::new(),
            meta: None,
        }
    }

    pub fn with_advance(mut self, from: impl Into<BaseToken>, to: impl Into<BaseToken>) -> Self {
        self.runner_advances.push(RunnerAdvance::new(from, to));
        self
    }

    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.event = Some(text.into());
        self
    }

    /// Valid directives in feed order; malformed entries are dropped.
    pub fn directives(&self) -> Vec<Directive> {
        self.runner_advances
            .iter()
            .filter_map(|adv| {
                let directive = adv.directive();
                if directive.is_none() {
                    tracing::debug!(code = %self.code, advance = ?adv, "dropping malformed directive");
                }
                directive
            })
            .collect()
    }
}
