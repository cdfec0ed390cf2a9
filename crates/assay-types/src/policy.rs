use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Ordinal ranking of how serious an unsuccessful outcome is.
///
/// `1` is the floor. Named levels cover the common cases, but any ordinal
/// above the floor is valid so catalogs can define finer scales.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Severity(u8);

impl Severity {
    pub const LOW: Severity = Severity(1);
    pub const NORMAL: Severity = Severity(2);
    pub const HIGH: Severity = Severity(3);
    pub const CRITICAL: Severity = Severity(4);

    /// Lowest possible severity; an assessment with no failures reports this.
    pub const FLOOR: Severity = Severity::LOW;

    /// Build a severity from an ordinal, clamping anything below the floor.
    pub fn new(level: u8) -> Self {
        Severity(level.max(Self::FLOOR.0))
    }

    pub fn level(self) -> u8 {
        self.0
    }

    pub fn name(self) -> Option<&'static str> {
        match self.0 {
            1 => Some("low"),
            2 => Some("normal"),
            3 => Some("high"),
            4 => Some("critical"),
            _ => None,
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::FLOOR
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Rejected severity ordinal (below the floor).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidSeverity(pub String);

impl fmt::Display for InvalidSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid severity: {} (expected low|normal|high|critical or an ordinal >= 1)",
            self.0
        )
    }
}

impl std::error::Error for InvalidSeverity {}

impl TryFrom<u8> for Severity {
    type Error = InvalidSeverity;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value < Self::FLOOR.0 {
            return Err(InvalidSeverity(value.to_string()));
        }
        Ok(Severity(value))
    }
}

impl From<Severity> for u8 {
    fn from(value: Severity) -> Self {
        value.0
    }
}

impl FromStr for Severity {
    type Err = InvalidSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::LOW),
            "normal" => Ok(Self::NORMAL),
            "high" => Ok(Self::HIGH),
            "critical" => Ok(Self::CRITICAL),
            other => other
                .parse::<u8>()
                .map_err(|_| InvalidSeverity(s.to_string()))
                .and_then(Severity::try_from),
        }
    }
}

impl JsonSchema for Severity {
    fn schema_name() -> Cow<'static, str> {
        "Severity".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "description": "Severity ordinal; 1 (low) is the floor.",
            "type": "integer",
            "minimum": 1,
            "maximum": 255
        })
    }
}

/// A named, severity-ranked check definition to run against a target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Policy {
    /// Unique within a run; the key for results and snapshots.
    pub name: String,
    pub title: String,
    pub severity: Severity,
    /// Reference to the executable check (resolved by the audit registry).
    pub check: String,

    /// Check-specific parameters (kept open-ended for forward compatibility).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, JsonValue>,
}

impl Policy {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        severity: Severity,
        check: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            severity,
            check: check.into(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn parameter(&self, key: &str) -> Option<&JsonValue> {
        self.parameters.get(key)
    }
}
