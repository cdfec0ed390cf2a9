use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// `assay.toml` schema v1.
///
/// This is a *user-facing* config model: everything but the policy catalog is optional
/// and validation happens at resolve time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AssayConfigV1 {
    /// Optional schema string for tooling (`assay.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(default)]
    pub target: TargetConfig,

    #[serde(default)]
    pub run: RunConfig,

    #[serde(default)]
    pub log: LogConfig,

    /// Policy catalog, in dispatch order.
    #[serde(default)]
    pub policies: Vec<PolicyConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TargetConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    /// Static facts about the target that the built-in property checks read.
    #[serde(default)]
    pub properties: BTreeMap<String, JsonValue>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RunConfig {
    /// Worker threads (defaults to the available parallelism).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,

    /// Completed responses buffered ahead of the aggregation loop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_capacity: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediate: Option<bool>,

    /// Length of the trailing reporting period ending now.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_hours: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LogConfig {
    /// `error`, `warn`, `info`, `debug` or `trace`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PolicyConfig {
    pub name: String,

    /// Defaults to the name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<SeverityValue>,

    /// Check reference, e.g. `property.equals`.
    pub check: String,

    #[serde(default)]
    pub parameters: BTreeMap<String, JsonValue>,
}

/// Severity written either as a level name or as an ordinal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum SeverityValue {
    Level(u8),
    Name(String),
}
