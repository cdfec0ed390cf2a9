use crate::model::{AssayConfigV1, PolicyConfig, SeverityValue};
use anyhow::Context;
use assay_types::ids::SCHEMA_CONFIG_V1;
use assay_types::{Policy, Severity};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;
pub const DEFAULT_PERIOD_HOURS: u32 = 24;
const DEFAULT_LOG_LEVEL: &str = "warn";
const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Values supplied on the command line; each one beats the file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub uri: Option<String>,
    pub workers: Option<usize>,
    pub remediate: Option<bool>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedConfig {
    pub uri: String,
    pub properties: BTreeMap<String, JsonValue>,
    pub policies: Vec<Policy>,
    /// `None` means "use the available parallelism".
    pub workers: Option<usize>,
    pub channel_capacity: usize,
    pub remediate: bool,
    pub period_hours: u32,
}

pub fn resolve_config(cfg: AssayConfigV1, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    if let Some(schema) = cfg.schema.as_deref()
        && schema != SCHEMA_CONFIG_V1
    {
        anyhow::bail!("unsupported config schema: {schema} (expected {SCHEMA_CONFIG_V1})");
    }

    let uri = overrides
        .uri
        .or(cfg.target.uri)
        .context("no target uri (set [target] uri or pass --uri)")?;
    if uri.trim().is_empty() {
        anyhow::bail!("target uri must not be empty");
    }

    let workers = overrides.workers.or(cfg.run.workers);
    if workers == Some(0) {
        anyhow::bail!("workers must be at least 1");
    }

    let channel_capacity = cfg.run.channel_capacity.unwrap_or(DEFAULT_CHANNEL_CAPACITY);
    if channel_capacity == 0 {
        anyhow::bail!("channel_capacity must be at least 1");
    }

    let period_hours = cfg.run.period_hours.unwrap_or(DEFAULT_PERIOD_HOURS);
    if period_hours == 0 {
        anyhow::bail!("period_hours must be at least 1");
    }

    // Logging is installed before the config resolves; this only validates.
    resolve_log_level(cfg.log.level.as_deref(), overrides.log_level.as_deref())?;

    let policies = cfg
        .policies
        .into_iter()
        .enumerate()
        .map(|(index, pc)| {
            resolve_policy(pc).with_context(|| format!("invalid policy at index {index}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(ResolvedConfig {
        uri,
        properties: cfg.target.properties,
        policies,
        workers,
        channel_capacity,
        remediate: overrides.remediate.or(cfg.run.remediate).unwrap_or(false),
        period_hours,
    })
}

fn resolve_policy(pc: PolicyConfig) -> anyhow::Result<Policy> {
    if pc.name.trim().is_empty() {
        anyhow::bail!("policy name must not be empty");
    }
    if pc.check.trim().is_empty() {
        anyhow::bail!("policy {} has an empty check reference", pc.name);
    }

    let severity = match pc.severity {
        None => Severity::default(),
        Some(value) => {
            parse_severity(&value).with_context(|| format!("invalid severity for {}", pc.name))?
        }
    };

    let title = pc.title.unwrap_or_else(|| pc.name.clone());
    let mut policy = Policy::new(pc.name, title, severity, pc.check);
    policy.parameters = pc.parameters;
    Ok(policy)
}

fn parse_severity(v: &SeverityValue) -> anyhow::Result<Severity> {
    let severity = match v {
        SeverityValue::Level(level) => Severity::try_from(*level)?,
        SeverityValue::Name(name) => name.parse::<Severity>()?,
    };
    Ok(severity)
}

/// Effective log level: the override beats the file, the default is `warn`.
///
/// Returns one of `error|warn|info|debug|trace`; `warning` is accepted as `warn`.
pub fn resolve_log_level(
    file_level: Option<&str>,
    override_level: Option<&str>,
) -> anyhow::Result<String> {
    parse_log_level(override_level.or(file_level).unwrap_or(DEFAULT_LOG_LEVEL))
}

fn parse_log_level(v: &str) -> anyhow::Result<String> {
    let level = v.trim().to_ascii_lowercase();
    match level.as_str() {
        "warning" => Ok("warn".to_string()),
        l if LOG_LEVELS.contains(&l) => Ok(level),
        other => anyhow::bail!("unknown log level: {other} (expected error|warn|info|debug|trace)"),
    }
}
