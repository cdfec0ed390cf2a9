//! Config parsing and override resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod resolve;

pub use model::{AssayConfigV1, LogConfig, PolicyConfig, RunConfig, SeverityValue, TargetConfig};
pub use resolve::{
    DEFAULT_CHANNEL_CAPACITY, DEFAULT_PERIOD_HOURS, Overrides, ResolvedConfig, resolve_log_level,
};

/// Parse `assay.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<AssayConfigV1> {
    let cfg: AssayConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective config used by a run (file values + CLI overrides + defaults).
pub fn resolve_config(cfg: AssayConfigV1, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
