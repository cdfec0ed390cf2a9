//! Stable identifiers for schemas and built-in checks.
//!
//! Check refs are a dotted namespace; policies point at them through `Policy::check`.

// Schemas
pub const SCHEMA_CONFIG_V1: &str = "assay.config.v1";

// Built-in checks (target property audits)
pub const CHECK_PROPERTY_PRESENT: &str = "property.present";
pub const CHECK_PROPERTY_EQUALS: &str = "property.equals";
pub const CHECK_PROPERTY_ABSENT: &str = "property.absent";

// Parameter keys understood by the built-in checks
pub const PARAM_KEY: &str = "key";
pub const PARAM_VALUE: &str = "value";
