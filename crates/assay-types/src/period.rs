use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

/// Start/end window applied uniformly to every policy in a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReportingPeriod {
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub end: OffsetDateTime,
}

impl ReportingPeriod {
    pub fn new(start: OffsetDateTime, end: OffsetDateTime) -> Self {
        Self { start, end }
    }

    /// The window of length `span` ending at `end`.
    pub fn ending_at(end: OffsetDateTime, span: Duration) -> Self {
        Self {
            start: end - span,
            end,
        }
    }

    /// The last `span` up to now (UTC).
    pub fn trailing(span: Duration) -> Self {
        Self::ending_at(OffsetDateTime::now_utc(), span)
    }

    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

impl Default for ReportingPeriod {
    /// The last 24 hours.
    fn default() -> Self {
        Self::trailing(Duration::days(1))
    }
}
