//! Snapshot persistence: JSON on disk, replaced atomically.

use anyhow::Context;
use assay_domain::Assessment;
use assay_types::{AssessmentSnapshot, SCHEMA_ASSESSMENT_V1};
use camino::Utf8Path;
use std::io::Write;
use tracing::debug;

pub fn serialize_snapshot(assessment: &Assessment) -> anyhow::Result<Vec<u8>> {
    let mut bytes =
        serde_json::to_vec_pretty(&assessment.to_snapshot()).context("serialize snapshot")?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Decode a snapshot, checking the schema id before the shape.
pub fn parse_snapshot_json(text: &str) -> anyhow::Result<AssessmentSnapshot> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse snapshot json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    if schema != SCHEMA_ASSESSMENT_V1 {
        anyhow::bail!("unknown snapshot schema: {schema:?} (expected {SCHEMA_ASSESSMENT_V1})");
    }

    serde_json::from_value(value).context("decode assay.assessment.v1 snapshot")
}

/// Write the snapshot next to `path` and rename it into place, so readers never see a
/// half-written file.
pub fn write_snapshot(path: &Utf8Path, assessment: &Assessment) -> anyhow::Result<()> {
    let bytes = serialize_snapshot(assessment)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    std::fs::create_dir_all(dir).with_context(|| format!("create {dir}"))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("create temp file in {dir}"))?;
    tmp.write_all(&bytes)
        .with_context(|| format!("write temp file for {path}"))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("sync temp file for {path}"))?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("persist {path}"))?;

    debug!(path = %path, id = %assessment.id(), "snapshot written");
    Ok(())
}

/// Read a snapshot and rebuild the assessment from it, without re-running anything.
pub fn load_snapshot(path: &Utf8Path) -> anyhow::Result<Assessment> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read {path}"))?;
    let snapshot = parse_snapshot_json(&text).with_context(|| format!("parse {path}"))?;
    let assessment = Assessment::from_snapshot(snapshot).with_context(|| format!("import {path}"))?;
    Ok(assessment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RunAssessmentInput, run_assessment};
    use assay_domain::ids::SequentialIds;
    use assay_settings::Overrides;
    use camino::Utf8PathBuf;
    use time::macros::datetime;

    const CONFIG: &str = r#"
[target]
uri = "https://example.com"
[target.properties]
php_version = "8.1"
[[policies]]
name = "php"
severity = 3
check = "property.equals"
parameters = { key = "php_version", value = "8.2" }
[[policies]]
name = "php:set"
check = "property.present"
parameters = { key = "php_version" }
"#;

    fn assessment() -> Assessment {
        let ids = SequentialIds::default();
        run_assessment(RunAssessmentInput {
            config_text: CONFIG,
            overrides: Overrides::default(),
            ids: &ids,
            period_end: Some(datetime!(2024-03-02 00:00 UTC)),
        })
        .expect("run")
        .assessment
    }

    fn temp_path(dir: &tempfile::TempDir, name: &str) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().join(name)).expect("utf8 path")
    }

    #[test]
    fn written_snapshot_loads_back() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let path = temp_path(&tmp, "out/assessment.json");
        let original = assessment();

        write_snapshot(&path, &original).expect("write");
        let restored = load_snapshot(&path).expect("load");

        assert_eq!(restored.to_snapshot(), original.to_snapshot());
        assert_eq!(restored.severity_code(), original.severity_code());
        assert_eq!(restored.stats(), original.stats());
        assert!(!restored.is_successful());
    }

    #[test]
    fn rewrite_replaces_previous_snapshot() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let path = temp_path(&tmp, "assessment.json");
        std::fs::write(&path, "stale").expect("seed");

        write_snapshot(&path, &assessment()).expect("write");

        let text = std::fs::read_to_string(&path).expect("read");
        assert!(text.starts_with('{'));
        assert!(text.contains("\"schema\": \"assay.assessment.v1\""));
        let leftovers = std::fs::read_dir(tmp.path()).expect("list").count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn load_reports_path_on_bad_input() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let path = temp_path(&tmp, "broken.json");
        std::fs::write(&path, "{ not json").expect("seed");

        let err = load_snapshot(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.json"));

        let missing = temp_path(&tmp, "missing.json");
        assert!(load_snapshot(&missing).is_err());
    }

    #[test]
    fn schema_is_checked_before_shape() {
        let err = parse_snapshot_json(r#"{"schema": "assay.assessment.v2", "results": 3}"#)
            .unwrap_err();
        assert!(err.to_string().contains("unknown snapshot schema"));

        let err = parse_snapshot_json(r#"{"schema": "assay.assessment.v1", "results": 3}"#)
            .unwrap_err();
        assert!(format!("{err:#}").contains("decode assay.assessment.v1 snapshot"));
    }

    #[test]
    fn inconsistent_snapshot_is_rejected_on_load() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let path = temp_path(&tmp, "tampered.json");

        let mut snapshot = assessment().to_snapshot();
        snapshot.successful = true;
        std::fs::write(&path, serde_json::to_vec(&snapshot).expect("serialize")).expect("seed");

        let err = load_snapshot(&path).unwrap_err();
        assert!(format!("{err:#}").contains("inconsistent snapshot"));
    }
}
