//! Developer tasks (schema generation, snapshot validation).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use assay_types::ids::SCHEMA_CONFIG_V1;
use assay_types::{AssessmentSnapshot, SCHEMA_ASSESSMENT_V1};
use schemars::schema_for;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the project root (parent of xtask directory).
fn project_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .or_else(|_| std::env::current_dir())
        .unwrap_or_else(|_| PathBuf::from("."));

    // If we're in the xtask directory, go up one level
    match manifest_dir.parent() {
        Some(parent) if manifest_dir.ends_with("xtask") => parent.to_path_buf(),
        _ => manifest_dir,
    }
}

/// Get the schemas directory path.
fn schemas_dir() -> PathBuf {
    project_root().join("schemas")
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

/// Generate the AssayConfigV1 schema.
fn generate_config_schema() -> schemars::Schema {
    schema_for!(assay_settings::AssayConfigV1)
}

/// Generate the AssessmentSnapshot schema.
fn generate_assessment_schema() -> schemars::Schema {
    schema_for!(AssessmentSnapshot)
}

/// List of schemas to generate.
fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "assay.config.v1.json",
            generate: generate_config_schema,
        },
        SchemaSpec {
            filename: "assay.assessment.v1.json",
            generate: generate_assessment_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

/// Emit schemas to the schemas/ directory.
fn emit_schemas(dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let schema = (spec.generate)();
        let json = serialize_schema(&schema)?;
        let path = dir.join(spec.filename);

        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;

        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Validate that schemas in the repo match what would be generated.
fn validate_schemas(dir: &Path) -> anyhow::Result<()> {
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);

        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }

        let expected = serialize_schema(&(spec.generate)())?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }

    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {}", name);
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {}", name);
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

/// Check a stored snapshot: JSON schema first, then the import consistency rules.
fn validate_snapshot(path: &Path) -> anyhow::Result<()> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {} as JSON", path.display()))?;

    let schema_value = serde_json::to_value(generate_assessment_schema())
        .context("Failed to serialize snapshot schema")?;
    let compiled = jsonschema::validator_for(&schema_value)
        .map_err(|e| anyhow::anyhow!("Failed to compile schema: {}", e))?;

    let errors: Vec<String> = compiled
        .iter_errors(&value)
        .map(|err| format!("schema validation: {}", err))
        .collect();
    if !errors.is_empty() {
        for err in &errors {
            eprintln!("  - {}", err);
        }
        bail!(
            "{} failed validation with {} errors",
            path.display(),
            errors.len()
        );
    }
    println!("✓ {} matches {}", path.display(), SCHEMA_ASSESSMENT_V1);

    let snapshot: AssessmentSnapshot = serde_json::from_value(value)
        .with_context(|| format!("Failed to decode {}", path.display()))?;
    let assessment = assay_domain::Assessment::from_snapshot(snapshot)
        .with_context(|| format!("Failed to import {}", path.display()))?;
    println!(
        "✓ {} imports cleanly ({} results, successful={})",
        path.display(),
        assessment.results().len(),
        assessment.is_successful()
    );
    Ok(())
}

/// Print a snapshot with ids and timestamps replaced, for golden files.
fn normalize_snapshot(path: &Path) -> anyhow::Result<()> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {} as JSON", path.display()))?;
    let normalized = assay_test_util::normalize_nondeterministic(value);
    println!(
        "{}",
        serde_json::to_string_pretty(&normalized).context("Failed to serialize snapshot")?
    );
    Ok(())
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help                       Show this message");
    eprintln!("  emit-schemas               Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas           Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids           Print known schema IDs");
    eprintln!("  validate-snapshot <file>   Validate a stored assessment snapshot");
    eprintln!("  normalize-snapshot <file>  Print a snapshot with ids and timestamps normalized");
}

fn file_arg(args: &[String], cmd: &str) -> anyhow::Result<PathBuf> {
    match args.get(2) {
        Some(path) => Ok(PathBuf::from(path)),
        None => bail!("{cmd} requires a file argument"),
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(&schemas_dir()),
        "validate-schemas" => validate_schemas(&schemas_dir()),
        "validate-snapshot" => file_arg(&args, cmd).and_then(|p| validate_snapshot(&p)),
        "normalize-snapshot" => file_arg(&args, cmd).and_then(|p| normalize_snapshot(&p)),
        "print-schema-ids" => {
            println!("{}", SCHEMA_CONFIG_V1);
            println!("{}", SCHEMA_ASSESSMENT_V1);
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
