//! CLI entry point for assay.
//!
//! This module is intentionally thin: it handles argument parsing, logging setup, I/O, and exit
//! codes. All business logic lives in the `assay-app` crate.

use anyhow::Context;
use assay_app::{
    RunAssessmentInput, assessment_exit_code, load_snapshot, render_markdown, render_summary,
    run_assessment, write_snapshot,
};
use assay_domain::ids::RandomIds;
use assay_settings::Overrides;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use tracing::{Level, warn};
use tracing_subscriber::FmtSubscriber;

const DEFAULT_SNAPSHOT: &str = "artifacts/assay/assessment.json";

#[derive(Parser, Debug)]
#[command(
    name = "assay",
    version,
    about = "Run policy assessments against a target and report an order-stable verdict"
)]
struct Cli {
    /// Path to assay config TOML.
    #[arg(long, default_value = "assay.toml")]
    config: Utf8PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Override the log level (error|warn|info|debug|trace).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run every configured policy and write the assessment snapshot.
    Run {
        /// Override the target uri.
        #[arg(long)]
        uri: Option<String>,

        /// Override the worker count (1 runs inline on the calling thread).
        #[arg(long)]
        workers: Option<usize>,

        /// Ask audits to remediate failed policies where supported.
        #[arg(long)]
        remediate: bool,

        /// Where to write the JSON snapshot.
        #[arg(long, default_value = DEFAULT_SNAPSHOT)]
        out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/assay/report.md")]
        markdown_out: Utf8PathBuf,
    },

    /// Print a summary of a stored snapshot.
    Show {
        /// Path to the JSON snapshot.
        #[arg(long, default_value = DEFAULT_SNAPSHOT)]
        snapshot: Utf8PathBuf,
    },

    /// Render Markdown from a stored snapshot.
    Md {
        /// Path to the JSON snapshot.
        #[arg(long, default_value = DEFAULT_SNAPSHOT)]
        snapshot: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Missing config is allowed; `--uri` can stand in for `[target]`.
    let cfg_text = std::fs::read_to_string(&cli.config).unwrap_or_default();
    init_logging(&cli, &cfg_text)?;

    let result = match &cli.cmd {
        Commands::Run {
            uri,
            workers,
            remediate,
            out,
            write_markdown,
            markdown_out,
        } => {
            let overrides = Overrides {
                uri: uri.clone(),
                workers: *workers,
                remediate: remediate.then_some(true),
                log_level: cli.log_level.clone(),
            };
            let markdown_out = write_markdown.then_some(markdown_out.as_path());
            cmd_run(&cfg_text, overrides, out, markdown_out)
        }
        Commands::Show { snapshot } => cmd_show(snapshot),
        Commands::Md { snapshot, output } => cmd_md(snapshot, output.as_deref()),
    };

    match result {
        Ok(0) => Ok(()),
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("assay error: {err:#}");
            std::process::exit(1);
        }
    }
}

/// `-v` beats `--log-level`, which beats `[log] level`; the default is `warn`.
///
/// An invalid level falls back to `warn` with a warning; `run` still rejects it when it
/// resolves the full config.
fn init_logging(cli: &Cli, cfg_text: &str) -> anyhow::Result<()> {
    let file_level = assay_settings::parse_config_toml(cfg_text)
        .ok()
        .and_then(|cfg| cfg.log.level);

    let resolved =
        assay_settings::resolve_log_level(file_level.as_deref(), cli.log_level.as_deref());

    let mut rejected = None;
    let level = match cli.verbose {
        0 => match resolved {
            Ok(level) => level.parse::<Level>().unwrap_or(Level::WARN),
            Err(err) => {
                rejected = Some(err);
                Level::WARN
            }
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("install log subscriber")?;

    if let Some(err) = rejected {
        warn!("{err}; logging at warn");
    }
    Ok(())
}

fn cmd_run(
    cfg_text: &str,
    overrides: Overrides,
    out: &Utf8Path,
    markdown_out: Option<&Utf8Path>,
) -> anyhow::Result<i32> {
    let output = run_assessment(RunAssessmentInput {
        config_text: cfg_text,
        overrides,
        ids: &RandomIds,
        period_end: None,
    })?;
    let assessment = &output.assessment;

    write_snapshot(out, assessment).context("write snapshot")?;
    if let Some(path) = markdown_out {
        write_text_file(path, &render_markdown(assessment)).context("write markdown")?;
    }

    print!("{}", render_summary(assessment));
    Ok(assessment_exit_code(assessment))
}

fn cmd_show(snapshot: &Utf8Path) -> anyhow::Result<i32> {
    let assessment = load_snapshot(snapshot)?;
    print!("{}", render_summary(&assessment));
    Ok(0)
}

fn cmd_md(snapshot: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<i32> {
    let assessment = load_snapshot(snapshot)?;
    let md = render_markdown(&assessment);

    if let Some(out_path) = output {
        write_text_file(out_path, &md).context("write markdown output")?;
    } else {
        print!("{}", md);
    }
    Ok(0)
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    std::fs::write(path, text).with_context(|| format!("write text: {}", path))?;
    Ok(())
}
