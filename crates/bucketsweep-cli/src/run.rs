//! Command implementations
//!
//! Output goes to the given writer so the commands can be driven from tests;
//! logging goes through `tracing` and never touches that writer.

use anyhow::Context;
use bucketsweep_filters::{FilterKind, FilterPipeline, PipelineOutcome, StageReport};
use bucketsweep_policy::Policy;
use serde::Serialize;
use std::io::Write;
use tracing::{info, warn};

use crate::cli::{CheckArgs, SelectArgs};
use crate::config::{CliConfig, OutputFormat};
use crate::listing::load_listing;

#[derive(Serialize)]
struct SelectReport<'a> {
    candidates: Vec<&'a str>,
    stages: &'a [StageReport],
}

/// Filters to run: explicit list, then configured list, then whatever the
/// policy references
pub fn resolve_kinds(configured: &[FilterKind], policy: &Policy) -> Vec<FilterKind> {
    if !configured.is_empty() {
        return configured.to_vec();
    }

    let kinds = FilterKind::referenced_by(policy);
    if kinds.is_empty() {
        warn!("Policy references no selector criteria, nothing will be selected");
    }
    kinds
}

/// Run `select` and return the number of candidates written
pub fn select(args: &SelectArgs, config: CliConfig, out: &mut impl Write) -> anyhow::Result<usize> {
    let config = config.with_overrides(&args.filters, args.mode, args.format);

    let policy = Policy::from_file(&args.policy)
        .with_context(|| format!("loading policy {}", args.policy.display()))?;
    let objects = load_listing(&args.objects)
        .with_context(|| format!("loading listing {}", args.objects))?;

    let kinds = resolve_kinds(&config.filters, &policy);
    let pipeline = FilterPipeline::from_kinds(&kinds, config.mode);
    info!(
        stages = ?pipeline.stage_names(),
        mode = %config.mode,
        objects = objects.len(),
        "Selecting deletion candidates"
    );

    let outcome = pipeline.execute(&objects, &policy)?;
    write_outcome(&outcome, config.format, out)?;

    info!(candidates = outcome.selected.len(), "Selection complete");
    Ok(outcome.selected.len())
}

fn write_outcome(
    outcome: &PipelineOutcome<'_>,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            for object in &outcome.selected {
                writeln!(out, "{}", object.key)?;
            }
        }
        OutputFormat::Json => {
            let report = SelectReport {
                candidates: outcome
                    .selected
                    .iter()
                    .map(|object| object.key.as_str())
                    .collect(),
                stages: &outcome.stages,
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Run `check`: compile every selected filter against the policy
pub fn check(args: &CheckArgs, config: CliConfig, out: &mut impl Write) -> anyhow::Result<()> {
    let config = config.with_overrides(&args.filters, None, None);

    let policy = Policy::from_file(&args.policy)
        .with_context(|| format!("loading policy {}", args.policy.display()))?;
    let kinds = resolve_kinds(&config.filters, &policy);

    FilterPipeline::from_kinds(&kinds, config.mode).validate(&policy)?;

    let names: Vec<&str> = kinds.iter().map(FilterKind::as_str).collect();
    writeln!(
        out,
        "policy OK: {} selector(s), filters: {}",
        policy.selectors.len(),
        if names.is_empty() { "none".to_string() } else { names.join(", ") }
    )?;
    Ok(())
}
