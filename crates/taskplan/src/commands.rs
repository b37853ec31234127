//! Command execution for the taskplan CLI.
//!
//! Commands write the primary result to `out` and diagnostics to `diag`, so
//! the build order stays machine-consumable when piped.

use crate::cli::{Cli, CliError, OkEnvelope, OutputFormat};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use taskplan_catalog::{CatalogSpec, release_catalog};
use taskplan_task_graph::{TaskCatalog, resolve};
use tracing::{debug, info, instrument};

/// Payload of a successful resolution in JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedTasks {
    /// Tasks in build order.
    pub tasks: Vec<String>,
    /// Number of tasks in `tasks`.
    pub collected: usize,
    /// Number of buildable tasks in the catalog.
    pub total: usize,
}

/// Payload of `--list` in JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogListing {
    /// Task names in registration order.
    pub tasks: Vec<String>,
    /// Names assumed to be provided outside the pipeline.
    pub assume_provided: Vec<String>,
}

/// Payload of a passing `--check` in JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    /// Always true; failed checks are reported as errors.
    pub valid: bool,
    /// Number of registered tasks.
    pub tasks: usize,
}

/// Load the catalog to operate on and extend its assume-provided set.
///
/// # Errors
///
/// Returns a configuration error if the catalog file cannot be read or parsed.
pub fn load_catalog(path: Option<&Path>, extra_assume_provided: &[String]) -> Result<TaskCatalog, CliError> {
    let catalog = match path {
        Some(path) => CatalogSpec::from_path(path)?.to_catalog()?,
        None => {
            debug!("Using built-in release catalog");
            release_catalog()?
        }
    };

    if extra_assume_provided.is_empty() {
        return Ok(catalog);
    }

    let mut builder = catalog.into_builder();
    for name in extra_assume_provided {
        builder.assume_provided(name.clone());
    }
    Ok(builder.build())
}

/// Run the command selected by `cli`.
///
/// # Errors
///
/// Returns the error to render and map to an exit code.
#[instrument(level = "debug", skip_all, fields(roots = cli.tasks.len()))]
pub fn execute(cli: &Cli, out: &mut dyn Write, diag: &mut dyn Write) -> Result<(), CliError> {
    let catalog = load_catalog(cli.catalog.as_deref(), &cli.assume_provided)?;
    info!(
        tasks = catalog.len(),
        assume_provided = catalog.assumed_provided().count(),
        "Catalog ready"
    );

    if cli.check {
        check(&catalog, cli.output, out)?;
    } else if cli.list {
        list(&catalog, cli.output, out)?;
    } else {
        build_order(&catalog, cli, out, diag)?;
    }

    out.flush()?;
    Ok(())
}

fn build_order(
    catalog: &TaskCatalog,
    cli: &Cli,
    out: &mut dyn Write,
    diag: &mut dyn Write,
) -> Result<(), CliError> {
    let order = resolve(catalog, &cli.tasks)?;
    let total = catalog.buildable_count();

    if !cli.quiet {
        if cli.tasks.is_empty() {
            writeln!(diag, "Collected all {total} tasks")?;
        } else {
            writeln!(
                diag,
                "Collected {}/{total} tasks for [{}]",
                order.len(),
                cli.tasks.join(", ")
            )?;
        }
    }

    match cli.output {
        OutputFormat::Text => {
            for name in &order {
                writeln!(out, "{name}")?;
            }
        }
        OutputFormat::Json => {
            let collected = order.len();
            write_json(
                out,
                &ResolvedTasks {
                    tasks: order.into_vec(),
                    collected,
                    total,
                },
            )?;
        }
    }
    Ok(())
}

fn list(catalog: &TaskCatalog, output: OutputFormat, out: &mut dyn Write) -> Result<(), CliError> {
    match output {
        OutputFormat::Text => {
            for name in catalog.names() {
                writeln!(out, "{name}")?;
            }
        }
        OutputFormat::Json => write_json(
            out,
            &CatalogListing {
                tasks: catalog.names().map(str::to_string).collect(),
                assume_provided: catalog.assumed_provided().map(str::to_string).collect(),
            },
        )?,
    }
    Ok(())
}

fn check(catalog: &TaskCatalog, output: OutputFormat, out: &mut dyn Write) -> Result<(), CliError> {
    let result = catalog.validate();
    if !result.is_valid {
        let problems = result
            .errors
            .iter()
            .map(|e| format!("  - {e}"))
            .collect::<Vec<_>>()
            .join("\n");
        return Err(CliError::config(format!(
            "catalog validation failed with {} problem(s):\n{problems}",
            result.errors.len()
        ))
        .with_help("fix the listed tasks in the catalog and run --check again"));
    }

    match output {
        OutputFormat::Text => writeln!(out, "ok")?,
        OutputFormat::Json => write_json(
            out,
            &CheckReport {
                valid: true,
                tasks: catalog.len(),
            },
        )?,
    }
    Ok(())
}

fn write_json<T: Serialize>(out: &mut dyn Write, data: &T) -> Result<(), CliError> {
    let json = serde_json::to_string(&OkEnvelope::new(data))
        .map_err(|e| CliError::other(format!("failed to serialize output: {e}")))?;
    writeln!(out, "{json}")?;
    Ok(())
}
