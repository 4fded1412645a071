//! Formwright CLI - derive and check form values from JSON files

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use formwright::prelude::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "formwright")]
#[command(author, version, about = "Derive and validate form field values")]
struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute derived fields and print the resulting values as JSON
    Derive {
        /// Form schema (JSON)
        schema: PathBuf,

        /// Entered values (JSON object keyed by field id)
        values: PathBuf,

        /// Date used by calculateAge (YYYY-MM-DD, default: local date)
        #[arg(short, long)]
        today: Option<NaiveDate>,

        /// Output JSON file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate entered values and print one error per line
    Check {
        /// Form schema (JSON)
        schema: PathBuf,

        /// Entered values (JSON object keyed by field id)
        values: PathBuf,

        /// Date used by calculateAge (YYYY-MM-DD, default: local date)
        #[arg(short, long)]
        today: Option<NaiveDate>,
    },

    /// Check every derivation formula in a schema
    Lint {
        /// Form schema (JSON)
        schema: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Derive {
            schema,
            values,
            today,
            output,
        } => derive(&schema, &values, today, output.as_deref()),
        Commands::Check {
            schema,
            values,
            today,
        } => check(&schema, &values, today),
        Commands::Lint { schema } => lint(&schema),
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_schema(path: &Path) -> Result<FormSchema> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    let schema: FormSchema = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse schema '{}'", path.display()))?;

    tracing::debug!(schema = %schema.id, fields = schema.fields.len(), "loaded schema");
    Ok(schema)
}

fn load_values(path: &Path) -> Result<ValueSnapshot> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse values '{}'", path.display()))
}

fn recalculate(
    schema: &FormSchema,
    values: &ValueSnapshot,
    today: Option<NaiveDate>,
    validate: bool,
) -> FormEvaluation {
    schema.recalculate_with_options(values, &RecalculationOptions { today, validate })
}

fn derive(
    schema_path: &Path,
    values_path: &Path,
    today: Option<NaiveDate>,
    output: Option<&Path>,
) -> Result<()> {
    let schema = load_schema(schema_path)?;
    let values = load_values(values_path)?;

    let result = recalculate(&schema, &values, today, false);
    let mut json =
        serde_json::to_string_pretty(&result.values).context("Failed to serialize values")?;
    json.push('\n');

    if let Some(output_path) = output {
        std::fs::write(output_path, &json)
            .with_context(|| format!("Failed to write '{}'", output_path.display()))?;
        eprintln!(
            "Derived {} fields ({} failed) into '{}'",
            result.stats.derived_count,
            result.stats.derivation_errors,
            output_path.display()
        );
    } else {
        io::stdout()
            .write_all(json.as_bytes())
            .context("Failed to write to stdout")?;
    }

    Ok(())
}

fn check(schema_path: &Path, values_path: &Path, today: Option<NaiveDate>) -> Result<()> {
    let schema = load_schema(schema_path)?;
    let values = load_values(values_path)?;

    let result = recalculate(&schema, &values, today, true);
    for line in error_lines(&schema, &result.errors) {
        println!("{}", line);
    }

    if !result.is_valid() {
        bail!(
            "{} of {} fields failed validation",
            result.stats.validation_errors,
            result.stats.fields_validated
        );
    }
    Ok(())
}

/// Errors as `id: message` lines in field display order
fn error_lines(schema: &FormSchema, errors: &ErrorSnapshot) -> Vec<String> {
    schema
        .fields
        .iter()
        .filter_map(|field| {
            errors
                .get(&field.id)
                .map(|message| format!("{}: {}", field.id, message))
        })
        .collect()
}

fn lint(schema_path: &Path) -> Result<()> {
    let schema = load_schema(schema_path)?;
    let problems = lint_lines(&schema);

    for line in &problems {
        println!("{}", line);
    }

    if !problems.is_empty() {
        bail!("{} problem(s) in '{}'", problems.len(), schema_path.display());
    }
    eprintln!("{} derived fields OK", schema.derived_fields().count());
    Ok(())
}

fn lint_lines(schema: &FormSchema) -> Vec<String> {
    let mut lines: Vec<String> = schema
        .derivation_issues()
        .iter()
        .map(ToString::to_string)
        .collect();
    lines.extend(
        schema
            .formula_issues()
            .into_iter()
            .map(|(id, issue)| format!("{}: {}", id, issue)),
    );
    lines
}
