//! SRI CLI - Command-line interface for the Sleep Regularity Index engine
//!
//! Commands:
//! - compute: Compute SRI reports for one or more epoch series
//! - validate: Check the sleep/wake encoding of each series
//! - schema: Print input/output schema information

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use sleep_regularity::validator::EncodingValidator;
use sleep_regularity::{
    EpochsPerDay, InsufficientDataPolicy, SeriesReader, SeriesRecord, SriConfig, SriEngine,
    SriError, SriReport, SriReportEncoder, ENGINE_VERSION,
};

/// SRI - Sleep Regularity Index for epoch-by-epoch sleep/wake data
#[derive(Parser)]
#[command(name = "sri")]
#[command(author = "Synheart AI Inc")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Compute the Sleep Regularity Index of sleep/wake series", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute SRI reports
    Compute {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "ndjson")]
        output_format: OutputFormat,

        #[command(flatten)]
        day: DayLengthArgs,

        /// Report NaN SRI and zero days instead of failing when no pair is comparable
        #[arg(long)]
        propagate_insufficient: bool,
    },

    /// Validate the sleep/wake encoding of each series
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print schema information
    Schema {
        /// Schema to print (input or output)
        #[arg(value_enum)]
        schema_type: SchemaType,

        /// Output as JSON schema
        #[arg(long)]
        json_schema: bool,
    },
}

#[derive(clap::Args)]
struct DayLengthArgs {
    /// Epochs in one 24-hour period (used when a record does not carry its own)
    #[arg(long, conflicts_with = "epoch_length_secs")]
    epochs_per_day: Option<usize>,

    /// Epoch length in seconds; must divide 24 hours
    #[arg(long)]
    epoch_length_secs: Option<i64>,
}

impl DayLengthArgs {
    fn resolve(&self) -> Result<Option<EpochsPerDay>, SriError> {
        match (self.epochs_per_day, self.epoch_length_secs) {
            (Some(n), _) => EpochsPerDay::new(n).map(Some),
            (None, Some(secs)) => EpochsPerDay::from_epoch_secs(secs).map(Some),
            (None, None) => Ok(None),
        }
    }
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one series record per line)
    Ndjson,
    /// JSON array of numbers, null for missing epochs
    Json,
    /// Whitespace or comma separated values, NaN/NA for missing epochs
    Text,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one report per line)
    Ndjson,
    /// JSON array of reports
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// Input schema (one NDJSON series record)
    Input,
    /// Output schema (SRI report)
    Output,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), SriCliError> {
    match cli.command {
        Commands::Compute {
            input,
            output,
            input_format,
            output_format,
            day,
            propagate_insufficient,
        } => {
            let policy = if propagate_insufficient {
                InsufficientDataPolicy::Propagate
            } else {
                InsufficientDataPolicy::Reject
            };
            cmd_compute(
                &input,
                &output,
                input_format,
                output_format,
                day.resolve()?,
                policy,
            )
        }

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::Schema {
            schema_type,
            json_schema,
        } => cmd_schema(schema_type, json_schema),
    }
}

fn cmd_compute(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: OutputFormat,
    fallback: Option<EpochsPerDay>,
    policy: InsufficientDataPolicy,
) -> Result<(), SriCliError> {
    let records = read_records(input, input_format)?;
    if records.is_empty() {
        return Err(SriCliError::NoSeries);
    }

    let engine = SriEngine::with_config(SriConfig {
        insufficient_data: policy,
    });
    let encoder = SriReportEncoder::new();

    let mut reports: Vec<SriReport> = Vec::with_capacity(records.len());
    for record in records {
        let n = record.resolve_epochs_per_day(fallback)?;
        let result = engine.compute(&record.values, n);
        let report = encoder.encode(result, record.subject_id, n.get(), record.values.len())?;
        reports.push(report);
    }

    let output_data = format_output(&reports, &output_format)?;

    if output.to_string_lossy() == "-" {
        print!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_validate(input: &Path, input_format: InputFormat, json: bool) -> Result<(), SriCliError> {
    let records = read_records(input, input_format)?;

    let errors: Vec<ValidationErrorDetail> = records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            EncodingValidator::validate(record.values.as_slice())
                .err()
                .map(|e| ValidationErrorDetail {
                    index,
                    subject_id: record.subject_id.clone(),
                    error: e.to_string(),
                })
        })
        .collect();

    let report = ValidationReport {
        total_series: records.len(),
        valid_series: records.len() - errors.len(),
        invalid_series: errors.len(),
        errors,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total series:   {}", report.total_series);
        println!("Valid series:   {}", report.valid_series);
        println!("Invalid series: {}", report.invalid_series);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!(
                    "  - Series {} (index {}): {}",
                    err.subject_id.as_deref().unwrap_or("unknown"),
                    err.index,
                    err.error
                );
            }
        }
    }

    if report.invalid_series > 0 {
        Err(SriCliError::ValidationFailed(report.invalid_series))
    } else {
        Ok(())
    }
}

fn cmd_schema(schema_type: SchemaType, json_schema: bool) -> Result<(), SriCliError> {
    match schema_type {
        SchemaType::Input => {
            if json_schema {
                println!("{}", get_input_json_schema());
            } else {
                println!("Input: epoch series");
                println!();
                println!("ndjson - one record per line:");
                println!("  - subject_id: optional identifier");
                println!("  - epochs_per_day: optional, epochs in 24 hours");
                println!("  - epoch_length_secs: optional, used when epochs_per_day is absent");
                println!("  - values: array of numbers, null for missing epochs");
                println!();
                println!("json - a bare array of numbers/null");
                println!("text - numbers separated by whitespace or commas;");
                println!("       NaN, NA, null, '.' or '-' mark missing epochs, '#' starts a comment");
                println!();
                println!("Values must use exactly two state codes (e.g. 0/1 or 1/-1).");
            }
        }
        SchemaType::Output => {
            if json_schema {
                println!("{}", get_output_json_schema());
            } else {
                println!("Output: SRI report");
                println!();
                println!("- producer: {{ name, version, instance_id }}");
                println!("- computed_at_utc, subject_id");
                println!("- status: ok | invalid_encoding | insufficient_data");
                println!("- epochs_per_day, series_len");
                println!("- state_codes: {{ low, high }}");
                println!("- valid_pairs, matches");
                println!("- sri: -100..100 (null when undefined)");
                println!("- days: valid comparison-days (null when undefined)");
                println!("- diagnostic: reason for an undefined result");
            }
        }
    }

    Ok(())
}

// Helper functions

fn read_records(input: &Path, format: InputFormat) -> Result<Vec<SeriesRecord>, SriCliError> {
    let input_data = if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    let records = match format {
        InputFormat::Ndjson => SeriesReader::parse_ndjson(&input_data)?,
        InputFormat::Json => vec![SeriesReader::parse_array(&input_data)?],
        InputFormat::Text => vec![SeriesReader::parse_text(&input_data)?],
    };

    Ok(records)
}

fn format_output(reports: &[SriReport], format: &OutputFormat) -> Result<String, SriCliError> {
    match format {
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for report in reports {
                lines.push(serde_json::to_string(report)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => Ok(serde_json::to_string(reports)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(reports)?),
    }
}

fn get_input_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "sri.series_record.v1",
        "description": "Epoch-by-epoch sleep/wake series",
        "type": "object",
        "required": ["values"],
        "properties": {
            "subject_id": { "type": "string" },
            "epochs_per_day": { "type": "integer", "minimum": 1 },
            "epoch_length_secs": { "type": "integer", "minimum": 1 },
            "values": {
                "type": "array",
                "items": { "type": ["number", "null"] }
            }
        }
    })
    .to_string()
}

fn get_output_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "sri.report.v1",
        "description": "Sleep Regularity Index report",
        "type": "object",
        "required": ["producer", "computed_at_utc", "status", "epochs_per_day", "series_len"],
        "properties": {
            "producer": {
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "version": { "type": "string" },
                    "instance_id": { "type": "string" }
                }
            },
            "computed_at_utc": { "type": "string", "format": "date-time" },
            "subject_id": { "type": "string" },
            "status": {
                "type": "string",
                "enum": ["ok", "invalid_encoding", "insufficient_data"]
            },
            "epochs_per_day": { "type": "integer" },
            "series_len": { "type": "integer" },
            "state_codes": {
                "type": ["object", "null"],
                "properties": {
                    "low": { "type": "number" },
                    "high": { "type": "number" }
                }
            },
            "valid_pairs": { "type": ["integer", "null"] },
            "matches": { "type": ["integer", "null"] },
            "sri": { "type": ["number", "null"], "minimum": -100, "maximum": 100 },
            "days": { "type": ["number", "null"], "minimum": 0 },
            "diagnostic": { "type": "string" }
        }
    })
    .to_string()
}

// Error types

#[derive(Debug)]
enum SriCliError {
    Io(io::Error),
    Compute(SriError),
    Json(serde_json::Error),
    NoSeries,
    ValidationFailed(usize),
}

impl From<io::Error> for SriCliError {
    fn from(e: io::Error) -> Self {
        SriCliError::Io(e)
    }
}

impl From<SriError> for SriCliError {
    fn from(e: SriError) -> Self {
        SriCliError::Compute(e)
    }
}

impl From<serde_json::Error> for SriCliError {
    fn from(e: serde_json::Error) -> Self {
        SriCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<SriCliError> for CliError {
    fn from(e: SriCliError) -> Self {
        match e {
            SriCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            SriCliError::Compute(e @ SriError::InvalidEpochsPerDay(_)) => CliError {
                code: "INVALID_EPOCHS_PER_DAY".to_string(),
                message: e.to_string(),
                hint: Some(
                    "Pass --epochs-per-day or --epoch-length-secs, or set it per record"
                        .to_string(),
                ),
            },
            SriCliError::Compute(e) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'sri schema input' for the accepted formats".to_string()),
            },
            SriCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            SriCliError::NoSeries => CliError {
                code: "NO_SERIES".to_string(),
                message: "No epoch series found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            SriCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} series failed validation", count),
                hint: Some("Each series must use exactly two state codes".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_series: usize,
    valid_series: usize,
    invalid_series: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    subject_id: Option<String>,
    error: String,
}
