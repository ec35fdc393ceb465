//! Glucotrend CLI - Command-line interface for glucotrend
//!
//! Commands:
//! - transform: Aggregate a reading stream into per-bin statistics records
//! - validate: Validate reading schema and domain invariants
//! - schema: Print schema information

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use glucotrend::datetime::THREE_HRS;
use glucotrend::ingest::ReadingAdapter;
use glucotrend::pipeline::{cbg_stats_by_bin, smbg_stats_by_bin};
use glucotrend::types::BinStats;
use glucotrend::{GLUCOTREND_VERSION, PRODUCER_NAME};

/// Glucotrend - time-of-day binning and statistics for glucose trends charts
#[derive(Parser)]
#[command(name = "glucotrend")]
#[command(author = "Glucolab Inc")]
#[command(version = GLUCOTREND_VERSION)]
#[command(about = "Aggregate glucose readings into per-bin trends statistics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate a reading stream into per-bin statistics records
    Transform {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long)]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "ndjson")]
        output_format: OutputFormat,

        /// Kind of readings in the input
        #[arg(long, default_value = "cbg")]
        data_type: DataType,

        /// Bin width in milliseconds (must divide 86400000 evenly)
        #[arg(long, default_value_t = THREE_HRS)]
        bin_size_ms: i64,
    },

    /// Validate reading schema and domain invariants
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

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one reading per line)
    Ndjson,
    /// JSON array of readings
    Json,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one bin record per line)
    Ndjson,
    /// JSON array of bin records
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[derive(Clone, ValueEnum)]
enum DataType {
    /// Continuous-glucose-monitor readings (quantile statistics)
    Cbg,
    /// Fingerstick meter readings (mean/min/max statistics)
    Smbg,
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// Input schema (glucose readings)
    Input,
    /// Output schema (per-bin statistics records)
    Output,
}

fn main() -> ExitCode {
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

fn run(cli: Cli) -> Result<(), GlucotrendCliError> {
    match cli.command {
        Commands::Transform {
            input,
            output,
            input_format,
            output_format,
            data_type,
            bin_size_ms,
        } => cmd_transform(
            &input,
            &output,
            input_format,
            output_format,
            data_type,
            bin_size_ms,
        ),

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

fn cmd_transform(
    input: &PathBuf,
    output: &PathBuf,
    input_format: InputFormat,
    output_format: OutputFormat,
    data_type: DataType,
    bin_size_ms: i64,
) -> Result<(), GlucotrendCliError> {
    let input_data = read_input(input)?;

    let readings = match input_format {
        InputFormat::Ndjson => ReadingAdapter::parse_ndjson(&input_data)?,
        InputFormat::Json => ReadingAdapter::parse_array(&input_data)?,
    };

    if readings.is_empty() {
        return Err(GlucotrendCliError::NoReadings);
    }

    let failures = ReadingAdapter::validate_readings(&readings);
    if !failures.is_empty() {
        return Err(GlucotrendCliError::ValidationFailed(failures.len()));
    }

    let records: Vec<BinStats> = match data_type {
        DataType::Cbg => cbg_stats_by_bin(&readings, bin_size_ms)?
            .into_iter()
            .map(BinStats::Cbg)
            .collect(),
        DataType::Smbg => smbg_stats_by_bin(&readings, bin_size_ms)?
            .into_iter()
            .map(BinStats::Smbg)
            .collect(),
    };

    let output_data = format_output(&records, &output_format)?;

    if output.to_string_lossy() == "-" {
        print!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_validate(
    input: &PathBuf,
    input_format: InputFormat,
    json: bool,
) -> Result<(), GlucotrendCliError> {
    let input_data = read_input(input)?;

    let readings = match input_format {
        InputFormat::Ndjson => ReadingAdapter::parse_ndjson(&input_data)?,
        InputFormat::Json => ReadingAdapter::parse_array(&input_data)?,
    };

    let failures = ReadingAdapter::validate_readings(&readings);

    let report = ValidationReport {
        total_readings: readings.len(),
        valid_readings: readings.len() - failures.len(),
        invalid_readings: failures.len(),
        errors: failures
            .iter()
            .map(|f| ValidationErrorDetail {
                index: f.index,
                reading_id: f.reading_id.clone(),
                error: f.error.to_string(),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total readings:   {}", report.total_readings);
        println!("Valid readings:   {}", report.valid_readings);
        println!("Invalid readings: {}", report.invalid_readings);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!(
                    "  - Reading {} (index {}): {}",
                    err.reading_id, err.index, err.error
                );
            }
        }
    }

    if report.invalid_readings > 0 {
        Err(GlucotrendCliError::ValidationFailed(report.invalid_readings))
    } else {
        Ok(())
    }
}

fn cmd_schema(schema_type: SchemaType, json_schema: bool) -> Result<(), GlucotrendCliError> {
    match schema_type {
        SchemaType::Input => {
            if json_schema {
                println!("{}", get_input_json_schema());
            } else {
                println!("Input Schema: glucose readings");
                println!();
                println!("Each reading carries:");
                println!();
                println!("- id: unique reading identifier");
                println!("- ms_per24: milliseconds since local midnight, in [0, 86400000)");
                println!("- value: glucose value in the caller's unit system");
                println!("- annotations: optional device annotations; an out-of-range");
                println!("  annotation (code \"bg/out-of-range\") carries value low|high");
                println!("  and the clamp threshold");
            }
        }
        SchemaType::Output => {
            if json_schema {
                println!("{}", get_output_json_schema());
            } else {
                println!("Output Schema: per-bin statistics records");
                println!();
                println!("One record per fixed time-of-day bin, tagged by data_type:");
                println!();
                println!("- cbg: {{ id, ms_x, ms_from, ms_to, min, tenth_quantile,");
                println!("  first_quartile, median, third_quartile, ninetieth_quantile, max }}");
                println!("- smbg: {{ id, ms_x, ms_from, ms_to, min, mean, max }}");
                println!();
                println!("Statistics are omitted for empty bins; out_of_range_thresholds");
                println!("{{ low?, high? }} appears only on bins containing clamped readings.");
            }
        }
    }

    Ok(())
}

// Helper functions

fn read_input(input: &PathBuf) -> Result<String, GlucotrendCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn format_output(
    records: &[BinStats],
    format: &OutputFormat,
) -> Result<String, GlucotrendCliError> {
    match format {
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for record in records {
                lines.push(serde_json::to_string(record)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => Ok(serde_json::to_string(records)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(records)?),
    }
}

fn get_input_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$id": "https://glucolab.dev/schemas/glucotrend.reading.v1.json",
        "title": "glucotrend.reading.v1",
        "description": "Glucotrend glucose reading schema",
        "type": "object",
        "required": ["id", "ms_per24", "value"],
        "properties": {
            "id": { "type": "string" },
            "ms_per24": {
                "type": "integer",
                "minimum": 0,
                "exclusiveMaximum": 86400000
            },
            "value": { "type": "number" },
            "annotations": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["code"],
                    "properties": {
                        "code": { "type": "string" },
                        "value": { "type": "string", "enum": ["low", "high"] },
                        "threshold": { "type": "number" }
                    }
                }
            }
        }
    })
    .to_string()
}

fn get_output_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$id": "https://glucolab.dev/schemas/glucotrend.bin_stats.v1.json",
        "title": "glucotrend.bin_stats.v1",
        "description": "Glucotrend per-bin statistics record",
        "type": "object",
        "required": ["data_type", "id", "ms_x", "ms_from", "ms_to"],
        "properties": {
            "data_type": { "type": "string", "enum": ["cbg", "smbg"] },
            "id": { "type": "string" },
            "ms_x": { "type": "integer" },
            "ms_from": { "type": "integer" },
            "ms_to": { "type": "integer" },
            "min": { "type": "number" },
            "tenth_quantile": { "type": "number" },
            "first_quartile": { "type": "number" },
            "median": { "type": "number" },
            "third_quartile": { "type": "number" },
            "ninetieth_quantile": { "type": "number" },
            "mean": { "type": "number" },
            "max": { "type": "number" },
            "out_of_range_thresholds": {
                "type": "object",
                "properties": {
                    "low": { "type": "number" },
                    "high": { "type": "number" }
                }
            }
        }
    })
    .to_string()
}

// Error types

#[derive(Debug)]
enum GlucotrendCliError {
    Io(io::Error),
    Trends(glucotrend::TrendsError),
    Json(serde_json::Error),
    NoReadings,
    ValidationFailed(usize),
}

impl From<io::Error> for GlucotrendCliError {
    fn from(e: io::Error) -> Self {
        GlucotrendCliError::Io(e)
    }
}

impl From<glucotrend::TrendsError> for GlucotrendCliError {
    fn from(e: glucotrend::TrendsError) -> Self {
        GlucotrendCliError::Trends(e)
    }
}

impl From<serde_json::Error> for GlucotrendCliError {
    fn from(e: serde_json::Error) -> Self {
        GlucotrendCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<GlucotrendCliError> for CliError {
    fn from(e: GlucotrendCliError) -> Self {
        match e {
            GlucotrendCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            GlucotrendCliError::Trends(e) => CliError {
                code: "TRENDS_ERROR".to_string(),
                message: e.to_string(),
                hint: Some(format!(
                    "Check ms_per24 offsets and bin size; run '{} validate' for details",
                    PRODUCER_NAME
                )),
            },
            GlucotrendCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            GlucotrendCliError::NoReadings => CliError {
                code: "NO_READINGS".to_string(),
                message: "No readings found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            GlucotrendCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} readings failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_readings: usize,
    valid_readings: usize,
    invalid_readings: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    reading_id: String,
    error: String,
}
