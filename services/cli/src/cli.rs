use std::path::PathBuf;

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

use scangrade::config::AppConfig;
use scangrade::error::AppError;
use scangrade::grading::ingest::{
    error_preview, import_answer_keys_path, import_identifiers_path, import_responses_path,
    link_responses, Area, FileImport, ImportError, ParseDiagnostic,
};
use scangrade::grading::roster::read_roster_path;
use scangrade::grading::scoring::{
    merge_overrides, read_weighting_overrides_path, standard_weightings, ScoringConfig,
    ScoringEngine,
};
use scangrade::telemetry;

use crate::report;

#[derive(Parser, Debug)]
#[command(
    name = "scangrade",
    about = "Grade optical-scan admission exam sheets from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse scan files and report rows, observations, and diagnostics
    Inspect(InspectArgs),
    /// Import scan data and compute weighted scores for one area
    Grade(GradeArgs),
}

#[derive(Args, Debug)]
pub(crate) struct InspectArgs {
    /// Treat the files as identification sheets instead of response sheets
    #[arg(long)]
    pub(crate) identification: bool,
    /// Print parsed rows as JSON instead of the text report
    #[arg(long)]
    pub(crate) json: bool,
    /// Scan files (.dat) to parse
    #[arg(required = true)]
    pub(crate) files: Vec<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct GradeArgs {
    /// Roster CSV with national id, surnames, given names, and area columns
    #[arg(long)]
    pub(crate) roster: PathBuf,
    /// Identification scan files (.dat)
    #[arg(long = "identifications", num_args = 1.., required = true)]
    pub(crate) identification_files: Vec<PathBuf>,
    /// Response scan files (.dat)
    #[arg(long = "responses", num_args = 1.., required = true)]
    pub(crate) response_files: Vec<PathBuf>,
    /// Identification file of the answer-key scan pair
    #[arg(long)]
    pub(crate) key_identification: PathBuf,
    /// Response file of the answer-key scan pair
    #[arg(long)]
    pub(crate) key_responses: PathBuf,
    /// Area the answer-key pair belongs to (defaults to --area)
    #[arg(long)]
    pub(crate) key_area: Option<String>,
    /// Area to grade
    #[arg(long)]
    pub(crate) area: String,
    /// Points for a correct answer (defaults to configuration)
    #[arg(long)]
    pub(crate) correct: Option<f64>,
    /// Points for a wrong answer (defaults to configuration)
    #[arg(long)]
    pub(crate) incorrect: Option<f64>,
    /// Points for a blank or invalid mark (defaults to configuration)
    #[arg(long)]
    pub(crate) blank: Option<f64>,
    /// Weighting override CSV (area,subject,question_count,weight,order)
    #[arg(long)]
    pub(crate) weightings: Option<PathBuf>,
    /// Print the run as JSON instead of the text report
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let cli = Cli::parse();
    match cli.command {
        Command::Inspect(args) => run_inspect(args),
        Command::Grade(args) => run_grade(args, &config),
    }
}

fn run_inspect(args: InspectArgs) -> Result<(), AppError> {
    let imported_at = Utc::now();
    let mut errors = Vec::new();

    for path in &args.files {
        if args.identification {
            match import_identifiers_path(path, imported_at) {
                Ok(import) => report_inspection(&import, args.json)?,
                Err(err) => record_file_error(err, &mut errors),
            }
        } else {
            match import_responses_path(path, imported_at) {
                Ok(import) => report_inspection(&import, args.json)?,
                Err(err) => record_file_error(err, &mut errors),
            }
        }
    }

    if let Some(preview) = error_preview(&errors) {
        println!("\nimport errors: {preview}");
    }

    Ok(())
}

fn report_inspection<T: serde::Serialize + report::InspectRow>(
    import: &FileImport<T>,
    json: bool,
) -> Result<(), AppError> {
    if json {
        println!("{}", serde_json::to_string_pretty(&import.rows)?);
    } else {
        report::render_file_import(import);
    }
    Ok(())
}

fn run_grade(args: GradeArgs, config: &AppConfig) -> Result<(), AppError> {
    let run_at = Utc::now();
    let area = Area::normalized(&args.area);
    let mut errors = Vec::new();

    let identifiers = import_sheet_batch(
        &args.identification_files,
        &mut errors,
        |path| import_identifiers_path(path, run_at),
    );
    let mut responses = import_sheet_batch(
        &args.response_files,
        &mut errors,
        |path| import_responses_path(path, run_at),
    );

    link_responses(&identifiers, &mut responses);

    let key_area = args
        .key_area
        .as_deref()
        .map(Area::normalized)
        .unwrap_or(area);
    let keys = import_answer_keys_path(
        key_area,
        &args.key_identification,
        &args.key_responses,
        run_at,
    )?;
    collect_diagnostics(
        &keys.summary.identification_name,
        &keys.identification_diagnostics,
        &mut errors,
    );
    collect_diagnostics(&keys.summary.name, &keys.response_diagnostics, &mut errors);

    let roster = read_roster_path(&args.roster)?;
    info!(rows = roster.len(), "roster loaded");

    let mut entries = standard_weightings();
    if let Some(path) = &args.weightings {
        let overrides = read_weighting_overrides_path(path)?;
        entries = merge_overrides(&entries, &overrides);
    }

    let engine = ScoringEngine::new(ScoringConfig {
        area,
        correct_value: args.correct.unwrap_or(config.score_values.correct),
        incorrect_value: args.incorrect.unwrap_or(config.score_values.incorrect),
        blank_value: args.blank.unwrap_or(config.score_values.blank),
    });
    let run = engine.score(&roster, &responses, &keys.rows, &entries, run_at)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&run)?);
    } else {
        report::render_run(&run);
        if let Some(preview) = error_preview(&errors) {
            println!("\nimport errors: {preview}");
        }
    }

    Ok(())
}

/// Imports a batch of scan files in submission order. A file that cannot be
/// read is reported and skipped; the rest of the batch continues.
fn import_sheet_batch<T, F>(paths: &[PathBuf], errors: &mut Vec<String>, import: F) -> Vec<T>
where
    F: Fn(&PathBuf) -> Result<FileImport<T>, ImportError>,
{
    let mut rows = Vec::new();
    for path in paths {
        match import(path) {
            Ok(file_import) => {
                collect_diagnostics(&file_import.summary.name, &file_import.diagnostics, errors);
                if file_import.rows.is_empty() && file_import.diagnostics.is_empty() {
                    errors.push(format!(
                        "{}: no valid records found",
                        file_import.summary.name
                    ));
                }
                info!(
                    file = %file_import.summary.name,
                    rows = file_import.summary.valid_rows,
                    diagnostics = file_import.summary.error_count,
                    "scan file imported"
                );
                rows.extend(file_import.rows);
            }
            Err(err) => record_file_error(err, errors),
        }
    }
    rows
}

fn collect_diagnostics(name: &str, diagnostics: &[ParseDiagnostic], errors: &mut Vec<String>) {
    errors.extend(
        diagnostics
            .iter()
            .map(|diagnostic| format!("{name}: {diagnostic}")),
    );
}

fn record_file_error(err: ImportError, errors: &mut Vec<String>) {
    error!("{err}");
    errors.push(err.to_string());
}
