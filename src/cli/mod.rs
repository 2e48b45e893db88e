// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Four commands are supported:
//   1. `predict` — one record, as JSON or as FIELD=VALUE pairs
//   2. `random`  — a randomly generated record
//   3. `batch`   — JSON lines in, JSON lines out
//   4. `schema`  — the column order the model expects
//
// Results go to stdout; logs go to stderr.

// Declare the commands submodule
pub mod commands;

use std::fs;
use std::io::{self, BufRead, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use commands::{BatchArgs, Commands, GlobalArgs, PredictArgs, RandomArgs};

use crate::application::{
    batch_use_case::BatchUseCase,
    predict_use_case::{ApiResponse, PredictUseCase},
};
use crate::data::sampler::RandomInputSampler;
use crate::domain::{
    prediction::{PredictionOutcome, SchemaOrigin},
    raw_input::RawInput,
};
use crate::error::PipelineError;

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "attrition-predictor",
    version,
    about = "Predict employee attrition risk with a trained XGBoost model."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Build the shared use case and dispatch to the subcommand.
    pub fn run(self) -> Result<()> {
        let cfg      = self.global.service_config()?;
        let use_case = PredictUseCase::from_config(&cfg)?;

        match self.command {
            Commands::Predict(args) => run_predict(&use_case, args),
            Commands::Random(args)  => run_random(&use_case, args),
            Commands::Batch(args)   => run_batch(&use_case, args),
            Commands::Schema        => run_schema(&use_case),
        }
    }
}

/// Handles the `predict` subcommand.
fn run_predict(use_case: &PredictUseCase, args: PredictArgs) -> Result<()> {
    let source = args.source;

    let (input, result) = if !source.set.is_empty() {
        let input  = RawInput::from_form(source.set);
        let result = use_case.encode_and_predict_form(&input);
        (input, result)
    } else {
        let body = match (source.input, source.input_file) {
            (Some(json), _)    => json,
            (None, Some(path)) => fs::read_to_string(&path)
                .with_context(|| format!("Cannot read input file '{}'", path.display()))?,
            (None, None)       => anyhow::bail!("no input given"),
        };
        let input  = RawInput::from_json_str(&body).context("Input is not a JSON object")?;
        let result = use_case.encode_and_predict(&input);
        (input, result)
    };

    report(&input, result, args.json)
}

/// Handles the `random` subcommand.
fn run_random(use_case: &PredictUseCase, args: RandomArgs) -> Result<()> {
    let sampler = RandomInputSampler::new(use_case.variant());
    let input = match args.seed {
        Some(seed) => sampler.sample_seeded(seed),
        None       => sampler.sample(),
    };

    if !args.json {
        println!("Generated record:");
        for name in input.field_names() {
            if let Some(value) = input.get(name) {
                println!("  {name:<24} {value}");
            }
        }
    }

    let result = use_case.encode_and_predict(&input);
    report(&input, result, args.json)
}

/// Handles the `batch` subcommand.
fn run_batch(use_case: &PredictUseCase, args: BatchArgs) -> Result<()> {
    let lines: Vec<String> = match &args.file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Cannot read batch file '{}'", path.display()))?
            .lines()
            .map(str::to_string)
            .collect(),
        None => io::stdin()
            .lock()
            .lines()
            .collect::<io::Result<_>>()
            .context("Cannot read batch input from stdin")?,
    };

    tracing::info!("Processing {} lines with {} workers", lines.len(), args.workers);
    let (out, _summary) = BatchUseCase::new(use_case, usize::from(args.workers)).run(&lines);

    let mut stdout = BufWriter::new(io::stdout().lock());
    for line in &out {
        serde_json::to_writer(&mut stdout, line)?;
        writeln!(stdout)?;
    }
    stdout.flush()?;
    Ok(())
}

/// Handles the `schema` subcommand.
fn run_schema(use_case: &PredictUseCase) -> Result<()> {
    let (columns, origin) = use_case.active_schema()?;

    match &origin {
        SchemaOrigin::Model => {
            println!("Schema from model ({} columns):", columns.len());
        }
        SchemaOrigin::Fallback { reason } => {
            println!("Fallback schema ({} columns), {}:", columns.len(), reason);
        }
    }
    for (i, column) in columns.iter().enumerate() {
        println!("{:>4}  {}", i, column);
    }
    Ok(())
}

/// Print one prediction; a failed request is also a failed command.
fn report(
    input:  &RawInput,
    result: std::result::Result<PredictionOutcome, PipelineError>,
    json:   bool,
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(&ApiResponse::from_outcome(input, &result))?);
    }

    let outcome = result?;
    if !json {
        println!("\nPrediction: {}", outcome.result.label);
        println!("Confidence: {}", outcome.result.confidence());
        if let SchemaOrigin::Fallback { reason } = &outcome.schema_origin {
            println!("(columns aligned to the fallback order: {reason})");
        }
    }
    Ok(())
}
