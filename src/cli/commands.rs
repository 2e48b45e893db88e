// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the four subcommands: `predict`, `random`, `batch`
// and `schema`, plus the flags every command shares.
//
// Flags given on the command line win over the --config file,
// which wins over built-in defaults.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::domain::fields::InputVariant;
use crate::infra::config::ServiceConfig;

/// The top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Predict attrition for one employee record
    Predict(PredictArgs),

    /// Predict for a randomly generated record
    Random(RandomArgs),

    /// Predict for JSON lines read from a file or stdin
    Batch(BatchArgs),

    /// Show the column order inputs are aligned to
    Schema,
}

/// Flags shared by every subcommand
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// XGBoost JSON model file
    #[arg(long, global = true, env = "ATTRITION_MODEL_PATH")]
    pub model: Option<PathBuf>,

    /// Input fields requests carry: standard (10 fields) or legacy (8 fields)
    #[arg(long, global = true)]
    pub variant: Option<InputVariant>,

    /// JSON service configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Append every served prediction to this CSV file
    #[arg(long, global = true)]
    pub audit_log: Option<PathBuf>,
}

impl GlobalArgs {
    /// Config file (if any) with explicit flags applied on top.
    pub fn service_config(&self) -> Result<ServiceConfig> {
        let mut cfg = match &self.config {
            Some(path) => ServiceConfig::load(path)?,
            None       => ServiceConfig::default(),
        };

        if let Some(model) = &self.model {
            cfg.model_path = model.clone();
        }
        if let Some(variant) = self.variant {
            cfg.variant = variant;
        }
        if let Some(audit) = &self.audit_log {
            cfg.audit_log = Some(audit.clone());
        }
        Ok(cfg)
    }
}

/// Exactly one way of supplying the record
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct RequestSource {
    /// Record as a JSON object; absent numeric fields take defaults
    #[arg(long, value_name = "JSON")]
    pub input: Option<String>,

    /// File holding the record as a JSON object
    #[arg(long, value_name = "PATH")]
    pub input_file: Option<PathBuf>,

    /// Form-style field, repeatable; every numeric field is required
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_key_val)]
    pub set: Vec<(String, String)>,
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    #[command(flatten)]
    pub source: RequestSource,

    /// Print the response as one JSON object
    #[arg(long)]
    pub json: bool,
}

/// All arguments for the `random` command
#[derive(Args, Debug)]
pub struct RandomArgs {
    /// Seed for a reproducible record
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the response as one JSON object
    #[arg(long)]
    pub json: bool,
}

/// All arguments for the `batch` command
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// JSON-lines file; stdin when omitted
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Number of worker threads
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u16).range(1..))]
    pub workers: u16,
}

/// Parse `FIELD=VALUE`; the value may itself contain '='.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field name in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
