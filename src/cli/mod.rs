//! RECAPP CLI Module
//!
//! Command-line front end: run the server, or run the prediction pipeline
//! against a local CSV file.

use clap::{Args, Parser, Subcommand};
use colored::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::dataset::ColumnKind;
use crate::pipeline::{DatasetInfo, Pipeline, PipelineConfig};
use crate::preprocessing::PreprocessingConfig;
use crate::summary::LabelCount;
use crate::training::{PredictionRequest, TrainingConfig};

// ─── Styling helpers ───────────────────────────────────────────────────────────

const W: usize = 58; // box inner width

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn line_box_top()    { println!("  {}", dim("┌─────────────────────────────────────────────────────────┐")); }
fn line_box_bottom() { println!("  {}", dim("└─────────────────────────────────────────────────────────┘")); }
fn line_box_sep()    { println!("  {}", dim("├─────────────────────────────────────────────────────────┤")); }

fn line_box(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let pad = W.saturating_sub(visible_len);
    println!("  {}  {}{} {}", dim("│"), content, " ".repeat(pad), dim("│"));
}

fn line_box_center(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let total_pad = W.saturating_sub(visible_len);
    let left = total_pad / 2;
    let right = total_pad - left;
    println!("  {}  {}{}{} {}", dim("│"), " ".repeat(left), content, " ".repeat(right), dim("│"));
}

fn line_box_empty() { line_box(""); }

fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut in_escape = false;
    for c in s.chars() {
        if c == '\x1b' { in_escape = true; continue; }
        if in_escape { if c == 'm' { in_escape = false; } continue; }
        out.push(c);
    }
    out
}

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "recapp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Upload a CSV dataset and get decision-tree predictions from it")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Server port [env: API_PORT, default 8080]
        #[arg(short, long)]
        port: Option<u16>,

        /// Server host [env: API_HOST, default 0.0.0.0]
        #[arg(long)]
        host: Option<String>,

        /// Directory holding the uploaded dataset [env: MEDIA_DIR, default ./media]
        #[arg(long)]
        media_dir: Option<PathBuf>,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Train on a local CSV and predict one row
    Predict {
        /// Input CSV file
        #[arg(short, long)]
        data: PathBuf,

        /// Feature value as key=value, repeatable
        #[arg(short, long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,

        /// Name echoed back in the result
        #[arg(short, long)]
        name: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Show the label distribution of a CSV file
    Summary {
        /// Input CSV file
        #[arg(short, long)]
        data: PathBuf,
    },

    /// Show columns and prediction input fields of a CSV file
    Info {
        /// Input CSV file
        #[arg(short, long)]
        data: PathBuf,
    },
}

/// Preprocessing and training overrides
#[derive(Args, Debug, Clone, Default)]
pub struct PipelineArgs {
    /// IQR multiplier for outlier removal
    #[arg(long)]
    pub iqr_factor: Option<f64>,

    /// Fraction of rows held out for evaluation
    #[arg(long)]
    pub test_size: Option<f64>,

    /// Seed for the train/test shuffle
    #[arg(long)]
    pub seed: Option<u64>,

    /// Maximum decision tree depth
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Minimum samples per leaf
    #[arg(long)]
    pub min_samples_leaf: Option<usize>,
}

impl PipelineArgs {
    pub fn to_config(&self) -> PipelineConfig {
        let mut preprocessing = PreprocessingConfig::default();
        if let Some(factor) = self.iqr_factor {
            preprocessing = preprocessing.with_iqr_factor(factor);
        }

        let mut training = TrainingConfig::default();
        if let Some(test_size) = self.test_size {
            training = training.with_test_size(test_size);
        }
        if let Some(seed) = self.seed {
            training = training.with_random_seed(seed);
        }
        if let Some(depth) = self.max_depth {
            training = training.with_max_depth(depth);
        }
        if let Some(min_leaf) = self.min_samples_leaf {
            training = training.with_min_samples_leaf(min_leaf);
        }

        PipelineConfig::new()
            .with_preprocessing(preprocessing)
            .with_training(training)
    }
}

/// Parse a `key=value` feature argument.
pub fn parse_field(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_predict(
    data_path: &Path,
    fields: Vec<(String, String)>,
    name: Option<String>,
    json: bool,
    config: PipelineConfig,
) -> anyhow::Result<()> {
    config.validate()?;
    let pipeline = Pipeline::new(config);
    let mut request = PredictionRequest::from_fields(fields.into_iter().collect::<BTreeMap<_, _>>());
    if name.is_some() {
        request.name = name;
    }

    if json {
        let table = pipeline.load_path(data_path)?;
        let result = pipeline.predict_table(&table, &request)?;
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    section("Predict");

    step_run("Loading data");
    let start = Instant::now();
    let table = pipeline.load_path(data_path)?;
    step_done(&format!("{} rows × {} cols in {:?}", table.height(), table.width(), start.elapsed()));

    step_run("Cleaning, training and predicting");
    let start = Instant::now();
    let result = pipeline.predict_table(&table, &request)?;
    step_done(&format!("{:?}", start.elapsed()));

    println!();
    if let Some(ref nama) = result.nama {
        println!("  {:<16} {}", muted("Name"), nama.white());
    }
    println!("  {:<16} {}", muted("Prediction"), result.prediction.white().bold());
    println!("  {:<16} {}", muted("Accuracy"), format!("{:.4}", result.accuracy).white());
    println!("  {:<16} {}", muted("Train / test"), format!("{} / {}", result.data_train, result.data_test).white());

    section("Classification report");
    for line in result.report.to_string().lines() {
        println!("  {}", line);
    }
    println!();

    Ok(())
}

pub fn cmd_summary(data_path: &Path) -> anyhow::Result<()> {
    section("Summary");

    let pipeline = Pipeline::default();
    let table = pipeline.load_path(data_path)?;
    let counts: Vec<LabelCount> = crate::summary::label_counts(&table);
    let label_name = table.last_column().map(|c| c.name().to_string()).unwrap_or_default();

    println!("  {:<24} {:>10}", muted(&label_name), muted("Count"));
    println!("  {}", dim(&"─".repeat(36)));
    for c in &counts {
        println!("  {:<24} {:>10}", c.label, c.count);
    }
    println!("  {}", dim(&"─".repeat(36)));
    println!("  {:<24} {:>10}", muted("total"), counts.iter().map(|c| c.count).sum::<usize>());
    println!();

    Ok(())
}

pub fn cmd_info(data_path: &Path) -> anyhow::Result<()> {
    section("Dataset info");

    let pipeline = Pipeline::default();
    let table = pipeline.load_path(data_path)?;
    let info = DatasetInfo::describe(file_name(data_path), &table);

    println!("  {:<16} {}", muted("File"), info.filename.white());
    println!("  {:<16} {}", muted("Rows"), info.rows.to_string().white());
    println!("  {:<16} {}", muted("Columns"), info.columns.to_string().white());

    section("Columns");
    println!("  {:<24} {:<20} {:>8}", muted("Name"), muted("Key"), muted("Type"));
    for column in table.columns() {
        let kind = match column.kind() {
            ColumnKind::Integer => "integer",
            ColumnKind::Float => "float",
            ColumnKind::Text => "text",
        };
        println!("  {:<24} {:<20} {:>8}", column.name(), column.key(), kind);
    }

    section("Prediction fields");
    if info.input_label.is_empty() {
        println!("  {}", dim("none: dataset needs more than three columns"));
    }
    for field in &info.input_label {
        println!("  {} {}", accent(&field.key), dim(&format!("({})", field.name)));
    }
    println!();

    Ok(())
}

pub async fn cmd_serve(
    host: Option<String>,
    port: Option<u16>,
    media_dir: Option<PathBuf>,
    pipeline: PipelineConfig,
) -> anyhow::Result<()> {
    use crate::server::{run_server, ServerConfig};

    let defaults = ServerConfig::default();
    let config = ServerConfig {
        host: host.unwrap_or(defaults.host),
        port: port.unwrap_or(defaults.port),
        media_dir: media_dir.unwrap_or(defaults.media_dir),
        max_upload_size: defaults.max_upload_size,
    };

    println!();
    line_box_top();
    line_box_empty();
    line_box_center(&format!("{}", "RECAPP".white().bold()));
    line_box_center(&format!("{}", dim(&format!("v{}", env!("CARGO_PKG_VERSION")))));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box(&kv("API    ", &format!("http://{}:{}/api", config.host, config.port)));
    line_box(&kv("Health ", &format!("http://{}:{}/api/health", config.host, config.port)));
    line_box(&kv("Media  ", &config.media_dir.display().to_string()));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box_center(&format!("{}", dim("ctrl+c to stop")));
    line_box_empty();
    line_box_bottom();
    println!();

    run_server(config, pipeline).await
}
