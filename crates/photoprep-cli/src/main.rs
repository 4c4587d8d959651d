//! photoprep: prepare photos for upload.
//!
//! Reads PHOTOPREP_MAX_WIDTH, PHOTOPREP_MAX_HEIGHT, PHOTOPREP_QUALITY and
//! PHOTOPREP_MAX_FILE_SIZE_MB (or a `.env` file); flags win over both.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use photoprep_cli::{init_tracing, process_all, resolve_options};
use photoprep_core::error::summarize;
use photoprep_core::{ProcessingOptions, ProcessingOverrides};
use photoprep_processing::{load_source, ProcessingPipeline};
use serde::Serialize;

#[derive(Parser)]
#[command(
    name = "photoprep",
    about = "Orient, downscale and compress photos to WebP"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process image files and write .webp outputs
    Process {
        /// Input image files
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Directory for the .webp outputs
        #[arg(long, short = 'o', default_value = ".")]
        out_dir: PathBuf,
        /// Print a JSON report instead of a table
        #[arg(long)]
        json: bool,
        /// Files processed at once (defaults to the number of CPUs)
        #[arg(long, short = 'j', value_parser = clap::value_parser!(u16).range(1..))]
        jobs: Option<u16>,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Show what processing would do to a file, without encoding
    Inspect {
        /// Input image file
        file: PathBuf,
        #[command(flatten)]
        options: OptionArgs,
    },
}

#[derive(Args)]
struct OptionArgs {
    /// Maximum width before orientation
    #[arg(long)]
    max_width: Option<u32>,
    /// Maximum height before orientation
    #[arg(long)]
    max_height: Option<u32>,
    /// Starting quality, in (0, 1]
    #[arg(long)]
    quality: Option<f32>,
    /// Largest accepted input, in MiB
    #[arg(long)]
    max_file_size_mb: Option<f64>,
    /// JSON file with option overrides
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl OptionArgs {
    fn resolve(&self) -> anyhow::Result<ProcessingOptions> {
        let flags = ProcessingOverrides {
            max_width: self.max_width,
            max_height: self.max_height,
            quality: self.quality,
            max_file_size_mb: self.max_file_size_mb,
        };
        resolve_options(ProcessingOptions::from_env(), self.config.as_deref(), &flags)
    }
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize report")?;
    println!("{}", out);
    Ok(())
}

fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

async fn run_process(
    files: Vec<PathBuf>,
    out_dir: &Path,
    json: bool,
    jobs: usize,
    options: ProcessingOptions,
) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let pipeline = ProcessingPipeline::new(options);
    let reports = process_all(&pipeline, files, out_dir, jobs).await?;

    if json {
        print_json(&reports)?;
    } else {
        for report in &reports {
            println!("{}", report.summary_line());
        }
    }

    let failed = reports.iter().filter(|report| !report.is_ok()).count();
    if failed > 0 {
        anyhow::bail!("{} of {} files failed", failed, reports.len());
    }

    Ok(())
}

async fn run_inspect(file: &Path, options: ProcessingOptions) -> anyhow::Result<()> {
    let source = load_source(file).await?;
    let plan = match ProcessingPipeline::new(options).inspect(&source) {
        Ok(plan) => plan,
        Err(e) => anyhow::bail!("Cannot process {}: {}", file.display(), summarize(&e)),
    };
    print_json(&plan)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            files,
            out_dir,
            json,
            jobs,
            options,
        } => {
            let options = options.resolve()?;
            let jobs = jobs.map(usize::from).unwrap_or_else(default_jobs);
            tracing::debug!(?options, jobs, "Resolved processing options");
            run_process(files, &out_dir, json, jobs, options).await?;
        }
        Commands::Inspect { file, options } => {
            run_inspect(&file, options.resolve()?).await?;
        }
    }

    Ok(())
}
