use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use photoprep_core::{ErrorMetadata, LogLevel, ProcessingOptions, ProcessingOverrides};
use photoprep_processing::{load_source, webp_filename, ProcessingPipeline};
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Read a JSON overrides file (`maxWidth`, `maxHeight`, `quality`, `maxFileSizeMB`)
pub fn load_overrides(path: &Path) -> anyhow::Result<ProcessingOverrides> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read overrides file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid overrides file {}", path.display()))
}

/// Environment-derived options, then the overrides file, then flags
pub fn resolve_options(
    base: ProcessingOptions,
    overrides_file: Option<&Path>,
    flags: &ProcessingOverrides,
) -> anyhow::Result<ProcessingOptions> {
    let mut options = base;
    if let Some(path) = overrides_file {
        options = options.merge(&load_overrides(path)?);
    }
    let options = options.merge(flags);

    options.validate().context("Invalid processing options")?;
    Ok(options)
}

/// Output location for `input` inside `out_dir`
pub fn output_path(out_dir: &Path, input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_else(|| "image".into());
    out_dir.join(webp_filename(&name))
}

/// One output per input, in order. Inputs that would land on the same name
/// get `-1`, `-2`, ... appended to the stem.
pub fn assign_output_paths(out_dir: &Path, inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut taken = HashSet::with_capacity(inputs.len());
    inputs
        .iter()
        .map(|input| {
            let mut candidate = output_path(out_dir, input);
            if taken.contains(&candidate) {
                let stem = candidate
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "image".to_string());
                candidate = (1..)
                    .map(|n| out_dir.join(format!("{}-{}.webp", stem, n)))
                    .find(|path| !taken.contains(path))
                    .unwrap_or(candidate);
            }
            taken.insert(candidate.clone());
            candidate
        })
        .collect()
}

/// Outcome of processing one file
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum FileReport {
    Ok {
        input: PathBuf,
        output: PathBuf,
        width: u32,
        height: u32,
        size_bytes: usize,
        quality: f32,
        attempts: u32,
    },
    Failed {
        input: PathBuf,
        code: String,
        message: String,
    },
}

impl FileReport {
    pub fn is_ok(&self) -> bool {
        matches!(self, FileReport::Ok { .. })
    }

    fn failed(input: &Path, code: &str, message: impl Into<String>) -> Self {
        FileReport::Failed {
            input: input.to_path_buf(),
            code: code.to_string(),
            message: message.into(),
        }
    }

    /// One-line human readable summary
    pub fn summary_line(&self) -> String {
        match self {
            FileReport::Ok {
                input,
                width,
                height,
                size_bytes,
                quality,
                attempts,
                ..
            } => format!(
                "{:<32} {:>5}x{:<5} {:>8.1} KiB  q={:.2} ({} attempt{})",
                truncate_string(&input.display().to_string(), 32),
                width,
                height,
                *size_bytes as f64 / 1024.0,
                quality,
                attempts,
                if *attempts == 1 { "" } else { "s" }
            ),
            FileReport::Failed {
                input,
                code,
                message,
            } => format!(
                "{:<32} FAILED {}: {}",
                truncate_string(&input.display().to_string(), 32),
                code,
                message
            ),
        }
    }
}

/// Load, process and write one file to `output`. Never fails; problems land
/// in the report.
pub async fn process_file(
    pipeline: &ProcessingPipeline,
    input: &Path,
    output: &Path,
) -> FileReport {
    let source = match load_source(input).await {
        Ok(source) => source,
        Err(e) => return FileReport::failed(input, "READ_FAILURE", format!("{:#}", e)),
    };

    let encoded = match pipeline.process(&source).await {
        Ok(encoded) => encoded,
        Err(e) => {
            let input_display = input.display();
            match e.log_level() {
                LogLevel::Debug => {
                    tracing::debug!(input = %input_display, error = %e, "Processing rejected")
                }
                LogLevel::Warn => {
                    tracing::warn!(input = %input_display, error = %e, "Processing failed")
                }
                LogLevel::Error => {
                    tracing::error!(input = %input_display, error = %e, "Processing failed")
                }
            }
            return FileReport::failed(input, e.error_code(), e.client_message());
        }
    };

    if let Err(e) = tokio::fs::write(output, &encoded.data).await {
        return FileReport::failed(
            input,
            "WRITE_FAILURE",
            format!("Failed to write {}: {}", output.display(), e),
        );
    }

    FileReport::Ok {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        width: encoded.width,
        height: encoded.height,
        size_bytes: encoded.size_bytes(),
        quality: encoded.quality,
        attempts: encoded.attempts,
    }
}

/// Process `files` into `out_dir` with at most `jobs` files in flight.
/// Reports come back in input order.
pub async fn process_all(
    pipeline: &ProcessingPipeline,
    files: Vec<PathBuf>,
    out_dir: &Path,
    jobs: usize,
) -> anyhow::Result<Vec<FileReport>> {
    let outputs = assign_output_paths(out_dir, &files);
    let permits = Arc::new(Semaphore::new(jobs.max(1)));

    let mut tasks = JoinSet::new();
    for (index, (file, output)) in files.into_iter().zip(outputs).enumerate() {
        let pipeline = pipeline.clone();
        let permits = Arc::clone(&permits);
        tasks.spawn(async move {
            let _permit = permits.acquire_owned().await;
            (index, process_file(&pipeline, &file, &output).await)
        });
    }

    let mut reports = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        reports.push(joined.context("Processing task panicked")?);
    }
    reports.sort_by_key(|(index, _)| *index);

    Ok(reports.into_iter().map(|(_, report)| report).collect())
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
