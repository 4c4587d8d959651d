//! Configuration module
//!
//! Processing options for the ingestion pipeline. Defaults are merged with
//! caller overrides field by field; the environment can shift the defaults
//! for a whole deployment.

use std::env;

use serde::Deserialize;

// Common constants
const MAX_WIDTH: u32 = 1200;
const MAX_HEIGHT: u32 = 1600;
const QUALITY: f32 = 0.85;
const MAX_FILE_SIZE_MB: f64 = 10.0;

/// Options recognized by the pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProcessingOptions {
    /// Upper bound on the planned (pre-orientation) width
    pub max_width: u32,
    /// Upper bound on the planned (pre-orientation) height
    pub max_height: u32,
    /// Starting encoder quality, in (0, 1]
    pub quality: f32,
    /// Largest accepted input file, in MiB
    pub max_file_size_mb: f64,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            max_width: MAX_WIDTH,
            max_height: MAX_HEIGHT,
            quality: QUALITY,
            max_file_size_mb: MAX_FILE_SIZE_MB,
        }
    }
}

/// Caller-supplied overrides; unset fields keep the base value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProcessingOverrides {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub quality: Option<f32>,
    #[serde(rename = "maxFileSizeMB")]
    pub max_file_size_mb: Option<f64>,
}

impl ProcessingOptions {
    /// Defaults with environment overrides applied (`PHOTOPREP_*`, `.env` honored)
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build options from an arbitrary key lookup. Absent or unparsable
    /// values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            max_width: lookup("PHOTOPREP_MAX_WIDTH")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.max_width),
            max_height: lookup("PHOTOPREP_MAX_HEIGHT")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.max_height),
            quality: lookup("PHOTOPREP_QUALITY")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.quality),
            max_file_size_mb: lookup("PHOTOPREP_MAX_FILE_SIZE_MB")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.max_file_size_mb),
        }
    }

    /// Merge overrides over `self`, field by field.
    pub fn merge(self, overrides: &ProcessingOverrides) -> Self {
        Self {
            max_width: overrides.max_width.unwrap_or(self.max_width),
            max_height: overrides.max_height.unwrap_or(self.max_height),
            quality: overrides.quality.unwrap_or(self.quality),
            max_file_size_mb: overrides.max_file_size_mb.unwrap_or(self.max_file_size_mb),
        }
    }

    /// Defaults merged with overrides
    pub fn with_overrides(overrides: &ProcessingOverrides) -> Self {
        Self::default().merge(overrides)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(anyhow::anyhow!(
                "maxWidth and maxHeight must be greater than zero (got {}x{})",
                self.max_width,
                self.max_height
            ));
        }

        if !(self.quality > 0.0 && self.quality <= 1.0) {
            return Err(anyhow::anyhow!(
                "quality must be in (0, 1] (got {})",
                self.quality
            ));
        }

        if !(self.max_file_size_mb > 0.0 && self.max_file_size_mb.is_finite()) {
            return Err(anyhow::anyhow!(
                "maxFileSizeMB must be a positive number (got {})",
                self.max_file_size_mb
            ));
        }

        Ok(())
    }
}
