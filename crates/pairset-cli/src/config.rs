//! Configuration file support for pairset.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/pairset/config.toml` (lowest priority)
//! - Project-local: `.pairset.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use pairset_core::{CurationError, SplitRatios, ThresholdPreset};
use serde::Deserialize;
use tracing::{debug, info};

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Quality gate settings.
    pub quality: QualityConfig,
    /// Split settings.
    pub split: SplitSection,
    /// Input and output locations.
    pub paths: PathsConfig,
    /// Output formatting settings.
    pub output: OutputConfig,
}

/// Quality threshold configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Named threshold preset: "document" or "strict".
    pub preset: Option<String>,
    /// Minimum Laplacian variance (exclusive).
    pub blur_floor: Option<f64>,
    /// Lower brightness bound (exclusive).
    pub brightness_low: Option<f64>,
    /// Upper brightness bound (exclusive).
    pub brightness_high: Option<f64>,
    /// Minimum grayscale standard deviation (exclusive).
    pub contrast_floor: Option<f64>,
    /// Set to false to drop the contrast gate.
    pub contrast_check: Option<bool>,
}

/// Split configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct SplitSection {
    /// "stratified" or "uniform".
    pub policy: Option<String>,
    /// Shuffle seed.
    pub seed: Option<u64>,
    /// Split Poor pairs as their own stratum.
    pub include_poor_pairs: Option<bool>,
    /// Ratios for the uniform policy.
    pub ratios: Option<RatiosConfig>,
    /// Ratios for the Good stratum.
    pub good_ratios: Option<RatiosConfig>,
    /// Ratios for the Poor stratum.
    pub poor_ratios: Option<RatiosConfig>,
}

/// A `{ train, val, test }` ratio table.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RatiosConfig {
    pub train: f64,
    pub val: f64,
    pub test: f64,
}

impl RatiosConfig {
    /// Validates the table.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the ratios are invalid.
    pub fn to_ratios(self) -> Result<SplitRatios, CurationError> {
        SplitRatios::new(self.train, self.val, self.test)
    }
}

/// Path configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Front scans directory.
    pub front_dir: Option<PathBuf>,
    /// Back scans directory.
    pub back_dir: Option<PathBuf>,
    /// Quality report CSV.
    pub quality_report: Option<PathBuf>,
    /// Dataset output root.
    pub output_root: Option<PathBuf>,
    /// Orphan review root.
    pub review_root: Option<PathBuf>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "text" or "json".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
    /// Show progress bar.
    pub progress: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/pairset/config.toml`
    /// 2. Project-local: `.pairset.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored; unreadable or unparsable files are
    /// logged as warnings. Values are checked separately by [`Self::validate`].
    pub fn load() -> Self {
        let mut config = Self::default();

        // Load XDG config (lowest priority)
        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        // Load project-local config (higher priority, merged)
        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        config
    }

    /// Checks names and ratio tables.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the offending key.
    pub fn validate(&self) -> Result<(), CurationError> {
        if let Some(ref preset) = self.quality.preset {
            if preset.parse::<ThresholdPreset>().is_err() {
                return Err(CurationError::config(format!(
                    "quality.preset must be 'document' or 'strict', got '{preset}'"
                )));
            }
        }

        if let Some(ref policy) = self.split.policy {
            if policy != "stratified" && policy != "uniform" {
                return Err(CurationError::config(format!(
                    "split.policy must be 'stratified' or 'uniform', got '{policy}'"
                )));
            }
        }

        for (key, table) in [
            ("split.ratios", self.split.ratios),
            ("split.good_ratios", self.split.good_ratios),
            ("split.poor_ratios", self.split.poor_ratios),
        ] {
            if let Some(table) = table {
                table.to_ratios().map_err(|e| match e {
                    CurationError::Configuration(detail) => {
                        CurationError::config(format!("{key}: {detail}"))
                    }
                    other => other,
                })?;
            }
        }

        if let Some(ref f) = self.output.format {
            if f != "text" && f != "json" {
                return Err(CurationError::config(format!(
                    "output.format must be 'text' or 'json', got '{f}'"
                )));
            }
        }

        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        // Quality
        self.quality.preset = other.quality.preset.or_else(|| self.quality.preset.take());
        self.quality.blur_floor = other.quality.blur_floor.or(self.quality.blur_floor);
        self.quality.brightness_low = other.quality.brightness_low.or(self.quality.brightness_low);
        self.quality.brightness_high = other
            .quality
            .brightness_high
            .or(self.quality.brightness_high);
        self.quality.contrast_floor = other.quality.contrast_floor.or(self.quality.contrast_floor);
        self.quality.contrast_check = other.quality.contrast_check.or(self.quality.contrast_check);

        // Split
        self.split.policy = other.split.policy.or_else(|| self.split.policy.take());
        self.split.seed = other.split.seed.or(self.split.seed);
        self.split.include_poor_pairs = other
            .split
            .include_poor_pairs
            .or(self.split.include_poor_pairs);
        self.split.ratios = other.split.ratios.or(self.split.ratios);
        self.split.good_ratios = other.split.good_ratios.or(self.split.good_ratios);
        self.split.poor_ratios = other.split.poor_ratios.or(self.split.poor_ratios);

        // Paths
        self.paths.front_dir = other.paths.front_dir.or_else(|| self.paths.front_dir.take());
        self.paths.back_dir = other.paths.back_dir.or_else(|| self.paths.back_dir.take());
        self.paths.quality_report = other
            .paths
            .quality_report
            .or_else(|| self.paths.quality_report.take());
        self.paths.output_root = other
            .paths
            .output_root
            .or_else(|| self.paths.output_root.take());
        self.paths.review_root = other
            .paths
            .review_root
            .or_else(|| self.paths.review_root.take());

        // Output
        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.progress = other.output.progress.or(self.output.progress);
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pairset").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.pairset.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(".pairset.toml");
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}
