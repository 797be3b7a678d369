//! Arguments shared by every subcommand, layered over the config files.

use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use pairset_core::splitting::DEFAULT_SEED;
use pairset_core::{
    CurationError, QualityThresholds, SplitConfig, SplitPolicy, SplitRatios, StratifiedRatios,
    ThresholdPreset,
};

use crate::config::{AppConfig, RatiosConfig};

/// Hardcoded default paths.
mod defaults {
    pub const QUALITY_REPORT: &str = "quality_report.csv";
    pub const OUTPUT_ROOT: &str = "data/processed";
    pub const REVIEW_ROOT: &str = "data/unpaired_review";
}

/// Threshold preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PresetArg {
    /// Blur > 30, brightness in (40, 250), contrast > 20
    Document,
    /// Blur > 100, brightness in (50, 200), no contrast gate
    Strict,
}

impl From<PresetArg> for ThresholdPreset {
    fn from(preset: PresetArg) -> Self {
        match preset {
            PresetArg::Document => Self::Document,
            PresetArg::Strict => Self::Strict,
        }
    }
}

/// Split policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Split Good and Poor strata separately
    Stratified,
    /// Split the whole pool with one ratio tuple
    Uniform,
}

/// Output format for summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Single JSON object
    Json,
}

/// Shared paths, thresholds, split settings and output flags.
#[derive(Args, Clone, Debug, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct CurateArgs {
    /// Directory of front scans
    #[arg(long, value_name = "DIR")]
    pub front: Option<PathBuf>,

    /// Directory of back scans
    #[arg(long, value_name = "DIR")]
    pub back: Option<PathBuf>,

    /// Quality report CSV [default: quality_report.csv]
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Dataset output root [default: data/processed]
    #[arg(long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Review directory for orphans [default: data/unpaired_review]
    #[arg(long, value_name = "DIR")]
    pub review: Option<PathBuf>,

    /// Threshold preset [default: document]
    #[arg(long, value_enum)]
    pub preset: Option<PresetArg>,

    /// Minimum blur score (exclusive)
    #[arg(long)]
    pub blur_floor: Option<f64>,

    /// Lower brightness bound (exclusive)
    #[arg(long)]
    pub brightness_low: Option<f64>,

    /// Upper brightness bound (exclusive)
    #[arg(long)]
    pub brightness_high: Option<f64>,

    /// Minimum contrast (exclusive)
    #[arg(long, conflicts_with = "no_contrast")]
    pub contrast_floor: Option<f64>,

    /// Disable the contrast gate
    #[arg(long)]
    pub no_contrast: bool,

    /// Split policy [default: stratified]
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Shuffle seed [default: 42]
    #[arg(long)]
    pub seed: Option<u64>,

    /// Uniform ratios as train,val,test [default: 0.7,0.15,0.15]
    #[arg(long, value_name = "T,V,T")]
    pub ratios: Option<String>,

    /// Good stratum ratios as train,val,test [default: 0.7,0.15,0.15]
    #[arg(long, value_name = "T,V,T")]
    pub good_ratios: Option<String>,

    /// Poor stratum ratios as train,val,test [default: 0.2,0.1,0.7]
    #[arg(long, value_name = "T,V,T")]
    pub poor_ratios: Option<String>,

    /// Split pairs with a Poor front as their own stratum
    #[arg(long)]
    pub include_poor_pairs: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Merged config (populated by `with_config`, not from CLI).
    #[arg(skip)]
    config: Option<AppConfig>,
}

impl CurateArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults (in accessor methods)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        // Paths: CLI > config
        args.front = args.front.or_else(|| config.paths.front_dir.clone());
        args.back = args.back.or_else(|| config.paths.back_dir.clone());
        args.report = args.report.or_else(|| config.paths.quality_report.clone());
        args.output = args.output.or_else(|| config.paths.output_root.clone());
        args.review = args.review.or_else(|| config.paths.review_root.clone());

        // Thresholds: CLI > config (accessor applies the preset underneath)
        if args.preset.is_none() {
            args.preset = config
                .quality
                .preset
                .as_deref()
                .and_then(|s| PresetArg::from_str(s, false).ok());
        }
        args.blur_floor = args.blur_floor.or(config.quality.blur_floor);
        args.brightness_low = args.brightness_low.or(config.quality.brightness_low);
        args.brightness_high = args.brightness_high.or(config.quality.brightness_high);
        if !args.no_contrast && args.contrast_floor.is_none() {
            args.no_contrast = config.quality.contrast_check == Some(false);
            if !args.no_contrast {
                args.contrast_floor = args.contrast_floor.or(config.quality.contrast_floor);
            }
        }

        // Split: CLI > config
        if args.policy.is_none() {
            args.policy = config
                .split
                .policy
                .as_deref()
                .and_then(|s| PolicyArg::from_str(s, false).ok());
        }
        args.seed = args.seed.or(config.split.seed);
        if !args.include_poor_pairs {
            args.include_poor_pairs = config.split.include_poor_pairs.unwrap_or(false);
        }

        // Output: CLI > config
        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_deref()
                .and_then(|s| OutputFormat::from_str(s, false).ok());
        }
        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }

        // Ratio tables are resolved lazily so CLI strings still win
        args.config = Some(config.clone());

        args
    }

    /// Front scan directory.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if neither `--front` nor
    /// `paths.front_dir` is set.
    pub fn front_dir(&self) -> Result<&Path, CurationError> {
        self.front.as_deref().ok_or_else(|| {
            CurationError::config("front scan directory not set (use --front or paths.front_dir)")
        })
    }

    /// Back scan directory.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if neither `--back` nor
    /// `paths.back_dir` is set.
    pub fn back_dir(&self) -> Result<&Path, CurationError> {
        self.back.as_deref().ok_or_else(|| {
            CurationError::config("back scan directory not set (use --back or paths.back_dir)")
        })
    }

    /// Quality report path with fallback to the default.
    pub fn report_path(&self) -> PathBuf {
        self.report
            .clone()
            .unwrap_or_else(|| PathBuf::from(defaults::QUALITY_REPORT))
    }

    /// Dataset output root with fallback to the default.
    pub fn output_root(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(defaults::OUTPUT_ROOT))
    }

    /// Review root with fallback to the default.
    pub fn review_root(&self) -> PathBuf {
        self.review
            .clone()
            .unwrap_or_else(|| PathBuf::from(defaults::REVIEW_ROOT))
    }

    /// Preset thresholds with individual overrides applied.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the resulting thresholds are invalid.
    pub fn thresholds(&self) -> Result<QualityThresholds, CurationError> {
        let preset: ThresholdPreset = self.preset.unwrap_or(PresetArg::Document).into();
        let mut thresholds = preset.thresholds();

        if let Some(v) = self.blur_floor {
            thresholds.blur_floor = v;
        }
        if let Some(v) = self.brightness_low {
            thresholds.brightness_low = v;
        }
        if let Some(v) = self.brightness_high {
            thresholds.brightness_high = v;
        }
        if self.no_contrast {
            thresholds.contrast_floor = None;
        } else if let Some(v) = self.contrast_floor {
            thresholds.contrast_floor = Some(v);
        }

        thresholds.validate()?;
        Ok(thresholds)
    }

    /// Split policy and seed.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any ratio tuple is invalid.
    pub fn split_config(&self) -> Result<SplitConfig, CurationError> {
        let config = self.config.as_ref();
        let split = config.map(|c| &c.split);

        let policy = match self.policy.unwrap_or(PolicyArg::Stratified) {
            PolicyArg::Uniform => SplitPolicy::Uniform(resolve_ratios(
                self.ratios.as_deref(),
                split.and_then(|s| s.ratios),
                SplitRatios::DEFAULT,
            )?),
            PolicyArg::Stratified => {
                let defaults = StratifiedRatios::default();
                SplitPolicy::Stratified(StratifiedRatios {
                    good: resolve_ratios(
                        self.good_ratios.as_deref(),
                        split.and_then(|s| s.good_ratios),
                        defaults.good,
                    )?,
                    poor: resolve_ratios(
                        self.poor_ratios.as_deref(),
                        split.and_then(|s| s.poor_ratios),
                        defaults.poor,
                    )?,
                })
            }
        };

        Ok(SplitConfig {
            policy,
            seed: self.seed.unwrap_or(DEFAULT_SEED),
        })
    }

    /// Get output format with fallback to text.
    pub fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }
}

/// CLI string > config table > default.
fn resolve_ratios(
    cli: Option<&str>,
    config: Option<RatiosConfig>,
    default: SplitRatios,
) -> Result<SplitRatios, CurationError> {
    match (cli, config) {
        (Some(s), _) => s.parse(),
        (None, Some(table)) => table.to_ratios(),
        (None, None) => Ok(default),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use pairset_core::Split;

    fn config(toml: &str) -> AppConfig {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn test_defaults_without_config() {
        let args = CurateArgs::with_config(CurateArgs::default(), &AppConfig::default());

        assert_eq!(args.thresholds().unwrap(), QualityThresholds::document());
        assert_eq!(args.split_config().unwrap(), SplitConfig::default());
        assert_eq!(args.report_path(), PathBuf::from("quality_report.csv"));
        assert_eq!(args.output_root(), PathBuf::from("data/processed"));
        assert_eq!(args.review_root(), PathBuf::from("data/unpaired_review"));
        assert_eq!(args.format(), OutputFormat::Text);
        assert!(args.front_dir().is_err());
    }

    #[test]
    fn test_config_preset_with_override() {
        let config = config(
            r#"
[quality]
preset = "strict"
blur_floor = 60.0
"#,
        );
        let args = CurateArgs::with_config(CurateArgs::default(), &config);
        let thresholds = args.thresholds().unwrap();

        assert_eq!(thresholds.blur_floor, 60.0);
        assert_eq!(thresholds.brightness_low, 50.0);
        assert_eq!(thresholds.contrast_floor, None);
    }

    #[test]
    fn test_cli_wins_over_config() {
        let config = config(
            r#"
[quality]
blur_floor = 60.0

[split]
seed = 1
policy = "uniform"

[paths]
front_dir = "cfg/front"
"#,
        );
        let cli = CurateArgs {
            blur_floor: Some(10.0),
            seed: Some(9),
            front: Some(PathBuf::from("cli/front")),
            ..CurateArgs::default()
        };
        let args = CurateArgs::with_config(cli, &config);

        assert_eq!(args.thresholds().unwrap().blur_floor, 10.0);
        let split = args.split_config().unwrap();
        assert_eq!(split.seed, 9);
        assert!(matches!(split.policy, SplitPolicy::Uniform(_)));
        assert_eq!(args.front_dir().unwrap(), Path::new("cli/front"));
    }

    #[test]
    fn test_contrast_check_disabled_in_config() {
        let config = config("[quality]\ncontrast_check = false\ncontrast_floor = 5.0\n");
        let args = CurateArgs::with_config(CurateArgs::default(), &config);
        assert_eq!(args.thresholds().unwrap().contrast_floor, None);
    }

    #[test]
    fn test_no_contrast_flag() {
        let cli = CurateArgs {
            no_contrast: true,
            ..CurateArgs::default()
        };
        let args = CurateArgs::with_config(cli, &config("[quality]\ncontrast_floor = 5.0\n"));
        assert_eq!(args.thresholds().unwrap().contrast_floor, None);
    }

    #[test]
    fn test_invalid_thresholds_are_configuration_errors() {
        let cli = CurateArgs {
            brightness_low: Some(220.0),
            brightness_high: Some(200.0),
            ..CurateArgs::default()
        };
        let args = CurateArgs::with_config(cli, &AppConfig::default());
        assert!(matches!(
            args.thresholds(),
            Err(CurationError::Configuration(_))
        ));
    }

    #[test]
    fn test_ratio_strings_beat_config_tables() {
        let config = config("[split]\ngood_ratios = { train = 0.6, val = 0.2, test = 0.2 }\n");
        let cli = CurateArgs {
            poor_ratios: Some("0,0,1".into()),
            ..CurateArgs::default()
        };
        let args = CurateArgs::with_config(cli, &config);

        let SplitPolicy::Stratified(ratios) = args.split_config().unwrap().policy else {
            panic!("expected stratified policy");
        };
        assert_eq!(ratios.good.get(Split::Train), 0.6);
        assert_eq!(ratios.poor.get(Split::Test), 1.0);
    }

    #[test]
    fn test_bad_ratio_string_is_rejected() {
        let cli = CurateArgs {
            policy: Some(PolicyArg::Uniform),
            ratios: Some("0.9,0.9,0.9".into()),
            ..CurateArgs::default()
        };
        let args = CurateArgs::with_config(cli, &AppConfig::default());
        assert!(args.split_config().is_err());
    }
}
