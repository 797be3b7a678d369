//! Deterministic train/val/test splitting.
//!
//! Each partition is sorted, shuffled with a freshly seeded [`StdRng`] and cut
//! at `floor(n * r_train)` and `floor(n * (r_train + r_val))`; whatever is left
//! goes to test. Cutting on cumulative shares keeps every split within one item
//! of its exact share.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{Quality, Split, SplitAssignment};
use crate::error::{CurationError, Result};

/// Allowed deviation of a ratio sum from 1.
pub const RATIO_SUM_TOLERANCE: f64 = 1e-3;

/// Slack added before flooring so products like `100 * 0.85` are not cut short.
const CUT_EPSILON: f64 = 1e-9;

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 42;

/// Train/val/test fractions summing to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SplitRatios {
    train: f64,
    val: f64,
    test: f64,
}

impl SplitRatios {
    /// 70 / 15 / 15.
    pub const DEFAULT: Self = Self {
        train: 0.70,
        val: 0.15,
        test: 0.15,
    };

    /// Validates and builds a ratio tuple.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any ratio is negative or not finite,
    /// or if the sum is not within [`RATIO_SUM_TOLERANCE`] of 1.
    pub fn new(train: f64, val: f64, test: f64) -> Result<Self> {
        for (name, value) in [("train", train), ("val", val), ("test", test)] {
            if !value.is_finite() || value < 0.0 {
                return Err(CurationError::config(format!(
                    "{name} ratio must be a finite non-negative number, got {value}"
                )));
            }
        }
        let sum = train + val + test;
        if (sum - 1.0).abs() > RATIO_SUM_TOLERANCE {
            return Err(CurationError::config(format!(
                "split ratios must sum to 1, got {train} + {val} + {test} = {sum}"
            )));
        }
        Ok(Self { train, val, test })
    }

    /// Fraction assigned to `split`.
    #[must_use]
    pub const fn get(&self, split: Split) -> f64 {
        match split {
            Split::Train => self.train,
            Split::Val => self.val,
            Split::Test => self.test,
        }
    }

    /// Cut points `(train_end, val_end)` for a partition of `n` items.
    ///
    /// Both boundaries floor a cumulative share, so each split differs from
    /// `n * ratio` by less than one item.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn cut_points(&self, n: usize) -> (usize, usize) {
        let n_f = n as f64;
        let cut = |share: f64| ((n_f * share + CUT_EPSILON).floor() as usize).min(n);
        let train_end = cut(self.train);
        let val_end = cut(self.train + self.val).max(train_end);
        (train_end, val_end)
    }
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for SplitRatios {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.train, self.val, self.test)
    }
}

impl FromStr for SplitRatios {
    type Err = CurationError;

    /// Parses `train,val,test`.
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [train, val, test] = parts.as_slice() else {
            return Err(CurationError::config(format!(
                "expected three comma-separated ratios, got '{s}'"
            )));
        };
        let parse = |v: &str| {
            v.parse::<f64>()
                .map_err(|_| CurationError::config(format!("invalid ratio '{v}'")))
        };
        Self::new(parse(train)?, parse(val)?, parse(test)?)
    }
}

/// Ratios per quality stratum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StratifiedRatios {
    pub good: SplitRatios,
    pub poor: SplitRatios,
}

impl StratifiedRatios {
    /// Ratios applied to one stratum.
    #[must_use]
    pub const fn for_quality(&self, quality: Quality) -> SplitRatios {
        match quality {
            Quality::Good => self.good,
            Quality::Poor => self.poor,
        }
    }
}

impl Default for StratifiedRatios {
    /// Poor examples lean toward evaluation.
    fn default() -> Self {
        Self {
            good: SplitRatios::DEFAULT,
            poor: SplitRatios {
                train: 0.20,
                val: 0.10,
                test: 0.70,
            },
        }
    }
}

/// How the pool is partitioned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum SplitPolicy {
    /// Each quality stratum is split on its own, then the results are unioned.
    Stratified(StratifiedRatios),
    /// The whole pool is split with one ratio tuple.
    Uniform(SplitRatios),
}

impl SplitPolicy {
    /// Policy name as written in config files.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Stratified(_) => "stratified",
            Self::Uniform(_) => "uniform",
        }
    }
}

impl Default for SplitPolicy {
    fn default() -> Self {
        Self::Stratified(StratifiedRatios::default())
    }
}

/// Splitter settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SplitConfig {
    pub policy: SplitPolicy,
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            policy: SplitPolicy::default(),
            seed: DEFAULT_SEED,
        }
    }
}

/// Assigns each pooled filename to exactly one split.
#[derive(Debug, Clone, Default)]
pub struct Splitter {
    config: SplitConfig,
}

impl Splitter {
    #[must_use]
    pub const fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    /// Policy and seed in use.
    #[must_use]
    pub const fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Splits `pool` (filename → quality label).
    #[must_use]
    pub fn split(&self, pool: &BTreeMap<String, Quality>) -> SplitAssignment {
        let mut assignment = SplitAssignment::default();

        match self.config.policy {
            SplitPolicy::Uniform(ratios) => {
                let names: Vec<&str> = pool.keys().map(String::as_str).collect();
                assignment.extend(self.partition(names, ratios));
            }
            SplitPolicy::Stratified(ratios) => {
                for quality in Quality::ALL {
                    let names: Vec<&str> = pool
                        .iter()
                        .filter(|(_, q)| **q == quality)
                        .map(|(name, _)| name.as_str())
                        .collect();
                    if names.is_empty() {
                        debug!("Stratum {quality} is empty");
                        continue;
                    }
                    debug!("Splitting {} {quality} items", names.len());
                    assignment.extend(self.partition(names, ratios.for_quality(quality)));
                }
            }
        }

        let counts = assignment.counts();
        info!(
            "Split {} items ({}, seed {}): train={} val={} test={}",
            assignment.len(),
            self.config.policy.name(),
            self.config.seed,
            counts.train,
            counts.val,
            counts.test
        );

        assignment
    }

    /// One three-way cut of an ascending-sorted partition.
    fn partition(&self, mut names: Vec<&str>, ratios: SplitRatios) -> Vec<(String, Split)> {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        names.shuffle(&mut rng);

        let (train_end, val_end) = ratios.cut_points(names.len());
        names
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                let split = if i < train_end {
                    Split::Train
                } else if i < val_end {
                    Split::Val
                } else {
                    Split::Test
                };
                (name.to_owned(), split)
            })
            .collect()
    }
}
