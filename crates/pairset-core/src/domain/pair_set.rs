//! Front/back reconciliation result.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::Quality;

/// Which face of the document a scan shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The face carrying the OCR-critical fields; the only side that is scored.
    Front,
    /// The reverse face.
    Back,
}

impl Side {
    /// Both sides, front first.
    pub const ALL: [Self; 2] = [Self::Front, Self::Back];

    /// Directory name used in the output layouts.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Reconciliation of front records against back filenames.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PairSet {
    /// On both sides with a Good front.
    pub valid_pairs: BTreeSet<String>,
    /// Front only, not Poor.
    pub orphans_front: BTreeSet<String>,
    /// Back only. Back scans are never scored, so no quality filter applies.
    pub orphans_back: BTreeSet<String>,
    /// On both sides with a Poor front.
    pub poor_pairs: BTreeSet<String>,
    /// Front only and Poor; dropped without review.
    pub discarded_front: BTreeSet<String>,
}

impl PairSet {
    /// Orphans of one side.
    #[must_use]
    pub const fn orphans(&self, side: Side) -> &BTreeSet<String> {
        match side {
            Side::Front => &self.orphans_front,
            Side::Back => &self.orphans_back,
        }
    }

    /// Total orphan count across both sides.
    #[must_use]
    pub fn orphan_count(&self) -> usize {
        self.orphans_front.len() + self.orphans_back.len()
    }

    /// The split pool: valid pairs labelled Good, plus poor pairs when requested.
    #[must_use]
    pub fn split_pool(&self, include_poor_pairs: bool) -> BTreeMap<String, Quality> {
        let good = self
            .valid_pairs
            .iter()
            .map(|name| (name.clone(), Quality::Good));
        let poor = self
            .poor_pairs
            .iter()
            .filter(|_| include_poor_pairs)
            .map(|name| (name.clone(), Quality::Poor));
        good.chain(poor).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_split_pool_excludes_poor_by_default() {
        let pairs = PairSet {
            valid_pairs: set(&["a.jpg", "c.jpg"]),
            poor_pairs: set(&["b.jpg"]),
            ..PairSet::default()
        };

        let pool = pairs.split_pool(false);
        assert_eq!(pool.len(), 2);
        assert!(pool.values().all(|q| *q == Quality::Good));

        let pool = pairs.split_pool(true);
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.get("b.jpg"), Some(&Quality::Poor));
    }

    #[test]
    fn test_orphans_by_side() {
        let pairs = PairSet {
            orphans_front: set(&["x.jpg"]),
            orphans_back: set(&["y.jpg", "z.jpg"]),
            ..PairSet::default()
        };
        assert_eq!(pairs.orphans(Side::Front).len(), 1);
        assert_eq!(pairs.orphans(Side::Back).len(), 2);
        assert_eq!(pairs.orphan_count(), 3);
    }
}
