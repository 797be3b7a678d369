//! Front/back pair validation.

use std::collections::BTreeSet;

use tracing::info;

use crate::domain::{ImageRecord, PairSet, Quality};

/// Reconciles scored front records with back filenames.
///
/// Only the front side is scored: a Poor front removes the whole pair, while
/// back-only files are always orphans.
#[derive(Debug, Default, Clone, Copy)]
pub struct PairValidator;

impl PairValidator {
    /// Builds the pair set.
    #[must_use]
    pub fn validate(front: &[ImageRecord], back: &BTreeSet<String>) -> PairSet {
        let mut pairs = PairSet::default();
        let mut front_names = BTreeSet::new();

        for record in front {
            let name = record.filename().to_owned();
            front_names.insert(name.clone());

            match (back.contains(&name), record.quality()) {
                (true, Quality::Good) => pairs.valid_pairs.insert(name),
                (true, Quality::Poor) => pairs.poor_pairs.insert(name),
                (false, Quality::Good) => pairs.orphans_front.insert(name),
                (false, Quality::Poor) => pairs.discarded_front.insert(name),
            };
        }

        pairs.orphans_back = back.difference(&front_names).cloned().collect();

        info!(
            "Pairing: {} front, {} back, {} valid pairs, {} poor pairs, {} front orphans, {} back orphans",
            front_names.len(),
            back.len(),
            pairs.valid_pairs.len(),
            pairs.poor_pairs.len(),
            pairs.orphans_front.len(),
            pairs.orphans_back.len()
        );

        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::QualityMetrics;

    fn record(name: &str, quality: Quality) -> ImageRecord {
        ImageRecord::restore(
            name,
            100,
            100,
            QualityMetrics {
                blur_score: 50.0,
                brightness: 120.0,
                contrast: Some(40.0),
            },
            quality,
        )
    }

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_reference_scenario() {
        let front = [
            record("A.jpg", Quality::Good),
            record("B.jpg", Quality::Poor),
            record("C.jpg", Quality::Good),
        ];
        let back = set(&["A.jpg", "C.jpg", "D.jpg"]);

        let pairs = PairValidator::validate(&front, &back);

        assert_eq!(pairs.valid_pairs, set(&["A.jpg", "C.jpg"]));
        assert!(pairs.orphans_front.is_empty());
        assert_eq!(pairs.orphans_back, set(&["D.jpg"]));
        assert_eq!(pairs.discarded_front, set(&["B.jpg"]));
        assert!(pairs.poor_pairs.is_empty());
    }

    #[test]
    fn test_poor_pair_is_neither_valid_nor_orphan() {
        let front = [record("A.jpg", Quality::Poor)];
        let back = set(&["A.jpg"]);

        let pairs = PairValidator::validate(&front, &back);

        assert!(pairs.valid_pairs.is_empty());
        assert_eq!(pairs.orphan_count(), 0);
        assert_eq!(pairs.poor_pairs, set(&["A.jpg"]));
    }

    #[test]
    fn test_back_orphans_ignore_quality() {
        // Back side is never scored, so a back-only file is an orphan
        // regardless of any label elsewhere.
        let front = [record("A.jpg", Quality::Good)];
        let back = set(&["A.jpg", "X.jpg"]);

        let pairs = PairValidator::validate(&front, &back);
        assert_eq!(pairs.orphans_back, set(&["X.jpg"]));
    }

    #[test]
    fn test_good_front_only_is_orphan() {
        let front = [record("A.jpg", Quality::Good)];
        let pairs = PairValidator::validate(&front, &BTreeSet::new());
        assert_eq!(pairs.orphans_front, set(&["A.jpg"]));
        assert!(pairs.valid_pairs.is_empty());
    }

    #[test]
    fn test_valid_and_orphans_disjoint_over_many_inputs() {
        // Deterministic sweep over label and membership combinations.
        for mask in 0u32..256 {
            let names: Vec<String> = (0..4).map(|i| format!("f{i}.jpg")).collect();
            let front: Vec<ImageRecord> = names
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(i, n)| {
                    let quality = if mask & (1 << (i + 4)) != 0 {
                        Quality::Poor
                    } else {
                        Quality::Good
                    };
                    record(n, quality)
                })
                .collect();
            let back: BTreeSet<String> = names
                .iter()
                .enumerate()
                .filter(|(i, _)| (mask >> 2) & (1 << i) != 0)
                .map(|(_, n)| n.clone())
                .collect();

            let pairs = PairValidator::validate(&front, &back);

            let front_names: BTreeSet<String> =
                front.iter().map(|r| r.filename().to_owned()).collect();
            let poor: BTreeSet<String> = front
                .iter()
                .filter(|r| r.quality() == Quality::Poor)
                .map(|r| r.filename().to_owned())
                .collect();
            let expected: BTreeSet<String> = front_names
                .intersection(&back)
                .filter(|n| !poor.contains(*n))
                .cloned()
                .collect();

            assert_eq!(pairs.valid_pairs, expected, "mask {mask}");
            assert!(pairs.valid_pairs.is_disjoint(&pairs.orphans_front));
            assert!(pairs.valid_pairs.iter().all(|n| back.contains(n)));
            assert!(pairs.orphans_front.is_disjoint(&poor));
            assert_eq!(
                pairs.orphans_back,
                back.difference(&front_names).cloned().collect()
            );
        }
    }
}
