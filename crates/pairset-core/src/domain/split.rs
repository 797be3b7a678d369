//! Split labels and the filename → split assignment.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Dataset partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Split {
    Train,
    Val,
    Test,
}

impl Split {
    /// All splits in ratio order.
    pub const ALL: [Self; 3] = [Self::Train, Self::Val, Self::Test];

    /// Directory name under the output root.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Val => "val",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filename → split mapping. Every filename belongs to exactly one split.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SplitAssignment {
    entries: BTreeMap<String, Split>,
}

impl SplitAssignment {
    /// Assigns `filename` to `split`, replacing any earlier assignment.
    pub(crate) fn assign(&mut self, filename: String, split: Split) {
        self.entries.insert(filename, split);
    }

    /// Split of a filename, if assigned.
    #[must_use]
    pub fn get(&self, filename: &str) -> Option<Split> {
        self.entries.get(filename).copied()
    }

    /// Filenames assigned to `split`, in ascending order.
    #[must_use]
    pub fn members(&self, split: Split) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, s)| **s == split)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Number of filenames in `split`.
    #[must_use]
    pub fn count(&self, split: Split) -> usize {
        self.entries.values().filter(|s| **s == split).count()
    }

    /// Per-split sizes in ratio order.
    #[must_use]
    pub fn counts(&self) -> SplitCounts {
        SplitCounts {
            train: self.count(Split::Train),
            val: self.count(Split::Val),
            test: self.count(Split::Test),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(filename, split)` in filename order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Split)> {
        self.entries.iter().map(|(name, split)| (name.as_str(), *split))
    }
}

impl Extend<(String, Split)> for SplitAssignment {
    fn extend<I: IntoIterator<Item = (String, Split)>>(&mut self, iter: I) {
        for (filename, split) in iter {
            self.assign(filename, split);
        }
    }
}

/// Size of each split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SplitCounts {
    pub train: usize,
    pub val: usize,
    pub test: usize,
}

impl SplitCounts {
    /// Size of one split.
    #[must_use]
    pub const fn get(&self, split: Split) -> usize {
        match split {
            Split::Train => self.train,
            Split::Val => self.val,
            Split::Test => self.test,
        }
    }

    /// Mutable size of one split.
    pub fn get_mut(&mut self, split: Split) -> &mut usize {
        match split {
            Split::Train => &mut self.train,
            Split::Val => &mut self.val,
            Split::Test => &mut self.test,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_members_sorted_and_disjoint() {
        let mut assignment = SplitAssignment::default();
        assignment.extend([
            ("c.jpg".to_owned(), Split::Train),
            ("a.jpg".to_owned(), Split::Train),
            ("b.jpg".to_owned(), Split::Test),
        ]);

        assert_eq!(assignment.members(Split::Train), ["a.jpg", "c.jpg"]);
        assert!(assignment.members(Split::Val).is_empty());
        assert_eq!(assignment.get("b.jpg"), Some(Split::Test));
        assert_eq!(
            assignment.counts(),
            SplitCounts {
                train: 2,
                val: 0,
                test: 1
            }
        );
    }

    #[test]
    fn test_reassignment_keeps_one_split() {
        let mut assignment = SplitAssignment::default();
        assignment.assign("a.jpg".into(), Split::Train);
        assignment.assign("a.jpg".into(), Split::Val);
        assert_eq!(assignment.len(), 1);
        assert_eq!(assignment.get("a.jpg"), Some(Split::Val));
    }
}
