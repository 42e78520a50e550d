//! Ordinal proficiency levels and their numeric ranks.

use crate::profile::SkillProfile;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rank assumed for a target skill whose level was left unset.
pub const DEFAULT_TARGET_RANK: u32 = 2;

/// Errors raised while building a rank table.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum RankError {
    /// Cutoffs must be strictly increasing to define a total order.
    #[error("cutoff for level '{level}' ({cutoff}) does not increase on the previous level")]
    NonIncreasingCutoff {
        /// The offending level name.
        level: String,
        /// The cutoff that failed the check.
        cutoff: f64,
    },

    /// An empty table cannot rank anything.
    #[error("rank table has no levels")]
    Empty,
}

/// Mapping from proficiency level labels to integer ranks.
///
/// The default table is the fixed five-level ladder. Organizations may
/// instead define their own ladder as an ordered list of `(name, cutoff)`
/// pairs; ranks are assigned by position after the cutoffs are verified to
/// be strictly increasing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankTable {
    levels: Vec<(String, u32)>,
}

impl Default for RankTable {
    fn default() -> Self {
        Self {
            levels: [
                "no knowledge",
                "beginner",
                "intermediate",
                "advanced",
                "expert",
            ]
            .iter()
            .enumerate()
            .map(|(rank, name)| ((*name).to_string(), rank as u32))
            .collect(),
        }
    }
}

impl RankTable {
    /// Build a table from an organization-defined `(name, cutoff)` ladder.
    ///
    /// Ranks are assigned by position. Cutoffs must be strictly increasing.
    pub fn from_cutoffs(cutoffs: &[(String, f64)]) -> Result<Self, RankError> {
        if cutoffs.is_empty() {
            return Err(RankError::Empty);
        }
        let mut previous: Option<f64> = None;
        for (level, cutoff) in cutoffs {
            if let Some(prev) = previous {
                if *cutoff <= prev {
                    return Err(RankError::NonIncreasingCutoff {
                        level: level.clone(),
                        cutoff: *cutoff,
                    });
                }
            }
            previous = Some(*cutoff);
        }
        Ok(Self {
            levels: cutoffs
                .iter()
                .enumerate()
                .map(|(rank, (name, _))| (name.clone(), rank as u32))
                .collect(),
        })
    }

    /// Look up the rank for a level label.
    pub fn rank(&self, level: &str) -> Option<u32> {
        self.levels
            .iter()
            .find(|(name, _)| name == level)
            .map(|(_, rank)| *rank)
    }

    /// Look up the rank for a level label, falling back to `default`.
    pub fn rank_or(&self, level: &str, default: u32) -> u32 {
        self.rank(level).unwrap_or(default)
    }

    /// Rank for an optional target level: unset levels default to
    /// [`DEFAULT_TARGET_RANK`].
    pub fn target_rank(&self, level: Option<&str>) -> u32 {
        match level {
            Some(l) => self.rank_or(l, DEFAULT_TARGET_RANK),
            None => DEFAULT_TARGET_RANK,
        }
    }

    /// Widest possible gap between two levels (max rank minus min rank).
    pub fn max_gap(&self) -> u32 {
        let max = self.levels.iter().map(|(_, r)| *r).max().unwrap_or(0);
        let min = self.levels.iter().map(|(_, r)| *r).min().unwrap_or(0);
        max - min
    }

    /// Sum of ranks across a profile's levels.
    ///
    /// Unset or unknown levels contribute nothing.
    pub fn total_levels(&self, profile: &SkillProfile) -> u32 {
        profile
            .iter()
            .filter_map(|(_, level)| level.and_then(|l| self.rank(l)))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_ranks() {
        let table = RankTable::default();
        assert_eq!(table.rank("no knowledge"), Some(0));
        assert_eq!(table.rank("beginner"), Some(1));
        assert_eq!(table.rank("expert"), Some(4));
        assert_eq!(table.rank("guru"), None);
        assert_eq!(table.max_gap(), 4);
    }

    #[test]
    fn test_target_rank_defaults_to_intermediate() {
        let table = RankTable::default();
        assert_eq!(table.target_rank(None), 2);
        assert_eq!(table.target_rank(Some("expert")), 4);
        assert_eq!(table.target_rank(Some("unheard of")), 2);
    }

    #[test]
    fn test_from_cutoffs_requires_strict_increase() {
        let good = [
            ("novice".to_string(), 0.0),
            ("capable".to_string(), 0.5),
            ("master".to_string(), 1.0),
        ];
        let table = RankTable::from_cutoffs(&good).unwrap();
        assert_eq!(table.rank("capable"), Some(1));
        assert_eq!(table.max_gap(), 2);

        let bad = [("novice".to_string(), 0.5), ("capable".to_string(), 0.5)];
        assert!(matches!(
            RankTable::from_cutoffs(&bad),
            Err(RankError::NonIncreasingCutoff { .. })
        ));
        assert!(matches!(RankTable::from_cutoffs(&[]), Err(RankError::Empty)));
    }

    #[test]
    fn test_total_levels_sums_ranks() {
        let table = RankTable::default();
        let profile: SkillProfile = [
            ("a".to_string(), Some("beginner".to_string())),
            ("b".to_string(), Some("expert".to_string())),
            ("c".to_string(), None),
        ]
        .into_iter()
        .collect();
        assert_eq!(table.total_levels(&profile), 5);
    }
}
