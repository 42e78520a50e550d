//! The constraint model: defaults, deep-merge of user overrides, and
//! normalization.

use serde::{Deserialize, Serialize};

/// Whitelist/blacklist filter over resource types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeFilter {
    /// Allowed resource types; an empty list allows everything.
    pub whitelist: Vec<String>,
    /// Disallowed resource types.
    pub blacklist: Vec<String>,
}

/// Constraints on where resources may come from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConstraints {
    /// Resource type filter.
    #[serde(rename = "type")]
    pub kinds: TypeFilter,
}

/// Cost ceilings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostConstraints {
    /// Maximum total spend for the whole pathway.
    pub maximum_total: u64,
    /// Maximum spend on any single course.
    pub maximum_per_course: u64,
}

/// Time budgets, all durations integral after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeConstraints {
    /// Preferred hours of study per week.
    pub target_weekly_effort: u32,
    /// Hard ceiling on hours of study per week.
    pub maximum_weekly_effort: u32,
    /// Preferred pathway length in weeks.
    pub target_duration: u32,
    /// Hard ceiling on pathway length in weeks.
    pub maximum_duration: u32,
    /// Shortest acceptable course, in seconds.
    pub minimum_course_duration: u64,
    /// Longest acceptable course, in seconds.
    pub maximum_course_duration: u64,
}

/// Full constraint set for a planning call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraints {
    /// Source filters.
    pub sources: SourceConstraints,
    /// Cost ceilings.
    pub cost: CostConstraints,
    /// Time budgets.
    pub time: TimeConstraints,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            sources: SourceConstraints {
                kinds: TypeFilter {
                    whitelist: [
                        "course-online",
                        "course-offline",
                        "article",
                        "video",
                        "audio",
                        "MOOC",
                        "Online L&D",
                        "article-blog",
                    ]
                    .iter()
                    .map(|s| (*s).to_string())
                    .collect(),
                    blacklist: Vec::new(),
                },
            },
            cost: CostConstraints {
                maximum_total: 1,
                maximum_per_course: 1,
            },
            time: TimeConstraints {
                target_weekly_effort: 5,
                maximum_weekly_effort: 5,
                target_duration: 12,
                maximum_duration: 16,
                minimum_course_duration: 1,
                maximum_course_duration: 60 * 60 * 24 * 365,
            },
        }
    }
}

impl Constraints {
    /// Merge a partial override over the defaults and normalize.
    pub fn from_patch(patch: ConstraintPatch) -> Self {
        let mut constraints = Self::default();
        constraints.apply(patch);
        constraints.normalize();
        constraints
    }

    fn apply(&mut self, patch: ConstraintPatch) {
        if let Some(sources) = patch.sources {
            if let Some(kinds) = sources.kinds {
                if let Some(whitelist) = kinds.whitelist {
                    self.sources.kinds.whitelist = whitelist;
                }
                if let Some(blacklist) = kinds.blacklist {
                    self.sources.kinds.blacklist = blacklist;
                }
            }
        }
        if let Some(cost) = patch.cost {
            if let Some(v) = cost.maximum_total {
                self.cost.maximum_total = truncate_u64(v);
            }
            if let Some(v) = cost.maximum_per_course {
                self.cost.maximum_per_course = truncate_u64(v);
            }
        }
        if let Some(time) = patch.time {
            if let Some(v) = time.target_weekly_effort {
                self.time.target_weekly_effort = truncate_u32(v);
            }
            if let Some(v) = time.maximum_weekly_effort {
                self.time.maximum_weekly_effort = truncate_u32(v);
            }
            if let Some(v) = time.target_duration {
                self.time.target_duration = truncate_u32(v);
            }
            if let Some(v) = time.maximum_duration {
                self.time.maximum_duration = truncate_u32(v);
            }
            if let Some(v) = time.minimum_course_duration {
                self.time.minimum_course_duration = truncate_u64(v);
            }
            if let Some(v) = time.maximum_course_duration {
                self.time.maximum_course_duration = truncate_u64(v);
            }
        }
    }

    fn normalize(&mut self) {
        // Legacy catalogues tag blog posts as "article/blog".
        let whitelist = &mut self.sources.kinds.whitelist;
        if whitelist.iter().any(|t| t == "article") && !whitelist.iter().any(|t| t == "article/blog")
        {
            whitelist.push("article/blog".to_string());
        }
    }
}

fn truncate_u64(value: f64) -> u64 {
    value.max(0.0) as u64
}

fn truncate_u32(value: f64) -> u32 {
    value.max(0.0) as u32
}

/// Partial constraint override supplied by a caller.
///
/// Every field is optional; unset fields keep their defaults. Numeric
/// fields accept floats and are truncated to integers during the merge,
/// mirroring how loosely-typed callers send them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConstraintPatch {
    /// Source filter overrides.
    #[serde(default)]
    pub sources: Option<SourcePatch>,
    /// Cost ceiling overrides.
    #[serde(default)]
    pub cost: Option<CostPatch>,
    /// Time budget overrides.
    #[serde(default)]
    pub time: Option<TimePatch>,
}

/// Source filter overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcePatch {
    /// Type filter overrides.
    #[serde(rename = "type", default)]
    pub kinds: Option<TypeFilterPatch>,
}

/// Type filter overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeFilterPatch {
    /// Replacement whitelist.
    #[serde(default)]
    pub whitelist: Option<Vec<String>>,
    /// Replacement blacklist.
    #[serde(default)]
    pub blacklist: Option<Vec<String>>,
}

/// Cost ceiling overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CostPatch {
    /// Maximum total spend.
    #[serde(default)]
    pub maximum_total: Option<f64>,
    /// Maximum spend per course.
    #[serde(default)]
    pub maximum_per_course: Option<f64>,
}

/// Time budget overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimePatch {
    /// Preferred weekly effort, hours.
    #[serde(default)]
    pub target_weekly_effort: Option<f64>,
    /// Maximum weekly effort, hours.
    #[serde(default)]
    pub maximum_weekly_effort: Option<f64>,
    /// Preferred pathway length, weeks.
    #[serde(default)]
    pub target_duration: Option<f64>,
    /// Maximum pathway length, weeks.
    #[serde(default)]
    pub maximum_duration: Option<f64>,
    /// Minimum course duration, seconds.
    #[serde(default)]
    pub minimum_course_duration: Option<f64>,
    /// Maximum course duration, seconds.
    #[serde(default)]
    pub maximum_course_duration: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_canonical_template() {
        let c = Constraints::default();
        assert_eq!(c.sources.kinds.whitelist.len(), 8);
        assert_eq!(c.cost.maximum_total, 1);
        assert_eq!(c.time.target_duration, 12);
        assert_eq!(c.time.maximum_duration, 16);
        assert_eq!(c.time.maximum_course_duration, 31_536_000);
    }

    #[test]
    fn test_patch_merges_over_defaults() {
        let patch: ConstraintPatch = serde_json::from_str(
            r#"{"time": {"maximum_weekly_effort": 10.7, "maximum_duration": 104}}"#,
        )
        .unwrap();
        let c = Constraints::from_patch(patch);
        // Floats truncate, untouched fields keep their defaults.
        assert_eq!(c.time.maximum_weekly_effort, 10);
        assert_eq!(c.time.maximum_duration, 104);
        assert_eq!(c.time.target_duration, 12);
        assert_eq!(c.sources.kinds.whitelist.len(), 8);
    }

    #[test]
    fn test_article_whitelist_implies_article_blog() {
        let patch: ConstraintPatch = serde_json::from_str(
            r#"{"sources": {"type": {"whitelist": ["article", "video"]}}}"#,
        )
        .unwrap();
        let c = Constraints::from_patch(patch);
        assert!(c.sources.kinds.whitelist.iter().any(|t| t == "article/blog"));
    }
}
