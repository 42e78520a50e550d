//! Learning resources and their per-skill scores.

use crate::{ResourceId, SkillId};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Seconds in one calendar week.
pub const SECONDS_PER_WEEK: u64 = 60 * 60 * 24 * 7;

/// How a resource's duration was encoded by its provider.
///
/// Catalogues mix two encodings: self-paced material reports a total time
/// commitment in seconds, while cohort courses report a length in weeks
/// plus an expected weekly effort. Anything else is treated as a single
/// indivisible unit by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "unit", rename_all = "snake_case")]
pub enum DurationSpec {
    /// Total time commitment in seconds.
    Seconds {
        /// Total seconds of study.
        value: u64,
    },
    /// A fixed number of weeks at a fixed weekly effort.
    Weekly {
        /// Course length in weeks.
        weeks: u32,
        /// Expected effort in hours per week.
        hours_per_week: u32,
    },
    /// No usable duration information.
    Unspecified,
}

impl DurationSpec {
    /// Uniform seconds-equivalent duration, where one exists.
    pub fn seconds_equivalent(&self) -> Option<u64> {
        match self {
            Self::Seconds { value } => Some(*value),
            Self::Weekly { weeks, .. } => Some(u64::from(*weeks) * SECONDS_PER_WEEK),
            Self::Unspecified => None,
        }
    }
}

/// A learning resource from the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Catalogue identifier.
    pub id: ResourceId,
    /// Display name.
    pub name: String,
    /// Resource type, matched against the constraint whitelist/blacklist.
    #[serde(rename = "type")]
    pub kind: String,
    /// Originating provider.
    #[serde(default)]
    pub provider: Option<String>,
    /// Hosting platform.
    #[serde(default)]
    pub platform: Option<String>,
    /// Resource URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Shorter description for listings.
    #[serde(default)]
    pub short_description: Option<String>,
    /// Duration encoding.
    pub duration: DurationSpec,
    /// Natural start date for cohort courses, if any. Used to derive a
    /// weekday offset when anchoring the schedule to real dates.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub starts_at: Option<OffsetDateTime>,
}

/// A scored (resource, skill) association.
///
/// Multiple score kinds may exist for the same pair (e.g. `simple_avg` vs
/// `level:manual`); the catalogue decides which kind ranks in a given call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceScore {
    /// The scored resource.
    pub resource_id: ResourceId,
    /// The skill the score applies to.
    pub skill_id: SkillId,
    /// Numeric score, higher is better.
    pub score: f64,
    /// Score kind label.
    #[serde(default)]
    pub kind: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_equivalent() {
        assert_eq!(
            DurationSpec::Seconds { value: 3600 }.seconds_equivalent(),
            Some(3600)
        );
        assert_eq!(
            DurationSpec::Weekly {
                weeks: 2,
                hours_per_week: 5
            }
            .seconds_equivalent(),
            Some(2 * SECONDS_PER_WEEK)
        );
        assert_eq!(DurationSpec::Unspecified.seconds_equivalent(), None);
    }

    #[test]
    fn test_duration_spec_serde_tagging() {
        let weekly = DurationSpec::Weekly {
            weeks: 4,
            hours_per_week: 3,
        };
        let json = serde_json::to_value(&weekly).unwrap();
        assert_eq!(json["unit"], "weekly");
        assert_eq!(json["weeks"], 4);
        let back: DurationSpec = serde_json::from_value(json).unwrap();
        assert_eq!(back, weekly);
    }
}
