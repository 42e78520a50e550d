//! Wire format for schedules and datetime normalization.

use crate::PathwayError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};
use upskill_model::{Resource, ResourceId, SkillId};

/// A skill reference with its display name, for attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRef {
    /// Skill id.
    pub id: SkillId,
    /// Display name.
    pub name: String,
}

/// One scheduled resource in the wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledResource {
    /// The original resource fields.
    #[serde(flatten)]
    pub resource: Resource,
    /// Absolute start of study.
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    /// Absolute end of study.
    #[serde(with = "time::serde::rfc3339")]
    pub end: OffsetDateTime,
    /// Hours of study per week, first study week onwards.
    pub time_per_week: Vec<u32>,
    /// Skills this resource was selected to teach.
    pub skills: Vec<SkillRef>,
}

/// Wire format: resource id to its calendar placement.
pub type ExternalSchedule = BTreeMap<ResourceId, ScheduledResource>;

/// Parse an ISO-8601 datetime, assuming UTC when the string is naive.
pub fn normalize_datetime(value: &str) -> Result<OffsetDateTime, PathwayError> {
    if let Ok(dt) = OffsetDateTime::parse(value, &Rfc3339) {
        return Ok(dt);
    }
    let naive = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    PrimitiveDateTime::parse(value, naive)
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|_| PathwayError::InvalidDatetime(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_normalize_keeps_explicit_offset() {
        let dt = normalize_datetime("2021-03-01T09:00:00+02:00").unwrap();
        assert_eq!(dt, datetime!(2021-03-01 09:00:00 +02:00));
    }

    #[test]
    fn test_normalize_assumes_utc_for_naive() {
        let dt = normalize_datetime("2021-03-01T09:00:00").unwrap();
        assert_eq!(dt, datetime!(2021-03-01 09:00:00 UTC));
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(matches!(
            normalize_datetime("next tuesday"),
            Err(PathwayError::InvalidDatetime(_))
        ));
    }
}
