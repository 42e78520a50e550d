//! Schedule scoring.

use crate::schedule::WeeklySchedule;
use crate::select::CandidateSelection;
use serde::{Deserialize, Serialize};
use upskill_model::{SkillId, TimeConstraints};

/// Tunable scoring constants.
///
/// The values are empirically tuned rather than derived; keeping them in
/// configuration lets product adjust them without code changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreConfig {
    /// Multiplier on the missed-skill penalty. Dominates length
    /// considerations so an uncovered skill outweighs any schedule-length
    /// defect.
    pub missed_multiplier: f64,
    /// Expected schedule length as a fraction of the gap size, capped at
    /// the target duration.
    pub expected_weeks_per_skill: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            missed_multiplier: 10.0,
            expected_weeks_per_skill: 0.5,
        }
    }
}

/// Score a packed schedule; higher is better, may be negative.
///
/// `missed_penalty` is the fraction of gap skills no scheduled resource
/// covers. Length is judged against the target duration: schedules at or
/// past the target are penalized in proportion to the overshoot,
/// schedules between the expected and target lengths are ideal, and
/// suspiciously short schedules are penalized in proportion to the
/// shortfall.
pub fn score_schedule(
    gap: &[SkillId],
    selection: &CandidateSelection,
    schedule: &WeeklySchedule,
    time: &TimeConstraints,
    config: &ScoreConfig,
) -> f64 {
    let missed_penalty = if gap.is_empty() {
        0.0
    } else {
        let taught: Vec<&SkillId> = selection.attribution.values().flatten().collect();
        let missed = gap.iter().filter(|s| !taught.contains(s)).count();
        missed as f64 / gap.len() as f64
    };

    let Some(last_active) = schedule.last_active_week() else {
        return -config.missed_multiplier * missed_penalty;
    };
    let schedule_len = (last_active + 1) as f64;
    let target_len = f64::from(time.target_duration);
    let max_len = f64::from(time.maximum_duration);
    let expected_len = (config.expected_weeks_per_skill * gap.len() as f64).min(target_len);

    let length_penalty = if schedule_len >= target_len {
        1.0 - (schedule_len - target_len) / max_len
    } else if schedule_len >= expected_len {
        1.0
    } else {
        1.0 - (expected_len - schedule_len) / expected_len
    };
    length_penalty - config.missed_multiplier * missed_penalty
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::pack;
    use upskill_model::{Constraints, DurationSpec, Resource};

    fn resource(id: &str, hours: u64) -> Resource {
        Resource {
            id: id.into(),
            name: id.to_uppercase(),
            kind: "video".into(),
            provider: None,
            platform: None,
            url: None,
            description: None,
            short_description: None,
            duration: DurationSpec::Seconds {
                value: hours * 3600,
            },
            starts_at: None,
        }
    }

    fn selection_for(resources: Vec<Resource>, skills: &[(&str, &str)]) -> CandidateSelection {
        let mut selection = CandidateSelection {
            resources,
            attribution: Default::default(),
        };
        for (resource_id, skill) in skills {
            selection
                .attribution
                .entry((*resource_id).to_string())
                .or_default()
                .push((*skill).to_string());
        }
        selection
    }

    #[test]
    fn test_full_coverage_in_expected_window_scores_one() {
        let gap = vec!["s1".to_string(), "s2".to_string()];
        let resources = vec![resource("r1", 4), resource("r2", 1)];
        let (schedule, _) = pack(&resources, 5, 16);
        let selection = selection_for(resources, &[("r1", "s1"), ("r2", "s2")]);
        let score = score_schedule(
            &gap,
            &selection,
            &schedule,
            &Constraints::default().time,
            &ScoreConfig::default(),
        );
        assert!((score - 1.0).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn test_missed_skill_dominates() {
        let gap = vec!["s1".to_string(), "s2".to_string()];
        let resources = vec![resource("r1", 1)];
        let (schedule, _) = pack(&resources, 5, 16);
        let selection = selection_for(resources, &[("r1", "s1")]);
        let score = score_schedule(
            &gap,
            &selection,
            &schedule,
            &Constraints::default().time,
            &ScoreConfig::default(),
        );
        // Half the gap is missed: 10 * 0.5 = 5 off whatever length earns.
        assert!(score < -3.0, "got {score}");
    }

    #[test]
    fn test_empty_schedule_scores_pure_missed_penalty() {
        let gap = vec!["s1".to_string()];
        let selection = CandidateSelection::default();
        let schedule = crate::schedule::WeeklySchedule::with_weeks(16);
        let score = score_schedule(
            &gap,
            &selection,
            &schedule,
            &Constraints::default().time,
            &ScoreConfig::default(),
        );
        assert!((score - (-10.0)).abs() < 1e-9);
    }

    #[test]
    fn test_empty_gap_never_divides_by_zero() {
        let selection = CandidateSelection::default();
        let schedule = crate::schedule::WeeklySchedule::with_weeks(16);
        let score = score_schedule(
            &[],
            &selection,
            &schedule,
            &Constraints::default().time,
            &ScoreConfig::default(),
        );
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_overlong_schedule_penalized() {
        let gap = vec!["s1".to_string()];
        // 70 hours at 5 h/wk -> 14 weeks, past the 12-week target.
        let resources = vec![resource("r1", 70)];
        let (schedule, _) = pack(&resources, 5, 16);
        let selection = selection_for(resources, &[("r1", "s1")]);
        let score = score_schedule(
            &gap,
            &selection,
            &schedule,
            &Constraints::default().time,
            &ScoreConfig::default(),
        );
        // length_penalty = 1 - (14 - 12) / 16.
        assert!((score - (1.0 - 2.0 / 16.0)).abs() < 1e-9, "got {score}");
    }
}
