//! End-to-end pathway planning.
//!
//! The planner is an explicit pipeline: callers resolve the gap, build
//! the weighted candidate table, then ask for the best schedule. Each
//! stage takes the previous stage's output as an argument; the planner
//! itself holds only the catalogue, constraints and configuration.

use crate::external::{ExternalSchedule, ScheduledResource, SkillRef};
use crate::gap;
use crate::schedule::pack;
use crate::score::{score_schedule, ScoreConfig};
use crate::scorer::{score_skills, weight_candidates, ScoreTable, WeightConfig, WeightedTable};
use crate::select::{sample_selection, CandidateSelection};
use crate::PathwayError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info};
use upskill_catalog::{DetailCache, ResourceCatalog};
use upskill_model::{Constraints, RankTable, Resource, SkillId, SkillProfile};

const SECONDS_PER_WEEK: i64 = 60 * 60 * 24 * 7;

/// Planner knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Number of Monte-Carlo trials per planning call. The sole knob
    /// trading compute for schedule quality.
    pub population: usize,
    /// Candidates kept per gap skill.
    pub top_n: usize,
    /// Sampling weight configuration.
    pub weights: WeightConfig,
    /// Schedule scoring constants.
    pub score: ScoreConfig,
    /// Explicit RNG seed for reproducible planning.
    pub seed: Option<u64>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            population: 500,
            top_n: 20,
            weights: WeightConfig::default(),
            score: ScoreConfig::default(),
            seed: None,
        }
    }
}

/// The outcome of a planning call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResult {
    /// The winning schedule in wire format.
    pub courses: ExternalSchedule,
    /// Anchor the schedule was planned from.
    #[serde(with = "time::serde::rfc3339")]
    pub schedule_start: OffsetDateTime,
    /// End of the last scheduled resource, or `schedule_start` when the
    /// calendar is empty.
    #[serde(with = "time::serde::rfc3339")]
    pub schedule_end: OffsetDateTime,
    /// Whether the schedule satisfies all constraints.
    pub valid: bool,
    /// Human-readable constraint violations.
    pub valid_msg: Vec<String>,
}

/// A flat course listing with skill attribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseListing {
    /// The course itself.
    #[serde(flatten)]
    pub resource: Resource,
    /// The skill(s) it was listed for.
    pub skills: Vec<SkillRef>,
}

/// Courses returned by the listing endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseList {
    /// Interleaved course listings, best first per skill.
    pub courses: Vec<CourseListing>,
}

/// Plans learning pathways over a resource catalogue.
pub struct PathwayPlanner<'a, C: ResourceCatalog> {
    catalog: &'a C,
    constraints: Constraints,
    ranks: RankTable,
    config: PlannerConfig,
}

impl<'a, C: ResourceCatalog> PathwayPlanner<'a, C> {
    /// Create a planner with default ranks and configuration.
    pub fn new(catalog: &'a C, constraints: Constraints) -> Self {
        Self {
            catalog,
            constraints,
            ranks: RankTable::default(),
            config: PlannerConfig::default(),
        }
    }

    /// Replace the planner configuration.
    #[must_use]
    pub fn with_config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the rank table.
    #[must_use]
    pub fn with_ranks(mut self, ranks: RankTable) -> Self {
        self.ranks = ranks;
        self
    }

    /// The active constraints.
    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    /// Stage 1: resolve the skill gap.
    pub fn identify_gap(&self, current: &SkillProfile, target: &SkillProfile) -> Vec<SkillId> {
        gap::identify_skill_gap(current, target, &self.ranks)
    }

    /// Stage 2: rank and weight feasible candidates for the gap.
    pub fn skill_scores(&self, gap: &[SkillId]) -> Result<WeightedTable, PathwayError> {
        let table = score_skills(self.catalog, gap, &self.constraints, self.config.top_n);
        weight_candidates(&table, &self.config.weights, &self.constraints)
    }

    /// Stage 3: run the Monte-Carlo search and externalize the winner.
    pub fn best_schedule(
        &self,
        gap: &[SkillId],
        weighted: &WeightedTable,
        schedule_start: OffsetDateTime,
    ) -> Result<PlanResult, PathwayError> {
        let max_hours_per_week = self.constraints.time.maximum_weekly_effort;
        let weeks_to_plan = self.constraints.time.maximum_duration;
        let mut rng = self.rng();
        let mut cache = DetailCache::new();

        let mut best: Option<(CandidateSelection, crate::WeeklySchedule, f64)> = None;
        for _ in 0..self.config.population {
            let selection = sample_selection(&mut rng, weighted, self.catalog, &mut cache);
            let (schedule, _outcomes) =
                pack(&selection.resources, max_hours_per_week, weeks_to_plan);
            // A zero-week horizon can never place anything; everything
            // else is scored, so a trial that covers some of the gap
            // (even unplaced) outranks one that covers none.
            let trial_score = if schedule.is_empty() {
                0.0
            } else {
                score_schedule(
                    gap,
                    &selection,
                    &schedule,
                    &self.constraints.time,
                    &self.config.score,
                )
            };
            let better = best
                .as_ref()
                .map(|(_, _, score)| trial_score > *score)
                .unwrap_or(true);
            if better {
                best = Some((selection, schedule, trial_score));
            }
        }
        let (selection, schedule, score) = best.ok_or(PathwayError::NoValidSchedule)?;
        info!(score, resources = selection.resources.len(), "best schedule selected");

        let courses = self.externalize(&selection, &schedule, schedule_start);
        let (valid, valid_msg) = self.validate_schedule(gap, &courses);
        let schedule_end = courses
            .values()
            .map(|c| c.end)
            .max()
            .unwrap_or(schedule_start);
        Ok(PlanResult {
            courses,
            schedule_start,
            schedule_end,
            valid,
            valid_msg,
        })
    }

    /// Convenience wrapper running all three stages.
    pub fn plan(
        &self,
        current: &SkillProfile,
        target: &SkillProfile,
        schedule_start: OffsetDateTime,
    ) -> Result<PlanResult, PathwayError> {
        let gap = self.identify_gap(current, target);
        debug!(gap = gap.len(), "skill gap resolved");
        let weighted = self.skill_scores(&gap)?;
        self.best_schedule(&gap, &weighted, schedule_start)
    }

    /// Top candidates for the given skills, interleaved round-robin
    /// (skill1-rank1, skill2-rank1, skill1-rank2, ...).
    pub fn courses_for_skill(
        &self,
        skill_ids: &[SkillId],
        n_courses: usize,
        n_courses_per_skill: usize,
    ) -> CourseList {
        let table = score_skills(self.catalog, skill_ids, &self.constraints, self.config.top_n);
        self.interleave(&table, n_courses, n_courses_per_skill, &[])
    }

    /// Alternatives for one scheduled course: candidates for the same
    /// skills, excluding everything already on the calendar.
    pub fn alternative_courses_for_skills(
        &self,
        schedule: &ExternalSchedule,
        resource_id: &str,
        n_courses: usize,
    ) -> CourseList {
        let skill_ids: Vec<SkillId> = schedule
            .get(resource_id)
            .map(|c| c.skills.iter().map(|s| s.id.clone()).collect())
            .unwrap_or_default();
        let excluded: Vec<&str> = schedule.keys().map(String::as_str).collect();
        let table = score_skills(self.catalog, &skill_ids, &self.constraints, self.config.top_n);
        self.interleave(&table, n_courses, usize::MAX, &excluded)
    }

    fn interleave(
        &self,
        table: &ScoreTable,
        n_courses: usize,
        n_courses_per_skill: usize,
        excluded: &[&str],
    ) -> CourseList {
        let mut list = CourseList::default();
        let non_empty: Vec<_> = table
            .by_skill
            .iter()
            .filter(|(_, candidates)| !candidates.is_empty())
            .collect();
        if non_empty.is_empty() {
            return list;
        }
        let skill_ids: Vec<SkillId> = non_empty.iter().map(|(s, _)| s.clone()).collect();
        let names = self.catalog.skill_names(&skill_ids);
        let depth = non_empty
            .iter()
            .map(|(_, candidates)| candidates.len())
            .min()
            .unwrap_or(0)
            .min(n_courses_per_skill);
        for rank in 0..depth {
            for (skill, candidates) in &non_empty {
                let resource = &candidates[rank].resource;
                if excluded.contains(&resource.id.as_str()) {
                    continue;
                }
                let name = names.get(skill).cloned().unwrap_or_else(|| skill.clone());
                list.courses.push(CourseListing {
                    resource: resource.clone(),
                    skills: vec![SkillRef {
                        id: skill.clone(),
                        name,
                    }],
                });
                if list.courses.len() >= n_courses {
                    return list;
                }
            }
        }
        list
    }

    /// Check an external schedule against the constraints.
    ///
    /// Returns `(valid, messages)`; every violated check appends a
    /// message, and `valid` is the conjunction of all checks.
    pub fn validate_schedule(
        &self,
        gap: &[SkillId],
        schedule: &ExternalSchedule,
    ) -> (bool, Vec<String>) {
        if schedule.is_empty() {
            let mut msg = vec!["Calendar is empty!".to_string()];
            let names = self.catalog.skill_names(gap);
            for skill in gap {
                let name = names
                    .get(skill)
                    .cloned()
                    .unwrap_or_else(|| format!("ID:{skill}"));
                msg.push(format!("The skill {name} is not taught"));
            }
            return (false, msg);
        }

        let mut valid = true;
        let mut msg = Vec::new();
        let time = &self.constraints.time;

        // min()/max() cannot fail on a non-empty map; the guard above
        // already returned for the empty calendar.
        let Some(start) = schedule.values().map(|c| c.start).min() else {
            return (false, vec!["Calendar is empty!".to_string()]);
        };
        let end = schedule.values().map(|c| c.end).max().unwrap_or(start);
        let span_seconds = (end - start).whole_seconds().max(0);
        let weeks = div_ceil(span_seconds, SECONDS_PER_WEEK) + 1;
        if weeks > i64::from(time.maximum_duration) {
            valid = false;
            msg.push("Courses have been scheduled over too many weeks".to_string());
        }

        // Weekly ceiling check.
        let mut weekly_total = vec![0u32; weeks.max(0) as usize];
        for course in schedule.values() {
            let offset_weeks = (course.start - start).whole_seconds().div_euclid(SECONDS_PER_WEEK);
            let first_week = offset_weeks.max(0) as usize;
            for (i, hours) in course.time_per_week.iter().enumerate() {
                let week = first_week + i;
                if week >= weekly_total.len() {
                    weekly_total.resize(week + 1, 0);
                }
                weekly_total[week] += hours;
            }
        }
        for (i, total) in weekly_total.iter().enumerate() {
            if *total > time.maximum_weekly_effort {
                valid = false;
                let week_start = start + Duration::weeks(i as i64);
                let stamp = week_start.format(&Rfc3339).unwrap_or_default();
                msg.push(format!("Too many hours scheduled for week {} ({stamp})", i + 1));
            }
        }

        // Coverage check.
        let mut taught: Vec<&SkillId> = Vec::new();
        let mut skill_names = std::collections::HashMap::new();
        for course in schedule.values() {
            for skill in &course.skills {
                taught.push(&skill.id);
                skill_names.insert(&skill.id, &skill.name);
            }
        }
        let catalog_names = self.catalog.skill_names(gap);
        for skill in gap {
            if !taught.iter().any(|t| *t == skill) {
                valid = false;
                // Prefer a display name from the schedule, then the
                // catalogue, then fall back to the raw id.
                let name = skill_names
                    .get(&skill)
                    .map(|n| (*n).clone())
                    .or_else(|| catalog_names.get(skill).cloned())
                    .unwrap_or_else(|| format!("ID:{skill}"));
                msg.push(format!("The skill {name} is not taught"));
            }
        }
        (valid, msg)
    }

    fn externalize(
        &self,
        selection: &CandidateSelection,
        schedule: &crate::WeeklySchedule,
        schedule_start: OffsetDateTime,
    ) -> ExternalSchedule {
        let attribution_skills: Vec<SkillId> = selection
            .attribution
            .values()
            .flatten()
            .cloned()
            .collect();
        let names = self.catalog.skill_names(&attribution_skills);
        let mut external = ExternalSchedule::new();
        for resource in &selection.resources {
            let weeks = schedule.weeks_for(&resource.id);
            let (Some(&first), Some(&last)) = (weeks.first(), weeks.last()) else {
                continue;
            };
            let end_week = last + 1;
            // Anchor to the resource's own weekday when it has a natural
            // start date.
            let offset = match resource.starts_at {
                Some(natural_start) => Duration::seconds(
                    (natural_start - schedule_start)
                        .whole_seconds()
                        .rem_euclid(SECONDS_PER_WEEK),
                ),
                None => Duration::ZERO,
            };
            let start = schedule_start + Duration::weeks(first as i64) + offset;
            let end = schedule_start + Duration::weeks(end_week as i64) + offset;
            let time_per_week: Vec<u32> = (first..end_week)
                .map(|week| {
                    schedule
                        .week(week)
                        .and_then(|w| w.get(&resource.id))
                        .copied()
                        .unwrap_or(0)
                })
                .collect();
            let skills: Vec<SkillRef> = selection
                .attribution
                .get(&resource.id)
                .map(|skill_ids| {
                    skill_ids
                        .iter()
                        .filter_map(|id| {
                            names.get(id).map(|name| SkillRef {
                                id: id.clone(),
                                name: name.clone(),
                            })
                        })
                        .collect()
                })
                .unwrap_or_default();
            external.insert(
                resource.id.clone(),
                ScheduledResource {
                    resource: resource.clone(),
                    start,
                    end,
                    time_per_week,
                    skills,
                },
            );
        }
        external
    }

    fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

fn div_ceil(value: i64, divisor: i64) -> i64 {
    (value + divisor - 1).div_euclid(divisor)
}
