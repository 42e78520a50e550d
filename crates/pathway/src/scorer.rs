//! Per-skill resource ranking and sampling weights.

use crate::PathwayError;
use serde::{Deserialize, Serialize};
use tracing::debug;
use upskill_catalog::ResourceCatalog;
use upskill_model::{Constraints, DurationSpec, Resource, SkillId};

/// Fixed weight ladder for the `rank2` strategy: the top three candidates
/// dominate, the tail is padded with 1s.
const RANK2_WEIGHTS: [f64; 10] = [100.0, 100.0, 100.0, 50.0, 50.0, 10.0, 8.0, 6.0, 4.0, 2.0];

/// A feasible candidate resource with its raw catalogue score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    /// The candidate resource.
    pub resource: Resource,
    /// Raw score from the catalogue.
    pub score: f64,
}

/// Per-skill candidate lists in gap order, score descending.
#[derive(Debug, Clone, Default)]
pub struct ScoreTable {
    /// One row per gap skill; skills with no feasible candidates keep an
    /// empty row.
    pub by_skill: Vec<(SkillId, Vec<ScoredCandidate>)>,
}

/// Fetch and filter the top candidates for each gap skill.
///
/// Candidates arrive from the catalogue ordered by score descending and
/// are dropped when they fail the constraint feasibility checks:
/// - resource type on the blacklist
/// - seconds-equivalent duration outside
///   `[minimum_course_duration, maximum_course_duration]`
/// - weekly courses longer than `maximum_duration` weeks or heavier than
///   `maximum_weekly_effort` hours per week
///
/// Each skill's list is truncated to `top_n`.
pub fn score_skills(
    catalog: &dyn ResourceCatalog,
    gap: &[SkillId],
    constraints: &Constraints,
    top_n: usize,
) -> ScoreTable {
    let rows = catalog.scored_resources(gap, &constraints.sources.kinds.whitelist);
    debug!(candidates = rows.len(), skills = gap.len(), "scoring skills");
    let mut table = ScoreTable {
        by_skill: gap.iter().map(|s| (s.clone(), Vec::new())).collect(),
    };
    for row in rows {
        let Some(entry) = table.by_skill.iter_mut().find(|(s, _)| *s == row.skill_id) else {
            continue;
        };
        if entry.1.len() >= top_n {
            continue;
        }
        if !fits_constraints(&row.resource, constraints) {
            continue;
        }
        entry.1.push(ScoredCandidate {
            resource: row.resource,
            score: row.score,
        });
    }
    table
}

fn fits_constraints(resource: &Resource, constraints: &Constraints) -> bool {
    if constraints.sources.kinds.blacklist.contains(&resource.kind) {
        return false;
    }
    let time = &constraints.time;
    match resource.duration {
        DurationSpec::Weekly {
            weeks,
            hours_per_week,
        } => {
            if weeks > time.maximum_duration || hours_per_week > time.maximum_weekly_effort {
                return false;
            }
            let seconds = resource
                .duration
                .seconds_equivalent()
                .unwrap_or(u64::MAX);
            seconds >= time.minimum_course_duration && seconds <= time.maximum_course_duration
        }
        DurationSpec::Seconds { value } => {
            value >= time.minimum_course_duration && value <= time.maximum_course_duration
        }
        // No duration information to check against.
        DurationSpec::Unspecified => true,
    }
}

/// Score-transform strategies for sampling weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreStrategy {
    /// Use the raw catalogue score.
    Identity,
    /// Linear by rank position: `count - index`.
    Rank,
    /// The fixed decreasing weight ladder.
    Rank2,
}

impl ScoreStrategy {
    /// Resolve a strategy by name. Unknown names fail fast.
    pub fn from_name(name: &str) -> Result<Self, PathwayError> {
        match name {
            "identity" => Ok(Self::Identity),
            "rank" => Ok(Self::Rank),
            "rank2" => Ok(Self::Rank2),
            other => Err(PathwayError::UnknownScoreStrategy(other.to_string())),
        }
    }

    /// Compute the score component for a score-descending candidate list.
    pub fn weights(&self, scores: &[f64]) -> Vec<f64> {
        match self {
            Self::Identity => scores.to_vec(),
            Self::Rank => {
                let m = scores.len();
                (0..m).map(|i| (m - i) as f64).collect()
            }
            Self::Rank2 => (0..scores.len())
                .map(|i| RANK2_WEIGHTS.get(i).copied().unwrap_or(1.0))
                .collect(),
        }
    }
}

/// Duration-transform strategies for sampling weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationStrategy {
    /// Duration does not influence the weight.
    Blank,
}

impl DurationStrategy {
    /// Resolve a strategy by name. Unknown names fail fast.
    pub fn from_name(name: &str) -> Result<Self, PathwayError> {
        match name {
            "blank" => Ok(Self::Blank),
            other => Err(PathwayError::UnknownDurationStrategy(other.to_string())),
        }
    }

    /// Compute the duration component for a candidate list.
    pub fn weights(&self, candidates: &[ScoredCandidate], _constraints: &Constraints) -> Vec<f64> {
        match self {
            Self::Blank => vec![0.0; candidates.len()],
        }
    }
}

/// How score and duration components combine into a sampling weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightConfig {
    /// Score strategy name, resolved through the registry.
    pub score_strategy: String,
    /// Duration strategy name, resolved through the registry.
    pub duration_strategy: String,
    /// Multiplier on the score component.
    pub score_weight: f64,
    /// Multiplier on the duration component.
    pub duration_weight: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            score_strategy: "rank2".to_string(),
            duration_strategy: "blank".to_string(),
            score_weight: 1.0,
            duration_weight: 1.0,
        }
    }
}

/// A candidate with its sampling weight.
#[derive(Debug, Clone)]
pub struct WeightedCandidate {
    /// The candidate resource.
    pub resource: Resource,
    /// Score component (strategy output, not necessarily the raw score).
    pub score: f64,
    /// Duration component.
    pub duration: f64,
    /// Combined sampling weight.
    pub weight: f64,
}

/// Per-skill weighted candidate lists in gap order.
#[derive(Debug, Clone, Default)]
pub struct WeightedTable {
    /// One row per gap skill.
    pub by_skill: Vec<(SkillId, Vec<WeightedCandidate>)>,
}

impl WeightedTable {
    /// Candidates for one skill, if the skill has a row.
    pub fn candidates(&self, skill: &str) -> Option<&[WeightedCandidate]> {
        self.by_skill
            .iter()
            .find(|(s, _)| s == skill)
            .map(|(_, c)| c.as_slice())
    }
}

/// Attach sampling weights to a score table.
///
/// `weight = score_weight * score_component + duration_weight *
/// duration_component`. Each skill's list is re-sorted by score component
/// descending (stable, so rank strategies preserve catalogue order).
pub fn weight_candidates(
    table: &ScoreTable,
    config: &WeightConfig,
    constraints: &Constraints,
) -> Result<WeightedTable, PathwayError> {
    let score_strategy = ScoreStrategy::from_name(&config.score_strategy)?;
    let duration_strategy = DurationStrategy::from_name(&config.duration_strategy)?;
    let mut out = WeightedTable::default();
    for (skill, candidates) in &table.by_skill {
        let raw_scores: Vec<f64> = candidates.iter().map(|c| c.score).collect();
        let scores = score_strategy.weights(&raw_scores);
        let durations = duration_strategy.weights(candidates, constraints);
        let mut weighted: Vec<WeightedCandidate> = candidates
            .iter()
            .zip(scores.iter().zip(durations.iter()))
            .map(|(candidate, (&score, &duration))| WeightedCandidate {
                resource: candidate.resource.clone(),
                score,
                duration,
                weight: config.score_weight * score + config.duration_weight * duration,
            })
            .collect();
        weighted.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        out.by_skill.push((skill.clone(), weighted));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use upskill_catalog::InMemoryCatalog;
    use upskill_model::ResourceScore;

    fn resource(id: &str, duration: DurationSpec) -> Resource {
        Resource {
            id: id.into(),
            name: id.to_uppercase(),
            kind: "video".into(),
            provider: None,
            platform: None,
            url: None,
            description: None,
            short_description: None,
            duration,
            starts_at: None,
        }
    }

    fn catalog_with(rows: &[(&str, DurationSpec, f64)]) -> InMemoryCatalog {
        let mut catalog = InMemoryCatalog::new();
        for (id, duration, score) in rows {
            catalog = catalog
                .with_resource(resource(id, duration.clone()))
                .with_score(ResourceScore {
                    resource_id: (*id).into(),
                    skill_id: "s1".into(),
                    score: *score,
                    kind: None,
                });
        }
        catalog
    }

    #[test]
    fn test_infeasible_durations_filtered() {
        let catalog = catalog_with(&[
            ("fits", DurationSpec::Seconds { value: 3600 }, 0.9),
            // Over a year of study.
            ("too_long", DurationSpec::Seconds { value: 40_000_000 }, 0.8),
            // 20 weeks exceeds the 16-week maximum.
            (
                "too_many_weeks",
                DurationSpec::Weekly {
                    weeks: 20,
                    hours_per_week: 2,
                },
                0.7,
            ),
            // 9 h/wk exceeds the 5 h/wk ceiling.
            (
                "too_heavy",
                DurationSpec::Weekly {
                    weeks: 2,
                    hours_per_week: 9,
                },
                0.6,
            ),
        ]);
        let table = score_skills(
            &catalog,
            &["s1".to_string()],
            &Constraints::default(),
            20,
        );
        let row = &table.by_skill[0].1;
        assert_eq!(row.len(), 1);
        assert_eq!(row[0].resource.id, "fits");
    }

    #[test]
    fn test_blacklisted_type_filtered() {
        let catalog = catalog_with(&[("v", DurationSpec::Seconds { value: 3600 }, 0.9)]);
        let mut constraints = Constraints::default();
        constraints.sources.kinds.blacklist.push("video".to_string());
        let table = score_skills(&catalog, &["s1".to_string()], &constraints, 20);
        assert!(table.by_skill[0].1.is_empty());
    }

    #[test]
    fn test_top_n_truncation() {
        let rows: Vec<(String, DurationSpec, f64)> = (0..30)
            .map(|i| {
                (
                    format!("r{i}"),
                    DurationSpec::Seconds { value: 3600 },
                    1.0 - i as f64 / 100.0,
                )
            })
            .collect();
        let borrowed: Vec<(&str, DurationSpec, f64)> = rows
            .iter()
            .map(|(id, d, s)| (id.as_str(), d.clone(), *s))
            .collect();
        let catalog = catalog_with(&borrowed);
        let table = score_skills(&catalog, &["s1".to_string()], &Constraints::default(), 20);
        assert_eq!(table.by_skill[0].1.len(), 20);
        // Highest scores survive truncation.
        assert_eq!(table.by_skill[0].1[0].resource.id, "r0");
    }

    #[test]
    fn test_score_strategies() {
        let scores = [0.5, 0.4, 0.3];
        assert_eq!(
            ScoreStrategy::Identity.weights(&scores),
            vec![0.5, 0.4, 0.3]
        );
        assert_eq!(ScoreStrategy::Rank.weights(&scores), vec![3.0, 2.0, 1.0]);
        let many = vec![0.0; 12];
        let rank2 = ScoreStrategy::Rank2.weights(&many);
        assert_eq!(rank2[0], 100.0);
        assert_eq!(rank2[9], 2.0);
        assert_eq!(rank2[10], 1.0);
        assert_eq!(rank2[11], 1.0);
    }

    #[test]
    fn test_unknown_strategy_fails_fast() {
        assert!(matches!(
            ScoreStrategy::from_name("bogus"),
            Err(PathwayError::UnknownScoreStrategy(_))
        ));
        assert!(matches!(
            DurationStrategy::from_name("bogus"),
            Err(PathwayError::UnknownDurationStrategy(_))
        ));
    }

    #[test]
    fn test_weight_combination() {
        let catalog = catalog_with(&[
            ("a", DurationSpec::Seconds { value: 3600 }, 0.9),
            ("b", DurationSpec::Seconds { value: 3600 }, 0.1),
        ]);
        let constraints = Constraints::default();
        let table = score_skills(&catalog, &["s1".to_string()], &constraints, 20);
        let config = WeightConfig {
            score_strategy: "identity".into(),
            score_weight: 2.0,
            ..WeightConfig::default()
        };
        let weighted = weight_candidates(&table, &config, &constraints).unwrap();
        let row = weighted.candidates("s1").unwrap();
        assert!((row[0].weight - 1.8).abs() < 1e-9);
        assert!((row[1].weight - 0.2).abs() < 1e-9);
    }
}
