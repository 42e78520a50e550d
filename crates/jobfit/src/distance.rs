//! Skill-profile distance models.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;
use upskill_catalog::{DetailCache, EmbeddingSource, ResourceCatalog};
use upskill_model::{ConstraintPatch, Constraints, RankTable, SkillId, SkillProfile, TimePatch};
use upskill_pathway::{pack, sample_many, PathwayError, PathwayPlanner};

/// Level label assumed for skills the source profile lacks.
const NO_KNOWLEDGE: &str = "no knowledge";

/// Parameters controlling how embedding distances become learning-speed
/// multipliers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceConfig {
    /// Embedding distance beyond which a skill contributes nothing.
    pub multiplier_threshold: f64,
    /// Multiplier used past the threshold or when an embedding is
    /// missing.
    pub multiplier_baseline: f64,
    /// Zero point of the learning-speed conversion.
    pub multiplier_offset: f64,
    /// Exponent applied to the learning-speed conversion.
    pub multiplier_power: f64,
    /// How many close skills may shrink a single target skill's gap.
    pub max_skills: usize,
    /// Trials for the duration-based distance.
    pub duration_population: usize,
    /// Explicit RNG seed for the duration-based distance.
    pub seed: Option<u64>,
}

impl Default for DistanceConfig {
    fn default() -> Self {
        Self {
            multiplier_threshold: 1.0,
            multiplier_baseline: 0.0,
            multiplier_offset: std::f64::consts::SQRT_2,
            multiplier_power: 2.0,
            max_skills: 5,
            duration_population: 1000,
            seed: None,
        }
    }
}

/// Per-skill line in a distance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillReport {
    /// Skill id.
    pub id: SkillId,
    /// Display name, falling back to the id when unknown.
    pub name: String,
    /// The source profile's level.
    pub current_level: String,
    /// The target profile's level.
    pub target_level: Option<String>,
}

/// Result of a distance computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceReport {
    /// Total remaining learning, in rank units after transfer discounts.
    pub distance: f64,
    /// Per-skill detail.
    pub skills: Vec<SkillReport>,
    /// Percentage fit: 100 means the source already meets the target.
    pub fit: f64,
}

/// Result of a duration-based distance computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationReport {
    /// Median schedule length in weeks across trials.
    pub distance: f64,
    /// Per-skill detail (as in [`DistanceReport`]).
    pub skills: Vec<SkillReport>,
    /// Raw per-trial schedule lengths, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_details: Option<Vec<usize>>,
}

/// Converts skill-profile gaps into scalar distances.
pub struct JobDistanceModel<'a, C: ResourceCatalog + EmbeddingSource> {
    catalog: &'a C,
    ranks: RankTable,
    config: DistanceConfig,
}

impl<'a, C: ResourceCatalog + EmbeddingSource> JobDistanceModel<'a, C> {
    /// Create a model with default ranks and parameters.
    pub fn new(catalog: &'a C) -> Self {
        Self {
            catalog,
            ranks: RankTable::default(),
            config: DistanceConfig::default(),
        }
    }

    /// Replace the rank table.
    #[must_use]
    pub fn with_ranks(mut self, ranks: RankTable) -> Self {
        self.ranks = ranks;
        self
    }

    /// Replace the model parameters.
    #[must_use]
    pub fn with_config(mut self, config: DistanceConfig) -> Self {
        self.config = config;
        self
    }

    /// Level-difference distance treating skills as independent.
    ///
    /// The step from one level to the next always costs one rank unit;
    /// met or exceeded targets cost nothing.
    pub fn simple_distance(&self, source: &SkillProfile, target: &SkillProfile) -> DistanceReport {
        let mut distance = 0u32;
        let mut skills = Vec::new();
        let names = self.names_for(target);
        for (skill, target_level) in target.iter() {
            let target_rank = self.ranks.target_rank(target_level);
            let source_level = self.source_level(source, skill);
            let source_rank = self.ranks.rank_or(&source_level, 0);
            distance += target_rank.saturating_sub(source_rank);
            skills.push(self.skill_report(&names, skill, source_level, target_level));
        }
        let profile_sum: u32 = target
            .iter()
            .map(|(_, level)| self.ranks.target_rank(level))
            .sum();
        DistanceReport {
            distance: f64::from(distance),
            fit: fit_percentage(f64::from(profile_sum), f64::from(distance)),
            skills,
        }
    }

    /// Transfer-discounted distance.
    ///
    /// For every unmet target skill, closely related skills the source is
    /// already strong in shrink the remaining gap. Relatedness comes from
    /// embedding Euclidean distance; the discount is proportional to the
    /// level overlap between the helping skill and the gap being closed.
    pub fn distance(&self, source: &SkillProfile, target: &SkillProfile) -> DistanceReport {
        let mut all_skills: Vec<SkillId> = source.skill_ids().cloned().collect();
        all_skills.extend(target.skill_ids().cloned());
        let embeddings = self.catalog.embeddings(&all_skills);
        let names = self.names_for(target);
        let max_skill_gap = f64::from(self.ranks.max_gap());

        let mut total_distance = 0.0;
        let mut profile_sum = 0u32;
        let mut skills = Vec::new();
        for (target_skill, target_level) in target.iter() {
            let target_rank = self.ranks.target_rank(target_level);
            profile_sum += target_rank;
            let source_level = self.source_level(source, target_skill);
            let source_rank = self.ranks.rank_or(&source_level, 0);
            skills.push(self.skill_report(&names, target_skill, source_level, target_level));
            if source_rank >= target_rank {
                continue;
            }

            let mut multipliers: Vec<(f64, u32)> = source
                .iter()
                .filter(|(skill, _)| *skill != target_skill)
                .map(|(skill, level)| {
                    let speed = self.learning_speed(
                        embeddings.get(target_skill).and_then(|e| e.as_deref()),
                        embeddings.get(skill).and_then(|e| e.as_deref()),
                    );
                    let rank = level.map(|l| self.ranks.rank_or(l, 0)).unwrap_or(0);
                    (speed, rank)
                })
                .collect();
            multipliers.sort_by(|a, b| {
                b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal)
            });

            let mut gap = f64::from(target_rank - source_rank);
            for (multiplier, helper_rank) in multipliers.iter().take(self.config.max_skills) {
                let overlap = f64::from(
                    target_rank.min(*helper_rank) - source_rank.min(*helper_rank),
                ) / max_skill_gap;
                gap -= multiplier * gap * overlap;
            }
            total_distance += gap;
        }
        DistanceReport {
            distance: round2(total_distance),
            fit: round2(fit_percentage(f64::from(profile_sum), total_distance)),
            skills,
        }
    }

    /// Throughput-based distance: how many weeks of study the pathway
    /// engine needs to close the gap, reported as the median schedule
    /// length across many sampled selections.
    pub fn duration(
        &self,
        source: &SkillProfile,
        target: &SkillProfile,
        return_details: bool,
    ) -> Result<DurationReport, PathwayError> {
        let constraints = Constraints::from_patch(ConstraintPatch {
            time: Some(TimePatch {
                target_weekly_effort: Some(5.0),
                maximum_weekly_effort: Some(10.0),
                target_duration: Some(12.0),
                maximum_duration: Some(104.0),
                ..TimePatch::default()
            }),
            ..ConstraintPatch::default()
        });
        let planner = PathwayPlanner::new(self.catalog, constraints.clone())
            .with_ranks(self.ranks.clone());
        let gap = planner.identify_gap(source, target);
        let weighted = planner.skill_scores(&gap)?;

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut cache = DetailCache::new();
        let selections = sample_many(
            &mut rng,
            self.config.duration_population,
            &weighted,
            self.catalog,
            &mut cache,
        );
        let mut lengths: Vec<usize> = selections
            .iter()
            .map(|selection| {
                let (schedule, _) = pack(
                    &selection.resources,
                    constraints.time.maximum_weekly_effort,
                    constraints.time.maximum_duration,
                );
                schedule.pruned_len()
            })
            .collect();
        debug!(trials = lengths.len(), "duration trials complete");
        let distance = median(&mut lengths);
        Ok(DurationReport {
            distance,
            skills: self.distance(source, target).skills,
            duration_details: return_details.then_some(lengths),
        })
    }

    /// Evaluate the transfer-discounted distance against many targets.
    pub fn multiple_distances(
        &self,
        source: &SkillProfile,
        targets: &[SkillProfile],
    ) -> Vec<DistanceReport> {
        targets.iter().map(|t| self.distance(source, t)).collect()
    }

    /// Evaluate the duration-based distance against many targets.
    pub fn multiple_durations(
        &self,
        source: &SkillProfile,
        targets: &[SkillProfile],
    ) -> Result<Vec<DurationReport>, PathwayError> {
        targets
            .iter()
            .map(|t| self.duration(source, t, false))
            .collect()
    }

    /// The rank table in use.
    pub fn ranks(&self) -> &RankTable {
        &self.ranks
    }

    fn learning_speed(&self, a: Option<&[f32]>, b: Option<&[f32]>) -> f64 {
        let (Some(a), Some(b)) = (a, b) else {
            return self.config.multiplier_baseline;
        };
        let distance = euclidean(a, b);
        if distance > self.config.multiplier_threshold {
            return self.config.multiplier_baseline;
        }
        let y = (self.config.multiplier_offset - distance) / self.config.multiplier_offset;
        y.powf(self.config.multiplier_power)
    }

    fn source_level(&self, source: &SkillProfile, skill: &str) -> String {
        source
            .get(skill)
            .flatten()
            .unwrap_or(NO_KNOWLEDGE)
            .to_string()
    }

    fn names_for(&self, target: &SkillProfile) -> HashMap<SkillId, String> {
        let ids: Vec<SkillId> = target.skill_ids().cloned().collect();
        self.catalog.skill_names(&ids)
    }

    fn skill_report(
        &self,
        names: &HashMap<SkillId, String>,
        skill: &SkillId,
        current_level: String,
        target_level: Option<&str>,
    ) -> SkillReport {
        SkillReport {
            id: skill.clone(),
            name: names.get(skill).cloned().unwrap_or_else(|| skill.clone()),
            current_level,
            target_level: target_level.map(str::to_string),
        }
    }
}

fn euclidean(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = f64::from(*x) - f64::from(*y);
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

fn fit_percentage(profile_sum: f64, distance: f64) -> f64 {
    if profile_sum == 0.0 {
        100.0
    } else {
        100.0 * (profile_sum - distance) / profile_sum
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn median(values: &mut [usize]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid] as f64
    } else {
        (values[mid - 1] + values[mid]) as f64 / 2.0
    }
}
