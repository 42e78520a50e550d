//! In-memory catalogue used by tests and the CLI.

use crate::{EmbeddingSource, ResourceCatalog, ScoredResource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use upskill_model::{Resource, ResourceId, ResourceScore, SkillId};

/// A complete catalogue held in memory.
///
/// Deserializes directly from a JSON document with `resources`, `scores`,
/// `skills` and `embeddings` sections, so a fixture file can stand in for
/// the relational store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryCatalog {
    /// All known resources.
    #[serde(default)]
    pub resources: Vec<Resource>,
    /// All known (resource, skill) scores.
    #[serde(default)]
    pub scores: Vec<ResourceScore>,
    /// Skill display names.
    #[serde(default)]
    pub skills: HashMap<SkillId, String>,
    /// Skill embeddings.
    #[serde(default)]
    pub embeddings: HashMap<SkillId, Vec<f32>>,
}

impl InMemoryCatalog {
    /// Create an empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource.
    #[must_use]
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }

    /// Add a score.
    #[must_use]
    pub fn with_score(mut self, score: ResourceScore) -> Self {
        self.scores.push(score);
        self
    }

    /// Add a skill display name.
    #[must_use]
    pub fn with_skill(mut self, id: impl Into<SkillId>, name: impl Into<String>) -> Self {
        self.skills.insert(id.into(), name.into());
        self
    }

    /// Add a skill embedding.
    #[must_use]
    pub fn with_embedding(mut self, id: impl Into<SkillId>, embedding: Vec<f32>) -> Self {
        self.embeddings.insert(id.into(), embedding);
        self
    }

    fn resource(&self, id: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id == id)
    }
}

impl ResourceCatalog for InMemoryCatalog {
    fn scored_resources(
        &self,
        skill_ids: &[SkillId],
        type_whitelist: &[String],
    ) -> Vec<ScoredResource> {
        // Several score kinds can exist for the same pair; only the best
        // one ranks.
        let mut best: HashMap<(SkillId, ResourceId), f64> = HashMap::new();
        for score in &self.scores {
            if !skill_ids.contains(&score.skill_id) {
                continue;
            }
            let key = (score.skill_id.clone(), score.resource_id.clone());
            let entry = best.entry(key).or_insert(f64::NEG_INFINITY);
            if score.score > *entry {
                *entry = score.score;
            }
        }
        let mut rows: Vec<ScoredResource> = best
            .into_iter()
            .filter_map(|((skill_id, resource_id), score)| {
                let resource = self.resource(&resource_id)?;
                if !type_whitelist.is_empty() && !type_whitelist.contains(&resource.kind) {
                    return None;
                }
                Some(ScoredResource {
                    skill_id,
                    resource: resource.clone(),
                    score,
                })
            })
            .collect();
        // Secondary keys keep tied scores deterministic.
        rows.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.resource.id.cmp(&b.resource.id))
                .then_with(|| a.skill_id.cmp(&b.skill_id))
        });
        rows
    }

    fn resource_details(&self, ids: &[ResourceId]) -> HashMap<ResourceId, Resource> {
        ids.iter()
            .filter_map(|id| self.resource(id).map(|r| (id.clone(), r.clone())))
            .collect()
    }

    fn skill_names(&self, ids: &[SkillId]) -> HashMap<SkillId, String> {
        ids.iter()
            .filter_map(|id| self.skills.get(id).map(|name| (id.clone(), name.clone())))
            .collect()
    }
}

impl EmbeddingSource for InMemoryCatalog {
    fn embeddings(&self, skill_ids: &[SkillId]) -> HashMap<SkillId, Option<Vec<f32>>> {
        skill_ids
            .iter()
            .map(|id| (id.clone(), self.embeddings.get(id).cloned()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use upskill_model::DurationSpec;

    fn resource(id: &str, kind: &str) -> Resource {
        Resource {
            id: id.into(),
            name: id.to_uppercase(),
            kind: kind.into(),
            provider: None,
            platform: None,
            url: None,
            description: None,
            short_description: None,
            duration: DurationSpec::Seconds { value: 3600 },
            starts_at: None,
        }
    }

    fn score(resource_id: &str, skill_id: &str, value: f64) -> ResourceScore {
        ResourceScore {
            resource_id: resource_id.into(),
            skill_id: skill_id.into(),
            score: value,
            kind: None,
        }
    }

    #[test]
    fn test_scored_resources_ordered_and_filtered() {
        let catalog = InMemoryCatalog::new()
            .with_resource(resource("r1", "video"))
            .with_resource(resource("r2", "article"))
            .with_score(score("r1", "s1", 0.4))
            .with_score(score("r2", "s1", 0.9));
        let rows = catalog.scored_resources(&["s1".into()], &[]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].resource.id, "r2");

        let only_video = catalog.scored_resources(&["s1".into()], &["video".into()]);
        assert_eq!(only_video.len(), 1);
        assert_eq!(only_video[0].resource.id, "r1");
    }

    #[test]
    fn test_best_score_kind_wins() {
        let catalog = InMemoryCatalog::new()
            .with_resource(resource("r1", "video"))
            .with_score(ResourceScore {
                resource_id: "r1".into(),
                skill_id: "s1".into(),
                score: 0.3,
                kind: Some("simple_avg".into()),
            })
            .with_score(ResourceScore {
                resource_id: "r1".into(),
                skill_id: "s1".into(),
                score: 0.8,
                kind: Some("level:manual".into()),
            });
        let rows = catalog.scored_resources(&["s1".into()], &[]);
        assert_eq!(rows.len(), 1);
        assert!((rows[0].score - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_embeddings_mark_missing_as_none() {
        let catalog = InMemoryCatalog::new().with_embedding("s1", vec![1.0, 0.0]);
        let out = catalog.embeddings(&["s1".into(), "s2".into()]);
        assert!(out["s1"].is_some());
        assert!(out["s2"].is_none());
    }

    #[test]
    fn test_deserializes_from_fixture_document() {
        let doc = r#"{
            "resources": [{
                "id": "r1", "name": "Intro", "type": "video",
                "duration": {"unit": "seconds", "value": 3600}
            }],
            "scores": [{"resource_id": "r1", "skill_id": "s1", "score": 1.0}],
            "skills": {"s1": "Rust"}
        }"#;
        let catalog: InMemoryCatalog = serde_json::from_str(doc).unwrap();
        assert_eq!(catalog.resources.len(), 1);
        assert_eq!(catalog.skill_names(&["s1".into()])["s1"], "Rust");
    }
}
