//! Weighted Monte-Carlo sampling of candidate resource selections.

use crate::scorer::WeightedTable;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use std::collections::HashMap;
use tracing::debug;
use upskill_catalog::{DetailCache, ResourceCatalog};
use upskill_model::{Resource, ResourceId, SkillId};

/// One sampled assignment of resources to gap skills.
///
/// Resources are deduplicated: a resource picked for several skills
/// appears once in `resources`, and `attribution` records every skill
/// that recommended it.
#[derive(Debug, Clone, Default)]
pub struct CandidateSelection {
    /// Distinct resources in first-pick order.
    pub resources: Vec<Resource>,
    /// resource id -> skills that selected it.
    pub attribution: HashMap<ResourceId, Vec<SkillId>>,
}

/// Sample one candidate selection.
///
/// For each gap skill (in gap order) one resource is drawn with
/// probability proportional to its sampling weight. Skills with no
/// candidates are skipped silently; validation reports them later as
/// untaught. Candidates that surfaced without full detail are backfilled
/// through the batched detail cache.
pub fn sample_selection<R: Rng>(
    rng: &mut R,
    weighted: &WeightedTable,
    catalog: &dyn ResourceCatalog,
    cache: &mut DetailCache,
) -> CandidateSelection {
    let mut picked_ids: Vec<ResourceId> = Vec::new();
    let mut known: HashMap<ResourceId, Resource> = HashMap::new();
    let mut attribution: HashMap<ResourceId, Vec<SkillId>> = HashMap::new();

    for (skill, candidates) in &weighted.by_skill {
        if candidates.is_empty() {
            continue;
        }
        let weights: Vec<f64> = candidates.iter().map(|c| c.weight).collect();
        let index = match WeightedIndex::new(&weights) {
            Ok(dist) => dist.sample(rng),
            // Degenerate weights (all zero or negative): fall back to a
            // uniform draw rather than dropping the skill.
            Err(_) => rng.gen_range(0..candidates.len()),
        };
        let resource = &candidates[index].resource;
        if !picked_ids.contains(&resource.id) {
            picked_ids.push(resource.id.clone());
        }
        known
            .entry(resource.id.clone())
            .or_insert_with(|| resource.clone());
        attribution
            .entry(resource.id.clone())
            .or_default()
            .push(skill.clone());
    }

    let missing: Vec<ResourceId> = picked_ids
        .iter()
        .filter(|id| !known.contains_key(*id))
        .cloned()
        .collect();
    known.extend(cache.details(catalog, &missing));

    let resources = picked_ids
        .iter()
        .filter_map(|id| known.get(id).cloned())
        .collect();
    CandidateSelection {
        resources,
        attribution,
    }
}

/// Sample `n` independent candidate selections.
pub fn sample_many<R: Rng>(
    rng: &mut R,
    n: usize,
    weighted: &WeightedTable,
    catalog: &dyn ResourceCatalog,
    cache: &mut DetailCache,
) -> Vec<CandidateSelection> {
    debug!(population = n, "sampling candidate selections");
    (0..n)
        .map(|_| sample_selection(rng, weighted, catalog, cache))
        .collect()
}
