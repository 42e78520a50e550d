//! Boundary traits for the excluded data layer.
//!
//! The planning engine never talks to a database directly; it consumes
//! these traits, which a real deployment backs with its relational store
//! and embedding service. Reads are synchronous and batched before
//! planning begins. [`InMemoryCatalog`] backs tests and the CLI.

mod cache;
mod memory;

pub use cache::DetailCache;
pub use memory::InMemoryCatalog;

use std::collections::HashMap;
use upskill_model::{Resource, ResourceId, SkillId};

/// A resource joined with one of its per-skill scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredResource {
    /// The skill the score applies to.
    pub skill_id: SkillId,
    /// Full resource detail.
    pub resource: Resource,
    /// The score used for ranking.
    pub score: f64,
}

/// Read access to the resource catalogue and its scores.
pub trait ResourceCatalog {
    /// All scored resources for the given skills, ordered by score
    /// descending. When `type_whitelist` is non-empty only resources of
    /// those types are returned.
    fn scored_resources(
        &self,
        skill_ids: &[SkillId],
        type_whitelist: &[String],
    ) -> Vec<ScoredResource>;

    /// Batch-fetch resource detail by id. Unknown ids are omitted.
    fn resource_details(&self, ids: &[ResourceId]) -> HashMap<ResourceId, Resource>;

    /// Batch-fetch display names for skills. Unknown ids are omitted.
    fn skill_names(&self, ids: &[SkillId]) -> HashMap<SkillId, String>;
}

/// Read access to precomputed skill embeddings.
pub trait EmbeddingSource {
    /// Batch-fetch embeddings. Every requested id is present in the
    /// result; skills without an embedding map to `None`.
    fn embeddings(&self, skill_ids: &[SkillId]) -> HashMap<SkillId, Option<Vec<f32>>>;
}
