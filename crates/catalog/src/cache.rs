//! Per-call resource detail cache.

use crate::ResourceCatalog;
use std::collections::HashMap;
use tracing::debug;
use upskill_model::{Resource, ResourceId};

/// Memoizes batched resource-detail fetches for the duration of one
/// planning call.
///
/// Each sampled candidate selection may need detail for resources that
/// only surfaced as ids; this cache ensures each id hits the catalogue at
/// most once per call. Nothing is shared across calls.
#[derive(Debug, Default)]
pub struct DetailCache {
    cache: HashMap<ResourceId, Resource>,
}

impl DetailCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch detail for the given ids, reading through to the catalogue
    /// only for ids not yet cached. Ids unknown to the catalogue are
    /// omitted from the result.
    pub fn details(
        &mut self,
        catalog: &dyn ResourceCatalog,
        ids: &[ResourceId],
    ) -> HashMap<ResourceId, Resource> {
        let missing: Vec<ResourceId> = ids
            .iter()
            .filter(|id| !self.cache.contains_key(*id))
            .cloned()
            .collect();
        if !missing.is_empty() {
            debug!(count = missing.len(), "fetching resource details");
            self.cache.extend(catalog.resource_details(&missing));
        }
        ids.iter()
            .filter_map(|id| self.cache.get(id).map(|r| (id.clone(), r.clone())))
            .collect()
    }
}
