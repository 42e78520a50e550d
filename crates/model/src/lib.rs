//! Core data types for the upskill planning engine.
//!
//! This crate provides:
//! - Ordinal skill level tables ([`RankTable`]) covering both the fixed
//!   five-level ladder and organization-defined cutoff ladders
//! - Insertion-ordered skill profiles ([`SkillProfile`])
//! - Learning resources with tagged duration encodings ([`Resource`],
//!   [`DurationSpec`]) and their per-skill scores ([`ResourceScore`])
//! - The constraint model with default-merge and normalization
//!   ([`Constraints`], [`ConstraintPatch`])

pub mod constraints;
pub mod level;
pub mod profile;
pub mod resource;

pub use constraints::{
    ConstraintPatch, Constraints, CostConstraints, CostPatch, SourceConstraints, SourcePatch,
    TimeConstraints, TimePatch, TypeFilter, TypeFilterPatch,
};
pub use level::{RankError, RankTable, DEFAULT_TARGET_RANK};
pub use profile::SkillProfile;
pub use resource::{DurationSpec, Resource, ResourceScore, SECONDS_PER_WEEK};

/// Identifier for a skill node in the organization's skill graph.
pub type SkillId = String;

/// Identifier for a learning resource in the catalogue.
pub type ResourceId = String;
