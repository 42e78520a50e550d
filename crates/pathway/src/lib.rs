//! Pathway planning engine.
//!
//! Given a learner's current skills, a target skill set and a scored
//! resource catalogue, this crate:
//! - resolves the skill gap ([`identify_skill_gap`])
//! - ranks and weights feasible resources per gap skill ([`score_skills`],
//!   [`weight_candidates`])
//! - Monte-Carlo samples candidate selections ([`sample_selection`])
//! - packs each selection into a weekly calendar ([`pack`])
//! - scores the resulting schedules ([`score_schedule`]) and picks the
//!   best one ([`PathwayPlanner::best_schedule`])
//!
//! All stages are pure functions over their inputs; [`PathwayPlanner`]
//! only bundles the catalogue, constraints and configuration.

mod error;
pub mod external;
pub mod gap;
pub mod planner;
pub mod schedule;
pub mod score;
pub mod scorer;
pub mod select;

pub use error::PathwayError;
pub use external::{normalize_datetime, ExternalSchedule, ScheduledResource, SkillRef};
pub use gap::identify_skill_gap;
pub use planner::{CourseList, PathwayPlanner, PlanResult, PlannerConfig};
pub use schedule::{pack, PlacementOutcome, PlacementReason, WeeklySchedule};
pub use score::{score_schedule, ScoreConfig};
pub use scorer::{
    score_skills, weight_candidates, DurationStrategy, ScoreStrategy, ScoreTable, ScoredCandidate,
    WeightConfig, WeightedCandidate, WeightedTable,
};
pub use select::{sample_many, sample_selection, CandidateSelection};
