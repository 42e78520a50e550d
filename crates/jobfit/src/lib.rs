//! Job-fit modelling and workforce planning.
//!
//! [`JobDistanceModel`] converts the gap between a source and a target
//! skill profile into a scalar distance, discounting required learning by
//! cross-skill transfer derived from embedding proximity. It also offers
//! a throughput-based alternative: the median number of weeks the pathway
//! engine needs to close the gap.
//!
//! [`WorkforcePlanner`] uses those distances to assign many employees to
//! many target roles under capacity constraints.

pub mod distance;
pub mod planner;

pub use distance::{
    DistanceConfig, DistanceReport, DurationReport, JobDistanceModel, SkillReport,
};
pub use planner::{Employee, MatchEntry, TargetRole, WorkforcePlan, WorkforcePlanner};
