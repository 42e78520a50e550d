//! Greedy workforce planning over job distances.

use crate::distance::JobDistanceModel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;
use upskill_catalog::{EmbeddingSource, ResourceCatalog};
use upskill_model::SkillProfile;

/// An employee considered for retraining.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    /// Caller-assigned identifier.
    pub id: String,
    /// Current skill profile.
    pub skills: SkillProfile,
}

/// A role the organization needs to fill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetRole {
    /// Caller-assigned identifier.
    pub id: String,
    /// Required skill profile.
    pub skills: SkillProfile,
    /// How many employees the role needs.
    pub number_needed: usize,
    /// Longest acceptable retraining distance for this role.
    pub max_training: f64,
}

/// One side of a surviving employee/role pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEntry {
    /// The counterpart's identifier.
    pub id: String,
    /// Percentage fit relative to the role's total skill-level sum.
    pub fit: f64,
}

/// The matching produced by a planning call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkforcePlan {
    /// Recommended roles per employee, best fit first.
    pub targets_by_employee: BTreeMap<String, Vec<MatchEntry>>,
    /// Recommended employees per role, best fit first.
    pub employees_by_target: BTreeMap<String, Vec<MatchEntry>>,
}

/// Matches employees to target roles under capacity constraints.
///
/// The assignment is a heuristic: every in-range pairing is scored with
/// [`JobDistanceModel::distance`], then surplus pairings are pruned
/// worst-first wherever both sides still have slack, so the closest
/// matches survive. Not globally optimal, but stable and fast.
pub struct WorkforcePlanner<'a, C: ResourceCatalog + EmbeddingSource> {
    model: JobDistanceModel<'a, C>,
    targets_per_employee: usize,
}

impl<'a, C: ResourceCatalog + EmbeddingSource> WorkforcePlanner<'a, C> {
    /// Create a planner recommending at most `targets_per_employee` roles
    /// per employee.
    pub fn new(model: JobDistanceModel<'a, C>, targets_per_employee: usize) -> Self {
        Self {
            model,
            targets_per_employee,
        }
    }

    /// Plan the best role assignments for each employee.
    pub fn plan(&self, employees: &[Employee], targets: &[TargetRole]) -> WorkforcePlan {
        let mut pairs: Vec<(usize, usize, f64)> = Vec::new();
        let mut employee_options = vec![0usize; employees.len()];
        let mut target_options = vec![0usize; targets.len()];
        for (e_idx, employee) in employees.iter().enumerate() {
            for (t_idx, target) in targets.iter().enumerate() {
                let d = self.model.distance(&employee.skills, &target.skills).distance;
                if d > target.max_training {
                    continue;
                }
                pairs.push((e_idx, t_idx, d));
                employee_options[e_idx] += 1;
                target_options[t_idx] += 1;
            }
        }
        debug!(pairs = pairs.len(), "distances computed");

        // Worst match first; the sort is stable so ties keep pair order.
        pairs.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));
        let mut preserved: Vec<(usize, usize, f64)> = Vec::new();
        for (e_idx, t_idx, d) in pairs {
            if employee_options[e_idx] > self.targets_per_employee
                && target_options[t_idx] > targets[t_idx].number_needed
            {
                employee_options[e_idx] -= 1;
                target_options[t_idx] -= 1;
                continue;
            }
            preserved.push((e_idx, t_idx, d));
        }
        debug!(preserved = preserved.len(), "pruning complete");

        let mut by_employee: BTreeMap<String, Vec<(usize, f64)>> = employees
            .iter()
            .map(|e| (e.id.clone(), Vec::new()))
            .collect();
        let mut by_target: BTreeMap<String, Vec<(usize, f64)>> = targets
            .iter()
            .map(|t| (t.id.clone(), Vec::new()))
            .collect();
        for (e_idx, t_idx, d) in preserved {
            if let Some(list) = by_employee.get_mut(&employees[e_idx].id) {
                list.push((t_idx, d));
            }
            if let Some(list) = by_target.get_mut(&targets[t_idx].id) {
                list.push((e_idx, d));
            }
        }

        let level_sums: Vec<f64> = targets
            .iter()
            .map(|t| f64::from(self.model.ranks().total_levels(&t.skills)))
            .collect();
        let targets_by_employee = by_employee
            .into_iter()
            .map(|(id, mut list)| {
                list.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
                list.truncate(self.targets_per_employee);
                let entries = list
                    .into_iter()
                    .map(|(t_idx, d)| MatchEntry {
                        id: targets[t_idx].id.clone(),
                        fit: fit_percentage(level_sums[t_idx], d),
                    })
                    .collect();
                (id, entries)
            })
            .collect();
        let employees_by_target = by_target
            .into_iter()
            .map(|(id, mut list)| {
                let (t_idx, capacity) = targets
                    .iter()
                    .enumerate()
                    .find(|(_, t)| t.id == id)
                    .map(|(i, t)| (i, t.number_needed))
                    .unwrap_or((0, 0));
                list.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
                list.truncate(capacity);
                let entries = list
                    .into_iter()
                    .map(|(e_idx, d)| MatchEntry {
                        id: employees[e_idx].id.clone(),
                        fit: fit_percentage(level_sums[t_idx], d),
                    })
                    .collect();
                (id, entries)
            })
            .collect();
        WorkforcePlan {
            targets_by_employee,
            employees_by_target,
        }
    }
}

fn fit_percentage(level_sum: f64, distance: f64) -> f64 {
    if level_sum == 0.0 {
        return 100.0;
    }
    let pc = 100.0 * (level_sum - distance) / level_sum;
    (pc * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use upskill_catalog::InMemoryCatalog;

    fn profile(entries: &[(&str, &str)]) -> SkillProfile {
        entries.iter().copied().collect()
    }

    fn employee(id: &str, skills: &[(&str, &str)]) -> Employee {
        Employee {
            id: id.into(),
            skills: profile(skills),
        }
    }

    fn target(id: &str, skills: &[(&str, &str)], number_needed: usize) -> TargetRole {
        TargetRole {
            id: id.into(),
            skills: profile(skills),
            number_needed,
            max_training: 10.0,
        }
    }

    #[test]
    fn test_capacity_respected_with_equally_close_employees() {
        let catalog = InMemoryCatalog::new();
        let planner = WorkforcePlanner::new(JobDistanceModel::new(&catalog), 1);
        let plan = planner.plan(
            &[employee("e1", &[]), employee("e2", &[])],
            &[target("t", &[("s", "expert")], 1)],
        );
        let matched = &plan.employees_by_target["t"];
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, "e1");
        assert_eq!(matched[0].fit, 0.0);
    }

    #[test]
    fn test_worst_pair_pruned_when_both_sides_have_slack() {
        let catalog = InMemoryCatalog::new();
        let planner = WorkforcePlanner::new(JobDistanceModel::new(&catalog), 1);
        let employees = [
            employee("e1", &[("x", "advanced"), ("y", "intermediate")]),
            employee("e2", &[("x", "beginner"), ("y", "no knowledge")]),
        ];
        let targets = [
            target("t1", &[("x", "expert")], 1),
            target("t2", &[("y", "expert")], 1),
        ];
        let plan = planner.plan(&employees, &targets);
        // Worst-first pruning: (e2, t2) goes first while both sides have
        // two options. By the time (e1, t1) is processed e1 and t1 still
        // hold two options each, so it is pruned too; the surviving
        // matching is t1 -> e2 and t2 -> e1.
        assert_eq!(plan.employees_by_target["t1"][0].id, "e2");
        assert_eq!(plan.employees_by_target["t2"][0].id, "e1");
        assert_eq!(plan.targets_by_employee["e1"][0].id, "t2");
        assert_eq!(plan.targets_by_employee["e2"][0].id, "t1");
        // Fits against each role's level sum of 4: e2 is 3 away from t1,
        // e1 is 2 away from t2.
        assert_eq!(plan.employees_by_target["t1"][0].fit, 25.0);
        assert_eq!(plan.targets_by_employee["e1"][0].fit, 50.0);
    }

    #[test]
    fn test_fit_relative_to_target_level_sum() {
        let catalog = InMemoryCatalog::new();
        let planner = WorkforcePlanner::new(JobDistanceModel::new(&catalog), 5);
        let plan = planner.plan(
            &[employee("e", &[("x", "advanced")])],
            &[target("t", &[("x", "expert")], 1)],
        );
        // distance 1 against a level sum of 4.
        assert_eq!(plan.targets_by_employee["e"][0].fit, 75.0);
    }

    #[test]
    fn test_out_of_range_pair_discarded() {
        let catalog = InMemoryCatalog::new();
        let planner = WorkforcePlanner::new(JobDistanceModel::new(&catalog), 5);
        let mut role = target("t", &[("x", "expert"), ("y", "expert")], 1);
        role.max_training = 3.0;
        let plan = planner.plan(&[employee("e", &[])], &[role]);
        assert!(plan.targets_by_employee["e"].is_empty());
        assert!(plan.employees_by_target["t"].is_empty());
    }

    #[test]
    fn test_one_sided_slack_survives_pruning() {
        let catalog = InMemoryCatalog::new();
        let planner = WorkforcePlanner::new(JobDistanceModel::new(&catalog), 1);
        let employees = [employee("e", &[("x", "advanced"), ("y", "beginner")])];
        let targets = [
            target("t1", &[("x", "expert")], 1),
            target("t2", &[("y", "expert")], 1),
        ];
        let plan = planner.plan(&employees, &targets);
        // Neither role has surplus candidates, so no pair is pruned; the
        // per-employee truncation keeps only the closest role, but both
        // roles still list the employee.
        assert_eq!(plan.targets_by_employee["e"].len(), 1);
        assert_eq!(plan.targets_by_employee["e"][0].id, "t1");
        assert_eq!(plan.employees_by_target["t1"].len(), 1);
        assert_eq!(plan.employees_by_target["t2"].len(), 1);
    }
}
