//! Weekly calendar packing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;
use upskill_model::{DurationSpec, Resource, ResourceId};

/// A fixed-length grid of week slots, each mapping resource id to the
/// hours allocated to it that week.
///
/// Invariant: for every week, the packed hours sum to at most the weekly
/// ceiling the schedule was packed with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeeklySchedule {
    weeks: Vec<HashMap<ResourceId, u32>>,
}

impl WeeklySchedule {
    /// An empty schedule with `weeks` slots.
    pub fn with_weeks(weeks: usize) -> Self {
        Self {
            weeks: vec![HashMap::new(); weeks],
        }
    }

    /// Number of week slots (the planning horizon).
    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    /// True when the horizon has no slots at all.
    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    /// The allocation map for one week.
    pub fn week(&self, index: usize) -> Option<&HashMap<ResourceId, u32>> {
        self.weeks.get(index)
    }

    /// Iterate week allocation maps in order.
    pub fn iter(&self) -> impl Iterator<Item = &HashMap<ResourceId, u32>> {
        self.weeks.iter()
    }

    /// Total hours allocated in one week.
    pub fn total_hours(&self, index: usize) -> u32 {
        self.weeks
            .get(index)
            .map(|week| week.values().sum())
            .unwrap_or(0)
    }

    /// Index of the last week with any allocation.
    pub fn last_active_week(&self) -> Option<usize> {
        self.weeks.iter().rposition(|week| !week.is_empty())
    }

    /// True when no week holds any allocation.
    pub fn has_no_allocations(&self) -> bool {
        self.weeks.iter().all(|week| week.is_empty())
    }

    /// Schedule length with trailing empty weeks pruned.
    pub fn pruned_len(&self) -> usize {
        self.last_active_week().map(|i| i + 1).unwrap_or(0)
    }

    /// The week indexes a resource appears in, ascending.
    pub fn weeks_for(&self, resource_id: &str) -> Vec<usize> {
        self.weeks
            .iter()
            .enumerate()
            .filter(|(_, week)| week.contains_key(resource_id))
            .map(|(i, _)| i)
            .collect()
    }

    fn add_hours(&mut self, week: usize, resource_id: &str, hours: u32) {
        *self.weeks[week]
            .entry(resource_id.to_string())
            .or_insert(0) += hours;
    }
}

/// Why a resource did or did not make it into the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementReason {
    /// The resource was placed.
    Placed,
    /// Remaining weekly capacity could not absorb the resource without
    /// fragmenting it across non-contiguous weeks.
    NoCapacity,
    /// No contiguous block of weeks could take the weekly commitment.
    NoContiguousBlock,
}

/// Per-resource packing outcome.
///
/// Unplaced resources are omitted from the schedule itself; the outcome
/// record makes the omission observable instead of silent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementOutcome {
    /// The resource this outcome describes.
    pub resource_id: ResourceId,
    /// Whether the resource made it into the calendar.
    pub placed: bool,
    /// Why.
    pub reason: PlacementReason,
}

/// Pack a selection of resources into a weekly calendar.
///
/// Resources are placed in selection order; earlier picks get first claim
/// on weekly capacity. Per duration encoding:
/// - **Seconds**: converted to whole hours (minimum 1) and spread greedily
///   over consecutive weeks up to each week's remaining capacity. Once
///   allocation has begun, hitting a week with zero remaining capacity
///   aborts that placement attempt rather than fragmenting the resource.
/// - **Weekly**: placed in the earliest contiguous block of `weeks` weeks
///   whose every week can absorb `hours_per_week` more hours.
/// - **Unspecified**: a single indivisible unit of one hour in week 0,
///   provided week 0 has capacity left.
///
/// Resources that fit nowhere are left out of the calendar and reported
/// through their [`PlacementOutcome`].
pub fn pack(
    selection: &[Resource],
    max_hours_per_week: u32,
    weeks_to_plan: u32,
) -> (WeeklySchedule, Vec<PlacementOutcome>) {
    let horizon = weeks_to_plan as usize;
    let mut schedule = WeeklySchedule::with_weeks(horizon);
    let mut used = vec![0u32; horizon];
    let mut outcomes = Vec::with_capacity(selection.len());

    for resource in selection {
        let reason = match resource.duration {
            DurationSpec::Seconds { value } => {
                let hours = (value / 3600).max(1);
                match allocate_hours(hours, &used, max_hours_per_week, 0) {
                    Some(allocation) => {
                        for (week, hours) in allocation.iter().enumerate() {
                            if *hours > 0 {
                                schedule.add_hours(week, &resource.id, *hours);
                                used[week] += *hours;
                            }
                        }
                        PlacementReason::Placed
                    }
                    None => PlacementReason::NoCapacity,
                }
            }
            DurationSpec::Weekly {
                weeks,
                hours_per_week,
            } => match find_block(weeks, hours_per_week, &used, max_hours_per_week, 0) {
                Some(start) => {
                    for offset in 0..weeks as usize {
                        schedule.add_hours(start + offset, &resource.id, hours_per_week);
                        used[start + offset] += hours_per_week;
                    }
                    PlacementReason::Placed
                }
                None => PlacementReason::NoContiguousBlock,
            },
            DurationSpec::Unspecified => {
                // Indivisible unit: one hour in week 0 when it fits.
                if horizon > 0 && used[0] < max_hours_per_week {
                    schedule.add_hours(0, &resource.id, 1);
                    used[0] += 1;
                    PlacementReason::Placed
                } else {
                    PlacementReason::NoCapacity
                }
            }
        };
        if reason != PlacementReason::Placed {
            debug!(resource = %resource.id, ?reason, "resource left unscheduled");
        }
        outcomes.push(PlacementOutcome {
            resource_id: resource.id.clone(),
            placed: reason == PlacementReason::Placed,
            reason,
        });
    }
    (schedule, outcomes)
}

/// Greedy hour spreading for seconds-encoded resources.
///
/// Tries each start week in turn; from a given start, hours fill each
/// week's remaining capacity in order. A zero-capacity week encountered
/// after allocation has begun aborts the attempt for that start.
fn allocate_hours(
    total_hours: u64,
    used: &[u32],
    max_hours_per_week: u32,
    earliest_start: usize,
) -> Option<Vec<u32>> {
    for start in earliest_start..used.len() {
        let mut allocation = vec![0u32; used.len()];
        let mut remaining = total_hours;
        let mut begun = false;
        for week in start..used.len() {
            let available = max_hours_per_week.saturating_sub(used[week]);
            if begun && available == 0 {
                break;
            }
            if available > 0 {
                let take = remaining.min(u64::from(available)) as u32;
                allocation[week] = take;
                remaining -= u64::from(take);
                begun = true;
            }
            if remaining == 0 {
                return Some(allocation);
            }
        }
    }
    None
}

/// Earliest start of a contiguous block able to take `hours_per_week`
/// more hours for `weeks` consecutive weeks.
fn find_block(
    weeks: u32,
    hours_per_week: u32,
    used: &[u32],
    max_hours_per_week: u32,
    earliest_start: usize,
) -> Option<usize> {
    let weeks = weeks as usize;
    if weeks > used.len() {
        return None;
    }
    (earliest_start..=used.len() - weeks).find(|&start| {
        (start..start + weeks).all(|week| used[week] + hours_per_week <= max_hours_per_week)
    })
}
