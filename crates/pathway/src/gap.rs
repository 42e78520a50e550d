//! Skill gap resolution.

use upskill_model::{RankTable, SkillId, SkillProfile};

/// Identify the skills a learner still needs to develop.
///
/// A target skill is part of the gap when any of these hold:
/// - the learner does not have the skill at all,
/// - the learner's rank is beginner or below (rank <= 1): beginners are
///   always assumed to need reinforcement, whatever the target asks for,
/// - the learner's rank is below the target rank.
///
/// Target skills with no level set default to intermediate. Output order
/// is the target profile's insertion order; downstream sampling depends
/// on it being stable.
pub fn identify_skill_gap(
    current: &SkillProfile,
    target: &SkillProfile,
    ranks: &RankTable,
) -> Vec<SkillId> {
    let mut gap = Vec::new();
    for (skill, target_level) in target.iter() {
        let target_rank = ranks.target_rank(target_level);
        match current.get(skill) {
            None => gap.push(skill.clone()),
            Some(current_level) => {
                let current_rank = current_level.and_then(|l| ranks.rank(l)).unwrap_or(0);
                if current_rank <= 1 || current_rank < target_rank {
                    gap.push(skill.clone());
                }
            }
        }
    }
    gap
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(entries: &[(&str, &str)]) -> SkillProfile {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_missing_skill_is_a_gap() {
        let gap = identify_skill_gap(
            &SkillProfile::new(),
            &profile(&[("rust", "expert")]),
            &RankTable::default(),
        );
        assert_eq!(gap, vec!["rust".to_string()]);
    }

    #[test]
    fn test_beginner_is_always_a_gap() {
        // Target only asks for beginner, which the learner already has;
        // beginner-or-below still forces inclusion.
        let gap = identify_skill_gap(
            &profile(&[("rust", "beginner")]),
            &profile(&[("rust", "beginner")]),
            &RankTable::default(),
        );
        assert_eq!(gap, vec!["rust".to_string()]);
    }

    #[test]
    fn test_met_target_is_not_a_gap() {
        let gap = identify_skill_gap(
            &profile(&[("rust", "advanced")]),
            &profile(&[("rust", "intermediate")]),
            &RankTable::default(),
        );
        assert!(gap.is_empty());
    }

    #[test]
    fn test_unset_target_level_defaults_to_intermediate() {
        let mut target = SkillProfile::new();
        target.insert("rust", None);
        let gap = identify_skill_gap(
            &profile(&[("rust", "intermediate")]),
            &target,
            &RankTable::default(),
        );
        assert!(gap.is_empty());

        let gap = identify_skill_gap(
            &profile(&[("rust", "advanced")]),
            &profile(&[("rust", "expert")]),
            &RankTable::default(),
        );
        assert_eq!(gap.len(), 1);
    }

    #[test]
    fn test_output_preserves_target_order() {
        let target = profile(&[("c", "expert"), ("a", "expert"), ("b", "expert")]);
        let gap = identify_skill_gap(&SkillProfile::new(), &target, &RankTable::default());
        assert_eq!(gap, vec!["c".to_string(), "a".to_string(), "b".to_string()]);
    }
}
