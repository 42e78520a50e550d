//! Skill profiles: ordered skill-to-level mappings.

use crate::SkillId;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A mapping from skill id to an optional proficiency level.
///
/// Used for both a learner's current state and a target state. Insertion
/// order is preserved: the gap resolver iterates a target profile in the
/// order its skills were declared, and downstream sampling depends on that
/// order being stable.
///
/// Serializes as a JSON object (`{"skill": "level", ...}`) so profiles can
/// cross the API boundary unchanged; `null` marks an unset level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillProfile {
    entries: Vec<(SkillId, Option<String>)>,
}

impl SkillProfile {
    /// Create an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the level for a skill, replacing any previous entry in place.
    pub fn insert(&mut self, skill: impl Into<SkillId>, level: Option<String>) {
        let skill = skill.into();
        match self.entries.iter_mut().find(|(id, _)| *id == skill) {
            Some(entry) => entry.1 = level,
            None => self.entries.push((skill, level)),
        }
    }

    /// Look up a skill's level. `None` means the skill is absent entirely;
    /// `Some(None)` means it is present with an unset level.
    pub fn get(&self, skill: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .find(|(id, _)| id == skill)
            .map(|(_, level)| level.as_deref())
    }

    /// Whether the profile contains the skill at all.
    pub fn contains(&self, skill: &str) -> bool {
        self.entries.iter().any(|(id, _)| id == skill)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&SkillId, Option<&str>)> {
        self.entries.iter().map(|(id, level)| (id, level.as_deref()))
    }

    /// Skill ids in insertion order.
    pub fn skill_ids(&self) -> impl Iterator<Item = &SkillId> {
        self.entries.iter().map(|(id, _)| id)
    }

    /// Number of skills in the profile.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the profile is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(SkillId, Option<String>)> for SkillProfile {
    fn from_iter<T: IntoIterator<Item = (SkillId, Option<String>)>>(iter: T) -> Self {
        let mut profile = Self::new();
        for (skill, level) in iter {
            profile.insert(skill, level);
        }
        profile
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for SkillProfile {
    fn from_iter<T: IntoIterator<Item = (&'a str, &'a str)>>(iter: T) -> Self {
        iter.into_iter()
            .map(|(skill, level)| (skill.to_string(), Some(level.to_string())))
            .collect()
    }
}

impl Serialize for SkillProfile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (skill, level) in &self.entries {
            map.serialize_entry(skill, level)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SkillProfile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ProfileVisitor;

        impl<'de> Visitor<'de> for ProfileVisitor {
            type Value = SkillProfile;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of skill id to level")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut profile = SkillProfile::new();
                while let Some((skill, level)) = access.next_entry::<SkillId, Option<String>>()? {
                    profile.insert(skill, level);
                }
                Ok(profile)
            }
        }

        deserializer.deserialize_map(ProfileVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_preserved() {
        let profile: SkillProfile = [("zebra", "expert"), ("apple", "beginner")]
            .into_iter()
            .collect();
        let ids: Vec<_> = profile.skill_ids().cloned().collect();
        assert_eq!(ids, vec!["zebra".to_string(), "apple".to_string()]);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut profile: SkillProfile = [("a", "beginner"), ("b", "expert")].into_iter().collect();
        profile.insert("a", Some("advanced".to_string()));
        assert_eq!(profile.len(), 2);
        assert_eq!(profile.get("a"), Some(Some("advanced")));
        let ids: Vec<_> = profile.skill_ids().cloned().collect();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_round_trips_as_json_object() {
        let profile: SkillProfile = [
            ("rust".to_string(), Some("expert".to_string())),
            ("sql".to_string(), None),
        ]
        .into_iter()
        .collect();
        let json = serde_json::to_string(&profile).unwrap();
        assert_eq!(json, r#"{"rust":"expert","sql":null}"#);
        let back: SkillProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }
}
