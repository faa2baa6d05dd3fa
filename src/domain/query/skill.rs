use std::{cmp::Ordering, collections::BTreeMap};

use crate::entities::skill::{Skill, SkillCategory, SkillGroup};

use super::{flag, leading_int, parsed, Params};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SkillQuery {
    pub category: Option<SkillCategory>,
    pub featured_only: bool,
    /// Only set when the parameter reads as an integer in 1..=10.
    pub min_proficiency: Option<i32>,
    pub grouped: bool,
}

impl SkillQuery {
    pub fn from_params(params: &Params) -> Self {
        let min_proficiency = params
            .get("min_proficiency")
            .map(|raw| leading_int(raw))
            .filter(|level| (1..=10).contains(level))
            .map(|level| level as i32);

        SkillQuery {
            category: parsed(params, "category"),
            featured_only: flag(params, "featured"),
            min_proficiency,
            grouped: flag(params, "grouped"),
        }
    }

    pub fn matches(&self, skill: &Skill) -> bool {
        self.category.is_none_or(|category| skill.category == category)
            && (!self.featured_only || skill.featured)
            && self.min_proficiency.is_none_or(|min| skill.proficiency_level >= min)
    }

    /// proficiency_level desc, sort_order asc, id asc
    pub fn compare(a: &Skill, b: &Skill) -> Ordering {
        b.proficiency_level
            .cmp(&a.proficiency_level)
            .then_with(|| a.sort_order.cmp(&b.sort_order))
            .then_with(|| a.id.cmp(&b.id))
    }

    pub fn apply(&self, skills: impl IntoIterator<Item = Skill>) -> Vec<Skill> {
        let mut selected: Vec<Skill> = skills.into_iter().filter(|s| self.matches(s)).collect();
        selected.sort_by(Self::compare);
        selected
    }
}

/// Buckets ordered skills by category, keeping their relative order.
pub fn group_by_category(skills: &[Skill]) -> BTreeMap<SkillCategory, SkillGroup> {
    let mut groups: BTreeMap<SkillCategory, SkillGroup> = BTreeMap::new();

    for skill in skills {
        let group = groups.entry(skill.category).or_insert_with(|| SkillGroup {
            category_name: skill.category.label(),
            skills: Vec::new(),
            count: 0,
        });
        group.skills.push(skill.to_response());
        group.count += 1;
    }

    groups
}
