use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;

use crate::error::CatalogError;
use crate::models::{Category, Criterion};

pub const MAX_SCORE: i32 = 100;
pub const SLIDER_STEP: i32 = 5;

/// Values offered for personality criteria, with their labels.
pub const FIVE_POINT_SCALE: [(i32, &str); 5] = [
    (20, "Very low"),
    (40, "Low"),
    (60, "Moderate"),
    (80, "High"),
    (100, "Very high"),
];

/// How scores for a category are entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputScale {
    Slider { step: i32 },
    FivePoint,
}

impl InputScale {
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Performance => InputScale::Slider { step: SLIDER_STEP },
            Category::Personality => InputScale::FivePoint,
        }
    }

    pub fn accepts(self, score: i32) -> bool {
        match self {
            InputScale::Slider { step } => (0..=MAX_SCORE).contains(&score) && score % step == 0,
            InputScale::FivePoint => FIVE_POINT_SCALE.iter().any(|(value, _)| *value == score),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CriteriaCatalog {
    criteria: Vec<Criterion>,
}

impl CriteriaCatalog {
    /// Builds a catalog after checking that every category has criteria,
    /// ids are unique and each category's weights total exactly 100.
    pub fn new(criteria: Vec<Criterion>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for criterion in &criteria {
            if !seen.insert(criterion.id.as_str()) {
                return Err(CatalogError::DuplicateId(criterion.id.clone()));
            }
            if criterion.weight > 100 {
                return Err(CatalogError::WeightRange {
                    id: criterion.id.clone(),
                    weight: criterion.weight,
                });
            }
        }

        for category in Category::ALL {
            let mut members = criteria.iter().filter(|c| c.category == category).peekable();
            if members.peek().is_none() {
                return Err(CatalogError::EmptyCategory(category));
            }
            let total: u32 = members.map(|c| c.weight).sum();
            if total != 100 {
                return Err(CatalogError::WeightTotal { category, total });
            }
        }

        Ok(Self { criteria })
    }

    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read criteria file {}", path.display()))?;
        let criteria: Vec<Criterion> = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse criteria file {}", path.display()))?;
        Ok(Self::new(criteria)?)
    }

    pub fn all(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Criterion> {
        self.criteria.iter().find(|c| c.id == id)
    }

    pub fn list_by_category(&self, category: Category) -> Vec<&Criterion> {
        self.criteria
            .iter()
            .filter(|c| c.category == category)
            .collect()
    }
}

impl Default for CriteriaCatalog {
    fn default() -> Self {
        let entries = [
            ("perf-quality", "Work quality", "Accuracy and thoroughness of delivered work", Category::Performance),
            ("perf-productivity", "Productivity", "Volume of work completed against targets", Category::Performance),
            ("perf-knowledge", "Job knowledge", "Command of the skills the role requires", Category::Performance),
            ("perf-reliability", "Reliability", "Meets deadlines and commitments", Category::Performance),
            ("perf-initiative", "Initiative", "Takes ownership beyond assigned tasks", Category::Performance),
            ("pers-communication", "Communication", "Clarity and openness with colleagues", Category::Personality),
            ("pers-teamwork", "Teamwork", "Cooperation and support within the team", Category::Personality),
            ("pers-integrity", "Integrity", "Honesty and adherence to company values", Category::Personality),
            ("pers-adaptability", "Adaptability", "Responds well to change", Category::Personality),
            ("pers-discipline", "Discipline", "Punctuality and adherence to procedures", Category::Personality),
        ];

        let criteria = entries
            .into_iter()
            .map(|(id, name, description, category)| Criterion {
                id: id.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                category,
                weight: 20,
            })
            .collect();

        Self { criteria }
    }
}

#[cfg(test)]
pub(crate) fn criterion(id: &str, category: Category, weight: u32) -> Criterion {
    Criterion {
        id: id.to_string(),
        name: id.to_string(),
        description: String::new(),
        category,
        weight,
    }
}
