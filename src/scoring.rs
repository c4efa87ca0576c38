use chrono::Utc;
use uuid::Uuid;

use crate::catalog::{CriteriaCatalog, InputScale};
use crate::error::{EvalError, EvalResult};
use crate::models::{Category, Criterion, CriteriaScore, Evaluation, EvaluationStatus};

/// Per-criterion scores keyed by criterion id, kept in the order each id was
/// first scored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreSheet {
    entries: Vec<(String, i32)>,
}

impl ScoreSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, criteria_id: &str, score: i32) {
        match self.entries.iter_mut().find(|(id, _)| id == criteria_id) {
            Some(entry) => entry.1 = score,
            None => self.entries.push((criteria_id.to_string(), score)),
        }
    }

    pub fn get(&self, criteria_id: &str) -> Option<i32> {
        self.entries
            .iter()
            .find(|(id, _)| id == criteria_id)
            .map(|(_, score)| *score)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.entries.iter().map(|(id, score)| (id.as_str(), *score))
    }

    pub fn to_criteria_scores(&self) -> Vec<CriteriaScore> {
        self.iter()
            .map(|(criteria_id, score)| CriteriaScore {
                criteria_id: criteria_id.to_string(),
                score,
            })
            .collect()
    }
}

impl FromIterator<(String, i32)> for ScoreSheet {
    fn from_iter<I: IntoIterator<Item = (String, i32)>>(iter: I) -> Self {
        let mut sheet = ScoreSheet::new();
        for (id, score) in iter {
            sheet.set(&id, score);
        }
        sheet
    }
}

impl From<&[CriteriaScore]> for ScoreSheet {
    fn from(scores: &[CriteriaScore]) -> Self {
        scores
            .iter()
            .map(|s| (s.criteria_id.clone(), s.score))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryScores {
    pub performance: f64,
    pub personality: f64,
}

impl CategoryScores {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Performance => self.performance,
            Category::Personality => self.personality,
        }
    }
}

pub fn validate_complete(scores: &ScoreSheet, all_criteria: &[Criterion]) -> EvalResult<()> {
    let missing: Vec<String> = all_criteria
        .iter()
        .filter(|c| scores.get(&c.id).is_none())
        .map(|c| c.id.clone())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(EvalError::IncompleteForm { missing })
    }
}

/// Rejects scores the input widgets could not have produced: unknown ids,
/// values outside 0-100, or values off the category's scale.
pub fn validate_ranges(scores: &ScoreSheet, catalog: &CriteriaCatalog) -> EvalResult<()> {
    for (criteria_id, score) in scores.iter() {
        let criterion = catalog
            .get(criteria_id)
            .ok_or_else(|| EvalError::UnknownCriterion(criteria_id.to_string()))?;
        if !InputScale::for_category(criterion.category).accepts(score) {
            return Err(EvalError::ScoreOutOfRange {
                criteria_id: criteria_id.to_string(),
                score,
            });
        }
    }
    Ok(())
}

/// Weighted sum of the scores for `criteria`; missing scores count as 0.
/// Only a weighted average when the weights total 100.
pub fn compute_category_score<'a, I>(scores: &ScoreSheet, criteria: I) -> f64
where
    I: IntoIterator<Item = &'a Criterion>,
{
    criteria
        .into_iter()
        .map(|c| scores.get(&c.id).unwrap_or(0) as f64 * c.weight as f64 / 100.0)
        .sum()
}

pub fn score_sheet(scores: &ScoreSheet, catalog: &CriteriaCatalog) -> CategoryScores {
    CategoryScores {
        performance: compute_category_score(scores, catalog.list_by_category(Category::Performance)),
        personality: compute_category_score(scores, catalog.list_by_category(Category::Personality)),
    }
}

pub fn progress(scores: &ScoreSheet, catalog: &CriteriaCatalog) -> f64 {
    if catalog.is_empty() {
        return 0.0;
    }
    let filled = catalog
        .all()
        .iter()
        .filter(|c| scores.get(&c.id).is_some())
        .count();
    (filled as f64 / catalog.len() as f64 * 100.0).clamp(0.0, 100.0)
}

pub fn build_record(
    employee_id: Uuid,
    manager_id: Uuid,
    scores: &ScoreSheet,
    comment: &str,
) -> Evaluation {
    Evaluation {
        id: Uuid::new_v4(),
        employee_id,
        manager_id,
        date: Utc::now().date_naive(),
        status: EvaluationStatus::Pending,
        criteria_scores: scores.to_criteria_scores(),
        overall_comment: comment.to_string(),
    }
}

pub fn confirmation_message(scores: &CategoryScores) -> String {
    format!(
        "Performance score: {:.1}, Personality score: {:.1}",
        scores.performance, scores.personality
    )
}
