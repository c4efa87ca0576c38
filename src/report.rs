use std::fmt::Write;

use crate::catalog::{CriteriaCatalog, InputScale, FIVE_POINT_SCALE};
use crate::models::{Category, Employee, Evaluation};
use crate::scoring::{self, ScoreSheet};

fn category_title(category: Category) -> &'static str {
    match category {
        Category::Performance => "Performance",
        Category::Personality => "Personality",
    }
}

fn scale_label(score: i32) -> Option<&'static str> {
    FIVE_POINT_SCALE
        .iter()
        .find(|(value, _)| *value == score)
        .map(|(_, label)| *label)
}

pub fn criteria_listing(catalog: &CriteriaCatalog) -> String {
    let mut output = String::new();

    for category in Category::ALL {
        let _ = writeln!(output, "## {}", category_title(category));
        match InputScale::for_category(category) {
            InputScale::Slider { step } => {
                let _ = writeln!(output, "Scored 0-100 in steps of {step}.");
            }
            InputScale::FivePoint => {
                let labels: Vec<String> = FIVE_POINT_SCALE
                    .iter()
                    .map(|(value, label)| format!("{value} {label}"))
                    .collect();
                let _ = writeln!(output, "Scored on a five-point scale: {}.", labels.join(", "));
            }
        }
        for criterion in catalog.list_by_category(category) {
            let _ = writeln!(
                output,
                "- {} [{}] weight {}: {}",
                criterion.name, criterion.id, criterion.weight, criterion.description
            );
        }
        let _ = writeln!(output);
    }

    output
}

pub fn employee_table(employees: &[Employee]) -> String {
    let mut output = String::new();

    if employees.is_empty() {
        let _ = writeln!(output, "No employees match this filter.");
        return output;
    }

    for employee in employees {
        let _ = writeln!(
            output,
            "- {} ({}, {}) hired {} performance {:.1} personality {:.1} [{}]",
            employee.name,
            employee.position,
            employee.department,
            employee.hire_date,
            employee.performance,
            employee.personality,
            employee.id
        );
    }

    output
}

/// Aggregate scores only; used for read-only viewers.
pub fn view_only_summary(employee: &Employee) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# {}", employee.name);
    let _ = writeln!(output, "{} in {}", employee.position, employee.department);
    let _ = writeln!(output);
    let _ = writeln!(output, "- Performance: {:.1}", employee.performance);
    let _ = writeln!(output, "- Personality: {:.1}", employee.personality);
    output
}

pub fn evaluation_summary(
    employee: &Employee,
    evaluation: &Evaluation,
    catalog: &CriteriaCatalog,
) -> String {
    let sheet = ScoreSheet::from(evaluation.criteria_scores.as_slice());
    let scores = scoring::score_sheet(&sheet, catalog);
    let filled = scoring::progress(&sheet, catalog);

    let mut output = String::new();
    let _ = writeln!(output, "# Evaluation of {}", employee.name);
    let _ = writeln!(
        output,
        "{} on {} ({}, {:.0}% complete)",
        evaluation.id,
        evaluation.date,
        evaluation.status.as_str(),
        filled
    );

    for category in Category::ALL {
        let _ = writeln!(output);
        let _ = writeln!(
            output,
            "## {} ({:.1})",
            category_title(category),
            scores.get(category)
        );
        for criterion in catalog.list_by_category(category) {
            match sheet.get(&criterion.id) {
                Some(score) => match scale_label(score).filter(|_| category == Category::Personality) {
                    Some(label) => {
                        let _ = writeln!(output, "- {}: {} ({})", criterion.name, score, label);
                    }
                    None => {
                        let _ = writeln!(output, "- {}: {}", criterion.name, score);
                    }
                },
                None => {
                    let _ = writeln!(output, "- {}: not scored", criterion.name);
                }
            }
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Comment");
    if evaluation.overall_comment.trim().is_empty() {
        let _ = writeln!(output, "No comment recorded.");
    } else {
        let _ = writeln!(output, "{}", evaluation.overall_comment);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CriteriaScore, EvaluationStatus};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn employee() -> Employee {
        Employee {
            id: Uuid::new_v4(),
            name: "Budi Santoso".to_string(),
            position: "Recruiter".to_string(),
            department: "Human Resources".to_string(),
            avatar: String::new(),
            hire_date: NaiveDate::from_ymd_opt(2021, 8, 2).unwrap(),
            performance: 74.0,
            personality: 88.0,
        }
    }

    #[test]
    fn view_only_summary_hides_breakdown() {
        let summary = view_only_summary(&employee());
        assert!(summary.contains("- Performance: 74.0"));
        assert!(summary.contains("- Personality: 88.0"));
        assert!(!summary.contains("Work quality"));
    }

    #[test]
    fn evaluation_summary_lists_scores_and_missing_criteria() {
        let catalog = CriteriaCatalog::default();
        let evaluation = Evaluation {
            id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            manager_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2026, 2, 2).unwrap(),
            status: EvaluationStatus::Pending,
            criteria_scores: vec![
                CriteriaScore {
                    criteria_id: "perf-quality".to_string(),
                    score: 90,
                },
                CriteriaScore {
                    criteria_id: "pers-teamwork".to_string(),
                    score: 80,
                },
            ],
            overall_comment: String::new(),
        };

        let summary = evaluation_summary(&employee(), &evaluation, &catalog);
        assert!(summary.contains("## Performance (18.0)"));
        assert!(summary.contains("## Personality (16.0)"));
        assert!(summary.contains("- Work quality: 90\n"));
        assert!(summary.contains("- Teamwork: 80 (High)"));
        assert!(summary.contains("- Initiative: not scored"));
        assert!(summary.contains("20% complete"));
        assert!(summary.contains("No comment recorded."));
    }

    #[test]
    fn empty_employee_table_has_placeholder() {
        assert_eq!(employee_table(&[]), "No employees match this filter.\n");
    }

    #[test]
    fn criteria_listing_describes_scales() {
        let listing = criteria_listing(&CriteriaCatalog::default());
        assert!(listing.contains("Scored 0-100 in steps of 5."));
        assert!(listing.contains("20 Very low"));
    }
}
