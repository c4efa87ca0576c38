use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::access::{self, Access};
use crate::catalog::CriteriaCatalog;
use crate::error::{EvalError, EvalResult};
use crate::models::{Actor, Employee, Evaluation, EvaluationUpdate};
use crate::scoring::{self, CategoryScores, ScoreSheet};
use crate::store::Store;

/// Form state ready for submission. `evaluation_id` is set when an existing
/// evaluation is being re-scored.
#[derive(Debug, Clone, Default)]
pub struct EvaluationDraft {
    pub evaluation_id: Option<Uuid>,
    pub employee_id: Option<Uuid>,
    pub scores: ScoreSheet,
    pub comment: String,
}

#[derive(Debug, Clone)]
pub struct Submission {
    pub evaluation: Evaluation,
    pub scores: CategoryScores,
    pub created: bool,
}

impl Submission {
    pub fn message(&self) -> String {
        scoring::confirmation_message(&self.scores)
    }
}

#[derive(Debug, Clone)]
pub struct EditSession {
    pub evaluation: Evaluation,
    pub employee: Option<Employee>,
    pub scores: ScoreSheet,
}

#[derive(Debug, Clone)]
pub enum EmployeeView {
    Detailed {
        employee: Employee,
        evaluations: Vec<Evaluation>,
    },
    /// Denormalized aggregates only.
    Aggregate { employee: Employee },
}

pub struct EvaluationService {
    store: Arc<dyn Store>,
    catalog: CriteriaCatalog,
}

impl EvaluationService {
    pub fn new(store: Arc<dyn Store>, catalog: CriteriaCatalog) -> Self {
        Self { store, catalog }
    }

    pub fn catalog(&self) -> &CriteriaCatalog {
        &self.catalog
    }

    pub async fn load_for_edit(&self, evaluation_id: Uuid) -> EvalResult<EditSession> {
        let evaluation = self
            .store
            .evaluation(evaluation_id)
            .await?
            .ok_or(EvalError::MissingEvaluation(evaluation_id))?;
        let employee = self.store.employee(evaluation.employee_id).await?;
        let scores = ScoreSheet::from(evaluation.criteria_scores.as_slice());
        Ok(EditSession {
            evaluation,
            employee,
            scores,
        })
    }

    pub async fn submit(&self, actor: &Actor, draft: &EvaluationDraft) -> EvalResult<Submission> {
        if let Err(err) = self.check_draft(actor, draft) {
            warn!(actor = %actor.id, error = %err, "evaluation rejected");
            return Err(err);
        }

        let existing = match draft.evaluation_id {
            Some(id) => self.store.evaluation(id).await?,
            None => None,
        };

        let employee_id = match (draft.employee_id, existing.as_ref()) {
            (Some(id), _) => id,
            (None, Some(evaluation)) => evaluation.employee_id,
            (None, None) => {
                return Err(match draft.evaluation_id {
                    Some(id) => EvalError::MissingEvaluation(id),
                    None => EvalError::InvalidValue {
                        field: "employee_id",
                        value: "none".to_string(),
                    },
                })
            }
        };
        if self.store.employee(employee_id).await?.is_none() {
            warn!(employee = %employee_id, "evaluation rejected: employee not found");
            return Err(EvalError::MissingEmployee(employee_id));
        }

        let scores = scoring::score_sheet(&draft.scores, &self.catalog);

        if let Some(existing) = existing {
            let update = EvaluationUpdate {
                criteria_scores: draft.scores.to_criteria_scores(),
                overall_comment: draft.comment.clone(),
                date: Utc::now().date_naive(),
            };
            let evaluation = self
                .store
                .update_evaluation(existing.id, &update)
                .await?
                .ok_or(EvalError::MissingEvaluation(existing.id))?;
            info!(evaluation = %evaluation.id, employee = %employee_id, "evaluation updated");
            return Ok(Submission {
                evaluation,
                scores,
                created: false,
            });
        }

        let evaluation =
            scoring::build_record(employee_id, actor.id, &draft.scores, &draft.comment);
        self.store.insert_evaluation(&evaluation).await?;
        info!(evaluation = %evaluation.id, employee = %employee_id, "evaluation created");
        Ok(Submission {
            evaluation,
            scores,
            created: true,
        })
    }

    fn check_draft(&self, actor: &Actor, draft: &EvaluationDraft) -> EvalResult<()> {
        access::ensure_can_evaluate(actor)?;
        scoring::validate_complete(&draft.scores, self.catalog.all())?;
        scoring::validate_ranges(&draft.scores, &self.catalog)
    }

    pub async fn employee_view(
        &self,
        actor: &Actor,
        employee_id: Uuid,
        view_requested: bool,
    ) -> EvalResult<EmployeeView> {
        let employee = self
            .store
            .employee(employee_id)
            .await?
            .ok_or(EvalError::MissingEmployee(employee_id))?;

        match access::evaluation_access(actor.role, view_requested) {
            Access::Edit => {
                let evaluations = self.store.evaluations_for(employee_id).await?;
                Ok(EmployeeView::Detailed {
                    employee,
                    evaluations,
                })
            }
            Access::ViewOnly => Ok(EmployeeView::Aggregate { employee }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EvaluationStatus, Role};
    use crate::store::MemoryStore;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn actor(role: Role) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            role,
        }
    }

    fn employee() -> Employee {
        Employee {
            id: Uuid::new_v4(),
            name: "Dewi Lestari".to_string(),
            position: "Backend Engineer".to_string(),
            department: "Engineering".to_string(),
            avatar: String::new(),
            hire_date: NaiveDate::from_ymd_opt(2022, 3, 14).unwrap(),
            performance: 82.0,
            personality: 76.0,
        }
    }

    fn complete_sheet(catalog: &CriteriaCatalog, performance: i32, personality: i32) -> ScoreSheet {
        catalog
            .all()
            .iter()
            .map(|c| {
                let score = match c.category {
                    crate::models::Category::Performance => performance,
                    crate::models::Category::Personality => personality,
                };
                (c.id.clone(), score)
            })
            .collect()
    }

    async fn setup() -> (Arc<MemoryStore>, EvaluationService, Employee) {
        let store = Arc::new(MemoryStore::new());
        let employee = employee();
        store.insert_employee(&employee).await.unwrap();
        let service = EvaluationService::new(store.clone(), CriteriaCatalog::default());
        (store, service, employee)
    }

    #[tokio::test]
    async fn new_submission_creates_pending_record() {
        let (store, service, employee) = setup().await;
        let manager = actor(Role::Manager);
        let draft = EvaluationDraft {
            employee_id: Some(employee.id),
            scores: complete_sheet(service.catalog(), 80, 60),
            comment: "solid".to_string(),
            ..Default::default()
        };

        let submission = service.submit(&manager, &draft).await.unwrap();

        assert!(submission.created);
        assert_eq!(submission.scores.performance, 80.0);
        assert_eq!(submission.scores.personality, 60.0);
        assert_eq!(submission.evaluation.manager_id, manager.id);
        assert_eq!(submission.evaluation.status, EvaluationStatus::Pending);
        assert_eq!(
            submission.message(),
            "Performance score: 80.0, Personality score: 60.0"
        );
        assert_eq!(
            store.evaluation(submission.evaluation.id).await.unwrap(),
            Some(submission.evaluation.clone())
        );
    }

    #[tokio::test]
    async fn resubmission_updates_in_place() {
        let (store, service, employee) = setup().await;
        let manager = actor(Role::Manager);
        let first = service
            .submit(
                &manager,
                &EvaluationDraft {
                    employee_id: Some(employee.id),
                    scores: complete_sheet(service.catalog(), 60, 40),
                    comment: "first".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let admin = actor(Role::Admin);
        let second = service
            .submit(
                &admin,
                &EvaluationDraft {
                    evaluation_id: Some(first.evaluation.id),
                    employee_id: None,
                    scores: complete_sheet(service.catalog(), 90, 100),
                    comment: "revised".to_string(),
                },
            )
            .await
            .unwrap();

        assert!(!second.created);
        assert_eq!(second.evaluation.id, first.evaluation.id);
        assert_eq!(second.evaluation.manager_id, manager.id);
        assert_eq!(second.evaluation.overall_comment, "revised");
        assert_eq!(second.evaluation.date, Utc::now().date_naive());
        assert_eq!(store.evaluations_for(employee.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn submissions_without_id_always_get_fresh_ids() {
        let (store, service, employee) = setup().await;
        let manager = actor(Role::Manager);
        let draft = EvaluationDraft {
            employee_id: Some(employee.id),
            scores: complete_sheet(service.catalog(), 50, 80),
            ..Default::default()
        };

        let a = service.submit(&manager, &draft).await.unwrap();
        let b = service.submit(&manager, &draft).await.unwrap();

        assert_ne!(a.evaluation.id, b.evaluation.id);
        assert_eq!(store.evaluations_for(employee.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn unknown_evaluation_id_with_employee_creates_new_record() {
        let (_store, service, employee) = setup().await;
        let stale = Uuid::new_v4();
        let submission = service
            .submit(
                &actor(Role::Admin),
                &EvaluationDraft {
                    evaluation_id: Some(stale),
                    employee_id: Some(employee.id),
                    scores: complete_sheet(service.catalog(), 70, 80),
                    comment: String::new(),
                },
            )
            .await
            .unwrap();
        assert!(submission.created);
        assert_ne!(submission.evaluation.id, stale);
    }

    #[tokio::test]
    async fn incomplete_form_is_rejected_without_state_change() {
        let (store, service, employee) = setup().await;
        let mut scores = ScoreSheet::new();
        scores.set("perf-quality", 80);
        let draft = EvaluationDraft {
            employee_id: Some(employee.id),
            scores,
            ..Default::default()
        };

        let err = service.submit(&actor(Role::Manager), &draft).await.unwrap_err();
        assert!(matches!(err, EvalError::IncompleteForm { ref missing } if missing.len() == 9));
        assert!(store.evaluations_for(employee.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_employee_is_rejected() {
        let (_store, service, _employee) = setup().await;
        let ghost = Uuid::new_v4();
        let draft = EvaluationDraft {
            employee_id: Some(ghost),
            scores: complete_sheet(service.catalog(), 80, 80),
            ..Default::default()
        };
        let err = service.submit(&actor(Role::Manager), &draft).await.unwrap_err();
        assert!(matches!(err, EvalError::MissingEmployee(id) if id == ghost));
    }

    #[tokio::test]
    async fn out_of_range_scores_are_rejected() {
        let (_store, service, employee) = setup().await;
        let mut scores = complete_sheet(service.catalog(), 80, 80);
        scores.set("perf-initiative", 120);
        let draft = EvaluationDraft {
            employee_id: Some(employee.id),
            scores,
            ..Default::default()
        };
        let err = service.submit(&actor(Role::Admin), &draft).await.unwrap_err();
        assert!(matches!(err, EvalError::ScoreOutOfRange { score: 120, .. }));
    }

    #[tokio::test]
    async fn non_managers_cannot_submit() {
        let (store, service, employee) = setup().await;
        let draft = EvaluationDraft {
            employee_id: Some(employee.id),
            scores: complete_sheet(service.catalog(), 80, 80),
            ..Default::default()
        };
        let err = service.submit(&actor(Role::Pemimpin), &draft).await.unwrap_err();
        assert!(matches!(err, EvalError::AccessDenied(_)));
        assert!(store.evaluations_for(employee.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn load_for_edit_restores_sheet_and_employee() {
        let (_store, service, employee) = setup().await;
        let submission = service
            .submit(
                &actor(Role::Manager),
                &EvaluationDraft {
                    employee_id: Some(employee.id),
                    scores: complete_sheet(service.catalog(), 65, 40),
                    comment: "needs mentoring".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let session = service.load_for_edit(submission.evaluation.id).await.unwrap();
        assert_eq!(session.employee, Some(employee));
        assert_eq!(session.scores.get("perf-quality"), Some(65));
        assert_eq!(session.scores.get("pers-teamwork"), Some(40));
        assert_eq!(session.evaluation.overall_comment, "needs mentoring");

        assert!(matches!(
            service.load_for_edit(Uuid::new_v4()).await,
            Err(EvalError::MissingEvaluation(_))
        ));
    }

    #[tokio::test]
    async fn view_only_roles_see_aggregates() {
        let (_store, service, employee) = setup().await;
        let view = service
            .employee_view(&actor(Role::Karyawan), employee.id, false)
            .await
            .unwrap();
        assert!(matches!(view, EmployeeView::Aggregate { .. }));

        let view = service
            .employee_view(&actor(Role::Manager), employee.id, false)
            .await
            .unwrap();
        assert!(matches!(view, EmployeeView::Detailed { .. }));

        let view = service
            .employee_view(&actor(Role::Manager), employee.id, true)
            .await
            .unwrap();
        assert!(matches!(view, EmployeeView::Aggregate { .. }));
    }
}
