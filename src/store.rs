use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::EvalResult;
use crate::models::{Department, Employee, Evaluation, EvaluationUpdate};

/// Persistence contract for employees, departments and evaluations.
/// Identifiers are assigned by callers before insertion.
#[async_trait]
pub trait Store: Send + Sync {
    async fn employee(&self, id: Uuid) -> EvalResult<Option<Employee>>;
    async fn employees(&self) -> EvalResult<Vec<Employee>>;
    async fn insert_employee(&self, employee: &Employee) -> EvalResult<()>;
    async fn delete_employee(&self, id: Uuid) -> EvalResult<bool>;

    async fn departments(&self) -> EvalResult<Vec<Department>>;
    async fn insert_department(&self, department: &Department) -> EvalResult<()>;
    async fn delete_department(&self, id: Uuid) -> EvalResult<bool>;

    async fn evaluation(&self, id: Uuid) -> EvalResult<Option<Evaluation>>;
    async fn evaluations_for(&self, employee_id: Uuid) -> EvalResult<Vec<Evaluation>>;
    async fn insert_evaluation(&self, evaluation: &Evaluation) -> EvalResult<()>;
    async fn update_evaluation(
        &self,
        id: Uuid,
        update: &EvaluationUpdate,
    ) -> EvalResult<Option<Evaluation>>;
}

#[derive(Default)]
struct Tables {
    employees: Vec<Employee>,
    departments: Vec<Department>,
    evaluations: Vec<Evaluation>,
}

/// In-process store; collections keep insertion order.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn employee(&self, id: Uuid) -> EvalResult<Option<Employee>> {
        let tables = self.tables.read().await;
        Ok(tables.employees.iter().find(|e| e.id == id).cloned())
    }

    async fn employees(&self) -> EvalResult<Vec<Employee>> {
        Ok(self.tables.read().await.employees.clone())
    }

    async fn insert_employee(&self, employee: &Employee) -> EvalResult<()> {
        self.tables.write().await.employees.push(employee.clone());
        Ok(())
    }

    async fn delete_employee(&self, id: Uuid) -> EvalResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.employees.len();
        tables.employees.retain(|e| e.id != id);
        Ok(tables.employees.len() != before)
    }

    async fn departments(&self) -> EvalResult<Vec<Department>> {
        Ok(self.tables.read().await.departments.clone())
    }

    async fn insert_department(&self, department: &Department) -> EvalResult<()> {
        self.tables.write().await.departments.push(department.clone());
        Ok(())
    }

    async fn delete_department(&self, id: Uuid) -> EvalResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.departments.len();
        tables.departments.retain(|d| d.id != id);
        Ok(tables.departments.len() != before)
    }

    async fn evaluation(&self, id: Uuid) -> EvalResult<Option<Evaluation>> {
        let tables = self.tables.read().await;
        Ok(tables.evaluations.iter().find(|e| e.id == id).cloned())
    }

    async fn evaluations_for(&self, employee_id: Uuid) -> EvalResult<Vec<Evaluation>> {
        let tables = self.tables.read().await;
        Ok(tables
            .evaluations
            .iter()
            .filter(|e| e.employee_id == employee_id)
            .cloned()
            .collect())
    }

    async fn insert_evaluation(&self, evaluation: &Evaluation) -> EvalResult<()> {
        self.tables.write().await.evaluations.push(evaluation.clone());
        Ok(())
    }

    async fn update_evaluation(
        &self,
        id: Uuid,
        update: &EvaluationUpdate,
    ) -> EvalResult<Option<Evaluation>> {
        let mut tables = self.tables.write().await;
        let Some(existing) = tables.evaluations.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        existing.criteria_scores = update.criteria_scores.clone();
        existing.overall_comment = update.overall_comment.clone();
        existing.date = update.date;
        Ok(Some(existing.clone()))
    }
}
