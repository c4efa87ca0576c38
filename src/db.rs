use anyhow::Context;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::error::EvalResult;
use crate::models::{
    CriteriaScore, Department, Employee, Evaluation, EvaluationStatus, EvaluationUpdate,
};
use crate::store::Store;

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn employee_from_row(row: &PgRow) -> Employee {
    Employee {
        id: row.get("id"),
        name: row.get("full_name"),
        position: row.get("position"),
        department: row.get("department"),
        avatar: row.get("avatar"),
        hire_date: row.get("hire_date"),
        performance: row.get("performance"),
        personality: row.get("personality"),
    }
}

fn evaluation_from_row(row: &PgRow) -> EvalResult<Evaluation> {
    let status: String = row.get("status");
    let Json(criteria_scores): Json<Vec<CriteriaScore>> = row.get("criteria_scores");
    Ok(Evaluation {
        id: row.get("id"),
        employee_id: row.get("employee_id"),
        manager_id: row.get("manager_id"),
        date: row.get("evaluated_on"),
        status: status.parse()?,
        criteria_scores,
        overall_comment: row.get("overall_comment"),
    })
}

const EMPLOYEE_COLUMNS: &str =
    "id, full_name, position, department, avatar, hire_date, performance, personality";
const EVALUATION_COLUMNS: &str =
    "id, employee_id, manager_id, evaluated_on, status, criteria_scores, overall_comment";

#[async_trait]
impl Store for PgStore {
    async fn employee(&self, id: Uuid) -> EvalResult<Option<Employee>> {
        let query = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employee_evaluation.employees WHERE id = $1"
        );
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(employee_from_row))
    }

    async fn employees(&self) -> EvalResult<Vec<Employee>> {
        let query = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employee_evaluation.employees ORDER BY created_at, id"
        );
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(employee_from_row).collect())
    }

    async fn insert_employee(&self, employee: &Employee) -> EvalResult<()> {
        sqlx::query(
            r#"
            INSERT INTO employee_evaluation.employees
            (id, full_name, position, department, avatar, hire_date, performance, personality)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(employee.id)
        .bind(&employee.name)
        .bind(&employee.position)
        .bind(&employee.department)
        .bind(&employee.avatar)
        .bind(employee.hire_date)
        .bind(employee.performance)
        .bind(employee.personality)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_employee(&self, id: Uuid) -> EvalResult<bool> {
        let result = sqlx::query("DELETE FROM employee_evaluation.employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn departments(&self) -> EvalResult<Vec<Department>> {
        let rows = sqlx::query(
            "SELECT id, name, description FROM employee_evaluation.departments ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| Department {
                id: row.get("id"),
                name: row.get("name"),
                description: row.get("description"),
            })
            .collect())
    }

    async fn insert_department(&self, department: &Department) -> EvalResult<()> {
        sqlx::query(
            "INSERT INTO employee_evaluation.departments (id, name, description) VALUES ($1, $2, $3)",
        )
        .bind(department.id)
        .bind(&department.name)
        .bind(&department.description)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_department(&self, id: Uuid) -> EvalResult<bool> {
        let result = sqlx::query("DELETE FROM employee_evaluation.departments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn evaluation(&self, id: Uuid) -> EvalResult<Option<Evaluation>> {
        let query = format!(
            "SELECT {EVALUATION_COLUMNS} FROM employee_evaluation.evaluations WHERE id = $1"
        );
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(evaluation_from_row).transpose()
    }

    async fn evaluations_for(&self, employee_id: Uuid) -> EvalResult<Vec<Evaluation>> {
        let query = format!(
            "SELECT {EVALUATION_COLUMNS} FROM employee_evaluation.evaluations \
             WHERE employee_id = $1 ORDER BY created_at, id"
        );
        let rows = sqlx::query(&query)
            .bind(employee_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(evaluation_from_row).collect()
    }

    async fn insert_evaluation(&self, evaluation: &Evaluation) -> EvalResult<()> {
        sqlx::query(
            r#"
            INSERT INTO employee_evaluation.evaluations
            (id, employee_id, manager_id, evaluated_on, status, criteria_scores, overall_comment)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(evaluation.id)
        .bind(evaluation.employee_id)
        .bind(evaluation.manager_id)
        .bind(evaluation.date)
        .bind(evaluation.status.as_str())
        .bind(Json(&evaluation.criteria_scores))
        .bind(&evaluation.overall_comment)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_evaluation(
        &self,
        id: Uuid,
        update: &EvaluationUpdate,
    ) -> EvalResult<Option<Evaluation>> {
        let query = format!(
            "UPDATE employee_evaluation.evaluations \
             SET criteria_scores = $2, overall_comment = $3, evaluated_on = $4 \
             WHERE id = $1 RETURNING {EVALUATION_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(id)
            .bind(Json(&update.criteria_scores))
            .bind(&update.overall_comment)
            .bind(update.date)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(evaluation_from_row).transpose()
    }
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let departments = vec![
        (
            Uuid::parse_str("6a1f0c52-8a0e-4d43-9d3e-0b6a2f0d9c11")?,
            "Engineering",
        ),
        (
            Uuid::parse_str("b2f4e0d7-31c5-4a8e-a6b9-7f1d2c3e4a55")?,
            "Human Resources",
        ),
        (
            Uuid::parse_str("e9c3a1b8-5d27-4f60-8c1e-2a4b6d8f0e77")?,
            "Finance",
        ),
    ];

    for (id, name) in departments {
        sqlx::query(
            r#"
            INSERT INTO employee_evaluation.departments (id, name, description)
            VALUES ($1, $2, $3)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(format!("Department {name}"))
        .execute(pool)
        .await?;
    }

    let employees = vec![
        (
            Uuid::parse_str("3d7f5d6f-24f7-4e8e-8b4b-3e7e44b4a7b2")?,
            "Dewi Lestari",
            "Backend Engineer",
            "Engineering",
            NaiveDate::from_ymd_opt(2022, 3, 14).context("invalid date")?,
            82.0,
            76.0,
        ),
        (
            Uuid::parse_str("0c22f1f1-9184-4fd4-9b21-28c68a6a89dc")?,
            "Budi Santoso",
            "Recruiter",
            "Human Resources",
            NaiveDate::from_ymd_opt(2021, 8, 2).context("invalid date")?,
            74.0,
            88.0,
        ),
        (
            Uuid::parse_str("d5a0a1a2-2a3c-44c2-8f73-60b7897a9dd2")?,
            "Sari Wulandari",
            "Financial Analyst",
            "Finance",
            NaiveDate::from_ymd_opt(2023, 1, 9).context("invalid date")?,
            69.0,
            72.0,
        ),
    ];

    for (id, name, position, department, hire_date, performance, personality) in employees {
        sqlx::query(
            r#"
            INSERT INTO employee_evaluation.employees
            (id, full_name, position, department, avatar, hire_date, performance, personality)
            VALUES ($1, $2, $3, $4, '', $5, $6, $7)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(position)
        .bind(department)
        .bind(hire_date)
        .bind(performance)
        .bind(personality)
        .execute(pool)
        .await?;
    }

    let scores: Vec<CriteriaScore> = [
        ("perf-quality", 85),
        ("perf-productivity", 80),
        ("perf-knowledge", 90),
        ("perf-reliability", 75),
        ("perf-initiative", 80),
        ("pers-communication", 80),
        ("pers-teamwork", 80),
        ("pers-integrity", 100),
        ("pers-adaptability", 60),
        ("pers-discipline", 60),
    ]
    .into_iter()
    .map(|(criteria_id, score)| CriteriaScore {
        criteria_id: criteria_id.to_string(),
        score,
    })
    .collect();

    sqlx::query(
        r#"
        INSERT INTO employee_evaluation.evaluations
        (id, employee_id, manager_id, evaluated_on, status, criteria_scores, overall_comment)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(Uuid::parse_str("f4b8c2d6-0e1a-4c3b-9d5f-6a7b8c9d0e1f")?)
    .bind(Uuid::parse_str("3d7f5d6f-24f7-4e8e-8b4b-3e7e44b4a7b2")?)
    .bind(Uuid::parse_str("0c22f1f1-9184-4fd4-9b21-28c68a6a89dc")?)
    .bind(NaiveDate::from_ymd_opt(2026, 1, 30).context("invalid date")?)
    .bind(EvaluationStatus::Pending.as_str())
    .bind(Json(&scores))
    .bind("Consistent delivery; should speak up more in planning.")
    .execute(pool)
    .await?;

    info!("seed data applied");
    Ok(())
}

pub async fn import_employees(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        id: Option<Uuid>,
        name: String,
        position: String,
        department: String,
        #[serde(default)]
        avatar: String,
        hire_date: Option<NaiveDate>,
        #[serde(default)]
        performance: f64,
        #[serde(default)]
        personality: f64,
    }

    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut inserted = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        let department = row.department.trim();

        sqlx::query(
            r#"
            INSERT INTO employee_evaluation.departments (id, name, description)
            VALUES ($1, $2, $3)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(department)
        .bind(format!("Department {department}"))
        .execute(pool)
        .await?;

        let result = sqlx::query(
            r#"
            INSERT INTO employee_evaluation.employees
            (id, full_name, position, department, avatar, hire_date, performance, personality)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(row.id.unwrap_or_else(Uuid::new_v4))
        .bind(&row.name)
        .bind(&row.position)
        .bind(department)
        .bind(&row.avatar)
        .bind(row.hire_date.unwrap_or_else(|| Utc::now().date_naive()))
        .bind(row.performance)
        .bind(row.personality)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            inserted += 1;
        }
    }

    info!(inserted, path = %csv_path.display(), "employees imported");
    Ok(inserted)
}
