use thiserror::Error;
use uuid::Uuid;

use crate::models::Category;

/// Guard failures raised by the catalog, the scoring engine and the
/// directory. Each one blocks the action it guards and leaves the store
/// untouched.
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("form is incomplete: {} criteria have no score ({})", missing.len(), missing.join(", "))]
    IncompleteForm { missing: Vec<String> },

    #[error("score {score} for criterion {criteria_id} is out of range")]
    ScoreOutOfRange { criteria_id: String, score: i32 },

    #[error("unknown criterion {0}")]
    UnknownCriterion(String),

    #[error("employee {0} not found")]
    MissingEmployee(Uuid),

    #[error("evaluation {0} not found")]
    MissingEvaluation(Uuid),

    #[error("department {0} still has employees; move them to another department first")]
    DepartmentInUse(String),

    #[error("department {0} not found")]
    DepartmentNotFound(String),

    #[error("department {0} already exists")]
    DuplicateDepartment(String),

    #[error("department name is empty")]
    EmptyDepartmentName,

    #[error("access denied: {0}")]
    AccessDenied(&'static str),

    #[error("invalid {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    #[error("criteria catalog is invalid: {0}")]
    Catalog(#[from] CatalogError),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug, PartialEq)]
pub enum CatalogError {
    #[error("{category} weights sum to {total}, expected 100")]
    WeightTotal { category: Category, total: u32 },

    #[error("{0} has no criteria")]
    EmptyCategory(Category),

    #[error("criterion {id} has weight {weight} outside 0-100")]
    WeightRange { id: String, weight: u32 },

    #[error("criterion id {0} appears more than once")]
    DuplicateId(String),
}

pub type EvalResult<T> = Result<T, EvalError>;
