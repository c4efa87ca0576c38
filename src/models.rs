use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EvalError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Performance,
    Personality,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Performance, Category::Personality];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Performance => "performance",
            Category::Personality => "personality",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub weight: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaScore {
    pub criteria_id: String,
    pub score: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationStatus {
    Pending,
    Completed,
}

impl EvaluationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EvaluationStatus::Pending => "pending",
            EvaluationStatus::Completed => "completed",
        }
    }
}

impl FromStr for EvaluationStatus {
    type Err = EvalError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(EvaluationStatus::Pending),
            "completed" => Ok(EvaluationStatus::Completed),
            other => Err(EvalError::InvalidValue {
                field: "status",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub manager_id: Uuid,
    pub date: NaiveDate,
    pub status: EvaluationStatus,
    pub criteria_scores: Vec<CriteriaScore>,
    pub overall_comment: String,
}

/// Fields replaced when an existing evaluation is re-scored.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationUpdate {
    pub criteria_scores: Vec<CriteriaScore>,
    pub overall_comment: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub position: String,
    pub department: String,
    pub avatar: String,
    pub hire_date: NaiveDate,
    pub performance: f64,
    pub personality: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    pub position: String,
    pub department: String,
    #[serde(default)]
    pub avatar: String,
    pub hire_date: Option<NaiveDate>,
    #[serde(default)]
    pub performance: f64,
    #[serde(default)]
    pub personality: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    /// Team leader; may read evaluations but not author them.
    Pemimpin,
    Karyawan,
}

impl FromStr for Role {
    type Err = EvalError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "pemimpin" | "leader" => Ok(Role::Pemimpin),
            "karyawan" | "employee" => Ok(Role::Karyawan),
            other => Err(EvalError::InvalidValue {
                field: "role",
                value: other.to_string(),
            }),
        }
    }
}

/// The authenticated user acting on the system. Only the role flags are
/// consumed here; session handling lives elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}
