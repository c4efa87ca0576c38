use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::access;
use crate::error::{EvalError, EvalResult};
use crate::models::{Actor, Department, Employee, NewEmployee};
use crate::store::Store;

#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    pub search: Option<String>,
    pub department: Option<String>,
}

impl EmployeeFilter {
    pub fn matches(&self, employee: &Employee) -> bool {
        let matches_search = match self.search.as_deref() {
            Some(term) => {
                let term = term.to_lowercase();
                employee.name.to_lowercase().contains(&term)
                    || employee.position.to_lowercase().contains(&term)
            }
            None => true,
        };
        let matches_department = match self.department.as_deref() {
            Some(department) => employee.department == department,
            None => true,
        };
        matches_search && matches_department
    }
}

/// Employee and department administration.
pub struct Directory {
    store: Arc<dyn Store>,
}

impl Directory {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list_employees(&self, filter: &EmployeeFilter) -> EvalResult<Vec<Employee>> {
        let employees = self.store.employees().await?;
        Ok(employees.into_iter().filter(|e| filter.matches(e)).collect())
    }

    pub async fn add_employee(&self, actor: &Actor, new: NewEmployee) -> EvalResult<Employee> {
        access::ensure_admin(actor)?;
        let department = new.department.trim().to_string();
        if !self
            .store
            .departments()
            .await?
            .iter()
            .any(|d| d.name == department)
        {
            warn!(department = %department, "employee rejected: unknown department");
            return Err(EvalError::DepartmentNotFound(department));
        }

        let employee = Employee {
            id: Uuid::new_v4(),
            name: new.name.trim().to_string(),
            position: new.position.trim().to_string(),
            department,
            avatar: new.avatar,
            hire_date: new.hire_date.unwrap_or_else(|| Utc::now().date_naive()),
            performance: new.performance,
            personality: new.personality,
        };
        self.store.insert_employee(&employee).await?;
        info!(employee = %employee.id, name = %employee.name, "employee added");
        Ok(employee)
    }

    pub async fn delete_employee(&self, actor: &Actor, id: Uuid) -> EvalResult<Employee> {
        access::ensure_admin(actor)?;
        let employee = self
            .store
            .employee(id)
            .await?
            .ok_or(EvalError::MissingEmployee(id))?;
        if !self.store.delete_employee(id).await? {
            return Err(EvalError::MissingEmployee(id));
        }
        info!(employee = %id, name = %employee.name, "employee deleted");
        Ok(employee)
    }

    pub async fn list_departments(&self) -> EvalResult<Vec<Department>> {
        self.store.departments().await
    }

    pub async fn add_department(&self, actor: &Actor, name: &str) -> EvalResult<Department> {
        access::ensure_admin(actor)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(EvalError::EmptyDepartmentName);
        }
        if self
            .store
            .departments()
            .await?
            .iter()
            .any(|d| d.name == name)
        {
            warn!(department = %name, "department rejected: duplicate name");
            return Err(EvalError::DuplicateDepartment(name.to_string()));
        }

        let department = Department {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: format!("Department {name}"),
        };
        self.store.insert_department(&department).await?;
        info!(department = %department.name, "department added");
        Ok(department)
    }

    /// Refuses while any employee still belongs to the department.
    pub async fn delete_department(&self, actor: &Actor, name: &str) -> EvalResult<Department> {
        access::ensure_admin(actor)?;
        let department = self
            .store
            .departments()
            .await?
            .into_iter()
            .find(|d| d.name == name)
            .ok_or_else(|| EvalError::DepartmentNotFound(name.to_string()))?;

        let in_use = self
            .store
            .employees()
            .await?
            .iter()
            .any(|e| e.department == department.name);
        if in_use {
            warn!(department = %department.name, "department still has employees");
            return Err(EvalError::DepartmentInUse(department.name));
        }

        if !self.store.delete_department(department.id).await? {
            return Err(EvalError::DepartmentNotFound(department.name));
        }
        info!(department = %department.name, "department deleted");
        Ok(department)
    }
}
