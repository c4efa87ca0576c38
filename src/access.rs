use crate::error::{EvalError, EvalResult};
use crate::models::{Actor, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Edit,
    /// Aggregate scores only, no per-criterion breakdown.
    ViewOnly,
}

pub fn can_evaluate(role: Role) -> bool {
    matches!(role, Role::Manager | Role::Admin)
}

pub fn evaluation_access(role: Role, view_requested: bool) -> Access {
    if can_evaluate(role) && !view_requested {
        Access::Edit
    } else {
        Access::ViewOnly
    }
}

pub fn ensure_can_evaluate(actor: &Actor) -> EvalResult<()> {
    if can_evaluate(actor.role) {
        Ok(())
    } else {
        Err(EvalError::AccessDenied(
            "only managers and admins can submit evaluations",
        ))
    }
}

pub fn ensure_admin(actor: &Actor) -> EvalResult<()> {
    if actor.role == Role::Admin {
        Ok(())
    } else {
        Err(EvalError::AccessDenied(
            "only admins can manage employees and departments",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn managers_and_admins_edit_unless_viewing() {
        assert_eq!(evaluation_access(Role::Manager, false), Access::Edit);
        assert_eq!(evaluation_access(Role::Admin, false), Access::Edit);
        assert_eq!(evaluation_access(Role::Admin, true), Access::ViewOnly);
    }

    #[test]
    fn other_roles_are_view_only() {
        assert_eq!(evaluation_access(Role::Pemimpin, false), Access::ViewOnly);
        assert_eq!(evaluation_access(Role::Karyawan, false), Access::ViewOnly);
    }

    #[test]
    fn mutation_guards_check_role() {
        let staff = Actor {
            id: Uuid::new_v4(),
            role: Role::Karyawan,
        };
        let manager = Actor {
            id: Uuid::new_v4(),
            role: Role::Manager,
        };
        assert!(matches!(
            ensure_can_evaluate(&staff),
            Err(EvalError::AccessDenied(_))
        ));
        assert!(ensure_can_evaluate(&manager).is_ok());
        assert!(ensure_admin(&manager).is_err());
    }
}
