use crate::model::role::Role;

/// Row filter decided once from the caller's role and employee link.
///
/// Employee-anchored resources (leaves, reports, attendance) filter on the
/// owning employee; tasks additionally honor the assigner for managers.
#[derive(Debug, Clone, PartialEq)]
pub enum Scope {
    /// admin/hr: no row filter.
    Global,
    /// manager: rows they assigned or rows inside their department.
    Team { manager_id: u64, department: String },
    /// employee: only their own rows.
    Own { employee_id: u64 },
}

/// Missing-employee handling is deliberately uniform: a manager or employee
/// with no linked employee row gets `None`, which every caller turns into a
/// hard 404. A manager whose row has no department is treated the same way,
/// since an empty department would silently match zero rows. Never a silent
/// empty set, never an unscoped query.
pub fn scope_for(role: Role, employee_id: Option<u64>, department: Option<String>) -> Option<Scope> {
    match role {
        Role::Admin | Role::Hr => Some(Scope::Global),
        Role::Manager => Some(Scope::Team {
            manager_id: employee_id?,
            department: department?,
        }),
        Role::Employee => Some(Scope::Own {
            employee_id: employee_id?,
        }),
    }
}

impl Scope {
    pub fn is_global(&self) -> bool {
        matches!(self, Scope::Global)
    }

    /// Whether the caller may read rows belonging to `employee_id`.
    pub fn covers_employee(&self, employee_id: u64) -> bool {
        match self {
            Scope::Global | Scope::Team { .. } => true,
            Scope::Own { employee_id: own } => *own == employee_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_and_hr_are_global() {
        assert_eq!(scope_for(Role::Admin, None, None), Some(Scope::Global));
        assert_eq!(scope_for(Role::Hr, Some(7), None), Some(Scope::Global));
    }

    #[test]
    fn manager_scope_carries_id_and_department() {
        let scope = scope_for(Role::Manager, Some(3), Some("Engineering".into()));
        assert_eq!(
            scope,
            Some(Scope::Team {
                manager_id: 3,
                department: "Engineering".into()
            })
        );
    }

    #[test]
    fn employee_scope_is_own_rows_only() {
        let scope = scope_for(Role::Employee, Some(9), None).unwrap();
        assert!(scope.covers_employee(9));
        assert!(!scope.covers_employee(10));
    }

    #[test]
    fn missing_employee_link_never_degrades_to_global_or_empty() {
        assert_eq!(scope_for(Role::Employee, None, None), None);
        assert_eq!(scope_for(Role::Manager, None, None), None);
    }

    #[test]
    fn manager_without_department_is_treated_as_unlinked() {
        assert_eq!(scope_for(Role::Manager, Some(3), None), None);
    }
}
