use actix_web::error::{ErrorInternalServerError, ErrorNotFound};
use sqlx::MySqlPool;

use crate::auth::auth::AuthUser;
use crate::domain::scope::{scope_for, Scope};
use crate::model::role::Role;

pub mod asset;
pub mod attendance;
pub mod dashboard;
pub mod employee;
pub mod leave_request;
pub mod task;
pub mod work_report;

/// Resolve the caller's row scope. Managers need their department, which
/// lives on the employee row; everyone else resolves from the claims alone.
/// A manager/employee without a linked employee row gets a hard 404, as does
/// a manager whose row carries no department.
pub async fn resolve_scope(auth: &AuthUser, pool: &MySqlPool) -> actix_web::Result<Scope> {
    let department = match (auth.role, auth.employee_id) {
        (Role::Manager, Some(employee_id)) => {
            sqlx::query_scalar::<_, Option<String>>("SELECT department FROM employees WHERE id = ?")
                .bind(employee_id)
                .fetch_optional(pool)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, employee_id, "Failed to resolve manager department");
                    ErrorInternalServerError("Internal Server Error")
                })?
                .flatten()
        }
        _ => None,
    };

    scope_for(auth.role, auth.employee_id, department)
        .ok_or_else(|| ErrorNotFound("Employee profile not found"))
}
