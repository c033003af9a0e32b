use crate::api::resolve_scope;
use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::domain::scope::Scope;
use actix_web::{error::ErrorInternalServerError, web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use sqlx::{prelude::FromRow, MySqlPool};
use tracing::error;
use utoipa::ToSchema;

#[derive(FromRow)]
struct HeadcountRow {
    total_employees: i64,
    active_employees: i64,
    probation_employees: i64,
}

#[derive(FromRow)]
struct AssetCountRow {
    total_assets: i64,
    available_assets: i64,
}

/// Role-shaped dashboard numbers. Admin/HR get the company view, managers
/// their department, employees their own slice.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/stats",
    responses(
        (status = 200, description = "Dashboard numbers for the caller's role"),
        (status = 401),
        (status = 404, description = "Employee profile not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn dashboard_stats(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    let scope = resolve_scope(&auth, pool.get_ref()).await?;
    let pool = pool.get_ref();

    let body = match scope {
        Scope::Global => global_stats(pool).await?,
        Scope::Team {
            manager_id,
            department,
        } => team_stats(pool, manager_id, &department).await?,
        Scope::Own { employee_id } => own_stats(pool, employee_id, config.get_ref()).await?,
    };

    Ok(HttpResponse::Ok().json(body))
}

async fn global_stats(pool: &MySqlPool) -> actix_web::Result<serde_json::Value> {
    let headcount = sqlx::query_as::<_, HeadcountRow>(
        r#"
        SELECT
            CAST(COUNT(*) AS SIGNED) AS total_employees,
            CAST(COALESCE(SUM(CASE WHEN status = 'active' THEN 1 ELSE 0 END), 0) AS SIGNED) AS active_employees,
            CAST(COALESCE(SUM(CASE WHEN status = 'probation' THEN 1 ELSE 0 END), 0) AS SIGNED) AS probation_employees
        FROM employees
        "#,
    )
    .fetch_one(pool)
    .await
    .map_err(internal)?;

    let pending_leaves = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM leave_requests WHERE status = 'pending'",
    )
    .fetch_one(pool)
    .await
    .map_err(internal)?;

    let pending_tasks = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM tasks WHERE status IN ('not_started', 'in_progress')",
    )
    .fetch_one(pool)
    .await
    .map_err(internal)?;

    let assets = sqlx::query_as::<_, AssetCountRow>(
        r#"
        SELECT
            CAST(COUNT(*) AS SIGNED) AS total_assets,
            CAST(COALESCE(SUM(CASE WHEN status = 'available' THEN 1 ELSE 0 END), 0) AS SIGNED) AS available_assets
        FROM assets
        "#,
    )
    .fetch_one(pool)
    .await
    .map_err(internal)?;

    let today_attendance = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM time_entries WHERE date = CURDATE()",
    )
    .fetch_one(pool)
    .await
    .map_err(internal)?;

    Ok(json!({
        "totalEmployees": headcount.total_employees,
        "activeEmployees": headcount.active_employees,
        "probationEmployees": headcount.probation_employees,
        "pendingLeaves": pending_leaves,
        "pendingTasks": pending_tasks,
        "totalAssets": assets.total_assets,
        "availableAssets": assets.available_assets,
        "todayAttendance": today_attendance
    }))
}

async fn team_stats(
    pool: &MySqlPool,
    manager_id: u64,
    department: &str,
) -> actix_web::Result<serde_json::Value> {
    let team_members = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM employees WHERE department = ? AND status = 'active'",
    )
    .bind(department)
    .fetch_one(pool)
    .await
    .map_err(internal)?;

    let pending_approvals = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM leave_requests lr
        JOIN employees e ON lr.employee_id = e.id
        WHERE e.department = ? AND lr.status = 'pending'
        "#,
    )
    .bind(department)
    .fetch_one(pool)
    .await
    .map_err(internal)?;

    let active_projects = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM tasks WHERE assigned_by = ? AND status IN ('not_started', 'in_progress')",
    )
    .bind(manager_id)
    .fetch_one(pool)
    .await
    .map_err(internal)?;

    Ok(json!({
        "teamMembers": team_members,
        "pendingApprovals": pending_approvals,
        "activeProjects": active_projects
    }))
}

async fn own_stats(
    pool: &MySqlPool,
    employee_id: u64,
    config: &Config,
) -> actix_web::Result<serde_json::Value> {
    let active_tasks = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM tasks WHERE assigned_to = ? AND status IN ('not_started', 'in_progress')",
    )
    .bind(employee_id)
    .fetch_one(pool)
    .await
    .map_err(internal)?;

    let annual_used = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT CAST(COALESCE(SUM(CASE WHEN type = 'annual' AND status = 'approved' THEN days ELSE 0 END), 0) AS SIGNED)
        FROM leave_requests
        WHERE employee_id = ? AND YEAR(start_date) = YEAR(CURDATE())
        "#,
    )
    .bind(employee_id)
    .fetch_one(pool)
    .await
    .map_err(internal)?;

    let remaining_leaves = config.leave_entitlements().annual - annual_used;

    let weekly_hours = sqlx::query_scalar::<_, Option<f64>>(
        r#"
        SELECT CAST(SUM(CASE WHEN check_in IS NOT NULL AND check_out IS NOT NULL
            THEN TIME_TO_SEC(TIMEDIFF(check_out, check_in)) / 3600
            ELSE 0 END) AS DOUBLE)
        FROM time_entries
        WHERE employee_id = ? AND WEEK(date) = WEEK(CURDATE()) AND YEAR(date) = YEAR(CURDATE())
        "#,
    )
    .bind(employee_id)
    .fetch_one(pool)
    .await
    .map_err(internal)?
    .unwrap_or(0.0);

    Ok(json!({
        "activeTasks": active_tasks,
        "remainingLeaves": remaining_leaves,
        "weeklyHours": (weekly_hours * 10.0).round() / 10.0
    }))
}

/* =========================
Recent activities (Admin/HR)
========================= */
#[derive(Serialize, FromRow, ToSchema)]
pub struct Activity {
    /// leave_request or work_report
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub activity_type: String,
    pub id: u64,
    pub employee_name: String,
    #[schema(format = "date-time", value_type = Option<String>)]
    pub created_at: Option<DateTime<Utc>>,
    /// Leave type for leave requests, report title for reports
    pub detail: Option<String>,
}

/// Latest pending leave requests and submitted reports, merged newest
/// first. Non-admin/hr roles get an empty list rather than an error.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/recent-activities",
    responses(
        (status = 200, description = "Up to 10 recent activities", body = [Activity]),
        (status = 401)
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn recent_activities(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let scope = resolve_scope(&auth, pool.get_ref()).await?;

    let mut activities: Vec<Activity> = Vec::new();

    if scope.is_global() {
        let recent_leaves = sqlx::query_as::<_, Activity>(
            r#"
            SELECT 'leave_request' AS type, lr.id, e.name AS employee_name,
                   lr.created_at, lr.type AS detail
            FROM leave_requests lr
            JOIN employees e ON lr.employee_id = e.id
            WHERE lr.status = 'pending'
            ORDER BY lr.created_at DESC
            LIMIT 5
            "#,
        )
        .fetch_all(pool.get_ref())
        .await
        .map_err(internal)?;

        let recent_reports = sqlx::query_as::<_, Activity>(
            r#"
            SELECT 'work_report' AS type, wr.id, e.name AS employee_name,
                   wr.created_at, wr.title AS detail
            FROM work_reports wr
            JOIN employees e ON wr.employee_id = e.id
            WHERE wr.status = 'submitted'
            ORDER BY wr.created_at DESC
            LIMIT 5
            "#,
        )
        .fetch_all(pool.get_ref())
        .await
        .map_err(internal)?;

        activities.extend(recent_leaves);
        activities.extend(recent_reports);
    }

    activities.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    activities.truncate(10);

    Ok(HttpResponse::Ok().json(activities))
}

fn internal(e: sqlx::Error) -> actix_web::Error {
    error!(error = %e, "Dashboard query failed");
    ErrorInternalServerError("Internal Server Error")
}
