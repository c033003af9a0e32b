use crate::api::resolve_scope;
use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::domain::leave::{balance, inclusive_days};
use crate::domain::scope::Scope;
use crate::model::leave_request::{LeaveStatus, LeaveType};
use actix_web::{web, HttpResponse, Responder};
use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::{prelude::FromRow, MySqlPool};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    #[serde(rename = "type")]
    #[schema(example = "annual")]
    pub leave_type: LeaveType,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

#[derive(Serialize, Deserialize, FromRow, ToSchema)]
pub struct LeaveResponse {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1000)]
    pub employee_id: u64,
    pub employee_name: String,
    #[schema(example = "annual", value_type = String)]
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub leave_type: String,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = 3)]
    pub days: i64,
    pub reason: Option<String>,
    #[schema(example = "pending", value_type = String)]
    pub status: String,
    pub approved_by: Option<u64>,
    pub approved_by_name: Option<String>,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveFilter {
    /// Filter by employee (admin/hr only; employees always see their own)
    pub employee_id: Option<u64>,
    /// Filter by leave status
    pub status: Option<String>,
    /// Filter by leave type
    #[serde(rename = "type")]
    pub leave_type: Option<String>,
    /// Pagination page number (start with 1)
    pub page: Option<u64>,
    /// Pagination per page number
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveResponse>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

// Helper enum for typed SQLx binding
enum FilterValue {
    U64(u64),
    Str(String),
}

/* =========================
Create leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/leaves",
    request_body = CreateLeave,
    responses(
        (status = 201, description = "Leave request submitted", body = Object, example = json!({
            "message": "Leave request submitted",
            "days": 3,
            "status": "pending"
        })),
        (status = 400, description = "Bad request"),
        (status = 401),
        (status = 404, description = "Employee profile not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeave>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee_profile()?;

    // Inclusive day count; inverted ranges rejected.
    // Overlap with existing approved leave is deliberately not checked.
    let days = match inclusive_days(payload.start_date, payload.end_date) {
        Ok(days) => days,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": e.to_string()
            })));
        }
    };

    let result = sqlx::query(
        r#"
        INSERT INTO leave_requests
            (employee_id, type, start_date, end_date, days, reason)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(payload.leave_type.to_string())
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(days)
    .bind(&payload.reason)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to create leave request");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Leave request submitted",
        "requestId": result.last_insert_id(),
        "days": days,
        "status": LeaveStatus::Pending
    })))
}

/* =========================
List leave requests (scope-filtered)
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/leaves",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated leave list", body = LeaveListResponse),
        (status = 401),
        (status = 404, description = "Employee profile not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<LeaveFilter>,
) -> actix_web::Result<impl Responder> {
    let scope = resolve_scope(&auth, pool.get_ref()).await?;

    // -------------------------
    // Pagination
    // -------------------------
    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    // -------------------------
    // WHERE clause
    // -------------------------
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    match &scope {
        Scope::Global => {
            if let Some(emp_id) = query.employee_id {
                where_sql.push_str(" AND lr.employee_id = ?");
                args.push(FilterValue::U64(emp_id));
            }
        }
        Scope::Team { department, .. } => {
            where_sql.push_str(" AND e.department = ?");
            args.push(FilterValue::Str(department.clone()));
        }
        Scope::Own { employee_id } => {
            where_sql.push_str(" AND lr.employee_id = ?");
            args.push(FilterValue::U64(*employee_id));
        }
    }

    if let Some(status) = query.status.as_deref().filter(|s| *s != "all") {
        where_sql.push_str(" AND lr.status = ?");
        args.push(FilterValue::Str(status.to_string()));
    }

    if let Some(leave_type) = query.leave_type.as_deref().filter(|t| *t != "all") {
        where_sql.push_str(" AND lr.type = ?");
        args.push(FilterValue::Str(leave_type.to_string()));
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!(
        "SELECT COUNT(*) FROM leave_requests lr JOIN employees e ON lr.employee_id = e.id{}",
        where_sql
    );

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(s.clone()),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count leave requests");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        r#"
        SELECT lr.id, lr.employee_id, e.name AS employee_name, lr.type,
               lr.start_date, lr.end_date, lr.days, lr.reason, lr.status,
               lr.approved_by, a.name AS approved_by_name, lr.created_at
        FROM leave_requests lr
        JOIN employees e ON lr.employee_id = e.id
        LEFT JOIN employees a ON lr.approved_by = a.id
        {}
        ORDER BY lr.created_at DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, LeaveResponse>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let leaves = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch leave list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(LeaveListResponse {
        data: leaves,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}

/* =========================
Approve / reject (Admin/HR/Manager)
========================= */
#[derive(Deserialize, ToSchema)]
pub struct ApproveLeave {
    /// approved or rejected
    #[schema(example = "approved")]
    pub status: String,
}

#[utoipa::path(
    put,
    path = "/api/v1/leaves/{leave_id}/approve",
    params(("leave_id" = u64, Path, description = "Leave request ID")),
    request_body = ApproveLeave,
    responses(
        (status = 200, description = "Decision recorded"),
        (status = 400, description = "Not found or already processed"),
        (status = 401),
        (status = 403),
        (status = 404, description = "Employee profile not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<ApproveLeave>,
) -> actix_web::Result<impl Responder> {
    auth.require_approver()?;
    let approver_id = auth.require_employee_profile()?;

    let leave_id = path.into_inner();

    let decision = match LeaveStatus::from_str(&payload.status) {
        Ok(s @ (LeaveStatus::Approved | LeaveStatus::Rejected)) => s,
        _ => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "status must be approved or rejected"
            })));
        }
    };

    // Only pending requests transition; approved/rejected rows are final
    let result = sqlx::query(
        r#"
        UPDATE leave_requests
        SET status = ?, approved_by = ?
        WHERE id = ?
        AND status = 'pending'
        "#,
    )
    .bind(decision.to_string())
    .bind(approver_id)
    .bind(leave_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Leave decision failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Leave request not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": match decision {
            LeaveStatus::Approved => "Leave approved",
            _ => "Leave rejected",
        }
    })))
}

/* =========================
Leave balance
========================= */
#[derive(FromRow)]
struct UsedDays {
    annual_used: i64,
    sick_used: i64,
}

async fn balance_for(
    employee_id: u64,
    pool: &MySqlPool,
    config: &Config,
) -> actix_web::Result<HttpResponse> {
    let current_year = Local::now().year();

    let used = sqlx::query_as::<_, UsedDays>(
        r#"
        SELECT
            CAST(COALESCE(SUM(CASE WHEN type = 'annual' AND status = 'approved' THEN days ELSE 0 END), 0) AS SIGNED) AS annual_used,
            CAST(COALESCE(SUM(CASE WHEN type = 'sick' AND status = 'approved' THEN days ELSE 0 END), 0) AS SIGNED) AS sick_used
        FROM leave_requests
        WHERE employee_id = ? AND YEAR(start_date) = ?
        "#,
    )
    .bind(employee_id)
    .bind(current_year)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to compute leave balance");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let balance = balance(&config.leave_entitlements(), used.annual_used, used.sick_used);

    Ok(HttpResponse::Ok().json(balance))
}

/// Leave balance for the current employee
#[utoipa::path(
    get,
    path = "/api/v1/leaves/balance",
    responses(
        (status = 200, description = "Remaining entitlement per leave type"),
        (status = 401),
        (status = 404, description = "Employee profile not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn my_balance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee_profile()?;
    balance_for(employee_id, pool.get_ref(), config.get_ref()).await
}

/// Leave balance for a specific employee (Admin/HR/Manager)
#[utoipa::path(
    get,
    path = "/api/v1/leaves/balance/{employee_id}",
    params(("employee_id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Remaining entitlement per leave type"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn employee_balance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_approver()?;
    balance_for(path.into_inner(), pool.get_ref(), config.get_ref()).await
}
