use crate::api::resolve_scope;
use crate::auth::auth::AuthUser;
use crate::domain::scope::Scope;
use crate::model::work_report::ReportStatus;
use actix_web::{error::ErrorInternalServerError, web, HttpResponse, Responder};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::{mysql::MySqlArguments, prelude::FromRow, query::QueryAs, MySql, MySqlPool};
use std::str::FromStr;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateReport {
    /// Task the report relates to, if any
    pub task_id: Option<u64>,
    #[schema(example = "Weekly progress")]
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    #[schema(example = "weekly")]
    pub report_type: Option<String>,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = 7.5)]
    pub hours_spent: Option<f64>,
}

#[derive(Serialize, FromRow, ToSchema)]
pub struct ReportRow {
    pub id: u64,
    pub employee_id: u64,
    pub employee_name: String,
    pub task_id: Option<u64>,
    pub task_title: Option<String>,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub report_type: Option<String>,
    #[schema(format = "date", value_type = String)]
    pub date: NaiveDate,
    pub hours_spent: f64,
    #[schema(example = "submitted")]
    pub status: String,
    pub approved_by: Option<u64>,
    pub approved_by_name: Option<String>,
    pub feedback: Option<String>,
    #[schema(format = "date-time", value_type = Option<String>)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct ReportFilter {
    /// Filter by report status
    pub status: Option<String>,
    /// Filter by report type
    #[serde(rename = "type")]
    pub report_type: Option<String>,
    /// Filter by employee (admin/hr only; others are scoped)
    pub employee_id: Option<u64>,
    /// Inclusive start of the date range
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: Option<NaiveDate>,
    /// Inclusive end of the date range
    #[schema(example = "2026-01-31", format = "date", value_type = String)]
    pub end_date: Option<NaiveDate>,
}

// Helper enum for typed SQLx binding
enum FilterValue {
    U64(u64),
    Str(String),
    Date(NaiveDate),
}

fn bind_args<'q, O>(
    mut query: QueryAs<'q, MySql, O, MySqlArguments>,
    args: Vec<FilterValue>,
) -> QueryAs<'q, MySql, O, MySqlArguments> {
    for arg in args {
        query = match arg {
            FilterValue::U64(v) => query.bind(v),
            FilterValue::Str(s) => query.bind(s),
            FilterValue::Date(d) => query.bind(d),
        };
    }
    query
}

async fn insert_report(
    auth: &AuthUser,
    pool: &MySqlPool,
    payload: &CreateReport,
    status: ReportStatus,
) -> actix_web::Result<HttpResponse> {
    let employee_id = auth.require_employee_profile()?;

    let result = sqlx::query(
        r#"
        INSERT INTO work_reports
            (employee_id, task_id, title, description, type, date, hours_spent, status)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(payload.task_id)
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(&payload.report_type)
    .bind(payload.date)
    .bind(payload.hours_spent.unwrap_or(0.0))
    .bind(status.to_string())
    .execute(pool)
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to create work report");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(json!({
        "message": match status {
            ReportStatus::Draft => "Draft saved",
            _ => "Report submitted",
        },
        "reportId": result.last_insert_id()
    })))
}

/* =========================
Submit / save draft
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/reports",
    request_body = CreateReport,
    responses(
        (status = 201, description = "Report submitted"),
        (status = 401),
        (status = 404, description = "Employee profile not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Report"
)]
pub async fn create_report(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateReport>,
) -> actix_web::Result<impl Responder> {
    insert_report(&auth, pool.get_ref(), &payload, ReportStatus::Submitted).await
}

#[utoipa::path(
    post,
    path = "/api/v1/reports/draft",
    request_body = CreateReport,
    responses(
        (status = 201, description = "Draft saved"),
        (status = 401),
        (status = 404, description = "Employee profile not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Report"
)]
pub async fn create_draft(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateReport>,
) -> actix_web::Result<impl Responder> {
    insert_report(&auth, pool.get_ref(), &payload, ReportStatus::Draft).await
}

/* =========================
List reports (scope-filtered)
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/reports",
    params(ReportFilter),
    responses(
        (status = 200, description = "Reports visible to the caller", body = [ReportRow]),
        (status = 401),
        (status = 404, description = "Employee profile not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Report"
)]
pub async fn report_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<ReportFilter>,
) -> actix_web::Result<impl Responder> {
    let scope = resolve_scope(&auth, pool.get_ref()).await?;

    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    match &scope {
        Scope::Global => {
            if let Some(emp_id) = query.employee_id {
                where_sql.push_str(" AND wr.employee_id = ?");
                args.push(FilterValue::U64(emp_id));
            }
        }
        Scope::Team { department, .. } => {
            where_sql.push_str(" AND e.department = ?");
            args.push(FilterValue::Str(department.clone()));
        }
        Scope::Own { employee_id } => {
            where_sql.push_str(" AND wr.employee_id = ?");
            args.push(FilterValue::U64(*employee_id));
        }
    }

    if let Some(status) = query.status.as_deref().filter(|s| *s != "all") {
        where_sql.push_str(" AND wr.status = ?");
        args.push(FilterValue::Str(status.to_string()));
    }

    if let Some(report_type) = query.report_type.as_deref().filter(|t| *t != "all") {
        where_sql.push_str(" AND wr.type = ?");
        args.push(FilterValue::Str(report_type.to_string()));
    }

    if let Some(start) = query.start_date {
        where_sql.push_str(" AND wr.date >= ?");
        args.push(FilterValue::Date(start));
    }

    if let Some(end) = query.end_date {
        where_sql.push_str(" AND wr.date <= ?");
        args.push(FilterValue::Date(end));
    }

    let sql = format!(
        r#"
        SELECT wr.id, wr.employee_id, e.name AS employee_name,
               wr.task_id, t.title AS task_title,
               wr.title, wr.description, wr.type, wr.date, wr.hours_spent,
               wr.status, wr.approved_by, a.name AS approved_by_name,
               wr.feedback, wr.created_at
        FROM work_reports wr
        JOIN employees e ON wr.employee_id = e.id
        LEFT JOIN tasks t ON wr.task_id = t.id
        LEFT JOIN employees a ON wr.approved_by = a.id
        {}
        ORDER BY wr.created_at DESC
        "#,
        where_sql
    );

    let data_q = bind_args(sqlx::query_as::<_, ReportRow>(&sql), args);

    let reports = data_q.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch work reports");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(reports))
}

/* =========================
Approve / reject (Admin/HR/Manager)
========================= */
#[derive(Deserialize, ToSchema)]
pub struct ApproveReport {
    /// approved or rejected
    #[schema(example = "approved")]
    pub status: String,
    pub feedback: Option<String>,
}

#[utoipa::path(
    put,
    path = "/api/v1/reports/{report_id}/approve",
    params(("report_id" = u64, Path, description = "Report ID")),
    request_body = ApproveReport,
    responses(
        (status = 200, description = "Decision recorded"),
        (status = 400, description = "Invalid status"),
        (status = 401),
        (status = 403),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Report"
)]
pub async fn approve_report(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<ApproveReport>,
) -> actix_web::Result<impl Responder> {
    auth.require_approver()?;
    let approver_id = auth.require_employee_profile()?;

    let report_id = path.into_inner();

    let decision = match ReportStatus::from_str(&payload.status) {
        Ok(s @ (ReportStatus::Approved | ReportStatus::Rejected)) => s,
        _ => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "status must be approved or rejected"
            })));
        }
    };

    let result = sqlx::query(
        "UPDATE work_reports SET status = ?, approved_by = ?, feedback = ? WHERE id = ?",
    )
    .bind(decision.to_string())
    .bind(approver_id)
    .bind(&payload.feedback)
    .bind(report_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, report_id, "Report decision failed");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Report not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": match decision {
            ReportStatus::Approved => "Report approved",
            _ => "Report rejected",
        }
    })))
}

/* =========================
Stats
========================= */
#[derive(Serialize, FromRow, ToSchema)]
pub struct ReportStats {
    #[schema(example = 30)]
    pub total: i64,
    #[schema(example = 2)]
    pub draft: i64,
    #[schema(example = 8)]
    pub submitted: i64,
    #[schema(example = 18)]
    pub approved: i64,
    #[schema(example = 2)]
    pub rejected: i64,
    #[schema(example = 210.5)]
    pub total_hours: Option<f64>,
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/stats",
    responses(
        (status = 200, description = "Report counts per status", body = ReportStats),
        (status = 401),
        (status = 404, description = "Employee profile not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Report"
)]
pub async fn report_stats(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let scope = resolve_scope(&auth, pool.get_ref()).await?;

    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    match &scope {
        Scope::Global => {}
        Scope::Team { department, .. } => {
            where_sql.push_str(" AND e.department = ?");
            args.push(FilterValue::Str(department.clone()));
        }
        Scope::Own { employee_id } => {
            where_sql.push_str(" AND wr.employee_id = ?");
            args.push(FilterValue::U64(*employee_id));
        }
    }

    let sql = format!(
        r#"
        SELECT
            CAST(COUNT(*) AS SIGNED) AS total,
            CAST(COALESCE(SUM(CASE WHEN wr.status = 'draft' THEN 1 ELSE 0 END), 0) AS SIGNED) AS draft,
            CAST(COALESCE(SUM(CASE WHEN wr.status = 'submitted' THEN 1 ELSE 0 END), 0) AS SIGNED) AS submitted,
            CAST(COALESCE(SUM(CASE WHEN wr.status = 'approved' THEN 1 ELSE 0 END), 0) AS SIGNED) AS approved,
            CAST(COALESCE(SUM(CASE WHEN wr.status = 'rejected' THEN 1 ELSE 0 END), 0) AS SIGNED) AS rejected,
            CAST(SUM(wr.hours_spent) AS DOUBLE) AS total_hours
        FROM work_reports wr
        JOIN employees e ON wr.employee_id = e.id
        {}
        "#,
        where_sql
    );

    let stats_q = bind_args(sqlx::query_as::<_, ReportStats>(&sql), args);

    let stats = stats_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to compute report stats");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binds_every_filter_variant() {
        let args = vec![
            FilterValue::U64(7),
            FilterValue::Str("submitted".into()),
            FilterValue::Date(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()),
        ];
        let _ = bind_args(sqlx::query_as::<_, ReportStats>("SELECT 1"), args);
    }

    #[test]
    fn filter_date_range_documents_as_plain_strings() {
        let (_, schema) = ReportFilter::schema();
        let json = serde_json::to_value(schema).unwrap();
        assert_eq!(json["properties"]["start_date"]["type"], "string");
        assert_eq!(json["properties"]["start_date"]["format"], "date");
        assert_eq!(json["properties"]["end_date"]["type"], "string");
        assert_eq!(json["properties"]["end_date"]["format"], "date");
    }
}
