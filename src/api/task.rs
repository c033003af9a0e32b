use crate::api::resolve_scope;
use crate::auth::auth::AuthUser;
use crate::domain::scope::Scope;
use crate::domain::task::{effective_status, parse_settable_status, status_for_progress};
use crate::model::task::{TaskPriority, TaskStatus};
use actix_web::{error::ErrorInternalServerError, web, HttpResponse, Responder};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::{prelude::FromRow, MySqlPool};
use std::str::FromStr;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateTask {
    #[schema(example = "Ship the Q3 report")]
    pub title: String,
    pub description: Option<String>,
    /// Employee the task is assigned to
    #[schema(example = 1000)]
    pub assigned_to: u64,
    #[schema(example = "Engineering")]
    pub department: Option<String>,
    #[schema(example = "high", value_type = String)]
    pub priority: Option<TaskPriority>,
    #[schema(example = "2026-02-01", format = "date", value_type = String)]
    pub due_date: Option<NaiveDate>,
}

#[derive(Serialize, FromRow, ToSchema)]
pub struct CommentRow {
    pub id: u64,
    pub task_id: u64,
    pub user_id: u64,
    pub user_name: String,
    pub comment: String,
    #[schema(format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, FromRow, ToSchema)]
pub struct TaskRow {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: u64,
    pub assigned_to_name: String,
    pub assigned_by: u64,
    pub assigned_by_name: String,
    pub department: Option<String>,
    #[schema(example = "high")]
    pub priority: String,
    /// Effective status; reads `overdue` when past due and not completed
    #[schema(example = "in_progress")]
    pub status: String,
    #[schema(example = 40)]
    pub progress: u8,
    #[schema(format = "date", value_type = Option<String>)]
    pub due_date: Option<NaiveDate>,
    #[schema(format = "date", value_type = Option<String>)]
    pub completed_date: Option<NaiveDate>,
    #[schema(format = "date-time", value_type = Option<String>)]
    pub created_at: Option<DateTime<Utc>>,
    #[sqlx(skip)]
    pub comments: Vec<CommentRow>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct TaskFilter {
    /// Filter by assignee (admin/hr; managers and employees are scoped)
    pub assigned_to: Option<u64>,
    /// Filter by effective status (`overdue` matches derived state)
    pub status: Option<String>,
    /// Filter by priority
    pub priority: Option<String>,
}

// Helper enum for typed SQLx binding
enum FilterValue {
    U64(u64),
    Str(String),
}

fn scope_conditions(scope: &Scope, where_sql: &mut String, args: &mut Vec<FilterValue>) {
    match scope {
        Scope::Global => {}
        Scope::Team {
            manager_id,
            department,
        } => {
            // Managers see what they assigned plus their department's board
            where_sql.push_str(" AND (t.assigned_by = ? OR t.department = ?)");
            args.push(FilterValue::U64(*manager_id));
            args.push(FilterValue::Str(department.clone()));
        }
        Scope::Own { employee_id } => {
            where_sql.push_str(" AND t.assigned_to = ?");
            args.push(FilterValue::U64(*employee_id));
        }
    }
}

/* =========================
Create task (Admin/HR/Manager)
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/tasks",
    request_body = CreateTask,
    responses(
        (status = 201, description = "Task created"),
        (status = 401),
        (status = 403),
        (status = 404, description = "Employee profile not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Task"
)]
pub async fn create_task(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateTask>,
) -> actix_web::Result<impl Responder> {
    auth.require_approver()?;
    let assigned_by = auth.require_employee_profile()?;

    let priority = payload.priority.unwrap_or(TaskPriority::Medium);

    let result = sqlx::query(
        r#"
        INSERT INTO tasks
            (title, description, assigned_to, assigned_by, department, priority, due_date)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(payload.assigned_to)
    .bind(assigned_by)
    .bind(&payload.department)
    .bind(priority.to_string())
    .bind(payload.due_date)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, assigned_by, "Failed to create task");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Task created successfully",
        "taskId": result.last_insert_id()
    })))
}

/* =========================
List tasks (scope-filtered, comments embedded)
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/tasks",
    params(TaskFilter),
    responses(
        (status = 200, description = "Tasks visible to the caller", body = [TaskRow]),
        (status = 401),
        (status = 404, description = "Employee profile not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Task"
)]
pub async fn task_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<TaskFilter>,
) -> actix_web::Result<impl Responder> {
    let scope = resolve_scope(&auth, pool.get_ref()).await?;

    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    scope_conditions(&scope, &mut where_sql, &mut args);

    if let Some(assigned_to) = query.assigned_to {
        where_sql.push_str(" AND t.assigned_to = ?");
        args.push(FilterValue::U64(assigned_to));
    }

    if let Some(priority) = query.priority.as_deref().filter(|p| *p != "all") {
        where_sql.push_str(" AND t.priority = ?");
        args.push(FilterValue::Str(priority.to_string()));
    }

    let sql = format!(
        r#"
        SELECT t.id, t.title, t.description, t.assigned_to,
               e1.name AS assigned_to_name,
               t.assigned_by, e2.name AS assigned_by_name,
               t.department, t.priority, t.status, t.progress,
               t.due_date, t.completed_date, t.created_at
        FROM tasks t
        JOIN employees e1 ON t.assigned_to = e1.id
        JOIN employees e2 ON t.assigned_by = e2.id
        {}
        ORDER BY t.created_at DESC
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, TaskRow>(&sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let mut tasks = data_q.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch tasks");
        ErrorInternalServerError("Internal Server Error")
    })?;

    // Derive overdue before any status filtering so `status=overdue` works
    let today = Local::now().date_naive();
    for task in &mut tasks {
        if let Ok(stored) = TaskStatus::from_str(&task.status) {
            task.status = effective_status(stored, task.due_date, today).to_string();
        }
    }

    if let Some(status) = query.status.as_deref().filter(|s| *s != "all") {
        tasks.retain(|t| t.status == status);
    }

    for task in &mut tasks {
        task.comments = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT tc.id, tc.task_id, tc.user_id, u.name AS user_name, tc.comment, tc.created_at
            FROM task_comments tc
            JOIN users u ON tc.user_id = u.id
            WHERE tc.task_id = ?
            ORDER BY tc.created_at DESC
            "#,
        )
        .bind(task.id)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, task_id = task.id, "Failed to fetch task comments");
            ErrorInternalServerError("Internal Server Error")
        })?;
    }

    Ok(HttpResponse::Ok().json(tasks))
}

/* =========================
Update progress
========================= */
#[derive(Deserialize, ToSchema)]
pub struct ProgressUpdate {
    /// 0-100
    #[schema(example = 60, maximum = 100)]
    pub progress: u8,
}

#[utoipa::path(
    put,
    path = "/api/v1/tasks/{task_id}/progress",
    params(("task_id" = u64, Path, description = "Task ID")),
    request_body = ProgressUpdate,
    responses(
        (status = 200, description = "Progress updated"),
        (status = 400, description = "Progress out of range"),
        (status = 401),
        (status = 404, description = "Task not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Task"
)]
pub async fn update_progress(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<ProgressUpdate>,
) -> actix_web::Result<impl Responder> {
    let task_id = path.into_inner();

    if payload.progress > 100 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "progress must be between 0 and 100"
        })));
    }

    let status = status_for_progress(payload.progress);
    let completed_date = match status {
        TaskStatus::Completed => Some(Local::now().date_naive()),
        _ => None,
    };

    let result = sqlx::query(
        "UPDATE tasks SET progress = ?, status = ?, completed_date = ? WHERE id = ?",
    )
    .bind(payload.progress)
    .bind(status.to_string())
    .bind(completed_date)
    .bind(task_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, task_id, "Failed to update task progress");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Task not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Progress updated successfully"
    })))
}

/* =========================
Update status
========================= */
#[derive(Deserialize, ToSchema)]
pub struct StatusUpdate {
    /// not_started, in_progress or completed; overdue is derived, not settable
    #[schema(example = "completed")]
    pub status: String,
}

#[utoipa::path(
    put,
    path = "/api/v1/tasks/{task_id}/status",
    params(("task_id" = u64, Path, description = "Task ID")),
    request_body = StatusUpdate,
    responses(
        (status = 200, description = "Status updated"),
        (status = 400, description = "Invalid or non-settable status"),
        (status = 401),
        (status = 404, description = "Task not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Task"
)]
pub async fn update_status(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<StatusUpdate>,
) -> actix_web::Result<impl Responder> {
    let task_id = path.into_inner();

    let Some(status) = parse_settable_status(&payload.status) else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "status must be not_started, in_progress or completed"
        })));
    };

    let completed_date = match status {
        TaskStatus::Completed => Some(Local::now().date_naive()),
        _ => None,
    };

    let result = sqlx::query("UPDATE tasks SET status = ?, completed_date = ? WHERE id = ?")
        .bind(status.to_string())
        .bind(completed_date)
        .bind(task_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, task_id, "Failed to update task status");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Task not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Status updated successfully"
    })))
}

/* =========================
Comments
========================= */
#[derive(Deserialize, ToSchema)]
pub struct NewComment {
    #[schema(example = "Blocked on the API review")]
    pub comment: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/tasks/{task_id}/comments",
    params(("task_id" = u64, Path, description = "Task ID")),
    request_body = NewComment,
    responses(
        (status = 201, description = "Comment added"),
        (status = 401),
        (status = 404, description = "Task not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Task"
)]
pub async fn add_comment(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<NewComment>,
) -> actix_web::Result<impl Responder> {
    let task_id = path.into_inner();

    let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tasks WHERE id = ?")
        .bind(task_id)
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, task_id, "Failed to look up task");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if exists == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Task not found"
        })));
    }

    sqlx::query("INSERT INTO task_comments (task_id, user_id, comment) VALUES (?, ?, ?)")
        .bind(task_id)
        .bind(auth.user_id)
        .bind(&payload.comment)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, task_id, "Failed to add comment");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Comment added successfully"
    })))
}

/* =========================
Stats (scope-filtered, overdue derived)
========================= */
#[derive(Serialize, FromRow, ToSchema)]
pub struct TaskStats {
    #[schema(example = 12)]
    pub total: i64,
    #[schema(example = 3)]
    pub not_started: i64,
    #[schema(example = 5)]
    pub in_progress: i64,
    #[schema(example = 2)]
    pub completed: i64,
    #[schema(example = 2)]
    pub overdue: i64,
}

#[utoipa::path(
    get,
    path = "/api/v1/tasks/stats",
    responses(
        (status = 200, description = "Task counts per effective status", body = TaskStats),
        (status = 401),
        (status = 404, description = "Employee profile not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Task"
)]
pub async fn task_stats(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let scope = resolve_scope(&auth, pool.get_ref()).await?;

    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();
    scope_conditions(&scope, &mut where_sql, &mut args);

    // A row counts as overdue when past due and not completed, matching
    // the read-time derivation used by the list endpoint.
    let sql = format!(
        r#"
        SELECT
            CAST(COUNT(*) AS SIGNED) AS total,
            CAST(COALESCE(SUM(CASE WHEN status = 'not_started'
                AND (due_date IS NULL OR due_date >= CURDATE()) THEN 1 ELSE 0 END), 0) AS SIGNED) AS not_started,
            CAST(COALESCE(SUM(CASE WHEN status = 'in_progress'
                AND (due_date IS NULL OR due_date >= CURDATE()) THEN 1 ELSE 0 END), 0) AS SIGNED) AS in_progress,
            CAST(COALESCE(SUM(CASE WHEN status = 'completed' THEN 1 ELSE 0 END), 0) AS SIGNED) AS completed,
            CAST(COALESCE(SUM(CASE WHEN status != 'completed'
                AND due_date IS NOT NULL AND due_date < CURDATE() THEN 1 ELSE 0 END), 0) AS SIGNED) AS overdue
        FROM tasks t
        {}
        "#,
        where_sql
    );

    let mut stats_q = sqlx::query_as::<_, TaskStats>(&sql);
    for arg in args {
        stats_q = match arg {
            FilterValue::U64(v) => stats_q.bind(v),
            FilterValue::Str(s) => stats_q.bind(s),
        };
    }

    let stats = stats_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to compute task stats");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(stats))
}
