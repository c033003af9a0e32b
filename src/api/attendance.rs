use crate::api::resolve_scope;
use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::domain::attendance::DayAttendance;
use crate::domain::scope::Scope;
use actix_web::{web, HttpResponse, Responder};
use chrono::{Datelike, Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CheckInReq {
    #[schema(example = "Head office")]
    pub location: Option<String>,
    /// office or remote
    #[serde(rename = "type", default)]
    pub entry_type: Option<String>,
}

/// Check-in endpoint
///
/// The duplicate check here is only for a friendly message: the unique key
/// on (employee_id, date) is what actually enforces one entry per day when
/// two check-ins race.
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-in",
    request_body = CheckInReq,
    responses(
        (status = 200, description = "Checked in", body = Object, example = json!({
            "message": "Checked in successfully",
            "checkInTime": "08:57:12",
            "status": "on_time"
        })),
        (status = 400, description = "Already checked in today"),
        (status = 401),
        (status = 404, description = "Employee profile not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<CheckInReq>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee_profile()?;
    let policy = config.attendance_policy();

    let now = Local::now();
    let today = now.date_naive();
    let time = now.time();

    let existing = sqlx::query_as::<_, (NaiveTime, Option<NaiveTime>)>(
        "SELECT check_in, check_out FROM time_entries WHERE employee_id = ? AND date = ?",
    )
    .bind(employee_id)
    .bind(today)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Check-in lookup failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let day = match existing {
        Some((check_in, check_out)) => DayAttendance::from_row(Some(check_in), check_out, &policy),
        None => DayAttendance::NoEntry,
    };

    let status = match day.check_in(time, &policy) {
        Ok((_, status)) => status,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": e.to_string()
            })));
        }
    };

    let result = sqlx::query(
        r#"
        INSERT INTO time_entries (employee_id, date, check_in, location, type, status)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(today)
    .bind(time)
    .bind(&payload.location)
    .bind(payload.entry_type.as_deref().unwrap_or("office"))
    .bind(status.to_string())
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Ok().json(json!({
            "message": "Checked in successfully",
            "checkInTime": time.format("%H:%M:%S").to_string(),
            "status": status
        }))),

        Err(e) => {
            // Lost the race against a concurrent check-in
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest().json(json!({
                        "message": "Already checked in today"
                    })));
                }
            }

            tracing::error!(error = %e, employee_id, "Check-in failed");
            Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ))
        }
    }
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-out",
    responses(
        (status = 200, description = "Checked out", body = Object, example = json!({
            "message": "Checked out successfully",
            "checkOutTime": "18:30:00",
            "overtime": 0.5
        })),
        (status = 400, description = "No active check-in found for today"),
        (status = 401),
        (status = 404, description = "Employee profile not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee_profile()?;
    let policy = config.attendance_policy();

    let now = Local::now();
    let today = now.date_naive();
    let time = now.time();

    let existing = sqlx::query_as::<_, (u64, NaiveTime, Option<NaiveTime>)>(
        "SELECT id, check_in, check_out FROM time_entries WHERE employee_id = ? AND date = ?",
    )
    .bind(employee_id)
    .bind(today)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Check-out lookup failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let (entry_id, day) = match existing {
        Some((id, check_in, check_out)) => {
            (id, DayAttendance::from_row(Some(check_in), check_out, &policy))
        }
        None => (0, DayAttendance::NoEntry),
    };

    let closed = match day.check_out(time, &policy) {
        Ok(day) => day,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": e.to_string()
            })));
        }
    };

    let overtime = match closed {
        DayAttendance::Closed { overtime_hours, .. } => overtime_hours,
        _ => 0.0,
    };

    sqlx::query("UPDATE time_entries SET check_out = ?, overtime = ? WHERE id = ?")
        .bind(time)
        .bind(overtime)
        .bind(entry_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Check-out failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Checked out successfully",
        "checkOutTime": time.format("%H:%M:%S").to_string(),
        "overtime": overtime
    })))
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct HistoryFilter {
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: Option<NaiveDate>,
    #[schema(example = "2026-01-31", format = "date", value_type = String)]
    pub end_date: Option<NaiveDate>,
    /// Admin/HR only: another employee's history
    pub employee_id: Option<u64>,
}

#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct HistoryEntry {
    pub id: u64,
    pub employee_id: u64,
    pub employee_name: String,
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(value_type = String)]
    pub check_in: Option<NaiveTime>,
    #[schema(value_type = String)]
    pub check_out: Option<NaiveTime>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub overtime: Option<f64>,
}

// Helper enum for typed SQLx binding
enum FilterValue {
    U64(u64),
    Str(String),
    Date(NaiveDate),
}

/// Attendance history, scope-filtered
#[utoipa::path(
    get,
    path = "/api/v1/attendance/history",
    params(HistoryFilter),
    responses(
        (status = 200, description = "Attendance entries", body = [HistoryEntry]),
        (status = 401),
        (status = 404, description = "Employee profile not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn history(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<HistoryFilter>,
) -> actix_web::Result<impl Responder> {
    let scope = resolve_scope(&auth, pool.get_ref()).await?;

    let mut sql = String::from(
        r#"
        SELECT te.id, te.employee_id, e.name AS employee_name, te.date,
               te.check_in, te.check_out, te.location, te.status, te.overtime
        FROM time_entries te
        JOIN employees e ON te.employee_id = e.id
        WHERE 1=1
        "#,
    );
    let mut args: Vec<FilterValue> = Vec::new();

    match &scope {
        Scope::Global => {}
        Scope::Team { department, .. } => {
            sql.push_str(" AND e.department = ?");
            args.push(FilterValue::Str(department.clone()));
        }
        Scope::Own { employee_id } => {
            sql.push_str(" AND te.employee_id = ?");
            args.push(FilterValue::U64(*employee_id));
        }
    }

    if let Some(requested) = query.employee_id {
        if !scope.covers_employee(requested) {
            return Err(actix_web::error::ErrorForbidden(
                "Not allowed to view this employee's attendance",
            ));
        }
        sql.push_str(" AND te.employee_id = ?");
        args.push(FilterValue::U64(requested));
    }

    if let Some(start) = query.start_date {
        sql.push_str(" AND te.date >= ?");
        args.push(FilterValue::Date(start));
    }

    if let Some(end) = query.end_date {
        sql.push_str(" AND te.date <= ?");
        args.push(FilterValue::Date(end));
    }

    sql.push_str(" ORDER BY te.date DESC, te.check_in DESC");

    let mut q = sqlx::query_as::<_, HistoryEntry>(&sql);
    for arg in args {
        q = match arg {
            FilterValue::U64(v) => q.bind(v),
            FilterValue::Str(s) => q.bind(s),
            FilterValue::Date(d) => q.bind(d),
        };
    }

    let entries = q.fetch_all(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch attendance history");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(entries))
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct StatsFilter {
    #[schema(example = 6)]
    pub month: Option<u32>,
    #[schema(example = 2026)]
    pub year: Option<i32>,
    /// Admin/HR only: another employee's stats
    pub employee_id: Option<u64>,
}

#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceStats {
    pub total_days: i64,
    pub on_time_days: i64,
    pub late_days: i64,
    pub total_overtime: f64,
    pub avg_hours_per_day: Option<f64>,
}

/// Monthly attendance aggregates, scope-filtered
#[utoipa::path(
    get,
    path = "/api/v1/attendance/stats",
    params(StatsFilter),
    responses(
        (status = 200, description = "Monthly aggregates", body = AttendanceStats),
        (status = 401),
        (status = 404, description = "Employee profile not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn stats(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<StatsFilter>,
) -> actix_web::Result<impl Responder> {
    let scope = resolve_scope(&auth, pool.get_ref()).await?;

    let today = Local::now().date_naive();
    let month = query.month.unwrap_or(today.month());
    let year = query.year.unwrap_or(today.year());

    let mut sql = String::from(
        r#"
        SELECT
            CAST(COUNT(*) AS SIGNED) AS total_days,
            CAST(COALESCE(SUM(te.status = 'on_time'), 0) AS SIGNED) AS on_time_days,
            CAST(COALESCE(SUM(te.status = 'late'), 0) AS SIGNED) AS late_days,
            CAST(COALESCE(SUM(te.overtime), 0) AS DOUBLE) AS total_overtime,
            CAST(AVG(CASE WHEN te.check_out IS NOT NULL
                THEN TIME_TO_SEC(TIMEDIFF(te.check_out, te.check_in)) / 3600
                END) AS DOUBLE) AS avg_hours_per_day
        FROM time_entries te
        JOIN employees e ON te.employee_id = e.id
        WHERE YEAR(te.date) = ? AND MONTH(te.date) = ?
        "#,
    );
    let mut args: Vec<FilterValue> = Vec::new();

    match &scope {
        Scope::Global => {
            if let Some(employee_id) = query.employee_id {
                sql.push_str(" AND te.employee_id = ?");
                args.push(FilterValue::U64(employee_id));
            }
        }
        Scope::Team { department, .. } => {
            sql.push_str(" AND e.department = ?");
            args.push(FilterValue::Str(department.clone()));
        }
        Scope::Own { employee_id } => {
            sql.push_str(" AND te.employee_id = ?");
            args.push(FilterValue::U64(*employee_id));
        }
    }

    let mut q = sqlx::query_as::<_, AttendanceStats>(&sql).bind(year).bind(month);
    for arg in args {
        q = match arg {
            FilterValue::U64(v) => q.bind(v),
            FilterValue::Str(s) => q.bind(s),
            FilterValue::Date(d) => q.bind(d),
        };
    }

    let stats = q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to compute attendance stats");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(stats))
}
