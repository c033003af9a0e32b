use crate::auth::auth::AuthUser;
use crate::model::asset::AssetStatus;
use crate::utils::db_utils::{build_update_sql, execute_update};
use actix_web::{error::ErrorInternalServerError, web, HttpResponse, Responder};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::{prelude::FromRow, MySqlPool};
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateAsset {
    #[schema(example = "MacBook Pro 16\"")]
    pub name: String,
    #[serde(rename = "type")]
    #[schema(example = "laptop")]
    pub asset_type: Option<String>,
    #[schema(example = "A2991")]
    pub model: Option<String>,
    #[schema(example = "C02XL0GWJGH5")]
    pub serial_number: String,
    #[schema(example = "2025-11-02", format = "date", value_type = Option<String>)]
    pub purchase_date: Option<NaiveDate>,
    #[schema(format = "date", value_type = Option<String>)]
    pub warranty_date: Option<NaiveDate>,
    pub value: Option<f64>,
    #[schema(example = "new")]
    pub condition_status: Option<String>,
}

#[derive(Serialize, FromRow, ToSchema)]
pub struct AssetRow {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub asset_type: Option<String>,
    pub model: Option<String>,
    pub serial_number: String,
    #[schema(format = "date", value_type = Option<String>)]
    pub purchase_date: Option<NaiveDate>,
    #[schema(format = "date", value_type = Option<String>)]
    pub warranty_date: Option<NaiveDate>,
    pub value: Option<f64>,
    pub condition_status: Option<String>,
    #[schema(example = "available")]
    pub status: String,
    pub assigned_to: Option<u64>,
    pub assigned_to_name: Option<String>,
    #[schema(format = "date", value_type = Option<String>)]
    pub assigned_date: Option<NaiveDate>,
    #[schema(format = "date-time", value_type = Option<String>)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct AssetFilter {
    /// Filter by asset status
    pub status: Option<String>,
    /// Filter by asset type
    #[serde(rename = "type")]
    pub asset_type: Option<String>,
    /// Search by name, serial number or model
    pub search: Option<String>,
}

// Columns a PUT may touch; assignment goes through /assign and /return.
const UPDATABLE_COLUMNS: &[&str] = &[
    "name",
    "model",
    "condition_status",
    "status",
    "value",
    "warranty_date",
];

// Helper enum for typed SQLx binding
enum FilterValue {
    Str(String),
}

/* =========================
List assets
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/assets",
    params(AssetFilter),
    responses(
        (status = 200, description = "Asset inventory", body = [AssetRow]),
        (status = 401)
    ),
    security(("bearer_auth" = [])),
    tag = "Asset"
)]
pub async fn asset_list(
    _auth: AuthUser, // the inventory is visible to every authenticated role
    pool: web::Data<MySqlPool>,
    query: web::Query<AssetFilter>,
) -> actix_web::Result<impl Responder> {
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(status) = query.status.as_deref().filter(|s| *s != "all") {
        where_sql.push_str(" AND a.status = ?");
        args.push(FilterValue::Str(status.to_string()));
    }

    if let Some(asset_type) = query.asset_type.as_deref().filter(|t| *t != "all") {
        where_sql.push_str(" AND a.type = ?");
        args.push(FilterValue::Str(asset_type.to_string()));
    }

    if let Some(search) = &query.search {
        where_sql.push_str(" AND (a.name LIKE ? OR a.serial_number LIKE ? OR a.model LIKE ?)");
        let like = format!("%{}%", search);
        args.push(FilterValue::Str(like.clone()));
        args.push(FilterValue::Str(like.clone()));
        args.push(FilterValue::Str(like));
    }

    let sql = format!(
        r#"
        SELECT a.*, e.name AS assigned_to_name
        FROM assets a
        LEFT JOIN employees e ON a.assigned_to = e.id
        {}
        ORDER BY a.created_at DESC
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, AssetRow>(&sql);
    for arg in args {
        data_q = match arg {
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let assets = data_q.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch assets");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(assets))
}

/* =========================
Create asset (Admin/HR)
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/assets",
    request_body = CreateAsset,
    responses(
        (status = 201, description = "Asset created"),
        (status = 400, description = "Duplicate serial number"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Asset"
)]
pub async fn create_asset(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateAsset>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let result = sqlx::query(
        r#"
        INSERT INTO assets
            (name, type, model, serial_number, purchase_date, warranty_date, value, condition_status)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.asset_type)
    .bind(&payload.model)
    .bind(&payload.serial_number)
    .bind(payload.purchase_date)
    .bind(payload.warranty_date)
    .bind(payload.value)
    .bind(&payload.condition_status)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(res) => Ok(HttpResponse::Created().json(json!({
            "message": "Asset created successfully",
            "assetId": res.last_insert_id()
        }))),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest().json(json!({
                        "message": "Serial number already exists"
                    })));
                }
            }

            error!(error = %e, "Failed to create asset");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/* =========================
Update asset (Admin/HR)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/assets/{asset_id}",
    params(("asset_id" = u64, Path, description = "Asset ID")),
    responses(
        (status = 200, description = "Asset updated"),
        (status = 400, description = "Unknown or empty fields"),
        (status = 401),
        (status = 403),
        (status = 404, description = "Asset not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Asset"
)]
pub async fn update_asset(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let asset_id = path.into_inner();

    let update = build_update_sql("assets", &body, UPDATABLE_COLUMNS, "id", asset_id)?;

    let affected = execute_update(pool.get_ref(), update).await.map_err(|e| {
        error!(error = %e, asset_id, "Failed to update asset");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Asset not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Asset updated successfully"
    })))
}

/* =========================
Assign / return (Admin/HR)
========================= */
#[derive(Deserialize, ToSchema)]
pub struct AssignAsset {
    #[schema(example = 1000)]
    pub employee_id: u64,
}

#[utoipa::path(
    put,
    path = "/api/v1/assets/{asset_id}/assign",
    params(("asset_id" = u64, Path, description = "Asset ID")),
    request_body = AssignAsset,
    responses(
        (status = 200, description = "Asset assigned"),
        (status = 401),
        (status = 403),
        (status = 404, description = "Asset not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Asset"
)]
pub async fn assign_asset(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<AssignAsset>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let asset_id = path.into_inner();
    let assigned_date = Local::now().date_naive();

    let result = sqlx::query(
        "UPDATE assets SET assigned_to = ?, assigned_date = ?, status = ? WHERE id = ?",
    )
    .bind(payload.employee_id)
    .bind(assigned_date)
    .bind(AssetStatus::Assigned.to_string())
    .bind(asset_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, asset_id, "Failed to assign asset");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Asset not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Asset assigned successfully"
    })))
}

#[utoipa::path(
    put,
    path = "/api/v1/assets/{asset_id}/return",
    params(("asset_id" = u64, Path, description = "Asset ID")),
    responses(
        (status = 200, description = "Asset returned"),
        (status = 401),
        (status = 403),
        (status = 404, description = "Asset not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Asset"
)]
pub async fn return_asset(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let asset_id = path.into_inner();

    let result = sqlx::query(
        "UPDATE assets SET assigned_to = NULL, assigned_date = NULL, status = ? WHERE id = ?",
    )
    .bind(AssetStatus::Available.to_string())
    .bind(asset_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, asset_id, "Failed to return asset");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Asset not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Asset returned successfully"
    })))
}

/* =========================
Stats
========================= */
#[derive(Serialize, FromRow, ToSchema)]
pub struct AssetStats {
    #[schema(example = 50)]
    pub total: i64,
    #[schema(example = 20)]
    pub available: i64,
    #[schema(example = 25)]
    pub assigned: i64,
    #[schema(example = 3)]
    pub maintenance: i64,
    #[schema(example = 2)]
    pub retired: i64,
    #[schema(example = 120000.0)]
    pub total_value: Option<f64>,
}

#[utoipa::path(
    get,
    path = "/api/v1/assets/stats",
    responses(
        (status = 200, description = "Asset counts per status", body = AssetStats),
        (status = 401)
    ),
    security(("bearer_auth" = [])),
    tag = "Asset"
)]
pub async fn asset_stats(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let stats = sqlx::query_as::<_, AssetStats>(
        r#"
        SELECT
            CAST(COUNT(*) AS SIGNED) AS total,
            CAST(COALESCE(SUM(CASE WHEN status = 'available' THEN 1 ELSE 0 END), 0) AS SIGNED) AS available,
            CAST(COALESCE(SUM(CASE WHEN status = 'assigned' THEN 1 ELSE 0 END), 0) AS SIGNED) AS assigned,
            CAST(COALESCE(SUM(CASE WHEN status = 'maintenance' THEN 1 ELSE 0 END), 0) AS SIGNED) AS maintenance,
            CAST(COALESCE(SUM(CASE WHEN status = 'retired' THEN 1 ELSE 0 END), 0) AS SIGNED) AS retired,
            CAST(SUM(value) AS DOUBLE) AS total_value
        FROM assets
        "#,
    )
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to compute asset stats");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(stats))
}
