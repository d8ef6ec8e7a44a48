use actix_web::{HttpResponse, web};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    api::{SuccessResponse, employee::parse_uuid},
    error::ApiError,
    model::attendance::{Attendance, AttendanceStatus, AttendanceWithEmployee},
};

// Enriched base query shared by the listing endpoints. Ordering: newest date
// first, employee name breaks ties.
const ATTENDANCE_SELECT: &str = "SELECT a.id, a.employee_id, \
     e.full_name AS employee_name, e.employee_id AS employee_code, e.department, \
     a.attendance_date, a.status, a.created_at \
     FROM attendance a JOIN employees e ON e.id = a.employee_id";
const ATTENDANCE_ORDER: &str = " ORDER BY a.attendance_date DESC, e.full_name ASC";

#[derive(Debug, Deserialize, ToSchema)]
pub struct MarkAttendance {
    #[schema(example = "7f8a1f7e-3f6a-4e8a-9f1e-2b7c9d4e5a6b")]
    pub employee_id: String,
    #[schema(value_type = String, format = "date", example = "2024-01-01")]
    pub attendance_date: NaiveDate,
    pub status: AttendanceStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAttendance {
    pub status: AttendanceStatus,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListQuery {
    /// Narrow to one employee's records.
    pub employee_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct AttendanceFilterQuery {
    /// Exact date; takes precedence over the range below.
    pub date: Option<NaiveDate>,
    /// Inclusive range start; only applied together with `end_date`.
    pub start_date: Option<NaiveDate>,
    /// Inclusive range end; only applied together with `start_date`.
    pub end_date: Option<NaiveDate>,
    pub employee_id: Option<String>,
    pub status: Option<AttendanceStatus>,
}

#[derive(Debug, PartialEq)]
pub(crate) enum FilterBind {
    Date(NaiveDate),
    Text(String),
}

/// Compose the WHERE clause for the filter endpoint. All active filters are
/// ANDed; an exact date wins over the range; the range needs both ends.
pub(crate) fn build_filter(
    query: &AttendanceFilterQuery,
) -> Result<(String, Vec<FilterBind>), ApiError> {
    let mut conditions = Vec::new();
    let mut bindings = Vec::new();

    if let Some(date) = query.date {
        conditions.push("a.attendance_date = ?");
        bindings.push(FilterBind::Date(date));
    } else if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
        conditions.push("a.attendance_date >= ?");
        bindings.push(FilterBind::Date(start));
        conditions.push("a.attendance_date <= ?");
        bindings.push(FilterBind::Date(end));
    }

    if let Some(employee_id) = &query.employee_id {
        conditions.push("a.employee_id = ?");
        bindings.push(FilterBind::Text(parse_uuid(employee_id)?));
    }

    if let Some(status) = query.status {
        conditions.push("a.status = ?");
        bindings.push(FilterBind::Text(status.to_string()));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    Ok((where_clause, bindings))
}

async fn fetch_enriched(
    pool: &MySqlPool,
    where_clause: &str,
    bindings: Vec<FilterBind>,
) -> Result<Vec<AttendanceWithEmployee>, ApiError> {
    let sql = format!("{}{}{}", ATTENDANCE_SELECT, where_clause, ATTENDANCE_ORDER);

    let mut query = sqlx::query_as::<_, AttendanceWithEmployee>(&sql);
    for bind in bindings {
        query = match bind {
            FilterBind::Date(d) => query.bind(d),
            FilterBind::Text(s) => query.bind(s),
        };
    }

    let records = query.fetch_all(pool).await.map_err(|e| {
        error!(error = %e, sql = %sql, "Failed to fetch attendance records");
        ApiError::Internal(e.to_string())
    })?;

    Ok(records)
}

/// Mark attendance (upsert)
///
/// One row per (employee, date): marking the same day again overwrites the
/// status and keeps the original row's id and created_at.
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = MarkAttendance,
    responses(
        (status = 201, description = "Attendance recorded", body = Attendance),
        (status = 404, description = "Employee not found"),
        (status = 422, description = "Future date or invalid status"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    pool: web::Data<MySqlPool>,
    payload: web::Json<MarkAttendance>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    let employee_id = parse_uuid(&payload.employee_id)?;

    let today = Local::now().date_naive();
    if payload.attendance_date > today {
        return Err(ApiError::Validation(
            "Attendance date cannot be in the future".into(),
        ));
    }

    let exists = sqlx::query_scalar::<_, String>("SELECT id FROM employees WHERE id = ?")
        .bind(&employee_id)
        .fetch_optional(pool.get_ref())
        .await?;
    if exists.is_none() {
        return Err(ApiError::NotFound(format!(
            "Employee with ID {} not found",
            employee_id
        )));
    }

    sqlx::query(
        r#"
        INSERT INTO attendance (id, employee_id, attendance_date, status)
        VALUES (?, ?, ?, ?)
        ON DUPLICATE KEY UPDATE status = VALUES(status)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&employee_id)
    .bind(payload.attendance_date)
    .bind(payload.status.to_string())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id = %employee_id, "Failed to mark attendance");
        ApiError::Internal(e.to_string())
    })?;

    // On conflict the insert id was discarded; read back by the conflict key.
    let record = sqlx::query_as::<_, Attendance>(
        "SELECT * FROM attendance WHERE employee_id = ? AND attendance_date = ?",
    )
    .bind(&employee_id)
    .bind(payload.attendance_date)
    .fetch_one(pool.get_ref())
    .await?;

    Ok(HttpResponse::Created().json(record))
}

/// List attendance records
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(ListQuery),
    responses(
        (status = 200, description = "Attendance with employee details", body = [AttendanceWithEmployee]),
        (status = 422, description = "Malformed employee UUID"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    pool: web::Data<MySqlPool>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ApiError> {
    let filter = AttendanceFilterQuery {
        employee_id: query.into_inner().employee_id,
        ..Default::default()
    };
    let (where_clause, bindings) = build_filter(&filter)?;

    let records = fetch_enriched(pool.get_ref(), &where_clause, bindings).await?;
    Ok(HttpResponse::Ok().json(records))
}

/// Filter attendance records
#[utoipa::path(
    get,
    path = "/api/attendance/filter",
    params(AttendanceFilterQuery),
    responses(
        (status = 200, description = "Matching records", body = [AttendanceWithEmployee]),
        (status = 422, description = "Invalid filter value"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn filter_attendance(
    pool: web::Data<MySqlPool>,
    query: web::Query<AttendanceFilterQuery>,
) -> Result<HttpResponse, ApiError> {
    let (where_clause, bindings) = build_filter(&query)?;

    let records = fetch_enriched(pool.get_ref(), &where_clause, bindings).await?;
    Ok(HttpResponse::Ok().json(records))
}

/// Update attendance status
#[utoipa::path(
    put,
    path = "/api/attendance/{id}",
    params(("id", Path, description = "Attendance record UUID")),
    request_body = UpdateAttendance,
    responses(
        (status = 200, description = "Updated record", body = Attendance),
        (status = 404, description = "Record not found"),
        (status = 422, description = "Malformed UUID or invalid status")
    ),
    tag = "Attendance"
)]
pub async fn update_attendance(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
    payload: web::Json<UpdateAttendance>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_uuid(&path.into_inner())?;

    let record = sqlx::query_as::<_, Attendance>("SELECT * FROM attendance WHERE id = ?")
        .bind(&id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Attendance record {} not found", id)))?;

    let status = payload.status.to_string();
    sqlx::query("UPDATE attendance SET status = ? WHERE id = ?")
        .bind(&status)
        .bind(&id)
        .execute(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(Attendance { status, ..record }))
}

/// Delete attendance record
#[utoipa::path(
    delete,
    path = "/api/attendance/{id}",
    params(("id", Path, description = "Attendance record UUID")),
    responses(
        (status = 200, description = "Record deleted", body = SuccessResponse),
        (status = 404, description = "Record not found"),
        (status = 422, description = "Malformed UUID")
    ),
    tag = "Attendance"
)]
pub async fn delete_attendance(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_uuid(&path.into_inner())?;

    let result = sqlx::query("DELETE FROM attendance WHERE id = ?")
        .bind(&id)
        .execute(pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound(format!(
            "Attendance record {} not found",
            id
        )));
    }

    Ok(HttpResponse::Ok().json(SuccessResponse {
        success: true,
        message: "Attendance deleted successfully".into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    const EMP: &str = "7f8a1f7e-3f6a-4e8a-9f1e-2b7c9d4e5a6b";

    #[test]
    fn no_filters_means_no_where_clause() {
        let (clause, binds) = build_filter(&AttendanceFilterQuery::default()).unwrap();
        assert_eq!(clause, "");
        assert!(binds.is_empty());
    }

    #[test]
    fn exact_date_takes_precedence_over_range() {
        let query = AttendanceFilterQuery {
            date: Some(date("2024-01-05")),
            start_date: Some(date("2024-01-01")),
            end_date: Some(date("2024-01-31")),
            ..Default::default()
        };

        let (clause, binds) = build_filter(&query).unwrap();
        assert_eq!(clause, " WHERE a.attendance_date = ?");
        assert_eq!(binds, vec![FilterBind::Date(date("2024-01-05"))]);
    }

    #[test]
    fn range_requires_both_ends() {
        let query = AttendanceFilterQuery {
            start_date: Some(date("2024-01-01")),
            ..Default::default()
        };

        let (clause, binds) = build_filter(&query).unwrap();
        assert_eq!(clause, "");
        assert!(binds.is_empty());
    }

    #[test]
    fn filters_compose_conjunctively() {
        let query = AttendanceFilterQuery {
            start_date: Some(date("2024-01-01")),
            end_date: Some(date("2024-01-31")),
            employee_id: Some(EMP.to_string()),
            status: Some(AttendanceStatus::Present),
            ..Default::default()
        };

        let (clause, binds) = build_filter(&query).unwrap();
        assert_eq!(
            clause,
            " WHERE a.attendance_date >= ? AND a.attendance_date <= ? \
             AND a.employee_id = ? AND a.status = ?"
        );
        assert_eq!(binds.len(), 4);
        assert_eq!(binds[3], FilterBind::Text("present".to_string()));
    }

    #[test]
    fn malformed_employee_id_is_rejected() {
        let query = AttendanceFilterQuery {
            employee_id: Some("not-a-uuid".to_string()),
            ..Default::default()
        };
        assert!(build_filter(&query).is_err());
    }
}
