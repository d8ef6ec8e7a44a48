use actix_web::{HttpResponse, web};
use chrono::{Datelike, Duration, Local, NaiveDate};
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::{
    aggregate::{self, DailyTrendPoint, DepartmentCount, WeeklyBucket},
    error::ApiError,
    model::attendance::AttendanceStatus,
};

// Narrow schema aliases so the OpenAPI doc names the list payloads.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct TrendList(Vec<DailyTrendPoint>);
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct BucketList(Vec<WeeklyBucket>);

async fn fetch_marks(
    pool: &MySqlPool,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<(NaiveDate, AttendanceStatus)>, ApiError> {
    let rows = sqlx::query_as::<_, (NaiveDate, String)>(
        "SELECT attendance_date, status FROM attendance WHERE attendance_date BETWEEN ? AND ?",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|(date, status)| {
            status
                .parse::<AttendanceStatus>()
                .map(|s| (date, s))
                .map_err(|_| ApiError::Internal(format!("unexpected status value '{}'", status)))
        })
        .collect()
}

/// 7-day attendance trend
#[utoipa::path(
    get,
    path = "/api/analytics/attendance-trends",
    responses(
        (status = 200, description = "Per-day counts for the last 7 days", body = TrendList),
        (status = 500, description = "Internal server error")
    ),
    tag = "Analytics"
)]
pub async fn attendance_trends(pool: web::Data<MySqlPool>) -> Result<HttpResponse, ApiError> {
    let today = Local::now().date_naive();
    let marks = fetch_marks(pool.get_ref(), today - Duration::days(6), today).await?;

    Ok(HttpResponse::Ok().json(aggregate::daily_trend(&marks, today)))
}

/// Employee count per department
#[utoipa::path(
    get,
    path = "/api/analytics/department-stats",
    responses(
        (status = 200, description = "Departments by headcount, descending", body = [DepartmentCount]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Analytics"
)]
pub async fn department_stats(pool: web::Data<MySqlPool>) -> Result<HttpResponse, ApiError> {
    let departments = sqlx::query_scalar::<_, String>("SELECT department FROM employees")
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(aggregate::department_distribution(&departments)))
}

/// Month-to-date attendance by week
#[utoipa::path(
    get,
    path = "/api/analytics/monthly-attendance",
    responses(
        (status = 200, description = "Weekly buckets for the current month", body = BucketList),
        (status = 500, description = "Internal server error")
    ),
    tag = "Analytics"
)]
pub async fn monthly_attendance(pool: web::Data<MySqlPool>) -> Result<HttpResponse, ApiError> {
    let today = Local::now().date_naive();
    let first_day = today.with_day(1).unwrap_or(today);
    let marks = fetch_marks(pool.get_ref(), first_day, today).await?;

    Ok(HttpResponse::Ok().json(aggregate::weekly_buckets(&marks, today)))
}
