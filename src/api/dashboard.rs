use actix_web::{HttpResponse, web};
use chrono::Local;
use serde::Serialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::{aggregate, error::ApiError, model::employee::Employee};

#[derive(Serialize, ToSchema)]
pub struct DashboardMetrics {
    pub total_employees: i64,
    pub total_attendance_records: i64,
    pub today_present: i64,
    pub today_absent: i64,
    pub total_absent: i64,
    #[schema(example = 85.71)]
    pub overall_attendance_rate: f64,
    pub recent_employees: Vec<Employee>,
}

async fn count(pool: &MySqlPool, sql: &str) -> Result<i64, ApiError> {
    Ok(sqlx::query_scalar::<_, i64>(sql).fetch_one(pool).await?)
}

/// Dashboard metrics
///
/// Each figure is its own read against the store at call time. There is no
/// snapshot across them: under concurrent writes the numbers may not
/// reconcile exactly, which is accepted.
#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Global metrics snapshot", body = DashboardMetrics),
        (status = 500, description = "Internal server error")
    ),
    tag = "Dashboard"
)]
pub async fn dashboard_metrics(pool: web::Data<MySqlPool>) -> Result<HttpResponse, ApiError> {
    let pool = pool.get_ref();
    let today = Local::now().date_naive();

    let total_employees = count(pool, "SELECT COUNT(*) FROM employees").await?;
    let total_attendance_records = count(pool, "SELECT COUNT(*) FROM attendance").await?;

    let today_present = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM attendance WHERE attendance_date = ? AND status = 'present'",
    )
    .bind(today)
    .fetch_one(pool)
    .await?;

    let today_absent = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM attendance WHERE attendance_date = ? AND status = 'absent'",
    )
    .bind(today)
    .fetch_one(pool)
    .await?;

    let total_absent = count(pool, "SELECT COUNT(*) FROM attendance WHERE status = 'absent'").await?;

    let overall_attendance_rate = if total_attendance_records > 0 {
        let total_present =
            count(pool, "SELECT COUNT(*) FROM attendance WHERE status = 'present'").await?;
        aggregate::attendance_rate(total_present, total_attendance_records)
    } else {
        0.0
    };

    let recent_employees = sqlx::query_as::<_, Employee>(
        "SELECT * FROM employees ORDER BY created_at DESC LIMIT 5",
    )
    .fetch_all(pool)
    .await?;

    Ok(HttpResponse::Ok().json(DashboardMetrics {
        total_employees,
        total_attendance_records,
        today_present,
        today_absent,
        total_absent,
        overall_attendance_rate,
        recent_employees,
    }))
}
