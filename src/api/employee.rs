use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    aggregate,
    api::SuccessResponse,
    error::ApiError,
    model::{attendance::AttendanceStatus, employee::Employee},
};

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "EMP-001")]
    pub employee_id: String,
    #[schema(example = "John Doe")]
    pub full_name: String,
    #[schema(example = "john.doe@company.com", format = "email")]
    pub email: String,
    #[schema(example = "Engineering")]
    pub department: String,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeAttendanceSummary {
    pub employee_id: String,
    #[schema(example = "John Doe")]
    pub employee_name: String,
    #[schema(example = "EMP-001")]
    pub employee_code: String,
    #[schema(example = "Engineering")]
    pub department: String,
    pub total_days: i64,
    pub present_days: i64,
    pub absent_days: i64,
    #[schema(example = 66.67)]
    pub attendance_rate: f64,
}

/// Parse a path/query id, rejecting anything that is not a UUID before it
/// reaches the store.
pub(crate) fn parse_uuid(raw: &str) -> Result<String, ApiError> {
    Uuid::parse_str(raw)
        .map(|u| u.to_string())
        .map_err(|_| ApiError::Validation(format!("'{}' is not a valid UUID", raw)))
}

fn validate_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
}

/// Trim and check every field of a create payload. Runs before any store
/// call; the returned payload carries the normalized values.
fn validate_new_employee(payload: CreateEmployee) -> Result<CreateEmployee, ApiError> {
    let employee_id = payload.employee_id.trim().to_string();
    if employee_id.is_empty() || employee_id.len() > 50 {
        return Err(ApiError::Validation(
            "employee_id must be between 1 and 50 characters".into(),
        ));
    }
    if !employee_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ApiError::Validation(
            "employee_id can only contain letters, numbers, dashes, and underscores".into(),
        ));
    }

    let full_name = payload.full_name.trim().to_string();
    if full_name.is_empty() || full_name.len() > 255 {
        return Err(ApiError::Validation(
            "full_name must be between 1 and 255 characters".into(),
        ));
    }

    let email = payload.email.trim().to_string();
    if !validate_email(&email) {
        return Err(ApiError::Validation(format!(
            "'{}' is not a valid email address",
            email
        )));
    }

    let department = payload.department.trim().to_string();
    if department.is_empty() || department.len() > 100 {
        return Err(ApiError::Validation(
            "department must be between 1 and 100 characters".into(),
        ));
    }

    Ok(CreateEmployee {
        employee_id,
        full_name,
        email,
        department,
    })
}

/// Map a failed INSERT to the error taxonomy: unique-key violations
/// (SQLSTATE 23000) become 409s naming the offending field.
fn map_insert_error(e: sqlx::Error, payload: &CreateEmployee) -> ApiError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.code().as_deref() == Some("23000") {
            let msg = db_err.message();
            if msg.contains("uk_employees_code") {
                return ApiError::Conflict(format!(
                    "Employee ID '{}' already exists",
                    payload.employee_id
                ));
            }
            if msg.contains("uk_employees_email") {
                return ApiError::Conflict(format!(
                    "Email '{}' is already registered",
                    payload.email
                ));
            }
        }
    }
    error!(error = %e, "Failed to create employee");
    ApiError::Internal(e.to_string())
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 409, description = "Duplicate employee code or email"),
        (status = 422, description = "Validation error"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employees"
)]
pub async fn create_employee(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateEmployee>,
) -> Result<HttpResponse, ApiError> {
    let payload = validate_new_employee(payload.into_inner())?;
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO employees (id, employee_id, full_name, email, department)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&payload.employee_id)
    .bind(&payload.full_name)
    .bind(&payload.email)
    .bind(&payload.department)
    .execute(pool.get_ref())
    .await
    .map_err(|e| map_insert_error(e, &payload))?;

    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(&id)
        .fetch_one(pool.get_ref())
        .await?;

    Ok(HttpResponse::Created().json(employee))
}

/// List Employees
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "All employees, newest first", body = [Employee]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employees"
)]
pub async fn list_employees(pool: web::Data<MySqlPool>) -> Result<HttpResponse, ApiError> {
    let employees =
        sqlx::query_as::<_, Employee>("SELECT * FROM employees ORDER BY created_at DESC")
            .fetch_all(pool.get_ref())
            .await?;

    Ok(HttpResponse::Ok().json(employees))
}

/// Get Employee by UUID
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(("id", Path, description = "Employee UUID")),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found"),
        (status = 422, description = "Malformed UUID")
    ),
    tag = "Employees"
)]
pub async fn get_employee(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_uuid(&path.into_inner())?;

    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(&id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Employee with ID {} not found", id)))?;

    Ok(HttpResponse::Ok().json(employee))
}

/// Delete Employee
///
/// Cascades: the store removes the employee's attendance rows with it.
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(("id", Path, description = "Employee UUID")),
    responses(
        (status = 200, description = "Employee deleted", body = SuccessResponse),
        (status = 404, description = "Employee not found"),
        (status = 422, description = "Malformed UUID")
    ),
    tag = "Employees"
)]
pub async fn delete_employee(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_uuid(&path.into_inner())?;

    let result = sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(&id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, employee_id = %id, "Failed to delete employee");
            ApiError::Internal(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound(format!(
            "Employee with ID {} not found",
            id
        )));
    }

    Ok(HttpResponse::Ok().json(SuccessResponse {
        success: true,
        message: "Employee deleted successfully".into(),
    }))
}

/// Per-employee attendance summary
#[utoipa::path(
    get,
    path = "/api/employees/{id}/attendance-summary",
    params(("id", Path, description = "Employee UUID")),
    responses(
        (status = 200, description = "Attendance summary", body = EmployeeAttendanceSummary),
        (status = 404, description = "Employee not found"),
        (status = 422, description = "Malformed UUID")
    ),
    tag = "Employees"
)]
pub async fn attendance_summary(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_uuid(&path.into_inner())?;

    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(&id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Employee with ID {} not found", id)))?;

    let raw_statuses =
        sqlx::query_scalar::<_, String>("SELECT status FROM attendance WHERE employee_id = ?")
            .bind(&id)
            .fetch_all(pool.get_ref())
            .await?;

    let statuses = raw_statuses
        .iter()
        .map(|s| {
            s.parse::<AttendanceStatus>()
                .map_err(|_| ApiError::Internal(format!("unexpected status value '{}'", s)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let counts = aggregate::summarize(&statuses);

    Ok(HttpResponse::Ok().json(EmployeeAttendanceSummary {
        employee_id: employee.id,
        employee_name: employee.full_name,
        employee_code: employee.employee_id,
        department: employee.department,
        total_days: counts.total_days,
        present_days: counts.present_days,
        absent_days: counts.absent_days,
        attendance_rate: counts.attendance_rate,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> CreateEmployee {
        CreateEmployee {
            employee_id: "EMP-001".into(),
            full_name: "John Doe".into(),
            email: "john@company.com".into(),
            department: "Engineering".into(),
        }
    }

    #[test]
    fn valid_payload_is_trimmed() {
        let mut p = payload();
        p.full_name = "  John Doe  ".into();
        p.email = " john@company.com ".into();

        let normalized = validate_new_employee(p).unwrap();
        assert_eq!(normalized.full_name, "John Doe");
        assert_eq!(normalized.email, "john@company.com");
    }

    #[test]
    fn employee_code_charset_is_enforced() {
        let mut p = payload();
        p.employee_id = "EMP 001".into();
        assert!(validate_new_employee(p).is_err());

        let mut p = payload();
        p.employee_id = "emp_001-A".into();
        assert!(validate_new_employee(p).is_ok());

        let mut p = payload();
        p.employee_id = "x".repeat(51);
        assert!(validate_new_employee(p).is_err());
    }

    #[test]
    fn blank_fields_are_rejected() {
        let mut p = payload();
        p.full_name = "   ".into();
        assert!(validate_new_employee(p).is_err());

        let mut p = payload();
        p.department = "".into();
        assert!(validate_new_employee(p).is_err());
    }

    #[test]
    fn email_syntax_is_checked() {
        assert!(validate_email("a@b.com"));
        assert!(!validate_email("not-an-email"));
        assert!(!validate_email("a@b"));
        assert!(!validate_email("a b@c.com"));
        assert!(!validate_email("@b.com"));
        assert!(!validate_email("a@b.com@c.com"));
    }

    #[test]
    fn uuid_path_ids_are_validated() {
        assert!(parse_uuid("7f8a1f7e-3f6a-4e8a-9f1e-2b7c9d4e5a6b").is_ok());
        assert!(parse_uuid("123").is_err());
    }
}
