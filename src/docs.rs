use crate::aggregate::{AttendanceCounts, DailyTrendPoint, DepartmentCount, WeeklyBucket};
use crate::api::SuccessResponse;
use crate::api::analytics::{BucketList, TrendList};
use crate::api::attendance::{MarkAttendance, UpdateAttendance};
use crate::api::dashboard::DashboardMetrics;
use crate::api::employee::{CreateEmployee, EmployeeAttendanceSummary};
use crate::model::attendance::{Attendance, AttendanceStatus, AttendanceWithEmployee};
use crate::model::employee::Employee;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRMS Lite API",
        version = "1.0.0",
        description = r#"
## HRMS Lite

Lightweight Human Resource Management API for employee and attendance
management.

### Key Features
- **Employee Management**: create, list, view, and delete employee records
- **Attendance Tracking**: one record per employee per day, upsert on re-mark
- **Dashboard & Analytics**: daily trends, weekly buckets, department stats

### Response Format
JSON throughout; errors carry `{"success": false, "error", "detail"}`.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::delete_employee,
        crate::api::employee::attendance_summary,

        crate::api::attendance::mark_attendance,
        crate::api::attendance::list_attendance,
        crate::api::attendance::filter_attendance,
        crate::api::attendance::update_attendance,
        crate::api::attendance::delete_attendance,

        crate::api::dashboard::dashboard_metrics,

        crate::api::analytics::attendance_trends,
        crate::api::analytics::department_stats,
        crate::api::analytics::monthly_attendance
    ),
    components(
        schemas(
            Employee,
            CreateEmployee,
            EmployeeAttendanceSummary,
            Attendance,
            AttendanceStatus,
            AttendanceWithEmployee,
            MarkAttendance,
            UpdateAttendance,
            AttendanceCounts,
            DashboardMetrics,
            DailyTrendPoint,
            WeeklyBucket,
            DepartmentCount,
            TrendList,
            BucketList,
            SuccessResponse
        )
    ),
    tags(
        (name = "Employees", description = "Employee management APIs"),
        (name = "Attendance", description = "Attendance marking and listing APIs"),
        (name = "Dashboard", description = "Global metrics snapshot"),
        (name = "Analytics", description = "Trend and distribution reports"),
    )
)]
pub struct ApiDoc;
