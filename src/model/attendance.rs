use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Closed status set. The store column is an ENUM of the same two values,
/// so parsing a row back through `FromStr` cannot fail in practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Attendance {
    #[schema(example = "f3b9c2d4-1e5a-4c7b-8d9e-0a1b2c3d4e5f")]
    pub id: String,

    #[schema(example = "7f8a1f7e-3f6a-4e8a-9f1e-2b7c9d4e5a6b")]
    pub employee_id: String,

    #[schema(value_type = String, format = "date", example = "2024-01-01")]
    pub attendance_date: NaiveDate,

    #[schema(example = "present")]
    pub status: String,

    #[schema(value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,
}

/// Attendance row denormalized with the owning employee's display fields.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceWithEmployee {
    pub id: String,
    pub employee_id: String,

    #[schema(example = "John Doe")]
    pub employee_name: String,

    #[schema(example = "EMP-001")]
    pub employee_code: String,

    #[schema(example = "Engineering")]
    pub department: String,

    #[schema(value_type = String, format = "date", example = "2024-01-01")]
    pub attendance_date: NaiveDate,

    #[schema(example = "present")]
    pub status: String,

    #[schema(value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_round_trips_through_strings() {
        assert_eq!(AttendanceStatus::Present.to_string(), "present");
        assert_eq!(AttendanceStatus::Absent.to_string(), "absent");
        assert_eq!(
            AttendanceStatus::from_str("present").unwrap(),
            AttendanceStatus::Present
        );
        assert!(AttendanceStatus::from_str("late").is_err());
    }
}
