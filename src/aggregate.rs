//! Attendance aggregation and reporting engine.
//!
//! Pure functions over rows the handlers have already fetched. Nothing here
//! touches the pool or holds state between calls; every figure is derived
//! fresh from the slice passed in.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::attendance::AttendanceStatus;

/// One day of the 7-day trend window.
#[derive(Debug, PartialEq, Serialize, ToSchema)]
pub struct DailyTrendPoint {
    #[schema(value_type = String, format = "date", example = "2024-01-01")]
    pub date: NaiveDate,
    pub present: i64,
    pub absent: i64,
}

/// One week bucket of the month-to-date view.
#[derive(Debug, PartialEq, Serialize, ToSchema)]
pub struct WeeklyBucket {
    #[schema(example = "Week 1")]
    pub week: String,
    pub present: i64,
    pub absent: i64,
    pub total: i64,
    /// present/total * 100, one decimal place; 0 when the bucket is empty.
    pub rate: f64,
}

#[derive(Debug, PartialEq, Serialize, ToSchema)]
pub struct DepartmentCount {
    #[schema(example = "Engineering")]
    pub department: String,
    pub count: i64,
}

/// Raw counts behind a per-employee summary or the overall rate.
#[derive(Debug, PartialEq, Serialize, ToSchema)]
pub struct AttendanceCounts {
    pub total_days: i64,
    pub present_days: i64,
    pub absent_days: i64,
    /// present/total * 100, two decimal places; 0.0 when there are no rows.
    pub attendance_rate: f64,
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Overall rate figure used by the dashboard: two decimals, 0.0 on empty.
pub fn attendance_rate(present: i64, total: i64) -> f64 {
    if total > 0 {
        round2(present as f64 / total as f64 * 100.0)
    } else {
        0.0
    }
}

/// Counts of present/absent per calendar day over the fixed window
/// `[today - 6, today]`. Always exactly 7 entries, ascending, zero-filled;
/// marks outside the window are ignored.
pub fn daily_trend(marks: &[(NaiveDate, AttendanceStatus)], today: NaiveDate) -> Vec<DailyTrendPoint> {
    let start = today - Duration::days(6);

    let mut points: Vec<DailyTrendPoint> = (0..7)
        .map(|offset| DailyTrendPoint {
            date: start + Duration::days(offset),
            present: 0,
            absent: 0,
        })
        .collect();

    for (date, status) in marks {
        if *date < start || *date > today {
            continue;
        }
        let idx = (*date - start).num_days() as usize;
        match status {
            AttendanceStatus::Present => points[idx].present += 1,
            AttendanceStatus::Absent => points[idx].absent += 1,
        }
    }

    points
}

/// Week-of-month index for a day number: days 1-7 are week 1, 8-14 week 2
/// and so on.
pub fn week_of_month(day: u32) -> u32 {
    (day - 1) / 7 + 1
}

/// Month-to-date attendance grouped into 7-day buckets. Considers only marks
/// between the 1st of `today`'s month and `today`; emits every bucket from
/// "Week 1" through the bucket containing `today`, zero-filled, ascending.
pub fn weekly_buckets(marks: &[(NaiveDate, AttendanceStatus)], today: NaiveDate) -> Vec<WeeklyBucket> {
    let first_day = today.with_day(1).unwrap_or(today);
    let weeks = week_of_month(today.day()) as usize;

    let mut buckets: Vec<WeeklyBucket> = (1..=weeks)
        .map(|n| WeeklyBucket {
            week: format!("Week {}", n),
            present: 0,
            absent: 0,
            total: 0,
            rate: 0.0,
        })
        .collect();

    for (date, status) in marks {
        if *date < first_day || *date > today {
            continue;
        }
        let bucket = &mut buckets[week_of_month(date.day()) as usize - 1];
        bucket.total += 1;
        match status {
            AttendanceStatus::Present => bucket.present += 1,
            AttendanceStatus::Absent => bucket.absent += 1,
        }
    }

    for bucket in &mut buckets {
        if bucket.total > 0 {
            bucket.rate = round1(bucket.present as f64 / bucket.total as f64 * 100.0);
        }
    }

    buckets
}

/// Employee headcount per department, descending by count. Ties keep the
/// order departments were first seen in (stable sort over a first-seen list).
pub fn department_distribution(departments: &[String]) -> Vec<DepartmentCount> {
    let mut counts: Vec<DepartmentCount> = Vec::new();

    for dept in departments {
        match counts.iter_mut().find(|c| &c.department == dept) {
            Some(entry) => entry.count += 1,
            None => counts.push(DepartmentCount {
                department: dept.clone(),
                count: 1,
            }),
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Totals and rate for one employee's attendance history.
pub fn summarize(statuses: &[AttendanceStatus]) -> AttendanceCounts {
    let total_days = statuses.len() as i64;
    let present_days = statuses
        .iter()
        .filter(|s| **s == AttendanceStatus::Present)
        .count() as i64;
    let absent_days = total_days - present_days;

    AttendanceCounts {
        total_days,
        present_days,
        absent_days,
        attendance_rate: attendance_rate(present_days, total_days),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AttendanceStatus::{Absent, Present};

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn daily_trend_spans_exactly_seven_days() {
        let today = d("2024-03-20");
        let trend = daily_trend(&[], today);

        assert_eq!(trend.len(), 7);
        assert_eq!(trend[0].date, d("2024-03-14"));
        assert_eq!(trend[6].date, d("2024-03-20"));
        for w in trend.windows(2) {
            assert!(w[0].date < w[1].date);
        }
        assert!(trend.iter().all(|p| p.present == 0 && p.absent == 0));
    }

    #[test]
    fn daily_trend_counts_by_date_and_status() {
        let today = d("2024-03-20");
        let marks = vec![
            (d("2024-03-20"), Present),
            (d("2024-03-20"), Present),
            (d("2024-03-20"), Absent),
            (d("2024-03-14"), Absent),
            // outside the window, ignored
            (d("2024-03-13"), Present),
            (d("2024-03-21"), Present),
        ];

        let trend = daily_trend(&marks, today);
        assert_eq!(trend[6].present, 2);
        assert_eq!(trend[6].absent, 1);
        assert_eq!(trend[0].absent, 1);
        assert_eq!(trend[0].present, 0);
        let total: i64 = trend.iter().map(|p| p.present + p.absent).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn week_of_month_boundaries() {
        assert_eq!(week_of_month(1), 1);
        assert_eq!(week_of_month(7), 1);
        assert_eq!(week_of_month(8), 2);
        assert_eq!(week_of_month(14), 2);
        assert_eq!(week_of_month(15), 3);
        assert_eq!(week_of_month(31), 5);
    }

    #[test]
    fn weekly_buckets_are_month_to_date_and_zero_filled() {
        let today = d("2024-03-15"); // day 15 -> three buckets
        let marks = vec![
            (d("2024-03-01"), Present),
            (d("2024-03-02"), Present),
            (d("2024-03-03"), Absent),
            (d("2024-03-15"), Present),
            // previous month, ignored
            (d("2024-02-29"), Absent),
        ];

        let buckets = weekly_buckets(&marks, today);
        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].week, "Week 1");
        assert_eq!(buckets[0].total, 3);
        assert_eq!(buckets[0].rate, 66.7);
        assert_eq!(buckets[1].total, 0);
        assert_eq!(buckets[1].rate, 0.0);
        assert_eq!(buckets[2].week, "Week 3");
        assert_eq!(buckets[2].present, 1);
        assert_eq!(buckets[2].rate, 100.0);
    }

    #[test]
    fn department_counts_descend_with_stable_ties() {
        let departments: Vec<String> = ["Eng", "Sales", "Eng", "HR"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let counts = department_distribution(&departments);
        assert_eq!(counts[0].department, "Eng");
        assert_eq!(counts[0].count, 2);
        // Sales seen before HR, both count 1
        assert_eq!(counts[1].department, "Sales");
        assert_eq!(counts[2].department, "HR");
    }

    #[test]
    fn summary_counts_add_up() {
        let summary = summarize(&[Present, Present, Absent]);
        assert_eq!(summary.total_days, 3);
        assert_eq!(summary.present_days + summary.absent_days, summary.total_days);
        assert_eq!(summary.attendance_rate, 66.67);
    }

    #[test]
    fn summary_of_no_rows_has_zero_rate() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_days, 0);
        assert_eq!(summary.attendance_rate, 0.0);
    }

    #[test]
    fn overall_rate_rounds_to_two_decimals() {
        assert_eq!(attendance_rate(1, 3), 33.33);
        assert_eq!(attendance_rate(2, 3), 66.67);
        assert_eq!(attendance_rate(0, 0), 0.0);
    }
}
