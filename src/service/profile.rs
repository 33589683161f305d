use chrono::{Local, NaiveTime};
use sqlx::MySqlPool;

use crate::error::ApiError;
use crate::model::attendance::{AttendanceRecord, NOT_MARKED};
use crate::model::employee::Employee;
use crate::service::payroll::{SalaryBreakdown, compute_salary};

/// Read view behind the dashboard screen.
#[derive(Debug)]
pub struct Dashboard {
    pub attendance_status: String,
    pub base_salary: f64,
    pub monthly_salary: f64,
    pub overtime_hours: f64,
}

/// This month's attendance statistics.
#[derive(Debug)]
pub struct MonthStats {
    pub present_days: i64,
    pub absent_days: i64,
    pub total_overtime: f64,
    pub total_days: i64,
}

/// Today's attendance record, all-None when no row exists.
#[derive(Debug, Default)]
pub struct TodayAttendance {
    pub status: Option<String>,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
}

/// Aggregated profile view: identity, month stats, today's record, the five
/// most recent attendance rows, and the derived payroll figures.
#[derive(Debug)]
pub struct ProfileView {
    pub employee: Employee,
    pub stats: MonthStats,
    pub today: TodayAttendance,
    pub recent_history: Vec<AttendanceRecord>,
    pub salary: SalaryBreakdown,
}

pub async fn get_dashboard(pool: &MySqlPool, employee_id: u64) -> Result<Dashboard, ApiError> {
    let today = Local::now().date_naive();

    let status: Option<Option<String>> =
        sqlx::query_scalar("SELECT status FROM attendance WHERE employee_id = ? AND date = ?")
            .bind(employee_id)
            .bind(today)
            .fetch_optional(pool)
            .await?;

    let base_salary: Option<f64> = sqlx::query_scalar("SELECT base_salary FROM employees WHERE id = ?")
        .bind(employee_id)
        .fetch_optional(pool)
        .await?;

    let Some(base_salary) = base_salary else {
        return Err(ApiError::not_found("Employee not found"));
    };

    let overtime_hours = month_overtime(pool, employee_id).await?;
    let salary = compute_salary(base_salary, overtime_hours);

    Ok(Dashboard {
        attendance_status: status.flatten().unwrap_or_else(|| NOT_MARKED.to_string()),
        base_salary,
        monthly_salary: salary.monthly_salary,
        overtime_hours,
    })
}

pub async fn get_profile(pool: &MySqlPool, employee_id: u64) -> Result<ProfileView, ApiError> {
    let employee: Option<Employee> = sqlx::query_as(
        "SELECT id, name, email, base_salary, created_at FROM employees WHERE id = ?",
    )
    .bind(employee_id)
    .fetch_optional(pool)
    .await?;

    let Some(employee) = employee else {
        return Err(ApiError::not_found("Profile not found"));
    };

    let (present_days, absent_days, total_overtime, total_days): (i64, i64, f64, i64) =
        sqlx::query_as(
            "SELECT \
                COUNT(CASE WHEN status = 'Present' THEN 1 END), \
                COUNT(CASE WHEN status = 'Absent' THEN 1 END), \
                COALESCE(SUM(overtime_hours), 0), \
                COUNT(*) \
             FROM attendance \
             WHERE employee_id = ? \
             AND MONTH(date) = MONTH(CURRENT_DATE()) \
             AND YEAR(date) = YEAR(CURRENT_DATE())",
        )
        .bind(employee_id)
        .fetch_one(pool)
        .await?;

    let today = Local::now().date_naive();
    let today_row: Option<(Option<String>, Option<NaiveTime>, Option<NaiveTime>)> = sqlx::query_as(
        "SELECT status, check_in, check_out FROM attendance WHERE employee_id = ? AND date = ?",
    )
    .bind(employee_id)
    .bind(today)
    .fetch_optional(pool)
    .await?;

    let today = match today_row {
        Some((status, check_in, check_out)) => TodayAttendance {
            status,
            check_in,
            check_out,
        },
        None => TodayAttendance::default(),
    };

    let recent_history: Vec<AttendanceRecord> = sqlx::query_as(
        "SELECT id, employee_id, date, status, check_in, check_out, overtime_hours \
         FROM attendance \
         WHERE employee_id = ? \
         ORDER BY date DESC \
         LIMIT 5",
    )
    .bind(employee_id)
    .fetch_all(pool)
    .await?;

    let salary = compute_salary(employee.base_salary, total_overtime);

    Ok(ProfileView {
        employee,
        stats: MonthStats {
            present_days,
            absent_days,
            total_overtime,
            total_days,
        },
        today,
        recent_history,
        salary,
    })
}

/// Month-to-date overtime sum; 0 when no rows exist.
async fn month_overtime(pool: &MySqlPool, employee_id: u64) -> Result<f64, ApiError> {
    let total: f64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(overtime_hours), 0) FROM attendance \
         WHERE employee_id = ? \
         AND MONTH(date) = MONTH(CURRENT_DATE()) \
         AND YEAR(date) = YEAR(CURRENT_DATE())",
    )
    .bind(employee_id)
    .fetch_one(pool)
    .await?;

    Ok(total)
}
