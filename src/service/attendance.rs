use std::str::FromStr;

use chrono::{Local, NaiveDate, NaiveTime};
use sqlx::MySqlPool;

use crate::error::{ApiError, is_duplicate_key};
use crate::model::attendance::AttendanceStatus;

/// Result of a mark-attendance call, echoed back to the client.
#[derive(Debug)]
pub struct MarkedAttendance {
    pub status: AttendanceStatus,
    pub check_in: NaiveTime,
    pub date: NaiveDate,
}

/// Upserts today's attendance row for the employee.
///
/// Repeated calls the same day overwrite status and check-in rather than
/// creating a second row; the UNIQUE (employee_id, date) key backs this up.
pub async fn mark_attendance(
    pool: &MySqlPool,
    employee_id: u64,
    status: &str,
) -> Result<MarkedAttendance, ApiError> {
    let status = AttendanceStatus::from_str(status)
        .map_err(|_| ApiError::validation("Invalid attendance status"))?;

    let now = Local::now().naive_local();
    let (today, check_in) = (now.date(), now.time());

    let updated = update_today(pool, employee_id, status, today, check_in).await?;

    if updated == 0 {
        let inserted = sqlx::query(
            "INSERT INTO attendance (employee_id, date, status, check_in) VALUES (?, ?, ?, ?)",
        )
        .bind(employee_id)
        .bind(today)
        .bind(status.to_string())
        .bind(check_in)
        .execute(pool)
        .await;

        match inserted {
            Ok(_) => {}
            // A concurrent call created today's row first; the update now has
            // a target.
            Err(e) if is_duplicate_key(&e) => {
                update_today(pool, employee_id, status, today, check_in).await?;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(MarkedAttendance {
        status,
        check_in,
        date: today,
    })
}

async fn update_today(
    pool: &MySqlPool,
    employee_id: u64,
    status: AttendanceStatus,
    date: NaiveDate,
    check_in: NaiveTime,
) -> Result<u64, ApiError> {
    let result = sqlx::query(
        "UPDATE attendance SET status = ?, check_in = ? WHERE employee_id = ? AND date = ?",
    )
    .bind(status.to_string())
    .bind(check_in)
    .bind(employee_id)
    .bind(date)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Whether the employee already has an attendance row for today. Drives the
/// client's "already marked" state.
pub async fn attendance_visibility(pool: &MySqlPool, employee_id: u64) -> Result<bool, ApiError> {
    let today = Local::now().date_naive();

    let marked = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM attendance WHERE employee_id = ? AND date = ? LIMIT 1)",
    )
    .bind(employee_id)
    .bind(today)
    .fetch_one(pool)
    .await?;

    Ok(marked)
}
