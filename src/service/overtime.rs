use chrono::{Local, NaiveDateTime};
use sqlx::MySqlPool;

use crate::error::{ApiError, is_duplicate_key};
use crate::model::overtime::{OvertimeSession, SessionStatus};
use crate::service::payroll::round2;

/// Outcome of stopping a session: the day's new overtime total.
#[derive(Debug)]
pub struct StoppedOvertime {
    pub overtime_hours: f64,
}

/// Opens an overtime session for (employee, today).
///
/// The Active-row lookup runs FOR UPDATE inside a transaction, and the
/// (employee_id, date, active_flag) unique index catches any insert that
/// still races past it. Either path surfaces as Conflict.
pub async fn start_overtime(pool: &MySqlPool, employee_id: u64) -> Result<(), ApiError> {
    let now = Local::now().naive_local();
    let today = now.date();

    let mut tx = pool.begin().await?;

    let active: Option<u64> = sqlx::query_scalar(
        "SELECT id FROM overtime_sessions \
         WHERE employee_id = ? AND date = ? AND status = 'Active' FOR UPDATE",
    )
    .bind(employee_id)
    .bind(today)
    .fetch_optional(&mut *tx)
    .await?;

    if active.is_some() {
        return Err(ApiError::conflict("An overtime session is already active"));
    }

    let inserted = sqlx::query(
        "INSERT INTO overtime_sessions (employee_id, date, start_time, status) VALUES (?, ?, ?, ?)",
    )
    .bind(employee_id)
    .bind(today)
    .bind(now)
    .bind(SessionStatus::Active.to_string())
    .execute(&mut *tx)
    .await;

    match inserted {
        Ok(_) => {
            tx.commit().await?;
            Ok(())
        }
        Err(e) if is_duplicate_key(&e) => {
            Err(ApiError::conflict("An overtime session is already active"))
        }
        Err(e) => Err(e.into()),
    }
}

/// Completes today's Active session and folds its duration into the day's
/// attendance row, all in one transaction. Concurrent stops serialize on the
/// row lock; the loser finds no Active row and gets NotFound.
pub async fn stop_overtime(
    pool: &MySqlPool,
    employee_id: u64,
) -> Result<StoppedOvertime, ApiError> {
    let now = Local::now().naive_local();
    let today = now.date();

    let mut tx = pool.begin().await?;

    let active: Option<(u64, NaiveDateTime)> = sqlx::query_as(
        "SELECT id, start_time FROM overtime_sessions \
         WHERE employee_id = ? AND date = ? AND status = 'Active' FOR UPDATE",
    )
    .bind(employee_id)
    .bind(today)
    .fetch_optional(&mut *tx)
    .await?;

    let Some((session_id, start_time)) = active else {
        return Err(ApiError::not_found("No active overtime session found"));
    };

    let duration = session_hours(start_time, now);

    let completed = sqlx::query(
        "UPDATE overtime_sessions SET end_time = ?, duration = ?, status = ? \
         WHERE id = ? AND status = 'Active'",
    )
    .bind(now)
    .bind(duration)
    .bind(SessionStatus::Completed.to_string())
    .bind(session_id)
    .execute(&mut *tx)
    .await?;

    if completed.rows_affected() == 0 {
        return Err(ApiError::not_found("No active overtime session found"));
    }

    let current: Option<f64> = sqlx::query_scalar(
        "SELECT overtime_hours FROM attendance WHERE employee_id = ? AND date = ? FOR UPDATE",
    )
    .bind(employee_id)
    .bind(today)
    .fetch_optional(&mut *tx)
    .await?;

    let total = round2(current.unwrap_or(0.0) + duration);

    match current {
        Some(_) => {
            sqlx::query("UPDATE attendance SET overtime_hours = ? WHERE employee_id = ? AND date = ?")
                .bind(total)
                .bind(employee_id)
                .bind(today)
                .execute(&mut *tx)
                .await?;
        }
        // No attendance row yet today: keep the hours on a status-less row
        // (it still renders as "Not Marked") instead of dropping them.
        None => {
            sqlx::query(
                "INSERT INTO attendance (employee_id, date, overtime_hours) VALUES (?, ?, ?)",
            )
            .bind(employee_id)
            .bind(today)
            .bind(total)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;

    Ok(StoppedOvertime {
        overtime_hours: total,
    })
}

/// All of the employee's sessions, newest first.
pub async fn overtime_history(
    pool: &MySqlPool,
    employee_id: u64,
) -> Result<Vec<OvertimeSession>, ApiError> {
    let sessions = sqlx::query_as::<_, OvertimeSession>(
        "SELECT id, employee_id, date, start_time, end_time, duration, status, created_at \
         FROM overtime_sessions \
         WHERE employee_id = ? \
         ORDER BY date DESC, start_time DESC",
    )
    .bind(employee_id)
    .fetch_all(pool)
    .await?;

    Ok(sessions)
}

/// Elapsed time between two instants in fractional hours.
fn session_hours(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    (end - start).num_milliseconds() as f64 / 3_600_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn ninety_minutes_is_one_and_a_half_hours() {
        assert_eq!(session_hours(at(18, 0, 0), at(19, 30, 0)), 1.5);
    }

    #[test]
    fn sub_hour_sessions_are_fractional() {
        let h = session_hours(at(18, 0, 0), at(18, 6, 0));
        assert!((h - 0.1).abs() < 1e-9);
    }

    #[test]
    fn instant_stop_is_zero_hours() {
        assert_eq!(session_hours(at(18, 0, 0), at(18, 0, 0)), 0.0);
    }

    #[test]
    fn accumulated_total_is_rounded_to_cents_of_hours() {
        let duration = session_hours(at(18, 0, 0), at(19, 10, 0));
        assert_eq!(round2(1.25 + duration), 2.42);
    }
}
