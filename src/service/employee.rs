use sqlx::MySqlPool;

use crate::error::ApiError;

/// Deletes the employee and every record they own in one transaction:
/// overtime sessions, attendance rows, then the employee itself. Any failure
/// rolls the whole thing back and the account stays intact.
///
/// Returns the deleted account's email so callers can evict it from the
/// signup fast path.
pub async fn delete_employee_data(pool: &MySqlPool, employee_id: u64) -> Result<String, ApiError> {
    let mut tx = pool.begin().await?;

    let email: Option<String> = sqlx::query_scalar("SELECT email FROM employees WHERE id = ? FOR UPDATE")
        .bind(employee_id)
        .fetch_optional(&mut *tx)
        .await?;

    let Some(email) = email else {
        return Err(ApiError::not_found("Profile not found"));
    };

    sqlx::query("DELETE FROM overtime_sessions WHERE employee_id = ?")
        .bind(employee_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM attendance WHERE employee_id = ?")
        .bind(employee_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(employee_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(email)
}
