use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveTime;
use serde_json::json;
use sqlx::MySqlPool;

use crate::auth::extractor::AuthEmployee;
use crate::error::ApiError;
use crate::model::attendance::NOT_MARKED;
use crate::service;
use crate::service::payroll::fixed2;
use crate::utils::{email_cache, email_filter};

fn fmt_time(t: Option<NaiveTime>) -> Option<String> {
    t.map(|t| t.format("%H:%M:%S").to_string())
}

/// Profile endpoint: identity, month stats, today's record, recent history
/// and the derived payroll figures.
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    responses(
        (status = 200, description = "Aggregated profile", body = Object, example = json!({
            "profile": {
                "id": 1,
                "name": "John Doe",
                "email": "john.doe@company.com",
                "created_at": "2026-01-01",
                "base_salary": "3200.00",
                "monthly_salary": "3500.00",
                "overtime_pay": "300.00",
                "attendance": {
                    "present_days": 14,
                    "absent_days": 1,
                    "total_overtime": "10.00",
                    "total_days": 16,
                    "today_status": "Present",
                    "today_check_in": "09:02:17",
                    "today_check_out": null,
                    "recent_history": []
                }
            }
        })),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Profile not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn get_profile(
    auth: AuthEmployee,
    pool: web::Data<MySqlPool>,
) -> Result<impl Responder, ApiError> {
    let view = service::profile::get_profile(pool.get_ref(), auth.employee_id).await?;

    let recent_history: Vec<_> = view
        .recent_history
        .iter()
        .map(|r| {
            json!({
                "date": r.date.to_string(),
                "status": r.status.clone().unwrap_or_else(|| NOT_MARKED.to_string()),
                "check_in": fmt_time(r.check_in),
                "check_out": fmt_time(r.check_out),
                "overtime": fixed2(r.overtime_hours)
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "profile": {
            "id": view.employee.id,
            "name": view.employee.name,
            "email": view.employee.email,
            "created_at": view.employee.created_at.map(|t| t.format("%Y-%m-%d").to_string()),
            "base_salary": fixed2(view.employee.base_salary),
            "monthly_salary": fixed2(view.salary.monthly_salary),
            "overtime_pay": fixed2(view.salary.overtime_pay),
            "attendance": {
                "present_days": view.stats.present_days,
                "absent_days": view.stats.absent_days,
                "total_overtime": fixed2(view.stats.total_overtime),
                "total_days": view.stats.total_days,
                "today_status": view.today.status.unwrap_or_else(|| NOT_MARKED.to_string()),
                "today_check_in": fmt_time(view.today.check_in),
                "today_check_out": fmt_time(view.today.check_out),
                "recent_history": recent_history
            }
        }
    })))
}

/// Delete account endpoint: removes the employee and all owned records.
#[utoipa::path(
    delete,
    path = "/api/v1/account",
    responses(
        (status = 200, description = "Account deleted", body = Object, example = json!({
            "message": "Employee account deleted successfully"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Profile not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn delete_account(
    auth: AuthEmployee,
    pool: web::Data<MySqlPool>,
) -> Result<impl Responder, ApiError> {
    let email = service::employee::delete_employee_data(pool.get_ref(), auth.employee_id).await?;

    // The address is free again.
    email_filter::remove(&email);
    email_cache::forget(&email).await;

    tracing::info!(employee_id = auth.employee_id, "Employee account deleted");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee account deleted successfully"
    })))
}
