use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use sqlx::MySqlPool;

use crate::auth::extractor::AuthEmployee;
use crate::error::ApiError;
use crate::service;
use crate::service::payroll::fixed2;

/// Dashboard endpoint: today's status plus the derived monthly salary.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    responses(
        (status = 200, description = "Dashboard figures", body = Object, example = json!({
            "attendanceStatus": "Present",
            "baseSalary": "3200.00",
            "monthlySalary": "3500.00",
            "overtimeHours": "10.00"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn get_dashboard(
    auth: AuthEmployee,
    pool: web::Data<MySqlPool>,
) -> Result<impl Responder, ApiError> {
    let dashboard = service::profile::get_dashboard(pool.get_ref(), auth.employee_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "attendanceStatus": dashboard.attendance_status,
        "baseSalary": fixed2(dashboard.base_salary),
        "monthlySalary": fixed2(dashboard.monthly_salary),
        "overtimeHours": fixed2(dashboard.overtime_hours)
    })))
}
