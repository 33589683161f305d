use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use sqlx::MySqlPool;

use crate::auth::extractor::AuthEmployee;
use crate::error::ApiError;
use crate::service;
use crate::service::payroll::fixed2;

/// Start overtime endpoint
#[utoipa::path(
    post,
    path = "/api/v1/overtime/start",
    responses(
        (status = 200, description = "Session opened", body = Object, example = json!({
            "message": "Overtime started successfully"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "An overtime session is already active"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Overtime"
)]
pub async fn start_overtime(
    auth: AuthEmployee,
    pool: web::Data<MySqlPool>,
) -> Result<impl Responder, ApiError> {
    service::overtime::start_overtime(pool.get_ref(), auth.employee_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Overtime started successfully"
    })))
}

/// Stop overtime endpoint
#[utoipa::path(
    post,
    path = "/api/v1/overtime/stop",
    responses(
        (status = 200, description = "Session completed", body = Object, example = json!({
            "message": "Overtime stopped successfully",
            "overtimeHours": "1.50"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No active overtime session found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Overtime"
)]
pub async fn stop_overtime(
    auth: AuthEmployee,
    pool: web::Data<MySqlPool>,
) -> Result<impl Responder, ApiError> {
    let stopped = service::overtime::stop_overtime(pool.get_ref(), auth.employee_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Overtime stopped successfully",
        "overtimeHours": fixed2(stopped.overtime_hours)
    })))
}

/// Overtime history endpoint
#[utoipa::path(
    get,
    path = "/api/v1/overtime/history",
    responses(
        (status = 200, description = "All sessions, newest first", body = Object, example = json!({
            "history": [{
                "id": 7,
                "date": "2026-01-05",
                "start_time": "18:00:00",
                "end_time": "19:30:00",
                "duration": "1.50",
                "status": "Completed",
                "created_at": "2026-01-05T18:00:00Z"
            }]
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Overtime"
)]
pub async fn overtime_history(
    auth: AuthEmployee,
    pool: web::Data<MySqlPool>,
) -> Result<impl Responder, ApiError> {
    let sessions = service::overtime::overtime_history(pool.get_ref(), auth.employee_id).await?;

    let history: Vec<_> = sessions
        .iter()
        .map(|s| {
            json!({
                "id": s.id,
                "date": s.date.to_string(),
                "start_time": s.start_time.format("%H:%M:%S").to_string(),
                "end_time": s.end_time.map(|t| t.format("%H:%M:%S").to_string()),
                "duration": fixed2(s.duration.unwrap_or(0.0)),
                "status": s.status.clone(),
                "created_at": s.created_at
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(json!({ "history": history })))
}
