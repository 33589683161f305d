use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::auth::extractor::AuthEmployee;
use crate::error::ApiError;
use crate::service;

#[derive(Deserialize, ToSchema)]
pub struct MarkAttendanceReq {
    /// One of Present, Absent, Late.
    #[schema(example = "Present")]
    pub status: String,
}

/// Mark attendance endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance",
    request_body = MarkAttendanceReq,
    responses(
        (status = 200, description = "Attendance marked", body = Object, example = json!({
            "message": "Attendance marked successfully",
            "status": "Present",
            "checkIn": "09:02:17",
            "date": "2026-01-05"
        })),
        (status = 400, description = "Invalid attendance status"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    auth: AuthEmployee,
    pool: web::Data<MySqlPool>,
    payload: web::Json<MarkAttendanceReq>,
) -> Result<impl Responder, ApiError> {
    let marked =
        service::attendance::mark_attendance(pool.get_ref(), auth.employee_id, &payload.status)
            .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Attendance marked successfully",
        "status": marked.status,
        "checkIn": marked.check_in.format("%H:%M:%S").to_string(),
        "date": marked.date.to_string()
    })))
}

/// Attendance visibility endpoint: has today already been marked?
#[utoipa::path(
    get,
    path = "/api/v1/attendance/visibility",
    responses(
        (status = 200, description = "Marked state for today", body = Object, example = json!({
            "isMarked": true
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn attendance_visibility(
    auth: AuthEmployee,
    pool: web::Data<MySqlPool>,
) -> Result<impl Responder, ApiError> {
    let marked = service::attendance::attendance_visibility(pool.get_ref(), auth.employee_id).await?;

    Ok(HttpResponse::Ok().json(json!({ "isMarked": marked })))
}
