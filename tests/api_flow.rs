//! End-to-end flows against a real MySQL instance.
//!
//! These tests need `DATABASE_URL` pointing at a database with `schema.sql`
//! applied, so they are ignored by default:
//!
//!     cargo test -- --ignored
//!
//! Each test signs up a fresh employee (unique email) and deletes the account
//! at the end, so reruns leave no residue.

use actix_http::Request;
use actix_web::{
    App,
    body::MessageBody,
    dev::{Service, ServiceResponse},
    test,
    web::Data,
};
use serde_json::{Value, json};
use sqlx::MySqlPool;
use uuid::Uuid;

use attendpay::{config::Config, routes};

fn test_config(database_url: String) -> Config {
    Config {
        database_url,
        jwt_secret: "integration-test-secret".into(),
        server_addr: "127.0.0.1:0".into(),
        access_token_ttl: 3600,
        rate_login_per_min: 10_000,
        rate_signup_per_min: 10_000,
        rate_protected_per_min: 10_000,
        api_prefix: "/api/v1".into(),
    }
}

async fn spawn_app() -> (
    impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    MySqlPool,
) {
    dotenvy::dotenv().ok();
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

    let pool = MySqlPool::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    let config = test_config(database_url);
    let config_for_routes = config.clone();

    let app = test::init_service(
        App::new()
            .app_data(Data::new(pool.clone()))
            .app_data(Data::new(config))
            .configure(move |cfg| routes::configure(cfg, config_for_routes.clone())),
    )
    .await;

    (app, pool)
}

fn peer() -> std::net::SocketAddr {
    "127.0.0.1:9000".parse().unwrap()
}

async fn signup_and_login<S, B>(app: &S) -> (String, u64, String)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let email = format!("it-{}@example.com", Uuid::new_v4());

    let req = test::TestRequest::post()
        .uri("/auth/signup")
        .peer_addr(peer())
        .set_json(json!({
            "name": "Integration Tester",
            "email": email,
            "password": "secret123",
            "baseSalary": 3200.0
        }))
        .to_request();
    let resp: Value = test::call_and_read_body_json(app, req).await;
    let user_id = resp["userId"].as_u64().expect("signup returns userId");

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .peer_addr(peer())
        .set_json(json!({ "email": email, "password": "secret123" }))
        .to_request();
    let resp: Value = test::call_and_read_body_json(app, req).await;
    let token = resp["token"].as_str().expect("login returns token").to_string();

    (token, user_id, email)
}

fn authed(method: test::TestRequest, token: &str) -> test::TestRequest {
    method
        .peer_addr(peer())
        .insert_header(("Authorization", format!("Bearer {token}")))
}

async fn delete_account<S, B>(app: &S, token: &str)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = authed(test::TestRequest::delete().uri("/api/v1/account"), token).to_request();
    let resp = test::call_service(app, req).await;
    assert!(resp.status().is_success());
}

#[actix_web::test]
#[ignore = "integration: requires DATABASE_URL and schema.sql applied"]
async fn marking_twice_keeps_one_row_with_latest_status() {
    let (app, pool) = spawn_app().await;
    let (token, user_id, _) = signup_and_login(&app).await;

    for status in ["Present", "Late"] {
        let req = authed(test::TestRequest::post().uri("/api/v1/attendance"), &token)
            .set_json(json!({ "status": status }))
            .to_request();
        let resp: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp["status"], status);
    }

    let (rows, status): (i64, Option<String>) = sqlx::query_as(
        "SELECT COUNT(*), MAX(status) FROM attendance WHERE employee_id = ? AND date = CURDATE()",
    )
    .bind(user_id)
    .fetch_one(&pool)
    .await
    .unwrap();

    assert_eq!(rows, 1);
    assert_eq!(status.as_deref(), Some("Late"));

    let req = authed(
        test::TestRequest::get().uri("/api/v1/attendance/visibility"),
        &token,
    )
    .to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp["isMarked"], true);

    delete_account(&app, &token).await;
}

#[actix_web::test]
#[ignore = "integration: requires DATABASE_URL and schema.sql applied"]
async fn invalid_attendance_status_is_rejected() {
    let (app, _pool) = spawn_app().await;
    let (token, _, _) = signup_and_login(&app).await;

    let req = authed(test::TestRequest::post().uri("/api/v1/attendance"), &token)
        .set_json(json!({ "status": "Vacationing" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    delete_account(&app, &token).await;
}

#[actix_web::test]
#[ignore = "integration: requires DATABASE_URL and schema.sql applied"]
async fn overtime_session_state_machine() {
    let (app, _pool) = spawn_app().await;
    let (token, _, _) = signup_and_login(&app).await;

    // Stop with nothing active.
    let req = authed(test::TestRequest::post().uri("/api/v1/overtime/stop"), &token).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    // Start.
    let req = authed(test::TestRequest::post().uri("/api/v1/overtime/start"), &token).to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    // Second start conflicts.
    let req = authed(test::TestRequest::post().uri("/api/v1/overtime/start"), &token).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);

    // Stop completes and reports the day's total.
    let req = authed(test::TestRequest::post().uri("/api/v1/overtime/stop"), &token).to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;
    let hours: f64 = resp["overtimeHours"].as_str().unwrap().parse().unwrap();
    assert!(hours >= 0.0);

    // Stopping again finds nothing active.
    let req = authed(test::TestRequest::post().uri("/api/v1/overtime/stop"), &token).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    // The completed session shows up in history.
    let req = authed(test::TestRequest::get().uri("/api/v1/overtime/history"), &token).to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;
    let history = resp["history"].as_array().unwrap();
    assert!(!history.is_empty());
    assert_eq!(history[0]["status"], "Completed");

    delete_account(&app, &token).await;
}

#[actix_web::test]
#[ignore = "integration: requires DATABASE_URL and schema.sql applied"]
async fn dashboard_and_profile_report_derived_salary() {
    let (app, _pool) = spawn_app().await;
    let (token, _, email) = signup_and_login(&app).await;

    let req = authed(test::TestRequest::get().uri("/api/v1/dashboard"), &token).to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp["baseSalary"], "3200.00");
    // No overtime yet: monthly == base.
    assert_eq!(resp["monthlySalary"], "3200.00");
    assert_eq!(resp["attendanceStatus"], "Not Marked");

    let req = authed(test::TestRequest::get().uri("/api/v1/profile"), &token).to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;
    let profile = &resp["profile"];
    assert_eq!(profile["email"], email);
    assert_eq!(profile["base_salary"], "3200.00");

    let history = profile["attendance"]["recent_history"].as_array().unwrap();
    assert!(history.len() <= 5);
    let dates: Vec<&str> = history.iter().map(|r| r["date"].as_str().unwrap()).collect();
    let mut sorted = dates.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(dates, sorted, "recent history must be date-descending");

    delete_account(&app, &token).await;
}

#[actix_web::test]
#[ignore = "integration: requires DATABASE_URL and schema.sql applied"]
async fn duplicate_signup_conflicts() {
    let (app, _pool) = spawn_app().await;
    let (token, _, email) = signup_and_login(&app).await;

    let req = test::TestRequest::post()
        .uri("/auth/signup")
        .peer_addr(peer())
        .set_json(json!({
            "name": "Copycat",
            "email": email,
            "password": "secret123",
            "baseSalary": 1000.0
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);

    delete_account(&app, &token).await;
}

#[actix_web::test]
#[ignore = "integration: requires DATABASE_URL and schema.sql applied"]
async fn deletion_cascades_and_profile_disappears() {
    let (app, pool) = spawn_app().await;
    let (token, user_id, _) = signup_and_login(&app).await;

    // Leave some records behind.
    let req = authed(test::TestRequest::post().uri("/api/v1/attendance"), &token)
        .set_json(json!({ "status": "Present" }))
        .to_request();
    test::call_service(&app, req).await;
    let req = authed(test::TestRequest::post().uri("/api/v1/overtime/start"), &token).to_request();
    test::call_service(&app, req).await;
    let req = authed(test::TestRequest::post().uri("/api/v1/overtime/stop"), &token).to_request();
    test::call_service(&app, req).await;

    delete_account(&app, &token).await;

    for table in ["attendance", "overtime_sessions"] {
        let count: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE employee_id = ?"))
                .bind(user_id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(count, 0, "{table} rows must be gone");
    }

    // The token is still cryptographically valid but the profile is gone.
    let req = authed(test::TestRequest::get().uri("/api/v1/profile"), &token).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}
