use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, info, instrument};

use crate::{
    auth::{
        extractor::AuthEmployee,
        jwt::generate_token,
        password::{hash_password, verify_password},
    },
    config::Config,
    error::{ApiError, is_duplicate_key},
    model::employee::Employee,
    models::{EmployeeAuthRow, LoginReq, SignupReq},
    utils::{email_cache, email_filter},
};

const DUPLICATE_EMAIL_MSG: &str =
    "This email is already registered. Please use a different email or login.";

/// Same shape the signup form enforces: one '@', non-empty local part, a dot
/// somewhere inside the domain, no whitespace.
fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

fn validate_signup(req: &SignupReq) -> Result<(), ApiError> {
    if req.name.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::validation("All fields are required"));
    }

    if !is_valid_email(req.email.trim()) {
        return Err(ApiError::validation("Invalid email format"));
    }

    if req.password.len() < 6 {
        return Err(ApiError::validation(
            "Password must be at least 6 characters long",
        ));
    }

    if !req.base_salary.is_finite() || req.base_salary <= 0.0 {
        return Err(ApiError::validation("Invalid base salary"));
    }

    Ok(())
}

/// true  => email AVAILABLE
/// false => email TAKEN
pub async fn is_email_available(email: &str, pool: &MySqlPool) -> bool {
    let email = email.to_lowercase();

    // Cuckoo filter: fast negative. If it has never seen the email, no row
    // can exist.
    if !email_filter::might_exist(&email) {
        return true;
    }

    // Moka cache: fast positive.
    if email_cache::is_taken(&email).await {
        return false;
    }

    // Database fallback.
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM employees WHERE email = ? LIMIT 1)",
    )
    .bind(&email)
    .fetch_one(pool)
    .await
    .unwrap_or(true); // fail-safe

    !exists
}

/// Signup endpoint
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupReq,
    responses(
        (status = 201, description = "Account created", body = Object, example = json!({
            "message": "Signup successful! Please login with your credentials.",
            "userId": 1
        })),
        (status = 400, description = "Invalid signup payload"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn signup(
    payload: web::Json<SignupReq>,
    pool: web::Data<MySqlPool>,
) -> Result<impl Responder, ApiError> {
    validate_signup(&payload)?;

    let email = payload.email.trim().to_lowercase();

    if !is_email_available(&email, pool.get_ref()).await {
        return Err(ApiError::conflict(DUPLICATE_EMAIL_MSG));
    }

    let hashed = hash_password(&payload.password)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))?;

    let result = sqlx::query(
        "INSERT INTO employees (name, email, password, base_salary) VALUES (?, ?, ?, ?)",
    )
    .bind(payload.name.trim())
    .bind(&email)
    .bind(hashed)
    .bind(payload.base_salary)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(res) => {
            // Keep the fast path in sync with the new row.
            email_filter::insert(&email);
            email_cache::mark_taken(&email).await;

            Ok(HttpResponse::Created().json(json!({
                "message": "Signup successful! Please login with your credentials.",
                "userId": res.last_insert_id()
            })))
        }
        // Unique index caught a racing signup for the same address.
        Err(e) if is_duplicate_key(&e) => Err(ApiError::conflict(DUPLICATE_EMAIL_MSG)),
        Err(e) => Err(e.into()),
    }
}

/// Login endpoint
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Token issued", body = Object, example = json!({
            "token": "eyJhbGciOi...",
            "user": { "id": 1, "name": "John Doe", "email": "john.doe@company.com", "baseSalary": 3200.0 }
        })),
        (status = 400, description = "Missing or malformed credentials"),
        (status = 401, description = "Unknown email or wrong password"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip(pool, config, payload), fields(email = %payload.email))]
pub async fn login(
    payload: web::Json<LoginReq>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<impl Responder, ApiError> {
    info!("Login request received");

    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::validation("Email and password are required"));
    }

    if !is_valid_email(payload.email.trim()) {
        return Err(ApiError::validation("Invalid email format"));
    }

    debug!("Fetching employee from database");

    let employee = sqlx::query_as::<_, EmployeeAuthRow>(
        "SELECT id, name, email, password, base_salary FROM employees WHERE email = ?",
    )
    .bind(payload.email.trim().to_lowercase())
    .fetch_optional(pool.get_ref())
    .await?;

    let Some(employee) = employee else {
        info!("Invalid credentials: no account for email");
        return Err(ApiError::unauthorized(
            "No account found with this email. Please sign up first.",
        ));
    };

    debug!(employee_id = employee.id, "Verifying password");

    if verify_password(&payload.password, &employee.password).is_err() {
        info!("Invalid credentials: password mismatch");
        return Err(ApiError::unauthorized(
            "Incorrect password. Please try again.",
        ));
    }

    debug!("Password verified, issuing token");

    let token = generate_token(
        employee.id,
        employee.email.clone(),
        &config.jwt_secret,
        config.access_token_ttl,
    )
    .map_err(|e| ApiError::Internal(anyhow::anyhow!("Token generation failed: {e}")))?;

    info!("Login successful");

    Ok(HttpResponse::Ok().json(json!({
        "token": token,
        "user": {
            "id": employee.id,
            "name": employee.name,
            "email": employee.email,
            "baseSalary": employee.base_salary
        }
    })))
}

/// Token validation endpoint: returns the employee behind the bearer token.
#[utoipa::path(
    get,
    path = "/api/v1/auth/validate",
    responses(
        (status = 200, description = "Token is valid", body = Object, example = json!({
            "user": { "id": 1, "name": "John Doe", "email": "john.doe@company.com", "base_salary": 3200.0 }
        })),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Account no longer exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn validate(
    auth: AuthEmployee,
    pool: web::Data<MySqlPool>,
) -> Result<impl Responder, ApiError> {
    let user: Option<Employee> = sqlx::query_as(
        "SELECT id, name, email, base_salary, created_at FROM employees WHERE id = ?",
    )
    .bind(auth.employee_id)
    .fetch_optional(pool.get_ref())
    .await?;

    let Some(user) = user else {
        return Err(ApiError::not_found("User not found"));
    };

    Ok(HttpResponse::Ok().json(json!({ "user": user })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(name: &str, email: &str, password: &str, base_salary: f64) -> SignupReq {
        SignupReq {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            base_salary,
        }
    }

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("john.doe@company.com"));
        assert!(is_valid_email("a@b.co"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("@company.com"));
        assert!(!is_valid_email("john@company"));
        assert!(!is_valid_email("john doe@company.com"));
        assert!(!is_valid_email("john@@company.com"));
        assert!(!is_valid_email("john@.com"));
    }

    #[test]
    fn signup_requires_all_fields() {
        let err = validate_signup(&req("", "a@b.co", "secret123", 3200.0)).unwrap_err();
        assert_eq!(err.to_string(), "All fields are required");
    }

    #[test]
    fn signup_rejects_bad_email() {
        let err = validate_signup(&req("John", "not-an-email", "secret123", 3200.0)).unwrap_err();
        assert_eq!(err.to_string(), "Invalid email format");
    }

    #[test]
    fn signup_rejects_short_password() {
        let err = validate_signup(&req("John", "a@b.co", "five5", 3200.0)).unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 6 characters long");
    }

    #[test]
    fn signup_rejects_non_positive_salary() {
        for salary in [0.0, -1.0, f64::NAN] {
            let err = validate_signup(&req("John", "a@b.co", "secret123", salary)).unwrap_err();
            assert_eq!(err.to_string(), "Invalid base salary");
        }
    }

    #[test]
    fn signup_accepts_a_well_formed_request() {
        assert!(validate_signup(&req("John", "a@b.co", "secret123", 3200.0)).is_ok());
    }
}
