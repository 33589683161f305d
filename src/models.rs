use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct SignupReq {
    #[schema(example = "John Doe")]
    pub name: String,

    #[schema(example = "john.doe@company.com", format = "email", value_type = String)]
    pub email: String,

    #[schema(example = "secret123")]
    pub password: String,

    #[serde(rename = "baseSalary")]
    #[schema(example = 3200.0)]
    pub base_salary: f64,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginReq {
    #[schema(example = "john.doe@company.com", format = "email", value_type = String)]
    pub email: String,

    #[schema(example = "secret123")]
    pub password: String,
}

/// Employee row as fetched for credential checks. The only place the
/// password hash leaves the database.
#[derive(FromRow)]
pub struct EmployeeAuthRow {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub base_salary: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub employee_id: u64,
    /// Employee email address.
    pub sub: String,
    pub exp: usize,
    pub jti: String,
}
