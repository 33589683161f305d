use crate::api::attendance::MarkAttendanceReq;
use crate::model::employee::Employee;
use crate::models::{LoginReq, SignupReq};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance & Payroll API",
        version = "1.0.0",
        description = r#"
## Employee Attendance & Payroll Service

Self-service API for employees to track attendance and overtime and to view
a payroll profile computed on demand.

### 🔹 Key Features
- **Accounts**
  - Signup, login, token validation, account deletion
- **Attendance**
  - Daily status marking (Present / Absent / Late) with check-in time
- **Overtime**
  - Start/stop timed sessions, accumulated into the day's attendance record
- **Payroll**
  - Monthly salary derived from base salary and month-to-date overtime

### 🔐 Security
All endpoints under the API prefix require **JWT Bearer authentication**.
Tokens are issued at login and expire after 24 hours.

### 📦 Response Format
- JSON-based RESTful responses
- Monetary and hour figures are returned as 2-decimal strings

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::signup,
        crate::auth::handlers::login,
        crate::auth::handlers::validate,

        crate::api::attendance::mark_attendance,
        crate::api::attendance::attendance_visibility,

        crate::api::overtime::start_overtime,
        crate::api::overtime::stop_overtime,
        crate::api::overtime::overtime_history,

        crate::api::dashboard::get_dashboard,

        crate::api::profile::get_profile,
        crate::api::profile::delete_account
    ),
    components(
        schemas(
            SignupReq,
            LoginReq,
            MarkAttendanceReq,
            Employee
        )
    ),
    tags(
        (name = "Auth", description = "Signup, login and token validation"),
        (name = "Attendance", description = "Daily attendance marking"),
        (name = "Overtime", description = "Overtime session tracking"),
        (name = "Dashboard", description = "Daily summary with derived salary"),
        (name = "Profile", description = "Aggregated profile and account lifecycle"),
    )
)]
pub struct ApiDoc;
