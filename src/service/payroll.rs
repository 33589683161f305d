//! Salary math. Pure functions, no I/O; callers round only at the display
//! boundary.

/// Monthly divisor for the hourly rate. The business rule uses a flat
/// 160-hour month regardless of calendar length.
pub const MONTHLY_BASE_HOURS: f64 = 160.0;

/// Overtime premium over the base hourly rate.
pub const OVERTIME_MULTIPLIER: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryBreakdown {
    pub hourly_rate: f64,
    pub overtime_pay: f64,
    pub monthly_salary: f64,
}

/// Derives the monthly salary from the base salary and accumulated overtime
/// hours. Full floating precision; nothing here is persisted.
pub fn compute_salary(base_salary: f64, overtime_hours: f64) -> SalaryBreakdown {
    let hourly_rate = base_salary / MONTHLY_BASE_HOURS;
    let overtime_pay = overtime_hours * hourly_rate * OVERTIME_MULTIPLIER;

    SalaryBreakdown {
        hourly_rate,
        overtime_pay,
        monthly_salary: base_salary + overtime_pay,
    }
}

/// Rounds to 2 decimal places. Used when writing accumulated overtime back
/// to the attendance row.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 2-decimal display string for monetary and hour figures.
pub fn fixed2(value: f64) -> String {
    format!("{:.2}", value)
}
