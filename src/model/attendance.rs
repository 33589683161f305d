use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Shown wherever an attendance row (or its status column) is missing.
pub const NOT_MARKED: &str = "Not Marked";

/// Status values accepted by the mark-attendance operation.
///
/// "Not Marked" is deliberately absent: it is the rendering of a missing
/// row/NULL column, never a value a client may submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

/// One row per employee per calendar day.
///
/// `status` is NULL for days that only accumulated overtime; `overtime_hours`
/// holds the day's completed overtime, rounded to 2 decimals on write.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct AttendanceRecord {
    pub id: u64,
    pub employee_id: u64,
    pub date: NaiveDate,
    pub status: Option<String>,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub overtime_hours: f64,
}
