use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Lifecycle of an overtime session: NoSession -> Active -> Completed.
/// NoSession is the absence of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum SessionStatus {
    Active,
    Completed,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct OvertimeSession {
    pub id: u64,
    pub employee_id: u64,
    pub date: NaiveDate,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    /// Fractional hours, set when the session completes.
    pub duration: Option<f64>,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
}
