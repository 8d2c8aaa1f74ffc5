/// All timestamps are UTC; local dates are derived only for display counts.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
