use chrono::{DateTime, Utc};

/// Timestamp layout used in audit fields, e.g. `2024-05-01T13:45:00 +0000`
pub const GMT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S %z";

/// Current time in GMT
#[must_use]
pub fn gmt_timestamp() -> String {
    format_gmt(Utc::now())
}

#[must_use]
pub fn format_gmt(instant: DateTime<Utc>) -> String {
    instant.format(GMT_TIMESTAMP_FORMAT).to_string()
}
