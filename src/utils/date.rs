//! Date encoding for range-query parameters.

use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// Format a timestamp as the carrier's non-delimited `YYYYMMDDHHmm`, in the timestamp's own
/// timezone.
pub fn format_date<Tz>(date: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    date.format("%Y%m%d%H%M").to_string()
}
