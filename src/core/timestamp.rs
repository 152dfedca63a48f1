//! Timestamp formats for the `time` field
//!
//! A logger renders each record's creation time with its configured
//! [`TimestampFormat`]. The numeric fields (`timestamp`, `rtime`, `created`,
//! `nsecs`) are always nanosecond based and do not depend on this setting.

use super::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Standardized timestamp format options
///
/// # Examples
///
/// ```
/// use rust_logger_fields::core::TimestampFormat;
/// use chrono::Utc;
///
/// let format = TimestampFormat::Iso8601;
/// let rendered = format.format(&Utc::now());
/// assert!(rendered.ends_with('Z'));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// RFC 3339 with nanoseconds: `2025-01-08T10:30:45.123456789Z`
    ///
    /// The default, so that `time` carries the same precision as `timestamp`.
    #[default]
    Rfc3339Nanos,

    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    Iso8601,

    /// ISO 8601 with microseconds: `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,

    /// RFC 3339 format: `2025-01-08T10:30:45+00:00`
    Rfc3339,

    /// Unix timestamp in seconds: `1736332245`
    Unix,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Unix timestamp in microseconds: `1736332245123456`
    UnixMicros,

    /// Custom strftime format
    ///
    /// ```
    /// use rust_logger_fields::core::TimestampFormat;
    ///
    /// // Apache log format
    /// let format = TimestampFormat::Custom("%d/%b/%Y:%H:%M:%S %z".to_string());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    /// Format a `DateTime<Utc>` according to this format
    ///
    /// A custom format that chrono cannot render falls back to
    /// [`TimestampFormat::Rfc3339Nanos`].
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Rfc3339Nanos => {
                datetime.format("%Y-%m-%dT%H:%M:%S%.9fZ").to_string()
            }
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Iso8601Micros => datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::UnixMicros => datetime.timestamp_micros().to_string(),
            TimestampFormat::Custom(format_str) => {
                let mut rendered = String::new();
                match write!(rendered, "{}", datetime.format(format_str)) {
                    Ok(()) => rendered,
                    Err(_) => TimestampFormat::Rfc3339Nanos.format(datetime),
                }
            }
        }
    }

    /// Check that a custom format string only uses known specifiers
    pub fn validate(&self) -> Result<()> {
        match self {
            TimestampFormat::Custom(format_str) => {
                if StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error)) {
                    return Err(LoggerError::config(
                        "TimestampFormat",
                        format!("invalid strftime format '{}'", format_str),
                    ));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// Nanoseconds since the Unix epoch.
///
/// Saturates at the `i64` range limits (years 1677 and 2262) instead of
/// failing, so time fields never abort an emission.
pub(crate) fn unix_nanos(datetime: &DateTime<Utc>) -> i64 {
    datetime.timestamp_nanos_opt().unwrap_or(if datetime.timestamp() < 0 {
        i64::MIN
    } else {
        i64::MAX
    })
}
