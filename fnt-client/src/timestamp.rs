//! Compact server timestamps: `YYYYMMDDhhmm[ss[fff]]`, always UTC.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::TimestampError;

const MIN_LEN: usize = 12;
const MAX_LEN: usize = 17;

/// Decodes a server timestamp into a UTC instant.
///
/// Seconds and milliseconds are optional and default to zero. Second 60 is
/// read as a leap second. A partial seconds field (13 characters) is
/// rejected, as is any other component outside its calendar range.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, TimestampError> {
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimestampError::NonNumeric(value.to_string()));
    }

    let len = value.len();
    if !(MIN_LEN..=MAX_LEN).contains(&len) || len == MIN_LEN + 1 {
        return Err(TimestampError::Length(len));
    }

    let out_of_range = || TimestampError::OutOfRange(value.to_string());
    let field = |start: usize, end: usize| -> u32 {
        let end = end.min(len);
        if start >= end {
            return 0;
        }
        // All bytes are ASCII digits and at most four of them, so this cannot overflow.
        value[start..end]
            .bytes()
            .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
    };

    let year = field(0, 4) as i32;
    let month = field(4, 6);
    let day = field(6, 8);
    let hour = field(8, 10);
    let minute = field(10, 12);
    let second = field(12, 14);
    let milli = field(14, 17);

    // chrono encodes a leap second as second 59 with the millisecond past 1000.
    let (second, milli) = if second == 60 {
        (59, 1000 + milli)
    } else {
        (second, milli)
    };

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_milli_opt(hour, minute, second, milli))
        .map(|naive| naive.and_utc())
        .ok_or_else(out_of_range)
}

/// Renders an instant in the full 17-character server form.
pub fn format_timestamp(instant: &DateTime<Utc>) -> String {
    instant.format("%Y%m%d%H%M%S%3f").to_string()
}
