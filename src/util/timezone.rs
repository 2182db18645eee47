use chrono::{DateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use time::{Date, OffsetDateTime, UtcOffset};

/// Offset that `tz` observes at the given instant, falling back to UTC when
/// the instant cannot be represented on the chrono side.
pub fn offset_at(time: OffsetDateTime, tz: Tz) -> UtcOffset {
    DateTime::<Utc>::from_timestamp(time.unix_timestamp(), 0)
        .map(|utc| tz.offset_from_utc_datetime(&utc.naive_utc()).fix().local_minus_utc())
        .and_then(|seconds| UtcOffset::from_whole_seconds(seconds).ok())
        .unwrap_or(UtcOffset::UTC)
}

/// Calendar date in `tz`; the UTC date when the local date is out of range.
pub fn localized_date(time: OffsetDateTime, tz: Tz) -> Date {
    time.checked_to_offset(offset_at(time, tz))
        .unwrap_or(time)
        .date()
}
