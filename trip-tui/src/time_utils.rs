use time::{Date, OffsetDateTime, UtcOffset};

/// Today's date in the local timezone, falling back to UTC when the offset
/// cannot be determined.
pub fn today() -> Date {
    let now = OffsetDateTime::now_utc();
    match UtcOffset::current_local_offset() {
        Ok(offset) => now.to_offset(offset).date(),
        Err(_) => now.date(),
    }
}
