mod budget;
mod destination;
mod event;
mod member;
mod trip;
mod user;
mod weather;

pub use budget::*;
pub use destination::*;
pub use event::*;
pub use member::*;
pub use trip::*;
pub use user::*;
pub use weather::*;

use time::{format_description::BorrowedFormatItem, macros::format_description, Date};

// Dates travel as plain ISO calendar dates ("2024-05-01").
time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parse a `YYYY-MM-DD` string, ignoring surrounding whitespace.
pub fn parse_iso_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), ISO_DATE).ok()
}

pub fn format_iso_date(date: Date) -> String {
    date.format(ISO_DATE).unwrap_or_else(|_| date.to_string())
}
