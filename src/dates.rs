//! Calendar-day parsing and formatting (`YYYY-MM-DD`). Planning and diary
//! entries are keyed by day; time-of-day is never stored.

use time::{format_description::FormatItem, macros::format_description, Date, OffsetDateTime};

pub const DAY_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub fn parse_day(s: &str) -> Option<Date> {
    Date::parse(s, DAY_FORMAT).ok()
}

pub fn format_day(date: Date) -> String {
    // The format has no invalid components for a valid Date.
    date.format(DAY_FORMAT).expect("format calendar day")
}

pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn parses_and_formats_iso_days() {
        let day = parse_day("2025-03-09").unwrap();
        assert_eq!(day, date!(2025 - 03 - 09));
        assert_eq!(format_day(day), "2025-03-09");
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_day("not-a-date"), None);
        assert_eq!(parse_day("2025-13-40"), None);
        assert_eq!(parse_day(""), None);
    }
}
