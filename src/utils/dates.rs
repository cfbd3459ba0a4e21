use chrono::{Local, NaiveDate, NaiveTime};

/// Server-local calendar day.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Accepts `HH:MM` (what a time input submits) and `HH:MM:SS`.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

/// First and last day of a calendar month, or None for an impossible month.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next_first.pred_opt()?))
}

/// Outcome of reading a `start_date`/`end_date` pair from a query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    /// Both bounds inclusive.
    Between(NaiveDate, NaiveDate),
    /// A bound did not parse; the query matches nothing.
    Invalid,
}

/// Either bound missing or blank means "today only".
pub fn resolve_range(start: Option<&str>, end: Option<&str>, today: NaiveDate) -> DateRange {
    let start = start.map(str::trim).filter(|s| !s.is_empty());
    let end = end.map(str::trim).filter(|s| !s.is_empty());

    match (start, end) {
        (Some(start), Some(end)) => match (parse_date(start), parse_date(end)) {
            (Some(start), Some(end)) => DateRange::Between(start, end),
            _ => DateRange::Invalid,
        },
        _ => DateRange::Between(today, today),
    }
}
