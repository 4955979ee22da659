//! Date parsing and bucket labels.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};

use crate::domain::{Period, WeekStart};

/// Parse a record's date string as a calendar date.
///
/// Accepts the ISO-8601 forms a spreadsheet export is likely to carry:
///
/// - calendar dates, extended or basic (`2025-07-01`, `20250701`)
/// - ordinal dates (`2025-182`, `2025182`) and week dates (`2025-W27-2`, `2025-W27`)
/// - any of the above followed by `T` or a space and a time of hour, minute or
///   second precision, optionally ending in `Z` or a `±hh[:mm]` offset
/// - `YYYY-MM` (first of the month) and `YYYY` (1 January)
///
/// The date is taken as written; offsets are validated but never shift it.
/// Impossible calendar dates yield `None`.
pub fn parse_record_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(d) = parse_date_part(s) {
        return Some(d);
    }

    // Reduced precision forms: "2025-07" and "2025".
    let bytes = s.as_bytes();
    if s.len() == 7 && bytes[4] == b'-' && bytes.iter().filter(|b| b.is_ascii_digit()).count() == 6 {
        return NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").ok();
    }
    if s.len() == 4 && bytes.iter().all(u8::is_ascii_digit) {
        return NaiveDate::from_ymd_opt(s.parse().ok()?, 1, 1);
    }

    let (date, time) = s.split_once(|c| c == 'T' || c == ' ')?;
    let date = parse_date_part(date)?;
    is_valid_time(time).then_some(date)
}

// (length, format) pairs; the length pins zero-padded widths.
const DATE_FORMS: [(usize, &str); 6] = [
    (10, "%Y-%m-%d"),
    (8, "%Y%m%d"),
    (8, "%Y-%j"),
    (7, "%Y%j"),
    (10, "%G-W%V-%u"),
    (8, "%GW%V%u"),
];

fn parse_date_part(s: &str) -> Option<NaiveDate> {
    let found = DATE_FORMS
        .iter()
        .filter(|(len, _)| *len == s.len())
        .find_map(|(_, fmt)| NaiveDate::parse_from_str(s, fmt).ok());
    if found.is_some() {
        return found;
    }

    // Week without a weekday means its Monday.
    match (s.len(), s.as_bytes().get(4), s.as_bytes().get(5)) {
        (8, Some(b'-'), Some(b'W')) => NaiveDate::parse_from_str(&format!("{s}-1"), "%G-W%V-%u").ok(),
        (7, Some(b'W'), _) => NaiveDate::parse_from_str(&format!("{s}1"), "%GW%V%u").ok(),
        _ => None,
    }
}

fn is_valid_time(time: &str) -> bool {
    const TIME_FORMS: [&str; 4] = ["%H:%M:%S%.f", "%H:%M", "%H%M%S%.f", "%H%M"];

    let Some(clock) = strip_offset(time) else {
        return false;
    };
    if clock.len() == 2 && clock.bytes().all(|b| b.is_ascii_digit()) {
        return clock.parse::<u32>().is_ok_and(|h| h <= 23);
    }
    TIME_FORMS
        .iter()
        .any(|fmt| NaiveTime::parse_from_str(clock, fmt).is_ok())
}

/// Clock part of `time` with any `Z` / `±hh` / `±hhmm` / `±hh:mm` suffix removed.
/// `None` when the suffix is malformed.
fn strip_offset(time: &str) -> Option<&str> {
    if let Some(clock) = time.strip_suffix(|c| c == 'Z' || c == 'z') {
        return Some(clock);
    }
    let Some(idx) = time.rfind(|c| c == '+' || c == '-') else {
        return Some(time);
    };

    let offset = time[idx + 1..].as_bytes();
    let digits = |r: std::ops::Range<usize>| offset[r].iter().all(u8::is_ascii_digit);
    let well_formed = match offset.len() {
        2 | 4 => digits(0..offset.len()),
        5 => offset[2] == b':' && digits(0..2) && digits(3..5),
        _ => false,
    };
    well_formed.then(|| &time[..idx])
}

/// First day of the week containing `date`.
pub fn week_start_of(date: NaiveDate, week_start: WeekStart) -> NaiveDate {
    let offset = match week_start {
        WeekStart::Monday => date.weekday().num_days_from_monday(),
        WeekStart::Sunday => date.weekday().num_days_from_sunday(),
    };
    date - Duration::days(i64::from(offset))
}

/// Bucket label for `date` at the given resolution.
pub fn period_label(date: NaiveDate, period: Period, week_start: WeekStart) -> String {
    match period {
        Period::Daily => date.format("%Y-%m-%d").to_string(),
        Period::Weekly => {
            let start = week_start_of(date, week_start);
            let end = start + Duration::days(6);
            format!("{} - {}", start.format("%b %d"), end.format("%b %d, %Y"))
        }
        Period::Monthly => date.format("%Y-%m").to_string(),
        Period::Yearly => date.format("%Y").to_string(),
    }
}
