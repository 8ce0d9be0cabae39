use chrono::{Datelike, Duration, Local, NaiveDate, TimeZone};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Regional format used for every date label shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    PtBr,
    EnUs,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "pt-br" | "pt" => Ok(Locale::PtBr),
            "en-us" | "en" => Ok(Locale::EnUs),
            other => Err(format!("Unsupported locale: {}", other)),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::PtBr => write!(f, "pt-BR"),
            Locale::EnUs => write!(f, "en-US"),
        }
    }
}

const MONTHS_PT: [&str; 12] = [
    "jan.", "fev.", "mar.", "abr.", "mai.", "jun.",
    "jul.", "ago.", "set.", "out.", "nov.", "dez.",
];

const MONTHS_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun",
    "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("expected YYYY-MM-DD")]
    Format,
    #[error("no such calendar date")]
    OutOfRange,
}

// Indexed from Sunday, like the grid header labels.
const WEEKDAYS_PT: [&str; 7] = ["Dom", "Seg", "Ter", "Qua", "Qui", "Sex", "Sáb"];
const WEEKDAYS_EN: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Return the Monday-to-Sunday interval containing `base`
pub fn week_interval(base: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = base.weekday().num_days_from_monday() as i64;
    let start = add_days(base, -offset);
    let end = add_days(start, 6);
    (start, end)
}

/// Shift a date by `days` (negative values go back in time).
/// Saturates at the limits of the calendar instead of overflowing.
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    let shifted = Duration::try_days(days).and_then(|delta| date.checked_add_signed(delta));
    match shifted {
        Some(shifted) => shifted,
        None if days < 0 => NaiveDate::MIN,
        None => NaiveDate::MAX,
    }
}

/// Zero-padded `YYYY-MM-DD`
pub fn to_ymd(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a zero-padded `YYYY-MM-DD` string. Signed or wider years and
/// unpadded fields are rejected.
pub fn parse_ymd(s: &str) -> Result<NaiveDate, DateError> {
    let s = s.trim();
    let bytes = s.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(DateError::Format);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| DateError::OutOfRange)
}

/// Today's date in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Abbreviated month name of `date`
pub fn month_abbrev(date: NaiveDate, locale: Locale) -> &'static str {
    let idx = date.month0() as usize;
    match locale {
        Locale::PtBr => MONTHS_PT[idx],
        Locale::EnUs => MONTHS_EN[idx],
    }
}

/// Short weekday name used in the grid header (`Seg`, `Ter`, ...)
pub fn weekday_label(date: NaiveDate, locale: Locale) -> &'static str {
    let idx = date.weekday().num_days_from_sunday() as usize;
    match locale {
        Locale::PtBr => WEEKDAYS_PT[idx],
        Locale::EnUs => WEEKDAYS_EN[idx],
    }
}

/// Week header label, e.g. `11–17 mar. 2024`.
///
/// Uses the start date's month and the end date's year, so a week crossing
/// a year boundary reads `30–05 dez. 2025`.
pub fn format_week_label(start: NaiveDate, end: NaiveDate, locale: Locale) -> String {
    format!(
        "{:02}–{:02} {} {}",
        start.day(),
        end.day(),
        month_abbrev(start, locale),
        end.year()
    )
}

/// Day and month, `DD/MM` (pt-BR) or `MM/DD` (en-US)
pub fn format_day_month(date: NaiveDate, locale: Locale) -> String {
    match locale {
        Locale::PtBr => date.format("%d/%m").to_string(),
        Locale::EnUs => date.format("%m/%d").to_string(),
    }
}

/// Task card subtitle date, e.g. `qui., 14/03`
pub fn format_task_date(date: NaiveDate, locale: Locale) -> String {
    let weekday = weekday_label(date, locale);
    match locale {
        Locale::PtBr => format!("{}., {}", weekday.to_lowercase(), format_day_month(date, locale)),
        Locale::EnUs => format!("{}, {}", weekday, format_day_month(date, locale)),
    }
}

/// Short date and time for an epoch-millisecond timestamp in local time.
/// Returns an empty string for timestamps chrono cannot represent.
pub fn format_timestamp(millis: i64, locale: Locale) -> String {
    let Some(dt) = Local.timestamp_millis_opt(millis).single() else {
        return String::new();
    };
    match locale {
        Locale::PtBr => dt.format("%d/%m/%Y, %H:%M").to_string(),
        Locale::EnUs => dt.format("%-m/%-d/%y, %-I:%M %p").to_string(),
    }
}

/// Current time as epoch milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_interval_of_thursday() {
        let (start, end) = week_interval(ymd(2024, 3, 14));
        assert_eq!(start, ymd(2024, 3, 11));
        assert_eq!(end, ymd(2024, 3, 17));
    }

    #[test]
    fn sunday_belongs_to_previous_monday() {
        let (start, end) = week_interval(ymd(2024, 3, 17));
        assert_eq!(start, ymd(2024, 3, 11));
        assert_eq!(end, ymd(2024, 3, 17));
    }

    #[test]
    fn week_interval_is_always_monday_to_sunday() {
        let mut day = ymd(2023, 12, 20);
        for _ in 0..60 {
            let (start, end) = week_interval(day);
            assert_eq!(start.weekday(), Weekday::Mon);
            assert_eq!(end.weekday(), Weekday::Sun);
            assert_eq!(end, add_days(start, 6));
            assert!(start <= day && day <= end);
            day = add_days(day, 1);
        }
    }

    #[test]
    fn to_ymd_zero_pads() {
        assert_eq!(to_ymd(ymd(2024, 1, 5)), "2024-01-05");
    }

    #[test]
    fn add_days_leaves_input_untouched() {
        let base = ymd(2024, 2, 28);
        let next = add_days(base, 2);
        assert_eq!(base, ymd(2024, 2, 28));
        assert_eq!(next, ymd(2024, 3, 1));
    }

    #[test]
    fn week_label_uses_start_month_and_end_year() {
        let (start, end) = week_interval(ymd(2024, 3, 14));
        assert_eq!(format_week_label(start, end, Locale::PtBr), "11–17 mar. 2024");
        assert_eq!(format_week_label(start, end, Locale::EnUs), "11–17 Mar 2024");

        let (start, end) = week_interval(ymd(2025, 12, 31));
        assert_eq!(format_week_label(start, end, Locale::PtBr), "29–04 dez. 2026");
    }

    #[test]
    fn weekday_and_day_labels() {
        let day = ymd(2024, 3, 14);
        assert_eq!(weekday_label(day, Locale::PtBr), "Qui");
        assert_eq!(format_day_month(day, Locale::PtBr), "14/03");
        assert_eq!(format_day_month(day, Locale::EnUs), "03/14");
        assert_eq!(format_task_date(day, Locale::PtBr), "qui., 14/03");
    }

    #[test]
    fn parse_ymd_requires_padded_four_digit_year() {
        assert_eq!(parse_ymd(" 2024-03-05 "), Ok(ymd(2024, 3, 5)));
        assert_eq!(parse_ymd("2024-3-5"), Err(DateError::Format));
        assert_eq!(parse_ymd("+262142-12-31"), Err(DateError::Format));
        assert_eq!(parse_ymd("14/03/2024"), Err(DateError::Format));
        assert_eq!(parse_ymd(""), Err(DateError::Format));
        assert_eq!(parse_ymd("2024-02-30"), Err(DateError::OutOfRange));
    }

    #[test]
    fn add_days_saturates_at_calendar_limits() {
        assert_eq!(add_days(NaiveDate::MAX, 1), NaiveDate::MAX);
        assert_eq!(add_days(NaiveDate::MIN, -7), NaiveDate::MIN);
        assert_eq!(add_days(ymd(2024, 1, 1), i64::MAX), NaiveDate::MAX);

        let (start, end) = week_interval(NaiveDate::MAX);
        assert!(start <= end);
        assert_eq!(end, NaiveDate::MAX);
    }

    #[test]
    fn timestamp_short_date_and_time() {
        let millis = Local
            .with_ymd_and_hms(2024, 3, 14, 9, 5, 0)
            .single()
            .unwrap()
            .timestamp_millis();
        assert_eq!(format_timestamp(millis, Locale::PtBr), "14/03/2024, 09:05");
        assert_eq!(format_timestamp(millis, Locale::EnUs), "3/14/24, 9:05 AM");
        assert_eq!(format_timestamp(i64::MAX, Locale::PtBr), "");
    }

    #[test]
    fn locale_parsing() {
        assert_eq!("pt-BR".parse::<Locale>(), Ok(Locale::PtBr));
        assert_eq!("en_us".parse::<Locale>(), Ok(Locale::EnUs));
        assert!("fr-FR".parse::<Locale>().is_err());
    }
}
