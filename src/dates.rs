// src/dates.rs

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// A calendar value compared year, then month, then day.
///
/// Day and month are not range-checked: `32/13/2024` parses to a date that
/// simply sorts after every real day of 2024.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl CalendarDate {
    /// Stand-in for a missing bound: 01/01/0000.
    pub const EPOCH: CalendarDate = CalendarDate {
        year: 0,
        month: 1,
        day: 1,
    };
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}/{:04}", self.day, self.month, self.year)
    }
}

fn canonical_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{2}/[0-9]{2}/[0-9]{4}$").expect("static regex"))
}

fn iso_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").expect("static regex"))
}

/// True for the strict `DD/MM/YYYY` shape, ASCII digits only.
pub fn is_canonical(s: &str) -> bool {
    canonical_re().is_match(s)
}

/// Parses day/month/year by positional split on `/`.
///
/// Absent or empty input yields [`CalendarDate::EPOCH`]. Anything that does
/// not split into exactly three runs of ASCII digits returns `None`.
/// Single-digit parts (`5/1/2024`) are accepted.
pub fn parse_canonical(s: Option<&str>) -> Option<CalendarDate> {
    let s = match s {
        None | Some("") => return Some(CalendarDate::EPOCH),
        Some(s) => s,
    };

    let mut parts = s.split('/');
    let day = digits(parts.next()?)?;
    let month = digits(parts.next()?)?;
    let year = digits(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }

    Some(CalendarDate { year, month, day })
}

// `str::parse` takes a leading sign; a date part never has one.
fn digits<T: FromStr>(part: &str) -> Option<T> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Normalizes a wire date to `DD/MM/YYYY`.
///
/// `YYYY-MM-DD` is reordered; canonical and foreign strings pass through
/// verbatim. Absent or empty input yields `None`.
pub fn to_canonical(s: Option<&str>) -> Option<String> {
    let s = s.filter(|s| !s.is_empty())?;

    if is_canonical(s) {
        return Some(s.to_string());
    }
    if let Some(caps) = iso_re().captures(s) {
        return Some(format!("{}/{}/{}", &caps[3], &caps[2], &caps[1]));
    }
    Some(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_is_reordered() {
        assert_eq!(to_canonical(Some("2024-03-05")).as_deref(), Some("05/03/2024"));
    }

    #[test]
    fn canonical_and_foreign_pass_through() {
        assert_eq!(to_canonical(Some("05/03/2024")).as_deref(), Some("05/03/2024"));
        assert_eq!(to_canonical(Some("5/1/2024")).as_deref(), Some("5/1/2024"));
        assert_eq!(to_canonical(Some("March 5th")).as_deref(), Some("March 5th"));
        assert_eq!(to_canonical(Some("2024-3-5")).as_deref(), Some("2024-3-5"));
    }

    #[test]
    fn empty_is_absent() {
        assert_eq!(to_canonical(Some("")), None);
        assert_eq!(to_canonical(None), None);
    }

    #[test]
    fn parse_reads_day_month_year() {
        let d = parse_canonical(Some("15/03/2024")).unwrap();
        assert_eq!(
            d,
            CalendarDate {
                year: 2024,
                month: 3,
                day: 15
            }
        );
        assert_eq!(d.to_string(), "15/03/2024");
    }

    #[test]
    fn parse_missing_is_epoch() {
        assert_eq!(parse_canonical(None), Some(CalendarDate::EPOCH));
        assert_eq!(parse_canonical(Some("")), Some(CalendarDate::EPOCH));
    }

    #[test]
    fn parse_is_lenient_on_ranges_and_padding() {
        let odd = parse_canonical(Some("32/13/2024")).unwrap();
        assert_eq!((odd.day, odd.month, odd.year), (32, 13, 2024));

        // Same positional split for the short form that to_canonical leaves alone.
        let short = parse_canonical(Some("5/1/2024")).unwrap();
        assert_eq!(short, parse_canonical(Some("05/01/2024")).unwrap());
    }

    #[test]
    fn parse_rejects_non_numeric_shapes() {
        assert_eq!(parse_canonical(Some("2024-03-05")), None);
        assert_eq!(parse_canonical(Some("aa/bb/cccc")), None);
        assert_eq!(parse_canonical(Some("01/02/2024/9")), None);
        assert_eq!(parse_canonical(Some("01/02")), None);
    }

    #[test]
    fn parse_rejects_signed_parts() {
        assert_eq!(parse_canonical(Some("+5/+1/-2024")), None);
        assert_eq!(parse_canonical(Some("05/01/-2024")), None);
        assert_eq!(parse_canonical(Some("05//2024")), None);
    }

    #[test]
    fn non_ascii_digits_are_foreign() {
        // Arabic-Indic digits.
        assert!(!is_canonical("٠١/٠١/٢٠٢٤"));
        assert_eq!(parse_canonical(Some("٠١/٠١/٢٠٢٤")), None);
        assert_eq!(
            to_canonical(Some("٢٠٢٤-٠٣-٠٥")).as_deref(),
            Some("٢٠٢٤-٠٣-٠٥")
        );
    }

    #[test]
    fn ordering_is_by_calendar_value() {
        let a = parse_canonical(Some("31/12/2023")).unwrap();
        let b = parse_canonical(Some("01/01/2024")).unwrap();
        let c = parse_canonical(Some("02/01/2024")).unwrap();
        assert!(a < b && b < c);
        assert!(CalendarDate::EPOCH < a);
    }
}
