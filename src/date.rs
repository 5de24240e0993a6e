use crate::error::DateError;
use chrono::NaiveDate;
use core::{
    fmt::{self, Display},
    ops::Deref,
    str::FromStr,
};

/// A year/month/day value in the proleptic Gregorian calendar.
///
/// There is no time-of-day and no timezone attached, so rendering a `CalendarDate` can never shift
/// it onto a neighbouring day.
///
/// ```
/// use datetext::CalendarDate;
///
/// let date: CalendarDate = "2024-03-05".parse().unwrap();
/// assert_eq!(date, CalendarDate::from_ymd(2024, 3, 5).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Returns result of a new [CalendarDate] for the given components, or
    /// [DateError::OutOfRange].
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or(DateError::OutOfRange { year, month, day })
    }
}

/// Splits `YYYY-MM-DD` into its numeric fields. Anything else, including `2024-3-5` or a trailing
/// time, is rejected.
fn split_ymd(text: &str) -> Option<(i32, u32, u32)> {
    let bytes = text.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits = |range: core::ops::Range<usize>| {
        let part = &text[range];
        part.bytes()
            .all(|b| b.is_ascii_digit())
            .then(|| part.parse::<u32>().ok())
            .flatten()
    };
    let year = digits(0..4)?;
    let month = digits(5..7)?;
    let day = digits(8..10)?;
    Some((year as i32, month, day))
}

impl FromStr for CalendarDate {
    type Err = DateError;

    /// Parses a date string into a [CalendarDate]. Surrounding whitespace is ignored. The rest must
    /// be `YYYY-MM-DD`, where `YYYY` is a four digit year, and `MM` and `DD` are zero-padded to 2
    /// digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let (year, month, day) = split_ymd(text).ok_or_else(|| DateError::Malformed {
            text: text.to_string(),
        })?;
        Self::from_ymd(year, month, day)
    }
}

impl Deref for CalendarDate {
    type Target = NaiveDate;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
