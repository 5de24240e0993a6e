use crate::date::CalendarDate;
use chrono::Datelike;

/// How to spell the month of a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthStyle {
    /// The full English name, like `March`.
    Long,
    /// The three-letter English abbreviation, like `Mar`.
    Short,
}

/// en-US month names, indexed by [Datelike::month0].
static LONG_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// en-US month abbreviations, indexed by [Datelike::month0].
static SHORT_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

impl MonthStyle {
    fn name(&self, date: &CalendarDate) -> &'static str {
        let names = match self {
            MonthStyle::Long => &LONG_MONTHS,
            MonthStyle::Short => &SHORT_MONTHS,
        };
        names[date.month0() as usize]
    }
}

/// Which fields of a [CalendarDate] to show, and how. The day is always shown as a plain number.
///
/// Output follows the `en-US` locale:
///
/// ```
/// use datetext::{CalendarDate, FormatConfig};
///
/// let date: CalendarDate = "2024-03-05".parse().unwrap();
/// assert_eq!("March 5, 2024", FormatConfig::LONG_FORM.render(&date));
/// assert_eq!("Mar 5", FormatConfig::SHORT_FORM.render(&date));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatConfig {
    /// The month spelling.
    pub month: MonthStyle,

    /// Whether to append the numeric year.
    pub year: bool,
}

impl FormatConfig {
    /// Full month name, numeric day, numeric year: `March 5, 2024`.
    pub const LONG_FORM: FormatConfig = FormatConfig {
        month: MonthStyle::Long,
        year: true,
    };

    /// Abbreviated month name, numeric day, no year: `Mar 5`.
    pub const SHORT_FORM: FormatConfig = FormatConfig {
        month: MonthStyle::Short,
        year: false,
    };

    /// Renders `date` under this configuration.
    pub fn render(&self, date: &CalendarDate) -> String {
        let month = self.month.name(date);
        let day = date.day();
        if self.year {
            format!("{} {}, {}", month, day, date.year())
        } else {
            format!("{} {}", month, day)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    fn ymd(year: i32, month: u32, day: u32) -> CalendarDate {
        CalendarDate::from_ymd(year, month, day).unwrap()
    }

    #[rstest]
    #[case(ymd(2024, 3, 5), "March 5, 2024")]
    #[case(ymd(2024, 1, 1), "January 1, 2024")]
    #[case(ymd(2023, 12, 31), "December 31, 2023")]
    #[case(ymd(2024, 2, 29), "February 29, 2024")]
    #[case(ymd(1999, 9, 10), "September 10, 1999")]
    #[case(ymd(5, 6, 7), "June 7, 5")]
    fn test_long_form(#[case] date: CalendarDate, #[case] expected: &str) {
        assert_eq!(expected, FormatConfig::LONG_FORM.render(&date));
    }

    #[rstest]
    #[case(ymd(2024, 12, 1), "Dec 1")]
    #[case(ymd(2024, 1, 1), "Jan 1")]
    #[case(ymd(2024, 5, 20), "May 20")]
    #[case(ymd(2024, 6, 9), "Jun 9")]
    #[case(ymd(2024, 7, 4), "Jul 4")]
    #[case(ymd(2024, 9, 30), "Sep 30")]
    fn test_short_form(#[case] date: CalendarDate, #[case] expected: &str) {
        assert_eq!(expected, FormatConfig::SHORT_FORM.render(&date));
    }

    #[test]
    fn test_every_month() {
        let rendered: Vec<String> = (1..=12)
            .map(|month| FormatConfig::SHORT_FORM.render(&ymd(2024, month, 1)))
            .collect();
        assert_eq!(
            vec![
                "Jan 1", "Feb 1", "Mar 1", "Apr 1", "May 1", "Jun 1", "Jul 1", "Aug 1", "Sep 1",
                "Oct 1", "Nov 1", "Dec 1",
            ],
            rendered
        );
        assert_eq!(
            "August 31, 2024",
            FormatConfig::LONG_FORM.render(&ymd(2024, 8, 31))
        );
    }

    #[test]
    fn test_custom_config() {
        let config = FormatConfig {
            month: MonthStyle::Short,
            year: true,
        };
        assert_eq!("Mar 5, 2024", config.render(&ymd(2024, 3, 5)));
    }
}
