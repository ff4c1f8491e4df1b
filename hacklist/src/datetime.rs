use std::str::FromStr;

use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::Error;

const ISO_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// A simple date object, encapsulating a year, month and day.
///
/// Dates are written as `YYYY-MM-DD` in data files, and are stored there as
/// plain strings until something needs them as dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date(time::Date);

impl Date {
    /// Today's date in UTC.
    pub fn today() -> Self {
        Self(OffsetDateTime::now_utc().date())
    }

    /// The number of whole days from this date until `other`. Negative if
    /// `other` lies in the past.
    pub fn days_until(&self, other: Date) -> i64 {
        (other.0 - self.0).whole_days()
    }

    /// Format this date according to a format description as understood by
    /// the [`time`](https://time-rs.github.io/book/api/format-description.html)
    /// crate, e.g. `"[month repr:long] [day], [year]"`.
    pub fn format(&self, description: &str) -> Result<String, Error> {
        let items = time::format_description::parse(description)
            .map_err(|e| Error::InvalidDateFormat(description.to_string(), e))?;
        Ok(self.0.format(&items[..])?)
    }
}

impl FromStr for Date {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        time::Date::parse(s.trim(), ISO_DATE)
            .map(Self)
            .map_err(|e| Error::InvalidDate(s.to_string(), e))
    }
}

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.0.format(ISO_DATE).map_err(|_| std::fmt::Error)?
        )
    }
}

impl From<Date> for time::Date {
    fn from(d: Date) -> Self {
        d.0
    }
}

impl From<time::Date> for Date {
    fn from(d: time::Date) -> Self {
        Self(d)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_and_display() {
        let d = Date::from_str("2023-10-15").unwrap();
        assert_eq!(d.to_string(), "2023-10-15");
        assert!(Date::from_str("15/10/2023").is_err());
        assert!(Date::from_str("2023-02-30").is_err());
    }

    #[test]
    fn days_until_can_be_negative() {
        let start = Date::from_str("2023-10-15").unwrap();
        let end = Date::from_str("2023-10-17").unwrap();
        assert_eq!(start.days_until(end), 2);
        assert_eq!(end.days_until(start), -2);
        assert_eq!(start.days_until(start), 0);
    }

    #[test]
    fn custom_format() {
        let d = Date::from_str("2024-01-20").unwrap();
        assert_eq!(
            d.format("[month repr:long] [day padding:none], [year]")
                .unwrap(),
            "January 20, 2024"
        );
        assert!(d.format("[nonsense]").is_err());
    }
}
