//! Month navigation and month-grid projection.

use crate::model::collection::EventCollection;
use crate::model::event::Event;
use chrono::{Datelike, Month, Months, NaiveDate};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    InvalidMonth(u32),
    InvalidYear(i32),
    /// Month text is not `YYYY-MM`.
    InvalidMonthText(String),
}

impl Display for CalendarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMonth(month) => write!(f, "month must be 1..=12, got {month}"),
            Self::InvalidYear(year) => write!(f, "year {year} is outside the supported range"),
            Self::InvalidMonthText(value) => {
                write!(f, "invalid month `{value}`; expected YYYY-MM")
            }
        }
    }
}

impl Error for CalendarError {}

/// One calendar month of one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CalendarMonth {
    year: i32,
    month: u32,
}

impl CalendarMonth {
    /// Builds a month; `month` is 1-based.
    pub fn new(year: i32, month: u32) -> Result<Self, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidMonth(month));
        }
        let candidate = Self { year, month };
        // The last day must also be representable for `days()` to be total.
        NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|first| first.checked_add_months(Months::new(1)))
            .ok_or(CalendarError::InvalidYear(year))?;
        Ok(candidate)
    }

    /// Month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parses `YYYY-MM`.
    pub fn parse(value: &str) -> Result<Self, CalendarError> {
        let invalid = || CalendarError::InvalidMonthText(value.to_string());
        let (year_text, month_text) = value.trim().split_once('-').ok_or_else(invalid)?;
        if month_text.len() != 2 {
            return Err(invalid());
        }
        let year = year_text.parse::<i32>().map_err(|_| invalid())?;
        let month = month_text.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month)
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    /// English month name, e.g. `June`.
    pub fn name(self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|number| Month::try_from(number).ok())
            .map_or("", |month| month.name())
    }

    /// Display title, e.g. `June 2024`.
    pub fn title(self) -> String {
        format!("{} {}", self.name(), self.year)
    }

    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(self) -> NaiveDate {
        self.first_day()
            .checked_add_months(Months::new(1))
            .and_then(|next_first| next_first.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    /// Every date of the month, first to last.
    pub fn days(self) -> Vec<NaiveDate> {
        self.first_day()
            .iter_days()
            .take_while(|day| *day <= self.last_day())
            .collect()
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// The month before this one, rolling the year back after January.
    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// The month after this one, rolling the year over after December.
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl Display for CalendarMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// One cell of the month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySlot<'a> {
    pub date: NaiveDate,
    /// Events on `date` in collection order.
    pub events: Vec<&'a Event>,
}

/// Projects `collection` onto one slot per day of `month`.
pub fn month_grid(collection: &EventCollection, month: CalendarMonth) -> Vec<DaySlot<'_>> {
    month
        .days()
        .into_iter()
        .map(|date| DaySlot {
            date,
            events: collection.on_day(date).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{CalendarError, CalendarMonth};

    #[test]
    fn february_length_follows_leap_years() {
        assert_eq!(CalendarMonth::new(2024, 2).unwrap().days().len(), 29);
        assert_eq!(CalendarMonth::new(2023, 2).unwrap().days().len(), 28);
        assert_eq!(CalendarMonth::new(1900, 2).unwrap().days().len(), 28);
    }

    #[test]
    fn navigation_rolls_over_year_boundaries() {
        let january = CalendarMonth::new(2024, 1).unwrap();
        assert_eq!(january.previous(), CalendarMonth::new(2023, 12).unwrap());
        assert_eq!(january.previous().next(), january);
    }

    #[test]
    fn parse_requires_two_digit_month() {
        assert_eq!(
            CalendarMonth::parse("2024-06").unwrap(),
            CalendarMonth::new(2024, 6).unwrap()
        );
        assert!(matches!(
            CalendarMonth::parse("2024-6"),
            Err(CalendarError::InvalidMonthText(_))
        ));
        assert_eq!(
            CalendarMonth::parse("2024-13"),
            Err(CalendarError::InvalidMonth(13))
        );
    }

    #[test]
    fn title_uses_month_name() {
        assert_eq!(CalendarMonth::new(2024, 6).unwrap().title(), "June 2024");
        assert_eq!(CalendarMonth::new(2023, 1).unwrap().name(), "January");
        assert_eq!(CalendarMonth::new(2023, 12).unwrap().name(), "December");
    }
}
