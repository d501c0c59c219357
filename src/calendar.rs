use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::types::{Event, Meeting};

/// A record placed on a calendar day
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

impl Dated for Event {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for Meeting {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl<T: Dated + ?Sized> Dated for &T {
    fn date(&self) -> NaiveDate {
        (**self).date()
    }
}

/// A calendar month. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Display name such as "July 2025"
    pub fn label(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    /// Parse `YYYY-MM`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::Validation(format!("Invalid month '{}', expected YYYY-MM", s));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        YearMonth::new(year, month).ok_or_else(invalid)
    }
}

/// Distinct months holding at least one record, ascending
pub fn months_with_events<T: Dated>(records: &[T]) -> Vec<YearMonth> {
    records
        .iter()
        .map(|record| YearMonth::of(record.date()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The month after `cursor` that has events, or `cursor` when there is none
pub fn next_month(cursor: YearMonth, months: &[YearMonth]) -> YearMonth {
    match months.iter().position(|m| *m == cursor) {
        Some(idx) if idx + 1 < months.len() => months[idx + 1],
        _ => months.iter().copied().find(|m| *m > cursor).unwrap_or(cursor),
    }
}

/// The month before `cursor` that has events, or `cursor` when there is none
pub fn prev_month(cursor: YearMonth, months: &[YearMonth]) -> YearMonth {
    match months.iter().position(|m| *m == cursor) {
        Some(idx) if idx > 0 => months[idx - 1],
        _ => months
            .iter()
            .rev()
            .copied()
            .find(|m| *m < cursor)
            .unwrap_or(cursor),
    }
}

/// Month of the earliest record on or after `today`, else today's month
pub fn initial_cursor<T: Dated>(records: &[T], today: NaiveDate) -> YearMonth {
    records
        .iter()
        .map(|record| record.date())
        .filter(|date| *date >= today)
        .min()
        .map(YearMonth::of)
        .unwrap_or_else(|| YearMonth::of(today))
}

/// Records dated within `cursor`'s month and year
pub fn events_for_month<T: Dated>(records: &[T], cursor: YearMonth) -> Vec<&T> {
    records
        .iter()
        .filter(|record| cursor.contains(record.date()))
        .collect()
}

/// True when `date` is strictly before `today`
pub fn is_past(date: NaiveDate, today: NaiveDate) -> bool {
    date < today
}

/// Cursor over the months that hold events
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthNavigator {
    current: YearMonth,
    months: Vec<YearMonth>,
    today: NaiveDate,
}

impl MonthNavigator {
    pub fn new<T: Dated>(records: &[T], today: NaiveDate) -> Self {
        Self {
            current: initial_cursor(records, today),
            months: months_with_events(records),
            today,
        }
    }

    pub fn current(&self) -> YearMonth {
        self.current
    }

    pub fn months(&self) -> &[YearMonth] {
        &self.months
    }

    pub fn next(&mut self) -> YearMonth {
        self.current = next_month(self.current, &self.months);
        self.current
    }

    pub fn prev(&mut self) -> YearMonth {
        self.current = prev_month(self.current, &self.months);
        self.current
    }

    pub fn has_next(&self) -> bool {
        next_month(self.current, &self.months) != self.current
    }

    pub fn has_prev(&self) -> bool {
        prev_month(self.current, &self.months) != self.current
    }

    /// Jump to an arbitrary month, e.g. from a `--month` flag
    pub fn jump_to(&mut self, month: YearMonth) {
        self.current = month;
    }

    /// Return to the month of the nearest upcoming record
    pub fn reset<T: Dated>(&mut self, records: &[T]) {
        self.current = initial_cursor(records, self.today);
    }
}
