use chrono::{Datelike, Local, Month, NaiveDate};
use nom::{
    character::complete::{char, i32 as year_number, u32 as month_number},
    combinator::all_consuming,
    sequence::separated_pair,
};
use num_traits::FromPrimitive;
use std::cmp::Ordering;
use std::convert::TryFrom;
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// A calendar month of a specific year. This is the unit the calendar
/// window displays and navigates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthIndex {
    index: Month,
    year: i32,
}

impl MonthIndex {
    pub fn new(index: Month, year: i32) -> Self {
        MonthIndex { index, year }
    }

    /// Builds an index from a 1-based month number.
    pub fn try_new(year: i32, month: u32) -> Result<Self> {
        let index = Month::from_u32(month).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidMonth,
                &format!("{} is not in range 1..=12", month),
            )
        })?;

        Ok(MonthIndex { index, year })
    }

    pub fn today() -> Self {
        MonthIndex::from(Local::now().date_naive())
    }

    pub fn month(&self) -> Month {
        self.index
    }

    pub fn number(&self) -> u32 {
        self.index.number_from_month()
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn name(&self) -> &'static str {
        self.index.name()
    }

    pub fn first_day(&self) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.number(), 1).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidMonth,
                &format!("{} is out of the supported date range", self),
            )
        })
    }

    pub fn last_day(&self) -> Result<NaiveDate> {
        let first_of_next = self.next().first_day()?;
        first_of_next.pred_opt().ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidMonth,
                &format!("{} is out of the supported date range", self),
            )
        })
    }

    pub fn num_days(&self) -> Result<u32> {
        Ok(self.last_day()?.day())
    }

    pub fn contains<T: Datelike>(&self, date: &T) -> bool {
        date.year() == self.year && date.month() == self.number()
    }

    pub fn next(&self) -> Self {
        *self + 1
    }

    pub fn prev(&self) -> Self {
        *self - 1
    }

    /// `n` months later, or `None` if that month has no representable date.
    pub fn checked_add(&self, n: u32) -> Option<Self> {
        Self::checked_from_total_months(self.total_months() + n as i64)
    }

    /// `n` months earlier, or `None` if that month has no representable date.
    pub fn checked_sub(&self, n: u32) -> Option<Self> {
        Self::checked_from_total_months(self.total_months() - n as i64)
    }

    fn checked_from_total_months(total: i64) -> Option<Self> {
        let year = i32::try_from(total.div_euclid(12)).ok()?;
        let month = MonthIndex {
            index: MONTHS[total.rem_euclid(12) as usize],
            year,
        };
        month.first_day().ok().map(|_| month)
    }

    fn total_months(&self) -> i64 {
        self.year as i64 * 12 + self.index.number_from_month() as i64 - 1
    }

    fn from_total_months(total: i64) -> Self {
        MonthIndex {
            index: MONTHS[total.rem_euclid(12) as usize],
            year: total.div_euclid(12) as i32,
        }
    }
}

impl Default for MonthIndex {
    fn default() -> Self {
        MonthIndex::today()
    }
}

impl<T: Datelike> From<T> for MonthIndex {
    fn from(m: T) -> Self {
        MonthIndex::new(MONTHS[m.month0() as usize], m.year())
    }
}

impl Add<u32> for MonthIndex {
    type Output = MonthIndex;
    fn add(self, rhs: u32) -> Self::Output {
        MonthIndex::from_total_months(self.total_months() + rhs as i64)
    }
}

impl Sub<u32> for MonthIndex {
    type Output = MonthIndex;
    fn sub(self, rhs: u32) -> Self::Output {
        MonthIndex::from_total_months(self.total_months() - rhs as i64)
    }
}

impl Ord for MonthIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        self.total_months().cmp(&other.total_months())
    }
}

impl PartialOrd for MonthIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for MonthIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.number())
    }
}

impl FromStr for MonthIndex {
    type Err = Error;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self> {
        let (_, (year, month)) =
            all_consuming(separated_pair(year_number, char('-'), month_number))(s.trim())
                .map_err(|e: nom::Err<nom::error::Error<&str>>| {
                    Error::from(e).with_msg(&format!("expected YYYY-MM, got '{}'", s))
                })?;

        MonthIndex::try_new(year, month)
    }
}
