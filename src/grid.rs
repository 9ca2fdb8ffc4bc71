//! Month grid generation.
//!
//! A grid always spans six Monday-first weeks and fully contains its
//! month, padded with the trailing days of the previous month and the
//! leading days of the next one.

use chrono::{Datelike, Duration, NaiveDate};
use std::fmt;

use crate::error::Result;
use crate::month::MonthIndex;

pub const COLUMNS: usize = 7;
pub const ROWS: usize = 6;
pub const TOTAL_CELLS: usize = COLUMNS * ROWS;

pub const WEEKDAY_LABELS: [&str; COLUMNS] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub is_current_month: bool,
}

impl CalendarDay {
    pub fn label(&self) -> u32 {
        self.date.day()
    }
}

/// Produces the 42 cells of the grid for `month` (1-based) of `year`.
pub fn generate_calendar_days(year: i32, month: u32) -> Result<Vec<CalendarDay>> {
    let index = MonthIndex::try_new(year, month)?;
    let first_day = index.first_day()?;
    let last_day = index.last_day()?;

    let offset = first_day.weekday().num_days_from_monday() as i64;

    let leading = (0..offset).map(|i| first_day - Duration::days(offset - i));
    let current = first_day.iter_days().take_while(|date| *date <= last_day);
    let num_current = last_day.day() as usize;
    let trailing = (1..)
        .map(|i| last_day + Duration::days(i))
        .take(TOTAL_CELLS - offset as usize - num_current);

    Ok(leading
        .chain(current)
        .chain(trailing)
        .map(|date| CalendarDay {
            date,
            is_current_month: index.contains(&date),
        })
        .collect())
}

/// The grid of one month together with the month it was generated for.
#[derive(Debug, Clone)]
pub struct MonthGrid {
    month: MonthIndex,
    days: Vec<CalendarDay>,
}

impl MonthGrid {
    pub fn new(month: MonthIndex) -> Result<Self> {
        let days = generate_calendar_days(month.year(), month.number())?;
        Ok(MonthGrid { month, days })
    }

    pub fn month(&self) -> MonthIndex {
        self.month
    }

    pub fn days(&self) -> &[CalendarDay] {
        &self.days
    }

    pub fn first(&self) -> NaiveDate {
        self.days[0].date
    }

    pub fn last(&self) -> NaiveDate {
        self.days[TOTAL_CELLS - 1].date
    }

    fn num_leading(&self) -> usize {
        self.days
            .iter()
            .take_while(|day| !day.is_current_month)
            .count()
    }

    fn num_current(&self) -> usize {
        self.days.iter().filter(|day| day.is_current_month).count()
    }

    pub fn leading(&self) -> &[CalendarDay] {
        &self.days[..self.num_leading()]
    }

    pub fn current(&self) -> &[CalendarDay] {
        let begin = self.num_leading();
        &self.days[begin..begin + self.num_current()]
    }

    pub fn trailing(&self) -> &[CalendarDay] {
        &self.days[self.num_leading() + self.num_current()..]
    }

    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarDay]> {
        self.days.chunks(COLUMNS)
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        (self.first()..=self.last()).contains(date)
    }

    /// Cell index of `date`, if it is part of the grid.
    pub fn position(&self, date: &NaiveDate) -> Option<usize> {
        if self.contains(date) {
            Some(date.signed_duration_since(self.first()).num_days() as usize)
        } else {
            None
        }
    }
}

impl fmt::Display for MonthGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.month.name(), self.month.year())?;

        for label in WEEKDAY_LABELS.iter() {
            write!(f, "{:>4}", label)?;
        }
        writeln!(f)?;

        for week in self.weeks() {
            for day in week {
                if day.is_current_month {
                    write!(f, "{:>4}", day.label())?;
                } else {
                    write!(f, "{:>4}", format!("({})", day.label()))?;
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn all_months() -> impl Iterator<Item = (i32, u32)> {
        (1900..=2100).flat_map(|year| (1..=12).map(move |month| (year, month)))
    }

    #[test]
    fn always_42_cells() {
        for (year, month) in all_months() {
            assert_eq!(
                generate_calendar_days(year, month).unwrap().len(),
                TOTAL_CELLS,
                "{}-{}",
                year,
                month
            );
        }
    }

    #[test]
    fn dates_are_contiguous() {
        for (year, month) in all_months() {
            let days = generate_calendar_days(year, month).unwrap();
            for pair in days.windows(2) {
                assert_eq!(pair[1].date, pair[0].date + Duration::days(1));
            }
            assert_eq!(days[0].date.weekday(), Weekday::Mon);
        }
    }

    #[test]
    fn current_month_is_contiguous_and_complete() {
        for (year, month) in all_months() {
            let grid = MonthGrid::new(MonthIndex::try_new(year, month).unwrap()).unwrap();
            let current = grid.current();

            assert_eq!(current.len() as u32, grid.month().num_days().unwrap());
            assert_eq!(current[0].date, NaiveDate::from_ymd_opt(year, month, 1).unwrap());
            assert!(grid.leading().iter().all(|day| !day.is_current_month));
            assert!(grid.trailing().iter().all(|day| !day.is_current_month));
        }
    }

    #[test]
    fn leading_count_matches_weekday_offset() {
        for (year, month) in all_months() {
            let grid = MonthGrid::new(MonthIndex::try_new(year, month).unwrap()).unwrap();
            let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
            let expected = (first.weekday().num_days_from_sunday() + 6) % 7;

            assert_eq!(grid.leading().len() as u32, expected);
            assert!(grid.leading().len() <= 6);
        }
    }

    #[test]
    fn february_2024() {
        let grid = MonthGrid::new(MonthIndex::try_new(2024, 2).unwrap()).unwrap();

        assert_eq!(grid.leading().len(), 3);
        assert_eq!(grid.current().len(), 29);
        assert_eq!(grid.trailing().len(), 10);
        assert_eq!(grid.first(), NaiveDate::from_ymd_opt(2024, 1, 29).unwrap());
        assert_eq!(grid.last(), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    }

    #[test]
    fn january_2023() {
        let grid = MonthGrid::new(MonthIndex::try_new(2023, 1).unwrap()).unwrap();

        assert_eq!(grid.leading().len(), 6);
        assert_eq!(grid.current().len(), 31);
        assert_eq!(grid.trailing().len(), 5);
    }

    #[test]
    fn month_starting_on_monday_has_no_leading_days() {
        // 2024-01-01 is a Monday
        let grid = MonthGrid::new(MonthIndex::try_new(2024, 1).unwrap()).unwrap();
        assert!(grid.leading().is_empty());
        assert_eq!(grid.trailing().len(), 11);
    }

    #[test]
    fn invalid_month_fails() {
        assert!(generate_calendar_days(2024, 0).is_err());
        assert!(generate_calendar_days(2024, 13).is_err());
    }

    #[test]
    fn positions() {
        let grid = MonthGrid::new(MonthIndex::try_new(2024, 2).unwrap()).unwrap();
        let feb_first = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();

        assert_eq!(grid.position(&feb_first), Some(3));
        assert_eq!(grid.position(&grid.last()), Some(TOTAL_CELLS - 1));
        assert_eq!(
            grid.position(&NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()),
            None
        );
    }

    #[test]
    fn text_rendering() {
        let grid = MonthGrid::new(MonthIndex::try_new(2024, 2).unwrap()).unwrap();
        let text = grid.to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2 + ROWS);
        assert_eq!(lines[0], "February 2024");
        assert_eq!(lines[1], " Mon Tue Wed Thu Fri Sat Sun");
        assert_eq!(lines[2], "(29)(30)(31)   1   2   3   4");
    }
}
