//! Month grid construction.
//!
//! A [`CalendarMonth`] is an ordered run of [`DayCell`]s whose length is always a
//! multiple of seven: the month's own days, preceded by the tail of the previous
//! month and followed by the head of the next one so every week row is complete.
//! Padding cells exist only for display; nothing is ever projected onto them.

pub mod clock;

use std::fmt;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

pub use clock::{Clock, ManualClock, SystemClock};

const DAYS_PER_WEEK: u32 = 7;

/// A calendar month in the proleptic Gregorian calendar. `month` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Builds a month from a zero-based month index (0 = January).
    pub fn from_zero_based(month: u32, year: i32) -> Option<Self> {
        Self::new(year, month + 1)
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

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

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Number of days in the month: the day before the 1st of the following month.
    ///
    /// Months chrono cannot represent report zero days.
    pub fn days_in_month(self) -> u32 {
        self.next()
            .first_day()
            .and_then(|first_of_next| first_of_next.pred_opt())
            .map(|last| last.day())
            .unwrap_or(0)
    }

    /// The date of `day` within this month, if it exists.
    pub fn date(self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        Self::of(date) == self
    }

    /// Human readable label, e.g. "October 2026".
    pub fn title(self) -> String {
        match self.first_day() {
            Some(first) => first.format("%B %Y").to_string(),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Which weekday opens each row of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    /// Column index of `weekday` in a row (0 = first column).
    pub fn offset(self, weekday: Weekday) -> u32 {
        match self {
            WeekStart::Sunday => weekday.num_days_from_sunday(),
            WeekStart::Monday => weekday.num_days_from_monday(),
        }
    }

    pub fn weekday_labels(self) -> [&'static str; 7] {
        match self {
            WeekStart::Sunday => ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
            WeekStart::Monday => ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
        }
    }
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// One cell of the month grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCell {
    /// Day of month of `date`; for padding cells this is the neighbouring month's day.
    pub day_number: u32,
    pub date: NaiveDate,
    pub weekday_name: &'static str,
    pub is_today: bool,
    pub is_padding: bool,
}

/// A fully built month grid. Never mutated; rebuild to refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarMonth {
    pub year_month: YearMonth,
    pub week_start: WeekStart,
    pub days_in_month: u32,
    pub leading_padding: u32,
    pub days: Vec<DayCell>,
}

impl CalendarMonth {
    fn empty(year_month: YearMonth, week_start: WeekStart) -> Self {
        Self {
            year_month,
            week_start,
            days_in_month: 0,
            leading_padding: 0,
            days: Vec::new(),
        }
    }

    /// Rows of exactly seven cells.
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell]> {
        self.days.chunks(DAYS_PER_WEEK as usize)
    }

    pub fn week_count(&self) -> usize {
        self.days.len() / DAYS_PER_WEEK as usize
    }

    /// The month's own cells, in order, without padding.
    pub fn month_days(&self) -> impl Iterator<Item = &DayCell> {
        self.days.iter().filter(|cell| !cell.is_padding)
    }

    /// The non-padding cell for `day_number`.
    pub fn cell(&self, day_number: u32) -> Option<&DayCell> {
        if day_number == 0 || day_number > self.days_in_month {
            return None;
        }
        self.days
            .get((self.leading_padding + day_number - 1) as usize)
    }

    pub fn today(&self) -> Option<&DayCell> {
        self.month_days().find(|cell| cell.is_today)
    }

    pub fn title(&self) -> String {
        self.year_month.title()
    }

    pub fn weekday_labels(&self) -> [&'static str; 7] {
        self.week_start.weekday_labels()
    }
}

/// Builds [`CalendarMonth`] grids for a configured week start.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarBuilder {
    week_start: WeekStart,
}

impl CalendarBuilder {
    pub fn new(week_start: WeekStart) -> Self {
        Self { week_start }
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    /// Builds the grid for `year_month`, flagging the cell that matches `today`.
    pub fn build(&self, year_month: YearMonth, today: NaiveDate) -> CalendarMonth {
        let days_in_month = year_month.days_in_month();
        let Some(first) = year_month.first_day().filter(|_| days_in_month > 0) else {
            return CalendarMonth::empty(year_month, self.week_start);
        };

        let leading_padding = self.week_start.offset(first.weekday());
        let filled = leading_padding + days_in_month;
        let total = filled.div_ceil(DAYS_PER_WEEK) * DAYS_PER_WEEK;

        let Some(grid_start) = first.checked_sub_days(Days::new(u64::from(leading_padding)))
        else {
            return CalendarMonth::empty(year_month, self.week_start);
        };

        let mut days = Vec::with_capacity(total as usize);
        for offset in 0..total {
            let Some(date) = grid_start.checked_add_days(Days::new(u64::from(offset))) else {
                return CalendarMonth::empty(year_month, self.week_start);
            };
            days.push(DayCell {
                day_number: date.day(),
                date,
                weekday_name: weekday_name(date.weekday()),
                is_today: date == today,
                is_padding: !year_month.contains(date),
            });
        }

        tracing::debug!(
            month = %year_month,
            days_in_month,
            leading_padding,
            cells = days.len(),
            "built calendar grid"
        );

        CalendarMonth {
            year_month,
            week_start: self.week_start,
            days_in_month,
            leading_padding,
            days,
        }
    }

    /// Builds the grid for the month the clock is currently in.
    pub fn build_current(&self, clock: &dyn Clock) -> CalendarMonth {
        let today = clock.today();
        self.build(YearMonth::of(today), today)
    }
}
