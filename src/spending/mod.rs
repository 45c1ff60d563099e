//! Confirmed (actual) spending entered by the user.
//!
//! Entries are keyed by full calendar date, so a confirmation made on the 5th of
//! one month never shows up on the 5th of another.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{calendar::YearMonth, utils::sanitize_amount};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpendingLedger {
    entries: BTreeMap<NaiveDate, f64>,
}

impl SpendingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `amount` as the actual spending for `date`, replacing any earlier value.
    ///
    /// Returns the previous value, if any.
    pub fn confirm(&mut self, date: NaiveDate, amount: f64) -> Option<f64> {
        self.entries.insert(date, sanitize_amount(amount))
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.entries.get(&date).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.entries.iter().map(|(date, amount)| (*date, *amount))
    }

    /// Overrides for every day of `year_month`; index `i` is day `i + 1`.
    pub fn month_overrides(&self, year_month: YearMonth) -> Vec<Option<f64>> {
        (1..=year_month.days_in_month())
            .map(|day| year_month.date(day).and_then(|date| self.get(date)))
            .collect()
    }

    pub fn total_for_month(&self, year_month: YearMonth) -> f64 {
        self.entries
            .iter()
            .filter(|(date, _)| year_month.contains(**date))
            .map(|(_, amount)| *amount)
            .sum()
    }
}
