use std::sync::{Arc, Mutex};

use chrono::{Days, Local, NaiveDate};

use super::YearMonth;

/// Clock abstracts access to the wall-clock date so the view stays deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current local calendar date.
    fn today(&self) -> NaiveDate;

    /// Returns the month containing `today()`.
    fn current_month(&self) -> YearMonth {
        YearMonth::of(self.today())
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

/// Real-time clock backed by the local system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock whose date only moves when told to. Used by tests and by the CLI `--today` flag.
#[derive(Debug)]
pub struct ManualClock {
    today: Mutex<NaiveDate>,
}

impl ManualClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Mutex::new(today),
        }
    }

    pub fn set(&self, date: NaiveDate) {
        *self.today.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = date;
    }

    /// Moves the clock forward by `days`; saturates at chrono's maximum date.
    pub fn advance_days(&self, days: u64) {
        let mut today = self.today.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(next) = today.checked_add_days(Days::new(days)) {
            *today = next;
        }
    }
}

impl Clock for ManualClock {
    fn today(&self) -> NaiveDate {
        *self.today.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
