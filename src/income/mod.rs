//! Recurring income definitions and their projection onto month days.

use serde::{Deserialize, Serialize};

use crate::{
    errors::{EngineError, Result},
    utils::{is_valid_amount, lenient, sanitize_amount},
};

const WEEKS_PER_YEAR: f64 = 52.0;
const MONTHS_PER_YEAR: f64 = 12.0;
const DAYS_PER_WEEK: i64 = 7;

/// A recurring income definition.
///
/// Day fields are signed: an interval anchor may name a payday before the 1st
/// of the month and still project forward into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaySource {
    /// One flat payment every month on `anchor_day`, plus any `extra_days`.
    Fixed {
        #[serde(default, deserialize_with = "lenient::amount")]
        amount: f64,
        #[serde(default, deserialize_with = "lenient::signed_day")]
        anchor_day: Option<i64>,
        #[serde(default, deserialize_with = "lenient::day_list")]
        extra_days: Vec<i64>,
    },
    /// A payment every `interval_weeks` weeks counted from `anchor_day`.
    Interval {
        #[serde(default, deserialize_with = "lenient::amount")]
        amount: f64,
        #[serde(default, deserialize_with = "lenient::positive")]
        interval_weeks: Option<u32>,
        #[serde(default, deserialize_with = "lenient::signed_day")]
        anchor_day: Option<i64>,
    },
    /// Hourly work converted to one monthly-equivalent payment on `anchor_day` (day 1 when unset).
    Hourly {
        #[serde(default, deserialize_with = "lenient::amount")]
        hours_per_week: f64,
        #[serde(default, deserialize_with = "lenient::amount")]
        wage: f64,
        #[serde(default, deserialize_with = "lenient::signed_day")]
        anchor_day: Option<i64>,
    },
}

impl PaySource {
    pub fn fixed(amount: f64, anchor_day: i64) -> Self {
        PaySource::Fixed {
            amount,
            anchor_day: Some(anchor_day),
            extra_days: Vec::new(),
        }
    }

    /// A fixed source paid on every listed day, e.g. the 1st and the 15th.
    pub fn fixed_on_days(amount: f64, days: &[i64]) -> Self {
        let (anchor_day, extra_days) = match days.split_first() {
            Some((first, rest)) => (Some(*first), rest.to_vec()),
            None => (None, Vec::new()),
        };
        PaySource::Fixed {
            amount,
            anchor_day,
            extra_days,
        }
    }

    pub fn interval(amount: f64, interval_weeks: u32, anchor_day: i64) -> Self {
        PaySource::Interval {
            amount,
            interval_weeks: Some(interval_weeks).filter(|weeks| *weeks > 0),
            anchor_day: Some(anchor_day),
        }
    }

    pub fn hourly(hours_per_week: f64, wage: f64, anchor_day: Option<i64>) -> Self {
        PaySource::Hourly {
            hours_per_week,
            wage,
            anchor_day,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PaySource::Fixed { .. } => "fixed",
            PaySource::Interval { .. } => "interval",
            PaySource::Hourly { .. } => "hourly",
        }
    }

    /// The amount each payday of this source receives.
    pub fn amount_per_payday(&self) -> f64 {
        match self {
            PaySource::Fixed { amount, .. } | PaySource::Interval { amount, .. } => {
                sanitize_amount(*amount)
            }
            PaySource::Hourly {
                hours_per_week,
                wage,
                ..
            } => monthly_from_hourly(*hours_per_week, *wage),
        }
    }

    /// Rejects sources that best-effort projection would silently ignore.
    pub fn validate(&self) -> Result<()> {
        match self {
            PaySource::Fixed {
                amount, anchor_day, ..
            } => {
                require_amount("fixed amount", *amount)?;
                require_day("fixed anchor day", *anchor_day)
            }
            PaySource::Interval {
                amount,
                interval_weeks,
                anchor_day,
            } => {
                require_amount("interval amount", *amount)?;
                if interval_weeks.is_none() {
                    return Err(EngineError::InvalidInput(
                        "interval weeks must be a whole number of at least 1".into(),
                    ));
                }
                require_day("interval anchor day", *anchor_day)
            }
            PaySource::Hourly {
                hours_per_week,
                wage,
                ..
            } => {
                require_amount("hours per week", *hours_per_week)?;
                require_amount("hourly wage", *wage)
            }
        }
    }

    /// Adds this source's paydays into `totals`, where index `i` is day `i + 1`.
    fn project_into(&self, totals: &mut [f64]) {
        match self {
            PaySource::Fixed {
                amount,
                anchor_day,
                extra_days,
            } => project_fixed(*amount, *anchor_day, extra_days, totals),
            PaySource::Interval {
                amount,
                interval_weeks,
                anchor_day,
            } => project_interval(*amount, *interval_weeks, *anchor_day, totals),
            PaySource::Hourly {
                hours_per_week,
                wage,
                anchor_day,
            } => project_hourly(*hours_per_week, *wage, *anchor_day, totals),
        }
    }
}

fn require_amount(label: &str, value: f64) -> Result<()> {
    if is_valid_amount(value) && value > 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidInput(format!(
            "{label} must be a positive number"
        )))
    }
}

fn require_day(label: &str, day: Option<i64>) -> Result<()> {
    match day {
        Some(_) => Ok(()),
        None => Err(EngineError::InvalidInput(format!(
            "{label} must be a whole number"
        ))),
    }
}

fn monthly_from_hourly(hours_per_week: f64, wage: f64) -> f64 {
    let hours = sanitize_amount(hours_per_week);
    let wage = sanitize_amount(wage);
    // Finite factors can still overflow once multiplied.
    sanitize_amount(hours * wage * WEEKS_PER_YEAR / MONTHS_PER_YEAR)
}

fn add_on_day(totals: &mut [f64], day: i64, amount: f64) {
    if day < 1 {
        return;
    }
    if let Some(slot) = usize::try_from(day - 1)
        .ok()
        .and_then(|index| totals.get_mut(index))
    {
        *slot += amount;
    }
}

fn project_fixed(amount: f64, anchor_day: Option<i64>, extra_days: &[i64], totals: &mut [f64]) {
    let amount = sanitize_amount(amount);
    if amount == 0.0 {
        return;
    }
    for day in anchor_day.iter().chain(extra_days) {
        add_on_day(totals, *day, amount);
    }
}

fn project_interval(
    amount: f64,
    interval_weeks: Option<u32>,
    anchor_day: Option<i64>,
    totals: &mut [f64],
) {
    let amount = sanitize_amount(amount);
    let (Some(weeks), Some(anchor)) = (interval_weeks, anchor_day) else {
        return;
    };
    if amount == 0.0 || weeks == 0 {
        return;
    }
    let step = i64::from(weeks) * DAYS_PER_WEEK;
    let last_day = totals.len() as i64;
    let mut day = first_day_on_or_after_one(anchor, step);
    while day <= last_day {
        add_on_day(totals, day, amount);
        day += step;
    }
}

/// First day `>= 1` in the series `anchor + k * step`, or `anchor` itself when it
/// is already in the month or beyond it.
fn first_day_on_or_after_one(anchor: i64, step: i64) -> i64 {
    if anchor >= 1 {
        return anchor;
    }
    let offset = (i128::from(anchor) - 1).rem_euclid(i128::from(step));
    // offset < step, which fits in i64.
    1 + offset as i64
}

fn project_hourly(hours_per_week: f64, wage: f64, anchor_day: Option<i64>, totals: &mut [f64]) {
    let monthly = monthly_from_hourly(hours_per_week, wage);
    if monthly == 0.0 {
        return;
    }
    add_on_day(totals, anchor_day.unwrap_or(1), monthly);
}

/// Projects pay sources onto the days of a month.
pub struct PayScheduleProjector;

impl PayScheduleProjector {
    /// Returns `days_in_month` totals; index `i` holds the income landing on day `i + 1`.
    ///
    /// Sources accumulate additively. Invalid sources and out-of-range days
    /// contribute nothing.
    pub fn project(sources: &[PaySource], days_in_month: u32) -> Vec<f64> {
        let mut totals = vec![0.0; days_in_month as usize];
        for source in sources {
            source.project_into(&mut totals);
        }
        tracing::debug!(
            sources = sources.len(),
            days_in_month,
            paydays = totals.iter().filter(|amount| **amount > 0.0).count(),
            "projected pay schedule"
        );
        totals
    }

    /// Days (1-based) that receive any income.
    pub fn paydays(sources: &[PaySource], days_in_month: u32) -> Vec<u32> {
        Self::project(sources, days_in_month)
            .iter()
            .enumerate()
            .filter(|(_, amount)| **amount > 0.0)
            .map(|(index, _)| index as u32 + 1)
            .collect()
    }
}
