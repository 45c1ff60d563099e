//! The budget view: a store of inputs plus the derived month, recomputed in full
//! after every mutation.

pub mod watcher;

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    allocation::AllocationEngine,
    calendar::{CalendarBuilder, CalendarMonth, Clock, DayCell, SystemClock, WeekStart, YearMonth},
    config::EngineConfig,
    errors::{EngineError, Result},
    income::{PayScheduleProjector, PaySource},
    spending::SpendingLedger,
    tickets::{ExpenseAssignment, TicketBook, TicketPatch},
    utils::{is_valid_amount, lenient, sanitize_amount},
};

pub use watcher::MonthWatcher;

/// Everything the presentation layer needs to draw one grid cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedPerDayRecord {
    pub day: DayCell,
    pub pay_amount: f64,
    pub assigned_amount: f64,
    pub confirmed_spending: Option<f64>,
    /// `None` for padding cells, otherwise never negative.
    pub remaining_budget: Option<f64>,
    pub ticket_ids: Vec<Uuid>,
}

impl DerivedPerDayRecord {
    fn padding(day: DayCell) -> Self {
        Self {
            day,
            pay_amount: 0.0,
            assigned_amount: 0.0,
            confirmed_spending: None,
            remaining_budget: None,
            ticket_ids: Vec::new(),
        }
    }
}

/// Month-level headline figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    pub year_month: YearMonth,
    pub title: String,
    pub days_in_month: u32,
    pub budget_amount: f64,
    pub daily_budget: f64,
    pub total_pay: f64,
    pub total_assigned: f64,
    pub total_confirmed_spending: f64,
    pub overall_remaining: f64,
    pub average_unassigned_per_day: f64,
}

/// Immutable result of one recompute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetSnapshot {
    pub week_start: WeekStart,
    pub records: Vec<DerivedPerDayRecord>,
    pub summary: MonthSummary,
}

impl BudgetSnapshot {
    pub fn weeks(&self) -> impl Iterator<Item = &[DerivedPerDayRecord]> {
        self.records.chunks(7)
    }

    /// The non-padding record for `day`.
    pub fn record(&self, day: u32) -> Option<&DerivedPerDayRecord> {
        self.records
            .iter()
            .find(|record| !record.day.is_padding && record.day.day_number == day)
    }
}

/// One confirmed-spending entry in a [`BudgetInputs`] snapshot. `date` wins over `day`;
/// a bare `day` refers to the current month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmedEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::positive")]
    pub day: Option<u32>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub amount: f64,
}

/// Plain input snapshot as collected by the input layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetInputs {
    #[serde(default, deserialize_with = "lenient::amount")]
    pub budget_amount: f64,
    #[serde(default)]
    pub pay_sources: Vec<PaySource>,
    #[serde(default)]
    pub tickets: Vec<ExpenseAssignment>,
    #[serde(default)]
    pub confirmed_spending: Vec<ConfirmedEntry>,
}

/// Derives the full snapshot from a calendar and the current inputs.
pub fn compose_snapshot(
    calendar: &CalendarMonth,
    budget_amount: f64,
    pay_sources: &[PaySource],
    tickets: &TicketBook,
    ledger: &SpendingLedger,
) -> BudgetSnapshot {
    let days_in_month = calendar.days_in_month;
    let pay = PayScheduleProjector::project(pay_sources, days_in_month);
    let assigned = tickets.assigned_by_day(days_in_month);
    let mut confirmed = ledger.month_overrides(calendar.year_month);
    confirmed.resize(days_in_month as usize, None);
    let allocation = AllocationEngine::allocate(budget_amount, &assigned, &confirmed);

    let records = calendar
        .days
        .iter()
        .map(|cell| {
            if cell.is_padding {
                return DerivedPerDayRecord::padding(cell.clone());
            }
            let index = cell.day_number as usize - 1;
            DerivedPerDayRecord {
                day: cell.clone(),
                pay_amount: pay.get(index).copied().unwrap_or(0.0),
                assigned_amount: assigned.get(index).copied().unwrap_or(0.0),
                confirmed_spending: confirmed.get(index).copied().flatten(),
                remaining_budget: allocation.remaining_on(cell.day_number),
                ticket_ids: tickets.on_day(cell.day_number).map(|ticket| ticket.id).collect(),
            }
        })
        .collect();

    let summary = MonthSummary {
        year_month: calendar.year_month,
        title: calendar.title(),
        days_in_month,
        budget_amount: allocation.budget_amount,
        daily_budget: allocation.daily_budget,
        total_pay: pay.iter().sum(),
        total_assigned: allocation.total_assigned,
        total_confirmed_spending: allocation.total_confirmed_spending,
        overall_remaining: allocation.overall_remaining,
        average_unassigned_per_day: allocation.average_unassigned_per_day,
    };

    BudgetSnapshot {
        week_start: calendar.week_start,
        records,
        summary,
    }
}

/// Orchestrates calendar, income projection, allocation and the spending ledger
/// for the month the clock is in.
pub struct BudgetView {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    builder: CalendarBuilder,
    calendar: CalendarMonth,
    budget_amount: f64,
    pay_sources: Vec<PaySource>,
    tickets: TicketBook,
    ledger: SpendingLedger,
    snapshot: BudgetSnapshot,
    watcher: Option<MonthWatcher>,
}

impl BudgetView {
    pub fn new(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        let builder = CalendarBuilder::new(config.week_start);
        let calendar = builder.build_current(clock.as_ref());
        let tickets = TicketBook::new();
        let ledger = SpendingLedger::new();
        let snapshot = compose_snapshot(&calendar, 0.0, &[], &tickets, &ledger);
        Self {
            config,
            clock,
            builder,
            calendar,
            budget_amount: 0.0,
            pay_sources: Vec::new(),
            tickets,
            ledger,
            snapshot,
            watcher: None,
        }
    }

    pub fn with_system_clock(config: EngineConfig) -> Self {
        Self::new(config, Arc::new(SystemClock))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn calendar(&self) -> &CalendarMonth {
        &self.calendar
    }

    pub fn snapshot(&self) -> &BudgetSnapshot {
        &self.snapshot
    }

    pub fn records(&self) -> &[DerivedPerDayRecord] {
        &self.snapshot.records
    }

    pub fn summary(&self) -> &MonthSummary {
        &self.snapshot.summary
    }

    pub fn budget_amount(&self) -> f64 {
        self.budget_amount
    }

    pub fn pay_sources(&self) -> &[PaySource] {
        &self.pay_sources
    }

    pub fn tickets(&self) -> &TicketBook {
        &self.tickets
    }

    pub fn ledger(&self) -> &SpendingLedger {
        &self.ledger
    }

    /// Confirmed spending for `day` of the current month.
    pub fn confirmed_spending(&self, day: u32) -> Option<f64> {
        self.calendar
            .cell(day)
            .and_then(|cell| self.ledger.get(cell.date))
    }

    pub fn set_budget_amount(&mut self, amount: f64) -> Result<()> {
        self.poll_rollover();
        if !is_valid_amount(amount) {
            if self.config.input_policy.is_strict() {
                return Err(EngineError::InvalidInput(format!(
                    "budget amount must be a non-negative number, got {amount}"
                )));
            }
            tracing::warn!(amount, "budget amount clamped to zero");
        }
        self.budget_amount = sanitize_amount(amount);
        self.recompute();
        Ok(())
    }

    /// Replaces the pay source list.
    pub fn set_pay_sources(&mut self, sources: Vec<PaySource>) -> Result<()> {
        self.poll_rollover();
        if self.config.input_policy.is_strict() {
            for source in &sources {
                source.validate()?;
            }
        } else {
            let ignored = sources
                .iter()
                .filter(|source| source.validate().is_err())
                .count();
            if ignored > 0 {
                tracing::warn!(ignored, "pay sources with unusable fields contribute nothing");
            }
        }
        self.pay_sources = sources;
        self.recompute();
        Ok(())
    }

    /// Adds a blank, unassigned ticket and returns its id.
    pub fn add_ticket(&mut self) -> Uuid {
        self.poll_rollover();
        let id = self.tickets.add();
        tracing::debug!(%id, "ticket added");
        self.recompute();
        id
    }

    pub fn update_ticket(&mut self, id: Uuid, patch: TicketPatch) -> Result<()> {
        self.poll_rollover();
        let strict = self.config.input_policy.is_strict();
        if strict {
            self.check_patch(&patch)?;
        }
        match self.tickets.update(id, patch) {
            Ok(ticket) => {
                tracing::debug!(%id, day = ?ticket.day, amount = ticket.amount, "ticket updated");
            }
            Err(err) if !strict => {
                tracing::warn!(%id, error = %err, "ticket update ignored");
                return Ok(());
            }
            Err(err) => return Err(err),
        }
        self.recompute();
        Ok(())
    }

    /// Pins a ticket to `day`, or unassigns it with `None`.
    pub fn assign_ticket_to_day(&mut self, id: Uuid, day: Option<u32>) -> Result<()> {
        self.update_ticket(id, TicketPatch::day(day))
    }

    /// Records actual spending for `day` of the current month, replacing any earlier value.
    pub fn confirm_spending(&mut self, day: u32, amount: f64) -> Result<()> {
        self.poll_rollover();
        let strict = self.config.input_policy.is_strict();
        if strict && !is_valid_amount(amount) {
            return Err(EngineError::InvalidInput(format!(
                "confirmed spending must be a non-negative number, got {amount}"
            )));
        }
        let Some(date) = self.calendar.cell(day).map(|cell| cell.date) else {
            if strict {
                return Err(self.out_of_range(day));
            }
            tracing::warn!(day, month = %self.calendar.year_month, "confirmation outside month ignored");
            return Ok(());
        };
        self.ledger.confirm(date, amount);
        tracing::debug!(%date, amount, "spending confirmed");
        self.recompute();
        Ok(())
    }

    /// Replaces every input at once and recomputes a single time.
    pub fn load_inputs(&mut self, inputs: BudgetInputs) -> Result<()> {
        self.poll_rollover();
        let strict = self.config.input_policy.is_strict();
        if strict {
            if !is_valid_amount(inputs.budget_amount) {
                return Err(EngineError::InvalidInput(
                    "budget amount must be a non-negative number".into(),
                ));
            }
            for source in &inputs.pay_sources {
                source.validate()?;
            }
            for ticket in &inputs.tickets {
                ticket.validate()?;
            }
        }

        let mut ledger = SpendingLedger::new();
        for entry in &inputs.confirmed_spending {
            let date = entry.date.or_else(|| {
                entry
                    .day
                    .and_then(|day| self.calendar.cell(day))
                    .map(|cell| cell.date)
            });
            match date {
                Some(date) => {
                    ledger.confirm(date, entry.amount);
                }
                None if strict => {
                    return Err(EngineError::InvalidInput(
                        "confirmed spending entry needs a date or a day of the current month"
                            .into(),
                    ));
                }
                None => tracing::warn!(day = ?entry.day, "confirmed spending entry ignored"),
            }
        }

        self.budget_amount = sanitize_amount(inputs.budget_amount);
        self.pay_sources = inputs.pay_sources;
        self.tickets = TicketBook::from_tickets(inputs.tickets);
        self.ledger = ledger;
        self.recompute();
        tracing::info!(
            month = %self.calendar.year_month,
            pay_sources = self.pay_sources.len(),
            tickets = self.tickets.len(),
            confirmed = self.ledger.len(),
            "inputs loaded"
        );
        Ok(())
    }

    /// Rebuilds the calendar when the clock has moved to another month.
    ///
    /// Returns whether a rebuild happened.
    pub fn refresh_month(&mut self) -> bool {
        let today = self.clock.today();
        let observed = YearMonth::of(today);
        if observed == self.calendar.year_month {
            return false;
        }
        tracing::info!(from = %self.calendar.year_month, to = %observed, "rebuilding calendar");
        self.calendar = self.builder.build(observed, today);
        self.recompute();
        true
    }

    /// Starts the background rollover poll. Requires a tokio runtime.
    pub fn activate(&mut self) -> Result<()> {
        if self.is_active() {
            return Ok(());
        }
        let watcher = MonthWatcher::spawn(
            Arc::clone(&self.clock),
            self.config.rollover_poll_interval(),
            self.calendar.year_month,
        )?;
        self.watcher = Some(watcher);
        Ok(())
    }

    /// Stops the background poll, if running.
    pub fn deactivate(&mut self) {
        if let Some(watcher) = self.watcher.take() {
            watcher.stop();
        }
    }

    /// True while the rollover poll is running.
    pub fn is_active(&self) -> bool {
        self.watcher
            .as_ref()
            .is_some_and(|watcher| !watcher.is_finished())
    }

    /// Applies a rollover published by the watcher since the last call.
    ///
    /// Every mutation calls this first, so day numbers always resolve against
    /// the month the watcher last reported.
    pub fn poll_rollover(&mut self) -> bool {
        let pending = match self.watcher.as_mut() {
            Some(watcher) if watcher.has_changed() => {
                watcher.mark_seen();
                true
            }
            _ => false,
        };
        pending && self.refresh_month()
    }

    /// Waits for the watcher to report a new month, then rebuilds.
    pub async fn wait_for_rollover(&mut self) -> Result<YearMonth> {
        let watcher = self.watcher.as_mut().ok_or(EngineError::WatcherInactive)?;
        watcher.changed().await?;
        self.refresh_month();
        Ok(self.calendar.year_month)
    }

    fn recompute(&mut self) {
        self.snapshot = compose_snapshot(
            &self.calendar,
            self.budget_amount,
            &self.pay_sources,
            &self.tickets,
            &self.ledger,
        );
    }

    fn out_of_range(&self, day: u32) -> EngineError {
        EngineError::DayOutOfRange {
            day,
            days_in_month: self.calendar.days_in_month,
        }
    }

    fn check_patch(&self, patch: &TicketPatch) -> Result<()> {
        if let Some(amount) = patch.amount {
            if !is_valid_amount(amount) {
                return Err(EngineError::InvalidInput(format!(
                    "ticket amount must be a non-negative number, got {amount}"
                )));
            }
        }
        if let Some(Some(day)) = patch.day {
            if self.calendar.cell(day).is_none() {
                return Err(self.out_of_range(day));
            }
        }
        Ok(())
    }
}
