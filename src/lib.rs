#![doc(test(attr(deny(warnings))))]

//! Budget Calendar turns a monthly budget, income sources, and expense tickets
//! into a per-day calendar of pay, assigned spending, and remaining allowance.

pub mod allocation;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod currency;
pub mod errors;
pub mod income;
pub mod spending;
pub mod tickets;
pub mod utils;
pub mod view;

pub use allocation::{Allocation, AllocationEngine};
pub use calendar::{CalendarBuilder, CalendarMonth, Clock, DayCell, WeekStart, YearMonth};
pub use config::{EngineConfig, InputPolicy};
pub use errors::{EngineError, Result};
pub use income::{PayScheduleProjector, PaySource};
pub use spending::SpendingLedger;
pub use tickets::{ExpenseAssignment, TicketBook, TicketPatch};
pub use view::{BudgetInputs, BudgetSnapshot, BudgetView, DerivedPerDayRecord, MonthSummary};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Budget Calendar tracing initialized.");
    });
}
