//! Discretionary expense items ("tickets") and their assignment to days.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{EngineError, Result},
    utils::{is_valid_amount, lenient, sanitize_amount},
};

pub const DEFAULT_TICKET_NAME: &str = "Ticket";

/// An expense optionally pinned to a day of the current month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseAssignment {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub amount: f64,
    #[serde(default, deserialize_with = "lenient::positive")]
    pub day: Option<u32>,
}

impl ExpenseAssignment {
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount,
            day: None,
        }
    }

    pub fn on_day(mut self, day: u32) -> Self {
        self.day = Some(day);
        self
    }

    pub fn is_assigned(&self) -> bool {
        self.day.is_some()
    }

    pub fn validate(&self) -> Result<()> {
        if is_valid_amount(self.amount) {
            Ok(())
        } else {
            Err(EngineError::InvalidInput(format!(
                "ticket `{}` has an invalid amount",
                self.name
            )))
        }
    }

    fn apply(&mut self, patch: TicketPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(day) = patch.day {
            self.day = day;
        }
    }
}

/// Partial update for a ticket. `day: Some(None)` unassigns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<Option<u32>>,
}

impl TicketPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn amount(amount: f64) -> Self {
        Self {
            amount: Some(amount),
            ..Self::default()
        }
    }

    pub fn day(day: Option<u32>) -> Self {
        Self {
            day: Some(day),
            ..Self::default()
        }
    }
}

/// Ordered collection of tickets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketBook {
    tickets: Vec<ExpenseAssignment>,
}

impl TicketBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tickets(tickets: Vec<ExpenseAssignment>) -> Self {
        Self { tickets }
    }

    /// Appends a blank, unassigned ticket and returns its id.
    pub fn add(&mut self) -> Uuid {
        let ticket = ExpenseAssignment::new(DEFAULT_TICKET_NAME, 0.0);
        let id = ticket.id;
        self.tickets.push(ticket);
        id
    }

    pub fn push(&mut self, ticket: ExpenseAssignment) -> Uuid {
        let id = ticket.id;
        self.tickets.push(ticket);
        id
    }

    pub fn get(&self, id: Uuid) -> Option<&ExpenseAssignment> {
        self.tickets.iter().find(|ticket| ticket.id == id)
    }

    /// Applies `patch` to the ticket with `id`.
    pub fn update(&mut self, id: Uuid, patch: TicketPatch) -> Result<&ExpenseAssignment> {
        let ticket = self
            .tickets
            .iter_mut()
            .find(|ticket| ticket.id == id)
            .ok_or(EngineError::TicketNotFound(id))?;
        ticket.apply(patch);
        Ok(ticket)
    }

    pub fn assign_to_day(&mut self, id: Uuid, day: Option<u32>) -> Result<&ExpenseAssignment> {
        self.update(id, TicketPatch::day(day))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExpenseAssignment> {
        self.tickets.iter()
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    /// Tickets assigned to `day`, in insertion order.
    pub fn on_day(&self, day: u32) -> impl Iterator<Item = &ExpenseAssignment> {
        self.tickets
            .iter()
            .filter(move |ticket| ticket.day == Some(day))
    }

    /// Per-day assigned totals; index `i` is day `i + 1`. Unassigned tickets and
    /// days beyond the month are ignored.
    pub fn assigned_by_day(&self, days_in_month: u32) -> Vec<f64> {
        let mut totals = vec![0.0; days_in_month as usize];
        for ticket in &self.tickets {
            let Some(day) = ticket.day else {
                continue;
            };
            if let Some(slot) = (day as usize)
                .checked_sub(1)
                .and_then(|index| totals.get_mut(index))
            {
                *slot += sanitize_amount(ticket.amount);
            }
        }
        totals
    }
}
