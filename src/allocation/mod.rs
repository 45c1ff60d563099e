//! Even daily allocation of the monthly budget and per-day remaining amounts.

use serde::Serialize;

use crate::utils::sanitize_amount;

/// Result of allocating a month's budget across its days.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Allocation {
    pub budget_amount: f64,
    /// Even share of the budget for each non-padding day.
    pub daily_budget: f64,
    /// `remaining[i]` for day `i + 1`; never negative.
    pub remaining: Vec<f64>,
    pub total_assigned: f64,
    pub total_confirmed_spending: f64,
    /// Budget minus confirmed spending; ignores ticket assignments.
    pub overall_remaining: f64,
    /// Budget left after all assigned tickets, spread evenly over the month.
    pub average_unassigned_per_day: f64,
}

impl Allocation {
    pub fn remaining_on(&self, day: u32) -> Option<f64> {
        (day as usize)
            .checked_sub(1)
            .and_then(|index| self.remaining.get(index))
            .copied()
    }
}

pub struct AllocationEngine;

impl AllocationEngine {
    /// Allocates `budget_amount` over the month described by `assigned`.
    ///
    /// `assigned[i]` and `confirmed[i]` belong to day `i + 1`; the month length is
    /// `assigned.len()`. Missing `confirmed` entries count as unset. Tickets and
    /// confirmed spending are independent debits against the same daily share.
    pub fn allocate(budget_amount: f64, assigned: &[f64], confirmed: &[Option<f64>]) -> Allocation {
        let budget_amount = sanitize_amount(budget_amount);
        let days = assigned.len();

        let daily_budget = if days == 0 {
            0.0
        } else {
            budget_amount / days as f64
        };

        let remaining: Vec<f64> = assigned
            .iter()
            .enumerate()
            .map(|(index, assigned)| {
                let spent = confirmed
                    .get(index)
                    .copied()
                    .flatten()
                    .map(sanitize_amount)
                    .unwrap_or(0.0);
                (daily_budget - sanitize_amount(*assigned) - spent).max(0.0)
            })
            .collect();

        let total_assigned: f64 = assigned.iter().copied().map(sanitize_amount).sum();
        let total_confirmed_spending: f64 = confirmed
            .iter()
            .take(days)
            .flatten()
            .copied()
            .map(sanitize_amount)
            .sum();
        let overall_remaining = (budget_amount - total_confirmed_spending).max(0.0);
        let average_unassigned_per_day = if days == 0 {
            0.0
        } else {
            (budget_amount - total_assigned).max(0.0) / days as f64
        };

        tracing::debug!(
            budget_amount,
            days,
            daily_budget,
            total_assigned,
            total_confirmed_spending,
            "allocated monthly budget"
        );

        Allocation {
            budget_amount,
            daily_budget,
            remaining,
            total_assigned,
            total_confirmed_spending,
            overall_remaining,
            average_unassigned_per_day,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month_with(days: usize, entries: &[(u32, f64)]) -> Vec<f64> {
        let mut values = vec![0.0; days];
        for (day, amount) in entries {
            values[*day as usize - 1] += amount;
        }
        values
    }

    fn confirmed_with(days: usize, entries: &[(u32, f64)]) -> Vec<Option<f64>> {
        let mut values = vec![None; days];
        for (day, amount) in entries {
            values[*day as usize - 1] = Some(*amount);
        }
        values
    }

    #[test]
    fn budget_is_split_evenly() {
        let allocation = AllocationEngine::allocate(3000.0, &month_with(30, &[]), &[]);
        assert_eq!(allocation.daily_budget, 100.0);
        assert!(allocation.remaining.iter().all(|value| *value == 100.0));
        assert_eq!(allocation.remaining.iter().sum::<f64>(), 3000.0);
    }

    #[test]
    fn ticket_reduces_its_day() {
        let assigned = month_with(30, &[(5, 40.0)]);
        let allocation = AllocationEngine::allocate(3000.0, &assigned, &confirmed_with(30, &[]));
        assert_eq!(allocation.remaining_on(5), Some(60.0));
        assert_eq!(allocation.remaining_on(6), Some(100.0));
        assert_eq!(allocation.total_assigned, 40.0);
    }

    #[test]
    fn confirmed_spending_is_an_additional_debit_and_clamps() {
        let assigned = month_with(30, &[(5, 40.0)]);
        let confirmed = confirmed_with(30, &[(5, 70.0), (6, 30.0)]);
        let allocation = AllocationEngine::allocate(3000.0, &assigned, &confirmed);
        assert_eq!(allocation.remaining_on(5), Some(0.0));
        assert_eq!(allocation.remaining_on(6), Some(70.0));
        assert!(allocation.remaining.iter().all(|value| *value >= 0.0));
    }

    #[test]
    fn overall_remaining_ignores_tickets() {
        let assigned = month_with(30, &[(1, 500.0), (2, 250.0)]);
        let confirmed = confirmed_with(30, &[(3, 120.0), (4, 30.0)]);
        let allocation = AllocationEngine::allocate(3000.0, &assigned, &confirmed);
        assert_eq!(allocation.total_confirmed_spending, 150.0);
        assert_eq!(allocation.overall_remaining, 2850.0);

        let overspent = AllocationEngine::allocate(100.0, &assigned, &confirmed);
        assert_eq!(overspent.overall_remaining, 0.0);
    }

    #[test]
    fn average_unassigned_spreads_what_tickets_leave() {
        let assigned = month_with(30, &[(1, 600.0)]);
        let allocation = AllocationEngine::allocate(3000.0, &assigned, &[]);
        assert_eq!(allocation.average_unassigned_per_day, 80.0);

        let allocation = AllocationEngine::allocate(300.0, &assigned, &[]);
        assert_eq!(allocation.average_unassigned_per_day, 0.0);
    }

    #[test]
    fn remaining_never_exceeds_budget() {
        let assigned = month_with(31, &[(3, 10.0), (9, 250.0)]);
        let confirmed = confirmed_with(31, &[(3, 5.0), (20, 1.0)]);
        let allocation = AllocationEngine::allocate(1234.56, &assigned, &confirmed);
        assert!(allocation.remaining.iter().sum::<f64>() <= 1234.56 + 1e-9);
    }

    #[test]
    fn degenerate_month_yields_zeroes() {
        let allocation = AllocationEngine::allocate(3000.0, &[], &[Some(10.0)]);
        assert_eq!(allocation.daily_budget, 0.0);
        assert!(allocation.remaining.is_empty());
        assert_eq!(allocation.total_confirmed_spending, 0.0);
        assert_eq!(allocation.average_unassigned_per_day, 0.0);
    }

    #[test]
    fn negative_budget_is_treated_as_zero() {
        let allocation = AllocationEngine::allocate(-500.0, &month_with(28, &[]), &[]);
        assert_eq!(allocation.budget_amount, 0.0);
        assert_eq!(allocation.daily_budget, 0.0);
        assert_eq!(allocation.overall_remaining, 0.0);
    }
}
