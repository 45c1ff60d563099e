mod common;

use budget_calendar::{
    BudgetInputs, EngineConfig, EngineError, InputPolicy, PaySource, TicketPatch, WeekStart,
    YearMonth,
};
use common::{date, view_on, view_with};

fn paydays(view: &budget_calendar::BudgetView) -> Vec<(u32, f64)> {
    view.records()
        .iter()
        .filter(|record| !record.day.is_padding && record.pay_amount > 0.0)
        .map(|record| (record.day.day_number, record.pay_amount))
        .collect()
}

#[test]
fn grid_is_whole_weeks_with_every_day_once() {
    let (view, _) = view_on(date(2026, 2, 14));
    let records = view.records();
    assert_eq!(records.len() % 7, 0);
    let days: Vec<u32> = records
        .iter()
        .filter(|record| !record.day.is_padding)
        .map(|record| record.day.day_number)
        .collect();
    assert_eq!(days, (1..=28).collect::<Vec<_>>());
    assert_eq!(view.summary().title, "February 2026");
}

#[test]
fn assigned_amount_sums_tickets_per_day() {
    let (mut view, _) = view_on(date(2026, 9, 1));
    for amount in [15.0, 25.0] {
        let id = view.add_ticket();
        view.update_ticket(
            id,
            TicketPatch {
                amount: Some(amount),
                day: Some(Some(12)),
                ..TicketPatch::default()
            },
        )
        .unwrap();
    }
    let loose = view.add_ticket();
    view.update_ticket(loose, TicketPatch::amount(99.0)).unwrap();

    let record = view.snapshot().record(12).unwrap();
    assert_eq!(record.assigned_amount, 40.0);
    assert_eq!(record.ticket_ids.len(), 2);
    assert_eq!(view.summary().total_assigned, 40.0);
}

#[test]
fn fixed_pay_lands_on_its_anchor_day() {
    let (mut view, _) = view_on(date(2026, 9, 1));
    view.set_pay_sources(vec![PaySource::fixed(1800.0, 15)])
        .unwrap();
    assert_eq!(paydays(&view), vec![(15, 1800.0)]);
    assert_eq!(view.summary().total_pay, 1800.0);
}

#[test]
fn interval_pay_repeats_every_step_inside_the_month() {
    let (mut view, _) = view_on(date(2026, 9, 1));
    view.set_pay_sources(vec![PaySource::interval(500.0, 2, 3)])
        .unwrap();
    assert_eq!(paydays(&view), vec![(3, 500.0), (17, 500.0)]);
}

#[test]
fn sources_accumulate_on_shared_days() {
    let (mut view, _) = view_on(date(2026, 9, 1));
    view.set_pay_sources(vec![
        PaySource::fixed_on_days(1000.0, &[1, 15]),
        PaySource::hourly(40.0, 25.0, None),
    ])
    .unwrap();
    let days = paydays(&view);
    assert_eq!(days.len(), 2);
    assert_eq!(days[0].0, 1);
    assert!((days[0].1 - (1000.0 + 40.0 * 25.0 * 52.0 / 12.0)).abs() < 1e-9);
    assert_eq!(days[1], (15, 1000.0));
}

#[test]
fn ticket_and_confirmation_reduce_daily_remaining() {
    let (mut view, _) = view_on(date(2026, 9, 1));
    view.set_budget_amount(3000.0).unwrap();
    assert_eq!(view.summary().daily_budget, 100.0);

    let id = view.add_ticket();
    view.update_ticket(id, TicketPatch::amount(40.0)).unwrap();
    view.assign_ticket_to_day(id, Some(5)).unwrap();
    assert_eq!(view.snapshot().record(5).unwrap().remaining_budget, Some(60.0));

    view.confirm_spending(5, 70.0).unwrap();
    assert_eq!(view.snapshot().record(5).unwrap().remaining_budget, Some(0.0));
    assert_eq!(view.confirmed_spending(5), Some(70.0));
    assert!(view
        .records()
        .iter()
        .filter_map(|record| record.remaining_budget)
        .all(|remaining| remaining >= 0.0));
}

#[test]
fn overall_remaining_ignores_tickets() {
    let (mut view, _) = view_on(date(2026, 9, 1));
    view.set_budget_amount(3000.0).unwrap();
    let id = view.add_ticket();
    view.update_ticket(id, TicketPatch::amount(500.0)).unwrap();
    view.assign_ticket_to_day(id, Some(3)).unwrap();
    let unassigned = view.add_ticket();
    view.update_ticket(unassigned, TicketPatch::amount(250.0))
        .unwrap();
    assert_eq!(view.summary().overall_remaining, 3000.0);

    view.confirm_spending(3, 120.0).unwrap();
    view.confirm_spending(4, 80.0).unwrap();
    assert_eq!(view.summary().total_confirmed_spending, 200.0);
    assert_eq!(view.summary().overall_remaining, 2800.0);
}

#[test]
fn confirming_twice_leaves_identical_state() {
    let (mut view, _) = view_on(date(2026, 9, 1));
    view.set_budget_amount(3000.0).unwrap();
    view.confirm_spending(8, 33.0).unwrap();
    let ledger = view.ledger().clone();
    let snapshot = view.snapshot().clone();

    view.confirm_spending(8, 33.0).unwrap();
    assert_eq!(view.ledger(), &ledger);
    assert_eq!(view.snapshot(), &snapshot);
}

#[test]
fn rebuilding_the_same_month_is_deterministic() {
    let (first, _) = view_on(date(2026, 9, 10));
    let (second, _) = view_on(date(2026, 9, 10));
    assert_eq!(first.snapshot(), second.snapshot());
}

#[test]
fn confirmed_spending_stays_with_its_month() {
    let (mut view, clock) = view_on(date(2026, 9, 20));
    view.set_budget_amount(3000.0).unwrap();
    view.confirm_spending(5, 45.0).unwrap();

    clock.set(date(2026, 10, 2));
    assert!(view.refresh_month());
    assert_eq!(view.calendar().year_month, YearMonth::new(2026, 10).unwrap());
    assert_eq!(view.confirmed_spending(5), None);
    assert_eq!(view.summary().total_confirmed_spending, 0.0);
    assert_eq!(view.ledger().len(), 1);

    view.confirm_spending(5, 10.0).unwrap();
    assert_eq!(view.ledger().len(), 2);
    assert_eq!(view.ledger().get(date(2026, 9, 5)), Some(45.0));
}

#[test]
fn rollover_reprojects_income_for_the_new_month() {
    let (mut view, clock) = view_on(date(2026, 9, 30));
    view.set_pay_sources(vec![PaySource::fixed(900.0, 31)])
        .unwrap();
    assert!(paydays(&view).is_empty());

    clock.advance_days(1);
    assert!(view.refresh_month());
    assert_eq!(paydays(&view), vec![(31, 900.0)]);
    assert_eq!(view.calendar().today().unwrap().day_number, 1);
}

#[test]
fn monday_start_shifts_leading_padding() {
    let config = EngineConfig {
        week_start: WeekStart::Monday,
        ..EngineConfig::default()
    };
    let (view, _) = view_with(config, date(2026, 10, 16));
    // October 2026 opens on a Thursday.
    assert_eq!(view.calendar().leading_padding, 3);
    assert_eq!(view.records()[0].day.weekday_name, "Mon");
}

#[test]
fn load_inputs_accepts_form_style_values() {
    let (mut view, _) = view_on(date(2026, 9, 10));
    let inputs: BudgetInputs = serde_json::from_str(
        r#"{
            "budget_amount": "3000",
            "pay_sources": [
                {"type": "fixed", "amount": "1200", "anchor_day": "1", "extra_days": "15"},
                {"type": "interval", "amount": "abc", "interval_weeks": 2, "anchor_day": 4}
            ],
            "tickets": [
                {"name": "Groceries", "amount": "40", "day": "5"},
                {"name": "Someday", "amount": ""}
            ],
            "confirmed_spending": [
                {"day": 5, "amount": 70},
                {"date": "2026-08-05", "amount": 12}
            ]
        }"#,
    )
    .unwrap();
    view.load_inputs(inputs).unwrap();

    assert_eq!(view.budget_amount(), 3000.0);
    assert_eq!(paydays(&view), vec![(1, 1200.0), (15, 1200.0)]);
    assert_eq!(view.tickets().len(), 2);
    let record = view.snapshot().record(5).unwrap();
    assert_eq!(record.assigned_amount, 40.0);
    assert_eq!(record.confirmed_spending, Some(70.0));
    assert_eq!(record.remaining_budget, Some(0.0));
    assert_eq!(view.summary().total_confirmed_spending, 70.0);
    assert_eq!(view.ledger().len(), 2);
}

#[test]
fn strict_load_rejects_unparseable_amounts() {
    let config = EngineConfig {
        input_policy: InputPolicy::Strict,
        ..EngineConfig::default()
    };
    let (mut view, _) = view_with(config, date(2026, 9, 10));
    let inputs: BudgetInputs = serde_json::from_str(
        r#"{"budget_amount": 100, "tickets": [{"name": "Bad", "amount": "ten"}]}"#,
    )
    .unwrap();
    let err = view.load_inputs(inputs).unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
    assert!(view.tickets().is_empty());
    assert_eq!(view.budget_amount(), 0.0);
}

#[test]
fn average_unassigned_reflects_remaining_allowance() {
    let (mut view, _) = view_on(date(2026, 9, 10));
    view.set_budget_amount(3000.0).unwrap();
    let id = view.add_ticket();
    view.update_ticket(
        id,
        TicketPatch {
            amount: Some(300.0),
            day: Some(Some(1)),
            ..TicketPatch::default()
        },
    )
    .unwrap();
    let summary = view.summary();
    let expected = (3000.0 - 300.0) / 30.0;
    assert!((summary.average_unassigned_per_day - expected).abs() < 1e-9);
}
