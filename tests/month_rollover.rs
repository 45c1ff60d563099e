mod common;

use std::time::Duration;

use budget_calendar::{EngineConfig, EngineError, PaySource, YearMonth};
use common::{date, view_on, view_with};
use tokio::time;

#[tokio::test(start_paused = true)]
async fn active_view_rebuilds_after_month_change() {
    let (mut view, clock) = view_on(date(2026, 9, 30));
    view.set_pay_sources(vec![PaySource::fixed(900.0, 31)])
        .unwrap();
    view.activate().unwrap();
    assert!(view.is_active());

    clock.set(date(2026, 10, 1));
    let month = time::timeout(Duration::from_secs(2 * 3600), view.wait_for_rollover())
        .await
        .expect("rollover observed within two polls")
        .unwrap();

    assert_eq!(month, YearMonth::new(2026, 10).unwrap());
    assert_eq!(view.summary().days_in_month, 31);
    assert_eq!(view.snapshot().record(31).unwrap().pay_amount, 900.0);
    view.deactivate();
    assert!(!view.is_active());
}

#[tokio::test(start_paused = true)]
async fn poll_rollover_applies_published_month() {
    let config = EngineConfig {
        rollover_poll_secs: 60,
        ..EngineConfig::default()
    };
    let (mut view, clock) = view_with(config, date(2026, 12, 31));
    view.activate().unwrap();
    assert!(!view.poll_rollover());

    clock.advance_days(1);
    time::sleep(Duration::from_secs(90)).await;
    assert!(view.poll_rollover());
    assert_eq!(view.calendar().year_month, YearMonth::new(2027, 1).unwrap());
    assert!(!view.poll_rollover());
}

#[tokio::test(start_paused = true)]
async fn same_month_ticks_publish_nothing() {
    let (mut view, clock) = view_on(date(2026, 10, 1));
    view.activate().unwrap();

    clock.set(date(2026, 10, 31));
    time::sleep(Duration::from_secs(5 * 3600)).await;
    assert!(!view.poll_rollover());
    assert_eq!(view.calendar().today().unwrap().day_number, 1);
}

#[tokio::test]
async fn waiting_requires_activation() {
    let (mut view, _) = view_on(date(2026, 10, 1));
    let err = view.wait_for_rollover().await.unwrap_err();
    assert!(matches!(err, EngineError::WatcherInactive));
}

#[tokio::test(start_paused = true)]
async fn activating_twice_keeps_one_watcher() {
    let (mut view, _) = view_on(date(2026, 10, 1));
    view.activate().unwrap();
    view.activate().unwrap();
    assert!(view.is_active());
    view.deactivate();
    view.deactivate();
    assert!(!view.is_active());
}

#[tokio::test(start_paused = true)]
async fn mutations_apply_an_observed_rollover_first() {
    let (mut view, clock) = view_on(date(2026, 9, 30));
    view.set_budget_amount(3100.0).unwrap();
    view.activate().unwrap();

    clock.set(date(2026, 10, 1));
    time::sleep(Duration::from_secs(3 * 3600)).await;
    view.confirm_spending(5, 40.0).unwrap();

    assert_eq!(view.calendar().year_month, YearMonth::new(2026, 10).unwrap());
    assert_eq!(view.ledger().get(date(2026, 10, 5)), Some(40.0));
    assert_eq!(view.ledger().get(date(2026, 9, 5)), None);
    assert_eq!(view.summary().daily_budget, 100.0);
    assert_eq!(view.snapshot().record(5).unwrap().remaining_budget, Some(60.0));
}
