#![allow(dead_code)]

use std::{path::PathBuf, sync::Arc};

use budget_calendar::{calendar::ManualClock, BudgetView, EngineConfig};
use chrono::NaiveDate;
use tempfile::TempDir;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// A view with default settings whose clock is pinned to `today`.
pub fn view_on(today: NaiveDate) -> (BudgetView, Arc<ManualClock>) {
    view_with(EngineConfig::default(), today)
}

pub fn view_with(config: EngineConfig, today: NaiveDate) -> (BudgetView, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(today));
    (BudgetView::new(config, clock.clone()), clock)
}

/// Writes `contents` into a fresh temp directory; keep the guard alive while the file is used.
pub fn write_temp_file(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().join(name);
    std::fs::write(&path, contents).expect("write temp file");
    (temp, path)
}
