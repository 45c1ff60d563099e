use std::{sync::Arc, time::Duration};

use tokio::{
    runtime::Handle,
    sync::watch,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};

use crate::{
    calendar::{Clock, YearMonth},
    errors::{EngineError, Result},
};

/// Background poll that publishes the wall-clock month whenever it changes.
///
/// The task is aborted when the watcher is stopped or dropped.
pub struct MonthWatcher {
    handle: JoinHandle<()>,
    receiver: watch::Receiver<YearMonth>,
}

impl MonthWatcher {
    /// Starts polling `clock` every `every` on the current tokio runtime.
    pub fn spawn(clock: Arc<dyn Clock>, every: Duration, observed: YearMonth) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| EngineError::NoRuntime)?;
        let (sender, receiver) = watch::channel(observed);
        let handle = runtime.spawn(poll_clock(clock, every, sender));
        tracing::info!(month = %observed, interval_secs = every.as_secs(), "month watcher started");
        Ok(Self { handle, receiver })
    }

    /// True when a month change was published and not yet acknowledged.
    pub fn has_changed(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }

    /// Acknowledges the latest month and returns it.
    pub fn mark_seen(&mut self) -> YearMonth {
        *self.receiver.borrow_and_update()
    }

    /// Waits for the next published month change.
    pub async fn changed(&mut self) -> Result<YearMonth> {
        self.receiver
            .changed()
            .await
            .map_err(|_| EngineError::WatcherStopped)?;
        Ok(self.mark_seen())
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn stop(self) {
        // Drop aborts the task.
    }
}

impl Drop for MonthWatcher {
    fn drop(&mut self) {
        self.handle.abort();
        tracing::info!("month watcher stopped");
    }
}

async fn poll_clock(clock: Arc<dyn Clock>, every: Duration, sender: watch::Sender<YearMonth>) {
    let mut ticker = time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;
    loop {
        ticker.tick().await;
        if sender.is_closed() {
            break;
        }
        let observed = clock.current_month();
        let rolled_over = sender.send_if_modified(|current| {
            if *current == observed {
                false
            } else {
                *current = observed;
                true
            }
        });
        if rolled_over {
            tracing::info!(month = %observed, "month rollover observed");
        }
    }
}
