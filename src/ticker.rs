//! One-second driver for a running timer session.

use std::{sync::Arc, time::Duration};
use tokio::{sync::Mutex, task::JoinHandle, time};
use tracing::debug;

use crate::journal::Journal;
use crate::timer::now_ms;

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Owns the repeating tick task. Dropping the guard aborts the task, so every
/// path that discards it (stop, save, discard, shutdown) releases the task.
#[derive(Debug)]
pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    pub fn spawn(journal: Arc<Mutex<Journal>>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = time::interval(TICK_PERIOD);
            interval.set_missed_tick_behavior(time::MissedTickBehavior::Skip);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if !journal.lock().await.tick_timer(now_ms()) {
                    debug!("timer no longer running, ticker exiting");
                    break;
                }
            }
        });
        debug!("ticker started");
        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerPhase;

    #[tokio::test(start_paused = true)]
    async fn ticker_advances_elapsed_and_stops_with_timer() {
        let journal = Arc::new(Mutex::new(Journal::new(now_ms())));
        // Elapsed time follows the wall clock, so start the session in the past.
        journal.lock().await.open_timer(now_ms() - 10_000);
        assert_eq!(journal.lock().await.timer().session().unwrap().elapsed_seconds, 0);
        let ticker = Ticker::spawn(Arc::clone(&journal));

        time::sleep(Duration::from_millis(3_500)).await;
        assert!(!ticker.is_finished());
        let elapsed = journal.lock().await.timer().session().unwrap().elapsed_seconds;
        assert!(elapsed >= 10, "elapsed was {elapsed}");

        journal.lock().await.discard_timer();
        time::sleep(Duration::from_millis(1_500)).await;
        assert!(ticker.is_finished());
        assert_eq!(journal.lock().await.timer().phase(), TimerPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_guard_aborts_the_task() {
        let journal = Arc::new(Mutex::new(Journal::new(now_ms())));
        journal.lock().await.open_timer(now_ms());
        let ticker = Ticker::spawn(Arc::clone(&journal));
        drop(ticker);

        time::sleep(Duration::from_millis(1_100)).await;
        // Only the test's handle remains once the aborted task drops its clone.
        assert_eq!(Arc::strong_count(&journal), 1);
    }
}
