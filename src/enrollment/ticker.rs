//! Tick sources that drive the capture loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Longest uninterrupted sleep; bounds how late an interrupt is noticed.
const POLL_SLICE: Duration = Duration::from_millis(50);

/// A recurring timer.
pub trait Ticker {
    /// Blocks until the next tick is due.
    ///
    /// Returns `false` if the ticker was cancelled or interrupted; no
    /// further ticks will be delivered after that.
    fn wait(&mut self) -> bool;

    /// Arms the timer for a new run; the first tick is one interval away.
    fn start(&mut self);

    /// Clears the timer.
    fn cancel(&mut self);
}

/// Fixed-rate ticker driven by the wall clock.
///
/// The first tick fires one interval after the first `wait`. Deadlines are
/// scheduled from the previous deadline, so slow tick handlers do not cause
/// drift.
#[derive(Debug)]
pub struct IntervalTicker {
    interval: Duration,
    next_due: Option<Instant>,
    interrupt: Arc<AtomicBool>,
    cancelled: bool,
}

impl IntervalTicker {
    pub fn new(interval: Duration) -> Self {
        Self::with_interrupt(interval, Arc::new(AtomicBool::new(false)))
    }

    /// Creates a ticker that stops once `interrupt` is set.
    pub fn with_interrupt(interval: Duration, interrupt: Arc<AtomicBool>) -> Self {
        Self {
            interval,
            next_due: None,
            interrupt,
            cancelled: false,
        }
    }

    /// Shared flag that interrupts the ticker when set.
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupt)
    }

    fn interrupted(&self) -> bool {
        self.interrupt.load(Ordering::SeqCst)
    }
}

impl Ticker for IntervalTicker {
    fn wait(&mut self) -> bool {
        if self.cancelled {
            return false;
        }

        let due = *self
            .next_due
            .get_or_insert_with(|| Instant::now() + self.interval);

        loop {
            if self.interrupted() {
                tracing::debug!("Ticker interrupted");
                return false;
            }
            let now = Instant::now();
            if now >= due {
                break;
            }
            std::thread::sleep((due - now).min(POLL_SLICE));
        }

        self.next_due = Some(due + self.interval);
        true
    }

    fn start(&mut self) {
        self.cancelled = false;
        self.next_due = None;
    }

    fn cancel(&mut self) {
        self.cancelled = true;
        self.next_due = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_are_spaced_by_interval() {
        let interval = Duration::from_millis(10);
        let mut ticker = IntervalTicker::new(interval);

        let start = Instant::now();
        for _ in 0..3 {
            assert!(ticker.wait());
        }
        assert!(start.elapsed() >= interval * 3);
    }

    #[test]
    fn test_cancel_stops_ticks() {
        let mut ticker = IntervalTicker::new(Duration::from_millis(1));
        assert!(ticker.wait());
        ticker.cancel();
        assert!(!ticker.wait());

        ticker.start();
        assert!(ticker.wait());
    }

    #[test]
    fn test_interrupt_stops_waiting() {
        let mut ticker = IntervalTicker::new(Duration::from_secs(60));
        let handle = ticker.interrupt_handle();

        let setter = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            handle.store(true, Ordering::SeqCst);
        });

        let start = Instant::now();
        assert!(!ticker.wait());
        assert!(start.elapsed() < Duration::from_secs(5));
        setter.join().unwrap();
    }
}
