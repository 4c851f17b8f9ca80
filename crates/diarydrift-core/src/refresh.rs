//! Periodic fetch-and-aggregate loop for the home screen.
//!
//! Fetches may overlap when the store is slow. Every fetch takes a ticket when
//! it starts and its result is applied only if no newer result has been
//! applied already, so a late response can never overwrite fresher data.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Issued to a fetch when it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

/// Hands out tickets and remembers the newest one applied.
#[derive(Debug, Default)]
pub struct RefreshSequencer {
    issued: u64,
    applied: Option<u64>,
}

impl RefreshSequencer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            issued: 0,
            applied: None,
        }
    }

    pub fn begin(&mut self) -> RefreshTicket {
        self.issued += 1;
        RefreshTicket(self.issued)
    }

    /// Returns `true` (and records the ticket) when `ticket` is newer than
    /// every ticket accepted so far.
    pub fn accept(&mut self, ticket: RefreshTicket) -> bool {
        if self.applied.is_some_and(|applied| ticket.0 <= applied) {
            return false;
        }
        self.applied = Some(ticket.0);
        true
    }
}

/// Drives `fetch` on a fixed interval until `shutdown` resolves.
#[derive(Debug, Clone, Copy)]
pub struct RefreshLoop {
    interval: Duration,
}

impl RefreshLoop {
    /// A zero interval falls back to one second.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        let interval = if interval.is_zero() {
            Duration::from_secs(1)
        } else {
            interval
        };
        Self { interval }
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Run until `shutdown` completes. The first fetch starts immediately.
    ///
    /// Each fetch runs as its own task; `on_update` sees results in ticket
    /// order, with stale ones dropped. Returns how many results were applied.
    pub async fn run<T, F, Fut, U, S>(&self, mut fetch: F, mut on_update: U, shutdown: S) -> usize
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
        U: FnMut(T),
        S: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut sequencer = RefreshSequencer::new();
        let mut applied = 0;
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    tracing::debug!("Refresh loop stopped after {} updates", applied);
                    break;
                }
                _ = ticker.tick() => {
                    let ticket = sequencer.begin();
                    let tx = tx.clone();
                    let pending = fetch();
                    tokio::spawn(async move {
                        // Receiver gone means the loop already stopped
                        let _ = tx.send((ticket, pending.await));
                    });
                }
                Some((ticket, result)) = rx.recv() => {
                    if sequencer.accept(ticket) {
                        on_update(result);
                        applied += 1;
                    } else {
                        tracing::debug!("Discarding stale refresh result {:?}", ticket);
                    }
                }
            }
        }

        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use tokio::time::sleep;

    #[test]
    fn sequencer_rejects_older_tickets() {
        let mut sequencer = RefreshSequencer::new();
        let first = sequencer.begin();
        let second = sequencer.begin();

        assert!(sequencer.accept(second));
        assert!(!sequencer.accept(first));
        assert!(!sequencer.accept(second));

        let third = sequencer.begin();
        assert!(sequencer.accept(third));
    }

    #[test]
    fn sequencer_accepts_in_order_results() {
        let mut sequencer = RefreshSequencer::new();
        let tickets: Vec<_> = (0..3).map(|_| sequencer.begin()).collect();
        assert!(tickets.into_iter().all(|ticket| sequencer.accept(ticket)));
    }

    #[test]
    fn zero_interval_is_clamped() {
        assert_eq!(
            RefreshLoop::new(Duration::ZERO).interval(),
            Duration::from_secs(1)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn slow_fetch_does_not_overwrite_newer_result() {
        let calls = Arc::new(AtomicU64::new(0));
        let fetch = {
            let calls = Arc::clone(&calls);
            move || {
                let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    // First fetch outlives the second one
                    let delay = match call {
                        1 => 90,
                        2 => 1,
                        _ => 0,
                    };
                    sleep(Duration::from_secs(delay)).await;
                    call
                }
            }
        };

        let mut seen = Vec::new();
        let applied = RefreshLoop::new(Duration::from_secs(60))
            .run(
                fetch,
                |value| seen.push(value),
                sleep(Duration::from_secs(150)),
            )
            .await;

        assert_eq!(seen, vec![2, 3]);
        assert_eq!(applied, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
