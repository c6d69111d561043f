use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::board::{FetchOutcome, OrderBoard};

/// Something refreshed on every poll tick.
#[async_trait]
pub trait PollTarget: Send + Sync + 'static {
    async fn poll(&self) -> FetchOutcome;
}

#[async_trait]
impl PollTarget for OrderBoard {
    async fn poll(&self) -> FetchOutcome {
        self.fetch_orders().await
    }
}

/// Fixed-interval poller.
///
/// The first tick fires immediately. Each tick runs on its own task, so a
/// slow fetch never delays the schedule; the target decides whether an
/// overlapping tick does anything.
pub struct OrderPoller {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl OrderPoller {
    pub fn spawn(target: Arc<dyn PollTarget>, every: Duration) -> Self {
        let (shutdown, mut stop_rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            info!(interval_ms = every.as_millis() as u64, "order_poller_started");
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let target = target.clone();
                        tokio::spawn(async move {
                            let outcome = target.poll().await;
                            debug!(?outcome, "poll_tick");
                        });
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            info!("order_poller_stopped");
        });
        Self { shutdown, handle }
    }

    /// Stop ticking. A fetch already running is left to finish on its own.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }
}
