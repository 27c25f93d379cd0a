//! Background eviction of idle rate limiter entries

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::registry::RateLimiterRegistry;

const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// Periodically sweeps a set of registries until shut down.
///
/// Dropping the sweeper also signals the task to stop; `shutdown` additionally
/// waits for it to finish.
pub struct EvictionSweeper {
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl EvictionSweeper {
    /// Start sweeping `registries` every `interval` on the current runtime
    pub fn spawn(registries: Vec<Arc<RateLimiterRegistry>>, interval: Duration) -> Self {
        let interval = interval.max(MIN_INTERVAL);
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            tracing::info!(
                interval_secs = interval.as_secs_f64(),
                registries = registries.len(),
                "Rate limiter eviction sweeper started"
            );

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        Self::run_once(&registries);
                    }
                }
            }

            tracing::info!("Rate limiter eviction sweeper stopped");
        });

        Self {
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    /// Sweep every registry once; returns the total number of evicted entries
    pub fn run_once(registries: &[Arc<RateLimiterRegistry>]) -> usize {
        registries.iter().map(|registry| registry.sweep_idle()).sum()
    }

    /// Whether the background task has exited
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Signal the task to stop and wait for it
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Eviction sweeper task ended abnormally");
            }
        }
    }
}

impl Drop for EvictionSweeper {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
