//! Background polling of shared sensors.
//!
//! Spawns a thread that updates every sensor once per interval and pushes a
//! batch of status snapshots through a bounded channel. Read faults are
//! absorbed by the sensors themselves, so the loop never stops on a bad read.
//!
//! Each `Poller` spawns exactly one thread, shut down and joined on drop.
use crossbeam_channel as xch;
use brew_traits::clock::Clock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use crate::shared::SharedSensor;
use crate::status::StatusSnapshot;

/// Longest single sleep, so shutdown is noticed promptly on long intervals.
const SLEEP_SLICE: Duration = Duration::from_millis(20);

pub struct Poller {
    rx: xch::Receiver<Vec<StatusSnapshot>>,
    cycles: Arc<AtomicU64>,
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl Poller {
    pub fn spawn<C: Clock + Send + Sync + 'static>(
        sensors: Vec<SharedSensor>,
        interval: Duration,
        clock: C,
    ) -> Self {
        let (tx, rx) = xch::bounded(1);
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let cycles = Arc::new(AtomicU64::new(0));
        let cycles_clone = cycles.clone();

        let join_handle = std::thread::spawn(move || {
            loop {
                if shutdown_clone.load(Ordering::Relaxed) {
                    tracing::debug!("poller received shutdown signal");
                    break;
                }

                let batch: Vec<StatusSnapshot> = sensors
                    .iter()
                    .map(|s| {
                        let mut reader = s.lock();
                        reader.update_reading();
                        reader.status_snapshot()
                    })
                    .collect();
                cycles_clone.fetch_add(1, Ordering::Relaxed);

                match tx.try_send(batch) {
                    Ok(()) | Err(xch::TrySendError::Full(_)) => {}
                    Err(xch::TrySendError::Disconnected(_)) => {
                        tracing::debug!("poller consumer disconnected, exiting thread");
                        break;
                    }
                }

                let epoch = clock.now();
                let interval_ms = interval.as_millis() as u64;
                while !shutdown_clone.load(Ordering::Relaxed) {
                    let elapsed = clock.elapsed_ms(epoch);
                    if elapsed >= interval_ms {
                        break;
                    }
                    let left = Duration::from_millis(interval_ms - elapsed);
                    clock.sleep(left.min(SLEEP_SLICE));
                }
            }
            tracing::trace!("poller thread exiting cleanly");
        });

        Self {
            rx,
            cycles,
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// Most recent batch not yet consumed, if any.
    pub fn latest(&self) -> Option<Vec<StatusSnapshot>> {
        self.rx.try_iter().last()
    }

    /// Wait up to `timeout` for the next batch.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Vec<StatusSnapshot>> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Completed poll cycles.
    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => {
                    tracing::trace!("poller thread joined successfully");
                }
                Err(e) => {
                    tracing::warn!(?e, "poller thread panicked during shutdown");
                }
            }
        }
    }
}
