//! # Counter Store Service
//!
//! Owns a [`FileCounterStore`] and the background task that flushes it.
//! The task ticks every `flush_interval` (first tick one period after start),
//! runs each flush on the blocking pool, and stops on [`shutdown`]. The
//! final flush happens in `shutdown`, after the task has exited.
//!
//! [`shutdown`]: CounterStoreService::shutdown

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::{self, JoinHandle};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::adapters::FileCounterStore;
use crate::domain::config::StoreConfig;
use crate::domain::errors::StoreError;
use crate::ports::inbound::CounterStorage;

/// A counter store plus its periodic flusher.
pub struct CounterStoreService {
    store: Arc<FileCounterStore>,
    flush_interval: Duration,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl CounterStoreService {
    /// Open the store described by `config` and start flushing it.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(config: StoreConfig) -> Result<Self, StoreError> {
        let store = Arc::new(FileCounterStore::open(config)?);
        Ok(Self::spawn(store))
    }

    /// Open `path` with default settings and flush every `interval`.
    /// A zero interval means [`DEFAULT_FLUSH_INTERVAL`](crate::DEFAULT_FLUSH_INTERVAL).
    pub fn open(path: impl Into<PathBuf>, interval: Duration) -> Result<Self, StoreError> {
        Self::start(StoreConfig::new(path).with_flush_interval(interval))
    }

    /// Start flushing an already opened store at its configured interval.
    pub fn spawn(store: Arc<FileCounterStore>) -> Self {
        let flush_interval = store.config().effective_flush_interval();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(flush_loop(Arc::clone(&store), flush_interval, shutdown_rx));

        info!(
            path = %store.path().display(),
            interval_ms = flush_interval.as_millis() as u64,
            "[sp-02] Flush task started"
        );

        Self {
            store,
            flush_interval,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        }
    }

    /// The underlying store.
    pub fn file_store(&self) -> &Arc<FileCounterStore> {
        &self.store
    }

    /// Period between background flushes.
    pub fn flush_interval(&self) -> Duration {
        self.flush_interval
    }

    /// Stop the flush task, then flush once more and close the store.
    ///
    /// Every `store` that returned before this call is on disk afterwards,
    /// unless the final write fails, in which case that error is returned.
    pub async fn shutdown(mut self) -> Result<(), StoreError> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.task.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "[sp-02] Flush task ended abnormally");
            }
        }

        let store = Arc::clone(&self.store);
        task::spawn_blocking(move || store.close())
            .await
            .map_err(|e| StoreError::Io(io::Error::other(e)))?
    }
}

impl Drop for CounterStoreService {
    fn drop(&mut self) {
        // Stops the task only; unflushed writes need `shutdown`.
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl CounterStorage for CounterStoreService {
    fn load(&self, key: &str) -> Result<u64, StoreError> {
        self.store.load(key)
    }

    fn store(&self, key: &str, value: u64) -> Result<(), StoreError> {
        self.store.store(key, value)
    }
}

async fn flush_loop(
    store: Arc<FileCounterStore>,
    period: Duration,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = &mut shutdown_rx => {
                debug!("[sp-02] Flush task received shutdown");
                break;
            }
            _ = ticker.tick() => {
                let store = Arc::clone(&store);
                match task::spawn_blocking(move || store.flush()).await {
                    Ok(Ok(outcome)) => debug!(?outcome, "[sp-02] Flush tick"),
                    Ok(Err(StoreError::NotOpen)) => break,
                    // Logged and counted by the store; the next tick retries.
                    Ok(Err(_)) => {}
                    Err(e) => error!(error = %e, "[sp-02] Flush panicked"),
                }
            }
        }
    }
}
