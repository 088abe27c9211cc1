use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use dashmap::{DashMap, DashSet};
use parking_lot::Mutex;
use sp_telemetry::metric_inc;
use sp_telemetry::metrics::{
    HistogramTimer, STORE_FLUSHES, STORE_FLUSH_DURATION, STORE_RECOVERED_RECORDS,
};
use tracing::{debug, error, info, warn};

#[cfg(feature = "locking")]
use super::lock::StoreLock;
use crate::algorithms::{encode_record, recover, RecoveredCounters};
use crate::domain::config::{FlushMode, StoreConfig};
use crate::domain::errors::StoreError;
use crate::domain::record::CounterRecord;
use crate::domain::stats::{FlushOutcome, FlushStats, RecoveryReport};
use crate::ports::inbound::CounterStorage;

/// File-backed counter store.
///
/// `load`/`store` work on a `DashMap` only. [`flush`](Self::flush) moves the
/// map to disk and is driven by [`CounterStoreService`](crate::CounterStoreService)
/// on a timer; [`close`](Self::close) performs the final flush.
///
/// Concurrency:
/// - `dirty` is set by `store` after the map write and cleared by a flush
///   *before* it serializes, so a racing `store` always leaves it set.
/// - The reusable write buffer is the in-flight guard: a flush that cannot
///   take it, or finds it non-empty, skips the cycle.
pub struct FileCounterStore {
    config: StoreConfig,
    counters: DashMap<String, u64>,
    /// Keys changed since the last flush (incremental mode only).
    pending: DashSet<String>,
    dirty: AtomicBool,
    /// Set after a failed append, which may have left a partial line.
    needs_compaction: AtomicBool,
    closed: AtomicBool,
    buffer: Mutex<Vec<u8>>,
    /// Append handle; replaced after every snapshot rename.
    file: Mutex<Option<File>>,
    file_len: AtomicU64,
    #[cfg(feature = "locking")]
    lock: Mutex<Option<StoreLock>>,
    stats: FlushStats,
    recovery: RecoveryReport,
}

impl FileCounterStore {
    /// Open (creating if absent) the counter file and replay it.
    ///
    /// A last line without its newline is kept if it parses and dropped as
    /// a torn write otherwise. Either way the file is then rewritten as a
    /// clean snapshot of the recovered map. In snapshot mode the same
    /// happens to files holding duplicate, blank or malformed lines. If that
    /// rewrite fails the store still opens and the first flush retries it.
    ///
    /// # Errors
    ///
    /// `InvalidConfig`, `Locked`, or `Io` if the file cannot be opened.
    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        config.validate()?;

        #[cfg(feature = "locking")]
        let lock = if config.lock_file {
            Some(StoreLock::acquire(&config.lock_path())?)
        } else {
            None
        };
        #[cfg(not(feature = "locking"))]
        if config.lock_file {
            warn!(path = %config.path.display(), "[sp-02] Built without `locking`; lock_file ignored");
        }

        let file = open_data_file(&config.path)?;
        let file_len = file.metadata()?.len();
        let RecoveredCounters { counters, report } = recover(BufReader::new(&file), config.split);

        STORE_RECOVERED_RECORDS.set(report.records as i64);
        info!(
            path = %config.path.display(),
            records = report.records,
            lines = report.lines,
            skipped = report.skipped,
            unterminated_tail = report.unterminated_tail,
            torn_tail = report.torn_tail,
            mode = ?config.mode,
            "[sp-02] 💾 Counter store recovered"
        );

        // Snapshot files hold one line per key; anything else is rewritten.
        let normalise = report.read_error.is_none()
            && (report.unterminated_tail
                || (config.mode == FlushMode::Snapshot && report.lines != report.records));
        let store = Self {
            counters: counters.into_iter().collect(),
            pending: DashSet::new(),
            dirty: AtomicBool::new(false),
            needs_compaction: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            buffer: Mutex::new(Vec::new()),
            file: Mutex::new(Some(file)),
            file_len: AtomicU64::new(file_len),
            #[cfg(feature = "locking")]
            lock: Mutex::new(lock),
            stats: FlushStats::default(),
            recovery: report,
            config,
        };

        if normalise {
            warn!(path = %store.config.path.display(), "[sp-02] Normalising counter file to a single snapshot");
            if let Err(e) = store.compact() {
                warn!(
                    path = %store.config.path.display(),
                    error = %e,
                    "[sp-02] Normalising rewrite failed, deferring to first flush"
                );
                store.needs_compaction.store(true, Ordering::Release);
                store.dirty.store(true, Ordering::Release);
            }
        }
        Ok(store)
    }

    /// Latest value for `key`. Never touches disk.
    pub fn load(&self, key: &str) -> Result<u64, StoreError> {
        self.ensure_open()?;
        self.counters
            .get(key)
            .map(|v| *v)
            .ok_or_else(|| StoreError::NotRegistered {
                key: key.to_string(),
            })
    }

    /// Upsert `key` and mark the store dirty. Never touches disk.
    pub fn store(&self, key: &str, value: u64) -> Result<(), StoreError> {
        self.ensure_open()?;
        self.counters.insert(key.to_string(), value);
        if self.config.mode == FlushMode::Incremental {
            self.pending.insert(key.to_string());
        }
        self.dirty.store(true, Ordering::Release);
        Ok(())
    }

    /// Run one flush cycle.
    ///
    /// Returns `Clean` without touching the file when nothing changed, and
    /// `InFlight` when another flush holds the buffer. A failed write leaves
    /// the store dirty so the next cycle retries it.
    pub fn flush(&self) -> Result<FlushOutcome, StoreError> {
        self.ensure_open()?;
        let Some(mut buf) = self.buffer.try_lock() else {
            return Ok(self.finish(FlushOutcome::InFlight));
        };
        // `close` may have run since the first check and released the lock.
        self.ensure_open()?;
        self.flush_locked(&mut buf, false)
    }

    /// Rewrite the file as a single snapshot, dirty or not.
    pub fn compact(&self) -> Result<FlushOutcome, StoreError> {
        self.ensure_open()?;
        let mut buf = self.buffer.lock();
        self.ensure_open()?;
        self.flush_locked(&mut buf, true)
    }

    /// Final flush, then release the file and its lock.
    ///
    /// Later `load`/`store` calls return `NotOpen`. Closing twice is a no-op.
    /// The store is closed even if the final flush fails.
    pub fn close(&self) -> Result<(), StoreError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        let result = {
            let mut buf = self.buffer.lock();
            self.flush_locked(&mut buf, false)
        };
        self.file.lock().take();
        #[cfg(feature = "locking")]
        self.lock.lock().take();

        match result {
            Ok(outcome) => {
                info!(path = %self.config.path.display(), ?outcome, "[sp-02] Counter store closed");
                Ok(())
            }
            Err(e) => {
                error!(path = %self.config.path.display(), error = %e, "[sp-02] Final flush failed, unflushed counters lost");
                Err(e)
            }
        }
    }

    fn flush_locked(&self, buf: &mut Vec<u8>, force_snapshot: bool) -> Result<FlushOutcome, StoreError> {
        if !buf.is_empty() {
            return Ok(self.finish(FlushOutcome::InFlight));
        }
        let was_dirty = self.dirty.swap(false, Ordering::AcqRel);
        if !was_dirty && !force_snapshot {
            return Ok(self.finish(FlushOutcome::Clean));
        }

        let repair = self.needs_compaction.swap(false, Ordering::AcqRel);
        let compact = force_snapshot
            || repair
            || self.config.mode == FlushMode::Snapshot
            || self.over_threshold();

        // Unflag before reading values so a racing store re-flags its key.
        let taken: Vec<String> = self.pending.iter().map(|k| k.key().clone()).collect();
        for key in &taken {
            self.pending.remove(key);
        }

        let split = self.config.split;
        let mut records = 0;
        if compact {
            for entry in self.counters.iter() {
                records += self.encode(buf, entry.key(), *entry.value(), split);
            }
        } else {
            for key in &taken {
                if let Some(value) = self.counters.get(key) {
                    records += self.encode(buf, key, *value, split);
                }
            }
        }

        if buf.is_empty() && !compact {
            return Ok(self.finish(FlushOutcome::Clean));
        }

        let result = {
            let _timer = HistogramTimer::new(&STORE_FLUSH_DURATION);
            if compact {
                self.write_snapshot(buf)
            } else {
                self.append(buf)
            }
        };
        let bytes = buf.len();
        buf.clear();

        match result {
            Ok(()) => {
                let outcome = FlushOutcome::Written {
                    records,
                    bytes,
                    compacted: compact,
                };
                debug!(records, bytes, compacted = compact, "[sp-02] Flushed counters");
                Ok(self.finish(outcome))
            }
            Err(e) => {
                if was_dirty {
                    self.dirty.store(true, Ordering::Release);
                }
                if repair || !compact {
                    self.needs_compaction.store(true, Ordering::Release);
                }
                for key in taken {
                    self.pending.insert(key);
                }
                self.stats.record_failure(e.to_string());
                metric_inc!(STORE_FLUSHES, &["failed"]);
                warn!(
                    path = %self.config.path.display(),
                    error = %e,
                    "[sp-02] Flush failed, keeping store dirty for retry"
                );
                Err(e)
            }
        }
    }

    fn encode(&self, buf: &mut Vec<u8>, key: &str, value: u64, split: char) -> usize {
        if encode_record(buf, key, value, split) {
            1
        } else {
            warn!(key = ?key, "[sp-02] Key cannot be written as one line, kept in memory only");
            0
        }
    }

    fn write_snapshot(&self, bytes: &[u8]) -> Result<(), StoreError> {
        let tmp = self.config.temp_path();
        let mut staged = File::create(&tmp)?;
        staged.write_all(bytes)?;
        staged.sync_all()?;
        drop(staged);

        fs::rename(&tmp, &self.config.path)?;

        // The old handle points at the replaced inode.
        *self.file.lock() = Some(open_data_file(&self.config.path)?);
        self.file_len.store(bytes.len() as u64, Ordering::Release);
        Ok(())
    }

    fn append(&self, bytes: &[u8]) -> Result<(), StoreError> {
        let mut handle = self.file.lock();
        let file = handle.as_mut().ok_or(StoreError::NotOpen)?;
        file.write_all(bytes)?;
        file.sync_data()?;
        self.file_len.fetch_add(bytes.len() as u64, Ordering::AcqRel);
        Ok(())
    }

    fn over_threshold(&self) -> bool {
        self.config
            .compact_threshold_bytes
            .is_some_and(|limit| self.file_len.load(Ordering::Acquire) >= limit)
    }

    fn finish(&self, outcome: FlushOutcome) -> FlushOutcome {
        self.stats.record(&outcome);
        let label = match outcome {
            FlushOutcome::Clean => "clean",
            FlushOutcome::InFlight => "in_flight",
            FlushOutcome::Written { .. } => "written",
        };
        metric_inc!(STORE_FLUSHES, &[label]);
        outcome
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::NotOpen);
        }
        Ok(())
    }

    /// Store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Counter file path.
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Number of keys held.
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    /// True if no key is held.
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// True if some `store` has not been flushed yet.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// True after [`close`](Self::close).
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Flush statistics.
    pub fn stats(&self) -> &FlushStats {
        &self.stats
    }

    /// What the startup scan found.
    pub fn recovery_report(&self) -> &RecoveryReport {
        &self.recovery
    }

    /// All in-memory records, sorted by key.
    pub fn records(&self) -> Vec<CounterRecord> {
        let mut records: Vec<_> = self
            .counters
            .iter()
            .map(|e| CounterRecord::new(e.key().clone(), *e.value()))
            .collect();
        records.sort();
        records
    }
}

impl fmt::Debug for FileCounterStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileCounterStore")
            .field("path", &self.config.path)
            .field("mode", &self.config.mode)
            .field("keys", &self.counters.len())
            .field("dirty", &self.is_dirty())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl CounterStorage for FileCounterStore {
    fn load(&self, key: &str) -> Result<u64, StoreError> {
        FileCounterStore::load(self, key)
    }

    fn store(&self, key: &str, value: u64) -> Result<(), StoreError> {
        FileCounterStore::store(self, key, value)
    }
}

fn open_data_file(path: &Path) -> Result<File, StoreError> {
    Ok(OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(path)?)
}
