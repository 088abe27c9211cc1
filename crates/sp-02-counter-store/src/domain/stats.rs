//! # Flush and Recovery Statistics

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// Result of one flush cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Nothing changed since the last flush; the file was not touched.
    Clean,
    /// Another flush holds the write buffer; this cycle was skipped.
    InFlight,
    /// Records were written.
    Written {
        /// Records serialized
        records: usize,
        /// Bytes written
        bytes: usize,
        /// True if the file was rewritten as a snapshot
        compacted: bool,
    },
}

/// Statistics for flush cycles.
#[derive(Debug, Default)]
pub struct FlushStats {
    /// Cycles that wrote data
    pub total_written: AtomicU64,
    /// Cycles skipped because nothing was dirty
    pub total_clean: AtomicU64,
    /// Cycles skipped because a flush was in flight
    pub total_in_flight: AtomicU64,
    /// Cycles whose write failed
    pub total_failed: AtomicU64,
    /// Bytes written across all cycles
    pub bytes_written: AtomicU64,
    last_error: Mutex<Option<String>>,
}

impl FlushStats {
    /// Count a finished cycle.
    pub fn record(&self, outcome: &FlushOutcome) {
        match outcome {
            FlushOutcome::Clean => {
                self.total_clean.fetch_add(1, Ordering::Relaxed);
            }
            FlushOutcome::InFlight => {
                self.total_in_flight.fetch_add(1, Ordering::Relaxed);
            }
            FlushOutcome::Written { bytes, .. } => {
                self.total_written.fetch_add(1, Ordering::Relaxed);
                self.bytes_written.fetch_add(*bytes as u64, Ordering::Relaxed);
            }
        }
    }

    /// Count a failed cycle and remember its message.
    pub fn record_failure(&self, message: String) {
        self.total_failed.fetch_add(1, Ordering::Relaxed);
        *self.last_error.lock() = Some(message);
    }

    /// Message of the most recent failure, if any.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    /// Number of written cycles.
    pub fn written(&self) -> u64 {
        self.total_written.load(Ordering::Relaxed)
    }

    /// Number of failed cycles.
    pub fn failed(&self) -> u64 {
        self.total_failed.load(Ordering::Relaxed)
    }
}

/// Summary of the startup recovery scan.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecoveryReport {
    /// Distinct keys restored
    pub records: usize,
    /// Newline-terminated lines read
    pub lines: usize,
    /// Lines that did not parse
    pub skipped: usize,
    /// Last line had no terminating newline
    pub unterminated_tail: bool,
    /// Unterminated last line did not parse and was dropped
    pub torn_tail: bool,
    /// Bytes consumed, torn fragment included
    pub bytes: u64,
    /// Read error that cut the scan short
    pub read_error: Option<String>,
}
