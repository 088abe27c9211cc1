//! # Recovery Scan
//!
//! Replays a counter file into a map. Later lines overwrite earlier ones,
//! so both snapshot files and append logs recover to the latest value.

use std::collections::HashMap;
use std::io::BufRead;

use tracing::warn;

use super::codec::parse_line;
use crate::domain::stats::RecoveryReport;

/// Output of [`recover`].
#[derive(Debug, Default)]
pub struct RecoveredCounters {
    /// Key -> latest value.
    pub counters: HashMap<String, u64>,
    /// What the scan saw.
    pub report: RecoveryReport,
}

/// Scan `reader` line by line.
///
/// Never fails: malformed lines are skipped and a read error stops the scan
/// with what has been recovered so far. A last line without its `\n` is
/// kept if it parses; otherwise it is reported as a torn tail.
pub fn recover<R: BufRead>(mut reader: R, split: char) -> RecoveredCounters {
    let mut out = RecoveredCounters::default();
    let mut line = Vec::new();

    loop {
        line.clear();
        let n = match reader.read_until(b'\n', &mut line) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                warn!(error = %e, line = out.report.lines + 1, "[sp-02] Recovery read failed, stopping scan");
                out.report.read_error = Some(e.to_string());
                break;
            }
        };
        out.report.bytes += n as u64;
        out.report.lines += 1;

        // The last line may lack its `\n`; it is parsed like any other.
        let (body, terminated) = match line.strip_suffix(b"\n") {
            Some(body) => (body, true),
            None => (line.as_slice(), false),
        };
        if !terminated {
            out.report.unterminated_tail = true;
        }

        if body.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        match parse_line(body, split) {
            Some((key, value)) => {
                out.counters.insert(key.to_string(), value);
            }
            None if terminated => {
                warn!(line = out.report.lines, "[sp-02] Skipping malformed record");
                out.report.skipped += 1;
            }
            None => {
                warn!(bytes = n, "[sp-02] Dropping torn trailing record");
                out.report.skipped += 1;
                out.report.torn_tail = true;
            }
        }
    }

    out.report.records = out.counters.len();
    out
}
