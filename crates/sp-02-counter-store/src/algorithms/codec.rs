//! # Line Codec
//!
//! `<key><SPLIT><value>\n`, one record per line.

use std::io::Write;

use crate::domain::record::CounterRecord;

/// Append `key SPLIT value \n` to `buf`.
///
/// Returns false without writing when the key is empty or contains a line
/// break, since it could not be read back as one record.
pub fn encode_record(buf: &mut Vec<u8>, key: &str, value: u64, split: char) -> bool {
    if !CounterRecord::is_persistable_key(key) {
        return false;
    }
    // Writing to a Vec cannot fail.
    let _ = writeln!(buf, "{key}{split}{value}");
    true
}

/// Parse one line (without its `\n`) into `(key, value)`.
///
/// Splits on the last delimiter so keys may contain it. Rejects blank
/// lines, empty keys, non-UTF-8 input and values that are not plain
/// base-10 digits fitting in a u64. A trailing `\r` is ignored.
pub fn parse_line(line: &[u8], split: char) -> Option<(&str, u64)> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let text = std::str::from_utf8(line).ok()?;
    let (key, value) = text.rsplit_once(split)?;
    if key.is_empty() || value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value = value.parse::<u64>().ok()?;
    Some((key, value))
}
