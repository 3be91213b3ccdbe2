//! Folding numbered lines into multi-line [`Entry`] records.
//!
//! A line carrying a timestamp opens a new entry; anything else is a
//! continuation of the entry before it. Fields come from the detector run
//! over the first line of each entry.

use crate::{derived::derive_time, entry::Entry, loader::SourceLine};
use chrono::NaiveDate;
use logsift_parser::{detect_fields, extract_timestamp};

/// incremental entry builder; feed lines in order, then [`finish`](Self::finish)
#[derive(Debug, Default)]
pub struct EntryAssembler {
    entries: Vec<Entry>,
    current: Option<Entry>,
    /// last calendar date seen, used for time-only stamps
    anchor: Option<NaiveDate>,
    lines_seen: usize,
}

impl EntryAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// number of physical lines consumed so far
    pub fn lines_seen(&self) -> usize {
        self.lines_seen
    }

    pub fn push_line(&mut self, number: usize, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        self.lines_seen += 1;

        if extract_timestamp(text).is_some() {
            self.close_current();
            self.current = Some(self.open_entry(number, text));
            return;
        }

        match self.current.as_mut() {
            Some(entry) => {
                entry.message.push('\n');
                entry.message.push_str(text);
                entry.raw.push('\n');
                entry.raw.push_str(text);
                entry.original_line_numbers.push(number);
            }
            None => {
                // orphan line before any timestamp
                self.current = Some(self.open_entry(number, text));
            }
        }
    }

    /// feed one batch of lines; batch boundaries do not affect the result
    pub fn feed<'a, I>(&mut self, lines: I)
    where
        I: IntoIterator<Item = &'a SourceLine>,
    {
        for line in lines {
            self.push_line(line.number, &line.text);
        }
    }

    pub fn finish(mut self) -> Vec<Entry> {
        self.close_current();
        log::debug!(
            "assembled {} entries from {} lines",
            self.entries.len(),
            self.lines_seen
        );
        self.entries
    }

    fn close_current(&mut self) {
        if let Some(entry) = self.current.take() {
            self.entries.push(entry);
        }
    }

    fn open_entry(&mut self, number: usize, text: &str) -> Entry {
        let id = self.entries.len();
        let parsed = detect_fields(text);

        let mut entry = Entry::new(id, number, parsed.message);
        entry.raw = text.to_string();
        entry.level = parsed.level;
        entry.module = parsed.module;
        entry.thread = parsed.thread;
        entry.process = parsed.process;
        entry.source_file = parsed.source_file;
        entry.source_line = parsed.source_line;
        entry.format = parsed.format;
        entry.metadata = parsed.metadata;

        if let Some(ts) = extract_timestamp(text) {
            entry.timestamp = Some(ts.text.to_string());
            match derive_time(ts.text, ts.kind, self.anchor) {
                Some(derived) => {
                    if !ts.kind.is_time_only() {
                        self.anchor = derived.date;
                    }
                    entry.timestamp_ms = Some(derived.millis);
                    entry.display_date = derived.display_date;
                    entry.display_time = Some(derived.display_time);
                }
                None => log::debug!("line {number}: unparseable timestamp {:?}", ts.text),
            }
        }

        entry
    }
}

/// assemble a full line sequence in one go
pub fn assemble(lines: &[SourceLine]) -> Vec<Entry> {
    let mut assembler = EntryAssembler::new();
    assembler.feed(lines);
    assembler.finish()
}

/// assemble in chunks of `batch_size` lines, reporting progress after each chunk
///
/// `on_batch` receives the number of lines consumed so far
pub fn assemble_in_batches<F>(lines: &[SourceLine], batch_size: usize, mut on_batch: F) -> Vec<Entry>
where
    F: FnMut(usize),
{
    let mut assembler = EntryAssembler::new();
    for chunk in lines.chunks(batch_size.max(1)) {
        assembler.feed(chunk);
        on_batch(assembler.lines_seen());
    }
    assembler.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::split_lines;
    use logsift_parser::{LineFormat, LogLevel};

    fn lines(text: &str) -> Vec<SourceLine> {
        split_lines(text).lines
    }

    #[test]
    fn test_continuation_lines_are_folded() {
        let entries = assemble(&lines("2025-01-01 00:00:01 start\n  continuation"));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].original_line_numbers, vec![1, 2]);
        assert_eq!(entries[0].line_number, 1);
        assert_eq!(entries[0].timestamp.as_deref(), Some("2025-01-01 00:00:01"));
        assert_eq!(entries[0].raw, "2025-01-01 00:00:01 start\n  continuation");
        assert!(entries[0].message.ends_with("\n  continuation"));
    }

    #[test]
    fn test_orphan_lines_form_degraded_entry() {
        let entries = assemble(&lines("boot banner\nmore banner\n2025-01-01 00:00:01 up"));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].timestamp, None);
        assert_eq!(entries[0].timestamp_ms, None);
        assert_eq!(entries[0].original_line_numbers, vec![1, 2]);
        assert_eq!(entries[1].id, 1);
        assert_eq!(entries[1].line_number, 3);
    }

    #[test]
    fn test_fields_from_first_line() {
        let entries = assemble(&lines(
            "2025-01-01 10:00:00.000 [Net:42] [W] [T:7] [P:99] slow\nstack frame",
        ));
        let entry = &entries[0];
        assert_eq!(entry.format, LineFormat::TaggedBracket);
        assert_eq!(entry.level, Some(LogLevel::Warning));
        assert_eq!(entry.module.as_deref(), Some("Net"));
        assert_eq!(entry.message, "slow\nstack frame");
        assert_eq!(entry.display_time.as_deref(), Some("10:00:00.000"));
        assert_eq!(entry.display_date.as_deref(), Some("2025-01-01"));
    }

    #[test]
    fn test_time_only_anchored_to_previous_date() {
        let entries = assemble(&lines("2025-03-01 09:00:00 first\n10:00:00.500 second"));
        assert_eq!(entries[1].display_date.as_deref(), Some("2025-03-01"));
        let delta = entries[1].timestamp_ms.unwrap() - entries[0].timestamp_ms.unwrap();
        assert_eq!(delta, 3_600_500);
    }

    #[test]
    fn test_invalid_timestamp_still_starts_entry() {
        let entries = assemble(&lines("2025-02-30 10:00:00 bad day\nnext"));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].timestamp.as_deref(), Some("2025-02-30 10:00:00"));
        assert_eq!(entries[0].timestamp_ms, None);
    }

    #[test]
    fn test_batches_do_not_change_output() {
        let text = "x\n2025-01-01 00:00:01 a\n b\n c\n2025-01-01 00:00:02 d\n e\n2025-01-01 00:00:03 f";
        let all = lines(text);
        let whole = assemble(&all);

        for batch_size in [1, 2, 3, 100] {
            let mut progress = Vec::new();
            let batched = assemble_in_batches(&all, batch_size, |n| progress.push(n));
            assert_eq!(batched, whole, "batch size {batch_size}");
            assert_eq!(progress.last(), Some(&all.len()));
        }
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let mut assembler = EntryAssembler::new();
        assembler.push_line(1, "2025-01-01 00:00:01 a");
        assembler.push_line(2, "   ");
        assembler.push_line(3, "b");
        let entries = assembler.finish();
        assert_eq!(entries[0].original_line_numbers, vec![1, 3]);
    }
}
