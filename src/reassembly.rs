//! Reassembly of text reports that span several frames of one identifier.
//!
//! Every fragment starts with a sequence byte. A fragment whose counter
//! (low 7 bits) is at or below the first-fragment threshold opens a report;
//! the first fragment may carry a report-type byte before its text. Bit 7 of
//! the sequence byte marks the last fragment. A report opened at any counter
//! other than 0 is flagged as having a gap.
//!
//! The text itself is a run of records terminated by [`RECORD_SEPARATOR`],
//! each record a run of NUL-terminated entries. Parsing happens only once
//! the last fragment is in, so entries split across frame boundaries come out
//! whole.

use tracing::{debug, trace, warn};

pub const LAST_FRAGMENT: u8 = 0x80;
pub const RECORD_SEPARATOR: u8 = 0x01;
const ENTRY_TERMINATOR: u8 = 0x00;

/// A completed multi-frame report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub report_type: Option<u8>,
    pub records: Vec<Vec<String>>,
    /// A sequence value other than the expected next one was seen; a
    /// fragment may be missing.
    pub gap: bool,
    /// The report outgrew the buffer and its tail was dropped.
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// Fragment appended, report not yet complete.
    Accumulating,
    Complete(Report),
    /// Continuation fragment with no report open.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Accumulating,
}

#[derive(Debug)]
pub struct Reassembler {
    state: State,
    buf: Vec<u8>,
    report_type: Option<u8>,
    expected_seq: u8,
    gap: bool,
    truncated: bool,
    has_report_type: bool,
    first_fragment_max: u8,
    max_len: usize,
}

impl Reassembler {
    pub fn new(has_report_type: bool, first_fragment_max: u8, max_len: usize) -> Self {
        Reassembler {
            state: State::Idle,
            buf: Vec::new(),
            report_type: None,
            expected_seq: 0,
            gap: false,
            truncated: false,
            has_report_type,
            first_fragment_max,
            max_len,
        }
    }

    pub fn reset(&mut self) {
        self.state = State::Idle;
        self.buf.clear();
        self.report_type = None;
        self.expected_seq = 0;
        self.gap = false;
        self.truncated = false;
    }

    pub fn is_idle(&self) -> bool {
        self.state == State::Idle
    }

    /// Frames may have been dropped upstream; an open report can no longer be
    /// trusted to be complete.
    pub fn mark_gap(&mut self) {
        if self.state == State::Accumulating {
            self.gap = true;
        }
    }

    pub fn on_fragment(&mut self, data: &[u8]) -> Progress {
        let Some((&seq, rest)) = data.split_first() else {
            return Progress::Ignored;
        };
        let counter = seq & !LAST_FRAGMENT;

        let text = match self.state {
            State::Idle if counter <= self.first_fragment_max => self.start(counter, rest),
            State::Idle => {
                trace!(seq, "fragment without an open report");
                return Progress::Ignored;
            }
            State::Accumulating if counter == self.expected_seq => rest,
            State::Accumulating
                if counter <= self.first_fragment_max && counter < self.expected_seq =>
            {
                debug!(seq, "report restarted before completion");
                self.start(counter, rest)
            }
            State::Accumulating => {
                warn!(
                    expected = self.expected_seq,
                    got = counter,
                    "possible missed fragment"
                );
                self.gap = true;
                rest
            }
        };

        self.append(text);
        self.expected_seq = counter.wrapping_add(1) & !LAST_FRAGMENT;

        if seq & LAST_FRAGMENT == 0 {
            return Progress::Accumulating;
        }

        let report = Report {
            report_type: self.report_type,
            records: parse_records(&self.buf),
            gap: self.gap,
            truncated: self.truncated,
        };
        debug!(
            report_type = ?report.report_type,
            records = report.records.len(),
            "report complete"
        );
        self.reset();
        Progress::Complete(report)
    }

    fn start<'a>(&mut self, counter: u8, rest: &'a [u8]) -> &'a [u8] {
        self.reset();
        self.state = State::Accumulating;
        // Opening past counter 0 means the head of the report was lost.
        if counter != 0 {
            warn!(got = counter, "report opened without its first fragment");
            self.gap = true;
        }
        if !self.has_report_type {
            return rest;
        }
        match rest.split_first() {
            Some((&report_type, text)) => {
                self.report_type = Some(report_type);
                text
            }
            None => rest,
        }
    }

    fn append(&mut self, text: &[u8]) {
        let room = self.max_len.saturating_sub(self.buf.len());
        if text.len() > room {
            if !self.truncated {
                warn!(max_len = self.max_len, "report exceeds buffer, truncating");
            }
            self.truncated = true;
        }
        self.buf.extend_from_slice(&text[..text.len().min(room)]);
    }
}

fn parse_records(buf: &[u8]) -> Vec<Vec<String>> {
    let mut records: Vec<Vec<String>> = buf
        .split(|&b| b == RECORD_SEPARATOR)
        .map(parse_entries)
        .collect();
    // A trailing separator leaves an empty final record.
    if records.last().is_some_and(|r| r.is_empty()) {
        records.pop();
    }
    records
}

fn parse_entries(record: &[u8]) -> Vec<String> {
    let mut entries: Vec<String> = record
        .split(|&b| b == ENTRY_TERMINATOR)
        .map(|e| e.iter().map(|&b| b as char).collect())
        .collect();
    if entries.last().is_some_and(|e| e.is_empty()) {
        entries.pop();
    }
    entries
}
