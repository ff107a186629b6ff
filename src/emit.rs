//! Rendering of decoded records. Both renderings walk the same
//! [`SignalRecord`]; no decoder knows which one will consume its output.

use core::fmt::Write as _;
use std::io::{self, Write};

use crate::decoder::{DecodeOutcome, Decoded};
use crate::record::SignalRecord;

/// Consumer of decode results.
pub trait RecordSink {
    fn emit(&mut self, label: &str, record: &SignalRecord) -> io::Result<()>;

    /// A frame that produced no record, rendered as a fixed marker.
    fn marker(&mut self, label: &str, outcome: DecodeOutcome) -> io::Result<()>;

    /// Route one decode result. Fragments of an unfinished report produce
    /// nothing.
    fn accept(&mut self, decoded: &Decoded) -> io::Result<()> {
        match (&decoded.record, decoded.outcome) {
            (Some(record), _) => self.emit(&decoded.name(), record),
            (None, DecodeOutcome::Ok) => Ok(()),
            (None, outcome) => self.marker(&decoded.name(), outcome),
        }
    }
}

/// Label line followed by one indented `name = value` line per field.
pub fn render_text(label: &str, record: &SignalRecord) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "{label}");
    for (name, value) in record.iter() {
        let _ = writeln!(s, "    {name} = {value}");
    }
    s
}

pub fn render_marker(label: &str, outcome: DecodeOutcome) -> String {
    format!("{label}: {outcome}\n")
}

pub struct TextSink<W> {
    out: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RecordSink for TextSink<W> {
    fn emit(&mut self, label: &str, record: &SignalRecord) -> io::Result<()> {
        self.out.write_all(render_text(label, record).as_bytes())
    }

    fn marker(&mut self, label: &str, outcome: DecodeOutcome) -> io::Result<()> {
        self.out.write_all(render_marker(label, outcome).as_bytes())
    }
}

#[cfg(feature = "serde")]
pub use json::{JsonSink, render_event};

#[cfg(feature = "serde")]
mod json {
    use std::io::{self, Write};

    use serde::Serialize;

    use super::RecordSink;
    use crate::decoder::DecodeOutcome;
    use crate::record::SignalRecord;

    #[derive(Serialize)]
    #[serde(tag = "event", rename_all = "lowercase")]
    enum Event<'a> {
        /// Field updates for a live display.
        Display {
            iden: &'a str,
            data: &'a SignalRecord,
        },
        Marker {
            iden: &'a str,
            outcome: &'static str,
        },
    }

    /// One self-describing event object. List fields become arrays and
    /// attribute fields become nested objects keyed by attribute name.
    pub fn render_event(label: &str, record: &SignalRecord) -> serde_json::Result<String> {
        serde_json::to_string(&Event::Display {
            iden: label,
            data: record,
        })
    }

    /// One JSON object per line.
    pub struct JsonSink<W> {
        out: W,
    }

    impl<W: Write> JsonSink<W> {
        pub fn new(out: W) -> Self {
            Self { out }
        }

        pub fn into_inner(self) -> W {
            self.out
        }

        fn write(&mut self, event: &Event<'_>) -> io::Result<()> {
            serde_json::to_writer(&mut self.out, event)?;
            self.out.write_all(b"\n")
        }
    }

    impl<W: Write> RecordSink for JsonSink<W> {
        fn emit(&mut self, label: &str, record: &SignalRecord) -> io::Result<()> {
            self.write(&Event::Display {
                iden: label,
                data: record,
            })
        }

        fn marker(&mut self, label: &str, outcome: DecodeOutcome) -> io::Result<()> {
            self.write(&Event::Marker {
                iden: label,
                outcome: outcome.marker(),
            })
        }
    }
}
