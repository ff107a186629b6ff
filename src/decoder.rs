use core::fmt;
use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::config::DecoderConfig;
use crate::dedup::DuplicateCache;
use crate::error::DecodeError;
use crate::frame::VanFrame;
use crate::reassembly::{Progress, Reassembler};
use crate::record::SignalRecord;
use crate::registry::{self, DecodeKind};
use crate::validate::validate;

/// Classification of one decode attempt. Exactly one per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeOutcome {
    Ok,
    Duplicate,
    ChecksumError,
    UnexpectedLength,
    UnrecognizedIdentifier,
    /// Identifier and length are known, the contents are not understood yet.
    ToBeDecoded,
}

impl DecodeOutcome {
    /// Fixed marker rendered in place of fields.
    pub fn marker(self) -> &'static str {
        match self {
            DecodeOutcome::Ok => "OK",
            DecodeOutcome::Duplicate => "DUPLICATE",
            DecodeOutcome::ChecksumError => "CRC_ERROR",
            DecodeOutcome::UnexpectedLength => "UNEXPECTED_PACKET_LENGTH",
            DecodeOutcome::UnrecognizedIdentifier => "UNRECOGNIZED_IDEN",
            DecodeOutcome::ToBeDecoded => "TO_BE_DECODED",
        }
    }
}

impl fmt::Display for DecodeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

impl From<DecodeError> for DecodeOutcome {
    fn from(e: DecodeError) -> Self {
        match e {
            DecodeError::UnexpectedLength { .. } => DecodeOutcome::UnexpectedLength,
            DecodeError::ToBeDecoded { .. } => DecodeOutcome::ToBeDecoded,
        }
    }
}

/// Result of [`VanDecoder::decode`]. `record` is present only for an `Ok`
/// outcome that completes a record; fragments of an unfinished report are
/// `Ok` without one.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub iden: u16,
    /// Registry label; `None` for unrecognized identifiers.
    pub label: Option<&'static str>,
    pub outcome: DecodeOutcome,
    pub record: Option<SignalRecord>,
}

impl Decoded {
    fn outcome(iden: u16, label: Option<&'static str>, outcome: DecodeOutcome) -> Self {
        Decoded {
            iden,
            label,
            outcome,
            record: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.outcome == DecodeOutcome::Ok
    }

    /// Label for rendering; unknown identifiers fall back to their hex value.
    pub fn name(&self) -> String {
        match self.label {
            Some(label) => label.to_string(),
            None => format!("{:03X}", self.iden),
        }
    }
}

/// Outcome counters of one decoder instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeStats {
    pub frames: u64,
    pub ok: u64,
    pub records: u64,
    pub duplicate: u64,
    pub checksum_error: u64,
    pub unexpected_length: u64,
    pub unrecognized: u64,
    pub to_be_decoded: u64,
    /// Completed reports that had a sequence gap.
    pub reassembly_gaps: u64,
    pub overruns: u64,
}

impl DecodeStats {
    fn count(&mut self, outcome: DecodeOutcome) {
        let counter = match outcome {
            DecodeOutcome::Ok => &mut self.ok,
            DecodeOutcome::Duplicate => &mut self.duplicate,
            DecodeOutcome::ChecksumError => &mut self.checksum_error,
            DecodeOutcome::UnexpectedLength => &mut self.unexpected_length,
            DecodeOutcome::UnrecognizedIdentifier => &mut self.unrecognized,
            DecodeOutcome::ToBeDecoded => &mut self.to_be_decoded,
        };
        *counter += 1;
    }
}

impl fmt::Display for DecodeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frames={} ok={} records={} duplicate={} crc_error={} unexpected_length={} \
             unrecognized={} to_be_decoded={} reassembly_gaps={} overruns={}",
            self.frames,
            self.ok,
            self.records,
            self.duplicate,
            self.checksum_error,
            self.unexpected_length,
            self.unrecognized,
            self.to_be_decoded,
            self.reassembly_gaps,
            self.overruns,
        )
    }
}

/// Frame decoder. Owns all per-identifier state, so independent instances
/// never interfere.
#[derive(Debug)]
pub struct VanDecoder {
    config: DecoderConfig,
    dedup: DuplicateCache,
    reassembly: HashMap<u16, Reassembler>,
    stats: DecodeStats,
}

impl Default for VanDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl VanDecoder {
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        VanDecoder {
            config,
            dedup: DuplicateCache::new(),
            reassembly: HashMap::new(),
            stats: DecodeStats::default(),
        }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn stats(&self) -> &DecodeStats {
        &self.stats
    }

    /// Classify and, where possible, decode one frame.
    pub fn decode(&mut self, frame: &VanFrame) -> Decoded {
        let decoded = self.classify(frame);
        self.stats.frames += 1;
        self.stats.count(decoded.outcome);
        if decoded.record.is_some() {
            self.stats.records += 1;
        }
        decoded
    }

    fn classify(&mut self, frame: &VanFrame) -> Decoded {
        let iden = frame.iden();
        if !frame.checksum_ok() {
            debug!(iden = format_args!("{iden:03X}"), "checksum error");
            let label = registry::lookup(iden).map(|d| d.label);
            return Decoded::outcome(iden, label, DecodeOutcome::ChecksumError);
        }
        let Some(desc) = registry::lookup(iden) else {
            trace!(iden = format_args!("{iden:03X}"), "unrecognized identifier");
            return Decoded::outcome(iden, None, DecodeOutcome::UnrecognizedIdentifier);
        };
        let label = Some(desc.label);

        if let Err(outcome) = validate(frame, desc) {
            debug!(iden = desc.label, len = frame.len(), "unexpected payload length");
            return Decoded::outcome(iden, label, outcome);
        }

        let data = frame.bytes();
        if self.config.suppress_duplicates && self.dedup.is_duplicate(iden, data, desc.dedup) {
            trace!(iden = desc.label, "duplicate");
            return Decoded::outcome(iden, label, DecodeOutcome::Duplicate);
        }

        let record = match desc.kind {
            DecodeKind::Fields(decode) => match decode(data) {
                Ok(record) => record,
                Err(e) => {
                    debug!(iden = desc.label, error = %e, "field decode failed");
                    return Decoded::outcome(iden, label, e.into());
                }
            },
            DecodeKind::Fragmented {
                decode,
                report_type,
            } => {
                let config = &self.config;
                let reassembler = self.reassembly.entry(iden).or_insert_with(|| {
                    Reassembler::new(report_type, config.first_fragment_max, config.max_report_len)
                });
                match reassembler.on_fragment(data) {
                    Progress::Complete(report) => {
                        if report.gap {
                            self.stats.reassembly_gaps += 1;
                        }
                        decode(&report)
                    }
                    Progress::Accumulating | Progress::Ignored => {
                        return Decoded::outcome(iden, label, DecodeOutcome::Ok);
                    }
                }
            }
            DecodeKind::NotDecoded => {
                debug!(iden = desc.label, "not decoded");
                return Decoded::outcome(iden, label, DecodeOutcome::ToBeDecoded);
            }
        };

        Decoded {
            iden,
            label,
            outcome: DecodeOutcome::Ok,
            record: Some(record),
        }
    }

    /// The receiver reported a queue overrun. Reports still being assembled
    /// may now be missing fragments and are flagged as such.
    pub fn on_overrun(&mut self) {
        warn!("receive queue overrun");
        self.stats.overruns += 1;
        for r in self.reassembly.values_mut() {
            r.mark_gap();
        }
    }

    /// Forget all duplicate history and open reports. Statistics are kept.
    pub fn clear(&mut self) {
        self.dedup.clear();
        self.reassembly.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iden::*;
    use crate::record::Value;

    fn frame(iden: u16, data: &str) -> VanFrame {
        VanFrame::new(iden, &hex::decode(data).unwrap(), true).unwrap()
    }

    #[test]
    fn checksum_error_even_for_unknown_iden() {
        let mut d = VanDecoder::new();
        let f = VanFrame::new(0x123, &[1, 2], false).unwrap();
        let out = d.decode(&f);
        assert_eq!(out.outcome, DecodeOutcome::ChecksumError);
        assert_eq!(out.label, None);
        assert!(out.record.is_none());
    }

    #[test]
    fn sub_format_errors_become_outcomes() {
        let mut d = VanDecoder::new();
        // device report from an unknown device
        assert_eq!(
            d.decode(&frame(DEVICE_REPORT_IDEN, "4400")).outcome,
            DecodeOutcome::ToBeDecoded
        );
        // head unit button report must be 3 bytes
        assert_eq!(
            d.decode(&frame(DEVICE_REPORT_IDEN, "8A2100")).outcome,
            DecodeOutcome::Ok
        );
        assert_eq!(
            d.decode(&frame(DEVICE_REPORT_IDEN, "8A21")).outcome,
            DecodeOutcome::UnexpectedLength
        );
    }

    #[test]
    fn not_decoded_identifiers() {
        let mut d = VanDecoder::new();
        let out = d.decode(&frame(ECU_IDEN, "0011223344"));
        assert_eq!(out.outcome, DecodeOutcome::ToBeDecoded);
        assert_eq!(out.label, Some("ecu"));
    }

    #[test]
    fn duplicates_pass_when_suppression_is_off() {
        let mut d = VanDecoder::with_config(DecoderConfig::default().with_duplicates());
        let f = frame(ENGINE_IDEN, "8707FF001000A0");
        assert!(d.decode(&f).is_ok());
        assert!(d.decode(&f).is_ok());
        assert_eq!(d.stats().records, 2);
    }

    #[test]
    fn masked_counter_does_not_defeat_suppression() {
        let mut d = VanDecoder::new();
        let mut data = [0u8; 27];
        data[0] = 0x01;
        let a = VanFrame::new(CAR_STATUS1_IDEN, &data, true).unwrap();
        data[0] = 0x02;
        let b = VanFrame::new(CAR_STATUS1_IDEN, &data, true).unwrap();
        assert_eq!(d.decode(&a).outcome, DecodeOutcome::Ok);
        assert_eq!(d.decode(&b).outcome, DecodeOutcome::Duplicate);
    }

    #[test]
    fn overrun_flags_open_report() {
        let mut d = VanDecoder::new();
        assert!(d.decode(&frame(SATNAV_REPORT_IDEN, "001F47505300")).record.is_none());
        d.on_overrun();
        let out = d.decode(&frame(SATNAV_REPORT_IDEN, "81312E320001"));
        let record = out.record.unwrap();
        assert_eq!(record.get("possible_missed_fragment"), Some(&Value::Bool(true)));
        assert_eq!(d.stats().reassembly_gaps, 1);
        assert_eq!(d.stats().overruns, 1);
    }

    #[test]
    fn report_missing_its_head_is_flagged() {
        let mut d = VanDecoder::new();
        assert!(d.decode(&frame(SATNAV_REPORT_IDEN, "011F47505300")).record.is_none());
        let record = d.decode(&frame(SATNAV_REPORT_IDEN, "82312E320001")).record.unwrap();
        assert_eq!(record.get("possible_missed_fragment"), Some(&Value::Bool(true)));
        assert_eq!(d.stats().reassembly_gaps, 1);
    }

    #[test]
    fn stats_line() {
        let mut d = VanDecoder::new();
        d.decode(&frame(0x001, "00"));
        let f = frame(ENGINE_IDEN, "8707FF001000A0");
        d.decode(&f);
        d.decode(&f);
        assert_eq!(
            d.stats().to_string(),
            "frames=3 ok=1 records=1 duplicate=1 crc_error=0 unexpected_length=0 \
             unrecognized=1 to_be_decoded=0 reassembly_gaps=0 overruns=0"
        );
    }

    #[test]
    fn clear_forgets_history_and_open_reports() {
        let mut d = VanDecoder::new();
        let f = frame(ENGINE_IDEN, "8707FF001000A0");
        assert!(d.decode(&f).is_ok());
        assert!(d.decode(&frame(SATNAV_REPORT_IDEN, "001F47505300")).record.is_none());

        d.clear();
        assert!(d.decode(&f).is_ok());
        // the continuation no longer has a report to join
        let out = d.decode(&frame(SATNAV_REPORT_IDEN, "88312E320001"));
        assert_eq!(out.outcome, DecodeOutcome::Ok);
        assert!(out.record.is_none());

        assert_eq!(d.stats().frames, 4);
        assert_eq!(d.stats().records, 2);
        assert_eq!(d.stats().duplicate, 0);
    }

    #[test]
    fn config_is_kept() {
        let d = VanDecoder::with_config(DecoderConfig::default().with_duplicates());
        assert!(!d.config().suppress_duplicates);
        assert_eq!(d.config().max_report_len, DecoderConfig::default().max_report_len);
    }
}
