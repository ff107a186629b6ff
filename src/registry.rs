use core::ops::RangeInclusive;

use crate::decoders::{audio, body, climate, mfd, satnav};
use crate::error::DecodeError;
use crate::iden::*;
use crate::reassembly::Report;
use crate::record::SignalRecord;

pub type FieldDecoder = fn(&[u8]) -> Result<SignalRecord, DecodeError>;
pub type ReportDecoder = fn(&Report) -> SignalRecord;

/// Accepted payload lengths of an identifier.
#[derive(Debug, Clone)]
pub enum Lengths {
    Exact(&'static [usize]),
    Range(RangeInclusive<usize>),
}

impl Lengths {
    pub const ANY: Lengths = Lengths::Range(0..=crate::frame::MAX_PAYLOAD_LEN);

    pub fn accepts(&self, len: usize) -> bool {
        match self {
            Lengths::Exact(set) => set.contains(&len),
            Lengths::Range(range) => range.contains(&len),
        }
    }
}

/// How repeated payloads of one identifier are recognised as duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupPolicy {
    /// Every frame is forwarded.
    Never,
    /// Equal to the most recent payload.
    Single,
    /// Equal to either of the two most recent payloads; for values that
    /// alternate between two samples on every broadcast.
    Toggle,
    /// As `Single`, with the `ignore` bits of byte `byte` left out of the
    /// comparison (running sequence counters).
    Masked { byte: usize, ignore: u8 },
}

#[derive(Debug, Clone, Copy)]
pub enum DecodeKind {
    Fields(FieldDecoder),
    /// Text report spread over several frames. `report_type` tells whether
    /// the first fragment carries a report-type byte after the sequence byte.
    Fragmented {
        decode: ReportDecoder,
        report_type: bool,
    },
    /// Recognised, layout not yet understood.
    NotDecoded,
}

#[derive(Debug, Clone)]
pub struct IdenDescriptor {
    pub iden: u16,
    pub label: &'static str,
    pub lengths: Lengths,
    pub dedup: DedupPolicy,
    pub kind: DecodeKind,
}

const fn fields(
    iden: u16,
    label: &'static str,
    lengths: &'static [usize],
    dedup: DedupPolicy,
    decode: FieldDecoder,
) -> IdenDescriptor {
    IdenDescriptor {
        iden,
        label,
        lengths: Lengths::Exact(lengths),
        dedup,
        kind: DecodeKind::Fields(decode),
    }
}

const fn not_decoded(iden: u16, label: &'static str) -> IdenDescriptor {
    IdenDescriptor {
        iden,
        label,
        lengths: Lengths::ANY,
        dedup: DedupPolicy::Single,
        kind: DecodeKind::NotDecoded,
    }
}

use DedupPolicy::{Masked, Single, Toggle};

/// Sorted by identifier.
pub static REGISTRY: &[IdenDescriptor] = &[
    fields(COM2000_IDEN, "com2000", &[10], Single, body::com2000),
    fields(AIRCON1_IDEN, "aircon_1", &[5], Single, climate::aircon1),
    fields(AUDIO_SETTINGS_IDEN, "audio_settings", &[11], Single, audio::audio_settings),
    fields(AIRCON2_IDEN, "aircon_2", &[7], Toggle, climate::aircon2),
    fields(CDCHANGER_IDEN, "cd_changer", &[12], Single, audio::cd_changer),
    fields(LIGHTS_STATUS_IDEN, "lights_status", &[11, 14], Single, body::lights_status),
    fields(CAR_STATUS2_IDEN, "car_status_2", &[14, 16], Single, body::car_status2),
    fields(SATNAV_STATUS_1_IDEN, "satnav_status_1", &[6], Single, satnav::status1),
    fields(HEAD_UNIT_IDEN, "head_unit", &[10, 12, 19, 21, 22], Single, audio::head_unit),
    fields(
        CAR_STATUS1_IDEN,
        "car_status_1",
        &[27],
        Masked { byte: 0, ignore: 0x0F },
        body::car_status1,
    ),
    fields(MFD_STATUS_IDEN, "mfd_status", &[2], Single, mfd::mfd_status),
    fields(SATNAV_GUIDANCE_IDEN, "satnav_guidance", &[3, 4, 6, 13, 23], Single, satnav::guidance),
    fields(DASHBOARD_BUTTONS_IDEN, "dashboard_buttons", &[11, 12], Single, body::dashboard_buttons),
    IdenDescriptor {
        iden: SATNAV_REPORT_IDEN,
        label: "satnav_report",
        lengths: Lengths::Range(2..=28),
        dedup: DedupPolicy::Never,
        kind: DecodeKind::Fragmented {
            decode: satnav::report,
            report_type: true,
        },
    },
    not_decoded(SATNAV_DOWNLOADING_IDEN, "satnav_downloading"),
    fields(WHEEL_SPEED_IDEN, "wheel_speed", &[5], Single, body::wheel_speed),
    fields(SATNAV_TO_MFD_IDEN, "satnav_to_mfd", &[27], Single, satnav::satnav_to_mfd),
    fields(SATNAV_STATUS_2_IDEN, "satnav_status_2", &[20], Single, satnav::status2),
    fields(DASHBOARD_IDEN, "dashboard", &[7], Single, body::dashboard),
    fields(ENGINE_IDEN, "engine", &[7], Toggle, body::engine),
    fields(DEVICE_REPORT_IDEN, "device_report", &[2, 3, 4], Single, mfd::device_report),
    fields(SATNAV_STATUS_3_IDEN, "satnav_status_3", &[2, 3, 17], Single, satnav::status3),
    fields(
        MFD_TO_HEAD_UNIT_IDEN,
        "mfd_to_head_unit",
        &[2, 3, 4, 11, 12],
        Single,
        mfd::mfd_to_head_unit,
    ),
    fields(CDCHANGER_COMMAND_IDEN, "cd_changer_command", &[2], Single, audio::cd_changer_command),
    fields(ODOMETER_IDEN, "odometer", &[7], Single, body::odometer),
    fields(MFD_TO_SATNAV_IDEN, "mfd_to_satnav", &[4, 9, 11], Single, satnav::mfd_to_satnav),
    fields(TIME_IDEN, "time", &[5], Single, body::time),
    fields(HEAD_UNIT_STALK_IDEN, "head_unit_stalk", &[2], Single, audio::head_unit_stalk),
    fields(
        SATNAV_GUIDANCE_DATA_IDEN,
        "satnav_guidance_data",
        &[16],
        Single,
        satnav::guidance_data,
    ),
    not_decoded(AIRCON_DIAG_COMMAND_IDEN, "aircon_diag_command"),
    not_decoded(AIRCON_DIAG_IDEN, "aircon_diag"),
    not_decoded(ECU_IDEN, "ecu"),
    fields(VIN_IDEN, "vin", &[17], Single, body::vin),
];

pub fn lookup(iden: u16) -> Option<&'static IdenDescriptor> {
    REGISTRY
        .binary_search_by_key(&iden, |d| d.iden)
        .ok()
        .map(|i| &REGISTRY[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_and_unique() {
        assert!(REGISTRY.windows(2).all(|w| w[0].iden < w[1].iden));
    }

    #[test]
    fn idens_fit_in_twelve_bits() {
        assert!(REGISTRY.iter().all(|d| d.iden <= crate::frame::MAX_IDEN));
    }

    #[test]
    fn lookup_known_and_unknown() {
        let d = lookup(ENGINE_IDEN).unwrap();
        assert_eq!(d.label, "engine");
        assert!(d.lengths.accepts(7));
        assert!(!d.lengths.accepts(6));
        assert!(lookup(0x123).is_none());
    }

    #[test]
    fn multi_length_identifiers() {
        let d = lookup(LIGHTS_STATUS_IDEN).unwrap();
        assert!(d.lengths.accepts(11));
        assert!(d.lengths.accepts(14));
        assert!(!d.lengths.accepts(12));
    }
}
