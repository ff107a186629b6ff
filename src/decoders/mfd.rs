//! Multi-function display traffic: its own status, the device reports the
//! other units address to it, and its commands to the head unit.

use super::audio::source;
use super::{SubFormat, dispatch};
use crate::error::DecodeError;
use crate::iden::{DEVICE_REPORT_IDEN, MFD_TO_HEAD_UNIT_IDEN};
use crate::record::{SignalRecord, Value};
use crate::units::{bit, from_midpoint, label_or_hex, u16_be};

type DecodeResult = Result<SignalRecord, DecodeError>;

fn mfd_status_label(raw: u32) -> Option<&'static str> {
    Some(match raw {
        0x00FF => "MFD_SCREEN_OFF",
        0x20FF => "MFD_SCREEN_ON",
        0xA0FF => "TRIP_COUNTER_1_RESET",
        0x60FF => "TRIP_COUNTER_2_RESET",
        _ => return None,
    })
}

pub fn mfd_status(data: &[u8]) -> DecodeResult {
    Ok(SignalRecord::new().with(
        "mfd_status",
        label_or_hex(u16_be(data, 0) as u32, mfd_status_label),
    ))
}

const DEVICE_REPORT_FORMATS: &[SubFormat] = &[
    SubFormat {
        tag: 0x07,
        lengths: &[3, 4],
        decode: satnav_report,
    },
    SubFormat {
        tag: 0x52,
        lengths: &[2],
        decode: mfd_report,
    },
    SubFormat {
        tag: 0x8A,
        lengths: &[3],
        decode: head_unit_report,
    },
    SubFormat {
        tag: 0x96,
        lengths: &[2],
        decode: cd_changer_report,
    },
];

/// Branches on the reporting device in byte 0.
pub fn device_report(data: &[u8]) -> DecodeResult {
    dispatch(DEVICE_REPORT_IDEN, data[0], data, DEVICE_REPORT_FORMATS)
}

fn head_unit_report_label(raw: u32) -> Option<&'static str> {
    Some(match raw {
        0x20 => "BUTTON_PRESSED",
        0x21 => "AUDIO_SETTINGS_ANNOUNCE",
        0x24 => "TUNER_INFO_ANNOUNCE",
        0x28 => "CASSETTE_INFO_ANNOUNCE",
        0x30 => "INTERNAL_CD_INFO_ANNOUNCE",
        0x40 => "TUNER_PRESETS_ANNOUNCE",
        0x42 => "TUNER_PRESET_STORED",
        _ => return None,
    })
}

fn head_unit_button(raw: u32) -> Option<&'static str> {
    Some(match raw {
        0x01 => "1",
        0x02 => "2",
        0x03 => "3",
        0x04 => "4",
        0x05 => "5",
        0x06 => "6",
        0x11 => "AUDIO_DOWN",
        0x12 => "AUDIO_UP",
        0x13 => "SEEK_BACKWARD",
        0x14 => "SEEK_FORWARD",
        0x16 => "AUDIO",
        0x17 => "MAN",
        0x1B => "TUNER",
        0x1C => "TAPE",
        0x1D => "INTERNAL_CD",
        0x1E => "CD_CHANGER",
        _ => return None,
    })
}

fn head_unit_report(data: &[u8]) -> DecodeResult {
    let mut r = SignalRecord::new();
    r.push("device", Value::label("HEAD_UNIT"))
        .push("report", label_or_hex(data[1] as u32, head_unit_report_label));
    match data[1] {
        0x20 => {
            r.push(
                "button",
                label_or_hex((data[2] & 0x1F) as u32, head_unit_button),
            )
            .push("held", bit(data[2], 0x40))
            .push("released", bit(data[2], 0x80));
        }
        0x42 => {
            r.push("preset", data[2] & 0x0F);
        }
        _ => {}
    }
    Ok(r)
}

fn satnav_report_label(raw: u32) -> Option<&'static str> {
    Some(match raw {
        0x06 => "DISC_UNREADABLE",
        0x10 => "STATUS_REPORT",
        0x20 => "ROUTE_COMPUTED",
        0x21 => "LIST_AVAILABLE",
        0x30 => "GUIDANCE_INSTRUCTION_READY",
        _ => return None,
    })
}

fn satnav_report(data: &[u8]) -> DecodeResult {
    let mut r = SignalRecord::new();
    r.push("device", Value::label("SATNAV"))
        .push("report", label_or_hex(data[1] as u32, satnav_report_label))
        .push("status", data[2]);
    if data.len() == 4 {
        r.push("parameter", data[3]);
    }
    Ok(r)
}

fn mfd_report(data: &[u8]) -> DecodeResult {
    Ok(SignalRecord::new()
        .with("device", Value::label("MFD"))
        .with("report", Value::Label(format!("0x{:02X}", data[1]).into())))
}

fn cd_changer_report(data: &[u8]) -> DecodeResult {
    Ok(SignalRecord::new()
        .with("device", Value::label("CD_CHANGER"))
        .with("report", Value::Label(format!("0x{:02X}", data[1]).into())))
}

const MFD_TO_HEAD_UNIT_FORMATS: &[SubFormat] = &[
    SubFormat {
        tag: 0x11,
        lengths: &[2],
        decode: set_audio_bits,
    },
    SubFormat {
        tag: 0x12,
        lengths: &[2, 3],
        decode: set_source,
    },
    SubFormat {
        tag: 0x13,
        lengths: &[11],
        decode: set_audio_levels,
    },
    SubFormat {
        tag: 0x14,
        lengths: &[12],
        decode: |_| {
            Err(DecodeError::ToBeDecoded {
                iden: MFD_TO_HEAD_UNIT_IDEN,
            })
        },
    },
    SubFormat {
        tag: 0x27,
        lengths: &[3],
        decode: request_preset,
    },
    SubFormat {
        tag: 0x61,
        lengths: &[4],
        decode: |_| Ok(request("REQUEST_INTERNAL_CD_INFO")),
    },
    SubFormat {
        tag: 0xD1,
        lengths: &[2],
        decode: |_| Ok(request("REQUEST_TUNER_INFO")),
    },
];

/// Branches on the command byte.
pub fn mfd_to_head_unit(data: &[u8]) -> DecodeResult {
    dispatch(MFD_TO_HEAD_UNIT_IDEN, data[0], data, MFD_TO_HEAD_UNIT_FORMATS)
}

fn request(name: &'static str) -> SignalRecord {
    SignalRecord::new().with("command", Value::label(name))
}

fn set_audio_bits(data: &[u8]) -> DecodeResult {
    Ok(request("SET_AUDIO_BITS")
        .with("mute", bit(data[1], 0x01))
        .with("auto_volume", bit(data[1], 0x02))
        .with("loudness", bit(data[1], 0x10)))
}

fn set_source(data: &[u8]) -> DecodeResult {
    Ok(request("SET_SOURCE")
        .with("source", label_or_hex((data[1] & 0x0F) as u32, source))
        .with("power", bit(data[1], 0x80)))
}

fn set_audio_levels(data: &[u8]) -> DecodeResult {
    let mut r = request("SET_AUDIO_LEVELS");
    r.push("volume", data[1] & 0x7F);
    for (name, at) in [("balance", 2), ("fader", 3), ("bass", 4), ("treble", 5)] {
        r.push(name, from_midpoint(data[at] & 0x7F, 0x3F));
    }
    Ok(r)
}

fn request_preset(data: &[u8]) -> DecodeResult {
    Ok(request("REQUEST_TUNER_PRESET")
        .with("band", data[1] & 0x07)
        .with("preset", data[2] & 0x0F))
}
