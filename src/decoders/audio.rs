//! Head unit (tuner, cassette, internal CD), its steering-wheel stalk, audio
//! settings and the CD changer.

use std::borrow::Cow;

use super::{SubFormat, dispatch};
use crate::error::DecodeError;
use crate::iden::HEAD_UNIT_IDEN;
use crate::record::{SignalRecord, Value};
use crate::units::{Scale, bcd, bit, from_midpoint, label_or_hex, trimmed_text, u16_be};

type DecodeResult = Result<SignalRecord, DecodeError>;

/// FM frequency in MHz: `50 + raw * 0.05`.
const FM_MHZ: Scale = Scale::new(5, 100, 50, 2);

/// Balance, fader, bass and treble are stored around this value.
const LEVEL_MIDPOINT: u8 = 0x3F;

const STALK_BUTTONS: [(u8, &str); 5] = [
    (0x80, "NEXT"),
    (0x40, "PREV"),
    (0x08, "VOLUME_UP"),
    (0x04, "VOLUME_DOWN"),
    (0x02, "SOURCE"),
];

pub fn head_unit_stalk(data: &[u8]) -> DecodeResult {
    let pressed = STALK_BUTTONS
        .iter()
        .filter(|(mask, _)| bit(data[0], *mask))
        .map(|&(_, name)| Value::label(name))
        .collect();
    Ok(SignalRecord::new()
        .with("buttons", Value::List(pressed))
        .with("wheel_position", data[1] as i8))
}

pub(crate) fn source(raw: u32) -> Option<&'static str> {
    Some(match raw {
        0x00 => "NONE",
        0x01 => "TUNER",
        0x02 => "TAPE",
        0x03 => "INTERNAL_CD",
        0x05 => "CD_CHANGER",
        0x06 => "NAVIGATION",
        _ => return None,
    })
}

pub fn audio_settings(data: &[u8]) -> DecodeResult {
    let mut r = SignalRecord::new();
    r.push("loudness", bit(data[1], 0x10))
        .push("auto_volume", bit(data[1], 0x02))
        .push("power", bit(data[2], 0x01))
        .push("tape_present", bit(data[2], 0x02))
        .push("cd_present", bit(data[2], 0x10))
        .push("source", label_or_hex((data[4] & 0x0F) as u32, source))
        .push("volume", data[5] & 0x7F)
        .push("volume_update", bit(data[5], 0x80));
    for (name, at) in [("balance", 6), ("fader", 7), ("bass", 8), ("treble", 9)] {
        r.push(name, from_midpoint(data[at] & 0x7F, LEVEL_MIDPOINT));
    }
    Ok(r)
}

const HEAD_UNIT_FORMATS: &[SubFormat] = &[
    SubFormat {
        tag: 0xD1,
        lengths: &[22],
        decode: tuner,
    },
    SubFormat {
        tag: 0xD3,
        lengths: &[12],
        decode: tuner_preset,
    },
    SubFormat {
        tag: 0xD5,
        lengths: &[19, 21],
        decode: internal_cd,
    },
    SubFormat {
        tag: 0xD6,
        lengths: &[10],
        decode: cassette,
    },
];

pub fn head_unit(data: &[u8]) -> DecodeResult {
    dispatch(HEAD_UNIT_IDEN, data[1], data, HEAD_UNIT_FORMATS)
}

fn band(raw: u32) -> Option<&'static str> {
    Some(match raw {
        0 => "NONE",
        1 => "FM1",
        2 => "FM2",
        3 => "FMAST",
        4 => "AM",
        7 => "PTY_SELECT",
        _ => return None,
    })
}

fn search_mode(raw: u32) -> Option<&'static str> {
    Some(match raw {
        0 => "NOT_SEARCHING",
        1 => "MANUAL_TUNING",
        2 => "SEARCHING_BY_FREQUENCY",
        4 => "SEARCHING_BY_PTY",
        _ => return None,
    })
}

/// RDS programme types.
static PTY: [&str; 32] = [
    "Not defined",
    "News",
    "Current affairs",
    "Information",
    "Sport",
    "Education",
    "Drama",
    "Culture",
    "Science",
    "Varied",
    "Pop music",
    "Rock music",
    "Easy listening",
    "Light classical",
    "Serious classical",
    "Other music",
    "Weather",
    "Finance",
    "Children's programmes",
    "Social affairs",
    "Religion",
    "Phone-in",
    "Travel",
    "Leisure",
    "Jazz music",
    "Country music",
    "National music",
    "Oldies music",
    "Folk music",
    "Documentary",
    "Alarm test",
    "Alarm",
];

fn pty(raw: u8) -> Value {
    Value::label(PTY[(raw & 0x1F) as usize])
}

fn tuner(data: &[u8]) -> DecodeResult {
    let band_raw = (data[2] & 0x07) as u32;
    let frequency_raw = u16_be(data, 4);
    let frequency = match (frequency_raw, band_raw) {
        (0xFFFF, _) => Value::NotApplicable,
        (raw, 4) => Value::from(raw),
        (raw, _) => Value::Fixed(FM_MHZ.apply(raw as u32)),
    };
    let preset = (data[2] >> 3) & 0x0F;
    let pi = match u16_be(data, 10) {
        0xFFFF => Value::NotApplicable,
        v => Value::Label(Cow::Owned(format!("{v:04X}"))),
    };

    let mut r = SignalRecord::new();
    r.push("band", label_or_hex(band_raw, band))
        .push("memory", if preset == 0 { None } else { Some(preset) })
        .push("search_mode", label_or_hex(((data[3] >> 4) & 0x07) as u32, search_mode))
        .push("frequency", frequency)
        .push("signal_strength", data[6] & 0x0F)
        .push("ta_selected", bit(data[7], 0x80))
        .push("rds_selected", bit(data[7], 0x20))
        .push("regional", bit(data[7], 0x10))
        .push("pty_selected", pty(data[8]))
        .push("pty", pty(data[9]))
        .push("pi_code", pi)
        .push("rds_text", Value::Text(trimmed_text(&data[12..20])))
        .push("traffic_info_active", bit(data[21], 0x20));
    Ok(r)
}

fn tuner_preset(data: &[u8]) -> DecodeResult {
    Ok(SignalRecord::new()
        .with(
            "preset_band",
            label_or_hex(((data[2] >> 4) & 0x07) as u32, band),
        )
        .with("preset_number", data[2] & 0x0F)
        .with("preset_name", Value::Text(trimmed_text(&data[3..11]))))
}

fn cd_status(raw: u32) -> Option<&'static str> {
    Some(match raw {
        0x00 => "EJECTED",
        0x01 => "LOADING",
        0x02 => "PAUSED",
        0x03 => "PLAYING",
        0x04 => "FAST_FORWARD",
        0x05 => "REWIND",
        0x06 => "SEARCHING",
        0x0E => "ERROR",
        _ => return None,
    })
}

/// `m:ss` from two BCD bytes, not applicable when either is not decimal.
fn bcd_time(minutes: u8, seconds: u8) -> Value {
    match (bcd(minutes), bcd(seconds)) {
        (Some(m), Some(s)) => Value::Text(format!("{m}:{s:02}")),
        _ => Value::NotApplicable,
    }
}

fn internal_cd(data: &[u8]) -> DecodeResult {
    Ok(SignalRecord::new()
        .with("cd_status", label_or_hex((data[3] & 0x0F) as u32, cd_status))
        .with("random_mode", bit(data[4], 0x01))
        .with("track_time", bcd_time(data[5], data[6]))
        .with("track", bcd(data[7]))
        .with("total_tracks", bcd(data[8]))
        .with("total_time", bcd_time(data[9], data[10])))
}

fn tape_status(raw: u32) -> Option<&'static str> {
    Some(match raw {
        0x00 => "STOPPED",
        0x03 => "PLAYING",
        0x04 => "FAST_FORWARD",
        0x05 => "REWIND",
        0x06 => "SEARCHING",
        _ => return None,
    })
}

fn cassette(data: &[u8]) -> DecodeResult {
    Ok(SignalRecord::new()
        .with("tape_status", label_or_hex((data[2] & 0x0F) as u32, tape_status))
        .with("tape_side", if bit(data[3], 0x01) { 2u8 } else { 1 })
        .with("dolby", bit(data[3], 0x10)))
}

fn changer_status(raw: u32) -> Option<&'static str> {
    Some(match raw {
        0x41 => "IDLE",
        0x49 => "LOADING",
        0xC1 => "PAUSED",
        0xC3 => "PLAYING",
        0xC4 => "FAST_FORWARD",
        0xC5 => "REWIND",
        0xD3 => "SEARCHING",
        _ => return None,
    })
}

pub fn cd_changer(data: &[u8]) -> DecodeResult {
    let loaded = (0..6)
        .filter(|i| bit(data[10], 1 << i))
        .map(|i| Value::Int(i as i64 + 1))
        .collect();
    Ok(SignalRecord::new()
        .with("status", label_or_hex(data[2] as u32, changer_status))
        .with("random_mode", bit(data[3], 0x01))
        .with("track_time", bcd_time(data[4], data[5]))
        .with("track", bcd(data[6]))
        .with("total_tracks", bcd(data[7]))
        .with("cd", bcd(data[8]))
        .with("cartridge_present", bit(data[10], 0x80))
        .with("cds_present", Value::List(loaded)))
}

fn changer_command(raw: u32) -> Option<&'static str> {
    Some(match raw {
        0x1101 => "POWER_OFF",
        0x2101 => "POWER_ON",
        0x1181 => "PLAY",
        0x1183 => "PAUSE",
        0x1184 => "NEXT_TRACK",
        0x1185 => "PREVIOUS_TRACK",
        0x1186 => "FAST_FORWARD",
        0x1187 => "REWIND",
        0x11C1 => "RANDOM_ON",
        0x11C3 => "RANDOM_OFF",
        _ => return None,
    })
}

pub fn cd_changer_command(data: &[u8]) -> DecodeResult {
    Ok(SignalRecord::new().with(
        "command",
        label_or_hex(u16_be(data, 0) as u32, changer_command),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(s: &str) -> Vec<u8> {
        hex::decode(s.replace(' ', "")).unwrap()
    }

    #[test]
    fn stalk_buttons_and_wheel() {
        let r = head_unit_stalk(&[0x88, 0xFE]).unwrap();
        assert_eq!(
            r.get("buttons"),
            Some(&Value::List(vec![Value::label("NEXT"), Value::label("VOLUME_UP")]))
        );
        assert_eq!(r.get("wheel_position"), Some(&Value::Int(-2)));
    }

    #[test]
    fn audio_levels_are_signed_around_midpoint() {
        let r = audio_settings(&bytes("00 10 01 00 01 8F 3F 38 46 3F 00")).unwrap();
        assert_eq!(r.get("loudness"), Some(&Value::Bool(true)));
        assert_eq!(r.get("source"), Some(&Value::label("TUNER")));
        assert_eq!(r.get("volume"), Some(&Value::Int(15)));
        assert_eq!(r.get("volume_update"), Some(&Value::Bool(true)));
        assert_eq!(r.get("balance"), Some(&Value::Int(0)));
        assert_eq!(r.get("fader"), Some(&Value::Int(-7)));
        assert_eq!(r.get("bass"), Some(&Value::Int(7)));
    }

    #[test]
    fn unknown_source_falls_back_to_hex() {
        let r = audio_settings(&bytes("00 00 00 00 0C 00 3F 3F 3F 3F 00")).unwrap();
        assert_eq!(r.get("source").and_then(Value::as_str), Some("0x0C"));
    }

    #[test]
    fn tuner_fm() {
        // FM1, preset 3, 50 + 0x0366 * 0.05 MHz
        let mut data = bytes("00 D1 19 00 03 66 0A 80 0A 01 F2 01");
        data.extend_from_slice(b"RADIO 2 ");
        data.extend_from_slice(&[0x00, 0x20]);
        let r = head_unit(&data).unwrap();
        assert_eq!(r.get("band"), Some(&Value::label("FM1")));
        assert_eq!(r.get("memory"), Some(&Value::Int(3)));
        assert_eq!(r.get("frequency").unwrap().to_string(), "93.50");
        assert_eq!(r.get("pty"), Some(&Value::label("News")));
        assert_eq!(r.get("pty_selected"), Some(&Value::label("Pop music")));
        assert_eq!(r.get("pi_code").and_then(Value::as_str), Some("F201"));
        assert_eq!(r.get("rds_text").and_then(Value::as_str), Some("RADIO 2"));
        assert_eq!(r.get("traffic_info_active"), Some(&Value::Bool(true)));
    }

    #[test]
    fn head_unit_sub_format_length_is_checked() {
        let data = bytes("00 D6 03 01 00 00 00 00 00 00 00 00");
        assert_eq!(
            head_unit(&data),
            Err(DecodeError::UnexpectedLength {
                iden: HEAD_UNIT_IDEN,
                len: 12
            })
        );
    }

    #[test]
    fn head_unit_unknown_sub_format() {
        let data = bytes("00 C4 00 00 00 00 00 00 00 00");
        assert_eq!(
            head_unit(&data),
            Err(DecodeError::ToBeDecoded {
                iden: HEAD_UNIT_IDEN
            })
        );
    }

    #[test]
    fn cassette_side() {
        let r = head_unit(&bytes("00 D6 03 01 00 00 00 00 00 00")).unwrap();
        assert_eq!(r.get("tape_status"), Some(&Value::label("PLAYING")));
        assert_eq!(r.get("tape_side"), Some(&Value::Int(2)));
    }

    #[test]
    fn changer_bcd_fields() {
        let r = cd_changer(&bytes("00 00 C3 00 03 27 12 15 04 00 8D 00")).unwrap();
        assert_eq!(r.get("status"), Some(&Value::label("PLAYING")));
        assert_eq!(r.get("track_time").and_then(Value::as_str), Some("3:27"));
        assert_eq!(r.get("track"), Some(&Value::Int(12)));
        assert_eq!(r.get("total_tracks"), Some(&Value::Int(15)));
        assert_eq!(r.get("cartridge_present"), Some(&Value::Bool(true)));
        assert_eq!(
            r.get("cds_present"),
            Some(&Value::List(vec![Value::Int(1), Value::Int(3), Value::Int(4)]))
        );
        let r = cd_changer(&bytes("00 00 41 00 FF FF FF FF FF 00 00 00")).unwrap();
        assert_eq!(r.get("track_time"), Some(&Value::NotApplicable));
        assert_eq!(r.get("track"), Some(&Value::NotApplicable));
    }

    #[test]
    fn changer_command_fallback() {
        let r = cd_changer_command(&[0x11, 0x01]).unwrap();
        assert_eq!(r.get("command"), Some(&Value::label("POWER_OFF")));
        let r = cd_changer_command(&[0x12, 0x34]).unwrap();
        assert_eq!(r.get("command").and_then(Value::as_str), Some("0x1234"));
    }

    #[test]
    fn tuner_preset_name() {
        let mut data = bytes("00 D3 23");
        data.extend_from_slice(b"RTL     ");
        data.push(0x00);
        let r = head_unit(&data).unwrap();
        assert_eq!(r.get("preset_band"), Some(&Value::label("FM2")));
        assert_eq!(r.get("preset_number"), Some(&Value::Int(3)));
        assert_eq!(r.get("preset_name").and_then(Value::as_str), Some("RTL"));

        let mut data = bytes("00 D3 55");
        data.extend_from_slice(b"NRJ\0\0\0\0\0");
        data.push(0x00);
        let r = head_unit(&data).unwrap();
        assert_eq!(r.get("preset_band").and_then(Value::as_str), Some("0x05"));
        assert_eq!(r.get("preset_number"), Some(&Value::Int(5)));
        assert_eq!(r.get("preset_name").and_then(Value::as_str), Some("NRJ"));
    }

    #[test]
    fn internal_cd_playing() {
        let r = head_unit(&bytes("00 D5 00 13 01 04 07 12 15 52 30 00 00 00 00 00 00 00 00")).unwrap();
        assert_eq!(r.get("cd_status"), Some(&Value::label("PLAYING")));
        assert_eq!(r.get("random_mode"), Some(&Value::Bool(true)));
        assert_eq!(r.get("track_time").and_then(Value::as_str), Some("4:07"));
        assert_eq!(r.get("track"), Some(&Value::Int(12)));
        assert_eq!(r.get("total_tracks"), Some(&Value::Int(15)));
        assert_eq!(r.get("total_time").and_then(Value::as_str), Some("52:30"));
    }

    #[test]
    fn internal_cd_without_disc_info() {
        let r = head_unit(&bytes(
            "00 D5 00 0E 00 FF FF FF FF FF FF 00 00 00 00 00 00 00 00 00 00",
        ))
        .unwrap();
        assert_eq!(r.get("cd_status"), Some(&Value::label("ERROR")));
        assert_eq!(r.get("random_mode"), Some(&Value::Bool(false)));
        assert_eq!(r.get("track_time"), Some(&Value::NotApplicable));
        assert_eq!(r.get("track"), Some(&Value::NotApplicable));
        assert_eq!(r.get("total_tracks"), Some(&Value::NotApplicable));
        assert_eq!(r.get("total_time"), Some(&Value::NotApplicable));

        let r = head_unit(&bytes("00 D5 00 07 00 00 00 01 01 00 00 00 00 00 00 00 00 00 00")).unwrap();
        assert_eq!(r.get("cd_status").and_then(Value::as_str), Some("0x07"));
        assert_eq!(r.get("track_time").and_then(Value::as_str), Some("0:00"));
    }
}
